// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use cosmos_sql::CompilationError;
use http::StatusCode;
use thiserror::Error;
use tracing::error;

use crate::{configuration::ConfigurationError, execution::ExecutionError};

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("{0}")]
    Compilation(#[from] CompilationError),

    #[error("{0}")]
    Execution(#[from] ExecutionError),

    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl ConnectorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ConnectorError::Compilation(CompilationError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            ConnectorError::Compilation(CompilationError::NotSupported(_)) => {
                StatusCode::NOT_IMPLEMENTED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Message that should be returned to the client. Details of execution and configuration
    // failures are logged instead.
    pub fn user_error_message(&self) -> String {
        match self {
            ConnectorError::Compilation(error) => error.user_error_message(),
            ConnectorError::Execution(error) => {
                error!("Error executing query: {error}");
                "Internal server error".to_string()
            }
            ConnectorError::Configuration(error) => {
                error!("Invalid configuration: {error}");
                "Internal server error, server configuration is invalid".to_string()
            }
        }
    }
}
