// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// Errors raised while compiling a query request. All of them are raised before any I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompilationError {
    /// The request is malformed or refers to something the schema doesn't have
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request is well-formed but asks for a feature the connector doesn't offer
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// The loaded configuration is inconsistent
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl CompilationError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CompilationError::BadRequest(message.into())
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        CompilationError::NotSupported(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::InternalServerError(message.into())
    }

    /// Prefix the message with the given context, keeping the error kind
    pub fn with_context(self, context: impl AsRef<str>) -> Self {
        let context = context.as_ref();
        match self {
            CompilationError::BadRequest(message) => {
                CompilationError::BadRequest(format!("{context}: {message}"))
            }
            CompilationError::NotSupported(message) => {
                CompilationError::NotSupported(format!("{context}: {message}"))
            }
            CompilationError::InternalServerError(message) => {
                CompilationError::InternalServerError(format!("{context}: {message}"))
            }
        }
    }

    /// The message to report to the caller. Internal errors are not exposed as-is.
    pub fn user_error_message(&self) -> String {
        match self {
            CompilationError::BadRequest(message) | CompilationError::NotSupported(message) => {
                message.clone()
            }
            CompilationError::InternalServerError(_) => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind() {
        let error = CompilationError::not_supported("relationships").with_context("field 'author'");

        assert_eq!(
            error,
            CompilationError::NotSupported("field 'author': relationships".to_string())
        );
    }

    #[test]
    fn internal_message_hidden() {
        let error = CompilationError::internal("object type 'User' missing");
        assert_eq!(error.user_error_message(), "Internal server error");
        assert_eq!(
            CompilationError::bad_request("unknown collection").user_error_message(),
            "unknown collection"
        );
    }
}
