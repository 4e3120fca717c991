// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Serves query requests against Azure Cosmos DB containers.
//!
//! The connector loads its [`ConnectorConfig`] (connection details and the collections schema)
//! from a configuration directory, compiles each request with `cosmos_sql`, and runs the compiled
//! query through a [`RowExecutor`]. The executor is the only part that talks to the database, so
//! everything up to it can run (and be tested) without one.

mod configuration;
mod environment;
mod error;
mod execution;
pub mod logging;
mod response;
mod state;

pub use configuration::{
    Authentication, CONFIG_FILE_NAME, ConfigurationError, ConnectionConfig, ConnectorConfig,
    Credentials,
};
pub use environment::{Environment, MapEnvironment, SystemEnvironment};
pub use error::ConnectorError;
pub use execution::{
    ExecutionError, RowExecutor, capabilities, execute_query, explain_query, schema,
};
pub use response::{
    Capabilities, ExplainResponse, LeafCapability, MutationCapabilities, NestedFieldCapabilities,
    QueryCapabilities, QueryResponse, RowSet,
};
pub use state::ConfigurationHandle;
