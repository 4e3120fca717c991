// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;
use cosmos_sql::{SqlQuerySpec, compile, request::QueryRequest, schema::SchemaResponse};
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    configuration::ConnectorConfig,
    error::ConnectorError,
    response::{
        Capabilities, ExplainResponse, LeafCapability, MutationCapabilities,
        NestedFieldCapabilities, QueryCapabilities, QueryResponse, RowSet,
    },
};

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Query against container '{container}' failed: {message}")]
    Query { container: String, message: String },

    #[error("Expected each row to be an object, got {0}")]
    UnexpectedRow(Value),

    #[error("{0}")]
    Delegate(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Runs compiled queries against a container, returning the raw result documents
#[async_trait]
pub trait RowExecutor: Send + Sync {
    async fn run_query(
        &self,
        container: &str,
        query: &SqlQuerySpec,
    ) -> Result<Vec<Value>, ExecutionError>;
}

#[instrument(
    name = "cosmos_connector::execute_query",
    skip_all,
    fields(collection = %request.collection)
)]
pub async fn execute_query(
    config: &ConnectorConfig,
    executor: &dyn RowExecutor,
    request: &QueryRequest,
) -> Result<QueryResponse, ConnectorError> {
    let compiled = compile(&config.schema, request)?;

    debug!(
        query = %compiled.query.query,
        parameters = compiled.query.parameters.len(),
        "Running query"
    );

    let rows = executor
        .run_query(&compiled.collection, &compiled.query)
        .await?;

    debug!(rows = rows.len(), "Query returned");

    let row_set = if compiled.is_aggregate {
        let aggregates = match rows.into_iter().next() {
            Some(row) => into_row(row)?,
            None => IndexMap::new(),
        };
        RowSet {
            aggregates: Some(aggregates),
            rows: None,
        }
    } else {
        RowSet {
            aggregates: None,
            rows: Some(
                rows.into_iter()
                    .map(into_row)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    };

    Ok(QueryResponse(vec![row_set]))
}

fn into_row(value: Value) -> Result<IndexMap<String, Value>, ExecutionError> {
    match value {
        Value::Object(row) => Ok(row.into_iter().collect()),
        other => Err(ExecutionError::UnexpectedRow(other)),
    }
}

/// Compile the request and describe the query it would run, without running it
#[instrument(
    name = "cosmos_connector::explain_query",
    skip_all,
    fields(collection = %request.collection)
)]
pub fn explain_query(
    config: &ConnectorConfig,
    request: &QueryRequest,
) -> Result<ExplainResponse, ConnectorError> {
    let compiled = compile(&config.schema, request)?;

    let parameters = serde_json::to_string(&compiled.query.parameters).map_err(|e| {
        cosmos_sql::CompilationError::internal(format!("Failed to serialize parameters: {e}"))
    })?;

    let details = IndexMap::from([
        ("SQL Query".to_string(), compiled.query.query),
        ("Parameters".to_string(), parameters),
    ]);

    Ok(ExplainResponse { details })
}

pub fn schema(config: &ConnectorConfig) -> SchemaResponse {
    config.schema.to_schema_response()
}

pub fn capabilities() -> Capabilities {
    Capabilities {
        query: QueryCapabilities {
            aggregates: Some(LeafCapability {}),
            variables: Some(LeafCapability {}),
            explain: Some(LeafCapability {}),
            nested_fields: NestedFieldCapabilities {
                filter_by: Some(LeafCapability {}),
                order_by: Some(LeafCapability {}),
            },
        },
        mutation: MutationCapabilities {},
        relationships: None,
    }
}
