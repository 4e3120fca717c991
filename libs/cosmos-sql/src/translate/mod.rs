// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Validates a query request against the schema and translates it into an SQL tree.

mod field_path;
mod order_by;
mod predicate;
mod selection;
#[cfg(test)]
mod test_schema;

use tracing::{debug, instrument};

use crate::{
    CompilationError,
    request::QueryRequest,
    schema::{CollectionsSchema, ObjectTypeDefinition},
    sql::{
        limit::Limit,
        offset::Offset,
        select::{FromClause, SqlQueryContext},
        sql_query::{SqlQuerySpec, assemble},
    },
};

use predicate::PredicateTranslator;

/// The maximum depth of field paths, nested selections, and predicate expressions. Anything
/// deeper is rejected as a bad request.
pub const MAX_NESTING_DEPTH: usize = 32;

/// A request compiled for a collection, ready to be executed
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub collection: String,
    pub query: SqlQuerySpec,
    /// Whether the result is a single row of aggregates rather than a list of rows
    pub is_aggregate: bool,
}

/// The document type in scope while translating part of a request, along with the alias
/// bound to documents of that type.
#[derive(Debug, Clone)]
struct Scope<'a> {
    alias: String,
    object_name: &'a str,
    object_type: &'a ObjectTypeDefinition,
}

/// Validate the request and translate it into a query over its collection.
pub fn translate(
    schema: &CollectionsSchema,
    request: &QueryRequest,
) -> Result<SqlQueryContext, CompilationError> {
    let collection_name = &request.collection;

    let collection = schema.collection(collection_name).ok_or_else(|| {
        CompilationError::bad_request(format!(
            "Couldn't find collection '{collection_name}' in the schema"
        ))
    })?;

    if !request.arguments.is_empty() {
        return Err(CompilationError::bad_request(
            "Collection arguments are not supported",
        ));
    }

    if !request.collection_relationships.is_empty() {
        return Err(CompilationError::bad_request(
            "Collection relationships are not supported",
        ));
    }

    let (object_name, _) = collection.result_type.base_named_type();
    let object_type = schema.object_type(object_name).ok_or_else(|| {
        CompilationError::internal(format!(
            "Couldn't find the schema of the object type '{object_name}'"
        ))
    })?;

    let query = &request.query;

    if query.fields.is_some() && query.aggregates.is_some() {
        return Err(CompilationError::not_supported(
            "Aggregates and fields cannot be requested together",
        ));
    }

    let root = Scope {
        alias: format!("root_{collection_name}"),
        object_name,
        object_type,
    };

    let mut context = SqlQueryContext::new(FromClause::Container {
        container: collection_name.clone(),
        alias: root.alias.clone(),
    });

    if let Some(fields) = &query.fields {
        context.select = selection::select_fields(schema, &root, fields, 1, &[])?;
    }

    if let Some(aggregates) = &query.aggregates {
        context.select = selection::select_aggregates(schema, &root, aggregates)?;
        context.is_aggregate = true;
    }

    if let Some(predicate) = &query.predicate {
        let mut translator = PredicateTranslator::new(schema, root.clone());
        context.predicate = Some(translator.translate(predicate)?);
    }

    if let Some(order_by) = &query.order_by {
        context.order_by = order_by::translate_order_by(schema, &root, order_by)?;
    }

    context.offset = query.offset.map(Offset);
    context.limit = query.limit.map(Limit);

    Ok(context)
}

/// Translate the request and render it along with its parameters.
#[instrument(
    name = "cosmos_sql::compile",
    skip_all,
    fields(collection = %request.collection)
)]
pub fn compile(
    schema: &CollectionsSchema,
    request: &QueryRequest,
) -> Result<CompiledQuery, CompilationError> {
    let context = translate(schema, request)?;
    let is_aggregate = context.is_aggregate;
    let query = assemble(context, request.variables.as_deref())?;

    debug!(query = %query.query, parameters = query.parameters.len(), "Compiled query");

    Ok(CompiledQuery {
        collection: request.collection.clone(),
        query,
        is_aggregate,
    })
}
