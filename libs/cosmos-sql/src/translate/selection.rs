// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;

use crate::{
    CompilationError,
    operators,
    request::{Aggregate, Field, NestedField},
    schema::{
        CollectionsSchema, NamedTypeKind, ObjectTypeDefinition, TypeDefinition, is_safe_identifier,
    },
    sql::{
        column::ColumnPath,
        is_reserved_keyword,
        select::{AggregateSelection, FromClause, SelectColumn, SqlQueryContext},
    },
};

use super::{MAX_NESTING_DEPTH, Scope, field_path::resolve_object_path};

/// Aggregates are always projected with `AS`, so their aliases end up verbatim in the query
/// text. Field aliases have no such restriction.
fn check_aggregate_alias(alias: &str) -> Result<(), CompilationError> {
    if !is_safe_identifier(alias) || is_reserved_keyword(alias) {
        return Err(CompilationError::bad_request(format!(
            "'{alias}' can't be used as an aggregate alias"
        )));
    }
    Ok(())
}

/// `base`, suffixed with the nesting level (and counting up from there) until it differs from
/// every alias bound by the enclosing queries
fn unique_alias(base: String, enclosing: &[String], depth: usize) -> String {
    let mut alias = base.clone();
    let mut suffix = depth;
    while enclosing.contains(&alias) {
        alias = format!("{base}_{suffix}");
        suffix += 1;
    }
    alias
}

/// Select `fields` from the document bound to `scope.alias`. `enclosing` holds the aliases
/// bound by the queries this selection is nested in.
pub(super) fn select_fields<'a>(
    schema: &'a CollectionsSchema,
    scope: &Scope<'a>,
    fields: &IndexMap<String, Field>,
    depth: usize,
    enclosing: &[String],
) -> Result<IndexMap<String, SelectColumn>, CompilationError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CompilationError::bad_request(format!(
            "Selection is nested deeper than the maximum of {MAX_NESTING_DEPTH} levels"
        )));
    }

    let mut bound = enclosing.to_vec();
    bound.push(scope.alias.clone());

    fields
        .iter()
        .map(|(alias, field)| {
            let (column, nested) = match field {
                Field::Column { column, fields } => (column, fields),
                Field::Relationship { relationship, .. } => {
                    return Err(CompilationError::not_supported(format!(
                        "Relationship '{relationship}' can't be selected: relationships are not supported"
                    )));
                }
            };

            let property = scope.object_type.properties.get(column).ok_or_else(|| {
                CompilationError::bad_request(format!(
                    "Couldn't find field '{column}' in object type '{}'",
                    scope.object_name
                ))
            })?;

            let source = ColumnPath::new(&scope.alias).with_field(column);

            let selection = match nested {
                None => SelectColumn::Column(source),
                Some(nested) => select_nested(
                    schema,
                    source,
                    &property.typ,
                    nested,
                    column,
                    depth,
                    &bound,
                )
                .map_err(|error| error.with_context(format!("Selecting '{alias}'")))?,
            };

            Ok((alias.clone(), selection))
        })
        .collect()
}

/// A correlated subquery selecting from inside the object or array column at `source`
fn select_nested<'a>(
    schema: &'a CollectionsSchema,
    source: ColumnPath,
    typ: &'a TypeDefinition,
    nested: &NestedField,
    field: &str,
    depth: usize,
    enclosing: &[String],
) -> Result<SelectColumn, CompilationError> {
    let alias = unique_alias(format!("_subquery_parent_{field}"), enclosing, depth);

    let subquery = match (nested, typ.non_nullable()) {
        (
            NestedField::Object(object),
            TypeDefinition::Named {
                name,
                kind: NamedTypeKind::Object,
            },
        ) => {
            let object_scope = Scope {
                alias: alias.clone(),
                object_name: name,
                object_type: object_type(schema, name)?,
            };

            let mut subquery = SqlQueryContext::new(FromClause::Aliased { source, alias });
            subquery.select =
                select_fields(schema, &object_scope, &object.fields, depth + 1, enclosing)?;
            subquery
        }
        (NestedField::Array(array), TypeDefinition::Array { element_type }) => select_array(
            schema,
            source,
            alias,
            element_type,
            &array.fields,
            depth + 1,
            enclosing,
        )?,
        _ => {
            return Err(CompilationError::bad_request(format!(
                "The nested selection of '{field}' doesn't match its type"
            )));
        }
    };

    Ok(SelectColumn::Subquery(Box::new(subquery)))
}

/// Iterate over the array at `source`, selecting from each element. The elements of an array of
/// arrays are themselves iterated over, with the level appended to the element alias.
fn select_array<'a>(
    schema: &'a CollectionsSchema,
    source: ColumnPath,
    alias: String,
    element_type: &'a TypeDefinition,
    nested: &NestedField,
    depth: usize,
    enclosing: &[String],
) -> Result<SqlQueryContext, CompilationError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CompilationError::bad_request(format!(
            "Selection is nested deeper than the maximum of {MAX_NESTING_DEPTH} levels"
        )));
    }

    let mut subquery = SqlQueryContext::new(FromClause::Iterate {
        source,
        alias: alias.clone(),
    });
    subquery.select_as_array = true;

    match (nested, element_type.non_nullable()) {
        (
            NestedField::Object(object),
            TypeDefinition::Named {
                name,
                kind: NamedTypeKind::Object,
            },
        ) => {
            let element_scope = Scope {
                alias,
                object_name: name,
                object_type: object_type(schema, name)?,
            };
            subquery.select =
                select_fields(schema, &element_scope, &object.fields, depth, enclosing)?;
        }
        (NestedField::Array(array), TypeDefinition::Array { element_type }) => {
            let mut bound = enclosing.to_vec();
            bound.push(alias.clone());
            let inner_alias = unique_alias(format!("{alias}_{depth}"), &bound, depth);
            let inner = select_array(
                schema,
                ColumnPath::new(&alias),
                inner_alias,
                element_type,
                &array.fields,
                depth + 1,
                &bound,
            )?;

            subquery.select_as_value = true;
            subquery
                .select
                .insert(alias, SelectColumn::Subquery(Box::new(inner)));
        }
        _ => {
            return Err(CompilationError::bad_request(format!(
                "The nested selection of array elements bound to '{alias}' doesn't match their type"
            )));
        }
    }

    Ok(subquery)
}

fn object_type<'a>(
    schema: &'a CollectionsSchema,
    name: &str,
) -> Result<&'a ObjectTypeDefinition, CompilationError> {
    schema
        .object_type(name)
        .ok_or_else(|| CompilationError::bad_request(format!("Couldn't find object type '{name}'")))
}

pub(super) fn select_aggregates<'a>(
    schema: &'a CollectionsSchema,
    scope: &Scope<'a>,
    aggregates: &IndexMap<String, Aggregate>,
) -> Result<IndexMap<String, SelectColumn>, CompilationError> {
    aggregates
        .iter()
        .map(|(alias, aggregate)| {
            check_aggregate_alias(alias)?;

            let selection = match aggregate {
                Aggregate::StarCount => AggregateSelection::StarCount,
                Aggregate::ColumnCount {
                    column,
                    field_path,
                    distinct,
                } => {
                    let (column, _) = resolve_object_path(
                        schema,
                        scope,
                        column,
                        field_path.as_deref().unwrap_or_default(),
                    )?;
                    AggregateSelection::Count {
                        column,
                        distinct: *distinct,
                    }
                }
                Aggregate::SingleColumn {
                    column: column_name,
                    field_path,
                    function,
                } => {
                    let (column, typ) = resolve_object_path(
                        schema,
                        scope,
                        column_name,
                        field_path.as_deref().unwrap_or_default(),
                    )?;

                    let TypeDefinition::Named {
                        name: scalar_type,
                        kind: NamedTypeKind::Scalar,
                    } = typ.non_nullable()
                    else {
                        return Err(CompilationError::bad_request(format!(
                            "Aggregate function '{function}' can only be applied to a scalar, and '{column_name}' is not one"
                        )));
                    };

                    let definition = operators::aggregate_function(scalar_type, function)?;
                    AggregateSelection::Function {
                        dialect_name: definition.dialect_name,
                        column,
                    }
                }
            };

            Ok((alias.clone(), SelectColumn::Aggregate(selection)))
        })
        .collect()
}
