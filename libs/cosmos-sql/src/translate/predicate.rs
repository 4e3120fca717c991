// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::debug;

use crate::{
    CompilationError,
    operators::{self, IS_NULL},
    request::{
        ComparisonTarget, ComparisonValue as RequestComparisonValue, ExistsInCollection,
        Expression, UnaryComparisonOperator,
    },
    schema::{CollectionsSchema, NamedTypeKind, TypeDefinition},
    sql::{
        column::PredicateColumn,
        predicate::{Comparison, ComparisonValue, WhereExpression},
    },
};

use super::{
    MAX_NESTING_DEPTH, Scope,
    field_path::{PathEnd, resolve_nested_field, resolve_object_path},
};

/// Translates request predicates. Holds the counter naming the elements bound by nested
/// collection `EXISTS` clauses, so aliases stay unique across the whole predicate.
pub(super) struct PredicateTranslator<'a> {
    schema: &'a CollectionsSchema,
    root: Scope<'a>,
    nested_elements: usize,
}

impl<'a> PredicateTranslator<'a> {
    pub fn new(schema: &'a CollectionsSchema, root: Scope<'a>) -> Self {
        Self {
            schema,
            root,
            nested_elements: 0,
        }
    }

    pub fn translate(&mut self, expression: &Expression) -> Result<WhereExpression, CompilationError> {
        let root = self.root.clone();
        self.translate_expression(expression, &root, 1)
    }

    fn translate_expression(
        &mut self,
        expression: &Expression,
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<WhereExpression, CompilationError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(CompilationError::bad_request(format!(
                "Predicate is nested deeper than the maximum of {MAX_NESTING_DEPTH} levels"
            )));
        }

        match expression {
            Expression::And { expressions } => Ok(WhereExpression::And(
                self.translate_all(expressions, scope, depth)?,
            )),
            Expression::Or { expressions } => Ok(WhereExpression::Or(
                self.translate_all(expressions, scope, depth)?,
            )),
            Expression::Not { expression } => Ok(WhereExpression::Not(Box::new(
                self.translate_expression(expression, scope, depth + 1)?,
            ))),
            Expression::UnaryComparisonOperator {
                column,
                operator: UnaryComparisonOperator::IsNull,
            } => Ok(WhereExpression::Simple {
                column: self.comparison_target(column, scope, PathEnd::AnyValue)?,
                comparison: Comparison::IsNull,
            }),
            Expression::BinaryComparisonOperator {
                column,
                operator,
                value,
            } => {
                let column = self.comparison_target(column, scope, PathEnd::Scalar)?;
                let scalar_type = column.scalar_type().ok_or_else(|| {
                    CompilationError::internal("Comparison target doesn't end at a scalar")
                })?;
                let operator = operators::comparison_operator(scalar_type, operator)?;

                if operator.is_unary || operator.name == IS_NULL {
                    return Err(CompilationError::bad_request(format!(
                        "Operator '{}' takes no value and can't be used as a binary comparison",
                        operator.name
                    )));
                }

                Ok(WhereExpression::Simple {
                    column,
                    comparison: Comparison::Binary {
                        operator,
                        value: self.comparison_value(value, scope)?,
                    },
                })
            }
            Expression::Exists {
                in_collection,
                predicate,
            } => self.exists(in_collection, predicate.as_deref(), scope, depth),
        }
    }

    fn translate_all(
        &mut self,
        expressions: &[Expression],
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<Vec<WhereExpression>, CompilationError> {
        expressions
            .iter()
            .map(|expression| self.translate_expression(expression, scope, depth + 1))
            .collect()
    }

    /// The column a target names, along with its field path and the scope it is resolved in
    fn resolve_target<'s>(
        &'s self,
        target: &'s ComparisonTarget,
        scope: &'s Scope<'a>,
    ) -> Result<(&'s str, &'s [String], &'s Scope<'a>), CompilationError> {
        match target {
            ComparisonTarget::Column {
                name,
                field_path,
                path,
            } => {
                if !path.is_empty() {
                    return Err(CompilationError::not_supported(
                        "Comparisons across relationships are not supported",
                    ));
                }
                Ok((name, field_path.as_deref().unwrap_or_default(), scope))
            }
            ComparisonTarget::RootCollectionColumn { name, field_path } => {
                Ok((name, field_path.as_deref().unwrap_or_default(), &self.root))
            }
        }
    }

    fn comparison_target(
        &self,
        target: &ComparisonTarget,
        scope: &Scope<'a>,
        end: PathEnd,
    ) -> Result<PredicateColumn, CompilationError> {
        let (name, field_path, scope) = self.resolve_target(target, scope)?;

        let property = scope.object_type.properties.get(name).ok_or_else(|| {
            CompilationError::bad_request(format!(
                "Couldn't find field '{name}' in object type '{}'",
                scope.object_name
            ))
        })?;

        let nested_field =
            resolve_nested_field(self.schema, name, &property.typ, field_path, end)?;

        Ok(PredicateColumn::new(&scope.alias, nested_field))
    }

    fn comparison_value(
        &self,
        value: &RequestComparisonValue,
        scope: &Scope<'a>,
    ) -> Result<ComparisonValue, CompilationError> {
        match value {
            RequestComparisonValue::Scalar { value } => Ok(ComparisonValue::Literal(value.clone())),
            RequestComparisonValue::Variable { name } => Ok(ComparisonValue::Variable(name.clone())),
            RequestComparisonValue::Column { column } => {
                let (name, field_path, scope) = self.resolve_target(column, scope)?;
                let (path, _) = resolve_object_path(self.schema, scope, name, field_path)?;
                Ok(ComparisonValue::Column(path))
            }
        }
    }

    fn exists(
        &mut self,
        in_collection: &ExistsInCollection,
        predicate: Option<&Expression>,
        scope: &Scope<'a>,
        depth: usize,
    ) -> Result<WhereExpression, CompilationError> {
        let (column_name, arguments, field_path) = match in_collection {
            ExistsInCollection::Related { .. } => {
                return Err(CompilationError::not_supported(
                    "Exists over related collections is not supported",
                ));
            }
            ExistsInCollection::Unrelated { .. } => {
                return Err(CompilationError::not_supported(
                    "Exists over unrelated collections is not supported",
                ));
            }
            ExistsInCollection::NestedCollection {
                column_name,
                arguments,
                field_path,
            } => (column_name, arguments, field_path),
        };

        if !arguments.is_empty() {
            return Err(CompilationError::bad_request(
                "Nested collections don't accept arguments",
            ));
        }

        let (source, typ) = resolve_object_path(self.schema, scope, column_name, field_path)?;

        let TypeDefinition::Array { element_type } = typ.non_nullable() else {
            return Err(CompilationError::bad_request(format!(
                "Nested collection '{column_name}' is not an array"
            )));
        };

        self.nested_elements += 1;
        let element_alias = format!("nested_element_{}", self.nested_elements);
        debug!(%element_alias, %column_name, "Binding nested collection element");

        let predicate = match predicate {
            None => None,
            Some(predicate) => {
                let (element_name, element_object) = match element_type.non_nullable() {
                    TypeDefinition::Named {
                        name,
                        kind: NamedTypeKind::Object,
                    } => self
                        .schema
                        .object_type(name)
                        .map(|object_type| (name.as_str(), object_type)),
                    _ => None,
                }
                .ok_or_else(|| {
                    CompilationError::bad_request(format!(
                        "Elements of nested collection '{column_name}' are not objects"
                    ))
                })?;

                let element_scope = Scope {
                    alias: element_alias.clone(),
                    object_name: element_name,
                    object_type: element_object,
                };

                Some(Box::new(self.translate_expression(
                    predicate,
                    &element_scope,
                    depth + 1,
                )?))
            }
        };

        Ok(WhereExpression::Exists {
            source,
            element_alias,
            predicate,
        })
    }
}
