// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;

use crate::operators::ComparisonOperatorDefinition;

use super::{
    ExpressionBuilder, SQLBuilder,
    column::{ColumnPath, NestedField, PredicateColumn},
    sql_query::VARIABLES_ALIAS,
};

/// The right-hand side of a binary comparison
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonValue {
    /// A literal, bound as a parameter
    Literal(Value),
    Column(ColumnPath),
    /// A batch variable, read from the joined variables row
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    IsNull,
    Binary {
        operator: &'static ComparisonOperatorDefinition,
        value: ComparisonValue,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WhereExpression {
    Simple {
        column: PredicateColumn,
        comparison: Comparison,
    },
    And(Vec<WhereExpression>),
    Or(Vec<WhereExpression>),
    Not(Box<WhereExpression>),
    /// Some element of the array at `source` (bound to `element_alias`) satisfies the predicate
    Exists {
        source: ColumnPath,
        element_alias: String,
        predicate: Option<Box<WhereExpression>>,
    },
}

impl WhereExpression {
    pub fn references_variables(&self) -> bool {
        match self {
            WhereExpression::Simple { comparison, .. } => matches!(
                comparison,
                Comparison::Binary {
                    value: ComparisonValue::Variable(_),
                    ..
                }
            ),
            WhereExpression::And(expressions) | WhereExpression::Or(expressions) => expressions
                .iter()
                .any(WhereExpression::references_variables),
            WhereExpression::Not(expression) => expression.references_variables(),
            WhereExpression::Exists { predicate, .. } => predicate
                .as_ref()
                .is_some_and(|predicate| predicate.references_variables()),
        }
    }
}

impl ExpressionBuilder for WhereExpression {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            WhereExpression::Simple { column, comparison } => {
                let param_key = column.param_key();
                build_nested_comparison(
                    ColumnPath::new(&column.prefix),
                    &column.nested_field,
                    comparison,
                    param_key,
                    builder,
                );
            }
            WhereExpression::And(expressions) => {
                build_connective(expressions, " AND ", "true", builder);
            }
            WhereExpression::Or(expressions) => {
                build_connective(expressions, " OR ", "false", builder);
            }
            WhereExpression::Not(expression) => {
                builder.push_str("NOT (");
                expression.build(builder);
                builder.push(')');
            }
            WhereExpression::Exists {
                source,
                element_alias,
                predicate,
            } => {
                builder.push_str("EXISTS(SELECT VALUE 1 FROM ");
                builder.push_str(element_alias);
                builder.push_str(" IN ");
                source.build(builder);
                if let Some(predicate) = predicate {
                    builder.push_str(" WHERE ");
                    predicate.build(builder);
                }
                builder.push(')');
            }
        }
    }
}

fn build_connective(
    expressions: &[WhereExpression],
    separator: &str,
    identity: &str,
    builder: &mut SQLBuilder,
) {
    if expressions.is_empty() {
        builder.push_str(identity);
    } else {
        builder.push_iter(expressions.iter(), separator, |builder, expression| {
            builder.push('(');
            expression.build(builder);
            builder.push(')');
        });
    }
}

/// Walk the nested field chain, opening an `EXISTS` over each array on the way, and apply the
/// comparison to the value at the end.
fn build_nested_comparison(
    path: ColumnPath,
    nested_field: &NestedField,
    comparison: &Comparison,
    param_key: &str,
    builder: &mut SQLBuilder,
) {
    match nested_field {
        NestedField::Object { field, nested } => {
            build_nested_comparison(
                path.with_field(field),
                nested,
                comparison,
                param_key,
                builder,
            );
        }
        NestedField::Array { field, nested } => {
            let source = match field {
                Some(field) => path.with_field(field),
                None => path,
            };
            let element_alias = builder.next_array_element_alias();

            builder.push_str("EXISTS(SELECT 1 FROM ");
            builder.push_str(&element_alias);
            builder.push_str(" IN ");
            source.build(builder);
            builder.push_str(" WHERE ");
            build_nested_comparison(
                ColumnPath::new(element_alias),
                nested,
                comparison,
                param_key,
                builder,
            );
            builder.push(')');
        }
        NestedField::Scalar { field, .. } | NestedField::Value { field } => {
            let lhs = match field {
                Some(field) => path.with_field(field),
                None => path,
            };
            build_comparison(&lhs, comparison, param_key, builder);
        }
    }
}

fn build_comparison(
    lhs: &ColumnPath,
    comparison: &Comparison,
    param_key: &str,
    builder: &mut SQLBuilder,
) {
    match comparison {
        Comparison::IsNull => {
            builder.push_str("IS_NULL(");
            lhs.build(builder);
            builder.push(')');
        }
        Comparison::Binary { operator, value } => {
            if operator.is_infix {
                lhs.build(builder);
                builder.push_space();
                builder.push_str(operator.dialect_name);
                builder.push_space();
                build_comparison_value(value, param_key, builder);
            } else {
                builder.push_str(operator.dialect_name);
                builder.push('(');
                lhs.build(builder);
                builder.push_str(", ");
                build_comparison_value(value, param_key, builder);
                builder.push(')');
            }
        }
    }
}

fn build_comparison_value(value: &ComparisonValue, param_key: &str, builder: &mut SQLBuilder) {
    match value {
        ComparisonValue::Literal(value) => builder.push_param(param_key, value.clone()),
        ComparisonValue::Column(column) => column.build(builder),
        ComparisonValue::Variable(name) => {
            builder.push_str(VARIABLES_ALIAS);
            builder.push('[');
            builder.push_string_literal(name);
            builder.push(']');
        }
    }
}
