// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Comparison operators and aggregate functions available for each built-in scalar type.
//!
//! The table is built once and never mutated. A scalar type that isn't in the table (a custom
//! scalar, for example) has no operators beyond `is_null`.

use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::CompilationError;

pub const IS_NULL: &str = "is_null";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOperatorDefinition {
    /// The name used in requests (`eq`, `startswith`, ...)
    pub name: &'static str,
    /// The dialect's operator (`=`) or function (`STARTSWITH`)
    pub dialect_name: &'static str,
    /// Render as `lhs op rhs` rather than `OP(lhs, rhs)`
    pub is_infix: bool,
    /// Takes no right-hand side
    pub is_unary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateResultType {
    SameAsInput,
    Scalar(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFunctionDefinition {
    pub name: &'static str,
    pub dialect_name: &'static str,
    pub result_type: AggregateResultType,
}

impl AggregateFunctionDefinition {
    pub fn result_type_name<'a>(&self, input_type: &'a str) -> &'a str {
        match self.result_type {
            AggregateResultType::SameAsInput => input_type,
            AggregateResultType::Scalar(name) => name,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScalarOperators {
    pub comparison_operators: IndexMap<&'static str, ComparisonOperatorDefinition>,
    pub aggregate_functions: IndexMap<&'static str, AggregateFunctionDefinition>,
}

static SCALAR_OPERATORS: LazyLock<IndexMap<&'static str, ScalarOperators>> = LazyLock::new(|| {
    let numeric = || ScalarOperators {
        comparison_operators: comparison_table(ORDERING_OPERATORS.iter()),
        aggregate_functions: aggregate_table(NUMERIC_AGGREGATES.iter()),
    };

    let textual = || ScalarOperators {
        comparison_operators: comparison_table(
            ORDERING_OPERATORS.iter().chain(STRING_FUNCTIONS.iter()),
        ),
        aggregate_functions: aggregate_table(ORDERING_AGGREGATES.iter()),
    };

    IndexMap::from([
        ("Integer", numeric()),
        ("Number", numeric()),
        ("String", textual()),
        ("DateTime", textual()),
        (
            "Boolean",
            ScalarOperators {
                comparison_operators: comparison_table(EQUALITY_OPERATORS.iter()),
                aggregate_functions: aggregate_table(COUNT_AGGREGATE.iter()),
            },
        ),
    ])
});

// (name, dialect name, infix)
type OperatorEntry = (&'static str, &'static str, bool);

const EQUALITY_OPERATORS: [OperatorEntry; 2] = [("eq", "=", true), ("neq", "!=", true)];

const ORDERING_OPERATORS: [OperatorEntry; 6] = [
    ("eq", "=", true),
    ("neq", "!=", true),
    ("gt", ">", true),
    ("lt", "<", true),
    ("gte", ">=", true),
    ("lte", "<=", true),
];

const STRING_FUNCTIONS: [OperatorEntry; 4] = [
    ("contains", "CONTAINS", false),
    ("endswith", "ENDSWITH", false),
    ("startswith", "STARTSWITH", false),
    ("regexmatch", "REGEXMATCH", false),
];

const COUNT_AGGREGATE: [(&str, &str, AggregateResultType); 1] =
    [("count", "COUNT", AggregateResultType::Scalar("Integer"))];

const ORDERING_AGGREGATES: [(&str, &str, AggregateResultType); 3] = [
    ("count", "COUNT", AggregateResultType::Scalar("Integer")),
    ("min", "MIN", AggregateResultType::SameAsInput),
    ("max", "MAX", AggregateResultType::SameAsInput),
];

const NUMERIC_AGGREGATES: [(&str, &str, AggregateResultType); 5] = [
    ("count", "COUNT", AggregateResultType::Scalar("Integer")),
    ("sum", "SUM", AggregateResultType::SameAsInput),
    ("avg", "AVG", AggregateResultType::Scalar("Number")),
    ("min", "MIN", AggregateResultType::SameAsInput),
    ("max", "MAX", AggregateResultType::SameAsInput),
];

fn comparison_table<'a>(
    entries: impl Iterator<Item = &'a OperatorEntry>,
) -> IndexMap<&'static str, ComparisonOperatorDefinition> {
    let is_null = ComparisonOperatorDefinition {
        name: IS_NULL,
        dialect_name: "IS_NULL",
        is_infix: false,
        is_unary: true,
    };

    std::iter::once((IS_NULL, is_null))
        .chain(entries.map(|&(name, dialect_name, is_infix)| {
            (
                name,
                ComparisonOperatorDefinition {
                    name,
                    dialect_name,
                    is_infix,
                    is_unary: false,
                },
            )
        }))
        .collect()
}

fn aggregate_table<'a>(
    entries: impl Iterator<Item = &'a (&'static str, &'static str, AggregateResultType)>,
) -> IndexMap<&'static str, AggregateFunctionDefinition> {
    entries
        .map(|&(name, dialect_name, result_type)| {
            (
                name,
                AggregateFunctionDefinition {
                    name,
                    dialect_name,
                    result_type,
                },
            )
        })
        .collect()
}

/// Operators and aggregate functions registered for a scalar type, if any
pub fn scalar_operators(scalar_type: &str) -> Option<&'static ScalarOperators> {
    SCALAR_OPERATORS.get(scalar_type)
}

pub fn comparison_operator(
    scalar_type: &str,
    operator: &str,
) -> Result<&'static ComparisonOperatorDefinition, CompilationError> {
    scalar_operators(scalar_type)
        .and_then(|operators| operators.comparison_operators.get(operator))
        .ok_or_else(|| {
            CompilationError::bad_request(format!(
                "Comparison operator '{operator}' is not supported on scalar type '{scalar_type}'"
            ))
        })
}

pub fn aggregate_function(
    scalar_type: &str,
    function: &str,
) -> Result<&'static AggregateFunctionDefinition, CompilationError> {
    scalar_operators(scalar_type)
        .and_then(|operators| operators.aggregate_functions.get(function))
        .ok_or_else(|| {
            CompilationError::bad_request(format!(
                "Aggregate function '{function}' is not supported on scalar type '{scalar_type}'"
            ))
        })
}
