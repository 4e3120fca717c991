// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The query request accepted by the compiler.
//!
//! Requests are parsed eagerly into these closed types, so an unknown tag (an expression type,
//! say) is rejected while parsing rather than while compiling.

mod expression;
mod query;

pub use expression::{
    ComparisonTarget, ComparisonValue, ExistsInCollection, Expression, PathElement,
    UnaryComparisonOperator,
};
pub use query::{
    Aggregate, Field, NestedArray, NestedField, NestedObject, OrderBy, OrderByElement,
    OrderByTarget, OrderDirection, Query, QueryRequest,
};

use crate::CompilationError;

impl QueryRequest {
    pub fn from_json(json: &str) -> Result<Self, CompilationError> {
        serde_json::from_str(json)
            .map_err(|e| CompilationError::bad_request(format!("Invalid query request: {e}")))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CompilationError> {
        serde_json::from_value(value)
            .map_err(|e| CompilationError::bad_request(format!("Invalid query request: {e}")))
    }
}
