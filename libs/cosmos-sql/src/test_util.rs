// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(test)]

//! Test assertions to check query text and parameters.

/// Assert that the given parameters match the expected `(name, value)` pairs, in order.
///
/// # Usage:
/// ```no_run
/// assert_params!(actual_params, ("@age_0", 19), ("@age_1", 18));
/// ```
macro_rules! assert_params {
    ($actual_params:expr) => {
        assert!($actual_params.is_empty(), "Extra actual parameters: {:?}", $actual_params);
    };
    ($actual_params:expr, $(($name:expr, $value:tt)),+ $(,)?) => {
        let expected: Vec<$crate::sql::sql_query::SqlParameter> = vec![
            $($crate::sql::sql_query::SqlParameter {
                name: $name.to_string(),
                value: serde_json::json!($value),
            }),+
        ];
        assert_eq!($actual_params, expected, "Parameter mismatch");
    };
}

/// Assert on the `(query, parameters)` pair produced by [`crate::sql::ExpressionBuilder::to_sql`].
macro_rules! assert_binding {
    ($actual:expr, $expected_stmt:expr) => {
        let (actual_stmt, actual_params) = $actual;
        assert_eq!(actual_stmt, $expected_stmt);
        assert_params!(actual_params);
    };
    ($actual:expr, $expected_stmt:expr, $($rest:tt)+) => {
        let (actual_stmt, actual_params) = $actual;
        assert_eq!(actual_stmt, $expected_stmt);
        assert_params!(actual_params, $($rest)+);
    };
}
