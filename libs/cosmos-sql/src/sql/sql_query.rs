// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CompilationError;

use super::{
    ExpressionBuilder, SQLBuilder,
    select::{JoinClause, SqlQueryContext},
};

/// Name of the parameter carrying the batch variables
pub const VARIABLES_PARAM: &str = "@vars";
/// Alias under which each set of batch variables is joined to the rows
pub const VARIABLES_ALIAS: &str = "vars";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParameter {
    pub name: String,
    pub value: Value,
}

/// A query ready to be sent to the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuerySpec {
    pub query: String,
    pub parameters: Vec<SqlParameter>,
}

/// Render a query, binding the batch variables if its predicate refers to any.
pub fn assemble(
    mut context: SqlQueryContext,
    variables: Option<&[IndexMap<String, Value>]>,
) -> Result<SqlQuerySpec, CompilationError> {
    let uses_variables = context
        .predicate
        .as_ref()
        .is_some_and(|predicate| predicate.references_variables());

    let variables = if uses_variables {
        match variables {
            Some(variables) if !variables.is_empty() => {
                context.joins.push(JoinClause::parameter_array(
                    VARIABLES_ALIAS,
                    VARIABLES_PARAM,
                ));
                Some(variables)
            }
            _ => {
                return Err(CompilationError::bad_request(
                    "The query refers to variables, but no variables were supplied",
                ));
            }
        }
    } else {
        None
    };

    let mut builder = SQLBuilder::new();
    context.build(&mut builder);
    let (query, mut parameters) = builder.into_sql();

    if let Some(variables) = variables {
        let value = Value::Array(
            variables
                .iter()
                .map(|variable_set| {
                    Value::Object(
                        variable_set
                            .iter()
                            .map(|(name, value)| (name.clone(), value.clone()))
                            .collect::<Map<String, Value>>(),
                    )
                })
                .collect(),
        );

        parameters.push(SqlParameter {
            name: VARIABLES_PARAM.to_string(),
            value,
        });
    }

    Ok(SqlQuerySpec { query, parameters })
}
