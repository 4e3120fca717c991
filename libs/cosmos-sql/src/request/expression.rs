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
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    And {
        expressions: Vec<Expression>,
    },
    Or {
        expressions: Vec<Expression>,
    },
    Not {
        expression: Box<Expression>,
    },
    UnaryComparisonOperator {
        column: ComparisonTarget,
        operator: UnaryComparisonOperator,
    },
    BinaryComparisonOperator {
        column: ComparisonTarget,
        operator: String,
        value: ComparisonValue,
    },
    Exists {
        in_collection: ExistsInCollection,
        #[serde(default)]
        predicate: Option<Box<Expression>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryComparisonOperator {
    IsNull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonTarget {
    Column {
        name: String,
        #[serde(default)]
        field_path: Option<Vec<String>>,
        /// Relationships to traverse before reaching the column
        #[serde(default)]
        path: Vec<PathElement>,
    },
    RootCollectionColumn {
        name: String,
        #[serde(default)]
        field_path: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonValue {
    Column { column: ComparisonTarget },
    Scalar { value: Value },
    Variable { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExistsInCollection {
    Related {
        relationship: String,
        #[serde(default)]
        arguments: IndexMap<String, Value>,
    },
    Unrelated {
        collection: String,
        #[serde(default)]
        arguments: IndexMap<String, Value>,
    },
    NestedCollection {
        column_name: String,
        #[serde(default)]
        arguments: IndexMap<String, Value>,
        #[serde(default)]
        field_path: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    pub relationship: String,
    #[serde(default)]
    pub arguments: IndexMap<String, Value>,
    #[serde(default)]
    pub predicate: Option<Box<Expression>>,
}

impl ComparisonTarget {
    pub fn column(name: impl Into<String>) -> Self {
        ComparisonTarget::Column {
            name: name.into(),
            field_path: None,
            path: vec![],
        }
    }

    pub fn nested_column<T: Into<String>>(
        name: impl Into<String>,
        field_path: impl IntoIterator<Item = T>,
    ) -> Self {
        ComparisonTarget::Column {
            name: name.into(),
            field_path: Some(field_path.into_iter().map(Into::into).collect()),
            path: vec![],
        }
    }
}
