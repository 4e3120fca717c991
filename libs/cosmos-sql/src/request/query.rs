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

use super::expression::{Expression, PathElement};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub collection: String,
    pub query: Query,
    #[serde(default)]
    pub arguments: IndexMap<String, Value>,
    #[serde(default)]
    pub collection_relationships: IndexMap<String, Value>,
    /// Sets of batch variables, each mapping a variable name to its value
    #[serde(default)]
    pub variables: Option<Vec<IndexMap<String, Value>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub aggregates: Option<IndexMap<String, Aggregate>>,
    #[serde(default)]
    pub fields: Option<IndexMap<String, Field>>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    #[serde(default)]
    pub predicate: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Field {
    Column {
        column: String,
        #[serde(default)]
        fields: Option<NestedField>,
    },
    Relationship {
        query: Box<Query>,
        relationship: String,
        #[serde(default)]
        arguments: IndexMap<String, Value>,
    },
}

/// A selection of the inside of an object or array column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NestedField {
    Object(NestedObject),
    Array(NestedArray),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedObject {
    pub fields: IndexMap<String, Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedArray {
    pub fields: Box<NestedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Aggregate {
    ColumnCount {
        column: String,
        #[serde(default)]
        field_path: Option<Vec<String>>,
        distinct: bool,
    },
    SingleColumn {
        column: String,
        #[serde(default)]
        field_path: Option<Vec<String>>,
        function: String,
    },
    StarCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByElement {
    pub order_direction: OrderDirection,
    pub target: OrderByTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderByTarget {
    Column {
        name: String,
        #[serde(default)]
        field_path: Option<Vec<String>>,
        #[serde(default)]
        path: Vec<PathElement>,
    },
    SingleColumnAggregate {
        column: String,
        function: String,
        #[serde(default)]
        path: Vec<PathElement>,
    },
    StarCountAggregate {
        #[serde(default)]
        path: Vec<PathElement>,
    },
}
