// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Response shapes returned to the client

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// The result of a query: one row set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryResponse(pub Vec<RowSet>);

/// The aggregates of an aggregate query, or the rows of any other query
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RowSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<IndexMap<String, Value>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainResponse {
    pub details: IndexMap<String, String>,
}

/// A capability with no further options, serialized as `{}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LeafCapability {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub query: QueryCapabilities,
    pub mutation: MutationCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<LeafCapability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<LeafCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<LeafCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<LeafCapability>,
    pub nested_fields: NestedFieldCapabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NestedFieldCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<LeafCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<LeafCapability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MutationCapabilities {}
