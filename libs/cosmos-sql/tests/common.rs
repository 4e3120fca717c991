// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use cosmos_sql::{
    CompilationError, CompiledQuery, compile, request::QueryRequest, schema::CollectionsSchema,
};
use serde_json::{Value, json};

/// The schema of a `users` container, written the way it appears in a configuration file
pub fn users_schema() -> CollectionsSchema {
    serde_json::from_value(json!({
        "collections": {
            "users": {
                "description": "Registered users",
                "resultType": { "type": "named", "name": "User", "kind": "object" }
            },
            "orphans": {
                "resultType": { "type": "named", "name": "Missing", "kind": "object" }
            }
        },
        "objectTypes": {
            "User": {
                "properties": {
                    "id": { "type": { "type": "named", "name": "String", "kind": "scalar" } },
                    "name": { "type": { "type": "named", "name": "String", "kind": "scalar" } },
                    "username": { "type": { "type": "named", "name": "String", "kind": "scalar" } },
                    "age": {
                        "type": {
                            "type": "nullable",
                            "underlyingType": { "type": "named", "name": "Integer", "kind": "scalar" }
                        }
                    },
                    "address": { "type": { "type": "named", "name": "Address", "kind": "object" } },
                    "addresses": {
                        "type": {
                            "type": "array",
                            "elementType": { "type": "named", "name": "Address", "kind": "object" }
                        }
                    },
                    "nested_array_object_object_array": {
                        "type": {
                            "type": "array",
                            "elementType": { "type": "named", "name": "Outer", "kind": "object" }
                        }
                    },
                    "nested_object_object_object": {
                        "type": { "type": "named", "name": "ObjectB", "kind": "object" }
                    }
                }
            },
            "Address": {
                "properties": {
                    "city": { "type": { "type": "named", "name": "String", "kind": "scalar" } },
                    "zip": { "type": { "type": "named", "name": "String", "kind": "scalar" } }
                }
            },
            "Outer": {
                "properties": { "b": { "type": { "type": "named", "name": "Inner", "kind": "object" } } }
            },
            "Inner": {
                "properties": {
                    "c": {
                        "type": {
                            "type": "array",
                            "elementType": { "type": "named", "name": "Leaf", "kind": "object" }
                        }
                    }
                }
            },
            "ObjectB": {
                "properties": { "b": { "type": { "type": "named", "name": "ObjectC", "kind": "object" } } }
            },
            "ObjectC": {
                "properties": { "c": { "type": { "type": "named", "name": "Leaf", "kind": "object" } } }
            },
            "Leaf": {
                "properties": { "d": { "type": { "type": "named", "name": "Integer", "kind": "scalar" } } }
            }
        }
    }))
    .unwrap()
}

/// Compile a request over `users`, given as the body of its `query`
pub fn compile_query(query: Value) -> Result<CompiledQuery, CompilationError> {
    compile_request(json!({
        "collection": "users",
        "query": query,
        "arguments": {},
        "collection_relationships": {}
    }))
}

pub fn compile_request(request: Value) -> Result<CompiledQuery, CompilationError> {
    let request = QueryRequest::from_value(request)?;
    compile(&users_schema(), &request)
}

/// The parameters of a compiled query as `(name, value)` pairs
pub fn parameters(compiled: &CompiledQuery) -> Vec<(String, Value)> {
    compiled
        .query
        .parameters
        .iter()
        .map(|parameter| (parameter.name.clone(), parameter.value.clone()))
        .collect()
}

pub fn column(name: &str) -> Value {
    json!({ "type": "column", "name": name, "path": [] })
}

pub fn nested_column(name: &str, field_path: &[&str]) -> Value {
    json!({ "type": "column", "name": name, "field_path": field_path, "path": [] })
}

pub fn compare(column: Value, operator: &str, value: Value) -> Value {
    json!({
        "type": "binary_comparison_operator",
        "column": column,
        "operator": operator,
        "value": { "type": "scalar", "value": value }
    })
}
