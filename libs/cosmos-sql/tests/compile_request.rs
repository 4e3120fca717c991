// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod common;

use common::{column, compare, compile_query, compile_request, nested_column, parameters};
use cosmos_sql::{CompilationError, MAX_NESTING_DEPTH};
use serde_json::json;
use test_log::test;

#[test]
fn no_fields_selects_empty_objects() {
    let compiled = compile_query(json!({})).unwrap();

    assert_eq!(compiled.query.query, "SELECT VALUE {} FROM users root_users");
    assert!(compiled.query.parameters.is_empty());
    assert!(!compiled.is_aggregate);
}

#[test]
fn fields_predicate_order_and_pagination() {
    let compiled = compile_query(json!({
        "fields": {
            "id": { "type": "column", "column": "id" },
            "name": { "type": "column", "column": "name" }
        },
        "predicate": compare(column("age"), "gt", json!(21)),
        "order_by": {
            "elements": [{ "order_direction": "asc", "target": column("name") }]
        },
        "limit": 10,
        "offset": 5
    }))
    .unwrap();

    assert_eq!(
        compiled.query.query,
        "SELECT root_users.id ?? null AS id, root_users.name ?? null AS name FROM users root_users \
         WHERE root_users.age > @age_0 ORDER BY root_users.name ASC OFFSET 5 LIMIT 10"
    );
    assert_eq!(parameters(&compiled), vec![("@age_0".to_string(), json!(21))]);
}

#[test]
fn limit_without_offset() {
    let compiled = compile_query(json!({ "limit": 3 })).unwrap();

    assert_eq!(
        compiled.query.query,
        "SELECT VALUE {} FROM users root_users OFFSET 0 LIMIT 3"
    );
}

#[test]
fn nested_array_predicate() {
    let compiled = compile_query(json!({
        "predicate": compare(
            nested_column("nested_array_object_object_array", &["b", "c", "d"]),
            "lte",
            json!(2)
        )
    }))
    .unwrap();

    assert_eq!(
        compiled.query.query,
        "SELECT VALUE {} FROM users root_users WHERE EXISTS(SELECT 1 FROM array_element_1 IN root_users.nested_array_object_object_array \
         WHERE EXISTS(SELECT 1 FROM array_element_2 IN array_element_1.b.c WHERE array_element_2.d <= @d_0))"
    );
    assert_eq!(parameters(&compiled), vec![("@d_0".to_string(), json!(2))]);
}

#[test]
fn parameters_shared_by_leaf_field_name() {
    let compiled = compile_query(json!({
        "predicate": {
            "type": "and",
            "expressions": [
                compare(nested_column("nested_object_object_object", &["b", "c", "d"]), "lte", json!(2)),
                compare(nested_column("nested_object_object_object", &["b", "c", "d"]), "lte", json!(3)),
                compare(column("username"), "eq", json!("Kacie-Leffler"))
            ]
        }
    }))
    .unwrap();

    assert_eq!(
        compiled.query.query,
        "SELECT VALUE {} FROM users root_users WHERE (root_users.nested_object_object_object.b.c.d <= @d_0) \
         AND (root_users.nested_object_object_object.b.c.d <= @d_1) AND (root_users.username = @username_0)"
    );
    assert_eq!(
        parameters(&compiled),
        vec![
            ("@d_0".to_string(), json!(2)),
            ("@d_1".to_string(), json!(3)),
            ("@username_0".to_string(), json!("Kacie-Leffler")),
        ]
    );
}

#[test]
fn aggregates() {
    let compiled = compile_query(json!({
        "aggregates": {
            "count": { "type": "star_count" },
            "oldest": { "type": "single_column", "column": "age", "function": "max" },
            "cities": { "type": "column_count", "column": "address", "field_path": ["city"], "distinct": true }
        }
    }))
    .unwrap();

    assert!(compiled.is_aggregate);
    assert_eq!(
        compiled.query.query,
        "SELECT COUNT(1) AS count, MAX(root_users.age) AS oldest, DISTINCT COUNT(root_users.address.city) AS cities \
         FROM users root_users"
    );
}

#[test]
fn nested_selection_and_exists() {
    let compiled = compile_query(json!({
        "fields": {
            "cities": {
                "type": "column",
                "column": "addresses",
                "fields": {
                    "type": "array",
                    "fields": { "type": "object", "fields": { "city": { "type": "column", "column": "city" } } }
                }
            }
        },
        "predicate": {
            "type": "exists",
            "in_collection": { "type": "nested_collection", "column_name": "addresses", "arguments": {}, "field_path": [] },
            "predicate": compare(column("zip"), "startswith", json!("98"))
        }
    }))
    .unwrap();

    assert_eq!(
        compiled.query.query,
        "SELECT (ARRAY(SELECT _subquery_parent_addresses.city ?? null AS city FROM _subquery_parent_addresses IN root_users.addresses)) AS cities \
         FROM users root_users WHERE EXISTS(SELECT VALUE 1 FROM nested_element_1 IN root_users.addresses WHERE STARTSWITH(nested_element_1.zip, @zip_0))"
    );
    assert_eq!(parameters(&compiled), vec![("@zip_0".to_string(), json!("98"))]);
}

#[test]
fn null_check_on_object_with_quoted_aliases() {
    let compiled = compile_query(json!({
        "fields": {
            "id": { "type": "column", "column": "id" },
            "select": { "type": "column", "column": "name" }
        },
        "predicate": { "type": "unary_comparison_operator", "column": column("address"), "operator": "is_null" }
    }))
    .unwrap();

    assert_eq!(
        compiled.query.query,
        "SELECT VALUE {\"id\": root_users.id ?? null, \"select\": root_users.name ?? null} FROM users root_users \
         WHERE IS_NULL(root_users.address)"
    );
    assert!(compiled.query.parameters.is_empty());
}

#[test]
fn variables_bound_as_joined_array() {
    let compiled = compile_request(json!({
        "collection": "users",
        "query": {
            "fields": { "id": { "type": "column", "column": "id" } },
            "predicate": {
                "type": "binary_comparison_operator",
                "column": column("name"),
                "operator": "eq",
                "value": { "type": "variable", "name": "name" }
            }
        },
        "arguments": {},
        "collection_relationships": {},
        "variables": [{ "name": "Alice" }, { "name": "Bob" }]
    }))
    .unwrap();

    assert_eq!(
        compiled.query.query,
        r#"SELECT root_users.id ?? null AS id FROM users root_users JOIN vars IN (SELECT VALUE @vars) WHERE root_users.name = vars["name"]"#
    );
    assert_eq!(
        parameters(&compiled),
        vec![(
            "@vars".to_string(),
            json!([{ "name": "Alice" }, { "name": "Bob" }])
        )]
    );
}

#[test]
fn missing_variables_rejected() {
    let result = compile_query(json!({
        "predicate": {
            "type": "binary_comparison_operator",
            "column": column("name"),
            "operator": "eq",
            "value": { "type": "variable", "name": "name" }
        }
    }));

    assert!(matches!(result, Err(CompilationError::BadRequest(_))));
}

#[test]
fn fields_with_aggregates_not_supported() {
    let result = compile_query(json!({
        "fields": { "id": { "type": "column", "column": "id" } },
        "aggregates": { "count": { "type": "star_count" } }
    }));

    assert!(matches!(result, Err(CompilationError::NotSupported(_))));
}

#[test]
fn ordering_by_aggregates_or_relationships_not_supported() {
    let result = compile_query(json!({
        "order_by": {
            "elements": [{ "order_direction": "desc", "target": { "type": "star_count_aggregate", "path": [] } }]
        }
    }));
    assert!(matches!(result, Err(CompilationError::NotSupported(_))));

    let result = compile_query(json!({
        "order_by": {
            "elements": [{
                "order_direction": "desc",
                "target": { "type": "column", "name": "name", "path": [{ "relationship": "author", "arguments": {} }] }
            }]
        }
    }));
    assert!(matches!(result, Err(CompilationError::NotSupported(_))));
}

#[test]
fn invalid_collections() {
    let result = compile_request(json!({
        "collection": "posts",
        "query": {},
        "arguments": {},
        "collection_relationships": {}
    }));
    assert!(matches!(result, Err(CompilationError::BadRequest(_))));

    let result = compile_request(json!({
        "collection": "users",
        "query": {},
        "arguments": { "limit": { "type": "literal", "value": 1 } },
        "collection_relationships": {}
    }));
    assert!(matches!(result, Err(CompilationError::BadRequest(_))));

    let result = compile_request(json!({
        "collection": "users",
        "query": {},
        "arguments": {},
        "collection_relationships": { "author": {} }
    }));
    assert!(matches!(result, Err(CompilationError::BadRequest(_))));

    // The collection's object type isn't declared
    let result = compile_request(json!({
        "collection": "orphans",
        "query": {},
        "arguments": {},
        "collection_relationships": {}
    }));
    assert!(matches!(result, Err(CompilationError::InternalServerError(_))));
}

#[test]
fn malformed_requests_rejected() {
    let result = compile_query(json!({
        "predicate": { "type": "like", "column": column("name"), "value": "A%" }
    }));
    assert!(matches!(result, Err(CompilationError::BadRequest(_))));

    let mut predicate = compare(column("age"), "eq", json!(1));
    for _ in 0..MAX_NESTING_DEPTH {
        predicate = json!({ "type": "not", "expression": predicate });
    }
    let result = compile_query(json!({ "predicate": predicate }));
    assert!(matches!(result, Err(CompilationError::BadRequest(_))));
}
