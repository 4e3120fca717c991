// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::schema::{
    CollectionDefinition, CollectionsSchema, ObjectTypeDefinition, ScalarTypeDefinition,
    TypeDefinition,
};

use super::Scope;

fn scalar(name: &str) -> TypeDefinition {
    TypeDefinition::named_scalar(name)
}

fn object(name: &str) -> TypeDefinition {
    TypeDefinition::named_object(name)
}

/// A `users` collection with nested objects, arrays of objects and arrays of scalars
pub fn users_schema() -> CollectionsSchema {
    let mut schema = CollectionsSchema::default();

    schema.collections.insert(
        "users".to_string(),
        CollectionDefinition {
            description: None,
            arguments: vec![],
            result_type: object("User"),
        },
    );

    let object_types = [
        (
            "User",
            ObjectTypeDefinition::new([
                ("id", scalar("String")),
                ("name", scalar("String")),
                ("username", scalar("String")),
                ("age", TypeDefinition::nullable(scalar("Integer"))),
                ("min_age", TypeDefinition::nullable(scalar("Integer"))),
                ("score", scalar("Number")),
                ("is_active", scalar("Boolean")),
                ("value", scalar("String")),
                ("location", scalar("Point")),
                ("address", TypeDefinition::nullable(object("Address"))),
                ("addresses", TypeDefinition::array(object("Address"))),
                (
                    "tags",
                    TypeDefinition::nullable(TypeDefinition::array(scalar("String"))),
                ),
                (
                    "matrix",
                    TypeDefinition::array(TypeDefinition::array(scalar("Integer"))),
                ),
                (
                    "nested_array_object_object_array",
                    TypeDefinition::array(object("NestedArrayElement")),
                ),
                ("nested_object_object_object", object("NestedObjectB")),
            ]),
        ),
        (
            "Address",
            ObjectTypeDefinition::new([
                ("city", scalar("String")),
                ("zip", TypeDefinition::nullable(scalar("String"))),
                ("geo", TypeDefinition::nullable(object("Geo"))),
            ]),
        ),
        (
            "Geo",
            ObjectTypeDefinition::new([("lat", scalar("Number")), ("lng", scalar("Number"))]),
        ),
        (
            "NestedArrayElement",
            ObjectTypeDefinition::new([("b", object("NestedArrayB"))]),
        ),
        (
            "NestedArrayB",
            ObjectTypeDefinition::new([("c", TypeDefinition::array(object("NestedLeaf")))]),
        ),
        (
            "NestedObjectB",
            ObjectTypeDefinition::new([("b", object("NestedObjectC"))]),
        ),
        (
            "NestedObjectC",
            ObjectTypeDefinition::new([("c", object("NestedLeaf"))]),
        ),
        (
            "NestedLeaf",
            ObjectTypeDefinition::new([("d", scalar("Integer"))]),
        ),
    ];

    for (name, object_type) in object_types {
        schema.object_types.insert(name.to_string(), object_type);
    }

    schema
        .scalar_types
        .insert("Point".to_string(), ScalarTypeDefinition::default());

    schema
}

pub fn users_scope(schema: &CollectionsSchema) -> Scope<'_> {
    let (object_name, object_type) = schema
        .object_types
        .get_key_value("User")
        .expect("users schema declares User");

    Scope {
        alias: "root_users".to_string(),
        object_name,
        object_type,
    }
}
