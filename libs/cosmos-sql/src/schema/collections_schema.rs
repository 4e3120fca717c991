// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sql::is_reserved_keyword;

use super::type_definition::{BuiltInScalarType, NamedTypeKind, TypeDefinition};

/// Identifiers are spliced into query text unquoted, so they must be plain identifiers
static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

pub fn is_safe_identifier(name: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(name)
}

/// The schema of a database: its collections (containers) and the types of their documents.
///
/// Loaded once per configuration and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsSchema {
    pub collections: IndexMap<String, CollectionDefinition>,
    pub object_types: IndexMap<String, ObjectTypeDefinition>,
    #[serde(default)]
    pub scalar_types: IndexMap<String, ScalarTypeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDefinition {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDefinition>,
    pub result_type: TypeDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDefinition {
    pub argument_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub typ: TypeDefinition,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeDefinition {
    #[serde(default)]
    pub description: Option<String>,
    pub properties: IndexMap<String, ObjectPropertyDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPropertyDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub typ: TypeDefinition,
}

/// Custom scalar types carry no information yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarTypeDefinition {}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid {kind} name '{name}': names must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier { kind: &'static str, name: String },

    #[error("Collection name '{0}' is a keyword of the query language")]
    ReservedCollectionName(String),

    #[error("Collection '{collection}' must have a named object result type")]
    InvalidCollectionType { collection: String },

    #[error("Unknown object type '{name}' referenced by {referrer}")]
    UnknownObjectType { name: String, referrer: String },

    #[error("Unknown scalar type '{name}' referenced by {referrer}")]
    UnknownScalarType { name: String, referrer: String },
}

impl ObjectPropertyDefinition {
    pub fn new(typ: TypeDefinition) -> Self {
        Self {
            property_name: None,
            description: None,
            typ,
        }
    }
}

impl ObjectTypeDefinition {
    pub fn new(properties: impl IntoIterator<Item = (&'static str, TypeDefinition)>) -> Self {
        Self {
            description: None,
            properties: properties
                .into_iter()
                .map(|(name, typ)| (name.to_string(), ObjectPropertyDefinition::new(typ)))
                .collect(),
        }
    }
}

impl CollectionsSchema {
    pub fn collection(&self, name: &str) -> Option<&CollectionDefinition> {
        self.collections.get(name)
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectTypeDefinition> {
        self.object_types.get(name)
    }

    pub fn is_known_scalar(&self, name: &str) -> bool {
        BuiltInScalarType::from_name(name).is_some() || self.scalar_types.contains_key(name)
    }

    /// Check the invariants the compiler relies on: every identifier is safe to splice into
    /// query text and every named type resolves.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (collection_name, collection) in &self.collections {
            check_identifier("collection", collection_name)?;
            // Collection names are spliced into the FROM clause, where bracket notation isn't
            // available
            if is_reserved_keyword(collection_name) {
                return Err(SchemaError::ReservedCollectionName(collection_name.clone()));
            }

            match collection.result_type.non_nullable() {
                TypeDefinition::Named {
                    name,
                    kind: NamedTypeKind::Object,
                } => {
                    if self.object_type(name).is_none() {
                        return Err(SchemaError::UnknownObjectType {
                            name: name.clone(),
                            referrer: format!("collection '{collection_name}'"),
                        });
                    }
                }
                _ => {
                    return Err(SchemaError::InvalidCollectionType {
                        collection: collection_name.clone(),
                    });
                }
            }
        }

        for (object_name, object_type) in &self.object_types {
            check_identifier("object type", object_name)?;

            for (property_name, property) in &object_type.properties {
                check_identifier("property", property_name)?;

                let referrer = format!("property '{object_name}.{property_name}'");
                match property.typ.base_named_type() {
                    (name, NamedTypeKind::Object) if self.object_type(name).is_none() => {
                        return Err(SchemaError::UnknownObjectType {
                            name: name.to_string(),
                            referrer,
                        });
                    }
                    (name, NamedTypeKind::Scalar) if !self.is_known_scalar(name) => {
                        return Err(SchemaError::UnknownScalarType {
                            name: name.to_string(),
                            referrer,
                        });
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

fn check_identifier(kind: &'static str, name: &str) -> Result<(), SchemaError> {
    if is_safe_identifier(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_schema() -> CollectionsSchema {
        CollectionsSchema {
            collections: IndexMap::from([(
                "users".to_string(),
                CollectionDefinition {
                    description: None,
                    arguments: vec![],
                    result_type: TypeDefinition::named_object("User"),
                },
            )]),
            object_types: IndexMap::from([(
                "User".to_string(),
                ObjectTypeDefinition::new([
                    ("id", TypeDefinition::named_scalar("String")),
                    ("age", TypeDefinition::named_scalar("Integer")),
                ]),
            )]),
            scalar_types: IndexMap::new(),
        }
    }

    #[test]
    fn valid_schema() {
        assert_eq!(users_schema().validate(), Ok(()));
    }

    #[test]
    fn unsafe_property_name() {
        let mut schema = users_schema();
        schema.object_types["User"].properties.insert(
            "first-name".to_string(),
            ObjectPropertyDefinition::new(TypeDefinition::named_scalar("String")),
        );

        assert_eq!(
            schema.validate(),
            Err(SchemaError::InvalidIdentifier {
                kind: "property",
                name: "first-name".to_string()
            })
        );
    }

    #[test]
    fn keyword_collection_name() {
        let mut schema = users_schema();
        schema.collections.insert(
            "order".to_string(),
            CollectionDefinition {
                description: None,
                arguments: vec![],
                result_type: TypeDefinition::named_object("User"),
            },
        );

        assert_eq!(
            schema.validate(),
            Err(SchemaError::ReservedCollectionName("order".to_string()))
        );
    }

    #[test]
    fn keyword_property_names_allowed() {
        let mut schema = users_schema();
        schema.object_types["User"].properties.insert(
            "value".to_string(),
            ObjectPropertyDefinition::new(TypeDefinition::named_scalar("String")),
        );

        assert_eq!(schema.validate(), Ok(()));
    }

    #[test]
    fn dangling_object_reference() {
        let mut schema = users_schema();
        schema.object_types["User"].properties.insert(
            "address".to_string(),
            ObjectPropertyDefinition::new(TypeDefinition::nullable(
                TypeDefinition::named_object("Address"),
            )),
        );

        assert_eq!(
            schema.validate(),
            Err(SchemaError::UnknownObjectType {
                name: "Address".to_string(),
                referrer: "property 'User.address'".to_string()
            })
        );
    }

    #[test]
    fn custom_scalar_must_be_declared() {
        let mut schema = users_schema();
        schema.object_types["User"].properties.insert(
            "location".to_string(),
            ObjectPropertyDefinition::new(TypeDefinition::named_scalar("Point")),
        );
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownScalarType { .. })
        ));

        schema
            .scalar_types
            .insert("Point".to_string(), ScalarTypeDefinition::default());
        assert_eq!(schema.validate(), Ok(()));
    }

    #[test]
    fn parse_configuration_shape() {
        let json = r#"{
            "collections": {
                "users": {
                    "description": null,
                    "arguments": [],
                    "resultType": { "type": "named", "name": "User", "kind": "object" }
                }
            },
            "objectTypes": {
                "User": {
                    "description": "A user",
                    "properties": {
                        "id": {
                            "propertyName": "id",
                            "description": null,
                            "type": { "type": "named", "name": "String", "kind": "scalar" }
                        }
                    }
                }
            },
            "scalarTypes": {}
        }"#;

        let schema: CollectionsSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.validate(), Ok(()));
        assert_eq!(
            schema.object_type("User").unwrap().description.as_deref(),
            Some("A user")
        );
    }
}
