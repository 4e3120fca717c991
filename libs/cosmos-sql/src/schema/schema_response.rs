// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The schema as advertised to clients: every type along with the operators and aggregate
//! functions it supports.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::operators::{self, IS_NULL};

use super::{
    collections_schema::CollectionsSchema,
    type_definition::{BuiltInScalarType, TypeDefinition},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaResponse {
    pub scalar_types: IndexMap<String, ScalarTypeInfo>,
    pub object_types: IndexMap<String, ObjectTypeInfo>,
    pub collections: Vec<CollectionInfo>,
    pub functions: Vec<Value>,
    pub procedures: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScalarTypeInfo {
    pub aggregate_functions: IndexMap<String, AggregateFunctionInfo>,
    pub comparison_operators: IndexMap<String, ComparisonOperatorInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateFunctionInfo {
    pub result_type: TypeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonOperatorInfo {
    Equal,
    Custom { argument_type: TypeInfo },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeInfo {
    Named { name: String },
    Nullable { underlying_type: Box<TypeInfo> },
    Array { element_type: Box<TypeInfo> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectTypeInfo {
    pub description: Option<String>,
    pub fields: IndexMap<String, ObjectFieldInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectFieldInfo {
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub typ: TypeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentInfo {
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub typ: TypeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub description: Option<String>,
    pub arguments: IndexMap<String, ArgumentInfo>,
    #[serde(rename = "type")]
    pub typ: String,
    pub uniqueness_constraints: IndexMap<String, Value>,
    pub foreign_keys: IndexMap<String, Value>,
}

impl From<&TypeDefinition> for TypeInfo {
    fn from(definition: &TypeDefinition) -> Self {
        match definition {
            TypeDefinition::Array { element_type } => TypeInfo::Array {
                element_type: Box::new(element_type.as_ref().into()),
            },
            TypeDefinition::Nullable {
                underlying_type, ..
            } => TypeInfo::Nullable {
                underlying_type: Box::new(underlying_type.as_ref().into()),
            },
            TypeDefinition::Named { name, .. } => TypeInfo::named(name),
        }
    }
}

impl TypeInfo {
    fn named(name: impl Into<String>) -> Self {
        TypeInfo::Named { name: name.into() }
    }
}

fn scalar_type_info(scalar_type: &str) -> ScalarTypeInfo {
    let Some(scalar_operators) = operators::scalar_operators(scalar_type) else {
        return ScalarTypeInfo::default();
    };

    let comparison_operators = scalar_operators
        .comparison_operators
        .values()
        .filter(|operator| operator.name != IS_NULL)
        .map(|operator| {
            let info = if operator.name == "eq" {
                ComparisonOperatorInfo::Equal
            } else {
                ComparisonOperatorInfo::Custom {
                    argument_type: TypeInfo::named(scalar_type),
                }
            };
            (operator.name.to_string(), info)
        })
        .collect();

    let aggregate_functions = scalar_operators
        .aggregate_functions
        .values()
        .map(|function| {
            (
                function.name.to_string(),
                AggregateFunctionInfo {
                    result_type: TypeInfo::named(function.result_type_name(scalar_type)),
                },
            )
        })
        .collect();

    ScalarTypeInfo {
        aggregate_functions,
        comparison_operators,
    }
}

impl CollectionsSchema {
    pub fn to_schema_response(&self) -> SchemaResponse {
        let scalar_types = BuiltInScalarType::ALL
            .iter()
            .map(|scalar| scalar.name().to_string())
            .chain(self.scalar_types.keys().cloned())
            .map(|name| {
                let info = scalar_type_info(&name);
                (name, info)
            })
            .collect();

        let object_types = self
            .object_types
            .iter()
            .map(|(name, object_type)| {
                let fields = object_type
                    .properties
                    .iter()
                    .map(|(property_name, property)| {
                        (
                            property_name.clone(),
                            ObjectFieldInfo {
                                description: property.description.clone(),
                                typ: (&property.typ).into(),
                            },
                        )
                    })
                    .collect();

                (
                    name.clone(),
                    ObjectTypeInfo {
                        description: object_type.description.clone(),
                        fields,
                    },
                )
            })
            .collect();

        let collections = self
            .collections
            .iter()
            .map(|(name, collection)| CollectionInfo {
                name: name.clone(),
                description: collection.description.clone(),
                arguments: collection
                    .arguments
                    .iter()
                    .map(|argument| {
                        (
                            argument.argument_name.clone(),
                            ArgumentInfo {
                                description: argument.description.clone(),
                                typ: (&argument.typ).into(),
                            },
                        )
                    })
                    .collect(),
                typ: collection.result_type.base_named_type().0.to_string(),
                uniqueness_constraints: IndexMap::new(),
                foreign_keys: IndexMap::new(),
            })
            .collect();

        SchemaResponse {
            scalar_types,
            object_types,
            collections,
            functions: vec![],
            procedures: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{
        CollectionDefinition, ObjectTypeDefinition, ScalarTypeDefinition, TypeDefinition,
    };

    fn schema() -> CollectionsSchema {
        let mut schema = CollectionsSchema::default();
        schema.collections.insert(
            "users".to_string(),
            CollectionDefinition {
                description: Some("All users".to_string()),
                arguments: vec![],
                result_type: TypeDefinition::named_object("User"),
            },
        );
        schema.object_types.insert(
            "User".to_string(),
            ObjectTypeDefinition::new([
                ("id", TypeDefinition::named_scalar("String")),
                (
                    "tags",
                    TypeDefinition::nullable(TypeDefinition::array(TypeDefinition::named_scalar(
                        "String",
                    ))),
                ),
            ]),
        );
        schema
            .scalar_types
            .insert("Point".to_string(), ScalarTypeDefinition::default());
        schema
    }

    #[test]
    fn scalar_capabilities() {
        let response = schema().to_schema_response();

        assert_eq!(
            response.scalar_types.keys().collect::<Vec<_>>(),
            vec!["String", "Number", "Integer", "Boolean", "DateTime", "Point"]
        );

        let boolean = serde_json::to_value(&response.scalar_types["Boolean"]).unwrap();
        assert_eq!(
            boolean,
            json!({
                "aggregate_functions": {
                    "count": { "result_type": { "type": "named", "name": "Integer" } }
                },
                "comparison_operators": {
                    "eq": { "type": "equal" },
                    "neq": { "type": "custom", "argument_type": { "type": "named", "name": "Boolean" } }
                }
            })
        );

        assert_eq!(response.scalar_types["Point"], ScalarTypeInfo::default());
    }

    #[test]
    fn objects_and_collections() {
        let response = serde_json::to_value(schema().to_schema_response()).unwrap();

        assert_eq!(
            response["object_types"]["User"]["fields"]["tags"]["type"],
            json!({
                "type": "nullable",
                "underlying_type": {
                    "type": "array",
                    "element_type": { "type": "named", "name": "String" }
                }
            })
        );
        assert_eq!(
            response["collections"],
            json!([{
                "name": "users",
                "description": "All users",
                "arguments": {},
                "type": "User",
                "uniqueness_constraints": {},
                "foreign_keys": {}
            }])
        );
    }
}
