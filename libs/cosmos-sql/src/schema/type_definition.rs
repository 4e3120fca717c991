// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

/// The type of a document property (or a collection's result).
///
/// Serialized with a `type` tag, for example
/// `{"type": "nullable", "underlyingType": {"type": "named", "name": "String", "kind": "scalar"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeDefinition {
    Array {
        #[serde(rename = "elementType")]
        element_type: Box<TypeDefinition>,
    },
    Nullable {
        #[serde(rename = "underlyingType")]
        underlying_type: Box<TypeDefinition>,
        #[serde(
            rename = "nullOrUndefinability",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        null_or_undefinability: Option<NullOrUndefinability>,
    },
    Named {
        name: String,
        kind: NamedTypeKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamedTypeKind {
    Object,
    Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullOrUndefinability {
    AcceptsNullOnly,
    AcceptsUndefinedOnly,
    AcceptsEither,
}

/// Scalar types every configuration can use without declaring them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInScalarType {
    String,
    Number,
    Integer,
    Boolean,
    DateTime,
}

impl BuiltInScalarType {
    pub const ALL: [BuiltInScalarType; 5] = [
        BuiltInScalarType::String,
        BuiltInScalarType::Number,
        BuiltInScalarType::Integer,
        BuiltInScalarType::Boolean,
        BuiltInScalarType::DateTime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltInScalarType::String => "String",
            BuiltInScalarType::Number => "Number",
            BuiltInScalarType::Integer => "Integer",
            BuiltInScalarType::Boolean => "Boolean",
            BuiltInScalarType::DateTime => "DateTime",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scalar| scalar.name() == name)
    }
}

impl TypeDefinition {
    pub fn named_scalar(name: impl Into<String>) -> Self {
        TypeDefinition::Named {
            name: name.into(),
            kind: NamedTypeKind::Scalar,
        }
    }

    pub fn named_object(name: impl Into<String>) -> Self {
        TypeDefinition::Named {
            name: name.into(),
            kind: NamedTypeKind::Object,
        }
    }

    pub fn array(element_type: TypeDefinition) -> Self {
        TypeDefinition::Array {
            element_type: Box::new(element_type),
        }
    }

    pub fn nullable(underlying_type: TypeDefinition) -> Self {
        TypeDefinition::Nullable {
            underlying_type: Box::new(underlying_type),
            null_or_undefinability: Some(NullOrUndefinability::AcceptsNullOnly),
        }
    }

    /// The named type after stripping every array and nullable wrapper
    pub fn base_named_type(&self) -> (&str, NamedTypeKind) {
        match self {
            TypeDefinition::Array { element_type } => element_type.base_named_type(),
            TypeDefinition::Nullable {
                underlying_type, ..
            } => underlying_type.base_named_type(),
            TypeDefinition::Named { name, kind } => (name, *kind),
        }
    }

    /// Strip nullable wrappers (but not array ones)
    pub fn non_nullable(&self) -> &TypeDefinition {
        match self {
            TypeDefinition::Nullable {
                underlying_type, ..
            } => underlying_type.non_nullable(),
            _ => self,
        }
    }
}
