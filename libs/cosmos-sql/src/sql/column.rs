// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder};

/// A property reached from a correlation alias through object properties only, such as
/// `root_users.address.city`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPath {
    pub alias: String,
    pub fields: Vec<String>,
}

impl ColumnPath {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            fields: vec![],
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn with_fields<T: Into<String>>(mut self, fields: impl IntoIterator<Item = T>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

impl ExpressionBuilder for ColumnPath {
    /// Build expression of the form `<alias>.<field>.<field>...`
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str(&self.alias);
        for field in &self.fields {
            builder.push_property(field);
        }
    }
}

/// The path from a column to the value a predicate tests, crossing objects and arrays.
///
/// The chain starts at the column itself. An `Array` link iterates over the path accumulated so
/// far (extended by its `field`, if any); the links after it are relative to each element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedField {
    Object {
        field: String,
        nested: Box<NestedField>,
    },
    Array {
        field: Option<String>,
        nested: Box<NestedField>,
    },
    Scalar {
        field: Option<String>,
        scalar_type: String,
    },
    /// The value at the end of the path whatever its type, as tested by null checks
    Value { field: Option<String> },
}

impl NestedField {
    /// The type of the scalar at the end of the chain, if it ends at a scalar
    pub fn scalar_type(&self) -> Option<&str> {
        match self {
            NestedField::Object { nested, .. } | NestedField::Array { nested, .. } => {
                nested.scalar_type()
            }
            NestedField::Scalar { scalar_type, .. } => Some(scalar_type),
            NestedField::Value { .. } => None,
        }
    }

    /// The name of the innermost named field. An array of scalars compares its elements, in
    /// which case this is the array's field.
    pub fn leaf_field_name(&self) -> Option<&str> {
        match self {
            NestedField::Object { field, nested } => {
                nested.leaf_field_name().or(Some(field.as_str()))
            }
            NestedField::Array { field, nested } => {
                nested.leaf_field_name().or(field.as_deref())
            }
            NestedField::Scalar { field, .. } | NestedField::Value { field } => field.as_deref(),
        }
    }
}

/// The left-hand side of a comparison: a column of the document bound to `prefix`, along with
/// the path to the compared scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateColumn {
    pub prefix: String,
    pub nested_field: NestedField,
}

impl PredicateColumn {
    pub fn new(prefix: impl Into<String>, nested_field: NestedField) -> Self {
        Self {
            prefix: prefix.into(),
            nested_field,
        }
    }

    pub fn scalar_type(&self) -> Option<&str> {
        self.nested_field.scalar_type()
    }

    /// The key under which literals compared against this column are bound
    pub fn param_key(&self) -> &str {
        self.nested_field.leaf_field_name().unwrap_or(&self.prefix)
    }
}
