// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod collections_schema;
mod schema_response;
mod type_definition;

pub use collections_schema::{
    ArgumentDefinition, CollectionDefinition, CollectionsSchema, ObjectPropertyDefinition,
    ObjectTypeDefinition, ScalarTypeDefinition, SchemaError, is_safe_identifier,
};
pub use schema_response::{
    AggregateFunctionInfo, ArgumentInfo, CollectionInfo, ComparisonOperatorInfo, ObjectFieldInfo,
    ObjectTypeInfo, ScalarTypeInfo, SchemaResponse, TypeInfo,
};
pub use type_definition::{BuiltInScalarType, NamedTypeKind, NullOrUndefinability, TypeDefinition};
