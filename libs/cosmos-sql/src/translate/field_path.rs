// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    CompilationError,
    schema::{CollectionsSchema, NamedTypeKind, TypeDefinition},
    sql::column::{ColumnPath, NestedField},
};

use super::{MAX_NESTING_DEPTH, Scope};

fn check_depth(field_path: &[String]) -> Result<(), CompilationError> {
    if field_path.len() > MAX_NESTING_DEPTH {
        Err(CompilationError::bad_request(format!(
            "Field path is longer than the maximum of {MAX_NESTING_DEPTH} fields"
        )))
    } else {
        Ok(())
    }
}

/// What the end of a predicate's field path must be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PathEnd {
    /// A scalar, compared by an operator of its type. Arrays at the end are iterated over.
    Scalar,
    /// Whatever value is found there, including a whole array or object (null checks)
    AnyValue,
}

/// Resolve the path from the column `column_name` (of type `column_type`) to the value a
/// predicate tests. Arrays the path passes through are iterated over.
pub(super) fn resolve_nested_field(
    schema: &CollectionsSchema,
    column_name: &str,
    column_type: &TypeDefinition,
    field_path: &[String],
    end: PathEnd,
) -> Result<NestedField, CompilationError> {
    check_depth(field_path)?;
    resolve(schema, column_type, field_path, Some(column_name), end)
}

/// `pending_field` is the field through which `typ` was reached, and is attached to the link
/// `typ` resolves to (if `None`, `typ` is an array's element type).
fn resolve(
    schema: &CollectionsSchema,
    typ: &TypeDefinition,
    field_path: &[String],
    pending_field: Option<&str>,
    end: PathEnd,
) -> Result<NestedField, CompilationError> {
    if end == PathEnd::AnyValue && field_path.is_empty() {
        return Ok(NestedField::Value {
            field: pending_field.map(str::to_string),
        });
    }

    match typ {
        TypeDefinition::Nullable {
            underlying_type, ..
        } => resolve(schema, underlying_type, field_path, pending_field, end),
        TypeDefinition::Array { element_type } => Ok(NestedField::Array {
            field: pending_field.map(str::to_string),
            nested: Box::new(resolve(schema, element_type, field_path, None, end)?),
        }),
        TypeDefinition::Named {
            name,
            kind: NamedTypeKind::Object,
        } => {
            let object_type = schema.object_type(name).ok_or_else(|| {
                CompilationError::bad_request(format!("Couldn't find object type '{name}'"))
            })?;

            let Some((head, tail)) = field_path.split_first() else {
                return Err(CompilationError::bad_request(format!(
                    "Field path ends at an object of type '{name}' rather than a scalar"
                )));
            };

            let property = object_type.properties.get(head).ok_or_else(|| {
                CompilationError::not_supported(format!(
                    "Couldn't find field '{head}' in object type '{name}'"
                ))
            })?;

            let nested = resolve(schema, &property.typ, tail, Some(head), end)?;

            Ok(match pending_field {
                Some(field) => NestedField::Object {
                    field: field.to_string(),
                    nested: Box::new(nested),
                },
                None => nested,
            })
        }
        TypeDefinition::Named {
            name,
            kind: NamedTypeKind::Scalar,
        } => {
            if !field_path.is_empty() {
                return Err(CompilationError::bad_request(
                    "scalar field cannot have nested fields",
                ));
            }

            Ok(NestedField::Scalar {
                field: pending_field.map(str::to_string),
                scalar_type: name.clone(),
            })
        }
    }
}

/// Follow `field_path` from the column `column_name` through object properties only. Returns
/// the path reached and its type.
pub(super) fn resolve_object_path<'a>(
    schema: &'a CollectionsSchema,
    scope: &Scope<'a>,
    column_name: &str,
    field_path: &[String],
) -> Result<(ColumnPath, &'a TypeDefinition), CompilationError> {
    check_depth(field_path)?;

    let property = scope.object_type.properties.get(column_name).ok_or_else(|| {
        CompilationError::bad_request(format!(
            "Couldn't find field '{column_name}' in object type '{}'",
            scope.object_name
        ))
    })?;

    let mut path = ColumnPath::new(&scope.alias).with_field(column_name);
    let mut typ = &property.typ;

    for field in field_path {
        match typ.non_nullable() {
            TypeDefinition::Named {
                name,
                kind: NamedTypeKind::Object,
            } => {
                let object_type = schema.object_type(name).ok_or_else(|| {
                    CompilationError::bad_request(format!("Couldn't find object type '{name}'"))
                })?;
                let property = object_type.properties.get(field).ok_or_else(|| {
                    CompilationError::not_supported(format!(
                        "Couldn't find field '{field}' in object type '{name}'"
                    ))
                })?;

                path = path.with_field(field);
                typ = &property.typ;
            }
            TypeDefinition::Named {
                kind: NamedTypeKind::Scalar,
                ..
            } => {
                return Err(CompilationError::bad_request(
                    "scalar field cannot have nested fields",
                ));
            }
            _ => {
                return Err(CompilationError::not_supported(format!(
                    "Field path '{}' crosses an array",
                    field_path.join(".")
                )));
            }
        }
    }

    Ok((path, typ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::test_schema::{users_schema, users_scope};

    fn path(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|field| field.to_string()).collect()
    }

    fn column_type<'a>(schema: &'a CollectionsSchema, column: &str) -> &'a TypeDefinition {
        &schema.object_type("User").unwrap().properties[column].typ
    }

    #[test]
    fn nested_arrays_and_objects() {
        let schema = users_schema();
        let column = "nested_array_object_object_array";

        let resolved = resolve_nested_field(
            &schema,
            column,
            column_type(&schema, column),
            &path(&["b", "c", "d"]),
            PathEnd::Scalar,
        )
        .unwrap();

        assert_eq!(
            resolved,
            NestedField::Array {
                field: Some(column.to_string()),
                nested: Box::new(NestedField::Object {
                    field: "b".to_string(),
                    nested: Box::new(NestedField::Array {
                        field: Some("c".to_string()),
                        nested: Box::new(NestedField::Scalar {
                            field: Some("d".to_string()),
                            scalar_type: "Integer".to_string(),
                        }),
                    }),
                }),
            }
        );
    }

    #[test]
    fn plain_nullable_scalar() {
        let schema = users_schema();

        assert_eq!(
            resolve_nested_field(&schema, "age", column_type(&schema, "age"), &[], PathEnd::Scalar)
                .unwrap(),
            NestedField::Scalar {
                field: Some("age".to_string()),
                scalar_type: "Integer".to_string(),
            }
        );
    }

    #[test]
    fn resolution_errors() {
        let schema = users_schema();

        // Path continues past a scalar
        assert!(matches!(
            resolve_nested_field(
                &schema,
                "age",
                column_type(&schema, "age"),
                &path(&["x"]),
                PathEnd::Scalar
            ),
            Err(CompilationError::BadRequest(_))
        ));

        // Path ends at an object
        assert!(matches!(
            resolve_nested_field(
                &schema,
                "address",
                column_type(&schema, "address"),
                &[],
                PathEnd::Scalar
            ),
            Err(CompilationError::BadRequest(_))
        ));

        // Unknown nested field
        assert!(matches!(
            resolve_nested_field(
                &schema,
                "address",
                column_type(&schema, "address"),
                &path(&["planet"]),
                PathEnd::Scalar
            ),
            Err(CompilationError::NotSupported(_))
        ));

        // Too deep
        let too_long = vec!["a".to_string(); MAX_NESTING_DEPTH + 1];
        assert!(matches!(
            resolve_nested_field(
                &schema,
                "address",
                column_type(&schema, "address"),
                &too_long,
                PathEnd::Scalar
            ),
            Err(CompilationError::BadRequest(_))
        ));
    }

    #[test]
    fn whole_values_for_null_checks() {
        let schema = users_schema();
        let resolve_value = |column: &str, fields: &[&str]| {
            resolve_nested_field(
                &schema,
                column,
                column_type(&schema, column),
                &path(fields),
                PathEnd::AnyValue,
            )
        };

        // A nullable array is tested as a whole rather than element by element
        assert_eq!(
            resolve_value("tags", &[]).unwrap(),
            NestedField::Value {
                field: Some("tags".to_string())
            }
        );
        assert_eq!(
            resolve_value("address", &[]).unwrap(),
            NestedField::Value {
                field: Some("address".to_string())
            }
        );
        assert_eq!(
            resolve_value("address", &["geo"]).unwrap(),
            NestedField::Object {
                field: "address".to_string(),
                nested: Box::new(NestedField::Value {
                    field: Some("geo".to_string())
                }),
            }
        );

        // Arrays in the middle of the path are still iterated over
        assert_eq!(
            resolve_value("addresses", &["zip"]).unwrap(),
            NestedField::Array {
                field: Some("addresses".to_string()),
                nested: Box::new(NestedField::Value {
                    field: Some("zip".to_string())
                }),
            }
        );

        assert!(matches!(
            resolve_value("age", &["x"]),
            Err(CompilationError::BadRequest(_))
        ));
    }

    #[test]
    fn object_paths() {
        let schema = users_schema();
        let scope = users_scope(&schema);

        let (column_path, typ) =
            resolve_object_path(&schema, &scope, "address", &path(&["city"])).unwrap();
        assert_eq!(
            column_path,
            ColumnPath::new("root_users").with_fields(["address", "city"])
        );
        assert_eq!(typ, &TypeDefinition::named_scalar("String"));

        assert!(matches!(
            resolve_object_path(&schema, &scope, "unknown", &[]),
            Err(CompilationError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_object_path(&schema, &scope, "addresses", &path(&["city"])),
            Err(CompilationError::NotSupported(_))
        ));
    }
}
