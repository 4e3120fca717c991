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
    request::{self, OrderByTarget, OrderDirection},
    schema::CollectionsSchema,
    sql::order::{OrderBy, OrderByElement, Ordering},
};

use super::{Scope, field_path::resolve_object_path};

pub(super) fn translate_order_by<'a>(
    schema: &'a CollectionsSchema,
    scope: &Scope<'a>,
    order_by: &request::OrderBy,
) -> Result<Option<OrderBy>, CompilationError> {
    if order_by.elements.is_empty() {
        return Ok(None);
    }

    let elements = order_by
        .elements
        .iter()
        .map(|element| {
            let ordering = match element.order_direction {
                OrderDirection::Asc => Ordering::Asc,
                OrderDirection::Desc => Ordering::Desc,
            };

            match &element.target {
                OrderByTarget::Column {
                    name,
                    field_path,
                    path,
                } => {
                    if !path.is_empty() {
                        return Err(CompilationError::not_supported(
                            "Ordering by a column of a related collection is not supported",
                        ));
                    }

                    let (column, _) = resolve_object_path(
                        schema,
                        scope,
                        name,
                        field_path.as_deref().unwrap_or_default(),
                    )?;
                    Ok(OrderByElement(column, ordering))
                }
                OrderByTarget::SingleColumnAggregate { .. }
                | OrderByTarget::StarCountAggregate { .. } => Err(
                    CompilationError::not_supported("Ordering by an aggregate is not supported"),
                ),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(OrderBy(elements)))
}
