// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub u32);

impl Limit {
    /// Stands in for a missing limit when an offset is requested
    pub const UNBOUNDED: Limit = Limit(i32::MAX as u32);
}

impl ExpressionBuilder for Limit {
    /// Build expression of the form `LIMIT <limit>`
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("LIMIT ");
        builder.push_str(self.0.to_string());
    }
}
