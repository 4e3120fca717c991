// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The SQL tree of a Cosmos DB NoSQL query and its rendering to text.
//!
//! Each node implements [`ExpressionBuilder`] and renders itself into a shared [`SQLBuilder`],
//! which accumulates the text along with the bound parameters.

mod expression_builder;
mod sql_builder;

pub mod column;
pub mod limit;
pub mod offset;
pub mod order;
pub mod predicate;
pub mod select;
pub mod sql_query;

pub use expression_builder::ExpressionBuilder;
pub use sql_builder::{SQLBuilder, is_reserved_keyword};
