// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Compiles NDC-style query requests into Cosmos DB NoSQL query text.
//!
//! The crate is organized in layers:
//! - [`schema`]: the collection/object/scalar type model loaded from configuration.
//! - [`operators`]: the static table of comparison operators and aggregate functions per scalar type.
//! - [`request`]: the typed query request accepted by the compiler.
//! - `translate`: validates a request against the schema and produces an SQL tree.
//! - `sql`: the SQL tree itself, which renders to text and parameters through [`sql::SQLBuilder`].
//!
//! All compilation is synchronous and side-effect free. A compilation owns its own builder, so
//! concurrent compilations against the same schema need no coordination.

#[macro_use]
#[cfg(test)]
mod test_util;

mod compile_error;
pub mod operators;
pub mod request;
pub mod schema;
pub mod sql;
mod translate;

pub use compile_error::CompilationError;
pub use sql::sql_query::{SqlParameter, SqlQuerySpec};
pub use translate::{CompiledQuery, MAX_NESTING_DEPTH, compile, translate};
