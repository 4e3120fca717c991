// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Write;

use indexmap::IndexMap;
use serde_json::Value;

use super::{ExpressionBuilder, sql_query::SqlParameter};

/// Keywords of the query dialect. A property with one of these names can't be accessed with the
/// dot notation and request aliases may not use them.
const RESERVED_KEYWORDS: [&str; 51] = [
    "AND", "ARRAY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CAST", "CONVERT", "CROSS", "DESC",
    "DISTINCT", "ELSE", "END", "ESCAPE", "EXISTS", "FALSE", "FOR", "FROM", "GROUP", "HAVING", "IN",
    "INNER", "INSERT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON",
    "OR", "ORDER", "OUTER", "OVER", "RIGHT", "SELECT", "SET", "THEN", "TOP", "TRUE", "UDF",
    "UNDEFINED", "UPDATE", "VALUE", "WHEN", "WHERE", "WITH",
];

pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}

/// Accumulates the text and the parameters of one query.
///
/// A builder is created for each compilation and threaded through every
/// [`ExpressionBuilder::build`] call, so the state below is never shared between queries.
pub struct SQLBuilder {
    /// The SQL being built with placeholders for each parameter
    sql: String,
    /// Literal values bound so far, keyed by the (sanitized) name of the field they are compared
    /// against. A value's position in its list is its index in the placeholder (`@key_<index>`).
    params: IndexMap<String, Vec<Value>>,
    /// Number of `array_element_<n>` aliases handed out so far
    array_elements: usize,
}

impl Default for SQLBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SQLBuilder {
    pub fn new() -> Self {
        Self {
            sql: String::new(),
            params: IndexMap::new(),
            array_elements: 0,
        }
    }

    /// Push a string
    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    /// Push a character
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push a space. This is a common operation, so it is provided as a separate method.
    pub fn push_space(&mut self) {
        self.sql.push(' ');
    }

    /// Push a property access on whatever was pushed last: `.name`, or `["name"]` if the name
    /// is a keyword of the dialect.
    pub fn push_property<T: AsRef<str>>(&mut self, name: T) {
        let name = name.as_ref();
        if is_reserved_keyword(name) {
            self.push('[');
            self.push_string_literal(name);
            self.push(']');
        } else {
            self.push('.');
            self.push_str(name);
        }
    }

    /// Push a double-quoted string literal, escaping as needed
    pub fn push_string_literal<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push('"');
        for c in s.as_ref().chars() {
            match c {
                '"' => self.sql.push_str("\\\""),
                '\\' => self.sql.push_str("\\\\"),
                '\n' => self.sql.push_str("\\n"),
                '\r' => self.sql.push_str("\\r"),
                '\t' => self.sql.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(self.sql, "\\u{:04x}", c as u32);
                }
                c => self.sql.push(c),
            }
        }
        self.sql.push('"');
    }

    /// Push a placeholder for a literal value compared against the field `key`.
    ///
    /// Equal values for the same key share a placeholder, so comparing a field against the same
    /// literal twice binds it once.
    pub fn push_param(&mut self, key: &str, value: Value) {
        let key = sanitize_param_key(key);
        let values = self.params.entry(key.clone()).or_default();

        let index = match values.iter().position(|existing| existing == &value) {
            Some(index) => index,
            None => {
                values.push(value);
                values.len() - 1
            }
        };

        let _ = write!(self.sql, "@{key}_{index}");
    }

    /// A fresh alias to iterate over an array, numbered from 1 and never reused within a query
    pub fn next_array_element_alias(&mut self) -> String {
        self.array_elements += 1;
        format!("array_element_{}", self.array_elements)
    }

    /// Push elements of an iterator, separated by `sep`. The `push_elem` function provides
    /// the flexibility to map the elements (compared to [`SQLBuilder::push_elems`], which assumes that
    /// the elements implement [`ExpressionBuilder`] and [`build`](ExpressionBuilder::build) is all you need to call).
    pub fn push_iter<T>(
        &mut self,
        iter: impl ExactSizeIterator<Item = T>,
        sep: &str,
        push_elem: impl Fn(&mut Self, T),
    ) {
        let len = iter.len();
        for (i, item) in iter.enumerate() {
            push_elem(self, item);

            if i < len - 1 {
                self.sql.push_str(sep);
            }
        }
    }

    /// Push elements of a slice, separated by `sep`.
    pub fn push_elems<T: ExpressionBuilder>(&mut self, elems: &[T], sep: &str) {
        self.push_iter(elems.iter(), sep, |builder, elem| {
            elem.build(builder);
        });
    }

    /// Get the SQL string and the list of parameters. Calling this method should be the final step
    /// in building an SQL expression, and thus this builder consumes the `self`.
    ///
    /// Parameters are flattened key by key, in the order the keys were first used.
    pub fn into_sql(self) -> (String, Vec<SqlParameter>) {
        let params = self
            .params
            .into_iter()
            .flat_map(|(key, values)| {
                values
                    .into_iter()
                    .enumerate()
                    .map(move |(index, value)| SqlParameter {
                        name: format!("@{key}_{index}"),
                        value,
                    })
            })
            .collect();

        (self.sql, params)
    }
}

fn sanitize_param_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
