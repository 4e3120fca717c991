// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;

use crate::schema::is_safe_identifier;

use super::{
    ExpressionBuilder, SQLBuilder,
    column::ColumnPath,
    is_reserved_keyword,
    limit::Limit,
    offset::Offset,
    order::OrderBy,
    predicate::WhereExpression,
};

/// A `SELECT` statement, either the top-level query or a correlated subquery projecting a
/// nested object or array.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQueryContext {
    /// Projected expressions, keyed by their alias in the result
    pub select: IndexMap<String, SelectColumn>,
    /// Select the (single) projected expression itself rather than an object holding it
    pub select_as_value: bool,
    /// Collect the rows of this query into an array when embedded in a parent query
    pub select_as_array: bool,
    pub from: Option<FromClause>,
    pub joins: Vec<JoinClause>,
    pub predicate: Option<WhereExpression>,
    pub order_by: Option<OrderBy>,
    pub offset: Option<Offset>,
    pub limit: Option<Limit>,
    pub is_aggregate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    Column(ColumnPath),
    Aggregate(AggregateSelection),
    Subquery(Box<SqlQueryContext>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateSelection {
    Count {
        column: ColumnPath,
        distinct: bool,
    },
    Function {
        dialect_name: &'static str,
        column: ColumnPath,
    },
    StarCount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
    /// `<container> <alias>`
    Container { container: String, alias: String },
    /// `<source> AS <alias>`
    Aliased { source: ColumnPath, alias: String },
    /// `<alias> IN <source>`, iterating over an array
    Iterate { source: ColumnPath, alias: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub alias: String,
    pub source: JoinSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinSource {
    /// The elements of an array bound as a parameter
    ParameterArray(String),
}

impl JoinClause {
    pub fn parameter_array(alias: impl Into<String>, param_name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            source: JoinSource::ParameterArray(param_name.into()),
        }
    }
}

impl SqlQueryContext {
    pub fn new(from: FromClause) -> Self {
        Self {
            select: IndexMap::new(),
            select_as_value: false,
            select_as_array: false,
            from: Some(from),
            joins: vec![],
            predicate: None,
            order_by: None,
            offset: None,
            limit: None,
            is_aggregate: false,
        }
    }
}

impl ExpressionBuilder for SqlQueryContext {
    /// Build a select statement of the form
    /// `SELECT [VALUE] <columns> FROM <source> [JOIN ...] [WHERE ...] [ORDER BY ...] [OFFSET <n> LIMIT <m>]`
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("SELECT ");

        if self.select.is_empty() {
            builder.push_str("VALUE {}");
        } else if self.select_as_value {
            builder.push_str("VALUE ");
            builder.push_iter(self.select.values(), ", ", |builder, column| {
                column.build_expression(builder);
            });
        } else if self.select.keys().all(|alias| is_plain_alias(alias)) {
            builder.push_iter(self.select.iter(), ", ", |builder, (alias, column)| {
                column.build_projected(builder);
                builder.push_str(" AS ");
                builder.push_str(alias);
            });
        } else {
            // Aliases that can't follow `AS` become the keys of an object literal instead
            builder.push_str("VALUE {");
            builder.push_iter(self.select.iter(), ", ", |builder, (alias, column)| {
                builder.push_string_literal(alias);
                builder.push_str(": ");
                column.build_projected(builder);
            });
            builder.push('}');
        }

        if let Some(from) = &self.from {
            builder.push_str(" FROM ");
            from.build(builder);
        }

        for join in &self.joins {
            builder.push_space();
            join.build(builder);
        }

        if let Some(predicate) = &self.predicate {
            builder.push_str(" WHERE ");
            predicate.build(builder);
        }

        if let Some(order_by) = &self.order_by {
            builder.push_space();
            order_by.build(builder);
        }

        // The dialect only accepts OFFSET and LIMIT together
        let pagination = match (self.offset, self.limit) {
            (None, None) => None,
            (offset, Some(limit)) => Some((offset.unwrap_or(Offset(0)), limit)),
            (Some(offset), None) => Some((offset, Limit::UNBOUNDED)),
        };
        if let Some((offset, limit)) = pagination {
            builder.push_space();
            offset.build(builder);
            builder.push_space();
            limit.build(builder);
        }
    }
}

impl SelectColumn {
    /// The projected expression alone (as used by `SELECT VALUE`)
    fn build_expression(&self, builder: &mut SQLBuilder) {
        match self {
            SelectColumn::Column(column) => column.build(builder),
            SelectColumn::Aggregate(aggregate) => aggregate.build(builder),
            SelectColumn::Subquery(subquery) => {
                if subquery.select_as_array {
                    builder.push_str("ARRAY(");
                } else {
                    builder.push('(');
                }
                subquery.build(builder);
                builder.push(')');
            }
        }
    }

    /// The projected expression as it appears under an alias
    fn build_projected(&self, builder: &mut SQLBuilder) {
        match self {
            SelectColumn::Column(column) => {
                // Absent properties are omitted from the result, so coalesce them to null
                column.build(builder);
                builder.push_str(" ?? null");
            }
            SelectColumn::Aggregate(aggregate) => aggregate.build(builder),
            SelectColumn::Subquery(subquery) if subquery.select_as_array => {
                builder.push('(');
                self.build_expression(builder);
                builder.push(')');
            }
            SelectColumn::Subquery(_) => self.build_expression(builder),
        }
    }
}

/// An alias that can be written as is after `AS`
fn is_plain_alias(alias: &str) -> bool {
    is_safe_identifier(alias) && !is_reserved_keyword(alias)
}

impl ExpressionBuilder for AggregateSelection {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            AggregateSelection::Count { column, distinct } => {
                if *distinct {
                    builder.push_str("DISTINCT ");
                }
                builder.push_str("COUNT(");
                column.build(builder);
                builder.push(')');
            }
            AggregateSelection::Function {
                dialect_name,
                column,
            } => {
                builder.push_str(dialect_name);
                builder.push('(');
                column.build(builder);
                builder.push(')');
            }
            AggregateSelection::StarCount => builder.push_str("COUNT(1)"),
        }
    }
}

impl ExpressionBuilder for FromClause {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            FromClause::Container { container, alias } => {
                builder.push_str(container);
                builder.push_space();
                builder.push_str(alias);
            }
            FromClause::Aliased { source, alias } => {
                source.build(builder);
                builder.push_str(" AS ");
                builder.push_str(alias);
            }
            FromClause::Iterate { source, alias } => {
                builder.push_str(alias);
                builder.push_str(" IN ");
                source.build(builder);
            }
        }
    }
}

impl ExpressionBuilder for JoinClause {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("JOIN ");
        builder.push_str(&self.alias);
        builder.push_str(" IN ");
        match &self.source {
            JoinSource::ParameterArray(param_name) => {
                builder.push_str("(SELECT VALUE ");
                builder.push_str(param_name);
                builder.push(')');
            }
        }
    }
}
