// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fs;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{ArgMatches, Command};
use cosmos_sql::request::QueryRequest;

use super::{
    command::{CommandDefinition, config_dir_arg, output_arg, request_arg, required_path},
    util::{load_config, write_output},
};

pub struct ExplainCommandDefinition {}

#[async_trait]
impl CommandDefinition for ExplainCommandDefinition {
    fn command(&self) -> Command {
        Command::new("explain")
            .about("Compile a query request and print the SQL query with its parameters")
            .arg(config_dir_arg())
            .arg(request_arg())
            .arg(output_arg())
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let config = load_config(matches)?;

        let request_path = required_path(matches, "request")?;
        let content = fs::read_to_string(&request_path)
            .with_context(|| format!("Failed to read {}", request_path.display()))?;

        let request = QueryRequest::from_json(&content)?;
        let compiled = cosmos_sql::compile(&config.schema, &request)?;

        write_output(matches, &serde_json::to_string_pretty(&compiled.query)?)
    }
}
