// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgMatches, Command};

use super::{
    command::{CommandDefinition, config_dir_arg, output_arg},
    util::{load_config, write_output},
};

pub struct SchemaCommandDefinition {}

#[async_trait]
impl CommandDefinition for SchemaCommandDefinition {
    fn command(&self) -> Command {
        Command::new("schema")
            .about("Print the schema advertised to clients")
            .arg(config_dir_arg())
            .arg(output_arg())
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let config = load_config(matches)?;
        let schema = cosmos_connector::schema(&config);

        write_output(matches, &serde_json::to_string_pretty(&schema)?)
    }
}
