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
use colored::Colorize;
use cosmos_connector::SystemEnvironment;

use super::{
    command::{CommandDefinition, config_dir_arg},
    util::load_config,
};

pub struct CheckCommandDefinition {}

#[async_trait]
impl CommandDefinition for CheckCommandDefinition {
    fn command(&self) -> Command {
        Command::new("check")
            .about("Validate the configuration and list its collections")
            .arg(config_dir_arg())
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let config = load_config(matches)?;

        println!("{}", "Configuration is valid".green());
        println!(
            "Database '{}' at {}",
            config.connection.database_name, config.connection.endpoint
        );

        for (name, collection) in &config.schema.collections {
            let (object_type, _) = collection.result_type.base_named_type();
            let property_count = config
                .schema
                .object_type(object_type)
                .map(|object_type| object_type.properties.len())
                .unwrap_or_default();

            println!(
                "  {} -> {object_type} ({property_count} properties)",
                name.bold()
            );
        }

        if let Err(error) = config.connection.credentials(&SystemEnvironment) {
            println!("{} {error}", "warning:".yellow());
        }

        Ok(())
    }
}
