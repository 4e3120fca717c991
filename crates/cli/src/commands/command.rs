// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command, value_parser};

#[async_trait]
pub trait CommandDefinition: Send + Sync {
    fn command(&self) -> Command;

    async fn execute(&self, matches: &ArgMatches) -> Result<()>;
}

/// A command whose only job is to dispatch to one of its subcommands
pub struct SubcommandDefinition {
    name: &'static str,
    about: &'static str,
    subcommands: Vec<Box<dyn CommandDefinition>>,
}

impl SubcommandDefinition {
    pub fn new(
        name: &'static str,
        about: &'static str,
        subcommands: Vec<Box<dyn CommandDefinition>>,
    ) -> Self {
        Self {
            name,
            about,
            subcommands,
        }
    }

    fn find(&self, name: &str) -> Option<&dyn CommandDefinition> {
        self.subcommands
            .iter()
            .map(|subcommand| subcommand.as_ref())
            .find(|subcommand| subcommand.command().get_name() == name)
    }
}

#[async_trait]
impl CommandDefinition for SubcommandDefinition {
    fn command(&self) -> Command {
        Command::new(self.name)
            .about(self.about)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .disable_help_subcommand(true)
            .subcommands(self.subcommands.iter().map(|subcommand| subcommand.command()))
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let Some((name, sub_matches)) = matches.subcommand() else {
            return Err(anyhow!("Expected a subcommand of `{}`", self.name));
        };

        match self.find(name) {
            Some(subcommand) => subcommand.execute(sub_matches).await,
            None => Err(anyhow!("Unknown subcommand: {name}")),
        }
    }
}

pub fn required_path(matches: &ArgMatches, arg_id: &str) -> Result<PathBuf> {
    optional_path(matches, arg_id).ok_or_else(|| anyhow!("Missing required argument `{arg_id}`"))
}

pub fn optional_path(matches: &ArgMatches, arg_id: &str) -> Option<PathBuf> {
    matches.get_one::<PathBuf>(arg_id).cloned()
}

fn positional_path(id: &'static str, index: usize) -> Arg {
    Arg::new(id)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .index(index)
}

pub fn config_dir_arg() -> Arg {
    positional_path("config-dir", 1)
        .help("The configuration directory")
        .long_help("The directory holding the connector's config.json")
}

pub fn request_arg() -> Arg {
    positional_path("request", 2).help("Path to a JSON query request")
}

pub fn output_arg() -> Arg {
    Arg::new("output")
        .help("Write to this file instead of stdout")
        .short('o')
        .long("output")
        .value_parser(value_parser!(PathBuf))
        .num_args(1)
}
