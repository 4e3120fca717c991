// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;

use commands::{
    check::CheckCommandDefinition,
    command::{CommandDefinition, SubcommandDefinition},
    explain::ExplainCommandDefinition,
    schema::SchemaCommandDefinition,
};

mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    cosmos_connector::logging::init();

    let subcommand_definition = SubcommandDefinition::new(
        "ndc-cosmos",
        "Command line interface for the Cosmos DB connector",
        vec![
            Box::new(CheckCommandDefinition {}),
            Box::new(ExplainCommandDefinition {}),
            Box::new(SchemaCommandDefinition {}),
        ],
    );

    let command = subcommand_definition
        .command()
        .version(env!("CARGO_PKG_VERSION"));

    let matches = command.get_matches();

    subcommand_definition.execute(&matches).await
}
