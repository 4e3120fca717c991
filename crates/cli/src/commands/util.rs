// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ArgMatches;
use cosmos_connector::ConnectorConfig;

use super::command::{optional_path, required_path};

pub(super) fn load_config(matches: &ArgMatches) -> Result<ConnectorConfig> {
    let config_dir = required_path(matches, "config-dir")?;
    Ok(ConnectorConfig::load(&config_dir)?)
}

/// Write `content` to the file given with `--output`, or to stdout
pub(super) fn write_output(matches: &ArgMatches, content: &str) -> Result<()> {
    match optional_path(matches, "output") {
        Some(output) => write_file(&output, content),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, format!("{content}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}
