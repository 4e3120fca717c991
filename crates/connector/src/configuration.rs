// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use cosmos_sql::schema::{CollectionsSchema, SchemaError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::environment::Environment;

pub const CONFIG_FILE_NAME: &str = "config.json";

const ENDPOINT_ENV: &str = "AZURE_COSMOS_ENDPOINT";
const DATABASE_NAME_ENV: &str = "AZURE_COSMOS_DB_NAME";
const KEY_ENV: &str = "AZURE_COSMOS_KEY";
const MANAGED_CLIENT_ID_ENV: &str = "AZURE_COSMOS_MANAGED_CLIENT_ID";

/// The contents of `config.json` in a configuration directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    pub connection: ConnectionConfig,
    pub schema: CollectionsSchema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub endpoint: String,
    pub database_name: String,
    pub authentication: Authentication,
}

/// How to authenticate with the account. Either way, the secret itself is read from the named
/// environment variable rather than stored in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Authentication {
    Key {
        #[serde(rename = "fromEnvVar")]
        from_env_var: String,
    },
    ManagedIdentity {
        #[serde(rename = "fromEnvVar")]
        from_env_var: String,
    },
}

/// Resolved credentials, ready to hand to a database client
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Key(String),
    ManagedIdentity { client_id: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Key(_) => f.write_str("Key(<redacted>)"),
            Credentials::ManagedIdentity { client_id } => f
                .debug_struct("ManagedIdentity")
                .field("client_id", client_id)
                .finish(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),

    #[error("{0} environment variable is not defined")]
    MissingEnvVar(String),

    #[error(
        "Either the AZURE_COSMOS_KEY or the AZURE_COSMOS_MANAGED_CLIENT_ID environment variable is expected, not both"
    )]
    ConflictingCredentials,
}

impl ConnectorConfig {
    /// Read, parse, and validate `config.json` in `config_dir`
    #[instrument(name = "ConnectorConfig::load", skip_all, fields(config_dir = %config_dir.display()))]
    pub fn load(config_dir: &Path) -> Result<Self, ConfigurationError> {
        let path = config_dir.join(CONFIG_FILE_NAME);

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigurationError::Io {
            path: path.clone(),
            source,
        })?;

        let config = Self::parse(&content).map_err(|source| ConfigurationError::Parse {
            path: path.clone(),
            source,
        })?;

        config.validate()?;

        debug!(
            collections = config.schema.collections.len(),
            object_types = config.schema.object_types.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(self.schema.validate()?)
    }
}

impl ConnectionConfig {
    /// Build the connection from `AZURE_COSMOS_ENDPOINT`, `AZURE_COSMOS_DB_NAME`, and exactly one
    /// of `AZURE_COSMOS_KEY` or `AZURE_COSMOS_MANAGED_CLIENT_ID`.
    pub fn from_env(env: &dyn Environment) -> Result<Self, ConfigurationError> {
        let required = |key: &str| {
            env.get_non_empty(key)
                .ok_or_else(|| ConfigurationError::MissingEnvVar(key.to_string()))
        };

        let endpoint = required(ENDPOINT_ENV)?;
        let database_name = required(DATABASE_NAME_ENV)?;

        let key = env.get_non_empty(KEY_ENV);
        let managed_client_id = env.get_non_empty(MANAGED_CLIENT_ID_ENV);

        let authentication = match (key, managed_client_id) {
            (Some(_), Some(_)) => return Err(ConfigurationError::ConflictingCredentials),
            (Some(_), None) => Authentication::Key {
                from_env_var: KEY_ENV.to_string(),
            },
            (None, Some(_)) => Authentication::ManagedIdentity {
                from_env_var: MANAGED_CLIENT_ID_ENV.to_string(),
            },
            (None, None) => {
                return Err(ConfigurationError::MissingEnvVar(format!(
                    "{KEY_ENV} or {MANAGED_CLIENT_ID_ENV}"
                )));
            }
        };

        Ok(Self {
            endpoint,
            database_name,
            authentication,
        })
    }

    pub fn credentials(&self, env: &dyn Environment) -> Result<Credentials, ConfigurationError> {
        let read = |key: &str| {
            env.get_non_empty(key)
                .ok_or_else(|| ConfigurationError::MissingEnvVar(key.to_string()))
        };

        match &self.authentication {
            Authentication::Key { from_env_var } => read(from_env_var.as_str()).map(Credentials::Key),
            Authentication::ManagedIdentity { from_env_var } => {
                read(from_env_var.as_str()).map(|client_id| Credentials::ManagedIdentity { client_id })
            }
        }
    }
}
