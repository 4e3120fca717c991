// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::configuration::ConnectorConfig;

/// The configuration currently in effect.
///
/// Each request takes a snapshot with [`ConfigurationHandle::current`] and uses it throughout, so
/// replacing the configuration never affects a request already in flight.
pub struct ConfigurationHandle {
    config: RwLock<Arc<ConnectorConfig>>,
}

impl ConfigurationHandle {
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
        }
    }

    pub async fn current(&self) -> Arc<ConnectorConfig> {
        self.config.read().await.clone()
    }

    /// Swap in a new configuration, returning the previous one
    pub async fn replace(&self, config: ConnectorConfig) -> Arc<ConnectorConfig> {
        let config = Arc::new(config);
        info!(
            collections = config.schema.collections.len(),
            "Replacing configuration"
        );
        std::mem::replace(&mut *self.config.write().await, config)
    }
}
