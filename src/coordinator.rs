// Copyright 2026 the vidgrid authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::CoordinatorConfig;
use crate::diagnostics::{self, MemoryMetrics};
use crate::engine::EngineError;
use crate::player::{PlayerId, VideoPlayer};

/// Error type for player registration.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The registration was abandoned while waiting on the load gate or
    /// during the load itself.
    #[error("registration canceled")]
    Canceled,
    /// The player's load operation failed. Other players are unaffected.
    #[error("load failed: {0}")]
    Load(#[from] EngineError),
}

/// Owns the registry of active players and the bounded load gate.
///
/// Construct one coordinator per playback host and pass it explicitly to
/// collaborators; there is no ambient instance. The gate is the only
/// cross-player synchronization primitive: any number of registrations may
/// await it concurrently, and permits are released on every exit path.
pub struct PlaybackCoordinator {
    registry: Mutex<HashMap<PlayerId, PathBuf>>,
    gate: Arc<Semaphore>,
}

impl PlaybackCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            gate: Arc::new(Semaphore::new(config.max_concurrent_loads)),
        }
    }

    /// Register a freshly created player for `path` and run its load through
    /// the gate.
    ///
    /// The registry entry is recorded immediately, before the load completes,
    /// so diagnostics see the player as soon as it is accepted. The caller is
    /// expected to have checked that `path` exists. Cancellation while
    /// waiting on the gate or during the load unwinds without leaking a
    /// permit; the registry entry remains and the caller decides whether to
    /// unregister. A load failure is propagated and also leaves the entry in
    /// place.
    pub async fn register(
        &self,
        player: Arc<VideoPlayer>,
        path: PathBuf,
        cancel: CancellationToken,
    ) -> Result<(), RegisterError> {
        self.registry.lock().unwrap().insert(player.id(), path.clone());
        debug!("Player {} registered for {}", player.id(), path.display());

        let permit = tokio::select! {
            _ = cancel.cancelled() => return Err(RegisterError::Canceled),
            acquired = self.gate.clone().acquire_owned() => {
                // The gate is never closed, so acquisition only fails together
                // with a shutdown of the whole coordinator.
                acquired.map_err(|_| RegisterError::Canceled)?
            }
        };

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(RegisterError::Canceled),
            res = player.load(&path) => res.map_err(RegisterError::from),
        };
        drop(permit);

        match &result {
            Ok(()) => info!("Player {} finished loading {}", player.id(), path.display()),
            Err(e) => warn!("Player {} registration did not complete: {}", player.id(), e),
        }
        result
    }

    /// Register a batch of players concurrently, so the gate is the sole
    /// throttle. Each registration is an independent failure domain; the
    /// returned results are in input order and the batch completes once every
    /// registration has finished.
    pub async fn register_batch(
        &self,
        batch: Vec<(Arc<VideoPlayer>, PathBuf)>,
        cancel: CancellationToken,
    ) -> Vec<Result<(), RegisterError>> {
        let registrations = batch
            .into_iter()
            .map(|(player, path)| self.register(player, path, cancel.clone()));
        join_all(registrations).await
    }

    /// Remove the player's registry entry and stop its decode activity.
    /// A no-op for players that were never registered; safe to call twice.
    pub async fn unregister(&self, player: &VideoPlayer) {
        let removed = self.registry.lock().unwrap().remove(&player.id());
        match removed {
            Some(path) => {
                player.shutdown().await;
                info!("Player {} unregistered ({})", player.id(), path.display());
            }
            None => debug!("Player {} was not registered; ignoring", player.id()),
        }
    }

    /// Snapshot of all registered players and their source paths.
    pub fn registered_sources(&self) -> Vec<(PlayerId, PathBuf)> {
        let registry = self.registry.lock().unwrap();
        registry.iter().map(|(id, path)| (*id, path.clone())).collect()
    }

    pub fn player_count(&self) -> usize {
        self.registry.lock().unwrap().len()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.registry.lock().unwrap().contains_key(&id)
    }

    /// Free slots on the load gate at this instant.
    pub fn available_permits(&self) -> usize {
        self.gate.available_permits()
    }

    /// Process memory at call time; no freshness guarantee beyond that.
    pub fn memory_metrics(&self) -> anyhow::Result<MemoryMetrics> {
        diagnostics::sample_memory()
    }
}

impl Default for PlaybackCoordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}
