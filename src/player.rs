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

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::engine::{DecodeEngine, EngineError, EngineFactory, TrackId};
use crate::position::FeedbackHandle;

/// Unique handle for a player instance.
pub type PlayerId = Uuid;

#[derive(Default)]
struct PlayerInner {
    source: Option<PathBuf>,
    engine: Option<Arc<dyn DecodeEngine>>,
    default_track: Option<TrackId>,
    suspended: bool,
}

/// One tile in the playback host.
///
/// The player is the exclusive logical owner of its decode engine: reloading
/// stops and releases the previous engine before a new one is constructed.
/// Transport operations before a successful load are no-ops, never errors.
pub struct VideoPlayer {
    id: PlayerId,
    factory: Arc<dyn EngineFactory>,
    inner: Mutex<PlayerInner>,
    dragging: AtomicBool,
    feedback: Mutex<Option<FeedbackHandle>>,
}

impl VideoPlayer {
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            id: Uuid::new_v4(),
            factory,
            inner: Mutex::new(PlayerInner::default()),
            dragging: AtomicBool::new(false),
            feedback: Mutex::new(None),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn source(&self) -> Option<PathBuf> {
        self.inner.lock().unwrap().source.clone()
    }

    /// Default video track captured during the last successful load, if the
    /// container reported one.
    pub fn default_track(&self) -> Option<TrackId> {
        self.inner.lock().unwrap().default_track
    }

    pub fn is_suspended(&self) -> bool {
        self.inner.lock().unwrap().suspended
    }

    fn engine(&self) -> Option<Arc<dyn DecodeEngine>> {
        self.inner.lock().unwrap().engine.clone()
    }

    /// Load `path` into a fresh engine instance, replacing any previous
    /// source. The old engine is stopped and released first; on failure the
    /// player is left without an engine.
    pub async fn load(&self, path: &Path) -> Result<(), EngineError> {
        let previous = self.inner.lock().unwrap().engine.take();
        if let Some(old) = previous {
            if let Err(e) = old.stop().await {
                warn!("Player {}: failed to stop previous engine: {}", self.id, e);
            }
        }

        let engine = self.factory.create();
        let default_track = engine.load(path).await?;

        let mut inner = self.inner.lock().unwrap();
        inner.source = Some(path.to_path_buf());
        inner.default_track = default_track;
        inner.suspended = false;
        inner.engine = Some(engine);
        info!("Player {}: loaded {}", self.id, path.display());
        Ok(())
    }

    pub async fn play(&self) -> Result<(), EngineError> {
        match self.engine() {
            Some(engine) => engine.play().await,
            None => Ok(()),
        }
    }

    pub async fn pause(&self) -> Result<(), EngineError> {
        match self.engine() {
            Some(engine) => engine.pause().await,
            None => Ok(()),
        }
    }

    pub async fn stop(&self) -> Result<(), EngineError> {
        match self.engine() {
            Some(engine) => engine.stop().await,
            None => Ok(()),
        }
    }

    pub async fn is_playing(&self) -> bool {
        match self.engine() {
            Some(engine) => engine.is_playing().await,
            None => false,
        }
    }

    /// Current position in `[0, 1]`, or `0.0` before a load.
    pub async fn position(&self) -> f32 {
        match self.engine() {
            Some(engine) => engine.position().await,
            None => 0.0,
        }
    }

    pub async fn seek(&self, position: f32) -> Result<(), EngineError> {
        match self.engine() {
            Some(engine) => engine.set_position(position).await,
            None => Ok(()),
        }
    }

    /// Disable active video-track decoding, keeping audio and the playback
    /// position intact. The stored state flips only after the engine call
    /// succeeds, so a failed transition is retried on the next recomputation.
    pub async fn suspend_video(&self) -> Result<(), EngineError> {
        if let Some(engine) = self.engine() {
            engine.set_video_track(None).await?;
        }
        self.inner.lock().unwrap().suspended = true;
        debug!("Player {}: video decoding suspended", self.id);
        Ok(())
    }

    /// Re-enable video decoding. The cached default track is restored only if
    /// one was captured at load time; the player still leaves the suspended
    /// state otherwise.
    pub async fn resume_video(&self) -> Result<(), EngineError> {
        let (engine, track) = {
            let inner = self.inner.lock().unwrap();
            (inner.engine.clone(), inner.default_track)
        };
        if let (Some(engine), Some(track)) = (engine, track) {
            engine.set_video_track(Some(track)).await?;
        }
        self.inner.lock().unwrap().suspended = false;
        debug!("Player {}: video decoding resumed", self.id);
        Ok(())
    }

    /// True while a pointer drag on the seek control is in flight.
    pub fn is_dragging(&self) -> bool {
        self.dragging.load(Ordering::SeqCst)
    }

    /// Mark the start of a seek drag; position polls stop mirroring into the
    /// display value until the drag commits.
    pub fn begin_seek_drag(&self) {
        self.dragging.store(true, Ordering::SeqCst);
    }

    /// Commit the drag's final value to the engine and release the drag flag.
    /// The committed value is the single authoritative position write when a
    /// drag ends.
    pub async fn commit_seek_drag(&self, position: f32) -> Result<(), EngineError> {
        let result = self.seek(position).await;
        self.dragging.store(false, Ordering::SeqCst);
        result
    }

    /// Adopt the position feedback task for this player, stopping any
    /// previously running one.
    pub(crate) fn attach_feedback(&self, handle: FeedbackHandle) {
        if let Some(mut replaced) = self.feedback.lock().unwrap().replace(handle) {
            replaced.request_stop();
        }
    }

    /// Halt position tracking, stop decode activity and release the engine.
    /// Safe to call repeatedly and before any load.
    pub async fn shutdown(&self) {
        let feedback = self.feedback.lock().unwrap().take();
        if let Some(handle) = feedback {
            handle.shutdown().await;
        }
        let engine = self.inner.lock().unwrap().engine.take();
        if let Some(engine) = engine {
            if let Err(e) = engine.stop().await {
                warn!("Player {}: failed to stop engine on shutdown: {}", self.id, e);
            }
        }
    }
}
