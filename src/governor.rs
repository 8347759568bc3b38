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

use log::debug;

use crate::config::GovernorConfig;
use crate::engine::EngineError;
use crate::player::VideoPlayer;

/// Current geometry and visibility of a player's display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub visible: bool,
    /// On-screen width in pixels at current layout.
    pub width: u32,
    /// On-screen height in pixels at current layout.
    pub height: u32,
}

impl SurfaceLayout {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Decides, per player, whether video-track decoding should run, trading
/// visual fidelity of off-screen or tiny tiles for decode headroom.
///
/// The decision is a pure function of the current layout; it consults no
/// history. Applying it is idempotent: recomputation with an unchanged
/// outcome performs no engine calls.
pub struct ResourceGovernor {
    min_active_area: u64,
}

impl ResourceGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        Self { min_active_area: config.min_active_area }
    }

    /// Suspend when the surface is invisible or strictly smaller than the
    /// configured minimum area. An area exactly at the threshold stays
    /// active.
    pub fn should_suspend(&self, layout: &SurfaceLayout) -> bool {
        !layout.visible || layout.area() < self.min_active_area
    }

    /// Recompute the decision for `player` and apply it if it changed.
    ///
    /// An engine failure leaves the stored state untouched, so the next
    /// recomputation retries the transition.
    pub async fn reevaluate(
        &self,
        player: &VideoPlayer,
        layout: &SurfaceLayout,
    ) -> Result<(), EngineError> {
        let suspend = self.should_suspend(layout);
        if suspend == player.is_suspended() {
            return Ok(());
        }
        debug!(
            "Player {}: {} at {}x{} (visible: {})",
            player.id(),
            if suspend { "suspending video" } else { "resuming video" },
            layout.width,
            layout.height,
            layout.visible,
        );
        if suspend {
            player.suspend_video().await
        } else {
            player.resume_video().await
        }
    }
}

impl Default for ResourceGovernor {
    fn default() -> Self {
        Self::new(GovernorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::config::DEFAULT_MIN_ACTIVE_AREA;
    use crate::engine::{DecodeEngine, EngineFactory, TrackId};

    struct TrackingEngine {
        default_track: Option<TrackId>,
        fail_track_calls: bool,
        track_calls: Arc<Mutex<Vec<Option<TrackId>>>>,
    }

    #[async_trait]
    impl DecodeEngine for TrackingEngine {
        async fn load(&self, _path: &Path) -> Result<Option<TrackId>, EngineError> {
            Ok(self.default_track)
        }
        async fn stop(&self) -> Result<(), EngineError> {
            Ok(())
        }
        async fn set_video_track(&self, track: Option<TrackId>) -> Result<(), EngineError> {
            if self.fail_track_calls {
                return Err(EngineError::Decoder("track switch failed".into()));
            }
            self.track_calls.lock().unwrap().push(track);
            Ok(())
        }
    }

    struct TrackingFactory {
        default_track: Option<TrackId>,
        fail_track_calls: bool,
        track_calls: Arc<Mutex<Vec<Option<TrackId>>>>,
    }

    impl TrackingFactory {
        fn new(default_track: Option<TrackId>) -> Arc<Self> {
            Arc::new(Self {
                default_track,
                fail_track_calls: false,
                track_calls: Arc::new(Mutex::new(Vec::new())),
            })
        }
    }

    impl EngineFactory for TrackingFactory {
        fn create(&self) -> Arc<dyn DecodeEngine> {
            Arc::new(TrackingEngine {
                default_track: self.default_track,
                fail_track_calls: self.fail_track_calls,
                track_calls: self.track_calls.clone(),
            })
        }
    }

    async fn loaded_player(factory: &Arc<TrackingFactory>) -> VideoPlayer {
        let player = VideoPlayer::new(factory.clone() as Arc<dyn EngineFactory>);
        player.load(Path::new("a.mp4")).await.unwrap();
        player
    }

    fn layout(visible: bool, width: u32, height: u32) -> SurfaceLayout {
        SurfaceLayout { visible, width, height }
    }

    #[test]
    fn threshold_is_strict_less_than() {
        let governor = ResourceGovernor::default();

        // 480x270 is exactly the default threshold area.
        assert!(!governor.should_suspend(&layout(true, 480, 270)));
        // One pixel below the threshold suspends.
        assert!(governor.should_suspend(&layout(true, (DEFAULT_MIN_ACTIVE_AREA - 1) as u32, 1)));
        assert!(governor.should_suspend(&layout(true, 479, 270)));
    }

    #[test]
    fn invisible_suspends_regardless_of_area() {
        let governor = ResourceGovernor::default();
        assert!(governor.should_suspend(&layout(false, 1920, 1080)));
    }

    #[tokio::test]
    async fn transitions_call_engine_once_each() {
        let factory = TrackingFactory::new(Some(7));
        let player = loaded_player(&factory).await;
        let governor = ResourceGovernor::default();

        // Repeated recomputation with an unchanged outcome is silent.
        governor.reevaluate(&player, &layout(true, 1280, 720)).await.unwrap();
        governor.reevaluate(&player, &layout(true, 1280, 720)).await.unwrap();
        assert!(factory.track_calls.lock().unwrap().is_empty());

        governor.reevaluate(&player, &layout(true, 100, 100)).await.unwrap();
        governor.reevaluate(&player, &layout(true, 90, 90)).await.unwrap();
        assert!(player.is_suspended());

        governor.reevaluate(&player, &layout(true, 1280, 720)).await.unwrap();
        governor.reevaluate(&player, &layout(true, 1920, 1080)).await.unwrap();
        assert!(!player.is_suspended());

        let calls = factory.track_calls.lock().unwrap().clone();
        assert_eq!(calls, vec![None, Some(7)]);
    }

    #[tokio::test]
    async fn resume_skips_restore_without_a_cached_track() {
        let factory = TrackingFactory::new(None);
        let player = loaded_player(&factory).await;
        let governor = ResourceGovernor::default();

        governor.reevaluate(&player, &layout(false, 1280, 720)).await.unwrap();
        governor.reevaluate(&player, &layout(true, 1280, 720)).await.unwrap();

        // Suspension cleared the track, but no restore was attempted for the
        // unknown default track.
        assert_eq!(*factory.track_calls.lock().unwrap(), vec![None]);
        assert!(!player.is_suspended());
    }

    #[tokio::test]
    async fn failed_transition_is_retried_on_next_recomputation() {
        let factory = Arc::new(TrackingFactory {
            default_track: Some(3),
            fail_track_calls: true,
            track_calls: Arc::new(Mutex::new(Vec::new())),
        });
        let player = loaded_player(&factory).await;
        let governor = ResourceGovernor::default();

        let small = layout(true, 100, 100);
        assert!(governor.reevaluate(&player, &small).await.is_err());
        // State did not flip, so the same layout still attempts the switch.
        assert!(!player.is_suspended());
        assert!(governor.reevaluate(&player, &small).await.is_err());
    }

    #[tokio::test]
    async fn unloaded_player_tracks_decision_without_engine_calls() {
        let factory = TrackingFactory::new(Some(1));
        let player = VideoPlayer::new(factory.clone() as Arc<dyn EngineFactory>);
        let governor = ResourceGovernor::default();

        governor.reevaluate(&player, &layout(false, 0, 0)).await.unwrap();
        assert!(player.is_suspended());
        governor.reevaluate(&player, &layout(true, 1280, 720)).await.unwrap();
        assert!(!player.is_suspended());
        assert!(factory.track_calls.lock().unwrap().is_empty());
    }
}
