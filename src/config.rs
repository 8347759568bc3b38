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

use std::time::Duration;

/// Default number of simultaneous in-flight player loads.
///
/// Unbounded concurrent media-engine initialization causes hardware-decoder
/// contention and startup latency spikes; a small fixed bound amortizes the
/// cost while later players still make progress.
pub const DEFAULT_MAX_CONCURRENT_LOADS: usize = 4;

/// Default minimum on-screen area, in pixels, below which a player's video
/// decoding is suspended (480 x 270).
pub const DEFAULT_MIN_ACTIVE_AREA: u64 = 480 * 270;

/// Default interval between position polls of the decode engine.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Configuration for [`crate::PlaybackCoordinator`].
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Capacity of the load gate.
    pub max_concurrent_loads: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { max_concurrent_loads: DEFAULT_MAX_CONCURRENT_LOADS }
    }
}

/// Configuration for [`crate::ResourceGovernor`].
#[derive(Debug, Clone, Copy)]
pub struct GovernorConfig {
    /// On-screen areas strictly below this value suspend video decoding.
    pub min_active_area: u64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self { min_active_area: DEFAULT_MIN_ACTIVE_AREA }
    }
}

/// Configuration for the position feedback loop.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackConfig {
    /// Interval between engine position polls.
    pub poll_interval: Duration,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL }
    }
}
