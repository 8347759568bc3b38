pub mod config;
pub mod coordinator;
pub mod diagnostics;
pub mod engine;
pub mod governor;
pub mod player;
pub mod position;

pub use config::{CoordinatorConfig, FeedbackConfig, GovernorConfig};
pub use coordinator::{PlaybackCoordinator, RegisterError};
pub use diagnostics::MemoryMetrics;
pub use engine::{DecodeEngine, EngineError, EngineFactory, TrackId};
pub use governor::{ResourceGovernor, SurfaceLayout};
pub use player::{PlayerId, VideoPlayer};
pub use position::run_position_feedback;
