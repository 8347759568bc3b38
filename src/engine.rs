use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Identifier of a video track inside a loaded container.
pub type TrackId = i32;

/// Error type for decode-engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("operation not supported by this engine")]
    Unsupported,
    #[error("failed to open media: {0}")]
    Open(String),
    #[error("decoder error: {0}")]
    Decoder(String),
}

/// Opaque decode/render capability backing one player.
///
/// The engine decodes a video file to a surface, reports position and accepts
/// seeks. All calls are safe to repeat, and `set_video_track(None)` followed
/// later by `set_video_track(Some(id))` is lossless for resuming playback.
#[async_trait]
pub trait DecodeEngine: Send + Sync {
    /// Parse and prepare `path` for playback. Returns the default video track
    /// when the container reports one.
    async fn load(&self, path: &Path) -> Result<Option<TrackId>, EngineError>;

    async fn play(&self) -> Result<(), EngineError> {
        Err(EngineError::Unsupported)
    }
    async fn pause(&self) -> Result<(), EngineError> {
        Err(EngineError::Unsupported)
    }
    async fn stop(&self) -> Result<(), EngineError> {
        Err(EngineError::Unsupported)
    }
    async fn is_playing(&self) -> bool {
        false
    }

    /// Current playback position, normalized to `[0, 1]`.
    async fn position(&self) -> f32 {
        0.0
    }
    async fn set_position(&self, _position: f32) -> Result<(), EngineError> {
        Err(EngineError::Unsupported)
    }

    /// `None` disables active video-track decoding; audio and the playback
    /// position are unaffected.
    async fn set_video_track(&self, _track: Option<TrackId>) -> Result<(), EngineError> {
        Err(EngineError::Unsupported)
    }
    async fn video_track(&self) -> Option<TrackId> {
        None
    }
}

/// Constructs one fresh engine instance per player load.
pub trait EngineFactory: Send + Sync {
    fn create(&self) -> Arc<dyn DecodeEngine>;
}
