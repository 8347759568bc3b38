use std::sync::Arc;

use log::debug;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::FeedbackConfig;
use crate::player::VideoPlayer;

/// Handle to a player's poll task. Owned by the player itself so that
/// shutting the player down halts position tracking.
pub(crate) struct FeedbackHandle {
    join: JoinHandle<()>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl FeedbackHandle {
    /// Send the stop signal without awaiting task completion.
    pub(crate) fn request_stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Stop the poll task and wait for it to finish.
    pub(crate) async fn shutdown(mut self) {
        self.request_stop();
        let _ = self.join.await;
    }
}

/// Start the periodic position poll for one player.
///
/// The returned watch receiver mirrors the engine's normalized position into
/// a display value for the seek control. Polls are skipped while the user is
/// dragging the control, so the live gesture owns the display and the drag's
/// committed value is the only authoritative position write when it ends.
///
/// The poll task's handle is stored on the player: `VideoPlayer::shutdown`
/// (and therefore coordinator unregistration) halts position tracking, and
/// starting a new poll for the same player stops the previous one.
pub fn run_position_feedback(
    player: Arc<VideoPlayer>,
    config: FeedbackConfig,
) -> watch::Receiver<f32> {
    let (tx, rx) = watch::channel(0.0f32);
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let join = tokio::spawn({
        let player = player.clone();
        async move {
            let mut ticker = tokio::time::interval(config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }
                if player.is_dragging() {
                    continue;
                }
                let position = player.position().await;
                if tx.send(position).is_err() {
                    // No one is watching the display value anymore.
                    break;
                }
            }
            debug!("Player {}: position feedback stopped", player.id());
        }
    });
    player.attach_feedback(FeedbackHandle { join, stop_tx: Some(stop_tx) });
    rx
}
