//! Background reclamation of idle sessions.

use super::engine::Engine;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Sweep `engine` for idle sessions every `every` until the task is aborted.
///
/// The sweep only removes sessions; it never touches a board.
pub fn spawn_sweeper(engine: Arc<Engine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick fires immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = engine.sweep_idle(Utc::now());
            debug!(
                removed = removed.len(),
                active = engine.active_sessions(),
                "idle sweep"
            );
        }
    })
}
