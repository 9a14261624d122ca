//! The session-history poller: the only recurring background task.
//!
//! The thread view owns the poller exclusively; it starts when a thread is
//! opened and is cancelled when the thread closes or the view is dropped,
//! so no request outlives the context that triggered it.

use crate::thread::{ThreadEvent, ThreadState};
use clarion_core::gateway::ClarifyGateway;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Handle to a running poller; cancelling it stops the task at the next
/// suspension point.
pub(crate) struct PollerHandle {
    token: CancellationToken,
}

impl PollerHandle {
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawns the polling loop for `session_id`.
///
/// Each tick fetches the full history and replaces the transcript
/// wholesale, provided the same session is still the open one. Fetch
/// failures are logged and the loop keeps ticking.
pub(crate) fn spawn_history_poller(
    gateway: Arc<dyn ClarifyGateway>,
    state: Arc<RwLock<ThreadState>>,
    events: mpsc::UnboundedSender<ThreadEvent>,
    session_id: String,
    interval: Duration,
) -> PollerHandle {
    let token = CancellationToken::new();
    let poll_token = token.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately; the open
        // path already fetched the history once, so skip it.
        ticker.tick().await;

        tracing::debug!(target: "clarion::poller", session = %session_id, "poller started");
        loop {
            tokio::select! {
                _ = poll_token.cancelled() => {
                    tracing::debug!(target: "clarion::poller", session = %session_id, "poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match gateway.session_history(&session_id).await {
                        Ok(entries) => {
                            let mut state = state.write().await;
                            let still_open = state
                                .current()
                                .map(|q| q.session_id == session_id)
                                .unwrap_or(false);
                            if still_open {
                                state.transcript.replace(entries);
                                let _ = events.send(ThreadEvent::TranscriptUpdated);
                            }
                        }
                        Err(err) => {
                            tracing::error!(
                                target: "clarion::poller",
                                session = %session_id,
                                error = %err,
                                "history poll failed"
                            );
                        }
                    }
                }
            }
        }
    });

    PollerHandle { token }
}
