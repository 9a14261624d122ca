//! The chat thread view: one clarification conversation at a time.

use crate::poller::{PollerHandle, spawn_history_poller};
use clarion_core::chat::{ChatEntry, Transcript};
use clarion_core::gateway::ClarifyGateway;
use clarion_core::question::Question;
use clarion_core::selection::TicketScope;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard, mpsc};

/// Redraw hints sent to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadEvent {
    /// The transcript changed (poll tick or local append); re-render and
    /// scroll to the bottom.
    TranscriptUpdated,
    /// A suggestion became available for the open thread.
    SuggestionReady,
}

/// Mutable state of the thread view.
#[derive(Default)]
pub struct ThreadState {
    current: Option<Question>,
    scope: Option<TicketScope>,
    pub transcript: Transcript,
    pub suggestions: Vec<String>,
}

impl ThreadState {
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

/// Drives one clarification thread: history fetch, polling lifecycle,
/// optimistic sends.
pub struct ThreadUsecase {
    gateway: Arc<dyn ClarifyGateway>,
    state: Arc<RwLock<ThreadState>>,
    events: mpsc::UnboundedSender<ThreadEvent>,
    poller: Mutex<Option<PollerHandle>>,
    poll_interval: Duration,
}

impl ThreadUsecase {
    /// Creates the usecase plus the event receiver the front end drains.
    pub fn new(
        gateway: Arc<dyn ClarifyGateway>,
        poll_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ThreadEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                gateway,
                state: Arc::new(RwLock::new(ThreadState::default())),
                events,
                poller: Mutex::new(None),
                poll_interval,
            },
            receiver,
        )
    }

    pub async fn state(&self) -> RwLockReadGuard<'_, ThreadState> {
        self.state.read().await
    }

    /// Opens the thread for `question`.
    ///
    /// Re-opening the already-open session is a no-op. Otherwise the
    /// previous poller is cancelled, the transcript is replaced by a fresh
    /// history fetch, a suggestion is loaded, and polling starts.
    pub async fn open(&self, scope: TicketScope, question: Question) {
        {
            let state = self.state.read().await;
            if state
                .current
                .as_ref()
                .is_some_and(|q| q.session_id == question.session_id)
            {
                return;
            }
        }
        self.stop_poller().await;

        let session_id = question.session_id.clone();
        {
            let mut state = self.state.write().await;
            state.current = Some(question);
            state.scope = Some(scope.clone());
            state.transcript.clear();
            state.suggestions.clear();
        }

        self.refresh_history(&session_id).await;
        self.load_suggestion(&scope, &session_id).await;

        let handle = spawn_history_poller(
            self.gateway.clone(),
            self.state.clone(),
            self.events.clone(),
            session_id,
            self.poll_interval,
        );
        *self.poller.lock().await = Some(handle);
    }

    /// Closes the thread and stops polling.
    ///
    /// The transcript stays around (the pane is merely hidden); opening a
    /// different session replaces it.
    pub async fn close(&self) {
        self.stop_poller().await;
        let mut state = self.state.write().await;
        state.current = None;
        state.scope = None;
    }

    /// Sends a user message into the open thread.
    ///
    /// The entry is appended locally before the POST goes out; the agent's
    /// reply is not merged from the response, the next poll tick surfaces
    /// it. A failed send keeps the optimistic entry and only logs.
    pub async fn send(&self, message: &str) -> bool {
        let Some((scope, session_id)) = ({
            let state = self.state.read().await;
            state
                .scope
                .clone()
                .zip(state.current.as_ref().map(|q| q.session_id.clone()))
        }) else {
            return false;
        };

        self.state
            .write()
            .await
            .transcript
            .push(ChatEntry::human(message));
        let _ = self.events.send(ThreadEvent::TranscriptUpdated);

        if let Err(err) = self
            .gateway
            .send_clarify(&scope, &session_id, message)
            .await
        {
            tracing::error!(
                target: "clarion::thread",
                session = %session_id,
                error = %err,
                "failed to send message"
            );
        }
        true
    }

    /// Sends the suggestion at `index` as a regular message.
    pub async fn send_suggestion(&self, index: usize) -> bool {
        let suggestion = {
            let state = self.state.read().await;
            state.suggestions.get(index).cloned()
        };
        match suggestion {
            Some(text) => self.send(&text).await,
            None => false,
        }
    }

    async fn refresh_history(&self, session_id: &str) {
        match self.gateway.session_history(session_id).await {
            Ok(entries) => {
                self.state.write().await.transcript.replace(entries);
                let _ = self.events.send(ThreadEvent::TranscriptUpdated);
            }
            Err(err) => {
                tracing::error!(
                    target: "clarion::thread",
                    session = %session_id,
                    error = %err,
                    "failed to fetch session history"
                );
            }
        }
    }

    async fn load_suggestion(&self, scope: &TicketScope, session_id: &str) {
        match self.gateway.suggestion(scope, session_id).await {
            Ok(Some(suggestion)) => {
                self.state.write().await.suggestions = vec![suggestion];
                let _ = self.events.send(ThreadEvent::SuggestionReady);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(
                    target: "clarion::thread",
                    session = %session_id,
                    error = %err,
                    "failed to fetch suggestion"
                );
            }
        }
    }

    async fn stop_poller(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.cancel();
        }
    }
}
