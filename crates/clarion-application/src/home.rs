//! The home view: selection cascade plus the clarification question board.

use clarion_core::gateway::ClarifyGateway;
use clarion_core::question::{Direction, QuestionBoard};
use clarion_core::selection::SelectionState;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Mutable state of the home view.
#[derive(Default)]
pub struct HomeState {
    pub selection: SelectionState,
    pub board: QuestionBoard,
}

/// Drives the home view against the backend.
///
/// Every fetch failure is logged and swallowed; the affected list is left
/// empty (or stale) and no error surfaces to the user.
pub struct HomeUsecase {
    gateway: Arc<dyn ClarifyGateway>,
    state: Arc<RwLock<HomeState>>,
}

impl HomeUsecase {
    pub fn new(gateway: Arc<dyn ClarifyGateway>) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(HomeState::default())),
        }
    }

    /// Read access to the view state, for rendering.
    pub async fn state(&self) -> RwLockReadGuard<'_, HomeState> {
        self.state.read().await
    }

    /// Loads the project list (on view entry).
    pub async fn refresh_projects(&self) {
        match self.gateway.projects().await {
            Ok(projects) => self.state.write().await.selection.set_projects(projects),
            Err(err) => {
                tracing::error!(target: "clarion::home", error = %err, "failed to fetch projects")
            }
        }
    }

    /// Selects a project and fetches its epics.
    ///
    /// Downstream selections and content are cleared immediately, before the
    /// epic fetch resolves; a response belonging to an older selection is
    /// discarded.
    pub async fn select_project(&self, name: &str) {
        let generation = {
            let mut state = self.state.write().await;
            state.selection.select_project(name)
        };
        match self.gateway.epics(name).await {
            Ok(epics) => {
                let mut state = self.state.write().await;
                if !state.selection.apply_epics(generation, epics) {
                    tracing::debug!(
                        target: "clarion::home",
                        project = name,
                        "stale epic list discarded"
                    );
                }
            }
            Err(err) => {
                tracing::error!(target: "clarion::home", error = %err, "failed to fetch epics")
            }
        }
    }

    /// Selects an epic by display name and fetches its tickets.
    ///
    /// Returns `false` when the name matches no listed epic.
    pub async fn select_epic(&self, name: &str) -> bool {
        let selected = {
            let mut state = self.state.write().await;
            state.selection.select_epic(name)
        };
        let Some((epic_key, generation)) = selected else {
            return false;
        };
        let project = {
            let state = self.state.read().await;
            match state.selection.selected_project() {
                Some(project) => project.to_string(),
                None => return false,
            }
        };
        match self.gateway.tickets(&project, &epic_key).await {
            Ok(tickets) => {
                let mut state = self.state.write().await;
                if !state.selection.apply_tickets(generation, tickets) {
                    tracing::debug!(target: "clarion::home", epic = %epic_key, "stale ticket list discarded");
                }
            }
            Err(err) => {
                tracing::error!(target: "clarion::home", error = %err, "failed to fetch tickets")
            }
        }
        true
    }

    /// Selects a ticket by display name and fetches its document content.
    pub async fn select_ticket(&self, name: &str) -> bool {
        let selected = {
            let mut state = self.state.write().await;
            state.selection.select_ticket(name)
        };
        let Some((_, generation)) = selected else {
            return false;
        };
        let Some(scope) = self.state.read().await.selection.scope() else {
            return false;
        };
        match self.gateway.content(&scope).await {
            Ok(content) => {
                let mut state = self.state.write().await;
                if !state.selection.apply_content(generation, content) {
                    tracing::debug!(target: "clarion::home", ticket = %scope.ticket_key, "stale content discarded");
                }
            }
            Err(err) => {
                tracing::error!(target: "clarion::home", error = %err, "failed to fetch content")
            }
        }
        true
    }

    /// Asks the backend to generate a clarification question for the
    /// current selection, then reloads the question list on success.
    pub async fn clarify(&self) -> bool {
        let Some(scope) = self.state.read().await.selection.scope() else {
            return false;
        };
        match self.gateway.request_question(&scope).await {
            Ok(true) => {
                self.reload_questions().await;
                true
            }
            Ok(false) => {
                tracing::warn!(target: "clarion::home", "backend declined to generate a question");
                false
            }
            Err(err) => {
                tracing::error!(target: "clarion::home", error = %err, "failed to post question request");
                false
            }
        }
    }

    /// Reloads the stored question list for the current selection.
    pub async fn reload_questions(&self) {
        let Some(scope) = self.state.read().await.selection.scope() else {
            return;
        };
        match self.gateway.questions(&scope).await {
            Ok(questions) => self.state.write().await.board.replace(questions),
            Err(err) => {
                tracing::error!(target: "clarion::home", error = %err, "failed to fetch questions")
            }
        }
    }

    /// Moves focus to the next unresolved question; returns the landed
    /// index so the front end can scroll it into view.
    pub async fn advance(&self, direction: Direction) -> Option<usize> {
        self.state.write().await.board.advance(direction)
    }

    /// Flips the resolution status of the question at `index`.
    ///
    /// The local board only updates after the backend acknowledged the
    /// change; a failed POST leaves the board stale (and logged).
    pub async fn toggle_resolved(&self, index: usize) -> bool {
        let target = self.state.read().await.board.toggle_target(index);
        let Some((session_id, status)) = target else {
            return false;
        };
        match self.gateway.mark_resolved(&session_id, status).await {
            Ok(()) => {
                self.state.write().await.board.apply_status(index, status);
                true
            }
            Err(err) => {
                tracing::error!(
                    target: "clarion::home",
                    session = %session_id,
                    error = %err,
                    "failed to update question status"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use clarion_core::question::ResolutionStatus;

    #[tokio::test]
    async fn cascade_selects_and_loads_each_level() {
        let gateway = Arc::new(MockGateway::with_cascade());
        let home = HomeUsecase::new(gateway.clone());

        home.refresh_projects().await;
        assert_eq!(home.state().await.selection.projects(), &["alpha".to_string()]);

        home.select_project("alpha").await;
        assert_eq!(home.state().await.selection.epics().len(), 1);

        assert!(home.select_epic("Onboarding").await);
        assert_eq!(home.state().await.selection.tickets().len(), 1);

        assert!(home.select_ticket("Login form").await);
        let state = home.state().await;
        assert_eq!(state.selection.content().unwrap().title, "Login form");
        assert!(state.selection.scope().is_some());
    }

    #[tokio::test]
    async fn selecting_new_project_clears_downstream_before_fetch_resolves() {
        let gateway = Arc::new(MockGateway::with_cascade());
        let home = HomeUsecase::new(gateway.clone());
        home.refresh_projects().await;
        home.select_project("alpha").await;
        home.select_epic("Onboarding").await;
        home.select_ticket("Login form").await;

        home.select_project("beta").await;
        let state = home.state().await;
        assert_eq!(state.selection.selected_project(), Some("beta"));
        assert!(state.selection.selected_epic().is_none());
        assert!(state.selection.selected_ticket().is_none());
        assert!(state.selection.content().is_none());
    }

    #[tokio::test]
    async fn unknown_epic_is_rejected_without_fetch() {
        let gateway = Arc::new(MockGateway::with_cascade());
        let home = HomeUsecase::new(gateway.clone());
        home.select_project("alpha").await;
        assert!(!home.select_epic("No such epic").await);
        assert_eq!(gateway.calls("tickets"), 0);
    }

    #[tokio::test]
    async fn clarify_reloads_questions_on_success() {
        let gateway = Arc::new(MockGateway::with_cascade().with_questions(vec![
            MockGateway::question("s-1", false),
            MockGateway::question("s-2", true),
        ]));
        let home = HomeUsecase::new(gateway.clone());
        home.select_project("alpha").await;
        home.select_epic("Onboarding").await;
        home.select_ticket("Login form").await;

        assert!(home.clarify().await);
        let state = home.state().await;
        assert_eq!(state.board.len(), 2);
        assert_eq!(state.board.unresolved_count(), 1);
    }

    #[tokio::test]
    async fn clarify_without_full_selection_is_rejected() {
        let gateway = Arc::new(MockGateway::with_cascade());
        let home = HomeUsecase::new(gateway.clone());
        assert!(!home.clarify().await);
        assert_eq!(gateway.calls("request_question"), 0);
    }

    #[tokio::test]
    async fn toggle_resolved_updates_board_after_ack() {
        let gateway =
            Arc::new(MockGateway::with_cascade().with_questions(vec![MockGateway::question("s-1", false)]));
        let home = HomeUsecase::new(gateway.clone());
        home.select_project("alpha").await;
        home.select_epic("Onboarding").await;
        home.select_ticket("Login form").await;
        home.reload_questions().await;

        assert!(home.toggle_resolved(0).await);
        let state = home.state().await;
        assert_eq!(state.board.get(0).unwrap().status, Some(ResolutionStatus::Manual));
    }

    #[tokio::test]
    async fn toggle_failure_leaves_board_stale() {
        let gateway = Arc::new(
            MockGateway::with_cascade()
                .with_questions(vec![MockGateway::question("s-1", false)])
                .failing("mark_resolved"),
        );
        let home = HomeUsecase::new(gateway.clone());
        home.select_project("alpha").await;
        home.select_epic("Onboarding").await;
        home.select_ticket("Login form").await;
        home.reload_questions().await;

        assert!(!home.toggle_resolved(0).await);
        // The POST failed, so the local status must not have flipped.
        let state = home.state().await;
        assert!(state.board.get(0).unwrap().is_unresolved());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_empty_list() {
        let gateway = Arc::new(MockGateway::with_cascade().failing("epics"));
        let home = HomeUsecase::new(gateway.clone());
        home.select_project("alpha").await;
        let state = home.state().await;
        assert_eq!(state.selection.selected_project(), Some("alpha"));
        assert!(state.selection.epics().is_empty());
    }
}
