//! The Portal view: link ingestion plus the dataset table.

use chrono::Duration as ChronoDuration;
use clarion_core::alert::{AlertKind, AlertSlot};
use clarion_core::config::ConsoleConfig;
use clarion_core::gateway::ClarifyGateway;
use clarion_core::portal::{EditOutcome, LinkCategory, LinkCollection, LinkStatusRow};
use clarion_core::selection::SelectionState;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Mutable state of the Portal view.
#[derive(Default)]
pub struct PortalState {
    pub selection: SelectionState,
    pub links: LinkCollection,
    pub table: Vec<LinkStatusRow>,
    pub alert: AlertSlot,
    table_generation: u64,
}

/// Drives the Portal view against the backend.
pub struct PortalUsecase {
    gateway: Arc<dyn ClarifyGateway>,
    state: Arc<RwLock<PortalState>>,
    alert_ttl: ChronoDuration,
}

impl PortalUsecase {
    pub fn new(gateway: Arc<dyn ClarifyGateway>, config: &ConsoleConfig) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(PortalState::default())),
            alert_ttl: ChronoDuration::milliseconds(config.alerts.portal_dismiss_ms as i64),
        }
    }

    pub async fn state(&self) -> RwLockReadGuard<'_, PortalState> {
        self.state.read().await
    }

    pub async fn refresh_projects(&self) {
        match self.gateway.projects().await {
            Ok(projects) => self.state.write().await.selection.set_projects(projects),
            Err(err) => {
                tracing::error!(target: "clarion::portal", error = %err, "failed to fetch projects")
            }
        }
    }

    /// Selects a project: fetches its epics and the project-level dataset
    /// table.
    pub async fn select_project(&self, name: &str) {
        let generation = {
            let mut state = self.state.write().await;
            state.selection.select_project(name)
        };
        match self.gateway.epics(name).await {
            Ok(epics) => {
                let mut state = self.state.write().await;
                state.selection.apply_epics(generation, epics);
            }
            Err(err) => {
                tracing::error!(target: "clarion::portal", error = %err, "failed to fetch epics")
            }
        }
        self.refresh_table().await;
    }

    /// Selects an epic: fetches its tickets and narrows the dataset table.
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
                state.selection.apply_tickets(generation, tickets);
            }
            Err(err) => {
                tracing::error!(target: "clarion::portal", error = %err, "failed to fetch tickets")
            }
        }
        self.refresh_table().await;
        true
    }

    /// Selects a ticket and narrows the dataset table to it.
    pub async fn select_ticket(&self, name: &str) -> bool {
        let selected = {
            let mut state = self.state.write().await;
            state.selection.select_ticket(name)
        };
        if selected.is_none() {
            return false;
        }
        self.refresh_table().await;
        true
    }

    /// Re-fetches the dataset table for the current selection depth.
    pub async fn refresh_table(&self) {
        let (project, epic_key, ticket_key, generation) = {
            let mut state = self.state.write().await;
            let Some(project) = state.selection.selected_project().map(String::from) else {
                return;
            };
            state.table_generation += 1;
            (
                project,
                state.selection.selected_epic().map(String::from),
                state.selection.selected_ticket().map(|t| t.key.clone()),
                state.table_generation,
            )
        };
        match self
            .gateway
            .link_table(&project, epic_key.as_deref(), ticket_key.as_deref())
            .await
        {
            Ok(rows) => {
                let mut state = self.state.write().await;
                if state.table_generation == generation {
                    state.table = rows;
                } else {
                    tracing::debug!(target: "clarion::portal", "stale dataset table discarded");
                }
            }
            Err(err) => {
                tracing::error!(target: "clarion::portal", error = %err, "failed to fetch dataset table")
            }
        }
    }

    /// Adds one more input box to `tab`; `false` when the tab is full.
    pub async fn add_placeholder(&self, tab: LinkCategory) -> bool {
        self.state.write().await.links.add_placeholder(tab)
    }

    /// Applies an edit to one entry field.
    ///
    /// A value recognized as another category moves to that tab and raises
    /// the transient wrong-type warning.
    pub async fn edit_link(
        &self,
        tab: LinkCategory,
        index: usize,
        value: &str,
    ) -> EditOutcome {
        let mut state = self.state.write().await;
        let outcome = state.links.edit(tab, index, value);
        if let EditOutcome::Moved(detected) = outcome {
            let ttl = self.alert_ttl;
            state.alert.raise(
                AlertKind::Warning,
                "Wrong type:",
                format!("Check the {} Link", detected.title()),
                Some(ttl),
            );
        }
        outcome
    }

    pub async fn dismiss_alert(&self) {
        self.state.write().await.alert.dismiss();
    }

    /// Submits the batched link payload for the selected project.
    ///
    /// On success every tab resets to a single placeholder and the dataset
    /// table is re-fetched; on failure the form is left as typed.
    pub async fn submit(&self) -> bool {
        let submission = {
            let state = self.state.read().await;
            let Some(project) = state.selection.selected_project() else {
                return false;
            };
            state.links.submission(project)
        };
        match self.gateway.add_links(&submission).await {
            Ok(()) => {
                self.state.write().await.links.reset();
                self.refresh_table().await;
                true
            }
            Err(err) => {
                tracing::error!(target: "clarion::portal", error = %err, "failed to submit links");
                false
            }
        }
    }
}
