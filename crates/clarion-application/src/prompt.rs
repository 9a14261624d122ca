//! The Prompt Manager view: per-role system prompt templates.

use chrono::Duration as ChronoDuration;
use clarion_core::alert::{AlertKind, AlertSlot};
use clarion_core::config::ConsoleConfig;
use clarion_core::gateway::ClarifyGateway;
use clarion_core::prompt::{PromptRole, PromptTemplate};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Mutable state of the Prompt Manager view.
pub struct PromptState {
    pub role: PromptRole,
    pub template: Option<PromptTemplate>,
    pub editing: bool,
    pub alert: AlertSlot,
}

impl Default for PromptState {
    fn default() -> Self {
        Self {
            role: PromptRole::Clarify,
            template: None,
            editing: false,
            alert: AlertSlot::new(),
        }
    }
}

/// Drives the Prompt Manager view against the backend.
pub struct PromptUsecase {
    gateway: Arc<dyn ClarifyGateway>,
    state: Arc<RwLock<PromptState>>,
    alert_ttl: ChronoDuration,
}

impl PromptUsecase {
    pub fn new(gateway: Arc<dyn ClarifyGateway>, config: &ConsoleConfig) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(PromptState::default())),
            alert_ttl: ChronoDuration::milliseconds(config.alerts.prompt_dismiss_ms as i64),
        }
    }

    pub async fn state(&self) -> RwLockReadGuard<'_, PromptState> {
        self.state.read().await
    }

    /// Switches to `role` and loads its template, leaving edit mode.
    pub async fn select_role(&self, role: PromptRole) {
        self.state.write().await.role = role;
        self.load().await;
    }

    /// Loads the template for the current role.
    ///
    /// Failure raises a dismissible, auto-expiring error banner and keeps
    /// the previous template (viewing continues on stale data).
    pub async fn load(&self) {
        let role = self.state.read().await.role;
        match self.gateway.prompt(role).await {
            Ok(template) => {
                let mut state = self.state.write().await;
                state.template = Some(template);
                state.editing = false;
            }
            Err(err) => {
                tracing::error!(target: "clarion::prompt", role = %role, error = %err, "failed to fetch prompt");
                let ttl = self.alert_ttl;
                self.state.write().await.alert.raise(
                    AlertKind::Error,
                    "Error fetching prompts!!",
                    "Failed to fetch prompts. Please try again.",
                    Some(ttl),
                );
            }
        }
    }

    /// Enters edit mode; rejected while no template is loaded.
    pub async fn edit(&self) -> bool {
        let mut state = self.state.write().await;
        if state.template.is_none() {
            return false;
        }
        state.editing = true;
        true
    }

    /// Updates the contextualize prompt; only valid in edit mode.
    pub async fn set_contextualize(&self, text: &str) -> bool {
        self.update(|template| template.contextualize_q_system_prompt = text.to_string())
            .await
    }

    /// Updates the QA prompt; only valid in edit mode.
    pub async fn set_qa(&self, text: &str) -> bool {
        self.update(|template| template.qa_system_prompt = text.to_string())
            .await
    }

    async fn update(&self, apply: impl FnOnce(&mut PromptTemplate)) -> bool {
        let mut state = self.state.write().await;
        if !state.editing {
            return false;
        }
        match state.template.as_mut() {
            Some(template) => {
                apply(template);
                true
            }
            None => false,
        }
    }

    /// Saves the edited template for the current role.
    ///
    /// Success leaves edit mode and raises an auto-expiring confirmation;
    /// failure raises an error banner and stays in edit mode.
    pub async fn save(&self) -> bool {
        let (role, template) = {
            let state = self.state.read().await;
            if !state.editing {
                return false;
            }
            match &state.template {
                Some(template) => (state.role, template.clone()),
                None => return false,
            }
        };
        match self.gateway.set_prompt(role, &template).await {
            Ok(()) => {
                let ttl = self.alert_ttl;
                let mut state = self.state.write().await;
                state.editing = false;
                state.alert.raise(
                    AlertKind::Success,
                    "Prompt saved successfully!",
                    "The prompt has been updated",
                    Some(ttl),
                );
                true
            }
            Err(err) => {
                tracing::error!(target: "clarion::prompt", role = %role, error = %err, "failed to save prompt");
                let ttl = self.alert_ttl;
                self.state.write().await.alert.raise(
                    AlertKind::Error,
                    "Error saving prompt!!",
                    "Failed to save prompt. Please try again.",
                    Some(ttl),
                );
                false
            }
        }
    }

    pub async fn dismiss_alert(&self) {
        self.state.write().await.alert.dismiss();
    }
}
