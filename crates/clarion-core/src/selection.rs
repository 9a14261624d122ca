//! Cascading project / epic / ticket selection state.
//!
//! Selections form a strict dependency chain: choosing a project invalidates
//! the epic and ticket below it, choosing an epic invalidates the ticket.
//! Every level carries a generation counter so that a fetch response arriving
//! after a newer selection was made is discarded instead of overwriting
//! fresher state.

use serde::{Deserialize, Serialize};

/// An epic reference as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpicRef {
    pub key: String,
    pub name: String,
}

/// A ticket reference as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRef {
    pub key: String,
    pub name: String,
    pub url: String,
}

/// The document payload loaded for a selected ticket.
///
/// `content` is an HTML fragment; the console renders it as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentData {
    pub title: String,
    pub content: String,
}

/// A fully resolved selection, i.e. the request body shared by the
/// question and clarification endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketScope {
    pub project_name: String,
    pub epic_key: String,
    pub ticket_key: String,
    pub url: String,
}

/// A token tying an in-flight fetch to the selection it was issued for.
///
/// `apply_*` operations compare the token against the current level
/// generation and drop the payload on mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Cascading selection state for the home and portal views.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    projects: Vec<String>,
    epics: Vec<EpicRef>,
    tickets: Vec<TicketRef>,
    selected_project: Option<String>,
    selected_epic: Option<String>,
    selected_ticket: Option<TicketRef>,
    content: Option<ContentData>,
    epic_generation: u64,
    ticket_generation: u64,
    content_generation: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn epics(&self) -> &[EpicRef] {
        &self.epics
    }

    pub fn tickets(&self) -> &[TicketRef] {
        &self.tickets
    }

    pub fn selected_project(&self) -> Option<&str> {
        self.selected_project.as_deref()
    }

    /// The selected epic key (not its display name).
    pub fn selected_epic(&self) -> Option<&str> {
        self.selected_epic.as_deref()
    }

    pub fn selected_ticket(&self) -> Option<&TicketRef> {
        self.selected_ticket.as_ref()
    }

    pub fn content(&self) -> Option<&ContentData> {
        self.content.as_ref()
    }

    pub fn set_projects(&mut self, projects: Vec<String>) {
        self.projects = projects;
    }

    /// Selects a project, clearing everything downstream.
    ///
    /// Returns the generation token the caller must hand back to
    /// [`apply_epics`](Self::apply_epics) together with the fetched list.
    pub fn select_project(&mut self, name: impl Into<String>) -> Generation {
        self.selected_project = Some(name.into());
        self.selected_epic = None;
        self.selected_ticket = None;
        self.content = None;
        self.epics.clear();
        self.tickets.clear();
        self.epic_generation += 1;
        Generation(self.epic_generation)
    }

    /// Installs a fetched epic list unless a newer project selection
    /// superseded the request.
    pub fn apply_epics(&mut self, generation: Generation, epics: Vec<EpicRef>) -> bool {
        if generation.0 != self.epic_generation {
            return false;
        }
        self.epics = epics;
        true
    }

    /// Selects an epic by display name, clearing the ticket level.
    ///
    /// Returns `None` when the name does not match any listed epic.
    pub fn select_epic(&mut self, name: &str) -> Option<(String, Generation)> {
        let epic = self.epics.iter().find(|e| e.name == name)?.clone();
        self.selected_epic = Some(epic.key.clone());
        self.selected_ticket = None;
        self.content = None;
        self.tickets.clear();
        self.ticket_generation += 1;
        Some((epic.key, Generation(self.ticket_generation)))
    }

    /// Installs a fetched ticket list unless superseded.
    pub fn apply_tickets(&mut self, generation: Generation, tickets: Vec<TicketRef>) -> bool {
        if generation.0 != self.ticket_generation {
            return false;
        }
        self.tickets = tickets;
        true
    }

    /// Selects a ticket by display name.
    ///
    /// Returns `None` when the name does not match any listed ticket.
    pub fn select_ticket(&mut self, name: &str) -> Option<(TicketRef, Generation)> {
        let ticket = self.tickets.iter().find(|t| t.name == name)?.clone();
        self.selected_ticket = Some(ticket.clone());
        self.content_generation += 1;
        Some((ticket, Generation(self.content_generation)))
    }

    /// Installs fetched ticket content unless superseded.
    pub fn apply_content(&mut self, generation: Generation, content: ContentData) -> bool {
        if generation.0 != self.content_generation {
            return false;
        }
        self.content = Some(content);
        true
    }

    /// The fully resolved selection, when project, epic and ticket are all set.
    pub fn scope(&self) -> Option<TicketScope> {
        let project_name = self.selected_project.clone()?;
        let epic_key = self.selected_epic.clone()?;
        let ticket = self.selected_ticket.clone()?;
        Some(TicketScope {
            project_name,
            epic_key,
            ticket_key: ticket.key,
            url: ticket.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epic(key: &str, name: &str) -> EpicRef {
        EpicRef {
            key: key.to_string(),
            name: name.to_string(),
        }
    }

    fn ticket(key: &str, name: &str) -> TicketRef {
        TicketRef {
            key: key.to_string(),
            name: name.to_string(),
            url: format!("https://example.atlassian.net/browse/{key}"),
        }
    }

    #[test]
    fn selecting_project_clears_downstream_state() {
        let mut state = SelectionState::new();
        let g1 = state.select_project("alpha");
        assert!(state.apply_epics(g1, vec![epic("E-1", "Onboarding")]));
        let (_, g2) = state.select_epic("Onboarding").unwrap();
        assert!(state.apply_tickets(g2, vec![ticket("T-1", "Login form")]));
        let (_, g3) = state.select_ticket("Login form").unwrap();
        assert!(state.apply_content(
            g3,
            ContentData {
                title: "Login form".to_string(),
                content: "<p>spec</p>".to_string(),
            }
        ));

        state.select_project("beta");
        assert_eq!(state.selected_project(), Some("beta"));
        assert!(state.selected_epic().is_none());
        assert!(state.selected_ticket().is_none());
        assert!(state.content().is_none());
        assert!(state.epics().is_empty());
        assert!(state.tickets().is_empty());
    }

    #[test]
    fn stale_epic_response_is_discarded() {
        let mut state = SelectionState::new();
        let stale = state.select_project("alpha");
        let fresh = state.select_project("beta");

        // The response for "alpha" arrives after "beta" was selected.
        assert!(!state.apply_epics(stale, vec![epic("A-1", "Stale")]));
        assert!(state.epics().is_empty());

        assert!(state.apply_epics(fresh, vec![epic("B-1", "Fresh")]));
        assert_eq!(state.epics()[0].key, "B-1");
    }

    #[test]
    fn stale_ticket_response_is_discarded() {
        let mut state = SelectionState::new();
        let g = state.select_project("alpha");
        state.apply_epics(g, vec![epic("E-1", "First"), epic("E-2", "Second")]);

        let (_, stale) = state.select_epic("First").unwrap();
        let (_, fresh) = state.select_epic("Second").unwrap();

        assert!(!state.apply_tickets(stale, vec![ticket("T-1", "Old")]));
        assert!(state.apply_tickets(fresh, vec![ticket("T-2", "New")]));
        assert_eq!(state.tickets().len(), 1);
        assert_eq!(state.tickets()[0].key, "T-2");
    }

    #[test]
    fn unknown_epic_name_is_rejected() {
        let mut state = SelectionState::new();
        let g = state.select_project("alpha");
        state.apply_epics(g, vec![epic("E-1", "Onboarding")]);
        assert!(state.select_epic("Nope").is_none());
        // The existing selection is untouched.
        assert_eq!(state.selected_project(), Some("alpha"));
    }

    #[test]
    fn scope_requires_full_chain() {
        let mut state = SelectionState::new();
        assert!(state.scope().is_none());

        let g = state.select_project("alpha");
        state.apply_epics(g, vec![epic("E-1", "Onboarding")]);
        assert!(state.scope().is_none());

        let (_, g) = state.select_epic("Onboarding").unwrap();
        state.apply_tickets(g, vec![ticket("T-1", "Login form")]);
        assert!(state.scope().is_none());

        state.select_ticket("Login form").unwrap();
        let scope = state.scope().unwrap();
        assert_eq!(scope.project_name, "alpha");
        assert_eq!(scope.epic_key, "E-1");
        assert_eq!(scope.ticket_key, "T-1");
    }
}
