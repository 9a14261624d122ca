//! In-memory gateway mock shared by the usecase tests.

use async_trait::async_trait;
use clarion_core::ClarionError;
use clarion_core::chat::ChatEntry;
use clarion_core::error::Result;
use clarion_core::gateway::ClarifyGateway;
use clarion_core::portal::{LinkStatusRow, LinkSubmission};
use clarion_core::prompt::{PromptRole, PromptTemplate};
use clarion_core::question::{Question, ResolutionStatus};
use clarion_core::selection::{ContentData, EpicRef, TicketRef, TicketScope};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Canned-response gateway recording every call by method name.
pub(crate) struct MockGateway {
    projects: Vec<String>,
    epics: Vec<EpicRef>,
    tickets: Vec<TicketRef>,
    content: ContentData,
    questions: Mutex<Vec<Question>>,
    history: Mutex<Vec<ChatEntry>>,
    suggestion: Option<String>,
    link_rows: Vec<LinkStatusRow>,
    prompt: Option<PromptTemplate>,
    failing: HashSet<&'static str>,
    calls: Mutex<HashMap<&'static str, usize>>,
    last_submission: Mutex<Option<LinkSubmission>>,
}

impl MockGateway {
    /// A single-project / single-epic / single-ticket backend.
    pub(crate) fn with_cascade() -> Self {
        Self {
            projects: vec!["alpha".to_string()],
            epics: vec![EpicRef {
                key: "E-1".to_string(),
                name: "Onboarding".to_string(),
            }],
            tickets: vec![TicketRef {
                key: "T-1".to_string(),
                name: "Login form".to_string(),
                url: "https://example.atlassian.net/browse/T-1".to_string(),
            }],
            content: ContentData {
                title: "Login form".to_string(),
                content: "<p>spec</p>".to_string(),
            },
            questions: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            suggestion: None,
            link_rows: Vec::new(),
            prompt: None,
            failing: HashSet::new(),
            calls: Mutex::new(HashMap::new()),
            last_submission: Mutex::new(None),
        }
    }

    pub(crate) fn with_questions(self, questions: Vec<Question>) -> Self {
        *self.questions.lock().unwrap() = questions;
        self
    }

    pub(crate) fn with_history(self, history: Vec<ChatEntry>) -> Self {
        *self.history.lock().unwrap() = history;
        self
    }

    pub(crate) fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    pub(crate) fn with_link_rows(mut self, rows: Vec<LinkStatusRow>) -> Self {
        self.link_rows = rows;
        self
    }

    pub(crate) fn with_prompt(mut self, template: PromptTemplate) -> Self {
        self.prompt = Some(template);
        self
    }

    /// Makes the named method fail with a backend error.
    pub(crate) fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    pub(crate) fn set_history(&self, history: Vec<ChatEntry>) {
        *self.history.lock().unwrap() = history;
    }

    pub(crate) fn calls(&self, method: &str) -> usize {
        *self.calls.lock().unwrap().get(method).unwrap_or(&0)
    }

    pub(crate) fn last_submission(&self) -> Option<LinkSubmission> {
        self.last_submission.lock().unwrap().clone()
    }

    pub(crate) fn question(id: &str, resolved: bool) -> Question {
        Question {
            session_id: id.to_string(),
            question: format!("What about {id}?"),
            status: resolved.then_some(ResolutionStatus::Manual),
        }
    }

    pub(crate) fn link_row(url: &str, status: &str) -> LinkStatusRow {
        LinkStatusRow {
            url: url.to_string(),
            date: "2024-05-01".to_string(),
            status: status.to_string(),
        }
    }

    fn record(&self, method: &'static str) -> Result<()> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        if self.failing.contains(method) {
            return Err(ClarionError::backend(500, format!("{method} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl ClarifyGateway for MockGateway {
    async fn projects(&self) -> Result<Vec<String>> {
        self.record("projects")?;
        Ok(self.projects.clone())
    }

    async fn epics(&self, _project: &str) -> Result<Vec<EpicRef>> {
        self.record("epics")?;
        Ok(self.epics.clone())
    }

    async fn tickets(&self, _project: &str, _epic_key: &str) -> Result<Vec<TicketRef>> {
        self.record("tickets")?;
        Ok(self.tickets.clone())
    }

    async fn content(&self, _scope: &TicketScope) -> Result<ContentData> {
        self.record("content")?;
        Ok(self.content.clone())
    }

    async fn request_question(&self, _scope: &TicketScope) -> Result<bool> {
        self.record("request_question")?;
        Ok(true)
    }

    async fn questions(&self, _scope: &TicketScope) -> Result<Vec<Question>> {
        self.record("questions")?;
        Ok(self.questions.lock().unwrap().clone())
    }

    async fn suggestion(&self, _scope: &TicketScope, _session_id: &str) -> Result<Option<String>> {
        self.record("suggestion")?;
        Ok(self.suggestion.clone())
    }

    async fn send_clarify(
        &self,
        _scope: &TicketScope,
        _session_id: &str,
        _user_message: &str,
    ) -> Result<()> {
        self.record("send_clarify")
    }

    async fn session_history(&self, _session_id: &str) -> Result<Vec<ChatEntry>> {
        self.record("session_history")?;
        Ok(self.history.lock().unwrap().clone())
    }

    async fn mark_resolved(
        &self,
        _session_id: &str,
        _status: Option<ResolutionStatus>,
    ) -> Result<()> {
        self.record("mark_resolved")
    }

    async fn link_table(
        &self,
        _project: &str,
        _epic_key: Option<&str>,
        _ticket_key: Option<&str>,
    ) -> Result<Vec<LinkStatusRow>> {
        self.record("link_table")?;
        Ok(self.link_rows.clone())
    }

    async fn add_links(&self, submission: &LinkSubmission) -> Result<()> {
        self.record("add_links")?;
        *self.last_submission.lock().unwrap() = Some(submission.clone());
        Ok(())
    }

    async fn prompt(&self, _role: PromptRole) -> Result<PromptTemplate> {
        self.record("prompt")?;
        Ok(self.prompt.clone().unwrap_or(PromptTemplate {
            contextualize_q_system_prompt: String::new(),
            qa_system_prompt: String::new(),
        }))
    }

    async fn set_prompt(&self, _role: PromptRole, _template: &PromptTemplate) -> Result<()> {
        self.record("set_prompt")
    }
}
