//! The gateway trait: the seam between the views and the backend REST
//! service.
//!
//! The application layer only ever talks to `dyn ClarifyGateway`, which
//! keeps the usecases testable against an in-memory mock and decouples
//! them from the HTTP client.

use crate::chat::ChatEntry;
use crate::error::Result;
use crate::portal::{LinkStatusRow, LinkSubmission};
use crate::prompt::{PromptRole, PromptTemplate};
use crate::question::{Question, ResolutionStatus};
use crate::selection::{ContentData, EpicRef, TicketRef, TicketScope};
use async_trait::async_trait;

/// Abstract client for the clarification backend.
///
/// One method per REST endpoint; wire-format concerns (field spellings,
/// envelope shapes) stay inside the implementation.
#[async_trait]
pub trait ClarifyGateway: Send + Sync {
    /// `GET /getProjectsList`
    async fn projects(&self) -> Result<Vec<String>>;

    /// `GET /getEpicsList?projectName=`
    async fn epics(&self, project: &str) -> Result<Vec<EpicRef>>;

    /// `GET /getTicketsList?projectName=&epicKey=`
    async fn tickets(&self, project: &str, epic_key: &str) -> Result<Vec<TicketRef>>;

    /// `POST /getContentData`
    async fn content(&self, scope: &TicketScope) -> Result<ContentData>;

    /// `POST /getQuestion` — asks the backend to generate a clarification
    /// question for the scope. Returns whether the backend reported success.
    async fn request_question(&self, scope: &TicketScope) -> Result<bool>;

    /// `POST /getQuestionfromDatabase` — the stored question list for the
    /// scope.
    async fn questions(&self, scope: &TicketScope) -> Result<Vec<Question>>;

    /// `POST /getSuggestion` — a canned follow-up for the open thread, when
    /// the backend has one.
    async fn suggestion(&self, scope: &TicketScope, session_id: &str) -> Result<Option<String>>;

    /// `POST /getClarify` — sends a user message into the thread. The reply
    /// is not returned here; the next history poll surfaces it.
    async fn send_clarify(
        &self,
        scope: &TicketScope,
        session_id: &str,
        user_message: &str,
    ) -> Result<()>;

    /// `GET /getSessionHistory?sessionId=` — the full thread transcript,
    /// chronological.
    async fn session_history(&self, session_id: &str) -> Result<Vec<ChatEntry>>;

    /// `POST /markResolved`
    async fn mark_resolved(
        &self,
        session_id: &str,
        status: Option<ResolutionStatus>,
    ) -> Result<()>;

    /// `POST /getLink` — the ingested-dataset table for the selection.
    async fn link_table(
        &self,
        project: &str,
        epic_key: Option<&str>,
        ticket_key: Option<&str>,
    ) -> Result<Vec<LinkStatusRow>>;

    /// `POST /addToDatabase`
    async fn add_links(&self, submission: &LinkSubmission) -> Result<()>;

    /// `GET /getPrompt?role=`
    async fn prompt(&self, role: PromptRole) -> Result<PromptTemplate>;

    /// `POST /setPrompt`
    async fn set_prompt(&self, role: PromptRole, template: &PromptTemplate) -> Result<()>;
}
