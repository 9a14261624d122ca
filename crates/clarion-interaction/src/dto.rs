//! Wire types for the backend REST endpoints.
//!
//! The backend spells its JSON fields in camelCase with a few quirks
//! (`sessionID` vs `sessionId`, history rows keyed by sender name); these
//! types absorb all of that so the domain layer stays clean.

use clarion_core::chat::ChatEntry;
use clarion_core::portal::{LinkStatusRow, LinkSubmission};
use clarion_core::prompt::{PromptRole, PromptTemplate};
use clarion_core::question::ResolutionStatus;
use clarion_core::selection::{ContentData, EpicRef, TicketRef, TicketScope};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub(crate) struct EpicsResponse {
    pub epics: Vec<EpicDto>,
}

#[derive(Deserialize)]
pub(crate) struct EpicDto {
    pub key: String,
    pub name: String,
}

impl From<EpicDto> for EpicRef {
    fn from(dto: EpicDto) -> Self {
        EpicRef {
            key: dto.key,
            name: dto.name,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct TicketsResponse {
    pub tickets: Vec<TicketDto>,
}

#[derive(Deserialize)]
pub(crate) struct TicketDto {
    pub key: String,
    pub name: String,
    pub url: String,
}

impl From<TicketDto> for TicketRef {
    fn from(dto: TicketDto) -> Self {
        TicketRef {
            key: dto.key,
            name: dto.name,
            url: dto.url,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ContentDto {
    pub title: String,
    pub content: String,
}

impl From<ContentDto> for ContentData {
    fn from(dto: ContentDto) -> Self {
        ContentData {
            title: dto.title,
            content: dto.content,
        }
    }
}

/// The POST body shared by the content/question/clarification endpoints.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScopeBody<'a> {
    pub project_name: &'a str,
    pub epic_key: &'a str,
    pub ticket_key: &'a str,
    pub url: &'a str,
}

impl<'a> From<&'a TicketScope> for ScopeBody<'a> {
    fn from(scope: &'a TicketScope) -> Self {
        ScopeBody {
            project_name: &scope.project_name,
            epic_key: &scope.epic_key,
            ticket_key: &scope.ticket_key,
            url: &scope.url,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct AckResponse {
    #[serde(default)]
    pub success: bool,
}

/// `getSuggestion` reports success as a fixed sentinel string.
pub(crate) const SUGGESTION_SUCCESS: &str = "Questions generated successfully";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SuggestionBody<'a> {
    #[serde(flatten)]
    pub scope: ScopeBody<'a>,
    pub session_id: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct SuggestionResponse {
    #[serde(default)]
    pub success: String,
    #[serde(default)]
    pub response: String,
}

impl SuggestionResponse {
    pub fn into_suggestion(self) -> Option<String> {
        (self.success == SUGGESTION_SUCCESS).then_some(self.response)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClarifyBody<'a> {
    pub project_name: &'a str,
    pub epic_key: &'a str,
    pub url: &'a str,
    pub session_id: &'a str,
    pub user_message: &'a str,
}

/// One history row: an object keyed by the sender's name.
#[derive(Deserialize)]
pub(crate) struct HistoryRowDto {
    #[serde(rename = "Human")]
    pub human: Option<String>,
    #[serde(rename = "Agent")]
    pub agent: Option<String>,
}

impl HistoryRowDto {
    /// A row with neither key (or only empty strings) is dropped.
    pub fn into_entry(self) -> Option<ChatEntry> {
        match self.human {
            Some(content) if !content.is_empty() => Some(ChatEntry::human(content)),
            _ => self.agent.map(ChatEntry::agent),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct MarkResolvedBody<'a> {
    #[serde(rename = "sessionID")]
    pub session_id: &'a str,
    pub status: Option<ResolutionStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LinkTableBody<'a> {
    pub project_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_key: Option<&'a str>,
}

/// `getLink` wraps the table in a single-element array.
#[derive(Deserialize)]
pub(crate) struct LinkTableItem {
    pub links_status: Vec<LinkStatusRow>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddLinksBody<'a> {
    pub project_name: &'a str,
    pub github_link: &'a [String],
    pub jira_link: &'a [String],
    pub docs_link: &'a [String],
    pub confluence_link: &'a [String],
}

impl<'a> From<&'a LinkSubmission> for AddLinksBody<'a> {
    fn from(submission: &'a LinkSubmission) -> Self {
        AddLinksBody {
            project_name: &submission.project_name,
            github_link: &submission.github,
            jira_link: &submission.jira,
            docs_link: &submission.docs,
            confluence_link: &submission.confluence,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct SetPromptBody<'a> {
    #[serde(flatten)]
    pub template: &'a PromptTemplate,
    pub role: PromptRole,
}
