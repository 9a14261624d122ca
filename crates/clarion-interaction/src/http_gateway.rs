//! Reqwest implementation of [`ClarifyGateway`].

use crate::dto::{
    AckResponse, AddLinksBody, ClarifyBody, ContentDto, EpicsResponse, HistoryRowDto,
    LinkTableBody, LinkTableItem, MarkResolvedBody, ScopeBody, SetPromptBody, SuggestionBody,
    SuggestionResponse, TicketsResponse,
};
use async_trait::async_trait;
use clarion_core::chat::ChatEntry;
use clarion_core::error::Result;
use clarion_core::gateway::ClarifyGateway;
use clarion_core::portal::{LinkStatusRow, LinkSubmission};
use clarion_core::prompt::{PromptRole, PromptTemplate};
use clarion_core::question::{Question, ResolutionStatus};
use clarion_core::selection::{ContentData, EpicRef, TicketRef, TicketScope};
use clarion_core::ClarionError;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// HTTP client for the clarification backend.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway against the given base URL (no trailing slash
    /// required).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!(target: "clarion::gateway", path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        parse_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(target: "clarion::gateway", path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        parse_json(response).await
    }

    /// POST where only the status matters; the body is drained and ignored.
    async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        tracing::debug!(target: "clarion::gateway", path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await.map(|_| ())
    }
}

fn transport_error(err: reqwest::Error) -> ClarionError {
    ClarionError::transport(
        format!("request failed: {err}"),
        err.is_connect() || err.is_timeout(),
    )
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    Err(ClarionError::backend(status.as_u16(), body))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|err| ClarionError::internal(format!("failed to parse backend response: {err}")))
}

#[async_trait]
impl ClarifyGateway for HttpGateway {
    async fn projects(&self) -> Result<Vec<String>> {
        self.get_json("/getProjectsList", &[]).await
    }

    async fn epics(&self, project: &str) -> Result<Vec<EpicRef>> {
        let response: EpicsResponse = self
            .get_json("/getEpicsList", &[("projectName", project)])
            .await?;
        Ok(response.epics.into_iter().map(Into::into).collect())
    }

    async fn tickets(&self, project: &str, epic_key: &str) -> Result<Vec<TicketRef>> {
        let response: TicketsResponse = self
            .get_json(
                "/getTicketsList",
                &[("projectName", project), ("epicKey", epic_key)],
            )
            .await?;
        Ok(response.tickets.into_iter().map(Into::into).collect())
    }

    async fn content(&self, scope: &TicketScope) -> Result<ContentData> {
        let dto: ContentDto = self
            .post_json("/getContentData", &ScopeBody::from(scope))
            .await?;
        Ok(dto.into())
    }

    async fn request_question(&self, scope: &TicketScope) -> Result<bool> {
        let ack: AckResponse = self
            .post_json("/getQuestion", &ScopeBody::from(scope))
            .await?;
        Ok(ack.success)
    }

    async fn questions(&self, scope: &TicketScope) -> Result<Vec<Question>> {
        self.post_json("/getQuestionfromDatabase", &ScopeBody::from(scope))
            .await
    }

    async fn suggestion(&self, scope: &TicketScope, session_id: &str) -> Result<Option<String>> {
        let response: SuggestionResponse = self
            .post_json(
                "/getSuggestion",
                &SuggestionBody {
                    scope: ScopeBody::from(scope),
                    session_id,
                },
            )
            .await?;
        Ok(response.into_suggestion())
    }

    async fn send_clarify(
        &self,
        scope: &TicketScope,
        session_id: &str,
        user_message: &str,
    ) -> Result<()> {
        self.post_ack(
            "/getClarify",
            &ClarifyBody {
                project_name: &scope.project_name,
                epic_key: &scope.epic_key,
                url: &scope.url,
                session_id,
                user_message,
            },
        )
        .await
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<ChatEntry>> {
        let rows: Vec<HistoryRowDto> = self
            .get_json("/getSessionHistory", &[("sessionId", session_id)])
            .await?;
        Ok(rows.into_iter().filter_map(HistoryRowDto::into_entry).collect())
    }

    async fn mark_resolved(
        &self,
        session_id: &str,
        status: Option<ResolutionStatus>,
    ) -> Result<()> {
        self.post_ack("/markResolved", &MarkResolvedBody { session_id, status })
            .await
    }

    async fn link_table(
        &self,
        project: &str,
        epic_key: Option<&str>,
        ticket_key: Option<&str>,
    ) -> Result<Vec<LinkStatusRow>> {
        let items: Vec<LinkTableItem> = self
            .post_json(
                "/getLink",
                &LinkTableBody {
                    project_name: project,
                    epic_key,
                    ticket_key,
                },
            )
            .await?;
        // The backend wraps the table in a single-element array; an empty
        // array means no dataset yet.
        Ok(items
            .into_iter()
            .next()
            .map(|item| item.links_status)
            .unwrap_or_default())
    }

    async fn add_links(&self, submission: &LinkSubmission) -> Result<()> {
        self.post_ack("/addToDatabase", &AddLinksBody::from(submission))
            .await
    }

    async fn prompt(&self, role: PromptRole) -> Result<PromptTemplate> {
        let role = role.to_string();
        self.get_json("/getPrompt", &[("role", role.as_str())]).await
    }

    async fn set_prompt(&self, role: PromptRole, template: &PromptTemplate) -> Result<()> {
        self.post_ack("/setPrompt", &SetPromptBody { template, role })
            .await
    }
}
