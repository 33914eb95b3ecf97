use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;

use crate::notes::model::{NewNote, Note, NoteListParams, NotesPage, Tag};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("notes service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notes service responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("note not found")]
    NotFound,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListNotesQuery<'a> {
    page: u32,
    per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<Tag>,
}

/// Client of the remote notes service.
#[derive(Clone)]
pub struct NotesClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl NotesClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `search` is sent only when non-empty, `tag` only when filtering.
    pub async fn list_notes(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        tag: Option<Tag>,
    ) -> Result<NotesPage, ClientError> {
        let query = ListNotesQuery {
            page,
            per_page,
            search: search.filter(|s| !s.is_empty()),
            tag,
        };
        tracing::debug!(page, per_page, ?tag, "listing notes");

        let response = self
            .authorized(self.http.get(format!("{}/notes", self.base_url)))
            .query(&query)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn list_notes_for(&self, params: &NoteListParams) -> Result<NotesPage, ClientError> {
        self.list_notes(
            params.page,
            params.per_page,
            Some(params.search.as_str()),
            params.tag,
        )
        .await
    }

    pub async fn create_note(&self, note: &NewNote) -> Result<Note, ClientError> {
        let response = self
            .authorized(self.http.post(format!("{}/notes", self.base_url)))
            .json(note)
            .send()
            .await?;
        let response = check_status(response).await?;
        let created: Note = response.json().await?;
        tracing::info!(note_id = %created.id, tag = %created.tag, "note created");
        Ok(created)
    }

    pub async fn fetch_note(&self, id: &str) -> Result<Note, ClientError> {
        let response = self
            .authorized(self.http.get(format!("{}/notes/{id}", self.base_url)))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}
