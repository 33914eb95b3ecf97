use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::session::ClientSession,
    notes::client::ClientError,
    notes::filter::static_params,
    notes::model::{CATEGORIES, DEFAULT_PER_PAGE, Note, NoteFormValues, NoteListParams, NotesPage, Tag},
    query_cache::QueryKey,
};

use super::dto::{CategoriesResponse, NotesQuery};

const MAX_PER_PAGE: u32 = 50;

#[utoipa::path(
    get,
    path = "/api/notes",
    params(NotesQuery),
    responses(
        (status = 200, description = "One page of notes", body = NotesPage),
        (status = 400, description = "Invalid query", body = crate::error::ErrorBody),
        (status = 502, description = "Notes service failed", body = crate::error::ErrorBody)
    ),
    tag = "Notes"
)]
pub async fn list_notes(
    client: ClientSession,
    State(state): State<AppState>,
    Query(q): Query<NotesQuery>,
) -> ApiResult<Response> {
    let tag = match q.tag.as_deref() {
        None | Some("") | Some("All") => None,
        Some(raw) => Some(
            raw.parse::<Tag>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        ),
    };
    let params = NoteListParams {
        page: q.page.unwrap_or(1).max(1),
        per_page: q.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        search: q.search.unwrap_or_default(),
        tag,
    };

    let key = QueryKey::notes(params);
    let page = client
        .cache
        .get_or_fetch(&key, || state.notes_api.list_notes_for(key.params()))
        .await?;

    Ok((client.cookie(), Json(page)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = String, Path, description = "Note id")
    ),
    responses(
        (status = 200, description = "Note", body = Note),
        (status = 404, description = "Note not found", body = crate::error::ErrorBody),
        (status = 502, description = "Notes service failed", body = crate::error::ErrorBody)
    ),
    tag = "Notes"
)]
pub async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let valid_id = note_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if note_id.is_empty() || !valid_id {
        return Err(ApiError::NotFound);
    }

    let note = state
        .notes_api
        .fetch_note(&note_id)
        .await
        .map_err(|e| match e {
            ClientError::NotFound => ApiError::NotFound,
            other => ApiError::Upstream(other),
        })?;
    Ok((StatusCode::OK, Json(note)))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Servable filter categories", body = CategoriesResponse)
    ),
    tag = "Notes"
)]
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: CATEGORIES.iter().map(|c| c.as_str().to_string()).collect(),
        static_params: static_params(),
    })
}

#[utoipa::path(
    get,
    path = "/api/draft",
    responses(
        (status = 200, description = "Saved draft", body = NoteFormValues),
        (status = 204, description = "No draft saved")
    ),
    tag = "Drafts"
)]
pub async fn get_draft(client: ClientSession) -> Response {
    match client.draft.get() {
        Some(draft) => (client.cookie(), Json(draft)).into_response(),
        None => (StatusCode::NO_CONTENT, client.cookie(), ()).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/draft",
    request_body = NoteFormValues,
    responses(
        (status = 200, description = "Draft saved", body = NoteFormValues),
        (status = 422, description = "Invalid draft payload", body = crate::error::ErrorBody)
    ),
    tag = "Drafts"
)]
pub async fn save_draft(
    client: ClientSession,
    payload: Result<Json<NoteFormValues>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(session_id = %client.id, "draft rejected: {}", rejection.body_text());
            return (client.cookie(), ApiError::from(rejection)).into_response();
        }
    };
    client.draft.set(draft.clone());
    tracing::debug!(session_id = %client.id, "draft saved");
    (client.cookie(), Json(draft)).into_response()
}

#[utoipa::path(
    delete,
    path = "/api/draft",
    responses(
        (status = 204, description = "Draft cleared")
    ),
    tag = "Drafts"
)]
pub async fn clear_draft(client: ClientSession) -> Response {
    client.draft.clear();
    (StatusCode::NO_CONTENT, client.cookie(), ()).into_response()
}
