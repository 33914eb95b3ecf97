use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::ApiResult,
    extractors::session::{ClientSession, SessionCookie},
    notes::form::{
        CREATE_PATH, FormState, NoteFormInput, cancel_destination, resolve_initial_values,
    },
    query_cache::NOTES_SCOPE,
};

use super::views;

#[derive(Deserialize)]
pub struct CreateFormQuery {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

pub async fn new_note_form(
    client: ClientSession,
    Query(q): Query<CreateFormQuery>,
) -> (SessionCookie, Html<String>) {
    let values = resolve_initial_values(None, CREATE_PATH, client.draft.get());
    let cancel_to = cancel_destination(q.return_to.as_deref());
    let body = views::note_form_page(&values, &cancel_to, client.form.state());
    (client.cookie(), Html(body))
}

/// Handles the note form. Rejected input re-renders the form without
/// contacting the notes service; a created note invalidates every cached
/// notes list, clears the draft and redirects to the cancel destination.
pub async fn create_note(
    client: ClientSession,
    State(state): State<AppState>,
    Form(input): Form<NoteFormInput>,
) -> ApiResult<Response> {
    let init = resolve_initial_values(None, CREATE_PATH, client.draft.get());
    let cancel_to = cancel_destination(input.return_to.as_deref());

    let note = match input.validate(&init) {
        Ok(note) => note,
        Err(rejection) => {
            tracing::debug!(session_id = %client.id, ?rejection, "note form rejected");
            let body = views::note_form_page(&input.values_or(&init), &cancel_to, FormState::Idle);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, client.cookie(), Html(body)).into_response());
        }
    };

    let Some(_submitting) = client.form.try_begin() else {
        tracing::warn!(session_id = %client.id, "note submission already in flight");
        let body =
            views::note_form_page(&input.values_or(&init), &cancel_to, FormState::Submitting);
        return Ok((StatusCode::CONFLICT, client.cookie(), Html(body)).into_response());
    };

    let created = state.notes_api.create_note(&note).await?;

    let invalidated = client.cache.invalidate_scope(NOTES_SCOPE);
    client.draft.clear();
    tracing::info!(
        session_id = %client.id,
        note_id = %created.id,
        invalidated,
        "note form submitted"
    );

    Ok((client.cookie(), Redirect::to(&cancel_to)).into_response())
}
