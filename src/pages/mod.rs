//! Server-rendered HTML pages.

use axum::{
    Router,
    response::Redirect,
    routing::get,
};

use crate::AppState;

mod create;
mod filter;
pub mod views;

pub use create::{create_note, new_note_form};
pub use filter::filter_notes;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notes_home))
        .route("/notes", get(notes_home))
        .route("/notes/filter/{*slug}", get(filter_notes))
        .route(
            crate::notes::form::CREATE_PATH,
            get(new_note_form).post(create_note),
        )
}

async fn notes_home() -> Redirect {
    Redirect::temporary("/notes/filter/All")
}

pub async fn not_found() -> crate::error::ApiError {
    crate::error::ApiError::PageNotFound
}
