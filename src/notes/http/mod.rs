use axum::{Router, routing::get};

use crate::AppState;
mod dto;
pub(crate) mod handlers;

pub use dto::{CategoriesResponse, NotesQuery};
pub use handlers::{clear_draft, get_draft, get_note, list_categories, list_notes, save_draft};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes))
        .route("/notes/{id}", get(get_note))
        .route("/categories", get(list_categories))
        .route("/draft", get(get_draft).put(save_draft).delete(clear_draft))
}
