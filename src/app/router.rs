use axum::{Router, routing::get};

use crate::AppState;
use crate::app::docs;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(crate::core::http::routes())
        .merge(crate::pages::routes())
        .nest("/api", crate::notes::http::routes())
        .route("/docs", get(docs::swagger_ui))
        .route(docs::OPENAPI_JSON_PATH, get(docs::openapi_spec))
        .fallback(crate::pages::not_found)
        .with_state(state)
}
