use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::session::{ClientSession, SessionCookie},
    notes::filter::{page_metadata, prefetch_key, resolve_category, slug_segments},
    notes::model::NotesPage,
    query_cache::QueryCache,
};

use super::views;

/// Renders `/notes/filter/{category}` with page 1 prefetched.
///
/// The prefetch runs in a cache scoped to this request; its settled state is
/// embedded in the page and handed to the session cache, so the first client
/// read of the same key needs no round trip.
pub async fn filter_notes(
    client: ClientSession,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<(SessionCookie, Html<String>)> {
    let category = resolve_category(&slug_segments(&slug)).ok_or(ApiError::PageNotFound)?;

    let key = prefetch_key(category);
    let cache: QueryCache<NotesPage> = QueryCache::new();
    let page = cache
        .get_or_fetch(&key, || state.notes_api.list_notes_for(key.params()))
        .await?;
    tracing::debug!(%category, notes = page.notes.len(), "filter page prefetched");

    let dehydrated = cache.dehydrate();
    let state_json =
        serde_json::to_string(&dehydrated).map_err(|e| ApiError::Internal(e.to_string()))?;
    client.cache.hydrate(dehydrated);

    let meta = page_metadata(Some(category), &state.config.site_url);
    Ok((
        client.cookie(),
        Html(views::filter_page(&meta, category, &page, &state_json)),
    ))
}
