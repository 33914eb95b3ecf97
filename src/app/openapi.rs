use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "NoteHub", description = "NoteHub client API"),
    paths(
        crate::core::http::handlers::health,
        crate::notes::http::handlers::list_notes,
        crate::notes::http::handlers::get_note,
        crate::notes::http::handlers::list_categories,
        crate::notes::http::handlers::get_draft,
        crate::notes::http::handlers::save_draft,
        crate::notes::http::handlers::clear_draft
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::notes::model::Tag,
        crate::notes::model::Note,
        crate::notes::model::NotesPage,
        crate::notes::model::NoteFormValues,
        crate::notes::http::CategoriesResponse
    )),
    tags(
        (name = "Core", description = "Service endpoints"),
        (name = "Notes", description = "Cached note list reads"),
        (name = "Drafts", description = "Unsaved note draft of the current session")
    )
)]
pub struct ApiDoc;
