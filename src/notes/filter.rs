use crate::notes::model::{CATEGORIES, Category, NoteListParams};
use crate::query_cache::QueryKey;

pub const OG_IMAGE_URL: &str = "https://ac.goit.global/fullstack/react/notehub-og-meta.jpg";
pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;

const NOT_FOUND_TITLE: &str = "NoteHub - Not found";
const NOT_FOUND_DESCRIPTION: &str = "This category does not exist.";

/// Validates the filter route's slug segments.
///
/// Only the statically enumerated parameter sets are servable, so the slug
/// must be exactly one segment naming a known category.
pub fn resolve_category<S: AsRef<str>>(segments: &[S]) -> Option<Category> {
    match segments {
        [slug] => Category::parse(slug.as_ref()),
        _ => None,
    }
}

/// Splits the catch-all path into segments, dropping empty ones.
pub fn slug_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Every slug parameter set the filter route serves.
pub fn static_params() -> Vec<Vec<String>> {
    CATEGORIES
        .iter()
        .map(|category| vec![category.as_str().to_string()])
        .collect()
}

pub fn filter_path(category: Category) -> String {
    format!("/notes/filter/{category}")
}

/// Key of the first page prefetched for `category`.
pub fn prefetch_key(category: Category) -> QueryKey {
    QueryKey::notes(NoteListParams::first_page(category.tag()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub image_url: &'static str,
    pub image_width: u32,
    pub image_height: u32,
    pub image_alt: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub open_graph: OpenGraph,
}

impl PageMetadata {
    pub fn new(title: String, description: String, url: Option<String>) -> Self {
        Self {
            open_graph: OpenGraph {
                title: title.clone(),
                description: description.clone(),
                url,
                image_url: OG_IMAGE_URL,
                image_width: OG_IMAGE_WIDTH,
                image_height: OG_IMAGE_HEIGHT,
                image_alt: "NoteHub",
            },
            title,
            description,
        }
    }
}

/// Metadata of the filter page; `None` describes the not-found page.
pub fn page_metadata(category: Option<Category>, site_url: &str) -> PageMetadata {
    let Some(category) = category else {
        return PageMetadata::new(
            NOT_FOUND_TITLE.to_string(),
            NOT_FOUND_DESCRIPTION.to_string(),
            None,
        );
    };

    let description = match category {
        Category::All => "Browse all notes in NoteHub".to_string(),
        Category::Tag(tag) => format!("Notes filtered by category: {tag}"),
    };
    let url = format!("{}{}", site_url.trim_end_matches('/'), filter_path(category));
    PageMetadata::new(format!("NoteHub - {category}"), description, Some(url))
}
