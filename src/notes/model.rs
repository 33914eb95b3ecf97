use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Tag {
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::Todo,
        Tag::Work,
        Tag::Personal,
        Tag::Meeting,
        Tag::Shopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Todo => "Todo",
            Tag::Work => "Work",
            Tag::Personal => "Personal",
            Tag::Meeting => "Meeting",
            Tag::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tag: {}", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Filter value of the notes list: either every note or one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Tag(Tag),
}

/// Every servable category, in navigation order.
pub const CATEGORIES: [Category; 6] = [
    Category::All,
    Category::Tag(Tag::Todo),
    Category::Tag(Tag::Work),
    Category::Tag(Tag::Personal),
    Category::Tag(Tag::Meeting),
    Category::Tag(Tag::Shopping),
];

impl Category {
    pub fn parse(slug: &str) -> Option<Category> {
        CATEGORIES
            .into_iter()
            .find(|category| category.as_str() == slug)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Tag(tag) => tag.as_str(),
        }
    }

    /// `All` carries no tag filter.
    pub fn tag(self) -> Option<Tag> {
        match self {
            Category::All => None,
            Category::Tag(tag) => Some(tag),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tag: Tag,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// One page of the remote list-notes response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

/// Raw values of the note form, also the shape of a saved draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoteFormValues {
    pub title: String,
    pub content: String,
    pub tag: Tag,
}

impl Default for NoteFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: Tag::Todo,
        }
    }
}

/// A validated note ready to be sent to the notes service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tag: Tag,
}

/// Parameters of one list-notes request; the payload of a notes query key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListParams {
    pub page: u32,
    pub per_page: u32,
    pub search: String,
    pub tag: Option<Tag>,
}

impl NoteListParams {
    pub fn first_page(tag: Option<Tag>) -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: String::new(),
            tag,
        }
    }
}

pub const DEFAULT_PER_PAGE: u32 = 8;
