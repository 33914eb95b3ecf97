use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::notes::model::{
    CONTENT_MAX_CHARS, NewNote, NoteFormValues, TITLE_MAX_CHARS, TITLE_MIN_CHARS, Tag,
};

pub const CREATE_PATH: &str = "/notes/action/create";
pub const DEFAULT_CANCEL_PATH: &str = "/notes";

/// Picks the values a form starts from: explicit values first, then the
/// draft when rendering the create route, then defaults.
pub fn resolve_initial_values(
    initial: Option<NoteFormValues>,
    path: &str,
    draft: Option<NoteFormValues>,
) -> NoteFormValues {
    if let Some(values) = initial {
        return values;
    }
    if path == CREATE_PATH {
        if let Some(draft) = draft {
            return draft;
        }
    }
    NoteFormValues::default()
}

/// Raw fields posted by the note form. Absent fields fall back to the
/// form's initial values.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NoteFormInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tag: Option<String>,
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRejection {
    TitleLength(usize),
    ContentTooLong(usize),
    UnknownTag(String),
}

impl NoteFormInput {
    /// Values to show when the form is rendered again after a rejection.
    pub fn values_or(&self, init: &NoteFormValues) -> NoteFormValues {
        NoteFormValues {
            title: self.title.clone().unwrap_or_else(|| init.title.clone()),
            content: self.content.clone().unwrap_or_else(|| init.content.clone()),
            tag: self
                .tag
                .as_deref()
                .and_then(|tag| tag.parse().ok())
                .unwrap_or(init.tag),
        }
    }

    pub fn validate(&self, init: &NoteFormValues) -> Result<NewNote, FormRejection> {
        let title = self.title.as_deref().unwrap_or(&init.title).trim();
        let content = self.content.as_deref().unwrap_or(&init.content);
        let tag = self.tag.as_deref().unwrap_or(init.tag.as_str());

        let title_len = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
            return Err(FormRejection::TitleLength(title_len));
        }
        let content_len = content.chars().count();
        if content_len > CONTENT_MAX_CHARS {
            return Err(FormRejection::ContentTooLong(content_len));
        }
        let tag: Tag = tag
            .parse()
            .map_err(|_| FormRejection::UnknownTag(tag.to_string()))?;

        Ok(NewNote {
            title: title.to_string(),
            content: content.to_string(),
            tag,
        })
    }
}

/// Where cancel and a successful submit lead. Only local paths are honored.
pub fn cancel_destination(return_to: Option<&str>) -> String {
    match return_to {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path.to_string()
        }
        _ => DEFAULT_CANCEL_PATH.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
}

impl FormState {
    pub fn submit_label(self) -> &'static str {
        match self {
            FormState::Idle => "Create note",
            FormState::Submitting => "Creating...",
        }
    }
}

/// Allows one create request in flight per form.
#[derive(Debug, Default)]
pub struct FormGate {
    submitting: AtomicBool,
}

impl FormGate {
    pub fn state(&self) -> FormState {
        if self.submitting.load(Ordering::Acquire) {
            FormState::Submitting
        } else {
            FormState::Idle
        }
    }

    /// `None` while another submission is pending.
    pub fn try_begin(&self) -> Option<SubmitGuard<'_>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard { gate: self })
    }
}

/// Returns the gate to idle when dropped.
pub struct SubmitGuard<'a> {
    gate: &'a FormGate,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.gate.submitting.store(false, Ordering::Release);
    }
}
