use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::notes::filter::{PageMetadata, filter_path, page_metadata};
use crate::notes::form::{CREATE_PATH, FormState};
use crate::notes::model::{
    CATEGORIES, CONTENT_MAX_CHARS, Category, NoteFormValues, NotesPage, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS, Tag,
};

pub const STATE_SCRIPT_ID: &str = "__NOTEHUB_STATE__";

fn layout(meta: &PageMetadata, main: &str) -> String {
    let og = &meta.open_graph;
    let og_url = og
        .url
        .as_deref()
        .map(|url| format!("\n  <meta property=\"og:url\" content=\"{}\" />", attr(url)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <meta name="description" content="{description}" />
  <meta property="og:title" content="{og_title}" />
  <meta property="og:description" content="{og_description}" />{og_url}
  <meta property="og:image" content="{og_image}" />
  <meta property="og:image:width" content="{og_width}" />
  <meta property="og:image:height" content="{og_height}" />
  <meta property="og:image:alt" content="{og_alt}" />
</head>
<body>
  <header><a href="/notes">NoteHub</a> <a href="{create}">Create note +</a></header>
  <main>
{main}
  </main>
</body>
</html>
"#,
        title = text(&meta.title),
        description = attr(&meta.description),
        og_title = attr(&og.title),
        og_description = attr(&og.description),
        og_image = attr(og.image_url),
        og_width = og.image_width,
        og_height = og.image_height,
        og_alt = attr(og.image_alt),
        create = CREATE_PATH,
    )
}

fn category_nav(active: Category) -> String {
    let mut nav = String::from("    <nav><ul>\n");
    for category in CATEGORIES {
        let current = if category == active {
            r#" aria-current="page""#
        } else {
            ""
        };
        let _ = writeln!(
            nav,
            r#"      <li><a href="{}"{current}>{}</a></li>"#,
            attr(&filter_path(category)),
            text(category.as_str()),
        );
    }
    nav.push_str("    </ul></nav>\n");
    nav
}

/// The filtered notes list with the dehydrated cache state embedded.
pub fn filter_page(
    meta: &PageMetadata,
    category: Category,
    page: &NotesPage,
    state_json: &str,
) -> String {
    let mut main = category_nav(category);

    if page.notes.is_empty() {
        main.push_str("    <p>No notes found.</p>\n");
    } else {
        main.push_str("    <ul class=\"notes\">\n");
        for note in &page.notes {
            let _ = writeln!(
                main,
                r#"      <li data-note-id="{}"><h2>{}</h2><p>{}</p><span class="tag">{}</span></li>"#,
                attr(&note.id),
                text(&note.title),
                text(&note.content),
                note.tag,
            );
        }
        main.push_str("    </ul>\n");
    }
    let _ = writeln!(main, "    <p>Total pages: {}</p>", page.total_pages);

    let state_json = script_safe_json(state_json);
    let _ = writeln!(
        main,
        r#"    <script id="{STATE_SCRIPT_ID}" type="application/json">{state_json}</script>"#
    );

    layout(meta, &main)
}

pub fn not_found_page() -> String {
    let meta = page_metadata(None, "");
    let main = format!(
        "    <h1>404</h1>\n    <p>{}</p>\n    <a href=\"/notes\">Back to notes</a>\n",
        text(&meta.description)
    );
    layout(&meta, &main)
}

pub fn note_form_page(values: &NoteFormValues, cancel_to: &str, state: FormState) -> String {
    let mut options = String::new();
    for tag in Tag::ALL {
        let selected = if tag == values.tag { " selected" } else { "" };
        let _ = writeln!(
            options,
            r#"          <option value="{tag}"{selected}>{tag}</option>"#
        );
    }
    let disabled = match state {
        FormState::Submitting => " disabled",
        FormState::Idle => "",
    };

    let main = format!(
        r#"    <h1>Create note</h1>
    <form id="note-form" method="post" action="{CREATE_PATH}">
      <input type="hidden" name="returnTo" value="{cancel_attr}" />
      <div>
        <label for="title">Title</label>
        <input id="title" name="title" type="text" value="{title}" required minlength="{TITLE_MIN_CHARS}" maxlength="{TITLE_MAX_CHARS}" />
      </div>
      <div>
        <label for="content">Content</label>
        <textarea id="content" name="content" rows="8" maxlength="{CONTENT_MAX_CHARS}">{content}</textarea>
      </div>
      <div>
        <label for="tag">Tag</label>
        <select id="tag" name="tag" required>
{options}        </select>
      </div>
      <div>
        <a class="cancel" href="{cancel_attr}">Cancel</a>
        <button type="submit"{disabled}>{label}</button>
      </div>
    </form>
"#,
        cancel_attr = attr(cancel_to),
        title = attr(&values.title),
        content = text(&values.content),
        label = state.submit_label(),
    );

    let meta = PageMetadata::new(
        "NoteHub - Create note".to_string(),
        "Create a new note".to_string(),
        None,
    );
    layout(&meta, &main)
}

/// Escapes markup characters as JSON unicode escapes so script data can
/// neither close nor reopen tags; the parsed value is unchanged.
pub fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
