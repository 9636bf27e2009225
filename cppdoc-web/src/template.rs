use std::collections::HashMap;

use askama_escape::{Html, escape as escape_html_entity};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{CARGO_HOME_PAGE, CARGO_NAME, CARGO_VERSION, CATALOG_CSS};

pub const BASE_TEMPLATE: &str = include_str!("templates/base.html");
pub const LANDING_TEMPLATE: &str = include_str!("templates/landing.html");
pub const DETAIL_TEMPLATE: &str = include_str!("templates/detail.html");
pub const SECTION_TEMPLATE: &str = include_str!("templates/section.html");
pub const ROW_TEMPLATE: &str = include_str!("templates/row.html");
pub const TABLE_TEMPLATE: &str = include_str!("templates/table.html");

/// Characters escaped in a path segment of an internal link.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Substitute `[[key]]` placeholders in a single pass.
///
/// Substituted values are not scanned again, unknown keys are left as is.
pub fn render(template: &str, variables: &HashMap<&str, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("[[") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("]]") {
            Some(end) => {
                let key = &after[..end];
                match variables.get(key) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&rest[start..start + end + 4]),
                }
                rest = &after[end + 2..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);

    result
}

pub fn render_page(title: &str, breadcrumb: &str, content: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("title", escape(title));
    vars.insert("css", CATALOG_CSS.to_string());
    vars.insert("breadcrumb", breadcrumb.to_string());
    vars.insert("content", content.to_string());
    vars.insert("name", CARGO_NAME.to_string());
    vars.insert("version", CARGO_VERSION.to_string());
    vars.insert("homepage", CARGO_HOME_PAGE.to_string());

    render(BASE_TEMPLATE, &vars)
}

/// HTML-escape user data.
pub fn escape(text: &str) -> String {
    escape_html_entity(text, Html).to_string()
}

/// Absolute link to a directory-style page, e.g. `/package/ninja/1.7.2/`.
pub fn href(segments: &[&str]) -> String {
    let mut link = String::from("/");
    for segment in segments {
        link.extend(utf8_percent_encode(segment, SEGMENT));
        link.push('/');
    }
    link
}

/// A list entry linking to `link`, followed by an optional plain-text note.
///
/// `link` must come from [`href`] or a parsed URL; it is inserted as is.
pub fn row(link: &str, label: &str, note: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("href", link.to_string());
    vars.insert("label", escape(label));
    vars.insert(
        "note",
        if note.is_empty() {
            String::new()
        } else {
            format!(" <span class=\"note\">{}</span>", escape(note))
        },
    );
    render(ROW_TEMPLATE, &vars)
}

/// A headed list of pre-rendered rows; empty sections say so.
pub fn section(heading: &str, rows: &[String]) -> String {
    let mut vars = HashMap::new();
    vars.insert("heading", escape(heading));
    vars.insert(
        "rows",
        if rows.is_empty() {
            "<li class=\"empty\">None</li>".to_string()
        } else {
            rows.concat()
        },
    );
    render(SECTION_TEMPLATE, &vars)
}

/// A headed two-column table; keys and values are escaped.
pub fn table<K: AsRef<str>, V: AsRef<str>>(heading: &str, entries: &[(K, V)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(k, v)| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                escape(k.as_ref()),
                escape(v.as_ref())
            )
        })
        .collect();

    let mut vars = HashMap::new();
    vars.insert("heading", escape(heading));
    vars.insert("rows", rows);
    render(TABLE_TEMPLATE, &vars)
}

/// A detail page body: heading, pre-rendered summary and sections.
pub fn detail(title: &str, summary: &str, sections: &[String]) -> String {
    let mut vars = HashMap::new();
    vars.insert("title", escape(title));
    vars.insert("summary", summary.to_string());
    vars.insert("sections", sections.concat());
    render(DETAIL_TEMPLATE, &vars)
}

/// Breadcrumb trail of `(link, label)` pairs, the last entry unlinked.
pub fn breadcrumb(links: &[(String, String)]) -> String {
    let mut parts = Vec::with_capacity(links.len());
    for (i, (link, label)) in links.iter().enumerate() {
        if i + 1 == links.len() {
            parts.push(format!("<span>{}</span>", escape(label)));
        } else {
            parts.push(format!("<a href=\"{link}\">{}</a>", escape(label)));
        }
    }
    parts.join(" / ")
}
