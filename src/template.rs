//! Seed content for newly created PARA items.
//!
//! Templates are plain text with a few placeholders:
//!
//! | Placeholder        | Expands to                                   |
//! |--------------------|----------------------------------------------|
//! | `{{title}}`        | the new item's name without its extension    |
//! | `{{date}}`         | the current date as `YYYY-MM-DD`             |
//! | `{{time}}`         | the current time as `HH:mm`                  |
//! | `{{date:FORMAT}}`  | the current date/time in `FORMAT`            |
//! | `{{time:FORMAT}}`  | same as `{{date:FORMAT}}`                    |
//!
//! `FORMAT` understands the tokens `YYYY`, `MM`, `DD`, `HH`, `mm` and `ss`;
//! anything else is copied through. Unknown placeholders are left untouched.

use chrono::{DateTime, Local, TimeZone};
use regex::{Captures, Regex};
use std::sync::OnceLock;

const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";
const DEFAULT_TIME_FORMAT: &str = "HH:mm";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*(title|date|time)\s*(?::([^}]*))?\}\}")
            .expect("Invalid placeholder pattern")
    })
}

/// Values available to a template.
#[derive(Debug, Clone)]
pub struct TemplateContext<Tz: TimeZone> {
    pub title: String,
    pub now: DateTime<Tz>,
}

impl TemplateContext<Local> {
    /// Context for an item called `name`, stamped with the local time.
    pub fn for_item(name: &str) -> Self {
        Self {
            title: title_from_name(name),
            now: Local::now(),
        }
    }
}

/// Strips a trailing extension from an item name ("idea.md" -> "idea").
pub fn title_from_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Expands all placeholders in `template`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use parafile::template::{render, TemplateContext};
///
/// let ctx = TemplateContext {
///     title: "idea".to_string(),
///     now: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap(),
/// };
/// assert_eq!(render("# {{title}} ({{date}})", &ctx), "# idea (2024-03-09)");
/// ```
pub fn render<Tz: TimeZone>(template: &str, ctx: &TemplateContext<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let format = caps.get(2).map(|m| m.as_str().trim());
            match (&caps[1], format) {
                ("title", _) => ctx.title.clone(),
                ("date", None) => format_moment(&ctx.now, DEFAULT_DATE_FORMAT),
                (_, None) => format_moment(&ctx.now, DEFAULT_TIME_FORMAT),
                (_, Some(format)) => format_moment(&ctx.now, format),
            }
        })
        .into_owned()
}

/// Formats a timestamp using `YYYY`/`MM`/`DD`/`HH`/`mm`/`ss` tokens.
fn format_moment<Tz: TimeZone>(now: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    const TOKENS: [(&str, &str); 6] = [
        ("YYYY", "%Y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut strftime = String::new();
    let mut rest = format;
    'outer: while !rest.is_empty() {
        for (token, directive) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                strftime.push_str(directive);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            // a literal % would otherwise start a strftime directive
            if c == '%' {
                strftime.push_str("%%");
            } else {
                strftime.push(c);
            }
        }
        rest = chars.as_str();
    }

    now.format(&strftime).to_string()
}
