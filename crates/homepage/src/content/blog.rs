use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::markdown::{FieldError, Frontmatter};
use super::{Dated, Entry};

/// A blog post: validated [`PostMeta`] front-matter, slug, and Markdown body.
pub type BlogPost = Entry<PostMeta>;

/// Front-matter of a blog post.
///
/// ```yaml
/// ---
/// title: Taming SQLite locks
/// description: What I learned chasing `database is locked` errors.
/// pubDate: 2024-09-15
/// updatedDate: 2024-10-02
/// heroImage: /images/locks.png
/// ---
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PostMeta {
    pub title: String,
    pub description: String,
    pub publish_date: NaiveDate,
    pub updated_date: Option<NaiveDate>,
    pub hero_image: Option<String>,
}

/// [`PostMeta`] as written in the file, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPostMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<serde_yaml::Value>,
    pub updated_date: Option<serde_yaml::Value>,
    pub hero_image: Option<String>,
}

impl Frontmatter for PostMeta {
    type Raw = RawPostMeta;

    fn from_raw(raw: RawPostMeta) -> Result<Self, FieldError> {
        let title = required_text("title", raw.title)?;
        let description = required_text("description", raw.description)?;
        let publish_date = raw
            .pub_date
            .ok_or_else(|| FieldError::new("pubDate", "is missing"))
            .and_then(|value| date_field("pubDate", value))?;
        let updated_date = raw
            .updated_date
            .map(|value| date_field("updatedDate", value))
            .transpose()?;

        Ok(PostMeta {
            title,
            description,
            publish_date,
            updated_date,
            hero_image: raw.hero_image,
        })
    }
}

impl Dated for PostMeta {
    fn date(&self) -> NaiveDate {
        self.publish_date
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, FieldError> {
    match value {
        None => Err(FieldError::new(field, "is missing")),
        Some(text) if text.trim().is_empty() => Err(FieldError::new(field, "must not be empty")),
        Some(text) => Ok(text),
    }
}

fn date_field(field: &'static str, value: serde_yaml::Value) -> Result<NaiveDate, FieldError> {
    let serde_yaml::Value::String(text) = value else {
        return Err(FieldError::new(field, "must be a date string, e.g. 2024-09-15"));
    };

    parse_date(&text).ok_or_else(|| FieldError::new(field, format!("is not a valid date: `{}`", text)))
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d %Y", "%B %d %Y", "%b %d, %Y", "%B %d, %Y"];

/// Parses a publication date.
///
/// Accepts ISO dates (`2024-09-15`), RFC 3339 date-times (`2024-09-15T08:00:00Z`), local date-times (`2024-09-15T08:00:00`)
/// and English month dates (`Sep 15 2024`, `September 15, 2024`). Only the calendar date is kept.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.date_naive());
    }

    if let Ok(date_time) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(date_time.date());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
