//! Core functions and structs to define the content sources of your website.
//!
//! Content sources represent the content of your website, such as blog posts. They are passed to [`generate()`](crate::generate),
//! through the [`content_sources!`](crate::content_sources) macro, and loaded once at the start of the build.
//! Loading validates every entry, so that a broken document fails the build instead of rendering with missing data.
use std::{any::Any, path::PathBuf};

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

mod blog;
mod highlight;
pub mod markdown;
mod slugger;

use crate::errors::ContentError;

pub use blog::{BlogPost, PostMeta, RawPostMeta, parse_date};
pub use markdown::{
    FieldError, Frontmatter, MarkdownHeading, glob_markdown, parse_markdown_entry,
    render_markdown, split_frontmatter,
};

/// Main struct to access all content sources.
///
/// ## Example
/// In `main.rs`:
/// ```rust,no_run
/// use homepage::content::{glob_markdown, PostMeta};
/// use homepage::{content_sources, generate, routes, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(
///     routes![],
///     content_sources!["blog" => glob_markdown::<PostMeta>("content/blog/*.md")],
///     BuildOptions::default(),
///   )
/// }
/// ```
///
/// In a route, `ctx.content.get_source::<PostMeta>("blog")` returns the loaded source.
pub struct ContentSources(pub Vec<Box<dyn ContentSourceInternal>>);

impl From<Vec<Box<dyn ContentSourceInternal>>> for ContentSources {
    fn from(content_sources: Vec<Box<dyn ContentSourceInternal>>) -> Self {
        Self(content_sources)
    }
}

impl ContentSources {
    pub fn new(content_sources: Vec<Box<dyn ContentSourceInternal>>) -> Self {
        Self(content_sources)
    }

    pub fn sources_mut(&mut self) -> &mut [Box<dyn ContentSourceInternal>] {
        &mut self.0
    }

    /// Returns the source called `name` holding entries of type `T`.
    ///
    /// Panics if there is no such source, which is always a mistake in the site's code rather than in its content.
    pub fn get_source<T: 'static>(&self, name: &str) -> &ContentSource<T> {
        self.get_source_safe(name).unwrap_or_else(|| {
            panic!(
                "Content source with name '{}' and type {} not found",
                name,
                std::any::type_name::<T>()
            )
        })
    }

    pub fn get_source_safe<T: 'static>(&self, name: &str) -> Option<&ContentSource<T>> {
        self.0.iter().find_map(|source| {
            match source.as_any().downcast_ref::<ContentSource<T>>() {
                Some(source) if source.name == name => Some(source),
                _ => None,
            }
        })
    }
}

/// A single document of a [`ContentSource`]: its validated front-matter, its slug and its Markdown body.
///
/// The body is kept exactly as written in the source file, after the front-matter block.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub slug: String,
    pub data: T,
    pub body: String,
    pub file_path: Option<PathBuf>,
}

impl<T> Entry<T> {
    pub fn new(slug: String, data: T, body: String, file_path: Option<PathBuf>) -> Self {
        Self {
            slug,
            data,
            body,
            file_path,
        }
    }

    /// Renders the body to HTML.
    pub fn render(&self) -> String {
        render_markdown(&self.body)
    }

    /// Headings of the body, in document order. Ids match the ones emitted by [`Entry::render`].
    pub fn headings(&self) -> Vec<MarkdownHeading> {
        markdown::find_headings(&self.body)
    }
}

/// Front-matter types that carry a publication date, which orders their entries.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

type ContentSourceInitMethod<T> = Box<dyn Fn() -> Result<Vec<Entry<T>>, ContentError> + Send + Sync>;

/// A named collection of content entries, such as blog posts.
pub struct ContentSource<T> {
    pub name: String,
    pub entries: Vec<Entry<T>>,
    pub(crate) init_method: Option<ContentSourceInitMethod<T>>,
}

impl<T> ContentSource<T> {
    pub fn new<P>(name: P, entries: ContentSourceInitMethod<T>) -> Self
    where
        P: Into<String>,
    {
        Self {
            name: name.into(),
            entries: vec![],
            init_method: Some(entries),
        }
    }

    /// Creates an already loaded source, checking that slugs are unique.
    pub fn from_entries<P>(name: P, entries: Vec<Entry<T>>) -> Result<Self, ContentError>
    where
        P: Into<String>,
    {
        ensure_unique_slugs(&entries)?;

        Ok(Self {
            name: name.into(),
            entries,
            init_method: None,
        })
    }

    pub fn get_by_slug(&self, slug: &str) -> Result<&Entry<T>, ContentError> {
        self.get_by_slug_safe(slug)
            .ok_or_else(|| ContentError::NotFound {
                collection: self.name.clone(),
                slug: slug.to_string(),
            })
    }

    pub fn get_by_slug_safe(&self, slug: &str) -> Option<&Entry<T>> {
        self.entries.iter().find(|entry| entry.slug == slug)
    }

    pub fn into_params<P>(&self, cb: impl Fn(&Entry<T>) -> P) -> Vec<P> {
        self.entries.iter().map(cb).collect()
    }
}

impl<T: Dated> ContentSource<T> {
    /// Every entry, newest first. Entries published the same day are ordered by slug.
    pub fn list_all(&self) -> Vec<&Entry<T>> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| {
            b.data
                .date()
                .cmp(&a.data.date())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        entries
    }
}

fn ensure_unique_slugs<T>(entries: &[Entry<T>]) -> Result<(), ContentError> {
    let mut seen: FxHashMap<&str, &Entry<T>> = FxHashMap::default();

    for entry in entries {
        if let Some(first) = seen.insert(entry.slug.as_str(), entry) {
            return Err(ContentError::DuplicateSlug {
                slug: entry.slug.clone(),
                first: first.file_path.clone().unwrap_or_default(),
                second: entry.file_path.clone().unwrap_or_default(),
            });
        }
    }

    Ok(())
}

#[doc(hidden)]
/// Used internally by homepage and should not be implemented by the user.
/// We expose it because it's implemented for [`ContentSource`], which is public.
pub trait ContentSourceInternal: Send + Sync {
    fn init(&mut self) -> Result<(), ContentError>;
    fn get_name(&self) -> &str;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any; // Used for type checking at runtime
}

impl<T: 'static + Sync + Send> ContentSourceInternal for ContentSource<T> {
    fn init(&mut self) -> Result<(), ContentError> {
        let Some(init_method) = &self.init_method else {
            return Ok(());
        };

        let entries = init_method()?;
        ensure_unique_slugs(&entries)?;
        self.entries = entries;
        Ok(())
    }
    fn get_name(&self) -> &str {
        &self.name
    }
    fn len(&self) -> usize {
        self.entries.len()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}
