//! Error types for homepage.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

use crate::route::BoxError;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Errors returned from main are printed through Debug, while thiserror implements Display.
                    // Redirect one to the other so the user sees the actual message.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

/// Errors raised while loading content sources.
///
/// Every variant except [`ContentError::NotFound`] is structural and aborts the build before any output is written.
#[derive(Error)]
pub enum ContentError {
    #[error("Invalid content file {file}: field `{field}` {reason}")]
    Validation {
        file: PathBuf,
        field: &'static str,
        reason: String,
    },

    #[error("Duplicate slug `{slug}`: both {first} and {second} resolve to it")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Invalid front-matter in {file}: {source}")]
    Frontmatter {
        file: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern for content `{pattern}`: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("No entry with slug `{slug}` in content source `{collection}`")]
    NotFound { collection: String, slug: String },
}

/// A navigation link or page path that is not an absolute site path.
///
/// This is never propagated: the link is rendered as inactive and the problem is reported as a warning.
#[derive(Error, Clone, PartialEq, Eq)]
#[error(
    "Navigation link `{label}` points to `{path}`, which does not start with `/`. It will never be marked as active."
)]
pub struct InvalidLinkPath {
    pub label: String,
    pub path: String,
}

#[derive(Error)]
pub enum BuildError {
    #[error("Route `{route}` is missing parameter `{param}`")]
    MissingParameter { route: String, param: String },

    #[error("Routes `{first}` and `{second}` both write to {path}")]
    DuplicateOutput {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error(
        "`{route}` returns `RenderResult::Raw`, but it is a page route. Raw bytes can only be returned by endpoints, i.e. routes ending with a file extension such as `/rss.xml`. If you meant to return HTML, use `RenderResult::Text` instead."
    )]
    InvalidRenderResult { route: String },
}

#[derive(Error)]
pub enum FeedError {
    #[error("RSS feed failed validation: {0}")]
    Invalid(String),
}

#[derive(Error)]
pub enum SiteError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Failed to render `{route}`: {source}")]
    Render {
        route: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl_debug_for_error!(
    ContentError,
    InvalidLinkPath,
    BuildError,
    FeedError,
    SiteError
);
