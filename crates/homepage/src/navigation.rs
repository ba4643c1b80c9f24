//! Site navigation and active link resolution.
//!
//! Navigation has a single level of sectioning: a link to `/blog` stays active on every page under `/blog/`,
//! without configuring each page. Only the first segment of the current path is compared, deeper sections are not told apart.
use log::{debug, warn};

use crate::errors::InvalidLinkPath;

/// A link of the site navigation, e.g. `Blog` pointing to `/blog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLink {
    pub label: String,
    pub target_path: String,
}

impl NavigationLink {
    pub fn new(label: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target_path: target_path.into(),
        }
    }

    /// Whether this link should be rendered as active on the page at `current_path`. See [`is_active`].
    pub fn is_active(&self, current_path: &str) -> bool {
        is_active(current_path, &self.target_path)
    }

    pub fn validate(&self) -> Result<(), InvalidLinkPath> {
        if self.target_path.starts_with('/') {
            Ok(())
        } else {
            Err(InvalidLinkPath {
                label: self.label.clone(),
                path: self.target_path.clone(),
            })
        }
    }
}

/// Decides whether a link to `target_path` is active on the page at `current_path`.
///
/// A link is active when it points to the current page exactly, or when it points to the top-level section
/// the current page lives in (`/blog/my-post` activates `/blog`). On `/` only a link to `/` is active.
///
/// Paths not starting with `/` are a caller error, the link is then simply never active.
///
/// ## Example
/// ```rust
/// use homepage::is_active;
///
/// assert!(is_active("/", "/"));
/// assert!(is_active("/blog/my-post", "/blog"));
/// assert!(!is_active("/blogging", "/blog"));
/// ```
pub fn is_active(current_path: &str, target_path: &str) -> bool {
    if !current_path.starts_with('/') || !target_path.starts_with('/') {
        debug!(target: "navigation", "Ignoring non-absolute path while resolving active link: `{}` -> `{}`", current_path, target_path);
        return false;
    }

    if target_path == current_path {
        return true;
    }

    match first_segment(current_path) {
        Some(segment) => target_path.strip_prefix('/') == Some(segment),
        None => false,
    }
}

fn first_segment(path: &str) -> Option<&str> {
    path.split('/').find(|segment| !segment.is_empty())
}

/// Checks the whole navigation once, logging a warning for every link that can never be active.
pub fn lint_navigation(links: &[NavigationLink]) -> Vec<InvalidLinkPath> {
    links
        .iter()
        .filter_map(|link| link.validate().err())
        .inspect(|issue| warn!(target: "navigation", "{}", issue))
        .collect()
}
