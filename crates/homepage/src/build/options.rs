use std::path::PathBuf;

use crate::{navigation::NavigationLink, sitemap::SitemapOptions};

/// Build options. Should be passed to [`generate()`](crate::generate()).
///
/// ## Examples
/// Default values:
/// ```rust,no_run
/// use homepage::{content_sources, generate, routes, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(routes![], content_sources![], BuildOptions::default())
/// }
/// ```
/// Custom values:
/// ```rust,no_run
/// use homepage::{
///   content_sources, generate, routes, BuildOptions, BuildOutput, NavigationLink, SitemapOptions,
/// };
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(
///     routes![],
///     content_sources![],
///     BuildOptions {
///       base_url: Some("https://example.com".into()),
///       output_dir: "public".into(),
///       navigation: vec![
///         NavigationLink::new("Home", "/"),
///         NavigationLink::new("Blog", "/blog"),
///       ],
///       sitemap: SitemapOptions {
///         enabled: true,
///         ..Default::default()
///       },
///       ..Default::default()
///     },
///   )
/// }
/// ```
pub struct BuildOptions {
    /// Base URL for the site, e.g. `https://example.com` or `https://example.com/subdir`.
    /// This value is used to generate canonical URLs, the feed and the sitemap, and is available in pages through [`PageContext::base_url`](crate::route::PageContext::base_url).
    pub base_url: Option<String>,

    pub output_dir: PathBuf,
    pub static_dir: PathBuf,

    /// Whether to clean the output directory before writing pages.
    ///
    /// Cleaning only happens once every page rendered successfully, a failed build leaves the previous output untouched.
    pub clean_output_dir: bool,

    /// The site navigation, in display order. Links are checked once per build and handed to every page through [`PageContext::navigation`](crate::route::PageContext::navigation).
    pub navigation: Vec<NavigationLink>,

    /// Options for sitemap generation. See [`SitemapOptions`] for configuration.
    pub sitemap: SitemapOptions,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            output_dir: "dist".into(),
            static_dir: "static".into(),
            clean_output_dir: true,
            navigation: Vec::new(),
            sitemap: SitemapOptions::default(),
        }
    }
}
