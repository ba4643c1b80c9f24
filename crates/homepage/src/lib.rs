#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Modules the end-user will interact directly or indirectly with
pub mod content;
pub mod errors;
pub mod feed;
pub mod navigation;
pub mod route;
pub mod sitemap;

mod routing;

// Exports for end-users
pub use build::metadata::{BuildOutput, PageOutput, StaticFileOutput};
pub use build::options::BuildOptions;
pub use navigation::{NavigationLink, is_active};
pub use sitemap::SitemapOptions;

// Re-export FxHashMap so that macro-generated code can use it without requiring users to add it as a dependency.
#[doc(hidden)]
pub use rustc_hash::FxHashMap;

mod build;
mod templating;

#[cfg(feature = "maud")]
#[cfg_attr(docsrs, doc(cfg(feature = "maud")))]
pub mod maud {
    //! Helpers for [Maud](https://maud.lambda.xyz), a macro for writing HTML templates.
    //!
    //! ## Example
    //! ```rust
    //! use homepage::maud::nav_links;
    //! use homepage::route::prelude::*;
    //! use maud::{html, Markup};
    //!
    //! pub struct Index;
    //!
    //! impl Route for Index {
    //!   type Params = ();
    //!
    //!   fn path(&self) -> &str {
    //!     "/"
    //!   }
    //!
    //!   fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
    //!     html! {
    //!       nav { (nav_links(ctx.navigation, ctx.current_path)) }
    //!       h1 { "Hello, world!" }
    //!     }
    //!   }
    //! }
    //! ```
    pub use crate::templating::maud_ext::*;
}

// Internal modules
mod logging;

use build::execute_build;
use content::ContentSources;
use logging::init_logging;
use route::FullRoute;

#[macro_export]
/// Helps to define every route that should be built by [`generate()`].
///
/// ## Example
/// ```rust,no_run
/// use homepage::{content_sources, generate, routes, BuildOptions, BuildOutput};
///
/// # mod routes {
/// #   use homepage::route::prelude::*;
/// #
/// #   pub struct Index;
/// #   impl Route for Index {
/// #      type Params = ();
/// #      fn path(&self) -> &str { "/" }
/// #      fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
/// #          "Hello, world!"
/// #      }
/// #   }
/// #   pub struct About;
/// #   impl Route for About {
/// #      type Params = ();
/// #      fn path(&self) -> &str { "/about" }
/// #      fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
/// #          "About me"
/// #      }
/// #   }
/// # }
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///     generate(
///         routes![routes::Index, routes::About],
///         content_sources![],
///         BuildOptions::default(),
///     )
/// }
/// ```
macro_rules! routes {
    [$($route:expr),*] => {
        &[$(&$route),*]
    };
}

/// Helps to define all sources of content that should be loaded by [`generate()`].
///
/// ## Example
/// ```rust,no_run
/// use homepage::content::{glob_markdown, PostMeta};
/// use homepage::{content_sources, generate, routes, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///     generate(
///         routes![],
///         content_sources![
///             "blog" => glob_markdown::<PostMeta>("content/blog/*.md")
///         ],
///         BuildOptions::default(),
///     )
/// }
/// ```
///
/// Each source is loaded lazily, once, at the start of the build.
#[macro_export]
macro_rules! content_sources {
    ($($name:expr => $entries:expr),*) => {
        $crate::content::ContentSources::new(vec![$(Box::new($crate::content::ContentSource::new($name, Box::new(move || $entries)))),*])
    };
}

/// The version of homepage being used.
///
/// Can be used to create a generator tag in the output HTML.
///
/// ## Example
/// ```rust
/// use homepage::GENERATOR;
///
/// format!("<meta name=\"generator\" content=\"{}\">", GENERATOR);
/// ```
pub const GENERATOR: &str = concat!("homepage v", env!("CARGO_PKG_VERSION"));

/// Entrypoint. Loads the content, renders every route, and writes the output files.
///
/// Content validation errors, render errors and conflicting outputs abort the build before anything is written.
///
/// ## Example
/// Should be called from the main function of the binary crate.
/// ```rust,no_run
/// use homepage::{content_sources, generate, routes, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(routes![], content_sources![], BuildOptions::default())
/// }
/// ```
pub fn generate(
    routes: &[&dyn FullRoute],
    mut content_sources: ContentSources,
    options: BuildOptions,
) -> Result<BuildOutput, Box<dyn std::error::Error>> {
    init_logging();

    Ok(execute_build(routes, &mut content_sources, &options)?)
}
