//! Core traits and structs to define the pages of your website.
//!
//! Every route must implement the [`Route`] trait. Then, routes can be passed to [`generate()`](crate::generate), through the [`routes!`](crate::routes) macro, to be built.
use std::any::Any;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::content::ContentSources;
use crate::errors::BuildError;
use crate::navigation::NavigationLink;
use crate::routing::{
    extract_params_from_raw_route, guess_if_route_is_endpoint, normalize_url, output_file_path,
    substitute_params,
};

/// Error type routes can return from [`Route::render`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The result of a page render, can be either text, raw bytes, or an error.
///
/// Typically used through the [`Into<RenderResult>`](std::convert::Into) implementations for common types.
///
/// ## Example
/// ```rust
/// use homepage::route::prelude::*;
///
/// pub struct Index;
///
/// impl Route for Index {
///   type Params = ();
///
///   fn path(&self) -> &str {
///     "/"
///   }
///
///   fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
///     "<h1>Hello, world!</h1>"
///   }
/// }
/// ```
pub enum RenderResult {
    Text(String),
    Raw(Vec<u8>),
    Err(BoxError),
}

impl<T> From<Result<T, BoxError>> for RenderResult
where
    T: Into<RenderResult>,
{
    fn from(val: Result<T, BoxError>) -> Self {
        match val {
            Ok(s) => s.into(),
            Err(e) => RenderResult::Err(e),
        }
    }
}

impl From<String> for RenderResult {
    fn from(val: String) -> Self {
        RenderResult::Text(val)
    }
}

impl From<&str> for RenderResult {
    fn from(val: &str) -> Self {
        RenderResult::Text(val.to_string())
    }
}

impl From<Vec<u8>> for RenderResult {
    fn from(val: Vec<u8>) -> Self {
        RenderResult::Raw(val)
    }
}

/// Raw representation of the parameters of a page, keyed by placeholder name.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct PageParams(pub FxHashMap<String, String>);

impl PageParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl From<()> for PageParams {
    fn from(_: ()) -> Self {
        PageParams::default()
    }
}

impl<K, V> FromIterator<(K, V)> for PageParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PageParams(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Allows to access content, navigation and the current path in a [`Route`] implementation.
///
/// ## Example
/// ```rust
/// use homepage::content::PostMeta;
/// use homepage::route::prelude::*;
///
/// pub struct BlogIndex;
///
/// impl Route for BlogIndex {
///   type Params = ();
///
///   fn path(&self) -> &str {
///     "/blog/"
///   }
///
///   fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
///     let posts = ctx.content.get_source::<PostMeta>("blog").list_all();
///     posts
///       .iter()
///       .map(|post| format!("<h2>{}</h2>", post.data.title))
///       .collect::<String>()
///   }
/// }
/// ```
pub struct PageContext<'a> {
    pub params: &'a dyn Any,
    pub content: &'a ContentSources,
    /// The site navigation, as defined in [`BuildOptions::navigation`](crate::BuildOptions::navigation).
    pub navigation: &'a [NavigationLink],
    /// The current path being rendered, e.g. `/blog/first-post/`.
    pub current_path: &'a str,
    /// The base URL as defined in [`BuildOptions::base_url`](crate::BuildOptions::base_url)
    pub base_url: &'a Option<String>,
}

impl PageContext<'_> {
    pub fn params<T: 'static + Clone>(&self) -> T {
        self.params
            .downcast_ref::<T>()
            .unwrap_or_else(|| panic!("Params type mismatch: got {}", std::any::type_name::<T>()))
            .clone()
    }

    /// Returns the canonical URL for the current page. If [`BuildOptions::base_url`](crate::BuildOptions::base_url) is not set, this will return `None`.
    pub fn canonical_url(&self) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), self.current_path))
    }
}

/// Allows to access the content sources in the [`Route::pages`] method.
pub struct DynamicRouteContext<'a> {
    pub content: &'a ContentSources,
}

/// Must be implemented for every page of your website.
///
/// `path` is the raw route, where `[name]` placeholders are filled from the route's params.
/// A route whose path ends with a file extension (e.g. `/rss.xml`) is an endpoint: it is written as-is instead of as an `index.html` page.
pub trait Route: Send + Sync {
    type Params: Into<PageParams> + Clone + Send + Sync + 'static;

    fn path(&self) -> &str;

    /// Lists every set of params a dynamic route should be built with. Unused for static routes.
    fn pages(&self, _ctx: &DynamicRouteContext) -> Vec<Self::Params> {
        Vec::new()
    }

    fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult>;
}

/// Extension trait providing convenience methods on an instance of a route.
pub trait RouteExt: Route {
    /// Get the URL for this route with the given parameters.
    ///
    /// Note that this method merely generates the URL based on the route pattern, it does not verify that such a page is built.
    fn url(&self, params: Self::Params) -> Result<String, BuildError> {
        let raw = self.path();
        resolve_url(raw, &params.into(), guess_if_route_is_endpoint(raw))
    }
}

impl<R: Route> RouteExt for R {}

/// One concrete page of a route: its raw params and the typed params handed to [`PageContext::params`].
pub struct PageData {
    pub raw: PageParams,
    pub typed: Box<dyn Any + Send + Sync>,
}

/// Object-safe view of a [`Route`], used by the build to render pages.
///
/// Implemented for every [`Route`], should not be implemented by hand.
pub trait FullRoute: Sync + Send {
    fn route_raw(&self) -> &str;

    fn is_endpoint(&self) -> bool {
        guess_if_route_is_endpoint(self.route_raw())
    }

    fn is_dynamic(&self) -> bool {
        !extract_params_from_raw_route(self.route_raw()).is_empty()
    }

    fn resolve_url(&self, params: &PageParams) -> Result<String, BuildError> {
        resolve_url(self.route_raw(), params, self.is_endpoint())
    }

    fn resolve_file_path(
        &self,
        params: &PageParams,
        output_dir: &Path,
    ) -> Result<PathBuf, BuildError> {
        let raw = self.route_raw();
        let route = substitute_params(raw, &extract_params_from_raw_route(raw), params)?;
        Ok(output_file_path(&route, output_dir, self.is_endpoint()))
    }

    fn get_pages(&self, ctx: &DynamicRouteContext) -> Vec<PageData>;

    fn render_internal(&self, ctx: &mut PageContext) -> RenderResult;

    fn build(&self, ctx: &mut PageContext) -> Result<Vec<u8>, BoxError> {
        let result = self.render_internal(ctx);
        finish_route(result, self.route_raw(), self.is_endpoint())
    }
}

impl<R: Route> FullRoute for R {
    fn route_raw(&self) -> &str {
        self.path()
    }

    fn get_pages(&self, ctx: &DynamicRouteContext) -> Vec<PageData> {
        if !self.is_dynamic() {
            return vec![PageData {
                raw: PageParams::default(),
                typed: Box::new(()),
            }];
        }

        self.pages(ctx)
            .into_iter()
            .map(|params| PageData {
                raw: params.clone().into(),
                typed: Box::new(params),
            })
            .collect()
    }

    fn render_internal(&self, ctx: &mut PageContext) -> RenderResult {
        self.render(ctx).into()
    }
}

fn resolve_url(raw: &str, params: &PageParams, is_endpoint: bool) -> Result<String, BuildError> {
    let route = substitute_params(raw, &extract_params_from_raw_route(raw), params)?;
    Ok(normalize_url(&route, is_endpoint))
}

pub fn finish_route(
    render_result: RenderResult,
    route: &str,
    is_endpoint: bool,
) -> Result<Vec<u8>, BoxError> {
    match render_result {
        RenderResult::Text(html) => Ok(html.into_bytes()),
        RenderResult::Raw(content) if is_endpoint => Ok(content),
        RenderResult::Raw(_) => Err(BuildError::InvalidRenderResult {
            route: route.to_string(),
        }
        .into()),
        RenderResult::Err(e) => Err(e),
    }
}

pub mod prelude {
    //! Re-exports of the most commonly used types and traits for defining routes.
    //!
    //! ```rust
    //! use homepage::route::prelude::*;
    //! ```
    pub use super::{
        BoxError, DynamicRouteContext, PageContext, PageParams, RenderResult, Route, RouteExt,
    };
    pub use crate::navigation::{NavigationLink, is_active};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSources;

    struct Static;

    impl Route for Static {
        type Params = ();

        fn path(&self) -> &str {
            "/about"
        }

        fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
            format!("<p>{}</p>", ctx.current_path)
        }
    }

    #[derive(Clone)]
    struct PostParams {
        slug: String,
    }

    impl From<PostParams> for PageParams {
        fn from(params: PostParams) -> Self {
            [("slug", params.slug)].into_iter().collect()
        }
    }

    struct Post;

    impl Route for Post {
        type Params = PostParams;

        fn path(&self) -> &str {
            "/blog/[slug]"
        }

        fn pages(&self, _ctx: &DynamicRouteContext) -> Vec<PostParams> {
            vec![
                PostParams {
                    slug: "first-post".to_string(),
                },
                PostParams {
                    slug: "second-post".to_string(),
                },
            ]
        }

        fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
            ctx.params::<PostParams>().slug
        }
    }

    struct Feed;

    impl Route for Feed {
        type Params = ();

        fn path(&self) -> &str {
            "/rss.xml"
        }

        fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
            b"<rss/>".to_vec()
        }
    }

    fn render(route: &dyn FullRoute, page: &PageData, current_path: &str) -> Vec<u8> {
        let content = ContentSources::new(vec![]);
        let mut ctx = PageContext {
            params: &*page.typed,
            content: &content,
            navigation: &[],
            current_path,
            base_url: &None,
        };
        route.build(&mut ctx).unwrap()
    }

    #[test]
    fn test_static_route_has_single_page() {
        let content = ContentSources::new(vec![]);
        let pages = Static.get_pages(&DynamicRouteContext { content: &content });

        assert_eq!(pages.len(), 1);
        assert_eq!(Static.resolve_url(&pages[0].raw).unwrap(), "/about/");
        assert_eq!(
            Static
                .resolve_file_path(&pages[0].raw, Path::new("dist"))
                .unwrap(),
            Path::new("dist/about/index.html")
        );
        assert_eq!(render(&Static, &pages[0], "/about/"), b"<p>/about/</p>");
    }

    #[test]
    fn test_dynamic_route_pages_and_typed_params() {
        let content = ContentSources::new(vec![]);
        let pages = Post.get_pages(&DynamicRouteContext { content: &content });

        assert_eq!(pages.len(), 2);
        assert_eq!(Post.resolve_url(&pages[1].raw).unwrap(), "/blog/second-post/");
        assert_eq!(render(&Post, &pages[0], "/blog/first-post/"), b"first-post");
    }

    #[test]
    fn test_route_ext_url() {
        let url = Post.url(PostParams {
            slug: "hello".to_string(),
        });

        assert_eq!(url.unwrap(), "/blog/hello/");
    }

    #[test]
    fn test_endpoint_keeps_raw_output() {
        assert!(Feed.is_endpoint());
        assert_eq!(
            Feed.resolve_file_path(&PageParams::default(), Path::new("dist"))
                .unwrap(),
            Path::new("dist/rss.xml")
        );
        assert_eq!(Feed.resolve_url(&PageParams::default()).unwrap(), "/rss.xml");
    }

    #[test]
    fn test_page_route_cannot_return_raw() {
        let result = finish_route(RenderResult::Raw(vec![1, 2, 3]), "/about", false);
        assert!(result.is_err());
    }

    #[test]
    fn test_canonical_url() {
        let content = ContentSources::new(vec![]);
        let base_url = Some("https://example.com/".to_string());
        let ctx = PageContext {
            params: &(),
            content: &content,
            navigation: &[],
            current_path: "/blog/",
            base_url: &base_url,
        };

        assert_eq!(
            ctx.canonical_url().as_deref(),
            Some("https://example.com/blog/")
        );
    }
}
