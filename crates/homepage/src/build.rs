use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use colored::{ColoredString, Colorize};
use log::{info, trace, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::{
    BuildOptions, BuildOutput,
    content::ContentSources,
    errors::{BuildError, ContentError, SiteError},
    logging::{FormatElapsedTimeOptions, format_elapsed_time, print_title},
    navigation::lint_navigation,
    route::{DynamicRouteContext, FullRoute, PageContext, PageData},
    sitemap::{SitemapEntry, generate_sitemap},
};

pub mod metadata;
pub mod options;

/// A page rendered in memory, waiting to be written.
struct RenderedPage {
    route: String,
    url: String,
    file_path: PathBuf,
    params: Option<FxHashMap<String, String>>,
    is_endpoint: bool,
    content: Vec<u8>,
    render_time: Duration,
}

/// Loads content, renders every page, then writes the output directory.
///
/// Nothing is written (and the output directory is not cleaned) unless every content source loaded and every page rendered.
pub fn execute_build(
    routes: &[&dyn FullRoute],
    content_sources: &mut ContentSources,
    options: &BuildOptions,
) -> Result<BuildOutput, SiteError> {
    let build_start = Instant::now();
    let mut build_metadata = BuildOutput::new(build_start);

    info!(target: "build", "Output directory: {}", options.output_dir.display());

    init_content_sources(content_sources)?;
    let content_sources: &ContentSources = content_sources;

    lint_navigation(&options.navigation);

    let section_format_options = FormatElapsedTimeOptions {
        sec_red_threshold: 5,
        sec_yellow_threshold: 1,
        millis_red_threshold: None,
        millis_yellow_threshold: None,
        ..Default::default()
    };

    print_title("generating pages");
    let pages_start = Instant::now();

    let pages = render_pages(routes, content_sources, options)?;
    ensure_unique_outputs(&pages)?;

    info!(target: "pages", "{}", format!("rendered {} pages in {}", pages.len(), format_elapsed_time(pages_start.elapsed(), &section_format_options)).bold());

    let route_format_options = FormatElapsedTimeOptions {
        additional_fn: Some(&|msg: ColoredString| {
            let formatted_msg = format!("(+{})", msg);
            if msg.fgcolor.is_none() {
                formatted_msg.dimmed()
            } else {
                formatted_msg.into()
            }
        }),
        ..Default::default()
    };

    print_title("writing pages");
    prepare_output_dir(options)?;

    let sitemap_entries: Vec<SitemapEntry> = match &options.base_url {
        Some(base_url) => pages
            .iter()
            .filter(|page| !page.is_endpoint)
            .map(|page| SitemapEntry::new(base_url, &page.url))
            .collect(),
        None => Vec::new(),
    };

    for page in pages {
        write_route_file(&page.content, &page.file_path)?;

        info!(target: "pages", "{} -> {} {}", page.url, page.file_path.to_string_lossy().dimmed(), format_elapsed_time(page.render_time, &route_format_options));

        build_metadata.add_page(page.route, page.url, page.file_path, page.params);
    }

    if options.static_dir.exists() {
        let static_start = Instant::now();
        print_title("copying static files");

        copy_recursively(
            &options.static_dir,
            &options.output_dir,
            &mut build_metadata,
        )?;

        info!(target: "build", "{}", format!("Static files copied in {}", format_elapsed_time(static_start.elapsed(), &FormatElapsedTimeOptions::default())).bold());
    } else {
        trace!(target: "build", "No static directory at {}, skipping", options.static_dir.display());
    }

    if options.sitemap.enabled {
        if options.base_url.is_some() {
            build_metadata.sitemap = Some(generate_sitemap(
                sitemap_entries,
                &options.output_dir,
                &options.sitemap,
            )?);
        } else {
            warn!(target: "sitemap", "Sitemap generation is enabled, but `base_url` is not set. No sitemap will be generated.");
        }
    }

    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "build", "{}", format!("Build completed in {}", format_elapsed_time(build_start.elapsed(), &section_format_options)).bold());

    Ok(build_metadata)
}

fn init_content_sources(content_sources: &mut ContentSources) -> Result<(), ContentError> {
    let content_sources_start = Instant::now();
    print_title("initializing content sources");

    for source in content_sources.sources_mut() {
        let source_start = Instant::now();
        source.init()?;

        info!(target: "content", "{} initialized with {} entries in {}", source.get_name(), source.len(), format_elapsed_time(source_start.elapsed(), &FormatElapsedTimeOptions::default()));
    }

    info!(target: "content", "{}", format!("Content sources initialized in {}", format_elapsed_time(
        content_sources_start.elapsed(),
        &FormatElapsedTimeOptions::default(),
    )).bold());

    Ok(())
}

fn render_pages(
    routes: &[&dyn FullRoute],
    content_sources: &ContentSources,
    options: &BuildOptions,
) -> Result<Vec<RenderedPage>, SiteError> {
    let rendered = routes
        .par_iter()
        .map(|route| {
            let pages = route.get_pages(&DynamicRouteContext {
                content: content_sources,
            });

            if route.is_dynamic() {
                if pages.is_empty() {
                    warn!(target: "build", "{} is a dynamic route, but its implementation of Route::pages returned an empty Vec. No pages will be generated for this route.", route.route_raw().bold());
                } else {
                    info!(target: "build", "{} ({} pages)", route.route_raw().bold(), pages.len());
                }
            }

            pages
                .par_iter()
                .map(|page| render_page(*route, page, content_sources, options))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rendered.into_iter().flatten().collect())
}

fn render_page(
    route: &dyn FullRoute,
    page: &PageData,
    content_sources: &ContentSources,
    options: &BuildOptions,
) -> Result<RenderedPage, SiteError> {
    let render_start = Instant::now();

    let url = route.resolve_url(&page.raw)?;
    let file_path = route.resolve_file_path(&page.raw, &options.output_dir)?;

    let mut ctx = PageContext {
        params: &*page.typed,
        content: content_sources,
        navigation: &options.navigation,
        current_path: &url,
        base_url: &options.base_url,
    };

    let content = route
        .build(&mut ctx)
        .map_err(|source| SiteError::Render {
            route: url.clone(),
            source,
        })?;

    Ok(RenderedPage {
        route: route.route_raw().to_string(),
        params: route.is_dynamic().then(|| page.raw.0.clone()),
        is_endpoint: route.is_endpoint(),
        url,
        file_path,
        content,
        render_time: render_start.elapsed(),
    })
}

fn ensure_unique_outputs(pages: &[RenderedPage]) -> Result<(), BuildError> {
    let mut seen: FxHashMap<&Path, &RenderedPage> = FxHashMap::default();

    for page in pages {
        if let Some(first) = seen.insert(page.file_path.as_path(), page) {
            return Err(BuildError::DuplicateOutput {
                path: page.file_path.clone(),
                first: first.url.clone(),
                second: page.url.clone(),
            });
        }
    }

    Ok(())
}

fn prepare_output_dir(options: &BuildOptions) -> io::Result<()> {
    if options.clean_output_dir && options.output_dir.exists() {
        trace!(target: "build", "Cleaning {}", options.output_dir.display());
        fs::remove_dir_all(&options.output_dir)?;
    }

    fs::create_dir_all(&options.output_dir)
}

fn copy_recursively(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    build_metadata: &mut BuildOutput,
) -> io::Result<()> {
    fs::create_dir_all(&destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let filetype = entry.file_type()?;
        let target = destination.as_ref().join(entry.file_name());

        if filetype.is_dir() {
            copy_recursively(entry.path(), target, build_metadata)?;
        } else {
            fs::copy(entry.path(), &target)?;
            build_metadata.add_static_file(target, entry.path());
        }
    }
    Ok(())
}

fn write_route_file(content: &[u8], file_path: &Path) -> io::Result<()> {
    if let Some(parent_dir) = file_path.parent() {
        fs::create_dir_all(parent_dir)?
    }

    fs::write(file_path, content)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::content::{ContentSource, PostMeta, glob_markdown};
    use crate::navigation::NavigationLink;
    use crate::route::prelude::*;
    use crate::sitemap::SitemapOptions;

    struct Index;

    impl Route for Index {
        type Params = ();

        fn path(&self) -> &str {
            "/"
        }

        fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
            let posts = ctx.content.get_source::<PostMeta>("blog").list_all();
            let nav: String = ctx
                .navigation
                .iter()
                .map(|link| {
                    let class = if link.is_active(ctx.current_path) {
                        " class=\"active\""
                    } else {
                        ""
                    };
                    format!("<a href=\"{}\"{}>{}</a>", link.target_path, class, link.label)
                })
                .collect();
            let titles: String = posts
                .iter()
                .map(|post| format!("<li>{}</li>", post.data.title))
                .collect();

            format!("<nav>{}</nav><ul>{}</ul>", nav, titles)
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

        fn pages(&self, ctx: &DynamicRouteContext) -> Vec<PostParams> {
            ctx.content
                .get_source::<PostMeta>("blog")
                .into_params(|entry| PostParams {
                    slug: entry.slug.clone(),
                })
        }

        fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
            let slug = ctx.params::<PostParams>().slug;
            ctx.content
                .get_source::<PostMeta>("blog")
                .get_by_slug(&slug)
                .map(|post| post.render())
                .map_err(BoxError::from)
        }
    }

    struct Feed;

    impl Route for Feed {
        type Params = ();

        fn path(&self) -> &str {
            "/rss.xml"
        }

        fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
            b"<rss version=\"2.0\"></rss>".to_vec()
        }
    }

    struct Broken;

    impl Route for Broken {
        type Params = ();

        fn path(&self) -> &str {
            "/broken"
        }

        fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
            Err::<String, BoxError>("template exploded".into())
        }
    }

    struct AboutWithSlash;

    impl Route for AboutWithSlash {
        type Params = ();

        fn path(&self) -> &str {
            "/about/"
        }

        fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
            "about"
        }
    }

    struct AboutWithoutSlash;

    impl Route for AboutWithoutSlash {
        type Params = ();

        fn path(&self) -> &str {
            "/about"
        }

        fn render(&self, _ctx: &mut PageContext) -> impl Into<RenderResult> {
            "about"
        }
    }

    struct Site {
        dir: TempDir,
    }

    impl Site {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("content/blog")).unwrap();
            fs::create_dir_all(dir.path().join("static/fonts")).unwrap();
            fs::write(dir.path().join("static/favicon.svg"), "<svg/>").unwrap();
            fs::write(dir.path().join("static/fonts/inter.woff2"), "font").unwrap();
            Self { dir }
        }

        fn post(&self, file_name: &str, title: &str, pub_date: &str) -> &Self {
            fs::write(
                self.dir.path().join("content/blog").join(file_name),
                format!(
                    "---\ntitle: {title}\ndescription: About {title}\npubDate: {pub_date}\n---\n# {title}\n"
                ),
            )
            .unwrap();
            self
        }

        fn output_dir(&self) -> PathBuf {
            self.dir.path().join("dist")
        }

        fn content_sources(&self) -> ContentSources {
            let pattern = self
                .dir
                .path()
                .join("content/blog/*.md")
                .to_string_lossy()
                .to_string();

            ContentSources::new(vec![Box::new(ContentSource::new(
                "blog",
                Box::new(move || glob_markdown::<PostMeta>(&pattern)),
            ))])
        }

        fn options(&self) -> BuildOptions {
            BuildOptions {
                base_url: Some("https://example.com".to_string()),
                output_dir: self.output_dir(),
                static_dir: self.dir.path().join("static"),
                navigation: vec![
                    NavigationLink::new("Home", "/"),
                    NavigationLink::new("Blog", "/blog"),
                ],
                sitemap: SitemapOptions {
                    enabled: true,
                    ..Default::default()
                },
                ..Default::default()
            }
        }

        fn build(&self, routes: &[&dyn FullRoute]) -> Result<BuildOutput, SiteError> {
            execute_build(routes, &mut self.content_sources(), &self.options())
        }

        fn read(&self, path: &str) -> String {
            fs::read_to_string(self.output_dir().join(path)).unwrap()
        }
    }

    #[test]
    fn test_full_build() {
        let site = Site::new();
        site.post("first-post.md", "First post", "2024-01-01")
            .post("autumn.md", "Autumn", "2024-09-15");

        let output = site.build(&[&Index, &Post, &Feed]).unwrap();

        assert_eq!(output.pages.len(), 4);

        let index = site.read("index.html");
        assert!(index.contains("<a href=\"/\" class=\"active\">Home</a>"));
        assert!(index.contains("<a href=\"/blog\">Blog</a>"));
        assert!(
            index.find("Autumn").unwrap() < index.find("First post").unwrap(),
            "newest post should be listed first"
        );

        let post = site.read("blog/first-post/index.html");
        assert!(post.contains("<h1 id=\"first-post\">First post</h1>"));

        assert_eq!(site.read("rss.xml"), "<rss version=\"2.0\"></rss>");

        assert_eq!(site.read("favicon.svg"), "<svg/>");
        assert_eq!(site.read("fonts/inter.woff2"), "font");
        assert_eq!(output.static_files.len(), 2);

        let sitemap = site.read("sitemap.xml");
        assert!(sitemap.contains("<loc>https://example.com/</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/blog/autumn/</loc>"));
        assert!(!sitemap.contains("rss.xml"));
        assert_eq!(output.sitemap, Some(site.output_dir().join("sitemap.xml")));
    }

    #[test]
    fn test_build_reports_page_metadata() {
        let site = Site::new();
        site.post("first-post.md", "First post", "2024-01-01");

        let output = site.build(&[&Post]).unwrap();

        assert_eq!(output.pages.len(), 1);
        let page = &output.pages[0];
        assert_eq!(page.route, "/blog/[slug]");
        assert_eq!(page.url, "/blog/first-post/");
        assert_eq!(
            page.file_path,
            site.output_dir().join("blog/first-post/index.html")
        );
        assert_eq!(
            page.params.as_ref().and_then(|p| p.get("slug")).map(String::as_str),
            Some("first-post")
        );
    }

    #[test]
    fn test_invalid_pub_date_aborts_before_output() {
        let site = Site::new();
        site.post("first-post.md", "First post", "2024-01-01")
            .post("broken.md", "Broken", "2024-13-45");

        fs::create_dir_all(site.output_dir()).unwrap();
        fs::write(site.output_dir().join("previous.html"), "previous build").unwrap();

        let result = site.build(&[&Index, &Post]);

        match result {
            Err(SiteError::Content(ContentError::Validation { file, field, .. })) => {
                assert!(file.ends_with("broken.md"));
                assert_eq!(field, "pubDate");
            }
            other => panic!("expected a validation error, got {:?}", other.map(|o| o.pages.len())),
        }

        assert_eq!(site.read("previous.html"), "previous build");
        assert!(!site.output_dir().join("index.html").exists());
    }

    #[test]
    fn test_render_error_aborts_before_output() {
        let site = Site::new();
        site.post("first-post.md", "First post", "2024-01-01");

        fs::create_dir_all(site.output_dir()).unwrap();
        fs::write(site.output_dir().join("previous.html"), "previous build").unwrap();

        let result = site.build(&[&Index, &Broken]);

        assert!(matches!(result, Err(SiteError::Render { ref route, .. }) if route == "/broken/"));
        assert_eq!(site.read("previous.html"), "previous build");
        assert!(!site.output_dir().join("index.html").exists());
    }

    #[test]
    fn test_duplicate_slugs_fail_the_build() {
        let site = Site::new();
        site.post("Hello World.md", "Hello", "2024-01-01")
            .post("hello-world.md", "Hello again", "2024-02-01");

        let result = site.build(&[&Index]);

        assert!(matches!(
            result,
            Err(SiteError::Content(ContentError::DuplicateSlug { ref slug, .. })) if slug == "hello-world"
        ));
        assert!(!site.output_dir().exists());
    }

    #[test]
    fn test_duplicate_outputs_fail_the_build() {
        let site = Site::new();

        let result = site.build(&[&AboutWithSlash, &AboutWithoutSlash]);

        assert!(matches!(
            result,
            Err(SiteError::Build(BuildError::DuplicateOutput { .. }))
        ));
    }

    #[test]
    fn test_clean_output_dir() {
        let site = Site::new();
        site.post("first-post.md", "First post", "2024-01-01");
        fs::create_dir_all(site.output_dir()).unwrap();
        fs::write(site.output_dir().join("stale.html"), "stale").unwrap();

        site.build(&[&Index]).unwrap();
        assert!(!site.output_dir().join("stale.html").exists());

        fs::write(site.output_dir().join("stale.html"), "stale").unwrap();
        execute_build(
            &[&Index],
            &mut site.content_sources(),
            &BuildOptions {
                clean_output_dir: false,
                ..site.options()
            },
        )
        .unwrap();
        assert!(site.output_dir().join("stale.html").exists());
    }

    #[test]
    fn test_sitemap_requires_base_url() {
        let site = Site::new();
        site.post("first-post.md", "First post", "2024-01-01");

        let output = execute_build(
            &[&Index],
            &mut site.content_sources(),
            &BuildOptions {
                base_url: None,
                ..site.options()
            },
        )
        .unwrap();

        assert!(output.sitemap.is_none());
        assert!(!site.output_dir().join("sitemap.xml").exists());
    }
}
