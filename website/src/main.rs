use content::content_sources;
use homepage::{
    BuildOptions, BuildOutput, NavigationLink, SitemapOptions, generate, routes,
};

mod content;
mod layout;
mod routes;

use routes::*;

pub const SITE_URL: &str = "https://example.com";

fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
    generate(
        routes![Index, About, BlogIndex, BlogPostPage, Rss, NotFound],
        content_sources(),
        BuildOptions {
            base_url: Some(SITE_URL.to_string()),
            navigation: vec![
                NavigationLink::new("Home", "/"),
                NavigationLink::new("Blog", "/blog"),
                NavigationLink::new("About", "/about"),
            ],
            sitemap: SitemapOptions {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        },
    )
}
