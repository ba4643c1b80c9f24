use maud::{DOCTYPE, Markup, html};
mod header;

pub use header::header;
use homepage::maud::generator;
use homepage::route::PageContext;

pub const SITE_TITLE: &str = "Sam's homepage";
pub const SITE_DESCRIPTION: &str = "Notes on software, databases and the occasional side project.";

pub struct SocialLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const SOCIAL_LINKS: &[SocialLink] = &[
    SocialLink {
        label: "GitHub",
        href: "https://github.com/",
    },
    SocialLink {
        label: "Mastodon",
        href: "https://mastodon.social/",
    },
    SocialLink {
        label: "RSS",
        href: "/rss.xml",
    },
];

pub struct SeoMeta {
    pub title: String,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
}

impl Default for SeoMeta {
    fn default() -> Self {
        Self {
            title: SITE_TITLE.to_string(),
            description: Some(SITE_DESCRIPTION.to_string()),
            canonical_url: None,
        }
    }
}

impl SeoMeta {
    pub fn render(&self) -> Markup {
        let formatted_title = if self.title == SITE_TITLE {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, SITE_TITLE)
        };

        let description = self.description.as_deref().unwrap_or(SITE_DESCRIPTION);

        html! {
            title { (formatted_title) }
            meta name="description" content=(description);

            // Open Graph meta tags
            meta property="og:title" content=(formatted_title);
            meta property="og:description" content=(description);
            meta property="og:type" content="website";
            @if let Some(canonical_url) = &self.canonical_url {
                meta property="og:url" content=(canonical_url);
                link rel="canonical" href=(canonical_url);
            }
        }
    }
}

pub fn social_links() -> Markup {
    html! {
        ul.social-links {
            @for link in SOCIAL_LINKS {
                li { a href=(link.href) rel="me" { (link.label) } }
            }
        }
    }
}

pub fn layout(main: Markup, ctx: &PageContext, seo: Option<SeoMeta>) -> Markup {
    let seo_data = seo.unwrap_or_default();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                (generator())
                link rel="icon" href="/favicon.svg" type="image/svg+xml";
                link rel="stylesheet" href="/global.css";
                link rel="alternate" type="application/rss+xml" title=(SITE_TITLE) href="/rss.xml";
                (seo_data.render())
            }
            body {
                (header(ctx))
                main.container.py-8 {
                    (main)
                }
                footer.container.py-8.text-muted.flex.justify-between {
                    p { "© Sam" }
                    (social_links())
                }
            }
        }
    }
}
