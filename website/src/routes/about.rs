use homepage::route::prelude::*;
use maud::html;

use crate::layout::{SeoMeta, layout, social_links};

pub struct About;

impl Route for About {
    type Params = ();

    fn path(&self) -> &str {
        "/about"
    }

    fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
        layout(
            html! {
                article.max-w-prose {
                    h1 { "About" }
                    p {
                        "I'm Sam, a software engineer working mostly on data-heavy backend services. "
                        "Before that I spent a few years on embedded tooling, which is where I picked up a habit of reading the source when the docs run out."
                    }
                    p {
                        "This site is generated from a handful of Markdown files. "
                        "There is no tracking and no comment section: if something I wrote is wrong, I'd love to hear about it by email."
                    }
                    h2 { "Elsewhere" }
                    (social_links())
                }
            },
            ctx,
            Some(SeoMeta {
                title: "About".to_string(),
                description: Some("Who I am and what this site is about.".to_string()),
                canonical_url: ctx.canonical_url(),
            }),
        )
    }
}
