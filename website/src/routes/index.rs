use homepage::content::PostMeta;
use homepage::route::prelude::*;
use maud::{Markup, html};

use super::blog::post_card;
use crate::layout::{SeoMeta, layout, social_links};

const LATEST_POSTS: usize = 3;

pub struct Index;

impl Route for Index {
    type Params = ();

    fn path(&self) -> &str {
        "/"
    }

    fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
        index(ctx)
    }
}

fn index(ctx: &PageContext) -> Result<Markup, BoxError> {
    let latest_posts = ctx
        .content
        .get_source::<PostMeta>("blog")
        .list_all()
        .into_iter()
        .take(LATEST_POSTS)
        .map(post_card)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layout(
        html! {
            section.hero.py-8 {
                h1 { "Hi, I'm Sam." }
                p.lead {
                    "I build backend systems for a living and write about the bugs that taught me something. "
                    "This is where I keep my notes."
                }
                (social_links())
            }

            section.py-8 {
                h2 { "Latest posts" }
                ul.post-list {
                    @for card in &latest_posts {
                        (card)
                    }
                }
                a href="/blog/" { "All posts →" }
            }
        },
        ctx,
        Some(SeoMeta {
            canonical_url: ctx.canonical_url(),
            ..Default::default()
        }),
    ))
}
