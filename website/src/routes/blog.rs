use chrono::Datelike;
use homepage::content::{BlogPost, PostMeta};
use homepage::errors::BuildError;
use homepage::maud::formatted_date;
use homepage::route::prelude::*;
use maud::{Markup, PreEscaped, html};

use crate::layout::{SeoMeta, layout};

pub struct BlogIndex;

impl Route for BlogIndex {
    type Params = ();

    fn path(&self) -> &str {
        "/blog"
    }

    fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
        blog_index(ctx)
    }
}

fn blog_index(ctx: &PageContext) -> Result<Markup, BoxError> {
    let posts = ctx.content.get_source::<PostMeta>("blog").list_all();

    let mut years = Vec::new();
    for (year, posts) in posts_by_year(&posts) {
        let cards = posts
            .into_iter()
            .map(post_card)
            .collect::<Result<Vec<_>, _>>()?;
        years.push((year, cards));
    }

    Ok(layout(
        html! {
            h1 { "Blog" }
            @if years.is_empty() {
                p.text-muted { "Nothing here yet." }
            }
            @for (year, cards) in &years {
                section.mb-8 {
                    h2 id=(year) { (year) }
                    ul.post-list {
                        @for card in cards {
                            (card)
                        }
                    }
                }
            }
        },
        ctx,
        Some(SeoMeta {
            title: "Blog".to_string(),
            description: Some("Everything I have written, newest first.".to_string()),
            canonical_url: ctx.canonical_url(),
        }),
    ))
}

/// Groups posts by publication year, keeping their order. Expects posts sorted newest first.
pub fn posts_by_year<'a>(posts: &[&'a BlogPost]) -> Vec<(i32, Vec<&'a BlogPost>)> {
    let mut groups: Vec<(i32, Vec<&BlogPost>)> = Vec::new();

    for &post in posts {
        let year = post.data.publish_date.year();
        match groups.last_mut() {
            Some((last_year, group)) if *last_year == year => group.push(post),
            _ => groups.push((year, vec![post])),
        }
    }

    groups
}

/// A list item linking to a post, used by the blog index and the landing page.
pub fn post_card(post: &BlogPost) -> Result<Markup, BuildError> {
    let href = BlogPostPage.url(BlogPostParams {
        slug: post.slug.clone(),
    })?;

    Ok(html! {
        li.post-card {
            p.text-sm.text-muted { (formatted_date(post.data.publish_date)) }
            h3 { a href=(href) { (post.data.title) } }
            p { (post.data.description) }
        }
    })
}

pub struct BlogPostPage;

#[derive(Clone)]
pub struct BlogPostParams {
    pub slug: String,
}

impl From<BlogPostParams> for PageParams {
    fn from(params: BlogPostParams) -> Self {
        [("slug", params.slug)].into_iter().collect()
    }
}

impl Route for BlogPostPage {
    type Params = BlogPostParams;

    fn path(&self) -> &str {
        "/blog/[slug]"
    }

    fn pages(&self, ctx: &DynamicRouteContext) -> Vec<BlogPostParams> {
        ctx.content
            .get_source::<PostMeta>("blog")
            .into_params(|entry| BlogPostParams {
                slug: entry.slug.clone(),
            })
    }

    fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
        blog_post(ctx)
    }
}

fn blog_post(ctx: &PageContext) -> Result<Markup, BoxError> {
    let slug = ctx.params::<BlogPostParams>().slug;
    let post = ctx
        .content
        .get_source::<PostMeta>("blog")
        .get_by_slug(&slug)?;

    let PostMeta {
        title,
        description,
        publish_date,
        updated_date,
        hero_image,
    } = &post.data;

    let toc: Vec<_> = post
        .headings()
        .into_iter()
        .filter(|heading| heading.level == 2)
        .collect();

    Ok(layout(
        html! {
            article.max-w-prose {
                header.mb-8 {
                    @if let Some(hero_image) = hero_image {
                        img.hero-image src=(hero_image) alt="";
                    }
                    p.text-sm.text-muted {
                        (formatted_date(*publish_date))
                        @if let Some(updated_date) = updated_date {
                            " · updated " (formatted_date(*updated_date))
                        }
                    }
                    h1 { (title) }
                    p.lead { (description) }
                }

                @if toc.len() > 1 {
                    nav.toc.mb-8 aria-label="Table of contents" {
                        ul {
                            @for heading in &toc {
                                li { a href=(format!("#{}", heading.id)) { (heading.title) } }
                            }
                        }
                    }
                }

                div.prose {
                    (PreEscaped(post.render()))
                }
            }
        },
        ctx,
        Some(SeoMeta {
            title: title.clone(),
            description: Some(description.clone()),
            canonical_url: ctx.canonical_url(),
        }),
    ))
}
