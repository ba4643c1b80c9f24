use homepage::content::PostMeta;
use homepage::feed::RssFeed;
use homepage::route::prelude::*;

use super::blog::{BlogPostPage, BlogPostParams};
use crate::layout::{SITE_DESCRIPTION, SITE_TITLE};

pub struct Rss;

impl Route for Rss {
    type Params = ();

    fn path(&self) -> &str {
        "/rss.xml"
    }

    fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
        feed(ctx)
    }
}

fn feed(ctx: &PageContext) -> Result<String, BoxError> {
    let site_url = ctx
        .base_url
        .clone()
        .ok_or("the RSS feed needs `base_url` to be set to build absolute links")?;
    let posts = ctx.content.get_source::<PostMeta>("blog").list_all();

    let feed = RssFeed::new(SITE_TITLE, SITE_DESCRIPTION, site_url).with_posts(posts, |post| {
        BlogPostPage.url(BlogPostParams {
            slug: post.slug.clone(),
        })
    })?;

    Ok(feed.into_xml()?)
}
