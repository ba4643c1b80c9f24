//! RSS feed of blog posts.
//!
//! The feed is rendered by an endpoint route, usually `/rss.xml`:
//! ```rust
//! use homepage::content::PostMeta;
//! use homepage::feed::RssFeed;
//! use homepage::route::prelude::*;
//!
//! pub struct Rss;
//!
//! impl Route for Rss {
//!   type Params = ();
//!
//!   fn path(&self) -> &str {
//!     "/rss.xml"
//!   }
//!
//!   fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
//!     let posts = ctx.content.get_source::<PostMeta>("blog").list_all();
//!     let site_url = ctx.base_url.clone().unwrap_or_default();
//!
//!     RssFeed::new("My blog", "Notes on software", site_url)
//!       .with_posts(posts, |post| Ok::<_, BoxError>(format!("/blog/{}/", post.slug)))
//!       .and_then(|feed| Ok(feed.into_xml()?))
//!   }
//! }
//! ```
use chrono::NaiveTime;
use rss::{ChannelBuilder, GuidBuilder, Item, ItemBuilder, validation::Validate};

use crate::{GENERATOR, content::BlogPost, errors::FeedError};

/// RSS 2.0 channel builder.
pub struct RssFeed {
    title: String,
    description: String,
    site_url: String,
    items: Vec<Item>,
}

impl RssFeed {
    /// `site_url` is the absolute URL of the site, e.g. `https://example.com`. Post links are made absolute with it.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            site_url: site_url.into(),
            items: Vec::new(),
        }
    }

    /// Adds one item per post, in the given order. `path_for` returns the site path of a post, e.g. `/blog/first-post/`.
    ///
    /// The first error returned by `path_for` is passed through and no items are added.
    pub fn with_posts<'a, E>(
        mut self,
        posts: impl IntoIterator<Item = &'a BlogPost>,
        path_for: impl Fn(&BlogPost) -> Result<String, E>,
    ) -> Result<Self, E> {
        let site_url = self.site_url.trim_end_matches('/').to_string();

        let items = posts
            .into_iter()
            .map(|post| {
                let link = format!("{}{}", site_url, path_for(post)?);
                Ok(post_to_rss_item(post, link))
            })
            .collect::<Result<Vec<_>, E>>()?;

        self.items.extend(items);
        Ok(self)
    }

    /// Generate the feed document, validated against the RSS 2.0 rules.
    pub fn into_xml(self) -> Result<String, FeedError> {
        let channel = ChannelBuilder::default()
            .title(self.title)
            .link(self.site_url)
            .description(self.description)
            .generator(GENERATOR.to_string())
            .items(self.items)
            .build();

        channel
            .validate()
            .map_err(|e| FeedError::Invalid(e.to_string()))?;
        Ok(channel.to_string())
    }
}

fn post_to_rss_item(post: &BlogPost, link: String) -> Item {
    let pub_date = post
        .data
        .publish_date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc2822();

    ItemBuilder::default()
        .title(post.data.title.clone())
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.data.description.clone())
        .pub_date(pub_date)
        .build()
}
