use homepage::content::{ContentSources, PostMeta, glob_markdown};
use homepage::content_sources;

pub fn content_sources() -> ContentSources {
    content_sources!["blog" => glob_markdown::<PostMeta>("content/blog/*.md")]
}
