mod about;
mod blog;
mod index;
mod not_found;
mod rss;

pub use about::About;
pub use blog::{BlogIndex, BlogPostPage};
pub use index::Index;
pub use not_found::NotFound;
pub use rss::Rss;
