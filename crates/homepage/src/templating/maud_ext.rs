use chrono::NaiveDate;
use maud::{Markup, html};

use crate::{GENERATOR, navigation::NavigationLink, route::RenderResult};

/// Can be used to create a generator tag in the output HTML. See [`GENERATOR`](crate::GENERATOR).
pub fn generator() -> Markup {
    html! {
        meta name="generator" content=(GENERATOR);
    }
}

/// A `<time>` element showing `date` as `Sep 15, 2024`.
pub fn formatted_date(date: NaiveDate) -> Markup {
    html! {
        time datetime=(date.format("%Y-%m-%d").to_string()) {
            (date.format("%b %-d, %Y").to_string())
        }
    }
}

/// Renders a navigation link, marked with the `active` class and `aria-current="page"` when it is active on `current_path`.
pub fn nav_link(link: &NavigationLink, current_path: &str) -> Markup {
    let active = link.is_active(current_path);

    html! {
        a href=(link.target_path) class=[active.then_some("active")] aria-current=[active.then_some("page")] {
            (link.label)
        }
    }
}

/// Renders every link of the navigation with [`nav_link`].
pub fn nav_links(links: &[NavigationLink], current_path: &str) -> Markup {
    html! {
        @for link in links {
            (nav_link(link, current_path))
        }
    }
}

impl From<maud::Markup> for RenderResult {
    fn from(val: maud::Markup) -> Self {
        RenderResult::Text(val.into_string())
    }
}
