use homepage::maud::nav_links;
use homepage::route::PageContext;
use maud::{Markup, html};

use super::SITE_TITLE;

pub fn header(ctx: &PageContext) -> Markup {
    html! {
        header.border-b {
            div.container.flex.items-center.justify-between.py-4 {
                a.site-title href="/" { (SITE_TITLE) }
                nav.flex.gap-6 {
                    (nav_links(ctx.navigation, ctx.current_path))
                }
            }
        }
    }
}
