use homepage::route::prelude::*;
use maud::html;

use crate::layout::{SeoMeta, layout};

pub struct NotFound;

impl Route for NotFound {
    type Params = ();

    fn path(&self) -> &str {
        "/404.html"
    }

    fn render(&self, ctx: &mut PageContext) -> impl Into<RenderResult> {
        layout(
            html! {
                div.text-center.py-8 {
                    h1 { "404 - Not Found" }
                    p.lead { "This page does not exist, or it moved somewhere else." }
                    a href="/" { "Go back home" }
                }
            },
            ctx,
            Some(SeoMeta {
                title: "Page not found".to_string(),
                ..Default::default()
            }),
        )
    }
}
