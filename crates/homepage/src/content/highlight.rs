use std::sync::OnceLock;

use log::warn;
use syntect::{
    Error,
    easy::HighlightLines,
    highlighting::{Theme, ThemeSet},
    html::{IncludeBackground, styled_line_to_highlighted_html},
    parsing::SyntaxSet,
    util::LinesWithEndings,
};

const THEME: &str = "InspiredGitHub";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn get_syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn get_theme() -> Option<&'static Theme> {
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get(THEME)
}

fn opening_html(language: Option<&str>) -> String {
    match language {
        Some(lang) => {
            let lang = escape_html(lang);
            format!("<pre data-language=\"{lang}\"><code data-language=\"{lang}\">")
        }
        None => String::from("<pre><code>"),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    match pulldown_cmark_escape::escape_html(&mut escaped, text) {
        Ok(()) => escaped,
        // Writing into a `String` never fails.
        Err(_) => unreachable!("writing to a String is infallible"),
    }
}

/// A fenced code block being rendered.
pub struct CodeBlock {
    language: Option<String>,
}

impl CodeBlock {
    /// `fence` is the info string after the opening backticks, e.g. `rust` or `rust title="main.rs"`. Only the first word is used.
    pub fn new(fence: Option<&str>) -> (Self, String) {
        let language = fence
            .and_then(|fence| fence.split_whitespace().next())
            .map(str::to_string);
        let opening = opening_html(language.as_deref());

        (Self { language }, opening)
    }

    /// Highlights the block's content, falling back to escaped plain text if highlighting fails.
    pub fn highlight(&self, content: &str) -> String {
        match self.try_highlight(content) {
            Ok(html) => html,
            Err(error) => {
                warn!(target: "content", "Failed to highlight {} code block: {}", self.language.as_deref().unwrap_or("plain"), error);
                escape_html(content)
            }
        }
    }

    fn try_highlight(&self, content: &str) -> Result<String, Error> {
        let Some(theme) = get_theme() else {
            return Ok(escape_html(content));
        };

        let ss = get_syntax_set();
        let syntax = self
            .language
            .as_deref()
            .and_then(|language| {
                ss.find_syntax_by_token(language)
                    .or_else(|| ss.find_syntax_by_name(language))
                    .or_else(|| ss.find_syntax_by_extension(language))
            })
            .or_else(|| ss.find_syntax_by_first_line(content))
            .unwrap_or_else(|| ss.find_syntax_plain_text());

        let mut h = HighlightLines::new(syntax, theme);

        let mut highlighted = String::new();
        for line in LinesWithEndings::from(content) {
            let regions = h.highlight_line(line, ss)?;
            highlighted.push_str(&styled_line_to_highlighted_html(
                &regions,
                IncludeBackground::No,
            )?);
        }

        Ok(highlighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_is_first_word_of_fence() {
        let (block, opening) = CodeBlock::new(Some("rust title=\"main.rs\""));

        assert_eq!(block.language.as_deref(), Some("rust"));
        assert_eq!(
            opening,
            "<pre data-language=\"rust\"><code data-language=\"rust\">"
        );
    }

    #[test]
    fn test_indented_block_has_no_language() {
        let (block, opening) = CodeBlock::new(None);

        assert!(block.language.is_none());
        assert_eq!(opening, "<pre><code>");
    }

    #[test]
    fn test_highlighted_output_escapes_markup() {
        let (block, _) = CodeBlock::new(Some("html"));
        let html = block.highlight("<p>&</p>\n");

        assert!(!html.contains("<p>"));
        assert!(html.contains("&lt;"));
    }

    #[test]
    fn test_fence_language_is_escaped() {
        let (_, opening) = CodeBlock::new(Some("x\"><script>"));

        assert_eq!(
            opening,
            "<pre data-language=\"x&quot;&gt;&lt;script&gt;\"><code data-language=\"x&quot;&gt;&lt;script&gt;\">"
        );
    }
}
