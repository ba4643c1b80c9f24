use std::path::{Path, PathBuf};

use glob::glob as glob_fs;
use log::warn;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::de::DeserializeOwned;

use super::highlight::CodeBlock;
use super::{Entry, slugger::Slugger};
use crate::errors::ContentError;

/// Represents a Markdown heading.
///
/// Can be used to generate a table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownHeading {
    pub title: String,
    pub id: String,
    pub level: u8,
}

/// A front-matter field that is missing or invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Typed front-matter of a Markdown document.
///
/// The YAML block is first deserialized into the lenient `Raw` type, then checked by [`Frontmatter::from_raw`].
/// This way a missing field is reported by name, with the file it belongs to, instead of as a generic deserialization error.
pub trait Frontmatter: Sized {
    type Raw: DeserializeOwned + Default;

    fn from_raw(raw: Self::Raw) -> Result<Self, FieldError>;
}

/// Splits a document into its front-matter block and its body.
///
/// The front-matter starts with a `---` line and ends at the next `---` (or `...`) line. The body is everything after that
/// closing line, returned untouched. A leading byte order mark is ignored. Documents without a (closed) front-matter block are returned whole as the body.
pub fn split_frontmatter(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end_matches(['\n', '\r']);
        if marker == "---" || marker == "..." {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, source)
}

/// Parses a single Markdown document into a validated [`Entry`].
///
/// The slug is derived from the file name, e.g. `content/blog/Hello World.md` becomes `hello-world`.
pub fn parse_markdown_entry<T>(path: &Path, source: &str) -> Result<Entry<T>, ContentError>
where
    T: Frontmatter,
{
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let slug = slug::slugify(&stem);

    let (frontmatter, body) = split_frontmatter(source);

    let raw = match frontmatter {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str::<T::Raw>(yaml).map_err(|source| ContentError::Frontmatter {
                file: path.to_path_buf(),
                source,
            })?
        }
        _ => T::Raw::default(),
    };

    let data = T::from_raw(raw).map_err(|error| ContentError::Validation {
        file: path.to_path_buf(),
        field: error.field,
        reason: error.reason,
    })?;

    Ok(Entry::new(
        slug,
        data,
        body.to_string(),
        Some(path.to_path_buf()),
    ))
}

/// Glob for Markdown files and return a vector of validated [`Entry`]s.
///
/// Typically used by [`content_sources!`](crate::content_sources) to define a Markdown content source in [`generate()`](crate::generate).
///
/// ## Example
/// ```rust,no_run
/// use homepage::content::{glob_markdown, PostMeta};
/// use homepage::{content_sources, generate, routes, BuildOptions, BuildOutput};
///
/// fn main() -> Result<BuildOutput, Box<dyn std::error::Error>> {
///   generate(
///     routes![],
///     content_sources!["blog" => glob_markdown::<PostMeta>("content/blog/*.md")],
///     BuildOptions::default(),
///   )
/// }
/// ```
pub fn glob_markdown<T>(pattern: &str) -> Result<Vec<Entry<T>>, ContentError>
where
    T: Frontmatter,
{
    let paths = glob_fs(pattern).map_err(|source| ContentError::Glob {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut entries = vec![];
    for path in paths {
        let path: PathBuf = path.map_err(|error| ContentError::Read {
            path: error.path().to_path_buf(),
            source: error.into(),
        })?;

        if path.extension().is_none_or(|extension| extension != "md") {
            warn!(target: "content", "Skipping {}: only Markdown files are supported", path.display());
            continue;
        }

        let source = std::fs::read_to_string(&path).map_err(|source| ContentError::Read {
            path: path.clone(),
            source,
        })?;

        entries.push(parse_markdown_entry(&path, &source)?);
    }

    Ok(entries)
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

fn get_text_from_events(events: &[Event]) -> String {
    let mut text = String::new();

    for event in events {
        if let Event::Text(content) | Event::Code(content) = event {
            text.push_str(content);
        }
    }

    text
}

fn find_heading_end(events: &[Event], start: usize) -> usize {
    events[start..]
        .iter()
        .position(|event| matches!(event, Event::End(TagEnd::Heading(_))))
        .map_or(events.len(), |offset| start + offset)
}

/// Headings of a Markdown body, with the same ids [`render_markdown`] gives them.
pub fn find_headings(content: &str) -> Vec<MarkdownHeading> {
    let events: Vec<Event> = Parser::new_ext(content, markdown_options()).collect();
    let mut slugger = Slugger::new();
    let mut headings = vec![];

    for (i, event) in events.iter().enumerate() {
        if let Event::Start(Tag::Heading { level, id, .. }) = event {
            let title = get_text_from_events(&events[i + 1..find_heading_end(&events, i)]);
            let slug = slugger.slugify(&title);

            headings.push(MarkdownHeading {
                id: id.as_ref().map(|id| id.to_string()).unwrap_or(slug),
                level: *level as u8,
                title,
            });
        }
    }

    headings
}

/// Render Markdown content to HTML.
///
/// Headings get an `id` derived from their text (unless one is set explicitly with `{#id}`), and fenced code blocks are syntax highlighted.
///
/// ## Example
/// ```rust
/// use homepage::content::render_markdown;
///
/// let html = render_markdown("# Hello, world!");
/// assert_eq!(html, "<h1 id=\"hello-world\">Hello, world!</h1>\n");
/// ```
pub fn render_markdown(content: &str) -> String {
    let events: Vec<Event> = Parser::new_ext(content, markdown_options()).collect();
    let mut slugger = Slugger::new();
    let mut transformed = Vec::with_capacity(events.len());

    let mut code_block: Option<CodeBlock> = None;
    let mut code_block_content = String::new();

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(fence) => Some(fence.as_ref()),
                    CodeBlockKind::Indented => None,
                };
                let (block, opening) = CodeBlock::new(language);
                code_block = Some(block);
                transformed.push(Event::Html(opening.into()));
            }
            Event::Text(text) if code_block.is_some() => code_block_content.push_str(text),
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = code_block.take() {
                    let html = block.highlight(&code_block_content);
                    transformed.push(Event::Html(html.into()));
                }
                code_block_content.clear();
                transformed.push(Event::Html("</code></pre>\n".into()));
            }
            Event::Start(Tag::Heading {
                level, id, classes, ..
            }) => {
                let title = get_text_from_events(&events[i + 1..find_heading_end(&events, i)]);
                let slug = slugger.slugify(&title);
                let heading_id = id.as_deref().unwrap_or(&slug).replace('"', "&quot;");

                let class_attr = if classes.is_empty() {
                    String::new()
                } else {
                    let classes: Vec<&str> = classes.iter().map(|c| c.as_ref()).collect();
                    format!(" class=\"{}\"", classes.join(" "))
                };

                transformed.push(Event::Html(
                    format!("<{level} id=\"{heading_id}\"{class_attr}>").into(),
                ));
            }
            Event::End(TagEnd::Heading(level)) => {
                transformed.push(Event::Html(format!("</{level}>\n").into()));
            }
            _ => transformed.push(event.clone()),
        }
    }

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, transformed.into_iter());
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, serde::Deserialize)]
    struct RawNote {
        title: Option<String>,
    }

    #[derive(Debug)]
    struct Note {
        title: String,
    }

    impl Frontmatter for Note {
        type Raw = RawNote;

        fn from_raw(raw: RawNote) -> Result<Self, FieldError> {
            let title = raw
                .title
                .ok_or_else(|| FieldError::new("title", "is missing"))?;
            Ok(Note { title })
        }
    }

    #[test]
    fn test_split_frontmatter() {
        let source = "---\ntitle: Hello\n---\n# Body\n\nText.\n";
        let (frontmatter, body) = split_frontmatter(source);

        assert_eq!(frontmatter, Some("title: Hello\n"));
        assert_eq!(body, "# Body\n\nText.\n");
    }

    #[test]
    fn test_split_frontmatter_crlf_and_dots() {
        let source = "---\r\ntitle: Hello\r\n...\r\nBody\r\n";
        let (frontmatter, body) = split_frontmatter(source);

        assert_eq!(frontmatter, Some("title: Hello\r\n"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_split_frontmatter_after_byte_order_mark() {
        let source = "\u{feff}---\ntitle: Hello\n---\nBody\n";
        let (frontmatter, body) = split_frontmatter(source);

        assert_eq!(frontmatter, Some("title: Hello\n"));
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_split_frontmatter_absent_or_unclosed() {
        assert_eq!(split_frontmatter("# Title\n"), (None, "# Title\n"));
        assert_eq!(
            split_frontmatter("---\ntitle: Hello\n"),
            (None, "---\ntitle: Hello\n")
        );
    }

    #[test]
    fn test_body_is_kept_verbatim() {
        let body = "\n  Leading blank line, *emphasis*,   trailing spaces   \n\n```rust\nfn main() {}\n```\n---\nNot front-matter.";
        let source = format!("---\ntitle: Verbatim\n---\n{body}");

        let entry = parse_markdown_entry::<Note>(Path::new("notes/verbatim.md"), &source).unwrap();

        assert_eq!(entry.body, body);
        assert_eq!(entry.data.title, "Verbatim");
    }

    #[test]
    fn test_slug_is_derived_from_file_name() {
        let entry = parse_markdown_entry::<Note>(
            Path::new("content/blog/Hello World.md"),
            "---\ntitle: Hi\n---\n",
        )
        .unwrap();

        assert_eq!(entry.slug, "hello-world");
    }

    #[test]
    fn test_missing_field_names_file_and_field() {
        let result = parse_markdown_entry::<Note>(Path::new("notes/empty.md"), "No front-matter");

        match result {
            Err(ContentError::Validation { file, field, .. }) => {
                assert_eq!(file, Path::new("notes/empty.md"));
                assert_eq!(field, "title");
            }
            other => panic!("expected a validation error, got {:?}", other.map(|e| e.slug)),
        }
    }

    #[test]
    fn test_invalid_yaml() {
        let result =
            parse_markdown_entry::<Note>(Path::new("notes/broken.md"), "---\ntitle: [oops\n---\n");

        assert!(matches!(result, Err(ContentError::Frontmatter { .. })));
    }

    #[test]
    fn test_render_heading_ids_are_unique() {
        let html = render_markdown("# Intro\n\n## Intro\n\n## Custom {#custom-id}\n");

        assert!(html.contains("<h1 id=\"intro\">Intro</h1>"));
        assert!(html.contains("<h2 id=\"intro-1\">Intro</h2>"));
        assert!(html.contains("<h2 id=\"custom-id\">Custom</h2>"));
    }

    #[test]
    fn test_headings_match_rendered_ids() {
        let content = "# Intro\n\n## Setup `sqlite`\n\n## Intro\n";
        let headings = find_headings(content);
        let html = render_markdown(content);

        assert_eq!(
            headings.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
            vec!["intro", "setup-sqlite", "intro-1"]
        );
        assert_eq!(headings[1].title, "Setup sqlite");
        assert_eq!(headings[1].level, 2);
        for heading in &headings {
            assert!(html.contains(&format!("id=\"{}\"", heading.id)));
        }
    }

    #[test]
    fn test_render_inline_markup_and_tables() {
        let html = render_markdown("Some **bold** and ~~gone~~.\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");

        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_render_code_block() {
        let html = render_markdown("```rust\nlet x = 1;\n```\n");

        assert!(html.starts_with("<pre data-language=\"rust\"><code data-language=\"rust\">"));
        assert!(html.contains("</code></pre>"));
        assert!(html.contains("let"));
    }
}
