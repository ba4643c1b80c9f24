//! Sitemap generation.
//!
//! When enabled through [`BuildOptions::sitemap`](crate::BuildOptions::sitemap), every HTML page of the build is listed in a
//! single `sitemap.xml` at the root of the output directory. Endpoints such as feeds are left out.
use std::fs;
use std::path::{Path, PathBuf};

/// Options for sitemap generation.
#[derive(Debug, Clone)]
pub struct SitemapOptions {
    /// Whether to generate a sitemap. Requires [`BuildOptions::base_url`](crate::BuildOptions::base_url) to be set. Default: `false`
    pub enabled: bool,
    /// The filename of the sitemap, relative to the output directory. Default: `"sitemap.xml"`
    pub filename: String,
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: "sitemap.xml".to_string(),
        }
    }
}

/// A single URL of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SitemapEntry {
    pub loc: String,
}

impl SitemapEntry {
    /// Builds the entry for the page at `url` (e.g. `/blog/`), made absolute with `base_url`.
    pub fn new(base_url: &str, url: &str) -> Self {
        Self {
            loc: format!("{}{}", base_url.trim_end_matches('/'), url),
        }
    }

    fn to_xml(&self) -> String {
        format!("<url><loc>{}</loc></url>", escape_xml(&self.loc))
    }
}

/// Escapes XML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders the sitemap document. Entries are sorted by URL and deduplicated so the output is stable between builds.
pub fn render_sitemap(mut entries: Vec<SitemapEntry>) -> String {
    entries.sort();
    entries.dedup();

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">");

    for entry in &entries {
        xml.push_str(&entry.to_xml());
    }

    xml.push_str("</urlset>");
    xml
}

/// Writes the sitemap to the output directory and returns its path.
pub fn generate_sitemap(
    entries: Vec<SitemapEntry>,
    output_dir: &Path,
    options: &SitemapOptions,
) -> std::io::Result<PathBuf> {
    let total_entries = entries.len();
    let sitemap_path = output_dir.join(&options.filename);

    if let Some(parent) = sitemap_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&sitemap_path, render_sitemap(entries))?;

    log::info!(
        target: "sitemap",
        "Generated sitemap with {} URLs at {}",
        total_entries,
        sitemap_path.display()
    );

    Ok(sitemap_path)
}
