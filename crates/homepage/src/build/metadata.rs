use std::{path::PathBuf, process::Termination, time::Instant};

use rustc_hash::FxHashMap;

/// Metadata returned by [`generate()`](crate::generate) for a single page after a successful build.
#[derive(Debug)]
pub struct PageOutput {
    pub route: String,
    pub url: String,
    pub file_path: PathBuf,
    pub params: Option<FxHashMap<String, String>>,
}

/// Metadata returned by [`generate()`](crate::generate) for a single static file after a successful build.
///
/// A static file is copied to the output directory without any processing.
#[derive(Debug)]
pub struct StaticFileOutput {
    pub file_path: PathBuf,
    pub original_path: PathBuf,
}

/// Metadata returned by [`generate()`](crate::generate) after a successful build.
#[derive(Debug)]
pub struct BuildOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    pub static_files: Vec<StaticFileOutput>,
    pub sitemap: Option<PathBuf>,
}

impl BuildOutput {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            static_files: Vec::new(),
            sitemap: None,
        }
    }

    pub(crate) fn add_page(
        &mut self,
        route: String,
        url: String,
        file_path: PathBuf,
        params: Option<FxHashMap<String, String>>,
    ) {
        self.pages.push(PageOutput {
            route,
            url,
            file_path,
            params,
        });
    }

    pub(crate) fn add_static_file(&mut self, file_path: PathBuf, original_path: PathBuf) {
        self.static_files.push(StaticFileOutput {
            file_path,
            original_path,
        });
    }
}

impl Default for BuildOutput {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Termination for BuildOutput {
    fn report(self) -> std::process::ExitCode {
        0.into()
    }
}
