use std::path::{Path, PathBuf};

use crate::errors::BuildError;
use crate::route::PageParams;

/// A `[name]` placeholder inside a raw route, with the byte range it covers.
#[derive(Debug, PartialEq)]
pub struct ParameterDef {
    pub(crate) key: String,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

pub fn extract_params_from_raw_route(raw_route: &str) -> Vec<ParameterDef> {
    let mut params = Vec::new();
    let mut open: Option<usize> = None;

    for (index, c) in raw_route.char_indices() {
        match c {
            '[' => open = Some(index),
            ']' => {
                if let Some(start) = open.take() {
                    params.push(ParameterDef {
                        key: raw_route[start + 1..index].to_string(),
                        start,
                        end: index + 1,
                    });
                }
            }
            _ => {}
        }
    }

    params
}

pub fn guess_if_route_is_endpoint(raw_route: &str) -> bool {
    Path::new(raw_route).extension().is_some()
}

/// Replaces every placeholder of `raw_route` with its value from `params`.
pub fn substitute_params(
    raw_route: &str,
    params_def: &[ParameterDef],
    params: &PageParams,
) -> Result<String, BuildError> {
    let mut result = String::with_capacity(raw_route.len());
    let mut cursor = 0;

    for param_def in params_def {
        let value = params
            .get(&param_def.key)
            .ok_or_else(|| BuildError::MissingParameter {
                route: raw_route.to_string(),
                param: param_def.key.clone(),
            })?;

        result.push_str(&raw_route[cursor..param_def.start]);
        result.push_str(value);
        cursor = param_def.end;
    }

    result.push_str(&raw_route[cursor..]);
    Ok(result)
}

/// Collapses consecutive slashes, and makes sure pages start and end with a slash.
pub fn normalize_url(route: &str, is_endpoint: bool) -> String {
    let mut url = String::from("/");
    url.push_str(
        &route
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/"),
    );

    if !is_endpoint && !url.ends_with('/') {
        url.push('/');
    }

    url
}

/// Maps a resolved route to the file it is written to. Pages always become `index.html` files.
pub fn output_file_path(route: &str, output_dir: &Path, is_endpoint: bool) -> PathBuf {
    let mut path = PathBuf::from(output_dir);
    path.extend(route.split('/').filter(|segment| !segment.is_empty()));

    if !is_endpoint {
        path.push("index.html");
    }

    path
}
