//! Glob expansion for source paths.

use crate::merge::SourceSpec;
use crate::{PageMergeError, Result};
use std::path::{Path, PathBuf};

/// Returns true if `pattern` contains glob metacharacters.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand source specifications whose path is a glob pattern.
///
/// Each match inherits the page selection and orientation of its pattern and
/// matches keep the order `glob` yields them in (alphabetical). Plain paths,
/// and patterns naming an existing file literally, pass through unchanged.
///
/// # Errors
///
/// [`PageMergeError::SourceNotFound`] if a pattern matches nothing, and
/// [`PageMergeError::Other`] for malformed patterns.
pub fn expand_source_specs<I>(specs: I) -> Result<Vec<SourceSpec>>
where
    I: IntoIterator<Item = SourceSpec>,
{
    let mut expanded = Vec::new();

    for spec in specs {
        let pattern = spec.path.to_string_lossy().into_owned();
        if !is_glob_pattern(&pattern) || spec.path.exists() {
            expanded.push(spec);
            continue;
        }

        let paths = collect_paths_for_pattern(&pattern)?;
        if paths.is_empty() {
            return Err(PageMergeError::source_not_found(&spec.path));
        }

        tracing::debug!(%pattern, matches = paths.len(), "expanded glob pattern");
        expanded.extend(paths.into_iter().map(|path| SourceSpec {
            path,
            ..spec.clone()
        }));
    }

    Ok(expanded)
}

/// Expand a single glob pattern into file paths.
///
/// Directories matched by the pattern are skipped.
pub fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| PageMergeError::Other {
        message: format!("Invalid glob pattern '{pattern}': {err}"),
    })?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| PageMergeError::Other {
            message: err.to_string(),
        })?;
        if Path::is_file(&path) {
            resolved_paths.push(path);
        }
    }

    Ok(resolved_paths)
}
