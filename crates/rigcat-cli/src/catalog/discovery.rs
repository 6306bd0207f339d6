//! Source file discovery.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source file extension, matched case-insensitively.
pub const SOURCE_EXTENSION: &str = "fbx";

/// Finds every FBX file under `root`, sorted and deduplicated by canonical path.
///
/// An unreadable root is an error; unreadable entries below it are skipped.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e)
                    .with_context(|| format!("Failed to read input directory: {}", root.display()));
            }
            Err(_) => continue,
        };

        let path = entry.path();
        if path.is_file() && has_source_extension(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(dedup_canonical(files))
}

/// Returns true if the path has an `.fbx` extension in any case.
pub fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Keeps the first path for each canonical location, preserving order.
///
/// Paths that cannot be canonicalized are compared as given.
pub fn dedup_canonical(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| {
            let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
            seen.insert(canonical)
        })
        .collect()
}

/// Groups paths that share a file name, returning only names seen more than once.
pub fn duplicate_file_names<'a>(
    paths: impl IntoIterator<Item = &'a PathBuf>,
) -> BTreeMap<String, Vec<&'a PathBuf>> {
    let mut by_name: BTreeMap<String, Vec<&'a PathBuf>> = BTreeMap::new();
    for path in paths {
        if let Some(name) = path.file_name() {
            by_name
                .entry(name.to_string_lossy().to_string())
                .or_default()
                .push(path);
        }
    }
    by_name.retain(|_, paths| paths.len() > 1);
    by_name
}
