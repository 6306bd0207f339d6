//! The viewer manifest.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::category::Category;
use super::entry::CatalogEntry;

/// Manifest with one entry list per category.
///
/// Serializes as a JSON object with exactly the keys `rigs`, `clothing` and
/// `cage_deformers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub rigs: Vec<CatalogEntry>,
    pub clothing: Vec<CatalogEntry>,
    pub cage_deformers: Vec<CatalogEntry>,
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to its category.
    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries_mut(entry.category).push(entry);
    }

    /// Entries of one category.
    pub fn entries(&self, category: Category) -> &[CatalogEntry] {
        match category {
            Category::Rigs => &self.rigs,
            Category::Clothing => &self.clothing,
            Category::CageDeformers => &self.cage_deformers,
        }
    }

    fn entries_mut(&mut self, category: Category) -> &mut Vec<CatalogEntry> {
        match category {
            Category::Rigs => &mut self.rigs,
            Category::Clothing => &mut self.clothing,
            Category::CageDeformers => &mut self.cage_deformers,
        }
    }

    /// Sorts every category by display name.
    pub fn sort(&mut self) {
        for category in Category::ALL {
            // stable, so equal names keep discovery order
            self.entries_mut(category)
                .sort_by(|a, b| a.name.cmp(&b.name));
        }
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.entries(*c).len()).sum()
    }

    /// Returns true if no category has entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the manifest as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize manifest")
    }

    /// Writes the manifest, creating the parent directory if needed.
    ///
    /// The JSON goes to a temporary file next to `path` that is then renamed over it,
    /// so an interrupted write leaves any previous manifest intact.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create manifest directory: {}", parent.display())
        })?;

        let mut staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to stage manifest in: {}", parent.display()))?;
        staged
            .write_all(json.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        staged
            .persist(path)
            .with_context(|| format!("Failed to replace manifest: {}", path.display()))?;
        Ok(())
    }
}
