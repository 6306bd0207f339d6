//! Path-based categorization and skip rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Asset category in the viewer manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Skeleton-only rigs.
    Rigs,
    /// Layered clothing and everything not matched by another rule.
    Clothing,
    /// Cube cage deformer examples.
    CageDeformers,
}

/// Prefix rules on the lower-case relative path, first match wins.
const CATEGORY_RULES: &[(&str, Category)] = &[
    ("rigs/", Category::Rigs),
    ("cage_deformer/cube/", Category::CageDeformers),
];

impl Category {
    /// All categories, in manifest order.
    pub const ALL: [Category; 3] = [Category::Rigs, Category::Clothing, Category::CageDeformers];

    /// Manifest key for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rigs => "rigs",
            Category::Clothing => "clothing",
            Category::CageDeformers => "cage_deformers",
        }
    }

    /// Human-readable plural label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Rigs => "rigs",
            Category::Clothing => "clothing",
            Category::CageDeformers => "cage deformers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorizes a file from its normalized relative path (see [`relative_key`]).
pub fn categorize(relative_key: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(prefix, _)| relative_key.starts_with(prefix))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Clothing)
}

/// Returns true if the normalized relative path starts with any skip prefix.
pub fn should_skip(relative_key: &str, skip_prefixes: &[String]) -> bool {
    skip_prefixes
        .iter()
        .any(|prefix| relative_key.starts_with(prefix.as_str()))
}

/// Normalized key for matching rules: path relative to `root`, `/`-separated, lower-case.
///
/// Returns `None` if `path` is not under `root`.
pub fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}
