//! Batch configuration.
//!
//! Every location the batch touches is injected through [`CatalogConfig`], so tests
//! can point the whole pipeline at a temporary directory.

use std::path::PathBuf;

/// Default directory scanned for FBX files.
pub const DEFAULT_INPUT_ROOT: &str = "avatar";

/// Default output root (GLB files and manifest are written under it).
pub const DEFAULT_OUT_ROOT: &str = ".";

/// Default directory, relative to the output root, that receives GLB files.
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Default manifest file name, relative to the output root.
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";

/// Default precomputed analysis files. Missing files are ignored.
pub const DEFAULT_PRECOMPUTED: &[&str] = &[
    "avatar_rigs_analysis.json",
    "layered_clothing_analysis.json",
];

/// Relative paths excluded from the batch (duplicates of the layered clothing examples).
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &["cage_deformer/layered_clothing"];

/// Configuration for one catalog run.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Directory scanned for FBX files.
    pub input_root: PathBuf,
    /// Root for all outputs.
    pub out_root: PathBuf,
    /// GLB directory relative to `out_root`, also used in manifest `file` paths.
    pub models_dir: String,
    /// Manifest location.
    pub manifest_path: PathBuf,
    /// Precomputed analysis files, in load order.
    pub precomputed: Vec<PathBuf>,
    /// Lower-case relative path prefixes to skip.
    pub skip_prefixes: Vec<String>,
    /// Print per-file analysis detail.
    pub verbose: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_ROOT, DEFAULT_OUT_ROOT)
    }
}

impl CatalogConfig {
    /// Creates a config with default settings for the given input and output roots.
    pub fn new(input_root: impl Into<PathBuf>, out_root: impl Into<PathBuf>) -> Self {
        let out_root = out_root.into();
        Self {
            input_root: input_root.into(),
            manifest_path: out_root.join(DEFAULT_MANIFEST_NAME),
            out_root,
            models_dir: DEFAULT_MODELS_DIR.to_string(),
            precomputed: DEFAULT_PRECOMPUTED.iter().map(PathBuf::from).collect(),
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|s| s.to_string()).collect(),
            verbose: false,
        }
    }

    /// Sets the manifest path.
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Replaces the precomputed analysis files.
    pub fn precomputed(mut self, paths: Vec<PathBuf>) -> Self {
        self.precomputed = paths;
        self
    }

    /// Replaces the skip prefixes. Prefixes are matched case-insensitively.
    pub fn skip_prefixes<S: AsRef<str>>(mut self, prefixes: &[S]) -> Self {
        self.skip_prefixes = prefixes
            .iter()
            .map(|p| normalize_prefix(p.as_ref()))
            .collect();
        self
    }

    /// Enables verbose output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Absolute location of the GLB directory.
    pub fn models_root(&self) -> PathBuf {
        self.out_root.join(&self.models_dir)
    }
}

/// Lower-cases a prefix and normalizes separators to `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.replace('\\', "/").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.input_root, PathBuf::from("avatar"));
        assert_eq!(config.manifest_path, PathBuf::from("./manifest.json"));
        assert_eq!(config.models_root(), PathBuf::from("./models"));
        assert_eq!(config.skip_prefixes, vec!["cage_deformer/layered_clothing"]);
        assert_eq!(config.precomputed.len(), 2);
        assert!(!config.verbose);
    }

    #[test]
    fn test_builder_normalizes_prefixes() {
        let config = CatalogConfig::new("in", "out").skip_prefixes(&["Cage_Deformer\\Old"]);
        assert_eq!(config.skip_prefixes, vec!["cage_deformer/old"]);
        assert_eq!(config.manifest_path, PathBuf::from("out/manifest.json"));
    }
}
