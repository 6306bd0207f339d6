//! Precomputed analysis records.
//!
//! Earlier analysis runs produced JSON arrays of metric records keyed by
//! `file_name`. When a source file has a record, it is used instead of running
//! `assimp info` again.

use anyhow::{Context, Result};
use rigcat_backend_assimp::MetricsRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One precomputed record as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecomputedRecord {
    /// Source file name, e.g. `LCL_Jacket.fbx`.
    pub file_name: String,
    /// Metrics fields, flattened.
    #[serde(flatten)]
    pub metrics: MetricsRecord,
}

/// Precomputed records indexed by file name.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedIndex {
    by_name: HashMap<String, MetricsRecord>,
}

impl PrecomputedIndex {
    /// Loads and merges the given files in order. Later files win on duplicate names.
    ///
    /// Files that do not exist are ignored. A file that exists but cannot be read or
    /// parsed is an error.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut index = Self::default();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            let content = fs::read_to_string(path).with_context(|| {
                format!("Failed to read precomputed metrics: {}", path.display())
            })?;
            let records: Vec<PrecomputedRecord> =
                serde_json::from_str(&content).with_context(|| {
                    format!("Failed to parse precomputed metrics: {}", path.display())
                })?;
            index.extend(records);
        }
        Ok(index)
    }

    /// Adds records, replacing existing entries with the same file name.
    pub fn extend(&mut self, records: impl IntoIterator<Item = PrecomputedRecord>) {
        for record in records {
            self.by_name.insert(record.file_name, record.metrics);
        }
    }

    /// Returns the record for a source file name.
    pub fn get(&self, file_name: &str) -> Option<&MetricsRecord> {
        self.by_name.get(file_name)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl FromIterator<PrecomputedRecord> for PrecomputedIndex {
    fn from_iter<I: IntoIterator<Item = PrecomputedRecord>>(iter: I) -> Self {
        let mut index = Self::default();
        index.extend(iter);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigcat_backend_assimp::JointCount;

    #[test]
    fn test_load_merges_files_and_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let rigs = dir.path().join("rigs.json");
        let clothing = dir.path().join("clothing.json");
        fs::write(
            &rigs,
            r#"[
                {"file_name": "Rig.fbx", "total_vertices": 10, "real_joint_count": 65},
                {"file_name": "Shared.fbx", "total_vertices": 1}
            ]"#,
        )
        .unwrap();
        fs::write(
            &clothing,
            r#"[{"file_name": "Shared.fbx", "total_vertices": 2, "file_size_mb": 1.5, "extra": true}]"#,
        )
        .unwrap();

        let index =
            PrecomputedIndex::load(&[rigs, dir.path().join("missing.json"), clothing]).unwrap();
        assert_eq!(index.len(), 2);
        let rig = index.get("Rig.fbx").unwrap();
        assert_eq!(rig.total_vertices, 10);
        assert_eq!(rig.real_joint_count, Some(JointCount::Known(65)));
        let shared = index.get("Shared.fbx").unwrap();
        assert_eq!(shared.total_vertices, 2);
        assert_eq!(shared.file_size_mb, Some(1.5));
        assert!(index.get("Other.fbx").is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = PrecomputedIndex::load(&[path]).unwrap_err();
        assert!(err.to_string().contains("Failed to parse precomputed metrics"));
    }

    #[test]
    fn test_nothing_configured_is_empty() {
        let index = PrecomputedIndex::load::<&Path>(&[]).unwrap();
        assert!(index.is_empty());
    }
}
