//! Manifest entries.

use rigcat_backend_assimp::metrics::round_f64;
use rigcat_backend_assimp::{JointCount, MeshBreakdown, MetricsRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::category::Category;

/// Organizational prefixes stripped from display names, in order.
const DISPLAY_PREFIXES: &[&str] = &["LCL_", "LC_"];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One converted asset in the viewer manifest.
///
/// Field names and order are the manifest contract with the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Source file stem.
    pub id: String,
    /// Display name derived from the file name.
    pub name: String,
    /// GLB path relative to the output root, `/`-separated.
    pub file: String,
    pub category: Category,
    pub file_size_mb: f64,
    pub total_vertices: u64,
    pub total_faces: u64,
    pub mesh_count: u64,
    pub node_count: u64,
    pub real_joint_count: JointCount,
    pub max_depth: u64,
    pub material_count: u64,
    pub texture_count: u64,
    pub memory_bytes: u64,
    pub total_gpu_memory_kb: f64,
    pub vertex_buffer_kb: f64,
    pub index_buffer_kb: f64,
    pub bone_matrices_kb: f64,
    pub meshes: Vec<MeshBreakdown>,
    pub warnings: Vec<String>,
}

/// Inputs for [`CatalogEntry::new`] that do not come from the metrics record.
#[derive(Debug, Clone)]
pub struct EntrySource<'a> {
    /// Source file name, e.g. `LCL_Jacket.fbx`.
    pub file_name: &'a str,
    /// Manifest `file` value.
    pub glb_file: String,
    pub category: Category,
    /// Source size used when the record has none.
    pub file_size_bytes: Option<u64>,
}

impl CatalogEntry {
    /// Builds an entry from a metrics record, the authoritative joint count and the
    /// final warning list.
    pub fn new(
        source: EntrySource<'_>,
        metrics: &MetricsRecord,
        real_joint_count: JointCount,
        warnings: Vec<String>,
    ) -> Self {
        let file_size_mb = metrics
            .file_size_mb
            .or_else(|| source.file_size_bytes.map(|b| b as f64 / BYTES_PER_MB))
            .unwrap_or(0.0);

        Self {
            id: file_stem(source.file_name).to_string(),
            name: display_name(source.file_name),
            file: source.glb_file,
            category: source.category,
            file_size_mb: round_f64(file_size_mb, 2),
            total_vertices: metrics.total_vertices,
            total_faces: metrics.total_faces,
            mesh_count: metrics.mesh_count,
            node_count: metrics.node_count,
            real_joint_count,
            max_depth: metrics.max_depth,
            material_count: metrics.material_count,
            texture_count: metrics.texture_count,
            memory_bytes: metrics.memory_bytes,
            total_gpu_memory_kb: round_f64(metrics.total_gpu_memory_kb, 1),
            vertex_buffer_kb: round_f64(metrics.vertex_buffer_kb, 1),
            index_buffer_kb: round_f64(metrics.index_buffer_kb, 1),
            bone_matrices_kb: round_f64(metrics.bone_matrices_kb, 1),
            meshes: metrics.meshes.clone(),
            warnings,
        }
    }
}

/// Returns the file name without its final extension.
pub fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Turns a file name into a display name.
///
/// `LCL_Puffer_Jacket.fbx` becomes `Puffer Jacket`.
pub fn display_name(file_name: &str) -> String {
    let mut name = file_stem(file_name);
    for prefix in DISPLAY_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
        }
    }
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("LCL_Puffer_Jacket.fbx"), "Puffer Jacket");
        assert_eq!(display_name("LC_Shirt.FBX"), "Shirt");
        assert_eq!(display_name("Mannequin_Rig.fbx"), "Mannequin Rig");
        assert_eq!(display_name("lcl_lower.fbx"), "lcl lower");
        assert_eq!(display_name("LCL_LC_Double.fbx"), "Double");
        assert_eq!(display_name("Plain"), "Plain");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Cube.Cage.fbx"), "Cube.Cage");
        assert_eq!(file_stem("noext"), "noext");
    }

    #[test]
    fn test_entry_rounding_and_size() {
        let mut metrics = MetricsRecord {
            total_vertices: 4210,
            total_faces: 6832,
            node_count: 143,
            ..Default::default()
        };
        metrics.recompute_gpu_memory();

        let entry = CatalogEntry::new(
            EntrySource {
                file_name: "LCL_Hoodie.fbx",
                glb_file: "models/clothing/LCL_Hoodie.glb".to_string(),
                category: Category::Clothing,
                file_size_bytes: Some(3 * 1024 * 1024 + 512 * 1024),
            },
            &metrics,
            JointCount::Known(52),
            Vec::new(),
        );

        assert_eq!(entry.id, "LCL_Hoodie");
        assert_eq!(entry.name, "Hoodie");
        assert_eq!(entry.file_size_mb, 3.5);
        // 263.12 / 80.06 / 8.94 / 352.12 at two decimals
        assert_eq!(entry.vertex_buffer_kb, 263.1);
        assert_eq!(entry.index_buffer_kb, 80.1);
        assert_eq!(entry.bone_matrices_kb, 8.9);
        assert_eq!(entry.total_gpu_memory_kb, 352.1);
        assert_eq!(entry.real_joint_count, JointCount::Known(52));
    }

    #[test]
    fn test_manifest_rounding_ties_to_even() {
        let mut metrics = MetricsRecord {
            total_vertices: 4210,
            node_count: 132,
            memory_bytes: 482_113,
            ..Default::default()
        };
        metrics.recompute_gpu_memory();
        assert_eq!(metrics.bone_matrices_kb, 8.25);
        assert_eq!(metrics.vertex_buffer_kb, 263.12);

        let entry = CatalogEntry::new(
            EntrySource {
                file_name: "Rig.fbx",
                glb_file: "models/rigs/Rig.glb".to_string(),
                category: Category::Rigs,
                file_size_bytes: None,
            },
            &metrics,
            JointCount::Known(40),
            Vec::new(),
        );
        assert_eq!(entry.bone_matrices_kb, 8.2);
        assert_eq!(entry.vertex_buffer_kb, 263.1);
        assert_eq!(entry.memory_bytes, 482_113);
    }

    #[test]
    fn test_record_size_wins_over_disk_size() {
        let metrics = MetricsRecord {
            file_size_mb: Some(1.239),
            ..Default::default()
        };
        let entry = CatalogEntry::new(
            EntrySource {
                file_name: "Rig.fbx",
                glb_file: "models/rigs/Rig.glb".to_string(),
                category: Category::Rigs,
                file_size_bytes: Some(1),
            },
            &metrics,
            JointCount::Unknown,
            Vec::new(),
        );
        assert_eq!(entry.file_size_mb, 1.24);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["real_joint_count"], -1);
        assert_eq!(json["category"], "rigs");
    }
}
