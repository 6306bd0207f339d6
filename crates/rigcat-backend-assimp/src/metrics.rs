//! Metrics types for converted scenes.
//!
//! A [`MetricsRecord`] is either parsed from `assimp info` output or loaded from a
//! precomputed analysis file. GPU memory fields are always derived from the raw
//! counts through [`GpuMemoryEstimate`].

use serde::{Deserialize, Serialize};

/// Bytes per vertex in the estimated vertex buffer (position, normal, uv, tangent, skin).
pub const BYTES_PER_VERTEX: u64 = 64;

/// Vertex indices per triangle.
pub const INDICES_PER_FACE: u64 = 3;

/// Bytes per vertex index (u32 indices).
pub const BYTES_PER_INDEX: u64 = 4;

/// Bytes per bone matrix (one 4x4 f32 matrix).
pub const BYTES_PER_BONE_MATRIX: u64 = 64;

/// Rounds a value to the given number of decimal places.
///
/// Exact ties go to the even digit: `8.25` rounds to `8.2`, `263.125` to `263.12`.
pub fn round_f64(value: f64, decimals: i32) -> f64 {
    let multiplier = 10_f64.powi(decimals);
    (value * multiplier).round_ties_even() / multiplier
}

/// Metrics for a single scene.
///
/// Every field defaults to zero/empty so partially populated sources (truncated tool
/// output, older precomputed files) still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MetricsRecord {
    // ========== Scene counts ==========
    /// Total vertex count across all meshes.
    pub total_vertices: u64,
    /// Total face count across all meshes.
    pub total_faces: u64,
    /// Number of meshes.
    pub mesh_count: u64,
    /// Number of nodes in the scene graph (including helper nodes).
    pub node_count: u64,
    /// Maximum depth of the node hierarchy.
    pub max_depth: u64,
    /// Number of materials.
    pub material_count: u64,
    /// Number of embedded textures.
    pub texture_count: u64,
    /// Importer memory consumption in bytes.
    pub memory_bytes: u64,

    // ========== Derived GPU estimates ==========
    /// Estimated vertex buffer size in KB.
    pub vertex_buffer_kb: f64,
    /// Estimated index buffer size in KB.
    pub index_buffer_kb: f64,
    /// Estimated bone matrix palette size in KB.
    pub bone_matrices_kb: f64,
    /// Sum of the GPU estimates in KB.
    pub total_gpu_memory_kb: f64,

    // ========== Breakdown ==========
    /// Per-mesh breakdown, in tool output order.
    pub meshes: Vec<MeshBreakdown>,
    /// Budget warnings known at the time the record was produced.
    pub warnings: Vec<String>,

    // ========== Optional ==========
    /// Real skeletal joint count, once known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_joint_count: Option<JointCount>,
    /// Size of the source file in megabytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,
    /// Set when analysis of the source failed; all counts are zero in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricsRecord {
    /// Creates a degraded record for a scene whose analysis failed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Returns true if this record came from a failed analysis.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the GPU estimate for the current raw counts.
    pub fn gpu_memory(&self) -> GpuMemoryEstimate {
        GpuMemoryEstimate::from_counts(self.total_vertices, self.total_faces, self.node_count)
    }

    /// Overwrites the GPU fields with values derived from the raw counts.
    pub fn recompute_gpu_memory(&mut self) {
        let gpu = self.gpu_memory();
        self.vertex_buffer_kb = gpu.vertex_buffer_kb;
        self.index_buffer_kb = gpu.index_buffer_kb;
        self.bone_matrices_kb = gpu.bone_matrices_kb;
        self.total_gpu_memory_kb = gpu.total_gpu_memory_kb;
    }
}

/// One row of the per-mesh breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MeshBreakdown {
    /// Mesh name as reported by the tool.
    pub name: String,
    /// Vertex count.
    pub vertices: u64,
    /// Bones influencing the mesh.
    pub bones: u64,
    /// Face count.
    pub faces: u64,
}

/// Estimated GPU memory for a scene, in KB rounded to 2 decimals.
///
/// Bone matrices use the node count as an upper bound since the real joint count
/// needs a separate scene-graph pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GpuMemoryEstimate {
    pub vertex_buffer_kb: f64,
    pub index_buffer_kb: f64,
    pub bone_matrices_kb: f64,
    pub total_gpu_memory_kb: f64,
}

impl GpuMemoryEstimate {
    /// Derives the estimate from raw vertex, face and node counts.
    pub fn from_counts(vertices: u64, faces: u64, nodes: u64) -> Self {
        let vertex_bytes = vertices.saturating_mul(BYTES_PER_VERTEX) as f64;
        let index_bytes = faces
            .saturating_mul(INDICES_PER_FACE)
            .saturating_mul(BYTES_PER_INDEX) as f64;
        let bone_bytes = nodes.saturating_mul(BYTES_PER_BONE_MATRIX) as f64;

        Self {
            vertex_buffer_kb: round_f64(vertex_bytes / 1024.0, 2),
            index_buffer_kb: round_f64(index_bytes / 1024.0, 2),
            bone_matrices_kb: round_f64(bone_bytes / 1024.0, 2),
            total_gpu_memory_kb: round_f64((vertex_bytes + index_bytes + bone_bytes) / 1024.0, 2),
        }
    }
}

/// Number of real skeletal joints in a scene.
///
/// Serialized as an integer, with `-1` meaning the count could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum JointCount {
    /// Counted from the scene graph.
    Known(u32),
    /// The scene dump failed or timed out.
    Unknown,
}

impl JointCount {
    /// Sentinel used in serialized output for [`JointCount::Unknown`].
    pub const UNKNOWN_SENTINEL: i64 = -1;

    /// Returns the count if known.
    pub fn known(self) -> Option<u32> {
        match self {
            JointCount::Known(n) => Some(n),
            JointCount::Unknown => None,
        }
    }

}

impl From<i64> for JointCount {
    fn from(value: i64) -> Self {
        u32::try_from(value)
            .map(JointCount::Known)
            .unwrap_or(JointCount::Unknown)
    }
}

impl From<JointCount> for i64 {
    fn from(count: JointCount) -> Self {
        match count {
            JointCount::Known(n) => i64::from(n),
            JointCount::Unknown => JointCount::UNKNOWN_SENTINEL,
        }
    }
}

impl std::fmt::Display for JointCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JointCount::Known(n) => write!(f, "{}", n),
            JointCount::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_f64() {
        assert_eq!(round_f64(1.23456, 2), 1.23);
        assert_eq!(round_f64(1.235_1, 2), 1.24);
        assert_eq!(round_f64(0.0, 1), 0.0);
    }

    #[test]
    fn test_round_f64_ties_to_even() {
        assert_eq!(round_f64(8.25, 1), 8.2);
        assert_eq!(round_f64(8.75, 1), 8.8);
        assert_eq!(round_f64(263.125, 2), 263.12);
        assert_eq!(round_f64(0.5, 0), 0.0);
        assert_eq!(round_f64(1.5, 0), 2.0);
    }

    #[test]
    fn test_gpu_memory_ties_round_to_even() {
        // 132 * 64 / 1024 = 8.25, already exact at two decimals
        let gpu = GpuMemoryEstimate::from_counts(4210, 0, 132);
        assert_eq!(gpu.bone_matrices_kb, 8.25);
        // 4210 * 64 / 1024 = 263.125
        assert_eq!(gpu.vertex_buffer_kb, 263.12);
    }

    #[test]
    fn test_gpu_memory_from_counts() {
        let gpu = GpuMemoryEstimate::from_counts(1000, 500, 40);
        // 1000 * 64 / 1024
        assert_eq!(gpu.vertex_buffer_kb, 62.5);
        // 500 * 12 / 1024 = 5.859375
        assert_eq!(gpu.index_buffer_kb, 5.86);
        // 40 * 64 / 1024
        assert_eq!(gpu.bone_matrices_kb, 2.5);
        assert_eq!(gpu.total_gpu_memory_kb, 70.86);
    }

    #[test]
    fn test_gpu_total_matches_parts_within_rounding() {
        for (v, f, n) in [(1, 1, 1), (777, 1234, 91), (25_000, 16_000, 300), (3, 0, 0)] {
            let gpu = GpuMemoryEstimate::from_counts(v, f, n);
            let parts = gpu.vertex_buffer_kb + gpu.index_buffer_kb + gpu.bone_matrices_kb;
            assert!((gpu.total_gpu_memory_kb - parts).abs() <= 0.015);
            assert_eq!(gpu.vertex_buffer_kb, round_f64(v as f64 * 64.0 / 1024.0, 2));
        }
    }

    #[test]
    fn test_recompute_overwrites_external_values() {
        let mut record = MetricsRecord {
            total_vertices: 2048,
            vertex_buffer_kb: 999.0,
            total_gpu_memory_kb: 999.0,
            ..Default::default()
        };
        record.recompute_gpu_memory();
        assert_eq!(record.vertex_buffer_kb, 128.0);
        assert_eq!(record.total_gpu_memory_kb, 128.0);
    }

    #[test]
    fn test_failed_record_is_zeroed() {
        let record = MetricsRecord::failed("boom");
        assert!(record.is_failed());
        assert_eq!(record.total_vertices, 0);
        assert!(record.meshes.is_empty());
        assert!(record.real_joint_count.is_none());
    }

    #[test]
    fn test_joint_count_serde() {
        assert_eq!(serde_json::to_string(&JointCount::Known(52)).unwrap(), "52");
        assert_eq!(serde_json::to_string(&JointCount::Unknown).unwrap(), "-1");

        let parsed: JointCount = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, JointCount::Unknown);
        let parsed: JointCount = serde_json::from_str("-7").unwrap();
        assert_eq!(parsed, JointCount::Unknown);
        let parsed: JointCount = serde_json::from_str("65").unwrap();
        assert_eq!(parsed, JointCount::Known(65));
    }

    #[test]
    fn test_record_deserializes_partial_json() {
        let record: MetricsRecord = serde_json::from_str(
            r#"{"total_vertices": 10, "real_joint_count": 3, "meshes": [{"name": "Body"}]}"#,
        )
        .unwrap();
        assert_eq!(record.total_vertices, 10);
        assert_eq!(record.total_faces, 0);
        assert_eq!(record.real_joint_count, Some(JointCount::Known(3)));
        assert_eq!(record.meshes[0].name, "Body");
        assert_eq!(record.meshes[0].faces, 0);
    }
}
