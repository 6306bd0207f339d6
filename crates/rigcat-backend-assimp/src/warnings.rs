//! Performance budget warnings.
//!
//! Budgets are checked with a strict greater-than and evaluated in a fixed order:
//! faces, vertices, materials, meshes, then joints. The joint budget is applied
//! separately by [`finalize`] because the real joint count comes from a second
//! tool pass.

use crate::metrics::{JointCount, MetricsRecord};

/// Triangle budget per asset.
pub const FACE_BUDGET: u64 = 15_000;

/// Vertex budget per asset.
pub const VERTEX_BUDGET: u64 = 20_000;

/// Material budget per asset.
pub const MATERIAL_BUDGET: u64 = 5;

/// Mesh count above which draw call overhead is flagged.
pub const MESH_BUDGET: u64 = 20;

/// Real joint budget per asset.
pub const JOINT_BUDGET: u32 = 75;

/// Substrings that identify a bone or joint budget warning.
const JOINT_WARNING_MARKERS: &[&str] = &["BONE COUNT", "JOINT COUNT"];

/// Returns the non-joint budget warnings for a record.
pub fn budget_warnings(record: &MetricsRecord) -> Vec<String> {
    let mut warnings = Vec::new();

    if record.total_faces > FACE_BUDGET {
        warnings.push(format!(
            "HIGH TRIANGLE COUNT: {} (budget: {})",
            group_thousands(record.total_faces),
            group_thousands(FACE_BUDGET)
        ));
    }
    if record.total_vertices > VERTEX_BUDGET {
        warnings.push(format!(
            "HIGH VERTEX COUNT: {} (budget: {})",
            group_thousands(record.total_vertices),
            group_thousands(VERTEX_BUDGET)
        ));
    }
    if record.material_count > MATERIAL_BUDGET {
        warnings.push(format!(
            "MANY MATERIALS: {} (budget: {})",
            record.material_count, MATERIAL_BUDGET
        ));
    }
    if record.mesh_count > MESH_BUDGET {
        warnings.push(format!(
            "MANY MESHES: {} (may cause draw call overhead)",
            record.mesh_count
        ));
    }

    warnings
}

/// Returns the joint budget warning, if the known count exceeds the budget.
pub fn joint_warning(joints: JointCount) -> Option<String> {
    match joints.known() {
        Some(count) if count > JOINT_BUDGET => Some(format!(
            "HIGH JOINT COUNT: {} (budget: {})",
            count, JOINT_BUDGET
        )),
        _ => None,
    }
}

/// Returns true if a warning is about bone or joint counts.
pub fn is_joint_warning(warning: &str) -> bool {
    JOINT_WARNING_MARKERS
        .iter()
        .any(|marker| warning.contains(marker))
}

/// Builds the final warning list from upstream warnings and the real joint count.
///
/// Any upstream bone/joint warning is dropped, whatever count it was computed from,
/// and the joint budget is checked against `joints` instead.
pub fn finalize(upstream: &[String], joints: JointCount) -> Vec<String> {
    let mut warnings: Vec<String> = upstream
        .iter()
        .filter(|w| !is_joint_warning(w))
        .cloned()
        .collect();
    warnings.extend(joint_warning(joints));
    warnings
}

/// Formats an integer with `,` thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
