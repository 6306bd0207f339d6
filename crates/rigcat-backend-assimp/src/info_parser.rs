//! Parser for `assimp info` output.
//!
//! The tool prints a free-form report; this module pulls the labeled scene counts
//! and the per-mesh table out of it. Parsing is tolerant: a missing label leaves the
//! field at zero and malformed table rows are skipped.

use regex::Regex;
use std::sync::OnceLock;

use crate::metrics::{MeshBreakdown, MetricsRecord};
use crate::warnings::budget_warnings;

/// Labeled scalar lines, in the order they are looked up.
///
/// Each pattern takes the first match in the whole report.
const SCALAR_PATTERNS: &[(Field, &str)] = &[
    (Field::MemoryBytes, r"Memory consumption:\s*(\d+)"),
    (Field::NodeCount, r"Nodes:\s*(\d+)"),
    (Field::MaxDepth, r"Maximum depth\s*(\d+)"),
    (Field::MeshCount, r"Meshes:\s*(\d+)"),
    (Field::MaterialCount, r"Materials:\s*(\d+)"),
    (Field::TextureCount, r"Textures \(embed\.\):\s*(\d+)"),
    (Field::TotalVertices, r"Vertices:\s*(\d+)"),
    (Field::TotalFaces, r"Faces:\s*(\d+)"),
];

/// Row of the mesh table: `  0 (Body_Geo): [1200 / 52 / 2100 | triangles]`.
const MESH_ROW_PATTERN: &str = r"^\s*\d+\s+\(([^)]+)\):\s*\[(\d+)\s*/\s*(\d+)\s*/\s*(\d+)\s*\|";

const MESH_BLOCK_LABEL: &str = "Meshes:";
const MESH_BLOCK_END: &str = "Named Materials:";

#[derive(Debug, Clone, Copy)]
enum Field {
    MemoryBytes,
    NodeCount,
    MaxDepth,
    MeshCount,
    MaterialCount,
    TextureCount,
    TotalVertices,
    TotalFaces,
}

impl Field {
    fn slot(self, record: &mut MetricsRecord) -> &mut u64 {
        match self {
            Field::MemoryBytes => &mut record.memory_bytes,
            Field::NodeCount => &mut record.node_count,
            Field::MaxDepth => &mut record.max_depth,
            Field::MeshCount => &mut record.mesh_count,
            Field::MaterialCount => &mut record.material_count,
            Field::TextureCount => &mut record.texture_count,
            Field::TotalVertices => &mut record.total_vertices,
            Field::TotalFaces => &mut record.total_faces,
        }
    }
}

fn scalar_regexes() -> &'static [(Field, Regex)] {
    static REGEXES: OnceLock<Vec<(Field, Regex)>> = OnceLock::new();
    REGEXES.get_or_init(|| {
        SCALAR_PATTERNS
            .iter()
            .map(|(field, pattern)| (*field, Regex::new(pattern).expect("invalid regex pattern")))
            .collect()
    })
}

fn mesh_row_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(MESH_ROW_PATTERN).expect("invalid regex pattern"))
}

/// Parses `assimp info` output into a metrics record.
///
/// GPU estimates are derived from the parsed counts and the non-joint budget
/// warnings are attached. Joint warnings are left to [`crate::warnings::finalize`]
/// once the real joint count is known.
pub fn parse_info(output: &str) -> MetricsRecord {
    let mut record = MetricsRecord::default();

    for (field, re) in scalar_regexes() {
        let value = re
            .captures(output)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok());
        if let Some(value) = value {
            *field.slot(&mut record) = value;
        }
    }

    record.meshes = parse_mesh_table(output);
    record.recompute_gpu_memory();
    record.warnings = budget_warnings(&record);

    record
}

/// Extracts the per-mesh breakdown.
///
/// The block starts after the mesh table header (`Meshes:  (name) [...]`) when the
/// report has one, otherwise after the first `Meshes:` line, and runs until
/// `Named Materials:` or the end of the report.
pub fn parse_mesh_table(output: &str) -> Vec<MeshBreakdown> {
    let Some(block) = mesh_block(output) else {
        return Vec::new();
    };

    block
        .lines()
        .filter_map(|line| {
            let caps = mesh_row_regex().captures(line)?;
            Some(MeshBreakdown {
                name: caps[1].to_string(),
                vertices: caps[2].parse().ok()?,
                bones: caps[3].parse().ok()?,
                faces: caps[4].parse().ok()?,
            })
        })
        .collect()
}

fn mesh_block(output: &str) -> Option<&str> {
    let header_start = find_table_header(output).or_else(|| output.find(MESH_BLOCK_LABEL))?;
    let after_header = &output[header_start..];
    let body = match after_header.find('\n') {
        Some(newline) => &after_header[newline + 1..],
        None => return None,
    };
    let end = body.find(MESH_BLOCK_END).unwrap_or(body.len());
    Some(&body[..end])
}

/// Finds a `Meshes:` line that introduces the table rather than the summary count.
fn find_table_header(output: &str) -> Option<usize> {
    let mut offset = 0;
    for line in output.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(MESH_BLOCK_LABEL) {
            if rest.trim_start().starts_with('(') {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }
    None
}
