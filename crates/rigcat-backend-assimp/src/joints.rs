//! Real joint counting from `assimp dump` output.
//!
//! The FBX importer splits one authored joint into several transform nodes
//! (`Hips_$AssimpFbx$_Translation`, `..._Rotation`, ...) and adds mesh, attachment
//! and root nodes, so the raw node count overstates the skeleton. Names that follow
//! those conventions are excluded and the remaining unique names are counted.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::metrics::JointCount;

/// Node declaration in the XML scene dump.
const NODE_NAME_PATTERN: &str = r#"<Node name="([^"]+)""#;

/// Marker the FBX importer puts in its decomposition helper nodes.
pub const HELPER_MARKER: &str = "AssimpFbx";

/// Name of the scene root.
pub const ROOT_NODE_NAME: &str = "RootNode";

/// Suffix of mesh-data nodes.
pub const MESH_NODE_SUFFIX: &str = "_Geo";

/// Suffix of attachment-point nodes.
pub const ATTACHMENT_NODE_SUFFIX: &str = "_Att";

/// Literal name the exporter gives texture placeholder nodes.
pub const TEXTURE_NODE_NAME: &str = "Texture";

fn node_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(NODE_NAME_PATTERN).expect("invalid regex pattern"))
}

/// Returns true if a scene-graph node name is an authored skeletal joint.
pub fn is_real_joint(name: &str) -> bool {
    !(name.contains(HELPER_MARKER)
        || name == ROOT_NODE_NAME
        || name.ends_with(MESH_NODE_SUFFIX)
        || name.ends_with(ATTACHMENT_NODE_SUFFIX)
        // texture file paths recorded as node names
        || name.contains('/')
        || name.contains('\\')
        || name == TEXTURE_NODE_NAME)
}

/// Collects every unique node name declared in a scene dump.
pub fn node_names(dump: &str) -> BTreeSet<&str> {
    node_name_regex()
        .captures_iter(dump)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Returns the unique node names that are real joints.
pub fn real_joint_names(dump: &str) -> BTreeSet<&str> {
    node_names(dump)
        .into_iter()
        .filter(|name| is_real_joint(name))
        .collect()
}

/// Counts the real joints in a scene dump.
pub fn count_real_joints(dump: &str) -> JointCount {
    let count = real_joint_names(dump).len();
    u32::try_from(count)
        .map(JointCount::Known)
        .unwrap_or(JointCount::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dump_of(names: &[&str]) -> String {
        let mut out = String::from("<Scene>\n");
        for name in names {
            out.push_str(&format!("  <Node name=\"{}\">\n  </Node>\n", name));
        }
        out.push_str("</Scene>\n");
        out
    }

    #[test]
    fn test_helpers_and_markers_are_excluded() {
        let dump = dump_of(&[
            "Hips",
            "Hips_$AssimpFbxNull$_Translation",
            "Mesh_Geo",
            "RootNode",
            "clothing/tex.png",
        ]);
        assert_eq!(count_real_joints(&dump), JointCount::Known(1));
        assert_eq!(
            real_joint_names(&dump).into_iter().collect::<Vec<_>>(),
            vec!["Hips"]
        );
    }

    #[test]
    fn test_every_exclusion_rule() {
        assert!(is_real_joint("Spine"));
        assert!(is_real_joint("LeftHand_Geometry"));
        assert!(!is_real_joint("Spine_$AssimpFbx$_Rotation"));
        assert!(!is_real_joint("RootNode"));
        assert!(!is_real_joint("Body_Geo"));
        assert!(!is_real_joint("Head_Att"));
        assert!(!is_real_joint("textures/skin.png"));
        assert!(!is_real_joint("C:\\textures\\skin.png"));
        assert!(!is_real_joint("Texture"));
        assert!(is_real_joint("Textures"));
        assert!(is_real_joint("rootnode"));
    }

    #[test]
    fn test_duplicate_names_count_once() {
        let dump = dump_of(&["Spine", "Spine", "Neck", "Spine", "Neck_Att"]);
        assert_eq!(count_real_joints(&dump), JointCount::Known(2));
    }

    #[test]
    fn test_order_independent() {
        let forward = dump_of(&["Hips", "Spine", "Neck", "Head", "Head_Att", "RootNode"]);
        let reversed = dump_of(&["RootNode", "Head_Att", "Head", "Neck", "Spine", "Hips"]);
        assert_eq!(count_real_joints(&forward), count_real_joints(&reversed));
        assert_eq!(count_real_joints(&forward), JointCount::Known(4));
    }

    #[test]
    fn test_count_equals_unique_minus_excluded() {
        let names = [
            "A", "B", "B", "C_Geo", "D_Att", "RootNode", "Texture", "x/y", "E_$AssimpFbx$_Scaling",
        ];
        let dump = dump_of(&names);
        let unique: BTreeSet<&str> = names.iter().copied().collect();
        let excluded = unique.iter().filter(|n| !is_real_joint(n)).count();
        assert_eq!(
            count_real_joints(&dump),
            JointCount::Known((unique.len() - excluded) as u32)
        );
    }

    #[test]
    fn test_ignores_non_node_elements() {
        let dump = r#"<Scene><Mesh name="Body"/><Node name="Hips"><Material name="Skin"/></Node></Scene>"#;
        assert_eq!(node_names(dump).len(), 1);
        assert_eq!(count_real_joints("no nodes at all"), JointCount::Known(0));
    }
}
