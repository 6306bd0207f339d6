//! Tool output fixtures.
//!
//! Builders for `assimp info` reports and XML scene dumps in the shape the real
//! tool prints them.

/// Scene counts for an `assimp info` report.
#[derive(Debug, Clone, Default)]
pub struct InfoFixture {
    pub memory_bytes: u64,
    pub nodes: u64,
    pub max_depth: u64,
    pub materials: u64,
    pub textures: u64,
    pub vertices: u64,
    pub faces: u64,
    /// Mesh rows: name, vertices, bones, faces.
    pub meshes: Vec<(String, u64, u64, u64)>,
}

impl InfoFixture {
    /// Adds a mesh row.
    pub fn mesh(mut self, name: &str, vertices: u64, bones: u64, faces: u64) -> Self {
        self.meshes.push((name.to_string(), vertices, bones, faces));
        self
    }

    /// Renders the report text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Launching asset import ...           OK\n");
        out.push_str("Validating postprocessing flags ...  OK\n");
        out.push_str("Importing file ...                   OK\n");
        out.push_str("   import took approx. 0.05210 seconds\n\n");
        out.push_str(&format!("Memory consumption: {} B\n", self.memory_bytes));
        out.push_str(&format!("Nodes:              {}\n", self.nodes));
        out.push_str(&format!("Maximum depth       {}\n", self.max_depth));
        out.push_str(&format!("Meshes:             {}\n", self.meshes.len()));
        out.push_str("Animations:         0\n");
        out.push_str(&format!("Textures (embed.):  {}\n", self.textures));
        out.push_str(&format!("Materials:          {}\n", self.materials));
        out.push_str("Cameras:            0\n");
        out.push_str("Lights:             0\n");
        out.push_str(&format!("Vertices:           {}\n", self.vertices));
        out.push_str(&format!("Faces:              {}\n", self.faces));
        out.push_str("Primitive Types:    triangles\n\n");
        out.push_str("Named Materials:\n");
        for i in 0..self.materials {
            out.push_str(&format!("    'Material_{}'\n", i));
        }
        out.push('\n');
        out.push_str("Meshes:  (name) [vertices / bones / faces | primitive_types]\n");
        for (i, (name, vertices, bones, faces)) in self.meshes.iter().enumerate() {
            out.push_str(&format!(
                "    {} ({}): [{} / {} / {} | triangles]\n",
                i, name, vertices, bones, faces
            ));
        }
        out.push_str("\nNode hierarchy:\nRootNode\n");
        out
    }
}

/// Renders a shortened XML scene dump declaring the given node names.
pub fn scene_dump(node_names: &[&str]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<ASSIMP format_id=\"1\">\n<Scene>\n");
    for name in node_names {
        out.push_str(&format!(
            "<Node name=\"{}\">\n\t<Matrix4>\n\t</Matrix4>\n</Node>\n",
            name
        ));
    }
    out.push_str("</Scene>\n</ASSIMP>\n");
    out
}

/// Node names of a small humanoid skeleton with FBX importer helpers mixed in.
pub fn humanoid_nodes(joints: usize) -> Vec<String> {
    let mut names = vec![
        "RootNode".to_string(),
        "Body_Geo".to_string(),
        "Head_Att".to_string(),
        "Texture".to_string(),
        "textures/skin_d.png".to_string(),
    ];
    for i in 0..joints {
        names.push(format!("Joint_{:03}", i));
        names.push(format!("Joint_{:03}_$AssimpFbx$_Translation", i));
        names.push(format!("Joint_{:03}_$AssimpFbx$_Rotation", i));
    }
    names
}
