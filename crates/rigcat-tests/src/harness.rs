//! Test harness for catalog runs.
//!
//! Provides a scripted stand-in for assimp and a builder for temporary avatar
//! source trees.

use rigcat_backend_assimp::{AssimpError, AssimpResult, SceneTool};
use rigcat_cli::config::CatalogConfig;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// What the scripted tool answers for one source file.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// `assimp info` output, or `None` to fail the call.
    pub info: Option<String>,
    /// Scene dump, or `None` to fail the call.
    pub dump: Option<String>,
    /// Fail the conversion with this message.
    pub convert_error: Option<String>,
}

impl Script {
    /// A script that answers both analysis calls.
    pub fn new(info: impl Into<String>, dump: impl Into<String>) -> Self {
        Self {
            info: Some(info.into()),
            dump: Some(dump.into()),
            convert_error: None,
        }
    }

    /// Makes the conversion fail.
    pub fn failing_conversion(mut self, message: &str) -> Self {
        self.convert_error = Some(message.to_string());
        self
    }

    /// Makes `assimp info` fail.
    pub fn failing_info(mut self) -> Self {
        self.info = None;
        self
    }

    /// Makes the scene dump fail.
    pub fn failing_dump(mut self) -> Self {
        self.dump = None;
        self
    }
}

/// One recorded tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Convert(String),
    Info(String),
    Dump(String),
}

/// Scene tool answering from per-file scripts, keyed by source file name.
///
/// Files without a script convert successfully and fail both analysis calls.
#[derive(Debug, Default)]
pub struct ScriptedTool {
    scripts: HashMap<String, Script>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the script for a file name.
    pub fn script(mut self, file_name: &str, script: Script) -> Self {
        self.scripts.insert(file_name.to_string(), script);
        self
    }

    /// Every invocation so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Number of dump calls made for a file name.
    pub fn dump_count(&self, file_name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Dump(name) if name == file_name))
            .count()
    }

    fn lookup(&self, input: &Path) -> (String, Option<&Script>) {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let script = self.scripts.get(&name);
        (name, script)
    }
}

impl SceneTool for ScriptedTool {
    fn convert(&self, input: &Path, output: &Path) -> AssimpResult<()> {
        let (name, script) = self.lookup(input);
        self.calls.borrow_mut().push(Call::Convert(name));
        if let Some(message) = script.and_then(|s| s.convert_error.as_deref()) {
            return Err(AssimpError::process_failed("export", 1, message));
        }
        fs::write(output, b"glTF\x02\x00\x00\x00")?;
        Ok(())
    }

    fn describe_scene(&self, input: &Path) -> AssimpResult<String> {
        let (name, script) = self.lookup(input);
        self.calls.borrow_mut().push(Call::Info(name));
        script
            .and_then(|s| s.info.clone())
            .ok_or_else(|| AssimpError::process_failed("info", 1, "failed to load scene"))
    }

    fn dump_scene_graph(&self, input: &Path) -> AssimpResult<String> {
        let (name, script) = self.lookup(input);
        self.calls.borrow_mut().push(Call::Dump(name));
        script
            .and_then(|s| s.dump.clone())
            .ok_or_else(|| AssimpError::process_failed("dump", 1, "failed to load scene"))
    }
}

/// Check if assimp tests should run based on environment variable.
pub fn should_run_assimp_tests() -> bool {
    std::env::var("RIGCAT_RUN_ASSIMP_TESTS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Locates assimp the same way the CLI does.
pub fn find_assimp() -> Option<PathBuf> {
    rigcat_backend_assimp::orchestrator::find_assimp(None).ok()
}

/// A temporary workspace with an `avatar/` input tree and an `out/` output root.
pub struct AvatarTree {
    dir: TempDir,
}

impl AvatarTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join("avatar")).expect("failed to create input root");
        Self { dir }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Input root scanned for FBX files.
    pub fn input_root(&self) -> PathBuf {
        self.dir.path().join("avatar")
    }

    /// Output root for GLB files and the manifest.
    pub fn out_root(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Writes a source file of `size` bytes at a path relative to the input root.
    pub fn add_source(&self, relative: &str, size: usize) -> PathBuf {
        let path = self.input_root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create source directory");
        }
        fs::write(&path, vec![0u8; size]).expect("failed to write source file");
        path
    }

    /// Writes a JSON file at a path relative to the workspace root.
    pub fn add_json(&self, relative: &str, value: &serde_json::Value) -> PathBuf {
        let path = self.dir.path().join(relative);
        let content = serde_json::to_string_pretty(value).expect("failed to encode JSON");
        fs::write(&path, content).expect("failed to write JSON file");
        path
    }

    /// A config reading this tree, with no precomputed files.
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig::new(self.input_root(), self.out_root()).precomputed(Vec::new())
    }
}

impl Default for AvatarTree {
    fn default() -> Self {
        Self::new()
    }
}
