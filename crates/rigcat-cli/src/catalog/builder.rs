//! Catalog builder: converts every source file and assembles the manifest.
//!
//! Files are processed one at a time in discovery order. A failed conversion drops
//! the file from the manifest; a failed analysis keeps it with degraded metrics.

use colored::Colorize;
use rigcat_backend_assimp::{analysis, warnings, JointCount, MetricsRecord, SceneTool};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::category::{categorize, relative_key, should_skip, Category};
use super::discovery::duplicate_file_names;
use super::entry::{file_stem, CatalogEntry, EntrySource};
use super::manifest::Manifest;
use super::precomputed::PrecomputedIndex;
use crate::config::CatalogConfig;

/// Where an entry's metrics came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsSource {
    /// A precomputed analysis record.
    Precomputed,
    /// A fresh `assimp info` run.
    Fresh,
}

/// Counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Unique source files found.
    pub found: usize,
    /// Successful conversions.
    pub converted: usize,
    /// Files excluded by a skip prefix.
    pub skipped: usize,
    /// Failed conversions.
    pub failed: usize,
    /// Converted files whose metrics came from a precomputed record.
    pub precomputed: usize,
    /// Converted files whose analysis failed.
    pub analysis_failed: usize,
    /// Failure messages by source path.
    pub failures: Vec<(PathBuf, String)>,
    /// Entries per category.
    pub by_category: BTreeMap<Category, usize>,
}

/// Result of a batch run.
#[derive(Debug, Clone)]
pub struct CatalogOutcome {
    /// The sorted manifest.
    pub manifest: Manifest,
    /// Run counts.
    pub summary: BatchSummary,
}

/// Builds a manifest from source files with a scene tool.
pub struct CatalogBuilder<'a, T: SceneTool + ?Sized> {
    config: &'a CatalogConfig,
    tool: &'a T,
    precomputed: &'a PrecomputedIndex,
}

impl<'a, T: SceneTool + ?Sized> CatalogBuilder<'a, T> {
    /// Creates a builder.
    pub fn new(config: &'a CatalogConfig, tool: &'a T, precomputed: &'a PrecomputedIndex) -> Self {
        Self {
            config,
            tool,
            precomputed,
        }
    }

    /// Processes `sources` in order and returns the sorted manifest.
    pub fn build(&self, sources: &[PathBuf]) -> CatalogOutcome {
        let mut manifest = Manifest::new();
        let mut summary = BatchSummary {
            found: sources.len(),
            ..Default::default()
        };

        let mut queue = Vec::with_capacity(sources.len());
        for path in sources {
            let key = self.rule_key(path);
            if should_skip(&key, &self.config.skip_prefixes) {
                summary.skipped += 1;
                continue;
            }
            queue.push((path, categorize(&key)));
        }

        self.warn_duplicate_names(queue.iter().map(|(path, _)| *path));

        for (path, category) in queue {
            match self.process(path, category) {
                Ok((entry, source, analysis_failed)) => {
                    summary.converted += 1;
                    if source == MetricsSource::Precomputed {
                        summary.precomputed += 1;
                    }
                    if analysis_failed {
                        summary.analysis_failed += 1;
                    }
                    manifest.push(entry);
                }
                Err(message) => {
                    summary.failed += 1;
                    summary.failures.push((path.clone(), message));
                }
            }
        }

        manifest.sort();
        for category in Category::ALL {
            summary
                .by_category
                .insert(category, manifest.entries(category).len());
        }

        CatalogOutcome { manifest, summary }
    }

    /// Converts and analyzes one file.
    ///
    /// Returns the entry, where its metrics came from and whether analysis failed,
    /// or the conversion failure message.
    fn process(
        &self,
        path: &Path,
        category: Category,
    ) -> Result<(CatalogEntry, MetricsSource, bool), String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = file_stem(&file_name).to_string();
        let glb_file = format!("{}/{}/{}.glb", self.config.models_dir, category, stem);
        let glb_path = self
            .config
            .models_root()
            .join(category.as_str())
            .join(format!("{}.glb", stem));

        print!(
            "  [{:>15}] {} -> {}.glb ... ",
            category.as_str(),
            file_name,
            stem
        );
        let _ = std::io::stdout().flush();

        if let Err(message) = self.convert(path, &glb_path) {
            println!("{}", "FAILED (skipping)".red());
            println!("    {} {}", "x".red(), message);
            return Err(message);
        }
        println!("{}", "OK".green());

        let (metrics, source) = match self.precomputed.get(&file_name) {
            Some(record) => {
                let mut record = record.clone();
                record.recompute_gpu_memory();
                (record, MetricsSource::Precomputed)
            }
            None => {
                if self.config.verbose {
                    println!("    Running assimp info for {}...", file_name);
                }
                (
                    analysis::analyze_scene(self.tool, path),
                    MetricsSource::Fresh,
                )
            }
        };

        let analysis_failed = metrics.is_failed();
        if let Some(error) = &metrics.error {
            println!(
                "    {} analysis failed, using zero metrics: {}",
                "WARN".yellow().bold(),
                error
            );
        }

        let joints = self.resolve_joints(&metrics, source, path);
        let final_warnings = warnings::finalize(&metrics.warnings, joints);
        if self.config.verbose {
            println!("    joints: {}, warnings: {}", joints, final_warnings.len());
            for warning in &final_warnings {
                println!("      {} {}", "!".yellow(), warning);
            }
        }

        let entry = CatalogEntry::new(
            EntrySource {
                file_name: &file_name,
                glb_file,
                category,
                file_size_bytes: fs::metadata(path).ok().map(|m| m.len()),
            },
            &metrics,
            joints,
            final_warnings,
        );

        Ok((entry, source, analysis_failed))
    }

    /// Runs the conversion, creating the output directory first.
    fn convert(&self, input: &Path, output: &Path) -> Result<(), String> {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                format!(
                    "Failed to create output directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
        self.tool
            .convert(input, output)
            .map_err(|e| format!("[{}] {}", e.code(), e))
    }

    /// Returns the joint count for an entry, dumping the scene when none was attempted.
    ///
    /// A fresh analysis already tried the dump, so its result is final. A precomputed
    /// count is trusted only if it is known.
    fn resolve_joints(
        &self,
        metrics: &MetricsRecord,
        source: MetricsSource,
        path: &Path,
    ) -> JointCount {
        match (metrics.real_joint_count, source) {
            (Some(count @ JointCount::Known(_)), _) => count,
            (Some(JointCount::Unknown), MetricsSource::Fresh) => JointCount::Unknown,
            _ => analysis::count_real_joints(self.tool, path),
        }
    }

    fn rule_key(&self, path: &Path) -> String {
        relative_key(path, &self.config.input_root).unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        })
    }

    fn warn_duplicate_names<'p>(&self, paths: impl IntoIterator<Item = &'p PathBuf>) {
        for (name, paths) in duplicate_file_names(paths) {
            println!(
                "{} {} files are named {}; precomputed metrics are matched by file name:",
                "WARN".yellow().bold(),
                paths.len(),
                name
            );
            for path in paths {
                println!("    {}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::precomputed::PrecomputedRecord;
    use rigcat_backend_assimp::{AssimpError, AssimpResult};
    use std::cell::Cell;

    /// Writes a placeholder GLB and serves fixed tool output; counts dump calls.
    struct FakeTool {
        info: &'static str,
        dump: &'static str,
        dumps: Cell<usize>,
    }

    impl FakeTool {
        fn new(info: &'static str, dump: &'static str) -> Self {
            Self {
                info,
                dump,
                dumps: Cell::new(0),
            }
        }
    }

    impl SceneTool for FakeTool {
        fn convert(&self, input: &Path, output: &Path) -> AssimpResult<()> {
            if input.to_string_lossy().contains("Corrupt") {
                return Err(AssimpError::process_failed("export", 1, "invalid FBX header"));
            }
            fs::write(output, b"glTF")?;
            Ok(())
        }

        fn describe_scene(&self, _input: &Path) -> AssimpResult<String> {
            Ok(self.info.to_string())
        }

        fn dump_scene_graph(&self, _input: &Path) -> AssimpResult<String> {
            self.dumps.set(self.dumps.get() + 1);
            Ok(self.dump.to_string())
        }
    }

    fn setup(files: &[&str]) -> (tempfile::TempDir, CatalogConfig, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("avatar");
        let mut sources = Vec::new();
        for file in files {
            let path = input.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, vec![0u8; 2048]).unwrap();
            sources.push(path);
        }
        let config = CatalogConfig::new(&input, dir.path().join("out")).precomputed(Vec::new());
        (dir, config, sources)
    }

    #[test]
    fn test_conversion_failure_excludes_file() {
        let (_dir, config, sources) = setup(&["rigs/Corrupt.fbx", "rigs/Good.fbx"]);
        let tool = FakeTool::new("Vertices: 10\n", r#"<Node name="Hips">"#);
        let index = PrecomputedIndex::default();

        let outcome = CatalogBuilder::new(&config, &tool, &index).build(&sources);
        assert_eq!(outcome.summary.converted, 1);
        assert_eq!(outcome.summary.failed, 1);
        assert_eq!(
            outcome.summary.failures[0].1,
            "[ASSIMP_004] assimp export exited with status 1: invalid FBX header"
        );
        assert_eq!(outcome.manifest.rigs.len(), 1);
        assert_eq!(outcome.manifest.rigs[0].id, "Good");
        assert!(config.models_root().join("rigs/Good.glb").exists());
    }

    #[test]
    fn test_fresh_analysis_counts_joints_once() {
        let (_dir, config, sources) = setup(&["LayeredClothing/LCL_Vest.fbx"]);
        let tool = FakeTool::new(
            "Nodes: 30\nVertices: 900\nFaces: 1200\n",
            r#"<Node name="RootNode"><Node name="Hips"><Node name="Vest_Geo">"#,
        );
        let index = PrecomputedIndex::default();

        let outcome = CatalogBuilder::new(&config, &tool, &index).build(&sources);
        let entry = &outcome.manifest.clothing[0];
        assert_eq!(entry.name, "Vest");
        assert_eq!(entry.file, "models/clothing/LCL_Vest.glb");
        assert_eq!(entry.real_joint_count, JointCount::Known(1));
        assert_eq!(entry.total_vertices, 900);
        assert_eq!(entry.file_size_mb, 0.0);
        assert_eq!(tool.dumps.get(), 1);
    }

    #[test]
    fn test_precomputed_known_joints_are_trusted() {
        let (_dir, config, sources) = setup(&["rigs/Rig.fbx"]);
        let tool = FakeTool::new("", r#"<Node name="Hips">"#);
        let index: PrecomputedIndex = vec![PrecomputedRecord {
            file_name: "Rig.fbx".to_string(),
            metrics: MetricsRecord {
                total_vertices: 2048,
                vertex_buffer_kb: 1.0,
                real_joint_count: Some(JointCount::Known(80)),
                ..Default::default()
            },
        }]
        .into_iter()
        .collect();

        let outcome = CatalogBuilder::new(&config, &tool, &index).build(&sources);
        let entry = &outcome.manifest.rigs[0];
        assert_eq!(entry.real_joint_count, JointCount::Known(80));
        assert_eq!(entry.warnings, vec!["HIGH JOINT COUNT: 80 (budget: 75)"]);
        // recomputed from the raw count, not taken from the record
        assert_eq!(entry.vertex_buffer_kb, 128.0);
        assert_eq!(tool.dumps.get(), 0);
        assert_eq!(outcome.summary.precomputed, 1);
    }

    #[test]
    fn test_precomputed_unknown_joints_are_recounted() {
        let (_dir, config, sources) = setup(&["rigs/Rig.fbx"]);
        let tool = FakeTool::new("", r#"<Node name="Hips"><Node name="Spine">"#);
        let index: PrecomputedIndex = vec![PrecomputedRecord {
            file_name: "Rig.fbx".to_string(),
            metrics: MetricsRecord {
                real_joint_count: Some(JointCount::Unknown),
                ..Default::default()
            },
        }]
        .into_iter()
        .collect();

        let outcome = CatalogBuilder::new(&config, &tool, &index).build(&sources);
        assert_eq!(outcome.manifest.rigs[0].real_joint_count, JointCount::Known(2));
        assert_eq!(tool.dumps.get(), 1);
    }

    #[test]
    fn test_summary_counts_by_category() {
        let (_dir, config, sources) = setup(&[
            "rigs/A.fbx",
            "cage_deformer/cube/Cube.fbx",
            "cage_deformer/layered_clothing/Dup.fbx",
            "LayeredClothing/Shirt.fbx",
        ]);
        let tool = FakeTool::new("", "");
        let index = PrecomputedIndex::default();

        let summary = CatalogBuilder::new(&config, &tool, &index)
            .build(&sources)
            .summary;
        assert_eq!(summary.found, 4);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.converted, 3);
        assert_eq!(summary.by_category[&Category::Rigs], 1);
        assert_eq!(summary.by_category[&Category::Clothing], 1);
        assert_eq!(summary.by_category[&Category::CageDeformers], 1);
    }
}
