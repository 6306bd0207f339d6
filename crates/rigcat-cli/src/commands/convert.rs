//! Convert command implementation
//!
//! Converts every FBX file under the input root to GLB and writes the viewer
//! manifest. Per-file failures are reported and leave the file out of the manifest;
//! they do not change the exit code.

use anyhow::{Context, Result};
use colored::Colorize;
use rigcat_backend_assimp::{Assimp, AssimpConfig, SceneTool};
use std::process::ExitCode;
use std::time::Instant;

use crate::catalog::{discover_sources, BatchSummary, CatalogBuilder, Category, PrecomputedIndex};
use crate::config::CatalogConfig;

/// Run the convert command with the assimp tool.
///
/// # Arguments
/// * `config` - Input/output locations and batch options
/// * `assimp` - How to find and run assimp
///
/// # Returns
/// Exit code 0 once the manifest is written, whatever the per-file outcomes.
pub fn run(config: &CatalogConfig, assimp: AssimpConfig) -> Result<ExitCode> {
    let tool = Assimp::with_config(assimp).context("Cannot run the batch without assimp")?;
    println!("{} {}", "Assimp:".blue().bold(), tool.executable().display());
    run_with_tool(config, &tool)
}

/// Run the convert command with any scene tool.
pub fn run_with_tool<T: SceneTool + ?Sized>(config: &CatalogConfig, tool: &T) -> Result<ExitCode> {
    let start = Instant::now();

    print_header(config);

    let precomputed = PrecomputedIndex::load(config.precomputed.as_slice())?;
    println!(
        "{} Loaded {} pre-computed entries",
        "INFO".blue().bold(),
        precomputed.len()
    );

    let sources = discover_sources(&config.input_root)?;
    println!(
        "{} Found {} FBX files",
        "INFO".blue().bold(),
        sources.len()
    );
    println!();

    let outcome = CatalogBuilder::new(config, tool, &precomputed).build(&sources);

    outcome.manifest.write(&config.manifest_path)?;

    print_summary(&outcome.summary, start.elapsed().as_secs_f64());
    println!(
        "{} {}",
        "Output:".blue().bold(),
        config.manifest_path.display()
    );

    Ok(ExitCode::SUCCESS)
}

fn print_header(config: &CatalogConfig) {
    println!("{}", "======================================".cyan());
    println!("{}", "  rigcat FBX -> GLB Catalog".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!(
        "{} {}",
        "Input root:".blue().bold(),
        config.input_root.display()
    );
    println!("{} {}", "Output root:".blue().bold(), config.out_root.display());
    if !config.skip_prefixes.is_empty() {
        println!(
            "{} {}",
            "Skip prefixes:".blue().bold(),
            config.skip_prefixes.join(", ")
        );
    }
    println!();
}

fn print_summary(summary: &BatchSummary, runtime_seconds: f64) {
    let count = |category: Category| summary.by_category.get(&category).copied().unwrap_or(0);
    let total: usize = summary.by_category.values().sum();

    println!();
    println!("{}", "======================================".cyan());
    println!("{}", "  Catalog Summary".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!("{} {}", "Files found:".blue().bold(), summary.found);
    println!("{} {}", "Converted:".green().bold(), summary.converted);
    println!("{} {}", "Skipped (duplicates):".yellow().bold(), summary.skipped);
    println!("{} {}", "Failed:".red().bold(), summary.failed);
    if summary.precomputed > 0 {
        println!(
            "{} {}",
            "Pre-computed metrics used:".blue().bold(),
            summary.precomputed
        );
    }
    if summary.analysis_failed > 0 {
        println!(
            "{} {}",
            "Analysis failures:".yellow().bold(),
            summary.analysis_failed
        );
    }
    println!(
        "{} {} models ({} {}, {} {}, {} {})",
        "Manifest:".blue().bold(),
        total,
        count(Category::Rigs),
        Category::Rigs.label(),
        count(Category::Clothing),
        Category::Clothing.label(),
        count(Category::CageDeformers),
        Category::CageDeformers.label()
    );
    println!("{} {:.2}s", "Total runtime:".blue().bold(), runtime_seconds);
    println!();

    if !summary.failures.is_empty() {
        println!("{}", "Failed files:".red().bold());
        for (path, message) in &summary.failures {
            println!("  - {}: {}", path.display(), message);
        }
        println!();
    }
}
