//! rigcat CLI - batch FBX to GLB conversion for the avatar viewer
//!
//! Running `rigcat` with no arguments converts every FBX file under `./avatar`
//! and writes `./manifest.json`.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use rigcat_backend_assimp::orchestrator::DEFAULT_TIMEOUT_SECS;
use rigcat_backend_assimp::AssimpConfig;
use rigcat_cli::commands;
use rigcat_cli::config::{
    CatalogConfig, DEFAULT_INPUT_ROOT, DEFAULT_MODELS_DIR, DEFAULT_OUT_ROOT, DEFAULT_PRECOMPUTED,
    DEFAULT_SKIP_PREFIXES,
};

/// rigcat - Convert FBX avatar assets to GLB and build the viewer manifest
#[derive(Parser, Debug)]
#[command(name = "rigcat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory scanned recursively for .fbx files
    #[arg(long, default_value = DEFAULT_INPUT_ROOT)]
    input_root: PathBuf,

    /// Output root for GLB files and the manifest
    #[arg(long, default_value = DEFAULT_OUT_ROOT)]
    out_root: PathBuf,

    /// GLB directory relative to the output root
    #[arg(long, default_value = DEFAULT_MODELS_DIR)]
    models_dir: String,

    /// Manifest path (default: <out-root>/manifest.json)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Precomputed metrics JSON file (repeatable; missing files are ignored)
    #[arg(long = "precomputed", value_name = "FILE")]
    precomputed: Vec<PathBuf>,

    /// Relative path prefix to skip (repeatable, case-insensitive)
    #[arg(long = "skip-prefix", value_name = "PREFIX")]
    skip_prefixes: Vec<String>,

    /// Path to the assimp executable (default: ASSIMP_PATH, then PATH)
    #[arg(long)]
    assimp: Option<PathBuf>,

    /// Timeout for each assimp invocation, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Print per-file analysis details
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn catalog_config(&self) -> CatalogConfig {
        let precomputed = if self.precomputed.is_empty() {
            DEFAULT_PRECOMPUTED.iter().map(PathBuf::from).collect()
        } else {
            self.precomputed.clone()
        };
        let skip_prefixes: Vec<String> = if self.skip_prefixes.is_empty() {
            DEFAULT_SKIP_PREFIXES.iter().map(|s| s.to_string()).collect()
        } else {
            self.skip_prefixes.clone()
        };

        let mut config = CatalogConfig::new(&self.input_root, &self.out_root)
            .precomputed(precomputed)
            .skip_prefixes(&skip_prefixes)
            .verbose(self.verbose);
        config.models_dir = self.models_dir.clone();
        if let Some(manifest) = &self.manifest {
            config = config.manifest_path(manifest);
        }
        config
    }

    fn assimp_config(&self) -> AssimpConfig {
        let config = AssimpConfig::default().timeout_secs(self.timeout_secs);
        match &self.assimp {
            Some(path) => config.assimp_path(path),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = commands::convert::run(&cli.catalog_config(), cli.assimp_config());

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
