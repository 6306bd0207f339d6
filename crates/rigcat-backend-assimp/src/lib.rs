//! rigcat Assimp Backend
//!
//! This crate drives the `assimp` command-line tool to convert FBX scenes to GLB
//! and turns its diagnostic output into structured metrics.
//!
//! # Overview
//!
//! Three tool invocations are used per source file:
//!
//! - **`assimp export`** - converts the FBX to a binary glTF
//! - **`assimp info`** - prints scene statistics, parsed by [`info_parser`]
//! - **`assimp dump`** - writes the scene graph as XML, read by [`joints`]
//!
//! Each invocation is blocking with a timeout (30 seconds by default). Analysis
//! failures degrade the metrics instead of aborting; see [`analysis`].
//!
//! # Budgets
//!
//! | Metric | Budget |
//! |--------|--------|
//! | Triangles | 15,000 |
//! | Vertices | 20,000 |
//! | Materials | 5 |
//! | Meshes | 20 |
//! | Real joints | 75 |
//!
//! # Example
//!
//! ```ignore
//! use rigcat_backend_assimp::{analysis, Assimp, AssimpConfig};
//! use std::path::Path;
//!
//! let assimp = Assimp::with_config(AssimpConfig::default())?;
//! let record = analysis::analyze_scene(&assimp, Path::new("Avatar.fbx"));
//! println!("Vertices: {}", record.total_vertices);
//! ```
//!
//! # Assimp Requirements
//!
//! The orchestrator searches for assimp in:
//!
//! 1. An explicit path from the configuration
//! 2. `ASSIMP_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations (platform-specific)

pub mod analysis;
pub mod error;
pub mod info_parser;
pub mod joints;
pub mod metrics;
pub mod orchestrator;
pub mod warnings;

// Re-export main types at crate root
pub use error::{AssimpError, AssimpResult};
pub use metrics::{GpuMemoryEstimate, JointCount, MeshBreakdown, MetricsRecord};
pub use orchestrator::{Assimp, AssimpConfig, SceneTool};
