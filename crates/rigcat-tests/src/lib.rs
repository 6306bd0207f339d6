//! rigcat End-to-End Test Infrastructure
//!
//! This crate drives the whole catalog pipeline against temporary avatar trees:
//!
//! - Discovery: case-insensitive matching and canonical-path deduplication
//! - Conversion: per-file failures leave the file out of the manifest
//! - Analysis: `assimp info` parsing and real joint counting
//! - Manifest: category routing, sorting and the JSON shape read by the viewer
//!
//! ## Running Tests
//!
//! ```bash
//! # Run everything that does not need assimp
//! cargo test -p rigcat-tests
//!
//! # Also run the tests that invoke a real assimp binary
//! RIGCAT_RUN_ASSIMP_TESTS=1 cargo test -p rigcat-tests -- --ignored
//! ```
//!
//! The [`harness::ScriptedTool`] stands in for assimp: it writes placeholder GLB
//! files and answers `info`/`dump` requests from per-file scripts.

pub mod fixtures;
pub mod harness;
