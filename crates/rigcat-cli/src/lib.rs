//! rigcat CLI library.
//!
//! This crate provides the batch pipeline behind the `rigcat` binary: it converts
//! every FBX file under an input root to GLB and writes the viewer manifest.

pub mod catalog;
pub mod commands;
pub mod config;
