//! Catalog assembly: discovery, categorization, precomputed metrics and the manifest.

pub mod builder;
pub mod category;
pub mod discovery;
pub mod entry;
pub mod manifest;
pub mod precomputed;

pub use builder::{BatchSummary, CatalogBuilder, CatalogOutcome, MetricsSource};
pub use category::{categorize, relative_key, should_skip, Category};
pub use discovery::{dedup_canonical, discover_sources};
pub use entry::{display_name, CatalogEntry};
pub use manifest::Manifest;
pub use precomputed::{PrecomputedIndex, PrecomputedRecord};
