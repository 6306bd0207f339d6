//! Scene analysis on top of a [`SceneTool`].
//!
//! Tool failures never propagate from here: a failed `info` run yields a degraded
//! record and a failed `dump` run yields [`JointCount::Unknown`].

use std::path::Path;

use crate::info_parser::parse_info;
use crate::joints;
use crate::metrics::{JointCount, MetricsRecord};
use crate::orchestrator::SceneTool;

/// Runs the scene report and joint count for `input`.
///
/// If the report cannot be produced the returned record has zero counts, an error
/// message and no joint count, so callers can decide whether to retry the dump.
pub fn analyze_scene<T: SceneTool + ?Sized>(tool: &T, input: &Path) -> MetricsRecord {
    let report = match tool.describe_scene(input) {
        Ok(report) => report,
        Err(e) => return MetricsRecord::failed(e.to_string()),
    };

    let mut record = parse_info(&report);
    record.real_joint_count = Some(count_real_joints(tool, input));
    record
}

/// Counts the real skeletal joints of `input`, or `Unknown` if the dump fails.
pub fn count_real_joints<T: SceneTool + ?Sized>(tool: &T, input: &Path) -> JointCount {
    match tool.dump_scene_graph(input) {
        Ok(dump) => joints::count_real_joints(&dump),
        Err(_) => JointCount::Unknown,
    }
}
