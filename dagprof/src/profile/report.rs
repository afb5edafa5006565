use serde::{Deserialize, Serialize};

use crate::graph::{display_label, OpDef};

use super::stats::TimingStat;
use super::timers::TypeTimers;

/// Aggregated statistic record, ready for an external serialization
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpStat {
    pub name: String,
    pub mean: f64,
    pub stddev: f64,
}

pub(crate) fn stat_record(name: String, stat: &TimingStat, measured: u64) -> OpStat {
    OpStat {
        name,
        mean: stat.mean(measured).unwrap_or(0.0),
        stddev: stat.stddev(measured).unwrap_or(0.0),
    }
}

/// Teardown report: every node in index order, then every type. Per-node
/// lines go to the trace channel, the per-type summary to plain output.
pub(crate) fn print_summary(
    defs: &[OpDef],
    per_op: &[TimingStat],
    types: &TypeTimers,
    measured: u64,
) {
    for (idx, def) in defs.iter().enumerate() {
        let stat = &per_op[idx];
        let (Some(mean), Some(stddev)) = (stat.mean(measured), stat.stddev(measured)) else {
            continue;
        };
        crate::trace!(
            "op #{} ({}, {}) {:.6} ms/iter ({:.6} ms/iter)",
            idx,
            display_label(def),
            def.op_type,
            mean,
            stddev
        );
    }

    crate::log!("time per operator type:");
    for (op_type, stat) in types.iter() {
        let (Some(mean), Some(stddev)) = (stat.mean(measured), stat.stddev(measured)) else {
            continue;
        };
        crate::log!(
            "{:>12.6} ms/iter ({:>12.6} ms/iter)  count per iter: {:.2}  {}",
            mean,
            stddev,
            stat.cnt as f64 / measured as f64,
            op_type
        );
    }
}
