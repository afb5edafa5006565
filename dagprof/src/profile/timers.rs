use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{anyhow, ensure, Result};

use super::stats::TimingStat;

/// One accumulator per operator node, sized at net construction and never
/// resized.
///
/// Slots are individually locked so sibling chains of one run can
/// accumulate concurrently; chains partition node indices disjointly, so
/// the locks never contend.
pub struct OpTimers {
    slots: Vec<Mutex<TimingStat>>,
}

impl OpTimers {
    pub fn new(node_count: usize) -> Self {
        let mut slots = Vec::with_capacity(node_count);
        slots.resize_with(node_count, Mutex::default);
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fold a sample into the slot for one node index.
    pub fn accumulate(&self, idx: usize, ms: f64) -> Result<()> {
        ensure!(
            idx < self.slots.len(),
            "expecting {} ops, but op #{} was given",
            self.slots.len(),
            idx
        );
        let mut slot = self.slots[idx]
            .lock()
            .map_err(|_| anyhow!("timer slot poisoned: op #{}", idx))?;
        slot.accumulate(ms);
        Ok(())
    }

    /// Deep copy of every slot, taken between runs for before/after diffs.
    pub fn snapshot(&self) -> Result<Vec<TimingStat>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.lock()
                    .map(|stat| *stat)
                    .map_err(|_| anyhow!("timer slot poisoned: op #{}", idx))
            })
            .collect()
    }
}

/// Per-operator-type accumulators plus invocation counts, grown lazily on
/// first observation of a type. Iteration order is the type-name order, so
/// reports are deterministic.
#[derive(Debug, Default)]
pub struct TypeTimers {
    entries: BTreeMap<String, TimingStat>,
}

impl TypeTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one node instance of a type for the current run.
    pub fn record_instance(&mut self, op_type: &str) {
        self.entries.entry(op_type.to_string()).or_default().cnt += 1;
    }

    /// Fold one run's aggregate total for a type into its running sums.
    pub fn fold_run_total(&mut self, op_type: &str, total: f64) {
        self.entries
            .entry(op_type.to_string())
            .or_default()
            .accumulate(total);
    }

    pub fn get(&self, op_type: &str) -> Option<&TimingStat> {
        self.entries.get(op_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimingStat)> {
        self.entries.iter().map(|(ty, stat)| (ty.as_str(), stat))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
