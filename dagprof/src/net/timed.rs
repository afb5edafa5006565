//! Profiled net: times every operator per run and aggregates per-node and
//! per-type statistics across runs.
//!
//! The per-node table keeps cumulative sums for the whole net lifetime; the
//! per-type table is fed one aggregate sample per type per run, derived by
//! snapshotting the per-node table around each run and diffing the running
//! sums. Both representations are kept on purpose: the first backs the
//! per-node cost query, the second the per-type variance over runs.
use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{anyhow, ensure, Result};

use crate::engine::{ChainEngine, ChainRunner, ParallelChains};
use crate::graph::{NetDef, OpDef};
use crate::ops::Operator;
use crate::profile::{
    print_summary, stat_record, validate_op_tensor_devices, DeviceMismatch, OpStat, OpTimers,
    TypeTimers,
};
use crate::tensor::SharedTensor;
use crate::workspace::Workspace;

use super::{collect_bindings, instantiate_ops, Net};

pub struct TimedNet {
    name: String,
    defs: Vec<OpDef>,
    ops: Vec<Box<dyn Operator>>,
    bindings: Vec<Vec<(String, SharedTensor)>>,
    engine: Box<dyn ChainEngine>,
    op_timers: OpTimers,
    type_timers: TypeTimers,
    device_report: Option<Vec<DeviceMismatch>>,
    runs: u64,
}

impl TimedNet {
    pub fn from_def(def: NetDef, ws: &mut Workspace) -> Result<Self> {
        let engine = Box::new(ParallelChains::from_def(&def)?);
        Self::with_engine(def, ws, engine)
    }

    /// Wrap an arbitrary chain engine; anything satisfying the run-chain /
    /// run-full contract can be profiled.
    pub fn with_engine(
        def: NetDef,
        ws: &mut Workspace,
        engine: Box<dyn ChainEngine>,
    ) -> Result<Self> {
        crate::trace!("constructing timed net {}", def.name);
        let ops = instantiate_ops(&def, ws)?;
        let bindings = collect_bindings(&def, ws)?;
        let op_timers = OpTimers::new(def.ops.len());
        let NetDef { name, ops: defs } = def;
        Ok(Self {
            name,
            defs,
            ops,
            bindings,
            engine,
            op_timers,
            type_timers: TypeTimers::new(),
            device_report: None,
            runs: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total runs so far, including the discarded warm-up run.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Runs that contributed to the statistics.
    pub fn measured_runs(&self) -> u64 {
        self.runs.saturating_sub(1)
    }

    /// Device mismatches found by the one-time post-warm-up check, or
    /// `None` before the warm-up run completed.
    pub fn device_report(&self) -> Option<&[DeviceMismatch]> {
        self.device_report.as_deref()
    }

    /// Read access to the per-type table, invocation counts included.
    pub fn type_timers(&self) -> &TypeTimers {
        &self.type_timers
    }

    /// Mean/stddev per operator type, aggregated over per-run type totals.
    pub fn operator_type_stats(&self) -> Result<Vec<OpStat>> {
        let measured = self.measured()?;
        Ok(self
            .type_timers
            .iter()
            .map(|(op_type, stat)| stat_record(op_type.to_string(), stat, measured))
            .collect())
    }

    /// Mean/stddev per node, keyed `net___index___type` so repeated types
    /// stay distinguishable.
    pub fn per_operator_cost(&self) -> Result<Vec<OpStat>> {
        self.check_sized()?;
        let measured = self.measured()?;
        let snapshot = self.op_timers.snapshot()?;
        Ok(self
            .defs
            .iter()
            .enumerate()
            .map(|(idx, def)| {
                let key = format!("{}___{}___{}", self.name, idx, def.op_type);
                stat_record(key, &snapshot[idx], measured)
            })
            .collect())
    }

    fn measured(&self) -> Result<u64> {
        let measured = self.measured_runs();
        ensure!(
            measured >= 1,
            "insufficient runs to produce meaningful data: {} measured",
            measured
        );
        Ok(measured)
    }

    fn check_sized(&self) -> Result<()> {
        ensure!(
            self.op_timers.len() == self.defs.len(),
            "data collected for {} ops, expected {} ops",
            self.op_timers.len(),
            self.defs.len()
        );
        Ok(())
    }
}

impl Net for TimedNet {
    fn run(&mut self) -> Result<bool> {
        self.runs += 1;

        // the first run warms caches and allocators; keep it out of the
        // statistics, but use it for the one-time placement check
        if self.runs <= 1 {
            let runner = TimedRunner {
                defs: &self.defs,
                ops: &self.ops,
                timers: None,
            };
            let success = self.engine.run_full(&runner)?;
            self.device_report = Some(validate_op_tensor_devices(&self.defs, &self.bindings));
            return Ok(success);
        }

        self.check_sized()?;

        let before = self.op_timers.snapshot()?;
        let runner = TimedRunner {
            defs: &self.defs,
            ops: &self.ops,
            timers: Some(&self.op_timers),
        };
        let success = self.engine.run_full(&runner)?;
        let after = self.op_timers.snapshot()?;

        // this run's per-type totals: diff of the running sums only
        let mut run_totals: BTreeMap<&str, f64> = BTreeMap::new();
        for (idx, def) in self.defs.iter().enumerate() {
            *run_totals.entry(def.op_type.as_str()).or_insert(0.0) +=
                after[idx].sum - before[idx].sum;
            self.type_timers.record_instance(&def.op_type);
        }
        for (op_type, total) in run_totals {
            if total != 0.0 {
                self.type_timers.fold_run_total(op_type, total);
            }
        }

        Ok(success)
    }
}

impl Drop for TimedNet {
    fn drop(&mut self) {
        crate::trace!("closing timed net {}", self.name);
        let measured = self.measured_runs();
        if measured < 1 {
            crate::log!("insufficient runs to produce meaningful data");
            return;
        }
        let Ok(snapshot) = self.op_timers.snapshot() else {
            return;
        };
        if snapshot.len() != self.defs.len() {
            return;
        }
        print_summary(&self.defs, &snapshot, &self.type_timers, measured);
    }
}

/// Per-chain hook the engine calls back into: executes each node of the
/// chain in order and accumulates elapsed milliseconds into the node's
/// timer slot. `timers` is `None` on the warm-up run, which executes
/// without touching any statistics.
struct TimedRunner<'a> {
    defs: &'a [OpDef],
    ops: &'a [Box<dyn Operator>],
    timers: Option<&'a OpTimers>,
}

impl TimedRunner<'_> {
    fn run_op(&self, idx: usize) -> Result<bool> {
        let op = self.ops.get(idx).ok_or_else(|| {
            anyhow!("expecting {} ops, but op #{} was given", self.ops.len(), idx)
        })?;
        match op.run() {
            Ok(()) => Ok(true),
            Err(err) => {
                crate::error!("op #{} ({}) failed: {}", idx, self.defs[idx].op_type, err);
                Ok(false)
            }
        }
    }
}

impl ChainRunner for TimedRunner<'_> {
    fn run_chain(&self, chain: &[usize]) -> Result<bool> {
        let mut success = true;
        for &idx in chain {
            match self.timers {
                None => success &= self.run_op(idx)?,
                Some(timers) => {
                    let start = Instant::now();
                    let ok = self.run_op(idx)?;
                    let spent = start.elapsed().as_secs_f64() * 1_000.0;
                    timers.accumulate(idx, spent)?;
                    success &= ok;
                }
            }
        }
        Ok(success)
    }
}
