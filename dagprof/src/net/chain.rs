use anyhow::{anyhow, Result};

use crate::engine::{ChainEngine, ChainRunner, ParallelChains};
use crate::graph::{NetDef, OpDef};
use crate::ops::Operator;
use crate::workspace::Workspace;

use super::{instantiate_ops, Net};

/// Engine-driven net without timing: the plain variant the profiled net
/// substitutes for.
pub struct ChainNet {
    name: String,
    defs: Vec<OpDef>,
    ops: Vec<Box<dyn Operator>>,
    engine: Box<dyn ChainEngine>,
}

impl ChainNet {
    pub fn from_def(def: NetDef, ws: &mut Workspace) -> Result<Self> {
        let engine = Box::new(ParallelChains::from_def(&def)?);
        Self::with_engine(def, ws, engine)
    }

    /// Wrap an arbitrary chain engine.
    pub fn with_engine(
        def: NetDef,
        ws: &mut Workspace,
        engine: Box<dyn ChainEngine>,
    ) -> Result<Self> {
        let ops = instantiate_ops(&def, ws)?;
        let NetDef { name, ops: defs } = def;
        Ok(Self {
            name,
            defs,
            ops,
            engine,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Net for ChainNet {
    fn run(&mut self) -> Result<bool> {
        let runner = PlainRunner {
            defs: &self.defs,
            ops: &self.ops,
        };
        self.engine.run_full(&runner)
    }
}

/// Untimed per-chain hook: executes each node in order, folding operator
/// failures into the chain's success flag.
struct PlainRunner<'a> {
    defs: &'a [OpDef],
    ops: &'a [Box<dyn Operator>],
}

impl ChainRunner for PlainRunner<'_> {
    fn run_chain(&self, chain: &[usize]) -> Result<bool> {
        let mut success = true;
        for &idx in chain {
            let op = self.ops.get(idx).ok_or_else(|| {
                anyhow!("expecting {} ops, but op #{} was given", self.ops.len(), idx)
            })?;
            if let Err(err) = op.run() {
                crate::error!("op #{} ({}) failed: {}", idx, self.defs[idx].op_type, err);
                success = false;
            }
        }
        Ok(success)
    }
}
