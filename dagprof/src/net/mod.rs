//! Net variants and symbolic-name instantiation.
mod chain;
mod simple;
mod timed;

pub use chain::ChainNet;
pub use simple::SimpleNet;
pub use timed::TimedNet;

use anyhow::{anyhow, Result};

use crate::graph::NetDef;
use crate::ops::{create_operator, Operator};
use crate::tensor::SharedTensor;
use crate::workspace::Workspace;

/// A runnable net. One `run` is a full pass over the graph; the returned
/// flag is the AND of every operator's success.
pub trait Net: Send {
    fn run(&mut self) -> Result<bool>;
}

impl std::fmt::Debug for dyn Net {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Net")
    }
}

/// Instantiate a net variant by its registered kind name, so a profiling
/// variant can substitute for a plain one at graph-instantiation time.
pub fn create_net(kind: &str, def: NetDef, ws: &mut Workspace) -> Result<Box<dyn Net>> {
    match kind {
        "simple" => Ok(Box::new(SimpleNet::from_def(def, ws)?)),
        "chain" => Ok(Box::new(ChainNet::from_def(def, ws)?)),
        "timed" => Ok(Box::new(TimedNet::from_def(def, ws)?)),
        other => Err(anyhow!("unknown net kind: {}", other)),
    }
}

pub(crate) fn instantiate_ops(def: &NetDef, ws: &mut Workspace) -> Result<Vec<Box<dyn Operator>>> {
    def.ops
        .iter()
        .enumerate()
        .map(|(idx, op_def)| {
            create_operator(op_def, ws)
                .map_err(|err| anyhow!("op #{} ({}): {}", idx, op_def.op_type, err))
        })
        .collect()
}

pub(crate) fn collect_bindings(
    def: &NetDef,
    ws: &Workspace,
) -> Result<Vec<Vec<(String, SharedTensor)>>> {
    let mut bindings = Vec::with_capacity(def.ops.len());
    for op_def in &def.ops {
        let mut tensors = Vec::new();
        for name in op_def.inputs.iter().chain(op_def.outputs.iter()) {
            tensors.push((name.clone(), ws.get(name)?));
        }
        bindings.push(tensors);
    }
    Ok(bindings)
}
