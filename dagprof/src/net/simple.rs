use anyhow::Result;

use crate::graph::{describe_op, NetDef, OpDef};
use crate::ops::Operator;
use crate::workspace::Workspace;

use super::{instantiate_ops, Net};

/// Baseline net: executes operators in definition order on the caller's
/// thread, with no chain dispatch and no timing.
pub struct SimpleNet {
    name: String,
    defs: Vec<OpDef>,
    ops: Vec<Box<dyn Operator>>,
}

impl SimpleNet {
    pub fn from_def(def: NetDef, ws: &mut Workspace) -> Result<Self> {
        let ops = instantiate_ops(&def, ws)?;
        let NetDef { name, ops: defs } = def;
        Ok(Self { name, defs, ops })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SimpleNet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleNet")
            .field("name", &self.name)
            .field("ops", &self.ops.len())
            .finish()
    }
}

impl Net for SimpleNet {
    fn run(&mut self) -> Result<bool> {
        let mut success = true;
        for (idx, op) in self.ops.iter().enumerate() {
            crate::trace!("exec op #{}: {}", idx, describe_op(&self.defs[idx]));
            if let Err(err) = op.run() {
                crate::error!("op #{} ({}) failed: {}", idx, self.defs[idx].op_type, err);
                success = false;
            }
        }
        Ok(success)
    }
}
