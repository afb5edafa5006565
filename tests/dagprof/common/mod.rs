use std::sync::Once;
use std::time::Duration;

use anyhow::{anyhow, ensure, Result};
use dagprof::{register_op, AttrValue, NetDef, OpDef, Operator, Tensor, Workspace};

static REGISTER: Once = Once::new();

/// Make the scripted test operators available in the registry. Safe to call
/// from every test; registration happens once per process.
pub fn setup_ops() {
    REGISTER.call_once(|| {
        register_op("spin", make_spin);
        register_op("spin2", make_spin);
        register_op("slow_fail", make_slow_fail);
    });
}

struct SpinOp {
    ms: u64,
}

impl Operator for SpinOp {
    fn run(&self) -> Result<()> {
        std::thread::sleep(Duration::from_millis(self.ms));
        Ok(())
    }
}

fn make_spin(def: &OpDef, ws: &mut Workspace) -> Result<Box<dyn Operator>> {
    ensure!(def.outputs.len() == 1, "spin produces exactly one output");
    let ms = def.int_attr("ms").unwrap_or(1) as u64;
    ws.create(&def.outputs[0], Tensor::zeros(&[1], def.device));
    Ok(Box::new(SpinOp { ms }))
}

struct SlowFailOp {
    ms: u64,
}

impl Operator for SlowFailOp {
    fn run(&self) -> Result<()> {
        std::thread::sleep(Duration::from_millis(self.ms));
        Err(anyhow!("scripted failure"))
    }
}

fn make_slow_fail(def: &OpDef, ws: &mut Workspace) -> Result<Box<dyn Operator>> {
    ensure!(def.outputs.len() == 1, "slow_fail produces exactly one output");
    let ms = def.int_attr("ms").unwrap_or(1) as u64;
    ws.create(&def.outputs[0], Tensor::zeros(&[1], def.device));
    Ok(Box::new(SlowFailOp { ms }))
}

/// Node definition for a scripted operator that sleeps `ms` milliseconds.
pub fn timed_op(op_type: &str, output: &str, ms: i64) -> OpDef {
    OpDef::new(op_type)
        .with_outputs(&[output])
        .with_attr("ms", AttrValue::Int(ms))
}

/// Net of scripted operators: one `(op_type, output, ms)` triple per node.
pub fn timed_net(name: &str, nodes: &[(&str, &str, i64)]) -> NetDef {
    let mut def = NetDef::new(name);
    for (op_type, output, ms) in nodes {
        def.add_op(timed_op(op_type, output, *ms));
    }
    def
}

/// Read back a named tensor's values.
pub fn tensor_values(ws: &Workspace, name: &str) -> Result<Vec<f32>> {
    let tensor = ws.get(name)?;
    let guard = tensor
        .lock()
        .map_err(|_| anyhow!("tensor lock poisoned: {}", name))?;
    Ok(guard.data.clone())
}
