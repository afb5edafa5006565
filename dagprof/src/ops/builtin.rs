//! Builtin operators: enough coverage to assemble small nets for demos and
//! tests. Each factory validates its definition, resolves input handles and
//! creates its output tensor in the workspace up front, so `run` touches no
//! name tables.
use std::sync::MutexGuard;

use anyhow::{anyhow, ensure, Result};

use crate::graph::OpDef;
use crate::tensor::{SharedTensor, Tensor};
use crate::workspace::Workspace;

use super::Operator;

fn lock<'a>(tensor: &'a SharedTensor, name: &str) -> Result<MutexGuard<'a, Tensor>> {
    tensor
        .lock()
        .map_err(|_| anyhow!("tensor lock poisoned: {}", name))
}

fn shape_of(tensor: &SharedTensor, name: &str) -> Result<Vec<usize>> {
    Ok(lock(tensor, name)?.shape.clone())
}

fn ensure_distinct_output(def: &OpDef) -> Result<()> {
    // in-place aliasing would deadlock the per-tensor locks
    for output in &def.outputs {
        ensure!(
            !def.inputs.contains(output),
            "{} output {} aliases an input",
            def.op_type,
            output
        );
    }
    Ok(())
}

struct FillOp {
    output_name: String,
    output: SharedTensor,
    value: f32,
}

impl Operator for FillOp {
    fn run(&self) -> Result<()> {
        let mut out = lock(&self.output, &self.output_name)?;
        for slot in out.data.iter_mut() {
            *slot = self.value;
        }
        Ok(())
    }
}

pub(super) fn make_fill(def: &OpDef, ws: &mut Workspace) -> Result<Box<dyn Operator>> {
    ensure!(def.inputs.is_empty(), "fill takes no inputs");
    ensure!(def.outputs.len() == 1, "fill produces exactly one output");
    let dims = def
        .int_list_attr("shape")
        .ok_or_else(|| anyhow!("fill requires a shape attribute"))?;
    let shape = dims.iter().map(|dim| *dim as usize).collect::<Vec<_>>();
    let value = def.float_attr("value").unwrap_or(0.0) as f32;
    let output_name = def.outputs[0].clone();
    let output = ws.create(&output_name, Tensor::zeros(&shape, def.device));
    Ok(Box::new(FillOp {
        output_name,
        output,
        value,
    }))
}

struct AddOp {
    lhs: SharedTensor,
    rhs: SharedTensor,
    output_name: String,
    output: SharedTensor,
}

impl Operator for AddOp {
    fn run(&self) -> Result<()> {
        // copy the first input out before locking the second: both may be
        // the same tensor (x + x), and the per-tensor locks are not
        // reentrant
        let lhs = lock(&self.lhs, "lhs")?.data.clone();
        let rhs = lock(&self.rhs, "rhs")?;
        let mut out = lock(&self.output, &self.output_name)?;
        ensure!(
            lhs.len() == rhs.len() && lhs.len() == out.len(),
            "add size mismatch: {} vs {} vs {}",
            lhs.len(),
            rhs.len(),
            out.len()
        );
        for (slot, (a, b)) in out.data.iter_mut().zip(lhs.iter().zip(rhs.data.iter())) {
            *slot = a + b;
        }
        Ok(())
    }
}

pub(super) fn make_add(def: &OpDef, ws: &mut Workspace) -> Result<Box<dyn Operator>> {
    ensure!(def.inputs.len() == 2, "add takes exactly two inputs");
    ensure!(def.outputs.len() == 1, "add produces exactly one output");
    ensure_distinct_output(def)?;
    let lhs = ws.get(&def.inputs[0])?;
    let rhs = ws.get(&def.inputs[1])?;
    let shape = shape_of(&lhs, &def.inputs[0])?;
    let output_name = def.outputs[0].clone();
    let output = ws.create(&output_name, Tensor::zeros(&shape, def.device));
    Ok(Box::new(AddOp {
        lhs,
        rhs,
        output_name,
        output,
    }))
}

struct ReluOp {
    input: SharedTensor,
    output_name: String,
    output: SharedTensor,
}

impl Operator for ReluOp {
    fn run(&self) -> Result<()> {
        let input = lock(&self.input, "input")?;
        let mut out = lock(&self.output, &self.output_name)?;
        ensure!(
            input.len() == out.len(),
            "relu size mismatch: {} vs {}",
            input.len(),
            out.len()
        );
        for (slot, value) in out.data.iter_mut().zip(input.data.iter()) {
            *slot = value.max(0.0);
        }
        Ok(())
    }
}

pub(super) fn make_relu(def: &OpDef, ws: &mut Workspace) -> Result<Box<dyn Operator>> {
    ensure!(def.inputs.len() == 1, "relu takes exactly one input");
    ensure!(def.outputs.len() == 1, "relu produces exactly one output");
    ensure_distinct_output(def)?;
    let input = ws.get(&def.inputs[0])?;
    let shape = shape_of(&input, &def.inputs[0])?;
    let output_name = def.outputs[0].clone();
    let output = ws.create(&output_name, Tensor::zeros(&shape, def.device));
    Ok(Box::new(ReluOp {
        input,
        output_name,
        output,
    }))
}

struct MatmulOp {
    lhs: SharedTensor,
    rhs: SharedTensor,
    output_name: String,
    output: SharedTensor,
    rows: usize,
    inner: usize,
    cols: usize,
}

impl Operator for MatmulOp {
    fn run(&self) -> Result<()> {
        // same aliasing caveat as add: lhs and rhs may be one tensor
        let lhs = lock(&self.lhs, "lhs")?.data.clone();
        let rhs = lock(&self.rhs, "rhs")?;
        let mut out = lock(&self.output, &self.output_name)?;
        ensure!(
            lhs.len() == self.rows * self.inner
                && rhs.len() == self.inner * self.cols
                && out.len() == self.rows * self.cols,
            "matmul size mismatch for output {}",
            self.output_name
        );
        for row in 0..self.rows {
            for col in 0..self.cols {
                let mut acc = 0.0;
                for k in 0..self.inner {
                    acc += lhs[row * self.inner + k] * rhs.data[k * self.cols + col];
                }
                out.data[row * self.cols + col] = acc;
            }
        }
        Ok(())
    }
}

pub(super) fn make_matmul(def: &OpDef, ws: &mut Workspace) -> Result<Box<dyn Operator>> {
    ensure!(def.inputs.len() == 2, "matmul takes exactly two inputs");
    ensure!(def.outputs.len() == 1, "matmul produces exactly one output");
    ensure_distinct_output(def)?;
    let lhs = ws.get(&def.inputs[0])?;
    let rhs = ws.get(&def.inputs[1])?;
    let lhs_shape = shape_of(&lhs, &def.inputs[0])?;
    let rhs_shape = shape_of(&rhs, &def.inputs[1])?;
    ensure!(
        lhs_shape.len() == 2 && rhs_shape.len() == 2,
        "matmul inputs must be 2-D, got {:?} and {:?}",
        lhs_shape,
        rhs_shape
    );
    ensure!(
        lhs_shape[1] == rhs_shape[0],
        "matmul inner dims differ: {} vs {}",
        lhs_shape[1],
        rhs_shape[0]
    );
    let (rows, inner, cols) = (lhs_shape[0], lhs_shape[1], rhs_shape[1]);
    let output_name = def.outputs[0].clone();
    let output = ws.create(&output_name, Tensor::zeros(&[rows, cols], def.device));
    Ok(Box::new(MatmulOp {
        lhs,
        rhs,
        output_name,
        output,
        rows,
        inner,
        cols,
    }))
}
