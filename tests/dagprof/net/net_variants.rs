use anyhow::Result;
use dagprof::{AttrValue, ChainNet, Net, NetDef, OpDef, SimpleNet, Workspace};

use crate::common;

fn fill(output: &str, shape: &[i64], value: f64) -> OpDef {
    OpDef::new("fill")
        .with_outputs(&[output])
        .with_attr("shape", AttrValue::IntList(shape.to_vec()))
        .with_attr("value", AttrValue::Float(value))
}

#[test]
fn simple_net_executes_in_order() -> Result<()> {
    let mut ws = Workspace::new();
    let mut def = NetDef::new("arith");
    def.add_op(fill("x", &[2, 2], 3.0));
    def.add_op(fill("y", &[2, 2], -1.0));
    def.add_op(
        OpDef::new("add")
            .with_inputs(&["x", "y"])
            .with_outputs(&["z"]),
    );

    let mut net = SimpleNet::from_def(def, &mut ws)?;
    assert!(net.run()?);
    assert_eq!(common::tensor_values(&ws, "z")?, vec![2.0; 4]);
    Ok(())
}

#[test]
fn chain_net_diamond_dataflow() -> Result<()> {
    let mut ws = Workspace::new();
    let mut def = NetDef::new("diamond");
    def.add_op(fill("a", &[4], 1.5));
    def.add_op(fill("b", &[4], -2.0));
    def.add_op(
        OpDef::new("add")
            .with_inputs(&["a", "b"])
            .with_outputs(&["c"]),
    );
    def.add_op(
        OpDef::new("relu")
            .with_inputs(&["c"])
            .with_outputs(&["d"]),
    );

    let mut net = ChainNet::from_def(def, &mut ws)?;
    assert!(net.run()?);
    assert_eq!(common::tensor_values(&ws, "c")?, vec![-0.5; 4]);
    assert_eq!(common::tensor_values(&ws, "d")?, vec![0.0; 4]);

    // reruns reuse the same bindings
    assert!(net.run()?);
    assert_eq!(common::tensor_values(&ws, "d")?, vec![0.0; 4]);
    Ok(())
}

#[test]
fn matmul_of_constant_matrices() -> Result<()> {
    let mut ws = Workspace::new();
    let mut def = NetDef::new("mm");
    def.add_op(fill("a", &[2, 3], 2.0));
    def.add_op(fill("b", &[3, 2], 3.0));
    def.add_op(
        OpDef::new("matmul")
            .with_inputs(&["a", "b"])
            .with_outputs(&["c"]),
    );

    let mut net = SimpleNet::from_def(def, &mut ws)?;
    assert!(net.run()?);
    assert_eq!(common::tensor_values(&ws, "c")?, vec![18.0; 4]);
    Ok(())
}

#[test]
fn add_accepts_one_tensor_twice() -> Result<()> {
    let mut ws = Workspace::new();
    ws.create(
        "x",
        dagprof::Tensor::from_values(&[3], Default::default(), vec![1.0, -2.0, 4.0]),
    );
    let mut def = NetDef::new("double");
    def.add_op(
        OpDef::new("add")
            .with_inputs(&["x", "x"])
            .with_outputs(&["y"]),
    );

    let mut net = SimpleNet::from_def(def, &mut ws)?;
    assert!(net.run()?);
    assert_eq!(common::tensor_values(&ws, "y")?, vec![2.0, -4.0, 8.0]);
    Ok(())
}

#[test]
fn relu_of_externally_provided_values() -> Result<()> {
    let mut ws = Workspace::new();
    ws.create(
        "x",
        dagprof::Tensor::from_values(&[4], Default::default(), vec![-1.0, 0.0, 2.5, -3.0]),
    );
    let mut def = NetDef::new("act");
    def.add_op(
        OpDef::new("relu")
            .with_inputs(&["x"])
            .with_outputs(&["y"]),
    );

    let mut net = SimpleNet::from_def(def, &mut ws)?;
    assert!(net.run()?);
    assert_eq!(common::tensor_values(&ws, "y")?, vec![0.0, 0.0, 2.5, 0.0]);
    Ok(())
}

#[test]
fn aliasing_output_is_a_construction_error() {
    let mut ws = Workspace::new();
    ws.create("x", dagprof::Tensor::zeros(&[2], Default::default()));
    let mut def = NetDef::new("alias");
    def.add_op(
        OpDef::new("add")
            .with_inputs(&["x", "x"])
            .with_outputs(&["x"]),
    );

    let err = SimpleNet::from_def(def, &mut ws).unwrap_err();
    assert!(err.to_string().contains("aliases an input"));
}

#[test]
fn unregistered_type_is_a_construction_error() {
    let mut ws = Workspace::new();
    let mut def = NetDef::new("unknown");
    def.add_op(OpDef::new("transmogrify").with_outputs(&["y"]));

    let err = SimpleNet::from_def(def, &mut ws).unwrap_err();
    assert!(err.to_string().contains("transmogrify"));
}

#[test]
fn runtime_shape_mismatch_folds_to_failure() -> Result<()> {
    let mut ws = Workspace::new();
    let mut def = NetDef::new("mismatch");
    def.add_op(fill("x", &[2], 1.0));
    def.add_op(fill("y", &[3], 1.0));
    def.add_op(
        OpDef::new("add")
            .with_inputs(&["x", "y"])
            .with_outputs(&["z"]),
    );

    let mut net = SimpleNet::from_def(def, &mut ws)?;
    assert!(!net.run()?, "size mismatch is a recoverable failure");
    Ok(())
}
