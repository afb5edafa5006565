//! Profile a small net over repeated runs and print the aggregated
//! statistics.
//!
//! ```sh
//! DAGPROF_TRACE=1 cargo run --example profile_net
//! ```
use anyhow::Result;
use dagprof::{AttrValue, Net, NetDef, OpDef, TimedNet, Workspace};

fn main() -> Result<()> {
    let mut def = NetDef::new("demo");
    def.add_op(
        OpDef::new("fill")
            .with_outputs(&["x"])
            .with_attr("shape", AttrValue::IntList(vec![64, 128]))
            .with_attr("value", AttrValue::Float(0.25)),
    );
    def.add_op(
        OpDef::new("fill")
            .with_outputs(&["w"])
            .with_attr("shape", AttrValue::IntList(vec![128, 64]))
            .with_attr("value", AttrValue::Float(-0.5)),
    );
    def.add_op(
        OpDef::new("matmul")
            .named("projection")
            .with_inputs(&["x", "w"])
            .with_outputs(&["h"]),
    );
    def.add_op(
        OpDef::new("relu")
            .with_inputs(&["h"])
            .with_outputs(&["out"]),
    );

    let mut ws = Workspace::new();
    let mut net = TimedNet::from_def(def, &mut ws)?;

    // first run is the discarded warm-up
    for _ in 0..6 {
        net.run()?;
    }

    println!("per-type stats:");
    println!("{}", serde_json::to_string_pretty(&net.operator_type_stats()?)?);
    println!("per-operator cost:");
    println!("{}", serde_json::to_string_pretty(&net.per_operator_cost()?)?);
    Ok(())
}
