use anyhow::Result;
use dagprof::{create_net, Net, TimedNet, Workspace};

use crate::common;

#[test]
fn warm_up_run_is_excluded() -> Result<()> {
    common::setup_ops();
    let mut ws = Workspace::new();
    let def = common::timed_net("warmup", &[("spin", "a", 1), ("spin", "b", 1)]);
    let mut net = TimedNet::from_def(def, &mut ws)?;

    assert!(net.run()?);
    assert_eq!(net.runs(), 1);
    assert_eq!(net.measured_runs(), 0);

    let type_err = net.operator_type_stats().unwrap_err();
    assert!(type_err.to_string().contains("insufficient runs"));
    let cost_err = net.per_operator_cost().unwrap_err();
    assert!(cost_err.to_string().contains("insufficient runs"));
    Ok(())
}

#[test]
fn measured_runs_accumulate_per_node_and_per_type() -> Result<()> {
    common::setup_ops();
    let mut ws = Workspace::new();
    let def = common::timed_net(
        "accum",
        &[("spin", "a", 2), ("spin", "b", 3), ("spin2", "c", 1)],
    );
    let mut net = TimedNet::from_def(def, &mut ws)?;

    for _ in 0..3 {
        assert!(net.run()?);
    }
    assert_eq!(net.measured_runs(), 2);

    // per-node: each slot holds exactly two samples, bounded below by the
    // scripted sleep (sleep never undersleeps)
    let cost = net.per_operator_cost()?;
    assert_eq!(cost.len(), 3);
    assert_eq!(cost[0].name, "accum___0___spin");
    assert_eq!(cost[1].name, "accum___1___spin");
    assert_eq!(cost[2].name, "accum___2___spin2");
    assert!(cost[0].mean >= 2.0, "mean {} below sleep floor", cost[0].mean);
    assert!(cost[1].mean >= 3.0, "mean {} below sleep floor", cost[1].mean);
    assert!(cost[2].mean >= 1.0, "mean {} below sleep floor", cost[2].mean);
    for record in &cost {
        assert!(record.stddev >= 0.0 && record.stddev.is_finite());
    }

    // per-type: "spin" groups two instances per run
    let stats = net.operator_type_stats()?;
    assert_eq!(stats.len(), 2);
    let spin = stats
        .iter()
        .find(|record| record.name == "spin")
        .expect("spin type present");
    assert!(spin.mean >= 5.0, "per-run type total below 2+3 ms floor");
    Ok(())
}

#[test]
fn repeated_types_get_distinct_composite_names() -> Result<()> {
    common::setup_ops();
    let mut ws = Workspace::new();
    let def = common::timed_net("twins", &[("spin", "a", 1), ("spin", "b", 1)]);
    let mut net = TimedNet::from_def(def, &mut ws)?;
    for _ in 0..2 {
        net.run()?;
    }

    let cost = net.per_operator_cost()?;
    assert_eq!(cost.len(), 2);
    assert_ne!(cost[0].name, cost[1].name);
    Ok(())
}

#[test]
fn invocation_counts_track_instances_per_measured_run() -> Result<()> {
    common::setup_ops();
    let mut ws = Workspace::new();
    let def = common::timed_net(
        "counts",
        &[("spin", "a", 1), ("spin", "b", 1), ("spin2", "c", 1)],
    );
    let mut net = TimedNet::from_def(def, &mut ws)?;
    for _ in 0..4 {
        net.run()?;
    }
    assert_eq!(net.measured_runs(), 3);

    // counts are exact: instances x measured runs, warm-up excluded
    let spin = net.type_timers().get("spin").expect("spin type present");
    assert_eq!(spin.cnt, 2 * 3);
    let spin2 = net.type_timers().get("spin2").expect("spin2 type present");
    assert_eq!(spin2.cnt, 3);

    let stats = net.operator_type_stats()?;
    let names: Vec<&str> = stats.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, ["spin", "spin2"]);
    Ok(())
}

#[test]
fn net_kind_selects_variant() -> Result<()> {
    common::setup_ops();
    let mut ws = Workspace::new();
    for kind in ["simple", "chain", "timed"] {
        let def = common::timed_net("bykind", &[("spin", "out", 1)]);
        let mut net = create_net(kind, def, &mut ws)?;
        assert!(net.run()?);
        assert!(net.run()?);
    }

    let def = common::timed_net("bykind", &[("spin", "out", 1)]);
    let err = create_net("dagger", def, &mut ws).unwrap_err();
    assert!(err.to_string().contains("unknown net kind"));
    Ok(())
}

#[test]
fn empty_net_profiles_cleanly() -> Result<()> {
    let mut ws = Workspace::new();
    let def = common::timed_net("empty", &[]);
    let mut net = TimedNet::from_def(def, &mut ws)?;
    assert!(net.run()?);
    assert!(net.run()?);
    assert_eq!(net.measured_runs(), 1);
    assert!(net.per_operator_cost()?.is_empty());
    assert!(net.operator_type_stats()?.is_empty());
    Ok(())
}
