#[path = "common/mod.rs"]
mod common;

#[path = "prof/stats_basic.rs"]
mod stats_basic;
#[path = "prof/timers_tables.rs"]
mod timers_tables;
#[path = "prof/run_aggregation.rs"]
mod run_aggregation;
#[path = "prof/failure_fold.rs"]
mod failure_fold;
#[path = "prof/device_check.rs"]
mod device_check;

#[path = "net/net_variants.rs"]
mod net_variants;
#[path = "net/chain_plan.rs"]
mod chain_plan;

#[path = "graph/net_serde.rs"]
mod net_serde;
