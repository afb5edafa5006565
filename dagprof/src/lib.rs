//! Statistical per-operator profiling for chain-dispatched operator nets.
//!
//! A net definition is an ordered list of operator nodes. A chain engine
//! dispatches disjoint chains of node indices per run; the timed net
//! variant wraps that dispatch, times every operator after a discarded
//! warm-up run, and aggregates per-node and per-operator-type mean/stddev
//! across runs.
mod engine;
mod graph;
#[path = "graph/serde.rs"]
mod graph_serde;
pub mod logging;
mod net;
mod ops;
mod profile;
mod tensor;
mod workspace;

pub use engine::{ChainEngine, ChainRunner, ParallelChains, SerialChains};
pub use graph::{describe_op, display_label, AttrValue, Device, NetDef, OpAttr, OpDef};
pub use graph_serde::{NetDeserialize, NetSerialize};
pub use net::{create_net, ChainNet, Net, SimpleNet, TimedNet};
pub use ops::{create_operator, register_op, OpFactory, Operator};
pub use profile::{
    validate_op_tensor_devices, DeviceMismatch, OpStat, OpTimers, TimingStat, TypeTimers,
};
pub use tensor::{shared, SharedTensor, Tensor};
pub use workspace::Workspace;
