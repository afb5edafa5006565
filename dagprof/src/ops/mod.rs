mod builtin;
mod registry;

pub use registry::{create_operator, register_op, OpFactory};

use anyhow::Result;

/// A runnable operator instance, bound to its workspace tensors at net
/// construction time.
///
/// Failures returned from `run` are recoverable: the executing net logs them
/// and folds them into the run's success flag instead of aborting the run.
pub trait Operator: Send + Sync {
    fn run(&self) -> Result<()>;
}
