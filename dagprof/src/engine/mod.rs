//! Chain-dispatch engines a net delegates full runs to.
//!
//! The two traits form the capability seam between scheduling and
//! execution: an engine decides which chains run when (possibly
//! concurrently), and calls back into the wrapping net's runner for the
//! actual per-chain execution. Any engine satisfying `ChainEngine` can sit
//! under any net variant.
mod chains;

pub use chains::{ParallelChains, SerialChains};

use anyhow::Result;

/// Per-chain execution entry point supplied by the wrapping net.
///
/// `run_chain` executes the given node indices in order and returns the
/// non-short-circuit AND of every operator's success. Implementations must
/// be callable from sibling worker threads of the same run.
pub trait ChainRunner: Sync {
    fn run_chain(&self, chain: &[usize]) -> Result<bool>;
}

/// Full-run entry point.
///
/// One call dispatches every chain of exactly one run through the runner
/// and joins them all before returning, so the caller observes a stable
/// post-run state. Within a run, chains must partition node indices
/// disjointly.
pub trait ChainEngine: Send {
    fn run_full(&self, runner: &dyn ChainRunner) -> Result<bool>;
}
