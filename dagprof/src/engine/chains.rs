use std::collections::HashMap;
use std::sync::mpsc;

use anyhow::{anyhow, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::graph::NetDef;

use super::{ChainEngine, ChainRunner};

/// Runs every node as one chain in definition order, on the caller's
/// thread.
pub struct SerialChains {
    order: Vec<usize>,
}

impl SerialChains {
    pub fn from_def(def: &NetDef) -> Self {
        Self {
            order: (0..def.ops.len()).collect(),
        }
    }
}

impl ChainEngine for SerialChains {
    fn run_full(&self, runner: &dyn ChainRunner) -> Result<bool> {
        runner.run_chain(&self.order)
    }
}

/// Partitions the net into dataflow chains and dispatches independent
/// chains of the same depth level concurrently on a thread pool.
///
/// The partition is derived once at construction from tensor names: node B
/// depends on node A when B consumes an output A produced earlier in
/// definition order. Chains are maximal single-producer/single-consumer
/// runs; levels order chains so every dependency sits in a strictly lower
/// level. All chains of a level join before the next level starts, and all
/// levels join before `run_full` returns.
pub struct ParallelChains {
    pool: ThreadPool,
    levels: Vec<Vec<Vec<usize>>>,
}

impl ParallelChains {
    pub fn from_def(def: &NetDef) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .build()
            .map_err(|err| anyhow!("failed to build chain threadpool: {}", err))?;
        Ok(Self {
            pool,
            levels: build_levels(def),
        })
    }

    /// The dispatch plan: levels of chains of node indices.
    pub fn plan(&self) -> &[Vec<Vec<usize>>] {
        &self.levels
    }
}

impl ChainEngine for ParallelChains {
    fn run_full(&self, runner: &dyn ChainRunner) -> Result<bool> {
        let mut success = true;
        for level in &self.levels {
            let (tx, rx) = mpsc::channel();
            self.pool.scope(move |scope| {
                for chain in level {
                    let tx = tx.clone();
                    scope.spawn(move |_| {
                        crate::trace!(
                            "chain.start nodes={:?} thread={:?}",
                            chain,
                            std::thread::current().id()
                        );
                        let _ = tx.send(runner.run_chain(chain));
                    });
                }
            });
            for result in rx {
                success &= result?;
            }
        }
        Ok(success)
    }
}

fn build_levels(def: &NetDef) -> Vec<Vec<Vec<usize>>> {
    let node_count = def.ops.len();

    // dependencies from tensor dataflow, walking in definition order so a
    // node only ever depends on earlier producers
    let mut producer: HashMap<&str, usize> = HashMap::new();
    let mut deps: Vec<Vec<usize>> = Vec::with_capacity(node_count);
    for (idx, op) in def.ops.iter().enumerate() {
        let mut node_deps = Vec::new();
        for input in &op.inputs {
            if let Some(&source) = producer.get(input.as_str()) {
                if !node_deps.contains(&source) {
                    node_deps.push(source);
                }
            }
        }
        deps.push(node_deps);
        for output in &op.outputs {
            producer.insert(output.as_str(), idx);
        }
    }

    let mut dependents = vec![0usize; node_count];
    for node_deps in &deps {
        for &dep in node_deps {
            dependents[dep] += 1;
        }
    }

    // collapse single-producer/single-consumer links into linear chains
    let mut successor = vec![None; node_count];
    let mut has_pred = vec![false; node_count];
    for idx in 0..node_count {
        if let [dep] = deps[idx][..] {
            if dependents[dep] == 1 {
                successor[dep] = Some(idx);
                has_pred[idx] = true;
            }
        }
    }

    let mut chain_of = vec![0usize; node_count];
    let mut chains: Vec<Vec<usize>> = Vec::new();
    for head in 0..node_count {
        if has_pred[head] {
            continue;
        }
        let mut chain = Vec::new();
        let mut cursor = Some(head);
        while let Some(idx) = cursor {
            chain_of[idx] = chains.len();
            chain.push(idx);
            cursor = successor[idx];
        }
        chains.push(chain);
    }

    // order chains into levels so every dependency chain sits strictly lower
    let mut chain_level = vec![0usize; chains.len()];
    for (idx, node_deps) in deps.iter().enumerate() {
        for &dep in node_deps {
            if chain_of[dep] != chain_of[idx] {
                let needed = chain_level[chain_of[dep]] + 1;
                if chain_level[chain_of[idx]] < needed {
                    chain_level[chain_of[idx]] = needed;
                }
            }
        }
    }

    let depth = chain_level.iter().map(|level| level + 1).max().unwrap_or(0);
    let mut levels = vec![Vec::new(); depth];
    for (chain_idx, chain) in chains.into_iter().enumerate() {
        levels[chain_level[chain_idx]].push(chain);
    }
    levels
}
