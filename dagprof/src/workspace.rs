use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::graph::Device;
use crate::tensor::{shared, SharedTensor, Tensor};

/// Process-local table of named tensors that nets are constructed against.
/// The workspace outlives the nets built on it.
#[derive(Default)]
pub struct Workspace {
    tensors: HashMap<String, SharedTensor>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tensor under a name, replacing any previous binding, and
    /// return the shared handle.
    pub fn create(&mut self, name: impl Into<String>, tensor: Tensor) -> SharedTensor {
        let handle = shared(tensor);
        self.tensors.insert(name.into(), handle.clone());
        handle
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tensors.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<SharedTensor> {
        self.tensors
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("unknown tensor: {}", name))
    }

    /// Current device placement of a named tensor.
    pub fn device_of(&self, name: &str) -> Result<Device> {
        let tensor = self.get(name)?;
        let guard = tensor
            .lock()
            .map_err(|_| anyhow!("tensor lock poisoned: {}", name))?;
        Ok(guard.device)
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }
}
