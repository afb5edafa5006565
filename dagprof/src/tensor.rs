use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::graph::Device;

/// Flat `f32` tensor with a shape and a device placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub device: Device,
    pub data: Vec<f32>,
}

impl Tensor {
    /// Zero-filled tensor of the given shape.
    pub fn zeros(shape: &[usize], device: Device) -> Self {
        let len = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            device,
            data: vec![0.0; len],
        }
    }

    /// Tensor built from explicit values; the shape must cover them exactly.
    pub fn from_values(shape: &[usize], device: Device, data: Vec<f32>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self {
            shape: shape.to_vec(),
            device,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Tensor handle shared between operators and the workspace.
pub type SharedTensor = Arc<Mutex<Tensor>>;

/// Wrap a tensor in a shared handle.
pub fn shared(tensor: Tensor) -> SharedTensor {
    Arc::new(Mutex::new(tensor))
}
