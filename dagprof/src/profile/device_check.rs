use crate::graph::{Device, OpDef};
use crate::tensor::SharedTensor;

/// A tensor whose actual placement differs from what its operator expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMismatch {
    pub op_index: usize,
    pub op_type: String,
    pub tensor: String,
    pub expected: Device,
    pub actual: Device,
}

/// Advisory check of operator/tensor device placement.
///
/// For every operator and every tensor it consumes or produces, compares
/// the tensor's live placement against the device the definition expects.
/// Emits one diagnostic per mismatch, or a single confirmation when there
/// are none, and returns the mismatch list. Never fails a run.
pub fn validate_op_tensor_devices(
    defs: &[OpDef],
    bindings: &[Vec<(String, SharedTensor)>],
) -> Vec<DeviceMismatch> {
    let mut mismatches = Vec::new();
    for (idx, def) in defs.iter().enumerate() {
        for (name, tensor) in &bindings[idx] {
            let Ok(guard) = tensor.lock() else {
                continue;
            };
            let actual = guard.device;
            if actual != def.device {
                crate::log!(
                    "performance warning: operator {} expects {} but tensor [{}] is on {}",
                    def.op_type,
                    def.device,
                    name,
                    actual
                );
                mismatches.push(DeviceMismatch {
                    op_index: idx,
                    op_type: def.op_type.clone(),
                    tensor: name.clone(),
                    expected: def.device,
                    actual,
                });
            }
        }
    }
    if mismatches.is_empty() {
        crate::log!("analyzed operator and tensor device assignments -- no mismatches");
    }
    mismatches
}
