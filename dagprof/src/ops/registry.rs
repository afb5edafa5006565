use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;

use crate::graph::OpDef;
use crate::workspace::Workspace;

use super::{builtin, Operator};

/// Builds an operator instance from its definition, creating output tensors
/// in the workspace as needed.
pub type OpFactory = fn(&OpDef, &mut Workspace) -> Result<Box<dyn Operator>>;

static REGISTRY: Lazy<RwLock<HashMap<String, OpFactory>>> = Lazy::new(|| {
    let mut map: HashMap<String, OpFactory> = HashMap::new();
    map.insert("fill".to_string(), builtin::make_fill);
    map.insert("add".to_string(), builtin::make_add);
    map.insert("relu".to_string(), builtin::make_relu);
    map.insert("matmul".to_string(), builtin::make_matmul);
    RwLock::new(map)
});

/// Register an operator factory under a type name, replacing any previous
/// registration.
pub fn register_op(op_type: impl Into<String>, factory: OpFactory) {
    REGISTRY
        .write()
        .expect("op registry poisoned")
        .insert(op_type.into(), factory);
}

/// Instantiate the operator a definition names.
pub fn create_operator(def: &OpDef, ws: &mut Workspace) -> Result<Box<dyn Operator>> {
    let factory = {
        let registry = REGISTRY.read().expect("op registry poisoned");
        registry.get(&def.op_type).copied()
    };
    let factory = factory.ok_or_else(|| anyhow!("unregistered op type: {}", def.op_type))?;
    factory(def, ws)
}
