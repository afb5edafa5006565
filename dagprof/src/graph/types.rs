//! Net definition types.
//!
//! A `NetDef` is an ordered list of operator nodes; node index order is the
//! executable order and the index space every profiling table is keyed by.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Device placement for a tensor or an operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Cpu,
    Gpu(u32),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu(ordinal) => write!(f, "gpu:{}", ordinal),
        }
    }
}

/// Attribute value carried by an op definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    Float(f64),
    Int(i64),
    IntList(Vec<i64>),
    Str(String),
}

/// Named attribute for an op definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpAttr {
    pub name: String,
    pub value: AttrValue,
}

/// Definition of a single operator node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpDef {
    pub op_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub device: Device,
    #[serde(default)]
    pub attrs: Vec<OpAttr>,
}

impl OpDef {
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            name: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            device: Device::Cpu,
            attrs: Vec::new(),
        }
    }

    /// Set the optional instance name used as the display label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_outputs(mut self, outputs: &[&str]) -> Self {
        self.outputs = outputs.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn on_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.push(OpAttr {
            name: name.into(),
            value,
        });
        self
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.value)
    }

    pub fn float_attr(&self, name: &str) -> Option<f64> {
        match self.attr(name)? {
            AttrValue::Float(value) => Some(*value),
            AttrValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn int_attr(&self, name: &str) -> Option<i64> {
        match self.attr(name)? {
            AttrValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn int_list_attr(&self, name: &str) -> Option<&[i64]> {
        match self.attr(name)? {
            AttrValue::IntList(values) => Some(values),
            _ => None,
        }
    }
}

/// Ordered operator nodes making up one net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetDef {
    pub name: String,
    pub ops: Vec<OpDef>,
}

impl NetDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: Vec::new(),
        }
    }

    /// Append an op node, returning its index.
    pub fn add_op(&mut self, def: OpDef) -> usize {
        self.ops.push(def);
        self.ops.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.ops.len()
    }
}
