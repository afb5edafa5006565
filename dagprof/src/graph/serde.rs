use anyhow::Result;
use serde_json::Value;

use crate::graph::NetDef;

pub struct NetSerialize;

impl NetSerialize {
    pub fn json(def: &NetDef) -> Result<Value> {
        Ok(serde_json::to_value(def)?)
    }
}

pub struct NetDeserialize;

impl NetDeserialize {
    pub fn from_json(value: Value) -> Result<NetDef> {
        Ok(serde_json::from_value(value)?)
    }
}
