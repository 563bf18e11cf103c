// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Driver-facing annotations attached to create/copy requests.
///
/// Keys are kept in sorted order so serialized output is stable.
pub type Opts = BTreeMap<String, OptValue>;

/// A single opaque option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptValue {
    Bool(bool),
    Int(i64),
    /// Only integers beyond `i64::MAX` land here
    UInt(u64),
    Float(f64),
    String(String),
    List(Vec<OptValue>),
    Map(BTreeMap<String, OptValue>),
}

impl OptValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for OptValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for OptValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Self::Int(value),
            Err(_) => Self::UInt(value),
        }
    }
}

impl From<f64> for OptValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<OptValue>> for OptValue {
    fn from(value: Vec<OptValue>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, OptValue>> for OptValue {
    fn from(value: BTreeMap<String, OptValue>) -> Self {
        Self::Map(value)
    }
}
