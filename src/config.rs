use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::SimError,
    scheduler::{Algorithm, AlgorithmKind},
    sim::ProcessSpec,
};

/// One simulation request: which algorithm to run and over what workload.
///
/// ```toml
/// algorithm = "rr"
/// quantum = 2
/// context_switch = 1
///
/// [[process]]
/// arrival = 0
/// burst = 5
/// priority = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_switch: Option<i64>,
    #[serde(default, rename = "process", alias = "processes")]
    pub processes: Vec<ProcessSpec>,
}

impl SimConfig {
    pub const DEFAULT_ALGORITHM: AlgorithmKind = AlgorithmKind::Fcfs;

    /// Load from a `.json` file, or TOML for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn algorithm_kind(&self) -> Result<AlgorithmKind, SimError> {
        match &self.algorithm {
            Some(name) => name.parse(),
            None => Ok(Self::DEFAULT_ALGORITHM),
        }
    }

    pub fn algorithm(&self) -> Result<Algorithm, SimError> {
        Algorithm::from_parts(self.algorithm_kind()?, self.quantum, self.context_switch)
    }
}
