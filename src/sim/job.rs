use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    core::state::{Process, Ticks},
    error::SimError,
    sim::timeline::RESERVED_LABELS,
};

/// Input descriptor for one process, as supplied by a caller or a config
/// file. Values are signed so that bad input can be rejected rather than
/// failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub arrival: i64,
    pub burst: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl ProcessSpec {
    pub const DEFAULT_PRIORITY: i64 = 0;

    pub fn new(arrival: i64, burst: i64) -> Self {
        Self {
            name: None,
            arrival,
            burst,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("P{}", index + 1))
    }
}

/// Turn descriptors into fresh process records, ids assigned in input order.
pub fn build_processes(specs: &[ProcessSpec]) -> Result<Vec<Process>, SimError> {
    let mut seen = FxHashSet::default();

    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let name = spec.label(index);
            if RESERVED_LABELS.contains(&name.as_str()) {
                return Err(SimError::ReservedName(name));
            }
            if !seen.insert(name.clone()) {
                return Err(SimError::DuplicateName(name));
            }
            if spec.arrival < 0 {
                return Err(SimError::NegativeArrival {
                    process: name,
                    arrival: spec.arrival,
                });
            }
            if spec.burst <= 0 {
                return Err(SimError::InvalidBurst {
                    process: name,
                    burst: spec.burst,
                });
            }

            Ok(Process::new(
                index,
                name,
                spec.arrival as Ticks,
                spec.burst as Ticks,
                spec.priority.unwrap_or(ProcessSpec::DEFAULT_PRIORITY),
            ))
        })
        .collect()
}

/// The four-process workload used by the CLI when no input is given.
pub fn sample_workload() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(0, 5).with_priority(2),
        ProcessSpec::new(1, 3).with_priority(1),
        ProcessSpec::new(2, 8).with_priority(3),
        ProcessSpec::new(3, 6).with_priority(2),
    ]
}
