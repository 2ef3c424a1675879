pub mod config;
pub mod core;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod sim;
pub mod workload;

pub use config::SimConfig;
pub use crate::core::{SchedEvent, Snapshot};
pub use error::SimError;
pub use scheduler::{Algorithm, AlgorithmKind, Scheduler};
pub use sim::{ProcessSpec, Sim, SimReport, SimResult, simulate, simulate_cancellable};
