pub mod driver;
pub mod job;
pub mod metrics;
pub mod report;
pub mod timeline;

use std::sync::atomic::AtomicBool;

use log::info;

pub use driver::{Sim, SimResult, Snapshots};
pub use job::{ProcessSpec, sample_workload};
pub use metrics::{Metrics, ProcessMetrics};
pub use report::SimReport;
pub use timeline::{Segment, Subject};

use crate::{
    error::SimError,
    scheduler::{
        Algorithm, FcfsScheduler, PriorityScheduler, RoundRobinScheduler, Scheduler,
        SjfScheduler, SrtScheduler,
    },
};

/// Run `algorithm` over `specs` to completion.
///
/// Every call works on its own copy of the process records, so the same
/// descriptors can be fed to several algorithms side by side.
pub fn simulate(algorithm: &Algorithm, specs: &[ProcessSpec]) -> Result<SimResult, SimError> {
    simulate_with(algorithm, specs, None)
}

/// `simulate`, abandoning the run once `cancel` is set.
pub fn simulate_cancellable(
    algorithm: &Algorithm,
    specs: &[ProcessSpec],
    cancel: &AtomicBool,
) -> Result<SimResult, SimError> {
    simulate_with(algorithm, specs, Some(cancel))
}

fn simulate_with(
    algorithm: &Algorithm,
    specs: &[ProcessSpec],
    cancel: Option<&AtomicBool>,
) -> Result<SimResult, SimError> {
    info!("simulating {algorithm} over {} processes", specs.len());

    let result = match *algorithm {
        Algorithm::Fcfs => finish(Sim::new(FcfsScheduler, specs)?, cancel),
        Algorithm::Sjf => finish(Sim::new(SjfScheduler, specs)?, cancel),
        Algorithm::Priority => finish(Sim::new(PriorityScheduler, specs)?, cancel),
        Algorithm::Srt => finish(Sim::new(SrtScheduler, specs)?, cancel),
        Algorithm::RoundRobin {
            quantum,
            context_switch,
        } => finish(
            Sim::new(RoundRobinScheduler::new(quantum, context_switch), specs)?,
            cancel,
        ),
    }?;

    info!(
        "{algorithm}: makespan {}, avg waiting {:.2}, avg turnaround {:.2}",
        result.metrics.makespan, result.metrics.avg_waiting, result.metrics.avg_turnaround
    );
    Ok(result)
}

fn finish<S: Scheduler>(
    sim: Sim<S>,
    cancel: Option<&AtomicBool>,
) -> Result<SimResult, SimError> {
    match cancel {
        Some(flag) => sim.run_cancellable(flag),
        None => Ok(sim.run()),
    }
}
