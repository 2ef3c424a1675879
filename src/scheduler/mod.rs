pub mod fcfs;
pub mod priority;
pub mod rr;
pub mod sjf;
pub mod srt;

use std::{fmt, str::FromStr};

use crate::{
    core::{
        Ticks,
        state::{ProcessId, ReadyQueue, SimCtx},
    },
    error::SimError,
};
pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srt::SrtScheduler;

/// Selection policy plugged into the shared tick driver.
///
/// The driver owns admission, execution, completion and context-switch
/// accounting. A policy only decides how the ready set is ordered, what the
/// CPU runs next, whether the running process should give the CPU up
/// mid-slice, and how long a slice lasts.
pub trait Scheduler {
    const NAME: &'static str;

    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_fifo()
    }

    // Called on arrival, after a preemption and after a slice expires
    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId);

    fn pick_next(&mut self, ctx: &mut SimCtx) -> Option<ProcessId> {
        ctx.ready_pop()
    }

    // Evaluated at every tick boundary while a process holds the CPU
    fn should_preempt(&mut self, _ctx: &mut SimCtx, _running: ProcessId) -> bool {
        false
    }

    // None runs the process to completion
    fn slice(&self, _ctx: &SimCtx, _process: ProcessId) -> Option<Ticks> {
        None
    }

    fn context_switch_cost(&self) -> Ticks {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    Fcfs,
    Sjf,
    Priority,
    Srt,
    Rr,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 5] = [
        AlgorithmKind::Fcfs,
        AlgorithmKind::Sjf,
        AlgorithmKind::Priority,
        AlgorithmKind::Srt,
        AlgorithmKind::Rr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Fcfs => "FCFS",
            AlgorithmKind::Sjf => "SJF",
            AlgorithmKind::Priority => "PRIORITY",
            AlgorithmKind::Srt => "SRT",
            AlgorithmKind::Rr => "RR",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SimError::UnknownAlgorithm(name.to_owned()))
    }
}

/// A fully validated algorithm choice with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fcfs,
    Sjf,
    Priority,
    Srt,
    RoundRobin { quantum: Ticks, context_switch: Ticks },
}

impl Algorithm {
    /// Build an algorithm from loosely typed parameters. Round-Robin requires
    /// a positive quantum; the context switch cost defaults to 0. Parameters
    /// that the chosen algorithm does not use are ignored.
    pub fn from_parts(
        kind: AlgorithmKind,
        quantum: Option<i64>,
        context_switch: Option<i64>,
    ) -> Result<Self, SimError> {
        Ok(match kind {
            AlgorithmKind::Fcfs => Algorithm::Fcfs,
            AlgorithmKind::Sjf => Algorithm::Sjf,
            AlgorithmKind::Priority => Algorithm::Priority,
            AlgorithmKind::Srt => Algorithm::Srt,
            AlgorithmKind::Rr => {
                let quantum = quantum.ok_or(SimError::MissingQuantum)?;
                if quantum <= 0 {
                    return Err(SimError::InvalidQuantum(quantum));
                }
                let context_switch = context_switch.unwrap_or(0);
                if context_switch < 0 {
                    return Err(SimError::InvalidContextSwitch(context_switch));
                }
                Algorithm::RoundRobin {
                    quantum: quantum as Ticks,
                    context_switch: context_switch as Ticks,
                }
            }
        })
    }

    pub fn round_robin(quantum: i64, context_switch: i64) -> Result<Self, SimError> {
        Algorithm::from_parts(AlgorithmKind::Rr, Some(quantum), Some(context_switch))
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Algorithm::Fcfs => AlgorithmKind::Fcfs,
            Algorithm::Sjf => AlgorithmKind::Sjf,
            Algorithm::Priority => AlgorithmKind::Priority,
            Algorithm::Srt => AlgorithmKind::Srt,
            Algorithm::RoundRobin { .. } => AlgorithmKind::Rr,
        }
    }

    pub fn is_preemptive(&self) -> bool {
        matches!(self, Algorithm::Srt | Algorithm::RoundRobin { .. })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::RoundRobin {
                quantum,
                context_switch,
            } => write!(f, "RR (quantum={quantum}, context_switch={context_switch})"),
            other => write!(f, "{}", other.kind()),
        }
    }
}
