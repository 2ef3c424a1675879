use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use super::{
    job::{ProcessSpec, build_processes},
    metrics::{Metrics, RunStats},
    timeline::{Segment, build_segments},
};
use crate::{
    core::{
        driver::{SchedCore, Snapshot},
        event::SchedEvent,
        state::{Process, ProcessId, SimCtx},
    },
    error::SimError,
    scheduler::Scheduler,
};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimResult {
    // Indexed by ProcessId, start/finish populated
    pub processes: Vec<Process>,
    pub segments: Vec<Segment>,
    pub snapshots: Vec<Snapshot>,
    pub metrics: Metrics,
}

impl SimResult {
    pub fn name(&self, id: ProcessId) -> &str {
        &self.processes[id].name
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Process ids in (arrival, id) order
    arrivals: Vec<ProcessId>,
    arrival_cursor: usize,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(scheduler: S, specs: &[ProcessSpec]) -> Result<Self, SimError> {
        let processes = build_processes(specs)?;

        let mut arrivals: Vec<ProcessId> = (0..processes.len()).collect();
        arrivals.sort_by(|&a, &b| {
            processes[a]
                .arrival
                .cmp(&processes[b].arrival)
                .then_with(|| a.cmp(&b))
        });

        let ctx = SimCtx::new(processes, scheduler.ready_queue());
        Ok(Self {
            core: SchedCore::new(ctx, scheduler),
            arrivals,
            arrival_cursor: 0,
        })
    }

    /// Advance one tick: admit arrivals, then let the core select and run.
    pub fn step(&mut self) -> Vec<SchedEvent> {
        let mut events = self.handle_arrivals();
        events.extend(self.core.tick());
        events
    }

    fn handle_arrivals(&mut self) -> Vec<SchedEvent> {
        let now = self.core.now();
        let mut events = Vec::new();

        // Contiguous, since arrivals are sorted
        while let Some(&id) = self.arrivals.get(self.arrival_cursor) {
            if self.core.ctx.process(id).arrival > now {
                break;
            }
            events.push(self.core.admit(id));
            self.arrival_cursor += 1;
        }

        events
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.ctx.all_completed()
    }

    pub fn run(mut self) -> SimResult {
        while !self.all_processes_completed() {
            self.step();
        }
        self.finish()
    }

    /// Like `run`, but checks `cancel` once per tick and abandons the run
    /// when it is set.
    pub fn run_cancellable(mut self, cancel: &AtomicBool) -> Result<SimResult, SimError> {
        while !self.all_processes_completed() {
            if cancel.load(Ordering::Relaxed) {
                return Err(SimError::Cancelled {
                    at: self.core.now(),
                });
            }
            self.step();
        }
        Ok(self.finish())
    }

    /// Finite iterator yielding one snapshot per simulated tick.
    pub fn snapshots(self) -> Snapshots<S> {
        Snapshots { sim: self }
    }

    fn finish(self) -> SimResult {
        let (ctx, snapshots, switches, observer) = self.core.into_parts();
        let segments = build_segments(&snapshots, &switches);
        let stats = RunStats {
            busy_time: observer.busy_ticks(),
            context_switches: observer.context_switches(),
            preemptions: observer.preemptions() + observer.requeues(),
        };
        let metrics = Metrics::compute(&ctx.processes, stats);

        debug!(
            "{}: {} ticks, {} segments, makespan {}",
            S::NAME,
            observer.steps(),
            segments.len(),
            metrics.makespan
        );

        SimResult {
            processes: ctx.processes,
            segments,
            snapshots,
            metrics,
        }
    }
}

pub struct Snapshots<S: Scheduler> {
    sim: Sim<S>,
}

impl<S: Scheduler> Iterator for Snapshots<S> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.sim.all_processes_completed() {
            return None;
        }
        self.sim.step();
        self.sim.core.history().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FcfsScheduler, RoundRobinScheduler, SrtScheduler};

    #[test]
    fn step_reports_admission_and_dispatch() {
        let specs = [ProcessSpec::new(0, 2), ProcessSpec::new(1, 1)];
        let mut sim = Sim::new(FcfsScheduler, &specs).unwrap();

        let events = sim.step();
        assert_eq!(
            events,
            vec![
                SchedEvent::Admitted { process: 0 },
                SchedEvent::Dispatched { process: 0 },
            ]
        );

        let events = sim.step();
        assert_eq!(
            events,
            vec![
                SchedEvent::Admitted { process: 1 },
                SchedEvent::Completed { process: 0, at: 2 },
            ]
        );
        assert!(!sim.all_processes_completed());

        sim.step();
        assert!(sim.all_processes_completed());
    }

    #[test]
    fn srt_step_reports_preemption() {
        let specs = [ProcessSpec::new(0, 8), ProcessSpec::new(1, 4)];
        let mut sim = Sim::new(SrtScheduler, &specs).unwrap();

        sim.step();
        let events = sim.step();
        assert!(events.contains(&SchedEvent::Preempted { process: 0, by: 1 }));
        assert_eq!(sim.core.ctx.running, Some(1));
    }

    #[test]
    fn snapshots_iterator_is_finite_and_restartable() {
        let specs = [ProcessSpec::new(0, 3), ProcessSpec::new(1, 2)];

        let first: Vec<_> = Sim::new(RoundRobinScheduler::new(2, 1), &specs)
            .unwrap()
            .snapshots()
            .collect();
        let second: Vec<_> = Sim::new(RoundRobinScheduler::new(2, 1), &specs)
            .unwrap()
            .snapshots()
            .collect();
        let eager = Sim::new(RoundRobinScheduler::new(2, 1), &specs)
            .unwrap()
            .run();

        assert_eq!(first, second);
        assert_eq!(first, eager.snapshots);
        assert!(first.iter().enumerate().all(|(i, s)| s.tick == i as u64));
    }

    #[test]
    fn cancelled_run_reports_tick() {
        let cancel = AtomicBool::new(true);
        let sim = Sim::new(FcfsScheduler, &[ProcessSpec::new(0, 3)]).unwrap();
        assert!(matches!(
            sim.run_cancellable(&cancel),
            Err(SimError::Cancelled { at: 0 })
        ));
    }

    #[test]
    fn empty_input_finishes_immediately() {
        let result = Sim::new(FcfsScheduler, &[]).unwrap().run();
        assert!(result.segments.is_empty());
        assert!(result.snapshots.is_empty());
        assert_eq!(result.metrics.avg_waiting, 0.0);
    }
}
