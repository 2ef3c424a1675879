use super::{
    event::SchedEvent,
    state::{ProcessState, SimCtx, Ticks},
};

/// Per-tick invariant checks plus the counters the metrics pass needs.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    busy_ticks: Ticks,
    context_switches: u64,
    preemptions: u64,
    requeues: u64,
    // Remaining work summed over all processes after the previous tick
    outstanding: Ticks,
}

impl Observer {
    pub fn new(ctx: &SimCtx) -> Self {
        Self {
            outstanding: ctx.processes.iter().map(|p| p.remaining).sum(),
            ..Self::default()
        }
    }

    pub fn observe(&mut self, ctx: &SimCtx, events: &[SchedEvent]) {
        self.step += 1;

        for event in events {
            match event {
                SchedEvent::ContextSwitch { .. } => self.context_switches += 1,
                SchedEvent::Preempted { .. } => self.preemptions += 1,
                SchedEvent::Requeued { .. } => self.requeues += 1,
                _ => {}
            }
        }

        let outstanding: Ticks = ctx.processes.iter().map(|p| p.remaining).sum();
        let previous = self.outstanding;
        debug_assert!(
            outstanding <= previous,
            "Remaining work grew from {previous} to {outstanding}"
        );
        debug_assert!(
            previous - outstanding <= 1,
            "More than one tick of work executed in a single tick"
        );
        self.busy_ticks += previous.saturating_sub(outstanding);
        self.outstanding = outstanding;

        if let Some(id) = ctx.running {
            let process = ctx.process(id);
            debug_assert_eq!(
                process.state,
                ProcessState::Running,
                "CPU owner {id} must be Running"
            );
            debug_assert!(process.remaining > 0, "CPU owner {id} has no work left");
            debug_assert_eq!(
                ctx.switch_remaining, 0,
                "Process {id} holds the CPU during a context switch"
            );
        }

        for process in &ctx.processes {
            let id = process.id;
            debug_assert!(
                process.start_time.is_none_or(|start| start >= process.arrival),
                "Process {id} started before it arrived"
            );
            match process.state {
                ProcessState::Completed => {
                    debug_assert!(
                        process
                            .finish_time
                            .is_some_and(|finish| finish > process.arrival),
                        "Process {id} must finish after it arrives"
                    );
                }
                ProcessState::Running => {
                    debug_assert_eq!(ctx.running, Some(id), "Process {id} Running off-CPU");
                }
                _ => {}
            }
        }

        for &id in &ctx.queued {
            let process = ctx.process(id);
            debug_assert_eq!(
                process.state,
                ProcessState::Ready,
                "Queued process {id} must be Ready"
            );
            debug_assert!(
                ctx.ready.contains(id),
                "Process {id} marked queued, but the ready set does not contain it"
            );
        }
        debug_assert_eq!(
            ctx.queued.len(),
            ctx.ready.len(),
            "Ready set and membership map disagree"
        );
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn busy_ticks(&self) -> Ticks {
        self.busy_ticks
    }

    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    pub fn preemptions(&self) -> u64 {
        self.preemptions
    }

    pub fn requeues(&self) -> u64 {
        self.requeues
    }
}
