use super::{ProcessId, Scheduler, SimCtx, Ticks};

pub struct RoundRobinScheduler {
    quantum: Ticks,
    context_switch: Ticks,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks, context_switch: Ticks) -> Self {
        assert!(quantum > 0, "Round-Robin requires a positive quantum");
        Self {
            quantum,
            context_switch,
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "RR";

    // Arrivals and requeued processes both join the tail
    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId) {
        ctx.ready_push_back(process);
    }

    fn slice(&self, ctx: &SimCtx, process: ProcessId) -> Option<Ticks> {
        Some(self.quantum.min(ctx.process(process).remaining))
    }

    fn context_switch_cost(&self) -> Ticks {
        self.context_switch
    }
}
