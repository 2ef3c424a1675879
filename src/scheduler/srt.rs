use super::{ProcessId, ReadyQueue, Scheduler, SimCtx};
use crate::core::{Process, Urgency};

/// Shortest remaining time, re-evaluated every tick.
///
/// Ties on remaining time go to the earlier arrival, then the lower id. The
/// same ordering is applied to the running process, so a queued process
/// with equal remaining time but an earlier arrival takes the CPU.
pub struct SrtScheduler;

impl SrtScheduler {
    fn urgency(process: &Process) -> Urgency {
        Urgency::of(process, process.remaining as i64)
    }
}

impl Scheduler for SrtScheduler {
    const NAME: &'static str = "SRT";

    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_priq()
    }

    // Remaining time of a queued process cannot change while it waits, so the
    // key computed here stays valid until it is popped
    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId) {
        let urgency = Self::urgency(ctx.process(process));
        ctx.ready_push_priq(process, urgency);
    }

    fn should_preempt(&mut self, ctx: &mut SimCtx, running: ProcessId) -> bool {
        let current = Self::urgency(ctx.process(running));
        ctx.ready_peek_urgency()
            .is_some_and(|best| best.beats(&current))
    }
}
