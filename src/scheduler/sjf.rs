use super::{ProcessId, ReadyQueue, Scheduler, SimCtx};
use crate::core::Urgency;

pub struct SjfScheduler;

impl Scheduler for SjfScheduler {
    const NAME: &'static str = "SJF";

    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_priq()
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId) {
        let p = ctx.process(process);
        let urgency = Urgency::of(p, p.burst as i64);
        ctx.ready_push_priq(process, urgency);
    }
}
