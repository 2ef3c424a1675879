use super::{ProcessId, ReadyQueue, Scheduler, SimCtx};
use crate::core::Urgency;

// Lower value is more urgent
pub struct PriorityScheduler;

impl Scheduler for PriorityScheduler {
    const NAME: &'static str = "PRIORITY";

    fn ready_queue(&self) -> ReadyQueue {
        ReadyQueue::new_priq()
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId) {
        let p = ctx.process(process);
        let urgency = Urgency::of(p, p.priority);
        ctx.ready_push_priq(process, urgency);
    }
}
