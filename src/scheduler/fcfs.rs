use super::{ProcessId, Scheduler, SimCtx};

/// Arrival order. Admission already happens in (arrival, id) order, so a
/// plain FIFO ready set is enough.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    const NAME: &'static str = "FCFS";

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId) {
        ctx.ready_push_back(process);
    }
}
