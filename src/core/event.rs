use crate::core::{ProcessId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    Admitted {
        process: ProcessId,
    },
    Dispatched {
        process: ProcessId,
    },
    // Running process lost the CPU to a more urgent one
    Preempted {
        process: ProcessId,
        by: ProcessId,
    },
    // Slice expired with work left; process went to the back of the queue
    Requeued {
        process: ProcessId,
    },
    Completed {
        process: ProcessId,
        at: Ticks,
    },
    // CPU handed to no process for `ticks` ticks before the next dispatch
    ContextSwitch {
        ticks: Ticks,
    },
    // CPU idle even after selection
    CpuIdle,
}
