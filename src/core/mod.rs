pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::{SchedCore, Snapshot, TickSpan};
pub use event::SchedEvent;
pub use observer::Observer;
pub use state::{Process, ProcessId, ProcessState, ReadyQueue, SimCtx, Ticks, Urgency};
