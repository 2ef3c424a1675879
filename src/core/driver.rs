use log::{debug, trace};

use super::{
    event::SchedEvent,
    observer::Observer,
    state::{Boundary, ProcessId, SimCtx, Ticks},
};
use crate::scheduler::Scheduler;

/// Ready set and CPU owner as seen during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tick: Ticks,
    pub ready: Vec<ProcessId>,
    pub running: Option<ProcessId>,
}

/// Half-open tick range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSpan {
    pub start: Ticks,
    pub end: Ticks,
}

pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    history: Vec<Snapshot>,
    switches: Vec<TickSpan>,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(ctx: SimCtx, scheduler: S) -> Self {
        let observer = Observer::new(&ctx);
        Self {
            ctx,
            scheduler,
            history: Vec::new(),
            switches: Vec::new(),
            observer,
        }
    }

    pub fn admit(&mut self, process: ProcessId) -> SchedEvent {
        trace!("t={} admit {}", self.ctx.now, self.ctx.process(process).name);
        self.ctx.mark_ready(process);
        self.scheduler.enqueue(&mut self.ctx, process);
        SchedEvent::Admitted { process }
    }

    /// Simulate tick `now`. Arrivals for `now` must already be admitted.
    pub fn tick(&mut self) -> Vec<SchedEvent> {
        let mut events = Vec::new();

        self.settle_boundary(&mut events);

        if self.ctx.switch_remaining > 0 {
            self.tick_context_switch();
        } else {
            self.schedule_cpu(&mut events);
            self.tick_cpu(&mut events);
        }

        self.ctx.advance_time(1);
        self.observer.observe(&self.ctx, &events);
        events
    }

    // A slice that ended on the previous tick is resolved only now, so that
    // processes arriving exactly at the boundary are queued ahead of a
    // requeued process and count as "someone else to run".
    fn settle_boundary(&mut self, events: &mut Vec<SchedEvent>) {
        let Some((process, boundary)) = self.ctx.pending.take() else {
            return;
        };

        match boundary {
            Boundary::Completed => {
                if !self.ctx.ready.is_empty() {
                    self.begin_context_switch(events);
                }
            }
            Boundary::SliceExpired if self.ctx.ready.is_empty() => {
                // Nobody else is waiting: grant a fresh slice in place
                let slice = self.scheduler.slice(&self.ctx, process);
                let p = self.ctx.process_mut(process);
                p.allocated_slice = slice;
                p.consumed_slice = 0;
            }
            Boundary::SliceExpired => {
                debug!(
                    "t={} {} slice expired, requeued",
                    self.ctx.now,
                    self.ctx.process(process).name
                );
                self.ctx.clear_cpu();
                self.ctx.mark_ready(process);
                self.scheduler.enqueue(&mut self.ctx, process);
                events.push(SchedEvent::Requeued { process });
                self.begin_context_switch(events);
            }
        }
    }

    fn begin_context_switch(&mut self, events: &mut Vec<SchedEvent>) {
        let cost = self.scheduler.context_switch_cost();
        if cost == 0 {
            return;
        }

        debug!("t={} context switch for {cost} ticks", self.ctx.now);
        self.ctx.switch_remaining = cost;
        self.switches.push(TickSpan {
            start: self.ctx.now,
            end: self.ctx.now + cost,
        });
        events.push(SchedEvent::ContextSwitch { ticks: cost });
    }

    fn tick_context_switch(&mut self) {
        debug_assert!(self.ctx.cpu_is_idle(), "CPU must be free during a context switch");
        self.ctx.switch_remaining -= 1;
        self.record_snapshot();
    }

    fn schedule_cpu(&mut self, events: &mut Vec<SchedEvent>) {
        if let Some(current) = self.ctx.running {
            if !self.scheduler.should_preempt(&mut self.ctx, current) {
                return;
            }

            self.ctx.clear_cpu();
            self.ctx.mark_ready(current);
            self.scheduler.enqueue(&mut self.ctx, current);

            let next = self
                .scheduler
                .pick_next(&mut self.ctx)
                .expect("Preemption requires a queued candidate");
            debug_assert_ne!(next, current, "Process cannot preempt itself");
            debug!(
                "t={} {} preempted by {}",
                self.ctx.now,
                self.ctx.process(current).name,
                self.ctx.process(next).name
            );
            events.push(SchedEvent::Preempted {
                process: current,
                by: next,
            });
            self.dispatch(next, events);
            return;
        }

        if let Some(next) = self.scheduler.pick_next(&mut self.ctx) {
            self.dispatch(next, events);
        }
    }

    fn dispatch(&mut self, process: ProcessId, events: &mut Vec<SchedEvent>) {
        let slice = self.scheduler.slice(&self.ctx, process);
        self.ctx.set_running(process, slice);
        debug!(
            "t={} dispatch {} (slice {:?})",
            self.ctx.now,
            self.ctx.process(process).name,
            slice
        );
        events.push(SchedEvent::Dispatched { process });
    }

    fn tick_cpu(&mut self, events: &mut Vec<SchedEvent>) {
        self.record_snapshot();

        let Some(current) = self.ctx.running else {
            events.push(SchedEvent::CpuIdle);
            return;
        };

        let finished_at = self.ctx.now + 1;
        let (completed, slice_expired) = {
            let process = self.ctx.process_mut(current);
            debug_assert!(process.remaining > 0, "Completed process selected to run");
            process.remaining -= 1;
            process.consumed_slice += 1;
            (process.remaining == 0, process.slice_expired())
        };

        if completed {
            self.ctx.clear_cpu();
            self.ctx.mark_completed(current, finished_at);
            self.ctx.pending = Some((current, Boundary::Completed));
            debug!(
                "t={} {} completed",
                finished_at,
                self.ctx.process(current).name
            );
            events.push(SchedEvent::Completed {
                process: current,
                at: finished_at,
            });
        } else if slice_expired {
            self.ctx.pending = Some((current, Boundary::SliceExpired));
        }
    }

    fn record_snapshot(&mut self) {
        let snapshot = Snapshot {
            tick: self.ctx.now,
            ready: self.ctx.ready.ids(),
            running: self.ctx.running,
        };
        trace!("{snapshot:?}");
        self.history.push(snapshot);
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn into_parts(self) -> (SimCtx, Vec<Snapshot>, Vec<TickSpan>, Observer) {
        (self.ctx, self.history, self.switches, self.observer)
    }
}
