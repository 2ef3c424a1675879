use crate::core::{ProcessId, Snapshot, TickSpan, Ticks};

pub const IDLE_LABEL: &str = "idle";
pub const CONTEXT_SWITCH_LABEL: &str = "context-switch";

// Short forms used in the text Gantt bar
pub const IDLE_MARK: &str = "--";
pub const CONTEXT_SWITCH_MARK: &str = "CS";

/// Names a process may not take. Besides the non-process subjects this
/// covers the run-wide fields that share a JSON object with per-process
/// metrics in a report.
pub const RESERVED_LABELS: &[&str] = &[
    IDLE_LABEL,
    CONTEXT_SWITCH_LABEL,
    IDLE_MARK,
    CONTEXT_SWITCH_MARK,
    "avg_waiting",
    "avg_turnaround",
    "avg_response",
    "makespan",
    "busy_time",
    "cpu_utilization",
    "throughput",
    "context_switches",
    "preemptions",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Process(ProcessId),
    Idle,
    ContextSwitch,
}

/// Contiguous span `[start, end)` during which one subject held the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub subject: Subject,
    pub start: Ticks,
    pub end: Ticks,
}

impl Segment {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Merge per-tick snapshots into the minimal list of segments. Ticks where no
/// process runs are attributed to a context switch when they fall inside one
/// of `switches`, and to idle otherwise.
pub fn build_segments(snapshots: &[Snapshot], switches: &[TickSpan]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut switches = switches.iter().peekable();

    for snapshot in snapshots {
        let tick = snapshot.tick;
        while switches.next_if(|span| span.end <= tick).is_some() {}

        let subject = match snapshot.running {
            Some(id) => Subject::Process(id),
            None if switches.peek().is_some_and(|span| span.start <= tick) => {
                Subject::ContextSwitch
            }
            None => Subject::Idle,
        };

        match segments.last_mut() {
            Some(last) if last.subject == subject && last.end == tick => last.end = tick + 1,
            _ => segments.push(Segment {
                subject,
                start: tick,
                end: tick + 1,
            }),
        }
    }

    debug_assert!(
        segments.windows(2).all(|w| w[0].end <= w[1].start),
        "Segments overlap or are out of order"
    );
    segments
}
