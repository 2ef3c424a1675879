use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashSet;
use std::{cmp::Ordering, collections::VecDeque};

// Index into Process Vec, assigned in input order
pub type ProcessId = usize;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Unarrived,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: ProcessId,
    pub name: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: i64,
    pub state: ProcessState,
    pub remaining: Ticks,
    pub start_time: Option<Ticks>,
    pub finish_time: Option<Ticks>,
    pub allocated_slice: Option<Ticks>,
    pub consumed_slice: Ticks,
}

impl Process {
    pub fn new(id: ProcessId, name: String, arrival: Ticks, burst: Ticks, priority: i64) -> Self {
        Self {
            id,
            name,
            arrival,
            burst,
            priority,
            state: ProcessState::Unarrived,
            remaining: burst,
            start_time: None,
            finish_time: None,
            allocated_slice: None,
            consumed_slice: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == ProcessState::Completed
    }

    pub fn slice_expired(&self) -> bool {
        self.allocated_slice
            .is_some_and(|slice| self.consumed_slice >= slice)
    }
}

/// Ordering key for priority-ordered ready sets: smallest `key`, then
/// earliest arrival, then lowest id wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Urgency {
    pub key: i64,
    pub arrival: Ticks,
    pub id: ProcessId,
}

impl Urgency {
    pub fn of(process: &Process, key: i64) -> Self {
        Self {
            key,
            arrival: process.arrival,
            id: process.id,
        }
    }

    fn as_tuple(&self) -> (i64, Ticks, ProcessId) {
        (self.key, self.arrival, self.id)
    }

    /// True when `self` should run before `other`.
    pub fn beats(&self, other: &Urgency) -> bool {
        self.as_tuple() < other.as_tuple()
    }
}

// KeyedPriorityQueue is a max-heap, so the most urgent entry must compare greatest
impl PartialOrd for Urgency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Urgency {
    fn cmp(&self, other: &Self) -> Ordering {
        other.as_tuple().cmp(&self.as_tuple())
    }
}

#[derive(Debug)]
pub enum ReadyQueue {
    Fifo {
        processes: VecDeque<ProcessId>,
    },
    Priq {
        processes: KeyedPriorityQueue<ProcessId, Urgency>,
    },
}

impl ReadyQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            processes: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            processes: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        match self {
            Self::Fifo { processes } => processes.contains(&id),
            Self::Priq { processes } => processes.get_priority(&id).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { processes } => processes.len(),
            Self::Priq { processes } => processes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue contents in dispatch order.
    pub fn ids(&self) -> Vec<ProcessId> {
        match self {
            Self::Fifo { processes } => processes.iter().copied().collect(),
            Self::Priq { processes } => {
                let mut entries: Vec<(ProcessId, Urgency)> =
                    processes.iter().map(|(id, urgency)| (*id, *urgency)).collect();
                entries.sort_by(|a, b| b.1.cmp(&a.1));
                entries.into_iter().map(|(id, _)| id).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Completed,
    SliceExpired,
}

/// Per-run scheduling state. Owned by exactly one `SchedCore`, never shared
/// between runs.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub processes: Vec<Process>,
    pub ready: ReadyQueue,
    pub running: Option<ProcessId>,
    // Processes currently in `ready`, for O(1) membership checks
    pub queued: FxHashSet<ProcessId>,
    // Slice boundary reached at the end of the previous tick, settled once
    // that tick's arrivals have been admitted
    pub pending: Option<(ProcessId, Boundary)>,
    pub switch_remaining: Ticks,
}

impl SimCtx {
    pub fn new(processes: Vec<Process>, ready: ReadyQueue) -> Self {
        debug_assert!(
            processes.iter().enumerate().all(|(i, p)| p.id == i),
            "ProcessId must match Vec index"
        );

        Self {
            now: 0,
            processes,
            ready,
            running: None,
            queued: FxHashSet::default(),
            pending: None,
            switch_remaining: 0,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    fn ready_push(&mut self, id: ProcessId, urgency: Option<Urgency>) {
        assert!(
            !self.queued.contains(&id),
            "Process {id} already present in the ready set"
        );

        let process = self.process(id);
        debug_assert!(
            process.state == ProcessState::Ready,
            "Process {id} must be Ready when enqueued"
        );

        match &mut self.ready {
            ReadyQueue::Fifo { processes } => processes.push_back(id),
            ReadyQueue::Priq { processes } => {
                processes.push(
                    id,
                    urgency.expect("Attempted to push to a priority ready set with no urgency"),
                );
            }
        };

        self.queued.insert(id);
    }

    pub fn ready_push_back(&mut self, id: ProcessId) {
        self.ready_push(id, None);
    }

    pub fn ready_push_priq(&mut self, id: ProcessId, urgency: Urgency) {
        self.ready_push(id, Some(urgency));
    }

    pub fn ready_pop(&mut self) -> Option<ProcessId> {
        let id = match &mut self.ready {
            ReadyQueue::Fifo { processes } => processes.pop_front(),
            ReadyQueue::Priq { processes } => processes.pop().map(|entry| entry.0),
        }?;

        let removed = self.queued.remove(&id);
        debug_assert!(removed, "Process {id} missing ready-set membership");

        Some(id)
    }

    pub fn ready_peek_urgency(&self) -> Option<Urgency> {
        match &self.ready {
            ReadyQueue::Fifo { .. } => None,
            ReadyQueue::Priq { processes } => processes.peek().map(|entry| *entry.1),
        }
    }

    pub fn process(&self, id: ProcessId) -> &Process {
        &self.processes[id]
    }

    pub fn process_mut(&mut self, id: ProcessId) -> &mut Process {
        &mut self.processes[id]
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn all_completed(&self) -> bool {
        self.processes.iter().all(Process::is_completed)
    }

    pub fn mark_ready(&mut self, id: ProcessId) {
        let process = self.process_mut(id);
        debug_assert!(
            process.state != ProcessState::Completed,
            "Completed process {} cannot become ready",
            process.id
        );
        process.state = ProcessState::Ready;
    }

    pub fn set_running(&mut self, id: ProcessId, slice: Option<Ticks>) {
        debug_assert!(
            !self.queued.contains(&id),
            "Running process {id} must not be queued"
        );
        debug_assert!(self.running.is_none(), "CPU already running a process");

        let now = self.now;
        self.running = Some(id);
        let process = self.process_mut(id);
        debug_assert!(
            process.state == ProcessState::Ready,
            "Process {id} must be Ready before it runs"
        );
        process.state = ProcessState::Running;
        process.allocated_slice = slice;
        process.consumed_slice = 0;
        process.start_time.get_or_insert(now);
    }

    pub fn clear_cpu(&mut self) {
        self.running = None;
    }

    pub fn mark_completed(&mut self, id: ProcessId, finish_time: Ticks) {
        debug_assert!(
            !self.queued.contains(&id),
            "Completing process {id} that is still queued"
        );

        let process = &mut self.processes[id];
        debug_assert!(
            process.state == ProcessState::Running,
            "Process {id} must have been running before marked complete"
        );
        debug_assert_eq!(process.remaining, 0, "Process {id} completed with work left");

        process.state = ProcessState::Completed;
        process.allocated_slice = None;
        process.finish_time = Some(finish_time);
    }
}
