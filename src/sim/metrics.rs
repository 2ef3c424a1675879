use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::{Process, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub waiting: Ticks,
    pub turnaround: Ticks,
    // Time to first run
    pub response: Ticks,
}

impl ProcessMetrics {
    pub fn of(process: &Process) -> Self {
        let finish = process
            .finish_time
            .expect("Metrics requested for an unfinished process");
        let start = process
            .start_time
            .expect("Finished process must have a start time");

        let turnaround = finish - process.arrival;
        debug_assert!(
            turnaround >= process.burst,
            "Process {} waited a negative amount of time",
            process.name
        );

        Self {
            waiting: turnaround.saturating_sub(process.burst),
            turnaround,
            response: start - process.arrival,
        }
    }
}

/// Counters collected by the driver over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub busy_time: Ticks,
    pub context_switches: u64,
    pub preemptions: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    // Indexed by ProcessId
    pub per_process: Vec<ProcessMetrics>,
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    pub avg_response: f64,
    pub makespan: Ticks,
    pub busy_time: Ticks,
    pub cpu_utilization: f64,
    pub throughput: f64,
    pub context_switches: u64,
    pub preemptions: u64,
}

impl Metrics {
    pub fn compute(processes: &[Process], stats: RunStats) -> Self {
        let per_process: Vec<ProcessMetrics> = processes.iter().map(ProcessMetrics::of).collect();
        let makespan = processes
            .iter()
            .filter_map(|p| p.finish_time)
            .max()
            .unwrap_or(0);

        let ratio = |numerator: f64| {
            if makespan == 0 {
                0.0
            } else {
                numerator / makespan as f64
            }
        };

        Self {
            avg_waiting: avg(per_process.iter().map(|m| m.waiting as f64)),
            avg_turnaround: avg(per_process.iter().map(|m| m.turnaround as f64)),
            avg_response: avg(per_process.iter().map(|m| m.response as f64)),
            makespan,
            busy_time: stats.busy_time,
            cpu_utilization: ratio(stats.busy_time as f64),
            throughput: ratio(processes.len() as f64),
            context_switches: stats.context_switches,
            preemptions: stats.preemptions,
            per_process,
        }
    }
}

// Mean of an empty sample is defined as 0
fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    let mean = iter.collect::<Mean>();
    if mean.len() == 0 { 0.0 } else { mean.estimate() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessState;

    fn finished(id: usize, arrival: Ticks, burst: Ticks, start: Ticks, finish: Ticks) -> Process {
        let mut p = Process::new(id, format!("P{}", id + 1), arrival, burst, 0);
        p.state = ProcessState::Completed;
        p.remaining = 0;
        p.start_time = Some(start);
        p.finish_time = Some(finish);
        p
    }

    #[test]
    fn per_process_formulas() {
        let m = ProcessMetrics::of(&finished(0, 2, 8, 8, 16));
        assert_eq!(m.turnaround, 14);
        assert_eq!(m.waiting, 6);
        assert_eq!(m.response, 6);
    }

    #[test]
    fn averages_and_run_statistics() {
        let procs = [
            finished(0, 0, 5, 0, 5),
            finished(1, 1, 3, 5, 8),
            finished(2, 2, 8, 8, 16),
        ];
        let stats = RunStats {
            busy_time: 16,
            context_switches: 0,
            preemptions: 0,
        };
        let metrics = Metrics::compute(&procs, stats);

        assert!((metrics.avg_waiting - 10.0 / 3.0).abs() < 1e-9);
        assert!((metrics.avg_turnaround - 31.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.makespan, 16);
        assert!((metrics.cpu_utilization - 1.0).abs() < 1e-9);
        assert!((metrics.throughput - 3.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn zero_processes_average_to_zero() {
        let metrics = Metrics::compute(&[], RunStats::default());
        assert!(metrics.per_process.is_empty());
        assert_eq!(metrics.avg_waiting, 0.0);
        assert_eq!(metrics.avg_turnaround, 0.0);
        assert_eq!(metrics.avg_response, 0.0);
        assert_eq!(metrics.makespan, 0);
        assert_eq!(metrics.cpu_utilization, 0.0);
        assert_eq!(metrics.throughput, 0.0);
    }
}
