//! Plain-text views of a finished run for terminal output.

use std::fmt::Write;

use crate::sim::{
    SimResult, Subject,
    timeline::{CONTEXT_SWITCH_MARK, IDLE_MARK},
};

/// Gantt bar with one cell per segment and the segment boundaries below it.
///
/// ```text
/// |P1 |CS|P2 |
/// 0   2  3   5
/// ```
pub fn gantt(result: &SimResult) -> String {
    let mut bar = String::from("|");
    let mut axis = String::new();

    for segment in &result.segments {
        let label = match segment.subject {
            Subject::Process(id) => result.name(id),
            Subject::Idle => IDLE_MARK,
            Subject::ContextSwitch => CONTEXT_SWITCH_MARK,
        };
        let width = (segment.len() as usize).max(label.len() + 1);

        let _ = write!(bar, "{label:<width$}|");
        let start = segment.start.to_string();
        let _ = write!(axis, "{start:<pad$}", pad = width + 1);
    }

    if let Some(last) = result.segments.last() {
        axis.push_str(&last.end.to_string());
    }

    format!("{bar}\n{axis}")
}

/// Per-process table followed by the run-wide figures.
pub fn metrics_table(result: &SimResult) -> String {
    let mut out = String::new();
    let name_width = result
        .processes
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("Process".len());

    let _ = writeln!(
        out,
        "{:<name_width$}  {:>7}  {:>5}  {:>8}  {:>5}  {:>6}  {:>7}  {:>10}  {:>8}",
        "Process",
        "Arrival",
        "Burst",
        "Priority",
        "Start",
        "Finish",
        "Waiting",
        "Turnaround",
        "Response",
    );

    for (process, m) in result.processes.iter().zip(&result.metrics.per_process) {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>7}  {:>5}  {:>8}  {:>5}  {:>6}  {:>7}  {:>10}  {:>8}",
            process.name,
            process.arrival,
            process.burst,
            process.priority,
            process.start_time.map_or_else(|| "-".to_owned(), |t| t.to_string()),
            process.finish_time.map_or_else(|| "-".to_owned(), |t| t.to_string()),
            m.waiting,
            m.turnaround,
            m.response,
        );
    }

    let metrics = &result.metrics;
    let _ = writeln!(
        out,
        "\navg waiting {:.2} | avg turnaround {:.2} | avg response {:.2}",
        metrics.avg_waiting, metrics.avg_turnaround, metrics.avg_response
    );
    let _ = write!(
        out,
        "makespan {} | cpu utilization {:.1}% | throughput {:.3}/tick | context switches {} | preemptions {}",
        metrics.makespan,
        metrics.cpu_utilization * 100.0,
        metrics.throughput,
        metrics.context_switches,
        metrics.preemptions
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scheduler::Algorithm,
        sim::{ProcessSpec, simulate},
    };

    #[test]
    fn gantt_marks_idle_and_boundaries() {
        let specs = [ProcessSpec::new(2, 3).named("A"), ProcessSpec::new(5, 1).named("B")];
        let result = simulate(&Algorithm::Fcfs, &specs).unwrap();

        let rendered = gantt(&result);
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("|-- |A  |B |"));
        assert_eq!(lines.next(), Some("0   2   5  6"));
    }

    #[test]
    fn gantt_of_empty_run_is_blank() {
        let result = simulate(&Algorithm::Fcfs, &[]).unwrap();
        assert_eq!(gantt(&result), "|\n");
    }

    #[test]
    fn table_lists_every_process() {
        let specs = [ProcessSpec::new(0, 2), ProcessSpec::new(0, 1)];
        let result = simulate(&Algorithm::Sjf, &specs).unwrap();
        let table = metrics_table(&result);

        assert!(table.lines().any(|l| l.starts_with("P1")));
        assert!(table.lines().any(|l| l.starts_with("P2")));
        assert!(table.contains("avg waiting 0.50"));
        assert!(table.contains("makespan 3"));
    }
}
