use std::sync::atomic::AtomicBool;

use sched_sim::{
    Algorithm, AlgorithmKind, ProcessSpec, SimError, SimReport, SimResult, simulate,
    simulate_cancellable,
    sim::{Subject, sample_workload},
    workload::BernoulliWorkload,
};

fn spans(result: &SimResult) -> Vec<(String, u64, u64)> {
    result
        .segments
        .iter()
        .map(|s| {
            let subject = match s.subject {
                Subject::Process(id) => result.name(id).to_owned(),
                Subject::Idle => "idle".to_owned(),
                Subject::ContextSwitch => "CS".to_owned(),
            };
            (subject, s.start, s.end)
        })
        .collect()
}

fn span(subject: &str, start: u64, end: u64) -> (String, u64, u64) {
    (subject.to_owned(), start, end)
}

fn ready_names(result: &SimResult, tick: usize) -> Vec<&str> {
    result.snapshots[tick]
        .ready
        .iter()
        .map(|&id| result.name(id))
        .collect()
}

fn all_algorithms() -> Vec<Algorithm> {
    vec![
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::Priority,
        Algorithm::Srt,
        Algorithm::round_robin(2, 0).unwrap(),
        Algorithm::round_robin(3, 1).unwrap(),
    ]
}

#[test]
fn fcfs_runs_in_arrival_order() {
    let specs = [
        ProcessSpec::new(0, 5).named("A"),
        ProcessSpec::new(1, 3).named("B"),
        ProcessSpec::new(2, 8).named("C"),
    ];
    let result = simulate(&Algorithm::Fcfs, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("A", 0, 5), span("B", 5, 8), span("C", 8, 16)]
    );

    let waits: Vec<_> = result.metrics.per_process.iter().map(|m| m.waiting).collect();
    assert_eq!(waits, [0, 4, 6]);
    assert!((result.metrics.avg_waiting - 10.0 / 3.0).abs() < 1e-9);

    // Arrivals during A's burst show up in the ready set while A runs
    assert_eq!(ready_names(&result, 0), Vec::<&str>::new());
    assert_eq!(ready_names(&result, 1), ["B"]);
    assert_eq!(ready_names(&result, 2), ["B", "C"]);
    assert_eq!(result.snapshots[4].running, Some(0));
}

#[test]
fn fcfs_idles_until_first_arrival() {
    let specs = [ProcessSpec::new(2, 3).named("A"), ProcessSpec::new(7, 1).named("B")];
    let result = simulate(&Algorithm::Fcfs, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("idle", 0, 2), span("A", 2, 5), span("idle", 5, 7), span("B", 7, 8)]
    );
    assert_eq!(result.snapshots.len(), 8);
    assert!(result.snapshots[..2].iter().all(|s| s.running.is_none() && s.ready.is_empty()));
    assert_eq!(result.metrics.busy_time, 4);
    assert!((result.metrics.cpu_utilization - 0.5).abs() < 1e-9);
}

#[test]
fn sjf_picks_shortest_burst() {
    let specs = [
        ProcessSpec::new(0, 8).named("P0"),
        ProcessSpec::new(0, 4).named("P1"),
        ProcessSpec::new(0, 2).named("P2"),
        ProcessSpec::new(0, 6).named("P3"),
    ];
    let result = simulate(&Algorithm::Sjf, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("P2", 0, 2), span("P1", 2, 6), span("P3", 6, 12), span("P0", 12, 20)]
    );

    let waits: Vec<_> = result.metrics.per_process.iter().map(|m| m.waiting).collect();
    assert_eq!(waits, [12, 2, 0, 6]);
    assert_eq!(result.metrics.avg_waiting, 5.0);
}

#[test]
fn sjf_is_not_preemptive_and_breaks_ties_by_arrival() {
    let specs = [
        ProcessSpec::new(0, 6).named("Long"),
        ProcessSpec::new(2, 3).named("Late"),
        ProcessSpec::new(1, 3).named("Early"),
    ];
    let result = simulate(&Algorithm::Sjf, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("Long", 0, 6), span("Early", 6, 9), span("Late", 9, 12)]
    );
    assert_eq!(result.metrics.preemptions, 0);
}

#[test]
fn priority_prefers_lower_value() {
    let result = simulate(&Algorithm::Priority, &sample_workload()).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("P1", 0, 5), span("P2", 5, 8), span("P4", 8, 14), span("P3", 14, 22)]
    );
    // Priority-ordered ready set is reported most urgent first
    assert_eq!(ready_names(&result, 4), ["P2", "P4", "P3"]);
}

#[test]
fn priority_defaults_to_neutral_value() {
    let specs = [
        ProcessSpec::new(0, 1),
        ProcessSpec::new(0, 1).with_priority(1),
        ProcessSpec::new(0, 1).with_priority(-1),
    ];
    let result = simulate(&Algorithm::Priority, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("P3", 0, 1), span("P1", 1, 2), span("P2", 2, 3)]
    );
}

#[test]
fn srt_preempts_for_shorter_remaining_time() {
    let specs = [
        ProcessSpec::new(0, 8).named("A"),
        ProcessSpec::new(1, 4).named("B"),
        ProcessSpec::new(2, 2).named("C"),
    ];
    let result = simulate(&Algorithm::Srt, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![
            span("A", 0, 1),
            span("B", 1, 2),
            span("C", 2, 4),
            span("B", 4, 7),
            span("A", 7, 15),
        ]
    );
    assert_eq!(result.metrics.preemptions, 2);

    let finish: Vec<_> = result.processes.iter().map(|p| p.finish_time).collect();
    assert_eq!(finish, [Some(15), Some(7), Some(4)]);

    // The preempted process goes back to the ready set
    assert_eq!(ready_names(&result, 1), ["A"]);
    assert_eq!(ready_names(&result, 2), ["B", "A"]);
}

#[test]
fn srt_ties_favor_earlier_arrival() {
    let specs = [ProcessSpec::new(0, 4).named("A"), ProcessSpec::new(1, 3).named("B")];
    let result = simulate(&Algorithm::Srt, &specs).unwrap();

    // At t=1 both have 3 ticks left; A arrived first and keeps the CPU
    assert_eq!(spans(&result), vec![span("A", 0, 4), span("B", 4, 7)]);
    assert_eq!(result.metrics.preemptions, 0);
}

#[test]
fn round_robin_sample_with_context_switch() {
    let algorithm = Algorithm::round_robin(2, 1).unwrap();
    let result = simulate(&algorithm, &sample_workload()).unwrap();

    assert_eq!(
        spans(&result),
        vec![
            span("P1", 0, 2),
            span("CS", 2, 3),
            span("P2", 3, 5),
            span("CS", 5, 6),
            span("P3", 6, 8),
            span("CS", 8, 9),
            span("P1", 9, 11),
            span("CS", 11, 12),
            span("P4", 12, 14),
            span("CS", 14, 15),
            span("P2", 15, 16),
            span("CS", 16, 17),
            span("P3", 17, 19),
            span("CS", 19, 20),
            span("P1", 20, 21),
            span("CS", 21, 22),
            span("P4", 22, 24),
            span("CS", 24, 25),
            span("P3", 25, 27),
            span("CS", 27, 28),
            span("P4", 28, 30),
            span("CS", 30, 31),
            span("P3", 31, 33),
        ]
    );

    let finish: Vec<_> = result.processes.iter().map(|p| p.finish_time).collect();
    assert_eq!(finish, [Some(21), Some(16), Some(33), Some(30)]);

    let waits: Vec<_> = result.metrics.per_process.iter().map(|m| m.waiting).collect();
    assert_eq!(waits, [16, 12, 23, 21]);
    assert_eq!(result.metrics.avg_waiting, 18.0);
    assert_eq!(result.metrics.avg_turnaround, 23.5);
    assert_eq!(result.metrics.context_switches, 11);
    assert_eq!(result.metrics.makespan, 33);
    assert_eq!(result.metrics.busy_time, 22);

    // During a switch the CPU belongs to nobody, and the requeued process
    // sits behind the arrivals from its slice
    assert_eq!(result.snapshots[2].running, None);
    assert_eq!(ready_names(&result, 2), ["P2", "P3", "P1"]);
    assert_eq!(ready_names(&result, 3), ["P3", "P1", "P4"]);
}

#[test]
fn round_robin_output_is_byte_identical_across_runs() {
    let algorithm = Algorithm::round_robin(2, 1).unwrap();
    let specs = sample_workload();

    let first = SimReport::new(&algorithm, &simulate(&algorithm, &specs).unwrap());
    let second = SimReport::new(&algorithm, &simulate(&algorithm, &specs).unwrap());

    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn round_robin_no_switch_when_same_process_continues() {
    let algorithm = Algorithm::round_robin(2, 1).unwrap();
    let result = simulate(&algorithm, &[ProcessSpec::new(0, 5)]).unwrap();

    assert_eq!(spans(&result), vec![span("P1", 0, 5)]);
    assert_eq!(result.metrics.context_switches, 0);
    assert_eq!(result.metrics.preemptions, 0);
}

#[test]
fn round_robin_no_switch_after_idle() {
    let algorithm = Algorithm::round_robin(2, 1).unwrap();
    let specs = [ProcessSpec::new(0, 2).named("A"), ProcessSpec::new(5, 1).named("B")];
    let result = simulate(&algorithm, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("A", 0, 2), span("idle", 2, 5), span("B", 5, 6)]
    );
}

#[test]
fn round_robin_switch_when_arrival_meets_completion() {
    let algorithm = Algorithm::round_robin(2, 1).unwrap();
    let specs = [ProcessSpec::new(0, 2).named("A"), ProcessSpec::new(2, 1).named("B")];
    let result = simulate(&algorithm, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("A", 0, 2), span("CS", 2, 3), span("B", 3, 4)]
    );
}

#[test]
fn round_robin_arrival_at_expiry_goes_first() {
    let algorithm = Algorithm::round_robin(2, 0).unwrap();
    let specs = [ProcessSpec::new(0, 4).named("A"), ProcessSpec::new(2, 2).named("B")];
    let result = simulate(&algorithm, &specs).unwrap();

    assert_eq!(
        spans(&result),
        vec![span("A", 0, 2), span("B", 2, 4), span("A", 4, 6)]
    );
    assert_eq!(ready_names(&result, 2), ["A"]);
    assert_eq!(result.metrics.preemptions, 1);
}

#[test]
fn round_robin_rejects_bad_quantum_before_running() {
    assert!(matches!(
        Algorithm::round_robin(0, 0),
        Err(SimError::InvalidQuantum(0))
    ));
    assert!(matches!(
        Algorithm::from_parts(AlgorithmKind::Rr, None, Some(1)),
        Err(SimError::MissingQuantum)
    ));
}

#[test]
fn invalid_process_rejected_before_running() {
    let err = simulate(&Algorithm::Fcfs, &[ProcessSpec::new(0, -2)]).unwrap_err();
    assert!(matches!(err, SimError::InvalidBurst { burst: -2, .. }));
    assert_eq!(err.to_string(), "process P1: burst must be > 0, got -2");
}

#[test]
fn empty_process_list_gives_empty_result() {
    for algorithm in all_algorithms() {
        let result = simulate(&algorithm, &[]).unwrap();
        assert!(result.segments.is_empty());
        assert!(result.snapshots.is_empty());
        assert_eq!(result.metrics.avg_waiting, 0.0);
        assert_eq!(result.metrics.avg_turnaround, 0.0);
    }
}

#[test]
fn identical_processes_are_served_in_id_order() {
    let specs = vec![ProcessSpec::new(1, 2); 3];
    for algorithm in [Algorithm::Fcfs, Algorithm::Sjf, Algorithm::Priority, Algorithm::Srt] {
        let result = simulate(&algorithm, &specs).unwrap();
        assert_eq!(
            spans(&result),
            vec![span("idle", 0, 1), span("P1", 1, 3), span("P2", 3, 5), span("P3", 5, 7)],
            "{algorithm}"
        );
    }
}

#[test]
fn cancellation_abandons_the_run() {
    let cancel = AtomicBool::new(true);
    let err = simulate_cancellable(&Algorithm::Srt, &sample_workload(), &cancel).unwrap_err();
    assert!(matches!(err, SimError::Cancelled { at: 0 }));

    let proceed = AtomicBool::new(false);
    assert!(simulate_cancellable(&Algorithm::Srt, &sample_workload(), &proceed).is_ok());
}

#[test]
fn schedule_invariants_hold_on_random_workloads() {
    for seed in 0..8 {
        let specs = BernoulliWorkload {
            ticks: 40,
            seed,
            ..Default::default()
        }
        .generate();

        for algorithm in all_algorithms() {
            let result = simulate(&algorithm, &specs).unwrap();
            let makespan = result.metrics.makespan;

            // Segments are sorted, contiguous and cover [0, makespan)
            let mut cursor = 0;
            for segment in &result.segments {
                assert_eq!(segment.start, cursor, "{algorithm} seed {seed}");
                assert!(segment.end > segment.start);
                cursor = segment.end;
            }
            assert_eq!(cursor, makespan);

            // One snapshot per tick, running process never listed as ready
            assert_eq!(result.snapshots.len() as u64, makespan);
            for (tick, snapshot) in result.snapshots.iter().enumerate() {
                assert_eq!(snapshot.tick, tick as u64);
                if let Some(id) = snapshot.running {
                    assert!(!snapshot.ready.contains(&id));
                }
            }

            for (process, m) in result.processes.iter().zip(&result.metrics.per_process) {
                let finish = process.finish_time.unwrap();
                let start = process.start_time.unwrap();
                assert!(finish > process.arrival);
                assert!(start >= process.arrival);
                assert_eq!(process.remaining, 0);
                assert_eq!(m.turnaround, finish - process.arrival);
                assert_eq!(m.waiting, m.turnaround - process.burst);

                let executed: u64 = result
                    .segments
                    .iter()
                    .filter(|s| s.subject == Subject::Process(process.id))
                    .map(|s| s.len())
                    .sum();
                assert_eq!(executed, process.burst);

                if !algorithm.is_preemptive() {
                    let pieces = result
                        .segments
                        .iter()
                        .filter(|s| s.subject == Subject::Process(process.id))
                        .count();
                    assert_eq!(pieces, 1, "{algorithm} split {}", process.name);
                }
            }

            let switches = result
                .segments
                .iter()
                .any(|s| s.subject == Subject::ContextSwitch);
            let charges_switches = matches!(
                algorithm,
                Algorithm::RoundRobin { context_switch, .. } if context_switch > 0
            );
            assert!(!switches || charges_switches);
        }
    }
}

#[test]
fn runs_are_idempotent_for_every_algorithm() {
    let specs = BernoulliWorkload {
        ticks: 30,
        seed: 42,
        ..Default::default()
    }
    .generate();

    for algorithm in all_algorithms() {
        let first = simulate(&algorithm, &specs).unwrap();
        let second = simulate(&algorithm, &specs).unwrap();
        assert_eq!(first.segments, second.segments);
        assert_eq!(first.snapshots, second.snapshots);
        assert_eq!(first.metrics, second.metrics);
    }
}

#[test]
fn report_uses_labels_and_reserved_subjects() {
    let algorithm = Algorithm::round_robin(2, 1).unwrap();
    let specs = [ProcessSpec::new(1, 3).named("A"), ProcessSpec::new(1, 1).named("B")];
    let report = SimReport::new(&algorithm, &simulate(&algorithm, &specs).unwrap());

    let subjects: Vec<_> = report.segments.iter().map(|s| s.subject.as_str()).collect();
    assert_eq!(
        subjects,
        ["idle", "A", "context-switch", "B", "context-switch", "A"]
    );
    assert_eq!(report.algorithm, "RR");

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["metrics"]["A"]["turnaround"], 6);
    assert_eq!(json["metrics"]["B"]["waiting"], 3);
    assert_eq!(json["snapshots"][0]["running"], serde_json::Value::Null);
    assert_eq!(json["snapshots"][1]["running"], "A");
}
