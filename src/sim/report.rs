//! Serializable view of a finished run, with processes referred to by label.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    driver::SimResult,
    metrics::ProcessMetrics,
    timeline::{CONTEXT_SWITCH_LABEL, IDLE_LABEL, Subject},
};
use crate::{
    core::{ProcessId, Ticks},
    scheduler::Algorithm,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecord {
    pub subject: String,
    pub start: Ticks,
    pub end: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRecord {
    pub tick: Ticks,
    pub ready: Vec<String>,
    pub running: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    #[serde(flatten)]
    pub per_process: BTreeMap<String, ProcessMetrics>,
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

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub algorithm: String,
    pub segments: Vec<SegmentRecord>,
    pub snapshots: Vec<SnapshotRecord>,
    pub metrics: MetricsRecord,
}

impl SimReport {
    pub fn new(algorithm: &Algorithm, result: &SimResult) -> Self {
        let label = |id: ProcessId| result.name(id).to_owned();

        let segments = result
            .segments
            .iter()
            .map(|segment| SegmentRecord {
                subject: match segment.subject {
                    Subject::Process(id) => label(id),
                    Subject::Idle => IDLE_LABEL.to_owned(),
                    Subject::ContextSwitch => CONTEXT_SWITCH_LABEL.to_owned(),
                },
                start: segment.start,
                end: segment.end,
            })
            .collect();

        let snapshots = result
            .snapshots
            .iter()
            .map(|snapshot| SnapshotRecord {
                tick: snapshot.tick,
                ready: snapshot.ready.iter().map(|&id| label(id)).collect(),
                running: snapshot.running.map(label),
            })
            .collect();

        let m = &result.metrics;
        let metrics = MetricsRecord {
            per_process: m
                .per_process
                .iter()
                .enumerate()
                .map(|(id, pm)| (label(id), *pm))
                .collect(),
            avg_waiting: m.avg_waiting,
            avg_turnaround: m.avg_turnaround,
            avg_response: m.avg_response,
            makespan: m.makespan,
            busy_time: m.busy_time,
            cpu_utilization: m.cpu_utilization,
            throughput: m.throughput,
            context_switches: m.context_switches,
            preemptions: m.preemptions,
        };

        Self {
            algorithm: algorithm.kind().to_string(),
            segments,
            snapshots,
            metrics,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
