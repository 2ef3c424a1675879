use rand::prelude::*;

use crate::sim::ProcessSpec;

/// Shape of a randomly generated workload: at each tick a process arrives
/// with probability `p_arrival`; it is short with probability `p_short`.
#[derive(Debug, Clone, PartialEq)]
pub struct BernoulliWorkload {
    pub ticks: u64,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: i64,
    pub long_burst: i64,
    pub max_priority: i64,
    pub seed: u64,
}

impl Default for BernoulliWorkload {
    fn default() -> Self {
        Self {
            ticks: 20,
            p_arrival: 0.3,
            p_short: 0.3,
            short_burst: 2,
            long_burst: 6,
            max_priority: 5,
            seed: 0,
        }
    }
}

impl BernoulliWorkload {
    pub fn generate(&self) -> Vec<ProcessSpec> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut processes = Vec::new();

        for t in 0..self.ticks {
            if rng.random::<f64>() < self.p_arrival {
                let burst = if rng.random::<f64>() < self.p_short {
                    self.short_burst
                } else {
                    self.long_burst
                };
                let priority = rng.random_range(0..=self.max_priority.max(0));

                processes.push(ProcessSpec::new(t as i64, burst).with_priority(priority));
            }
        }

        processes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_workload() {
        let params = BernoulliWorkload {
            ticks: 100,
            ..Default::default()
        };
        assert_eq!(params.generate(), params.generate());
    }

    #[test]
    fn generated_processes_respect_parameters() {
        let params = BernoulliWorkload {
            ticks: 200,
            p_arrival: 0.5,
            seed: 7,
            ..Default::default()
        };
        let processes = params.generate();

        assert!(!processes.is_empty());
        assert!(processes.windows(2).all(|w| w[0].arrival < w[1].arrival));
        for p in &processes {
            assert!(p.burst == params.short_burst || p.burst == params.long_burst);
            assert!((0..=params.max_priority).contains(&p.priority.unwrap()));
            assert!((0..200).contains(&p.arrival));
        }
    }

    #[test]
    fn zero_probability_yields_nothing() {
        let params = BernoulliWorkload {
            p_arrival: 0.0,
            ..Default::default()
        };
        assert!(params.generate().is_empty());
    }
}
