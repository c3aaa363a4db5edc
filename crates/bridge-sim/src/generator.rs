//! Per-class traffic generator
//!
//! Spawns one OS thread per worker, sleeping an arrival delay after
//! each spawn, then joins every worker it started.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bridge_core::{kdebug, kerror, kinfo};
use bridge_core::{BridgeMonitor, SimResult, Traffic, WorkerError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::delay::{DelayPolicy, Fixed};
use crate::worker::{run_worker, WorkerId};

/// Outcome of one generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorReport {
    pub class: Traffic,
    pub spawned: usize,
    pub completed: usize,
    pub elapsed: Duration,
}

/// Creates `count` workers of one class
#[derive(Debug, Clone)]
pub struct Generator {
    class: Traffic,
    count: usize,
    arrivals: Arc<dyn DelayPolicy>,
    crossing: Arc<dyn DelayPolicy>,
    seed: Option<u64>,
}

impl Generator {
    /// Zero arrival and crossing delays until configured
    pub fn new(class: Traffic, count: usize) -> Self {
        Self {
            class,
            count,
            arrivals: Arc::new(Fixed::ZERO),
            crossing: Arc::new(Fixed::ZERO),
            seed: None,
        }
    }

    pub fn arrivals(mut self, policy: impl DelayPolicy + 'static) -> Self {
        self.arrivals = Arc::new(policy);
        self
    }

    pub fn crossing(mut self, policy: impl DelayPolicy + 'static) -> Self {
        self.crossing = Arc::new(policy);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn class(&self) -> Traffic {
        self.class
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Spawn every worker, then wait for all of them
    ///
    /// A spawn failure stops further spawning. Workers already running
    /// are still joined before the error is returned, so no crossing is
    /// abandoned mid-bridge.
    pub fn run(&self, monitor: &Arc<BridgeMonitor>) -> SimResult<GeneratorReport> {
        let start = Instant::now();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut handles: Vec<(WorkerId, JoinHandle<()>)> = Vec::with_capacity(self.count);
        let mut failure: Option<WorkerError> = None;

        for id in 1..=self.count {
            let who = WorkerId::new(self.class, id);
            let worker_seed: u64 = rng.gen();
            let monitor = Arc::clone(monitor);
            let crossing = Arc::clone(&self.crossing);

            let spawned = thread::Builder::new()
                .name(who.thread_name())
                .spawn(move || {
                    let mut rng = StdRng::seed_from_u64(worker_seed);
                    run_worker(who, &monitor, crossing.as_ref(), &mut rng);
                });

            match spawned {
                Ok(handle) => {
                    kdebug!("spawned {}", who.thread_name());
                    handles.push((who, handle));
                }
                Err(e) => {
                    kerror!("failed to spawn {}: {}", who.thread_name(), e);
                    failure = Some(WorkerError::SpawnFailed {
                        class: self.class,
                        id,
                        kind: e.kind(),
                    });
                    break;
                }
            }

            thread::sleep(self.arrivals.next_delay(&mut rng));
        }

        let spawned = handles.len();
        let mut completed = 0;
        for (who, handle) in handles {
            match handle.join() {
                Ok(()) => completed += 1,
                Err(_) => {
                    kerror!("{} panicked while crossing", who);
                    failure.get_or_insert(WorkerError::Panicked {
                        class: who.class,
                        id: who.id,
                    });
                }
            }
        }

        if let Some(e) = failure {
            return Err(e.into());
        }

        let elapsed = start.elapsed();
        kinfo!("{} generator done: {}/{} crossed in {:?}", self.class, completed, self.count, elapsed);
        Ok(GeneratorReport {
            class: self.class,
            spawned,
            completed,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::Uniform;
    use bridge_core::SimError;
    use rand::rngs::StdRng;

    /// Crossing policy that blows up mid-bridge
    #[derive(Debug)]
    struct Stumble;

    impl DelayPolicy for Stumble {
        fn next_delay(&self, _rng: &mut StdRng) -> Duration {
            panic!("tripped on the bridge");
        }
    }

    #[test]
    fn test_generator_runs_all() {
        let monitor = Arc::new(BridgeMonitor::new());
        let report = Generator::new(Traffic::NORTH, 10)
            .crossing(Uniform::new(Duration::ZERO, Duration::from_millis(2)))
            .seed(1)
            .run(&monitor)
            .unwrap();

        assert_eq!(report.class, Traffic::NORTH);
        assert_eq!(report.spawned, 10);
        assert_eq!(report.completed, 10);
        assert!(monitor.snapshot().is_idle());
        assert_eq!(monitor.stats().north_admitted, 10);
    }

    #[test]
    fn test_generator_empty() {
        let monitor = Arc::new(BridgeMonitor::new());
        let report = Generator::new(Traffic::Pedestrian, 0).run(&monitor).unwrap();
        assert_eq!(report.spawned, 0);
        assert_eq!(report.completed, 0);
    }

    #[test]
    fn test_generator_reports_panicked_worker() {
        let monitor = Arc::new(BridgeMonitor::new());
        let result = Generator::new(Traffic::Pedestrian, 3)
            .crossing(Stumble)
            .seed(2)
            .run(&monitor);

        assert!(matches!(
            result,
            Err(SimError::Worker(WorkerError::Panicked { class: Traffic::Pedestrian, .. }))
        ));
        // Every permit was released while unwinding
        assert!(monitor.snapshot().is_idle());
        assert_eq!(monitor.stats().pedestrians_admitted, 3);
    }
}
