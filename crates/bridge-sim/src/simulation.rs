//! Whole-run orchestration
//!
//! Runs every generator on its own thread against one shared monitor,
//! waits for all of them, then checks the bridge ended empty.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bridge_core::{kdebug, kinfo};
use bridge_core::{
    BridgeMonitor, BridgeSnapshot, CrossingStats, Direction, SimError, SimResult, Traffic,
    WorkerError,
};

use crate::config::SimConfig;
use crate::delay::{Exponential, Uniform};
use crate::generator::{Generator, GeneratorReport};

/// A monitor plus the generators that will drive it
#[derive(Debug)]
pub struct Simulation {
    monitor: Arc<BridgeMonitor>,
    generators: Vec<Generator>,
}

impl Simulation {
    pub fn new(monitor: Arc<BridgeMonitor>) -> Self {
        Self {
            monitor,
            generators: Vec::new(),
        }
    }

    /// North cars, south cars and pedestrians as configured
    pub fn from_config(config: &SimConfig) -> SimResult<Self> {
        config.validate()?;

        let car_crossing = Uniform::new(
            config.scaled(config.car_crossing.0),
            config.scaled(config.car_crossing.1),
        );
        let pedestrian_crossing = Uniform::new(
            config.scaled(config.pedestrian_crossing.0),
            config.scaled(config.pedestrian_crossing.1),
        );

        let mut generators = vec![
            Generator::new(Traffic::Car(Direction::North), config.north_cars)
                .arrivals(Exponential::new(config.scaled(config.north_arrival_mean)))
                .crossing(car_crossing),
            Generator::new(Traffic::Car(Direction::South), config.south_cars)
                .arrivals(Exponential::new(config.scaled(config.south_arrival_mean)))
                .crossing(car_crossing),
            Generator::new(Traffic::Pedestrian, config.pedestrians)
                .arrivals(Exponential::new(config.scaled(config.pedestrian_arrival_mean)))
                .crossing(pedestrian_crossing),
        ];

        if let Some(seed) = config.seed {
            generators = generators
                .into_iter()
                .zip(0u64..)
                .map(|(g, i)| g.seed(seed.wrapping_add(i)))
                .collect();
        }

        Ok(Self {
            monitor: Arc::new(BridgeMonitor::new()),
            generators,
        })
    }

    pub fn generator(mut self, generator: Generator) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn monitor(&self) -> &Arc<BridgeMonitor> {
        &self.monitor
    }

    /// Run all generators to completion
    ///
    /// Every generator thread is joined before returning, even when one
    /// of them fails. The first failure wins.
    pub fn run(self) -> SimResult<SimReport> {
        let start = Instant::now();
        let mut handles = Vec::with_capacity(self.generators.len());
        let mut failure: Option<SimError> = None;

        for generator in self.generators {
            let class = generator.class();
            let monitor = Arc::clone(&self.monitor);
            let spawned = thread::Builder::new()
                .name(format!("gen-{}", class))
                .spawn(move || generator.run(&monitor));

            match spawned {
                Ok(handle) => {
                    kdebug!("started {} generator", class);
                    handles.push((class, handle));
                }
                Err(e) => {
                    // id 0 names the generator thread itself
                    failure = Some(
                        WorkerError::SpawnFailed {
                            class,
                            id: 0,
                            kind: e.kind(),
                        }
                        .into(),
                    );
                    break;
                }
            }
        }

        let mut generators = Vec::with_capacity(handles.len());
        for (class, handle) in handles {
            match handle.join() {
                Ok(Ok(report)) => generators.push(report),
                Ok(Err(e)) => {
                    failure.get_or_insert(e);
                }
                Err(_) => {
                    failure.get_or_insert(SimError::GeneratorPanicked(class));
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        let snapshot = self.monitor.snapshot();
        if !snapshot.is_idle() {
            return Err(SimError::Unclean(snapshot));
        }

        let report = SimReport {
            generators,
            snapshot,
            stats: self.monitor.stats(),
            elapsed: start.elapsed(),
        };
        kinfo!("all traffic crossed: {}", report.snapshot);
        Ok(report)
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct SimReport {
    pub generators: Vec<GeneratorReport>,
    /// Final counters, all zero on success
    pub snapshot: BridgeSnapshot,
    pub stats: CrossingStats,
    pub elapsed: Duration,
}

impl SimReport {
    pub fn is_clean(&self) -> bool {
        self.snapshot.is_idle()
    }

    pub fn completed(&self) -> usize {
        self.generators.iter().map(|g| g.completed).sum()
    }

    pub fn print(&self) {
        println!("=== Results ===");
        for g in &self.generators {
            println!(
                "{:<16} {:>4}/{:<4} crossed in {:?}",
                g.class.to_string(),
                g.completed,
                g.spawned,
                g.elapsed
            );
        }
        for class in [Traffic::NORTH, Traffic::SOUTH, Traffic::Pedestrian] {
            println!(
                "{:<16} admitted {:>4}, peak together {}",
                class.to_string(),
                self.stats.admitted(class),
                self.stats.peak(class)
            );
        }
        println!("Final state:     {}", self.snapshot);
        println!("Total time:      {:?}", self.elapsed);
    }
}
