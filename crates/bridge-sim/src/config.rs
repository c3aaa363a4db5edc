//! Simulation configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder setters
//! 2. Environment variables (`from_env`)
//! 3. Library defaults (`new`)
//!
//! # Example
//!
//! ```rust,ignore
//! use bridge_sim::SimConfig;
//!
//! let config = SimConfig::from_env()
//!     .pedestrians(2)
//!     .time_scale(0.1);
//! config.validate()?;
//! ```

use std::time::Duration;

use bridge_core::env::{env_get, env_get_millis, env_get_opt};
use bridge_core::ConfigError;

const MAX_TIME_SCALE: f64 = 1000.0;

/// Upper bound on any scaled arrival mean or crossing time
pub const MAX_SCALED_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Library defaults
pub mod defaults {
    use std::time::Duration;

    pub const NORTH_CARS: usize = 15;
    pub const SOUTH_CARS: usize = 15;
    pub const PEDESTRIANS: usize = 5;

    /// Mean time between two arrivals of the same class
    pub const NORTH_ARRIVAL_MEAN: Duration = Duration::from_millis(500);
    pub const SOUTH_ARRIVAL_MEAN: Duration = Duration::from_millis(500);
    pub const PEDESTRIAN_ARRIVAL_MEAN: Duration = Duration::from_millis(5_000);

    pub const CAR_CROSS_MIN: Duration = Duration::from_millis(500);
    pub const CAR_CROSS_MAX: Duration = Duration::from_millis(1_000);
    pub const PEDESTRIAN_CROSS_MIN: Duration = Duration::from_millis(10_000);
    pub const PEDESTRIAN_CROSS_MAX: Duration = Duration::from_millis(30_000);

    pub const TIME_SCALE: f64 = 1.0;
}

/// Counts and timing for one run
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Cars generated heading north
    pub north_cars: usize,
    /// Cars generated heading south
    pub south_cars: usize,
    /// Pedestrians generated
    pub pedestrians: usize,
    /// Mean of the exponential inter-arrival time, north cars
    pub north_arrival_mean: Duration,
    /// Mean of the exponential inter-arrival time, south cars
    pub south_arrival_mean: Duration,
    /// Mean of the exponential inter-arrival time, pedestrians
    pub pedestrian_arrival_mean: Duration,
    /// Uniform crossing time range for cars
    pub car_crossing: (Duration, Duration),
    /// Uniform crossing time range for pedestrians
    pub pedestrian_crossing: (Duration, Duration),
    /// Multiplier applied to every duration above
    pub time_scale: f64,
    /// Seed for reproducible timing; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Defaults with `BRIDGE_*` environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `BRIDGE_NORTH_CARS`, `BRIDGE_SOUTH_CARS`, `BRIDGE_PEDESTRIANS` - Worker counts
    /// - `BRIDGE_NORTH_ARRIVAL_MS`, `BRIDGE_SOUTH_ARRIVAL_MS`,
    ///   `BRIDGE_PEDESTRIAN_ARRIVAL_MS` - Mean inter-arrival times
    /// - `BRIDGE_CAR_CROSS_MIN_MS`, `BRIDGE_CAR_CROSS_MAX_MS` - Car crossing range
    /// - `BRIDGE_PEDESTRIAN_CROSS_MIN_MS`, `BRIDGE_PEDESTRIAN_CROSS_MAX_MS` - Pedestrian range
    /// - `BRIDGE_TIME_SCALE` - Duration multiplier (e.g. `0.01` for a fast run)
    /// - `BRIDGE_SEED` - RNG seed
    pub fn from_env() -> Self {
        Self {
            north_cars: env_get("BRIDGE_NORTH_CARS", defaults::NORTH_CARS),
            south_cars: env_get("BRIDGE_SOUTH_CARS", defaults::SOUTH_CARS),
            pedestrians: env_get("BRIDGE_PEDESTRIANS", defaults::PEDESTRIANS),
            north_arrival_mean: env_get_millis(
                "BRIDGE_NORTH_ARRIVAL_MS",
                defaults::NORTH_ARRIVAL_MEAN,
            ),
            south_arrival_mean: env_get_millis(
                "BRIDGE_SOUTH_ARRIVAL_MS",
                defaults::SOUTH_ARRIVAL_MEAN,
            ),
            pedestrian_arrival_mean: env_get_millis(
                "BRIDGE_PEDESTRIAN_ARRIVAL_MS",
                defaults::PEDESTRIAN_ARRIVAL_MEAN,
            ),
            car_crossing: (
                env_get_millis("BRIDGE_CAR_CROSS_MIN_MS", defaults::CAR_CROSS_MIN),
                env_get_millis("BRIDGE_CAR_CROSS_MAX_MS", defaults::CAR_CROSS_MAX),
            ),
            pedestrian_crossing: (
                env_get_millis("BRIDGE_PEDESTRIAN_CROSS_MIN_MS", defaults::PEDESTRIAN_CROSS_MIN),
                env_get_millis("BRIDGE_PEDESTRIAN_CROSS_MAX_MS", defaults::PEDESTRIAN_CROSS_MAX),
            ),
            time_scale: env_get("BRIDGE_TIME_SCALE", defaults::TIME_SCALE),
            seed: env_get_opt("BRIDGE_SEED"),
        }
    }

    /// Library defaults, no environment lookups. Useful for tests.
    pub fn new() -> Self {
        Self {
            north_cars: defaults::NORTH_CARS,
            south_cars: defaults::SOUTH_CARS,
            pedestrians: defaults::PEDESTRIANS,
            north_arrival_mean: defaults::NORTH_ARRIVAL_MEAN,
            south_arrival_mean: defaults::SOUTH_ARRIVAL_MEAN,
            pedestrian_arrival_mean: defaults::PEDESTRIAN_ARRIVAL_MEAN,
            car_crossing: (defaults::CAR_CROSS_MIN, defaults::CAR_CROSS_MAX),
            pedestrian_crossing: (defaults::PEDESTRIAN_CROSS_MIN, defaults::PEDESTRIAN_CROSS_MAX),
            time_scale: defaults::TIME_SCALE,
            seed: None,
        }
    }

    // Builder methods

    pub fn north_cars(mut self, n: usize) -> Self {
        self.north_cars = n;
        self
    }

    pub fn south_cars(mut self, n: usize) -> Self {
        self.south_cars = n;
        self
    }

    pub fn pedestrians(mut self, n: usize) -> Self {
        self.pedestrians = n;
        self
    }

    pub fn north_arrival_mean(mut self, d: Duration) -> Self {
        self.north_arrival_mean = d;
        self
    }

    pub fn south_arrival_mean(mut self, d: Duration) -> Self {
        self.south_arrival_mean = d;
        self
    }

    pub fn pedestrian_arrival_mean(mut self, d: Duration) -> Self {
        self.pedestrian_arrival_mean = d;
        self
    }

    pub fn car_crossing(mut self, min: Duration, max: Duration) -> Self {
        self.car_crossing = (min, max);
        self
    }

    pub fn pedestrian_crossing(mut self, min: Duration, max: Duration) -> Self {
        self.pedestrian_crossing = (min, max);
        self
    }

    pub fn time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `d` multiplied by `time_scale`
    ///
    /// Saturates at `Duration::MAX` instead of panicking; `validate`
    /// rejects anything past `MAX_SCALED_DELAY`.
    pub fn scaled(&self, d: Duration) -> Duration {
        Duration::try_from_secs_f64(d.as_secs_f64() * self.time_scale).unwrap_or(Duration::MAX)
    }

    fn durations(&self) -> [Duration; 7] {
        [
            self.north_arrival_mean,
            self.south_arrival_mean,
            self.pedestrian_arrival_mean,
            self.car_crossing.0,
            self.car_crossing.1,
            self.pedestrian_crossing.0,
            self.pedestrian_crossing.1,
        ]
    }

    /// Total workers across all three classes
    pub fn total_workers(&self) -> usize {
        self.north_cars + self.south_cars + self.pedestrians
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(ConfigError::InvalidValue("time_scale must be finite and > 0"));
        }
        if self.time_scale > MAX_TIME_SCALE {
            return Err(ConfigError::InvalidValue("time_scale must be <= 1000"));
        }
        if self.car_crossing.0 > self.car_crossing.1 {
            return Err(ConfigError::InvalidValue("car crossing min must be <= max"));
        }
        if self.pedestrian_crossing.0 > self.pedestrian_crossing.1 {
            return Err(ConfigError::InvalidValue("pedestrian crossing min must be <= max"));
        }
        if self.durations().iter().any(|&d| self.scaled(d) > MAX_SCALED_DELAY) {
            return Err(ConfigError::InvalidValue("scaled delays must be <= 24h"));
        }
        if self.total_workers() == 0 {
            return Err(ConfigError::InvalidValue("at least one car or pedestrian is required"));
        }
        Ok(())
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        eprintln!("Bridge Configuration:");
        eprintln!("  north_cars:              {}", self.north_cars);
        eprintln!("  south_cars:              {}", self.south_cars);
        eprintln!("  pedestrians:             {}", self.pedestrians);
        eprintln!("  north_arrival_mean:      {:?}", self.north_arrival_mean);
        eprintln!("  south_arrival_mean:      {:?}", self.south_arrival_mean);
        eprintln!("  pedestrian_arrival_mean: {:?}", self.pedestrian_arrival_mean);
        eprintln!("  car_crossing:            {:?}..={:?}", self.car_crossing.0, self.car_crossing.1);
        eprintln!(
            "  pedestrian_crossing:     {:?}..={:?}",
            self.pedestrian_crossing.0, self.pedestrian_crossing.1
        );
        eprintln!("  time_scale:              {}", self.time_scale);
        match self.seed {
            Some(seed) => eprintln!("  seed:                    {}", seed),
            None => eprintln!("  seed:                    <entropy>"),
        }
    }
}
