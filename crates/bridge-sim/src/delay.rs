//! Timing policies for arrivals and crossings
//!
//! Generators and workers only ever ask a [`DelayPolicy`] how long to
//! wait, so tests can swap in [`Fixed`] durations without touching the
//! monitor.

use std::fmt;
use std::time::Duration;

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::Rng;

/// Source of delays
pub trait DelayPolicy: Send + Sync + fmt::Debug {
    fn next_delay(&self, rng: &mut StdRng) -> Duration;
}

/// Exponentially distributed delay (Poisson arrivals)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    mean: Duration,
}

impl Exponential {
    pub fn new(mean: Duration) -> Self {
        Self { mean }
    }

    pub fn mean(&self) -> Duration {
        self.mean
    }
}

impl Distribution<Duration> for Exponential {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.mean.is_zero() {
            return Duration::ZERO;
        }
        // Inverse CDF. `1 - u` lies in (0, 1], so the log is finite.
        let u: f64 = rng.gen();
        let x = -(1.0 - u).ln() * self.mean.as_secs_f64();
        Duration::try_from_secs_f64(x).unwrap_or(Duration::MAX)
    }
}

impl DelayPolicy for Exponential {
    fn next_delay(&self, rng: &mut StdRng) -> Duration {
        self.sample(rng)
    }
}

/// Uniformly distributed delay over a closed range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    low: Duration,
    high: Duration,
}

impl Uniform {
    /// Bounds may be given in either order
    pub fn new(a: Duration, b: Duration) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.low, self.high)
    }
}

impl Distribution<Duration> for Uniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.low == self.high {
            return self.low;
        }
        rng.gen_range(self.low..=self.high)
    }
}

impl DelayPolicy for Uniform {
    fn next_delay(&self, rng: &mut StdRng) -> Duration {
        self.sample(rng)
    }
}

/// Always the same delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub Duration);

impl Fixed {
    pub const ZERO: Fixed = Fixed(Duration::ZERO);
}

impl DelayPolicy for Fixed {
    fn next_delay(&self, _rng: &mut StdRng) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_fixed() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Fixed::ZERO.next_delay(&mut rng), Duration::ZERO);
        assert_eq!(Fixed(Duration::from_millis(3)).next_delay(&mut rng), Duration::from_millis(3));
    }

    #[test]
    fn test_uniform_bounds() {
        let mut rng = StdRng::seed_from_u64(0xB41D6E);
        let policy = Uniform::new(Duration::from_millis(1_000), Duration::from_millis(500));
        assert_eq!(policy.bounds(), (Duration::from_millis(500), Duration::from_millis(1_000)));

        for _ in 0..1_000 {
            let d = policy.next_delay(&mut rng);
            assert!(d >= Duration::from_millis(500) && d <= Duration::from_millis(1_000));
        }
    }

    #[test]
    fn test_uniform_degenerate() {
        let mut rng = StdRng::seed_from_u64(2);
        let policy = Uniform::new(Duration::from_millis(4), Duration::from_millis(4));
        assert_eq!(policy.next_delay(&mut rng), Duration::from_millis(4));
    }

    #[test]
    fn test_exponential_zero_mean() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(Exponential::new(Duration::ZERO).next_delay(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_exponential_mean() {
        let mut rng = StdRng::seed_from_u64(12345);
        let policy = Exponential::new(Duration::from_millis(500));

        let n = 20_000;
        let total: f64 = (0..n).map(|_| policy.next_delay(&mut rng).as_secs_f64()).sum();
        let mean = total / n as f64;

        // Standard error is 0.5 / sqrt(20000) ~ 0.0035s
        assert!((mean - 0.5).abs() < 0.025, "sample mean {}", mean);
    }

    #[test]
    fn test_exponential_huge_mean_saturates() {
        let mut rng = StdRng::seed_from_u64(4);
        let policy = Exponential::new(Duration::MAX);
        for _ in 0..100 {
            // Must not panic; large draws clamp to Duration::MAX
            let _ = policy.next_delay(&mut rng);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let policy = Exponential::new(Duration::from_secs(1));
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(policy.next_delay(&mut a), policy.next_delay(&mut b));
        }
    }
}
