//! Bridge monitor
//!
//! One `std::sync::Mutex` guards the whole `BridgeState`; three condition
//! variables (north cars, south cars, pedestrians) share that lock.
//! Entry blocks in a predicate loop, leave never blocks.
//!
//! The last occupant of a class to leave broadcasts to exactly one other
//! class, chosen by [`BridgeState::wake_after_empty`]. Waiters of the
//! class that was not chosen stay parked until some later leave picks
//! them.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::state::{BridgeSnapshot, BridgeState, CrossingStats, Direction, Traffic};

struct Inner {
    state: BridgeState,
    stats: CrossingStats,
}

/// Arbitrates entry to a single-lane bridge
///
/// Cars heading the same way share the bridge freely. Oncoming cars and
/// pedestrians exclude each other.
///
/// # Example
///
/// ```
/// use bridge_core::{BridgeMonitor, Direction};
///
/// let monitor = BridgeMonitor::new();
/// {
///     let _permit = monitor.cross_car(Direction::North);
///     assert_eq!(monitor.snapshot().state().cars_north, 1);
/// } // permit dropped, car has left
/// assert!(monitor.snapshot().is_idle());
/// ```
pub struct BridgeMonitor {
    inner: Mutex<Inner>,
    ok_north: Condvar,
    ok_south: Condvar,
    ok_pedestrian: Condvar,
}

impl BridgeMonitor {
    /// Create an empty bridge
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BridgeState::new(),
                stats: CrossingStats::default(),
            }),
            ok_north: Condvar::new(),
            ok_south: Condvar::new(),
            ok_pedestrian: Condvar::new(),
        }
    }

    // No critical section panics, so a poisoned lock still holds
    // consistent counters.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn gate(&self, class: Traffic) -> &Condvar {
        match class {
            Traffic::Car(Direction::North) => &self.ok_north,
            Traffic::Car(Direction::South) => &self.ok_south,
            Traffic::Pedestrian => &self.ok_pedestrian,
        }
    }

    /// Block until `class` may use the bridge, then occupy one slot
    pub fn enter(&self, class: Traffic) {
        let gate = self.gate(class);
        let mut guard = self.lock();

        *guard.state.waiting_mut(class) += 1;
        while !guard.state.may_enter(class) {
            guard = gate.wait(guard).unwrap_or_else(PoisonError::into_inner);
        }
        *guard.state.waiting_mut(class) -= 1;

        let occupancy = {
            let slot = guard.state.on_bridge_mut(class);
            *slot += 1;
            *slot
        };
        guard.stats.record_entry(class, occupancy);

        debug_assert!(guard.state.is_exclusive(), "{} entered a shared bridge", class);
    }

    /// Release one slot of `class`
    ///
    /// The caller must hold a slot of `class`. Leaving an empty class is
    /// a contract violation; debug builds assert, release builds leave
    /// the counter at zero.
    pub fn leave(&self, class: Traffic) {
        let mut guard = self.lock();

        let remaining = {
            let slot = guard.state.on_bridge_mut(class);
            debug_assert!(*slot > 0, "{} left an empty bridge", class);
            *slot = slot.saturating_sub(1);
            *slot
        };

        if remaining == 0 {
            let next = guard.state.wake_after_empty(class);
            crate::ktrace!("last {} left, waking {}", class, next);
            self.gate(next).notify_all();
        }
    }

    /// Block until a car heading `dir` may cross
    #[inline]
    pub fn request_enter_car(&self, dir: Direction) {
        self.enter(Traffic::Car(dir));
    }

    /// A car heading `dir` leaves the bridge
    #[inline]
    pub fn leave_car(&self, dir: Direction) {
        self.leave(Traffic::Car(dir));
    }

    /// Block until a pedestrian may cross
    #[inline]
    pub fn request_enter_pedestrian(&self) {
        self.enter(Traffic::Pedestrian);
    }

    /// A pedestrian leaves the bridge
    #[inline]
    pub fn leave_pedestrian(&self) {
        self.leave(Traffic::Pedestrian);
    }

    /// Enter and return a permit that leaves when dropped
    pub fn cross(&self, class: Traffic) -> CrossingPermit<'_> {
        self.enter(class);
        CrossingPermit { monitor: self, class }
    }

    #[inline]
    pub fn cross_car(&self, dir: Direction) -> CrossingPermit<'_> {
        self.cross(Traffic::Car(dir))
    }

    #[inline]
    pub fn cross_pedestrian(&self) -> CrossingPermit<'_> {
        self.cross(Traffic::Pedestrian)
    }

    /// Read all six counters at once
    ///
    /// Stale as soon as it returns. Use for logging, never for deciding
    /// whether to enter.
    pub fn snapshot(&self) -> BridgeSnapshot {
        BridgeSnapshot(self.lock().state)
    }

    /// Admission totals and peak occupancy so far
    pub fn stats(&self) -> CrossingStats {
        self.lock().stats
    }
}

impl Default for BridgeMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BridgeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeMonitor")
            .field("state", &self.snapshot().0)
            .finish()
    }
}

/// A held crossing slot
///
/// Leaves the bridge when dropped, including during unwinding.
#[must_use = "dropping the permit leaves the bridge immediately"]
pub struct CrossingPermit<'a> {
    monitor: &'a BridgeMonitor,
    class: Traffic,
}

impl<'a> CrossingPermit<'a> {
    pub fn class(&self) -> Traffic {
        self.class
    }

    /// Leave now instead of at end of scope
    pub fn leave(self) {
        drop(self);
    }
}

impl<'a> Drop for CrossingPermit<'a> {
    fn drop(&mut self) {
        self.monitor.leave(self.class);
    }
}

impl<'a> std::fmt::Debug for CrossingPermit<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossingPermit")
            .field("class", &self.class)
            .finish()
    }
}
