//! Bridge occupancy state
//!
//! Plain data guarded by the monitor's lock. Nothing in this module
//! synchronizes; every method assumes the caller holds the lock.

use core::fmt;

/// Travel direction of a car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
}

impl Direction {
    /// The direction that conflicts with this one
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three classes sharing the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traffic {
    Car(Direction),
    Pedestrian,
}

impl Traffic {
    pub const NORTH: Traffic = Traffic::Car(Direction::North);
    pub const SOUTH: Traffic = Traffic::Car(Direction::South);
}

impl fmt::Display for Traffic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traffic::Car(dir) => write!(f, "car-{}", dir),
            Traffic::Pedestrian => f.write_str("pedestrian"),
        }
    }
}

/// Occupancy and waiting counters
///
/// Outside the monitor's critical sections at most one of
/// `cars_north`, `cars_south` and `pedestrians` is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeState {
    pub cars_north: u32,
    pub cars_south: u32,
    pub pedestrians: u32,
    pub cars_north_waiting: u32,
    pub cars_south_waiting: u32,
    pub pedestrians_waiting: u32,
}

impl BridgeState {
    pub const fn new() -> Self {
        Self {
            cars_north: 0,
            cars_south: 0,
            pedestrians: 0,
            cars_north_waiting: 0,
            cars_south_waiting: 0,
            pedestrians_waiting: 0,
        }
    }

    /// Occupants of `class` currently on the bridge
    #[inline]
    pub fn on_bridge(&self, class: Traffic) -> u32 {
        match class {
            Traffic::Car(Direction::North) => self.cars_north,
            Traffic::Car(Direction::South) => self.cars_south,
            Traffic::Pedestrian => self.pedestrians,
        }
    }

    /// Callers of `class` blocked in their entry wait
    #[inline]
    pub fn waiting(&self, class: Traffic) -> u32 {
        match class {
            Traffic::Car(Direction::North) => self.cars_north_waiting,
            Traffic::Car(Direction::South) => self.cars_south_waiting,
            Traffic::Pedestrian => self.pedestrians_waiting,
        }
    }

    pub(crate) fn on_bridge_mut(&mut self, class: Traffic) -> &mut u32 {
        match class {
            Traffic::Car(Direction::North) => &mut self.cars_north,
            Traffic::Car(Direction::South) => &mut self.cars_south,
            Traffic::Pedestrian => &mut self.pedestrians,
        }
    }

    pub(crate) fn waiting_mut(&mut self, class: Traffic) -> &mut u32 {
        match class {
            Traffic::Car(Direction::North) => &mut self.cars_north_waiting,
            Traffic::Car(Direction::South) => &mut self.cars_south_waiting,
            Traffic::Pedestrian => &mut self.pedestrians_waiting,
        }
    }

    /// No pedestrians and no oncoming cars
    #[inline]
    pub fn car_may_enter(&self, dir: Direction) -> bool {
        self.pedestrians == 0 && self.on_bridge(Traffic::Car(dir.opposite())) == 0
    }

    /// No cars in either direction
    #[inline]
    pub fn pedestrian_may_enter(&self) -> bool {
        self.cars_north == 0 && self.cars_south == 0
    }

    /// Entry predicate for any class
    #[inline]
    pub fn may_enter(&self, class: Traffic) -> bool {
        match class {
            Traffic::Car(dir) => self.car_may_enter(dir),
            Traffic::Pedestrian => self.pedestrian_may_enter(),
        }
    }

    /// Class to broadcast to once the last occupant of `emptied` has left.
    ///
    /// North empty prefers south cars, then pedestrians. South empty
    /// prefers pedestrians, then north cars. Pedestrians empty prefers
    /// north cars, then south cars. The cycle is asymmetric on purpose
    /// and must not be replaced by a first-come rule.
    pub fn wake_after_empty(&self, emptied: Traffic) -> Traffic {
        match emptied {
            Traffic::Car(Direction::North) => {
                if self.cars_south_waiting > 0 {
                    Traffic::SOUTH
                } else {
                    Traffic::Pedestrian
                }
            }
            Traffic::Car(Direction::South) => {
                if self.pedestrians_waiting > 0 {
                    Traffic::Pedestrian
                } else {
                    Traffic::NORTH
                }
            }
            Traffic::Pedestrian => {
                if self.cars_north_waiting > 0 {
                    Traffic::NORTH
                } else {
                    Traffic::SOUTH
                }
            }
        }
    }

    /// At most one class occupies the bridge
    pub fn is_exclusive(&self) -> bool {
        let occupied = [self.cars_north, self.cars_south, self.pedestrians]
            .iter()
            .filter(|&&n| n > 0)
            .count();
        occupied <= 1
    }

    /// Every counter is zero
    pub fn is_idle(&self) -> bool {
        *self == Self::new()
    }
}

/// Copy of the counters taken under the lock, for logging only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeSnapshot(pub BridgeState);

impl BridgeSnapshot {
    #[inline]
    pub fn state(&self) -> &BridgeState {
        &self.0
    }

    pub fn is_idle(&self) -> bool {
        self.0.is_idle()
    }
}

impl fmt::Display for BridgeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.0;
        write!(
            f,
            "Bridge<north:{} north_w:{} south:{} south_w:{} ped:{} ped_w:{}>",
            s.cars_north,
            s.cars_north_waiting,
            s.cars_south,
            s.cars_south_waiting,
            s.pedestrians,
            s.pedestrians_waiting,
        )
    }
}

/// Admission counts and peak occupancy per class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossingStats {
    pub north_admitted: u64,
    pub south_admitted: u64,
    pub pedestrians_admitted: u64,
    pub peak_north: u32,
    pub peak_south: u32,
    pub peak_pedestrians: u32,
}

impl CrossingStats {
    pub(crate) fn record_entry(&mut self, class: Traffic, occupancy: u32) {
        let (admitted, peak) = match class {
            Traffic::Car(Direction::North) => (&mut self.north_admitted, &mut self.peak_north),
            Traffic::Car(Direction::South) => (&mut self.south_admitted, &mut self.peak_south),
            Traffic::Pedestrian => (&mut self.pedestrians_admitted, &mut self.peak_pedestrians),
        };
        *admitted += 1;
        *peak = (*peak).max(occupancy);
    }

    pub fn admitted(&self, class: Traffic) -> u64 {
        match class {
            Traffic::Car(Direction::North) => self.north_admitted,
            Traffic::Car(Direction::South) => self.south_admitted,
            Traffic::Pedestrian => self.pedestrians_admitted,
        }
    }

    pub fn peak(&self, class: Traffic) -> u32 {
        match class {
            Traffic::Car(Direction::North) => self.peak_north,
            Traffic::Car(Direction::South) => self.peak_south,
            Traffic::Pedestrian => self.peak_pedestrians,
        }
    }

    pub fn total_admitted(&self) -> u64 {
        self.north_admitted + self.south_admitted + self.pedestrians_admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(north: u32, south: u32, ped: u32) -> BridgeState {
        BridgeState {
            cars_north: north,
            cars_south: south,
            pedestrians: ped,
            ..BridgeState::new()
        }
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::South.opposite(), Direction::North);
    }

    #[test]
    fn test_car_predicate() {
        assert!(state(0, 0, 0).car_may_enter(Direction::North));
        // Same direction never blocks
        assert!(state(3, 0, 0).car_may_enter(Direction::North));
        assert!(!state(0, 1, 0).car_may_enter(Direction::North));
        assert!(!state(0, 0, 1).car_may_enter(Direction::North));
        assert!(state(0, 2, 0).car_may_enter(Direction::South));
        assert!(!state(1, 0, 0).car_may_enter(Direction::South));
    }

    #[test]
    fn test_pedestrian_predicate() {
        assert!(state(0, 0, 0).pedestrian_may_enter());
        assert!(state(0, 0, 4).pedestrian_may_enter());
        assert!(!state(1, 0, 0).pedestrian_may_enter());
        assert!(!state(0, 1, 0).pedestrian_may_enter());
    }

    #[test]
    fn test_wake_after_north_empty() {
        let mut s = BridgeState::new();
        s.cars_south_waiting = 1;
        s.pedestrians_waiting = 1;
        assert_eq!(s.wake_after_empty(Traffic::NORTH), Traffic::SOUTH);

        s.cars_south_waiting = 0;
        assert_eq!(s.wake_after_empty(Traffic::NORTH), Traffic::Pedestrian);
    }

    #[test]
    fn test_wake_after_south_empty() {
        let mut s = BridgeState::new();
        s.cars_north_waiting = 2;
        s.pedestrians_waiting = 1;
        assert_eq!(s.wake_after_empty(Traffic::SOUTH), Traffic::Pedestrian);

        s.pedestrians_waiting = 0;
        assert_eq!(s.wake_after_empty(Traffic::SOUTH), Traffic::NORTH);
    }

    #[test]
    fn test_wake_after_pedestrians_empty() {
        let mut s = BridgeState::new();
        s.cars_north_waiting = 1;
        s.cars_south_waiting = 5;
        assert_eq!(s.wake_after_empty(Traffic::Pedestrian), Traffic::NORTH);

        s.cars_north_waiting = 0;
        assert_eq!(s.wake_after_empty(Traffic::Pedestrian), Traffic::SOUTH);
    }

    #[test]
    fn test_exclusive() {
        assert!(state(0, 0, 0).is_exclusive());
        assert!(state(5, 0, 0).is_exclusive());
        assert!(state(0, 0, 2).is_exclusive());
        assert!(!state(1, 1, 0).is_exclusive());
        assert!(!state(1, 0, 1).is_exclusive());
    }

    #[test]
    fn test_snapshot_display() {
        let mut s = state(2, 0, 0);
        s.pedestrians_waiting = 1;
        let snap = BridgeSnapshot(s);
        assert_eq!(
            snap.to_string(),
            "Bridge<north:2 north_w:0 south:0 south_w:0 ped:0 ped_w:1>"
        );
        assert!(!snap.is_idle());
        assert!(BridgeSnapshot::default().is_idle());
    }

    #[test]
    fn test_stats_peak() {
        let mut stats = CrossingStats::default();
        stats.record_entry(Traffic::NORTH, 1);
        stats.record_entry(Traffic::NORTH, 2);
        stats.record_entry(Traffic::NORTH, 1);
        stats.record_entry(Traffic::Pedestrian, 1);
        assert_eq!(stats.admitted(Traffic::NORTH), 3);
        assert_eq!(stats.peak(Traffic::NORTH), 2);
        assert_eq!(stats.peak(Traffic::SOUTH), 0);
        assert_eq!(stats.total_admitted(), 4);
    }
}
