//! Simulated time for the maritime kernel.
//!
//! Represents an instant on the simulation clock, measured in hours since
//! the start of the run. Time advances only when the driver executes
//! events, never from wall-clock observation.

use std::cmp::Ordering;

/// An instant in simulation time.
///
/// Wraps an `f64` but is totally ordered (via [`f64::total_cmp`]) so it
/// can key the event heap. Non-finite values can be constructed, but the
/// event queue refuses to schedule them.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(f64);

impl SimTime {
    /// The zero-point of simulation time.
    pub const ZERO: SimTime = SimTime(0.0);

    /// Positive infinity. Never schedulable.
    pub const INFINITY: SimTime = SimTime(f64::INFINITY);

    /// Create a new `SimTime` from a raw number of hours.
    #[inline]
    pub fn new(hours: f64) -> Self {
        SimTime(hours)
    }

    /// Return the raw value in hours.
    #[inline]
    pub fn hours(self) -> f64 {
        self.0
    }

    /// `true` unless the value is infinite or NaN.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// The instant `delta` hours after `self`.
    #[inline]
    pub fn plus(self, delta: f64) -> SimTime {
        SimTime(self.0 + delta)
    }

    /// Returns `true` if `self` is strictly before `other`.
    #[inline]
    pub fn is_before(self, other: SimTime) -> bool {
        self < other
    }

    /// Hours elapsed between `earlier` and `self`. Negative if `earlier`
    /// is actually later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<f64> for SimTime {
    fn from(hours: f64) -> Self {
        SimTime(hours)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.0.is_finite() {
            return write!(f, "T={}", self.0);
        }
        let days = (self.0 / 24.0).floor();
        let hours = self.0 - days * 24.0;
        write!(f, "T={:.3} [{}d {:.1}h]", self.0, days, hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(SimTime::ZERO.hours(), 0.0);
    }

    #[test]
    fn test_ordering() {
        let t1 = SimTime::new(10.5);
        let t2 = SimTime::new(20.0);
        assert!(t1 < t2);
        assert!(t1.is_before(t2));
        assert!(!t2.is_before(t1));
        assert!(t2 < SimTime::INFINITY);
    }

    #[test]
    fn test_plus_and_since() {
        let t = SimTime::new(100.0);
        assert_eq!(t.plus(50.0), SimTime::new(150.0));
        assert_eq!(t.plus(50.0).since(t), 50.0);
        assert_eq!(t.since(t.plus(50.0)), -50.0);
    }

    #[test]
    fn test_finiteness() {
        assert!(SimTime::new(3.0).is_finite());
        assert!(!SimTime::INFINITY.is_finite());
        assert!(!SimTime::new(f64::NAN).is_finite());
        assert!(!SimTime::new(f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn test_display() {
        let t = SimTime::new(30.0);
        assert_eq!(format!("{}", t), "T=30.000 [1d 6.0h]");
        assert_eq!(format!("{}", SimTime::INFINITY), "T=inf");
    }

    #[test]
    fn test_equality() {
        assert_eq!(SimTime::new(99.0), SimTime::from(99.0));
        assert_ne!(SimTime::new(99.0), SimTime::new(99.5));
    }
}
