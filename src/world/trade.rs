//! Trades and their pickup / drop-off time windows.

use crate::time::SimTime;

use super::id::{CargoType, PortId, TradeId};

// ── Time window ───────────────────────────────────────────────────────

/// The four-point compliance bound of a trade. Any bound may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub earliest_pickup: Option<SimTime>,
    pub latest_pickup: Option<SimTime>,
    pub earliest_drop_off: Option<SimTime>,
    pub latest_drop_off: Option<SimTime>,
}

impl TimeWindow {
    /// A window with no bounds at all.
    pub fn unbounded() -> Self {
        TimeWindow::default()
    }

    /// A window bounding both legs.
    pub fn new(pickup: (f64, f64), drop_off: (f64, f64)) -> Self {
        TimeWindow {
            earliest_pickup: Some(SimTime::new(pickup.0)),
            latest_pickup: Some(SimTime::new(pickup.1)),
            earliest_drop_off: Some(SimTime::new(drop_off.0)),
            latest_drop_off: Some(SimTime::new(drop_off.1)),
        }
    }

    /// Check an arrival at `time` against the applicable leg.
    ///
    /// At most one violation is reported per check; the earliest bound is
    /// checked before the latest.
    pub fn check(&self, time: SimTime, is_pickup: bool) -> Option<TimeWindowViolation> {
        let (earliest, latest, early_bound, late_bound) = if is_pickup {
            (
                self.earliest_pickup,
                self.latest_pickup,
                WindowBound::EarliestPickup,
                WindowBound::LatestPickup,
            )
        } else {
            (
                self.earliest_drop_off,
                self.latest_drop_off,
                WindowBound::EarliestDropOff,
                WindowBound::LatestDropOff,
            )
        };
        if let Some(limit) = earliest.filter(|limit| time < *limit) {
            return Some(TimeWindowViolation { bound: early_bound, time, limit });
        }
        if let Some(limit) = latest.filter(|limit| time > *limit) {
            return Some(TimeWindowViolation { bound: late_bound, time, limit });
        }
        None
    }
}

/// Which of the four bounds was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowBound {
    EarliestPickup,
    LatestPickup,
    EarliestDropOff,
    LatestDropOff,
}

impl std::fmt::Display for WindowBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowBound::EarliestPickup => write!(f, "loading before earliest start"),
            WindowBound::LatestPickup => write!(f, "loading after latest finish"),
            WindowBound::EarliestDropOff => write!(f, "unloading before earliest start"),
            WindowBound::LatestDropOff => write!(f, "unloading after latest finish"),
        }
    }
}

/// A recorded breach of a trade's time window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindowViolation {
    pub bound: WindowBound,
    /// When the arrival happened.
    pub time: SimTime,
    /// The bound that was crossed.
    pub limit: SimTime,
}

impl std::fmt::Display for TimeWindowViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self.bound {
            WindowBound::EarliestPickup | WindowBound::EarliestDropOff => "<",
            WindowBound::LatestPickup | WindowBound::LatestDropOff => ">",
        };
        write!(
            f,
            "{} ({} {} {})",
            self.bound,
            self.time.hours(),
            op,
            self.limit.hours()
        )
    }
}

// ── Trade ─────────────────────────────────────────────────────────────

/// An amount of cargo to move from one port to another.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Trade {
    pub id: TradeId,
    pub origin_port: PortId,
    pub destination_port: PortId,
    pub cargo_type: CargoType,
    pub amount: f64,
    /// When the trade becomes available for auction.
    pub time: SimTime,
    pub time_window: TimeWindow,
}

impl Trade {
    /// A trade available at time zero with no time window.
    pub fn new(
        id: TradeId,
        origin_port: PortId,
        destination_port: PortId,
        cargo_type: CargoType,
        amount: f64,
    ) -> Self {
        Trade {
            id,
            origin_port,
            destination_port,
            cargo_type,
            amount,
            time: SimTime::ZERO,
            time_window: TimeWindow::unbounded(),
        }
    }

    pub fn available_at(mut self, time: SimTime) -> Self {
        self.time = time;
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.time_window = window;
        self
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade {} [{}, {}]: {}->{}",
            self.id, self.cargo_type, self.amount, self.origin_port, self.destination_port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeWindow {
        TimeWindow::new((5.0, 8.0), (20.0, 30.0))
    }

    #[test]
    fn test_inside_window() {
        assert!(window().check(SimTime::new(6.0), true).is_none());
        assert!(window().check(SimTime::new(5.0), true).is_none());
        assert!(window().check(SimTime::new(8.0), true).is_none());
        assert!(window().check(SimTime::new(25.0), false).is_none());
    }

    #[test]
    fn test_late_pickup() {
        let v = window().check(SimTime::new(9.0), true).unwrap();
        assert_eq!(v.bound, WindowBound::LatestPickup);
        assert_eq!(v.limit, SimTime::new(8.0));
        assert_eq!(v.to_string(), "loading after latest finish (9 > 8)");
    }

    #[test]
    fn test_early_drop_off() {
        let v = window().check(SimTime::new(10.0), false).unwrap();
        assert_eq!(v.bound, WindowBound::EarliestDropOff);
    }

    #[test]
    fn test_pickup_bounds_ignore_drop_off_leg() {
        // 25 is fine for drop-off but late for pickup.
        let v = window().check(SimTime::new(25.0), true).unwrap();
        assert_eq!(v.bound, WindowBound::LatestPickup);
    }

    #[test]
    fn test_missing_bounds_never_violate() {
        let open = TimeWindow {
            earliest_pickup: None,
            latest_pickup: Some(SimTime::new(3.0)),
            ..TimeWindow::unbounded()
        };
        assert!(open.check(SimTime::new(0.0), true).is_none());
        assert!(open.check(SimTime::new(1000.0), false).is_none());
        assert!(open.check(SimTime::new(4.0), true).is_some());
    }
}
