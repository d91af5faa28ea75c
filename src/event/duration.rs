//! Duration tracking for events that span an interval.
//!
//! A duration event ends at its scheduled time. It starts when it is
//! enqueued, unless it was enqueued for a time already in the past, in
//! which case it is taken to have started (and ended) at its own time.

use crate::time::SimTime;

/// When the activity behind an event started. `None` until enqueued.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationState {
    started_at: Option<SimTime>,
}

impl DurationState {
    /// An unstarted state.
    pub fn new() -> Self {
        DurationState { started_at: None }
    }

    /// Fix the start at `min(event_time, now)`.
    pub fn mark_started(&mut self, event_time: SimTime, now: SimTime) {
        self.started_at = Some(event_time.min(now));
    }

    pub fn started_at(&self) -> Option<SimTime> {
        self.started_at
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Hours between the start and `event_time`; zero while unstarted.
    pub fn elapsed(&self, event_time: SimTime) -> f64 {
        match self.started_at {
            Some(start) => event_time.since(start),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstarted() {
        let d = DurationState::new();
        assert!(!d.has_started());
        assert_eq!(d.started_at(), None);
        assert_eq!(d.elapsed(SimTime::new(50.0)), 0.0);
    }

    #[test]
    fn test_starts_now_for_future_event() {
        let mut d = DurationState::new();
        d.mark_started(SimTime::new(50.0), SimTime::new(20.0));
        assert_eq!(d.started_at(), Some(SimTime::new(20.0)));
        assert_eq!(d.elapsed(SimTime::new(50.0)), 30.0);
    }

    #[test]
    fn test_starts_at_own_time_for_past_event() {
        let mut d = DurationState::new();
        d.mark_started(SimTime::new(10.0), SimTime::new(20.0));
        assert_eq!(d.started_at(), Some(SimTime::new(10.0)));
        assert_eq!(d.elapsed(SimTime::new(10.0)), 0.0);
    }

    #[test]
    fn test_equal_times() {
        let mut d = DurationState::new();
        d.mark_started(SimTime::new(20.0), SimTime::new(20.0));
        assert_eq!(d.started_at(), Some(SimTime::new(20.0)));
    }
}
