//! Time-ordered schedule of pending events.
//!
//! A `BinaryHeap` with reversed `Ord` on [`EventItem`] acts as a min-heap
//! keyed by `(time, seq)`. Sequence numbers are strictly increasing, so
//! events at the same time come out in insertion order and two runs with
//! the same inserts produce the same dispatch order.
//!
//! Removal, purge and lookup go by structural event equality, which has
//! no hashable key: they scan the heap linearly. Insert and extract are
//! the hot path (every simulated event) and stay O(log n); cancellation
//! only happens on replanning, so O(n) there is acceptable.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, warn};

use crate::error::{KernelError, KernelResult};
use crate::event::Event;
use crate::time::SimTime;
use crate::world::{VesselId, World};

// ── EventItem ─────────────────────────────────────────────────────────

/// Queue entry: ordering key plus the owned event.
///
/// The event itself takes no part in ordering.
#[derive(Debug, Clone)]
pub struct EventItem {
    pub time: SimTime,
    seq: u64,
    pub event: Event,
}

impl PartialEq for EventItem {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for EventItem {}

/// Ordering: smallest `(time, seq)` first.
///
/// `BinaryHeap` is a max-heap, so the natural ordering is reversed.
impl Ord for EventItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for EventItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── EventQueue ────────────────────────────────────────────────────────

/// The schedule of not-yet-executed events.
///
/// Never holds an event with a non-finite time.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: BinaryHeap<EventItem>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue::default()
    }

    /// Schedule `event`.
    ///
    /// Runs the event's enqueue hook against `world` first; the item only
    /// becomes visible once the hook has succeeded. On any error the
    /// queue is left unchanged.
    pub fn insert(&mut self, mut event: Event, world: &mut World) -> KernelResult<()> {
        if !event.time().is_finite() {
            return Err(KernelError::InvalidSchedule { time: event.time() });
        }
        if let Some(target) = event.cargo_available_time() {
            if !target.is_finite() {
                return Err(KernelError::InvalidSchedule { time: target });
            }
        }
        event.on_enqueue(world)?;
        debug!(time = %event.time(), kind = event.kind_name(), "added event to queue");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(EventItem {
            time: event.time(),
            seq,
            event,
        });
        Ok(())
    }

    /// Remove and return the earliest event.
    pub fn extract_next(&mut self) -> KernelResult<Event> {
        self.heap
            .pop()
            .map(|item| item.event)
            .ok_or(KernelError::EmptySchedule)
    }

    /// Time of the earliest pending event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|item| item.time)
    }

    /// Remove every entry structurally equal to one of `events`.
    ///
    /// Events not in the queue are skipped with a warning; they have
    /// usually fired already or been cancelled by an earlier replan.
    /// Returns the number of entries removed.
    pub fn remove(&mut self, events: &[Event]) -> usize {
        let mut removed = 0;
        for target in events {
            let before = self.heap.len();
            self.heap.retain(|item| item.event != *target);
            let count = before - self.heap.len();
            if count == 0 {
                warn!(event = %target, "tried to remove event which is not in the queue");
            } else {
                debug!(event = %target, count, "removed event from queue");
            }
            removed += count;
        }
        removed
    }

    /// Single-event form of [`EventQueue::remove`].
    pub fn remove_one(&mut self, event: &Event) -> usize {
        self.remove(std::slice::from_ref(event))
    }

    /// Remove every pending event bound to `vessel`.
    ///
    /// Provisional state the removed events published at enqueue time is
    /// not rolled back. A purged travel leaves the vessel "on journey"
    /// unless something has since moved it; the caller must schedule a
    /// corrective event if that is wrong. The removed events are returned
    /// for exactly that purpose.
    pub fn purge(&mut self, vessel: VesselId, world: &World) -> Vec<Event> {
        let (mut purged, kept): (Vec<EventItem>, Vec<EventItem>) = std::mem::take(&mut self.heap)
            .into_vec()
            .into_iter()
            .partition(|item| item.event.vessel_id() == Some(vessel));
        self.heap = BinaryHeap::from(kept);

        purged.sort_by(|a, b| b.cmp(a));
        for item in &purged {
            if item.event.holds_provisional_location(world) {
                warn!(
                    %vessel,
                    time = %item.time,
                    "purged travel leaves provisional on-journey location in place"
                );
            }
        }
        debug!(%vessel, count = purged.len(), "purged vessel events");
        purged.into_iter().map(|item| item.event).collect()
    }

    /// `true` if an event structurally equal to `event` is pending.
    pub fn contains(&self, event: &Event) -> bool {
        self.heap.iter().any(|item| item.event == *event)
    }

    /// The pending instance structurally equal to `event`.
    pub fn lookup(&self, event: &Event) -> KernelResult<&Event> {
        self.heap
            .iter()
            .map(|item| &item.event)
            .find(|candidate| *candidate == event)
            .ok_or_else(|| KernelError::NotFound(event.to_string()))
    }

    /// Pending events in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.heap.iter().map(|item| &item.event)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drain all events in dispatch order. Useful for tests and snapshots.
    pub fn drain_ordered(&mut self) -> Vec<Event> {
        let mut events = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.heap.pop() {
            events.push(item.event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{DistanceTable, Location, PortId, Vessel};
    use proptest::prelude::*;

    fn t(hours: f64) -> SimTime {
        SimTime::new(hours)
    }

    fn world() -> World {
        World::new(Box::new(DistanceTable::new().with_route("A", "B", 100.0)))
            .with_vessel(Vessel::new(VesselId::new(1), "Aurora", Location::port("A")))
            .with_vessel(Vessel::new(VesselId::new(2), "Borealis", Location::port("B")))
    }

    fn idle(at: f64, vessel: u64) -> Event {
        Event::idle(t(at), VesselId::new(vessel), Location::port("A"))
    }

    #[test]
    fn test_time_ordering() {
        let mut w = world();
        let mut q = EventQueue::new();
        q.insert(Event::cargo_auction(t(30.0)), &mut w).unwrap();
        q.insert(Event::cargo_auction(t(10.0)), &mut w).unwrap();
        q.insert(Event::cargo_auction(t(20.0)), &mut w).unwrap();

        assert_eq!(q.peek_time(), Some(t(10.0)));
        assert_eq!(q.extract_next().unwrap().time(), t(10.0));
        assert_eq!(q.extract_next().unwrap().time(), t(20.0));
        assert_eq!(q.extract_next().unwrap().time(), t(30.0));
    }

    #[test]
    fn test_fifo_at_same_time() {
        let mut w = world();
        let mut q = EventQueue::new();
        for label in ["first", "second", "third"] {
            let mut e = Event::cargo_auction(t(10.0));
            e.set_info(label);
            q.insert(e, &mut w).unwrap();
        }
        let labels: Vec<_> = q
            .drain_ordered()
            .iter()
            .map(|e| e.info().unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_queue() {
        let mut q = EventQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.extract_next().unwrap_err(), KernelError::EmptySchedule);
        assert_eq!(q.peek_time(), None);
    }

    #[test]
    fn test_infinite_time_rejected() {
        let mut w = world();
        let mut q = EventQueue::new();
        q.insert(idle(1.0, 1), &mut w).unwrap();

        let err = q.insert(Event::cargo_auction(SimTime::INFINITY), &mut w).unwrap_err();
        assert_eq!(err, KernelError::InvalidSchedule { time: SimTime::INFINITY });
        assert!(q.insert(Event::cargo_auction(t(f64::NAN)), &mut w).is_err());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_non_finite_announcement_target_rejected() {
        let mut w = world();
        let mut q = EventQueue::new();
        let err = q
            .insert(Event::cargo_announcement(t(0.0), SimTime::INFINITY), &mut w)
            .unwrap_err();
        assert_eq!(err, KernelError::InvalidSchedule { time: SimTime::INFINITY });
        assert!(q
            .insert(Event::first_cargo_announcement(t(0.0), t(f64::NAN)), &mut w)
            .is_err());
        assert!(q.is_empty());

        q.insert(Event::cargo_announcement(t(0.0), t(720.0)), &mut w).unwrap();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_infinite_travel_leaves_vessel_in_port() {
        let mut w = world();
        let mut q = EventQueue::new();
        let travel = Event::travel(SimTime::INFINITY, VesselId::new(1), PortId::new("A"), PortId::new("B"));
        assert!(q.insert(travel, &mut w).is_err());
        assert_eq!(w.vessels().get(VesselId::new(1)).unwrap().location(), &Location::port("A"));
    }

    #[test]
    fn test_unknown_vessel_rejected() {
        let mut w = world();
        let mut q = EventQueue::new();
        let err = q.insert(idle(1.0, 42), &mut w).unwrap_err();
        assert_eq!(err, KernelError::UnknownVessel(VesselId::new(42)));
        assert!(q.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut w = world();
        let mut q = EventQueue::new();
        q.insert(idle(1.0, 1), &mut w).unwrap();
        q.insert(idle(2.0, 1), &mut w).unwrap();

        assert_eq!(q.remove_one(&idle(3.0, 1)), 0);
        assert_eq!(q.len(), 2);
        assert_eq!(q.extract_next().unwrap(), idle(1.0, 1));
    }

    #[test]
    fn test_remove_by_structure() {
        let mut w = world();
        let mut q = EventQueue::new();
        q.insert(idle(1.0, 1), &mut w).unwrap();
        q.insert(idle(2.0, 1), &mut w).unwrap();
        q.insert(idle(2.0, 2), &mut w).unwrap();

        // A freshly built, never-enqueued event removes the enqueued twin.
        assert_eq!(q.remove(&[idle(2.0, 1), idle(9.0, 1)]), 1);
        assert!(!q.contains(&idle(2.0, 1)));
        assert!(q.contains(&idle(2.0, 2)));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_remove_takes_every_duplicate() {
        let mut w = world();
        let mut q = EventQueue::new();
        q.insert(idle(1.0, 1), &mut w).unwrap();
        q.insert(idle(1.0, 1), &mut w).unwrap();
        assert_eq!(q.remove_one(&idle(1.0, 1)), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn test_lookup() {
        let mut w = world();
        w.set_current_time(t(3.0));
        let mut q = EventQueue::new();
        q.insert(Event::travel(t(10.0), VesselId::new(1), PortId::new("A"), PortId::new("B")), &mut w)
            .unwrap();

        let probe = Event::travel(t(10.0), VesselId::new(1), PortId::new("A"), PortId::new("B"));
        assert_eq!(probe.time_started(), None);
        let found = q.lookup(&probe).unwrap();
        assert_eq!(found.time_started(), Some(t(3.0)));

        let missing = Event::cargo_auction(t(10.0));
        assert!(matches!(q.lookup(&missing), Err(KernelError::NotFound(_))));
    }

    #[test]
    fn test_purge_only_touches_one_vessel() {
        let mut w = world();
        let mut q = EventQueue::new();
        q.insert(idle(1.0, 1), &mut w).unwrap();
        q.insert(idle(2.0, 2), &mut w).unwrap();
        q.insert(Event::cargo_auction(t(2.5)), &mut w).unwrap();
        q.insert(idle(3.0, 1), &mut w).unwrap();
        q.insert(idle(4.0, 2), &mut w).unwrap();

        let purged = q.purge(VesselId::new(1), &w);
        assert_eq!(purged.len(), 2);
        assert_eq!(purged[0].time(), t(1.0));
        assert_eq!(purged[1].time(), t(3.0));

        let rest: Vec<_> = q.drain_ordered().iter().map(|e| e.time()).collect();
        assert_eq!(rest, vec![t(2.0), t(2.5), t(4.0)]);
    }

    #[test]
    fn test_iter_sees_everything() {
        let mut w = world();
        let mut q = EventQueue::new();
        q.insert(idle(5.0, 1), &mut w).unwrap();
        q.insert(idle(1.0, 2), &mut w).unwrap();
        let mut times: Vec<_> = q.iter().map(|e| e.time()).collect();
        times.sort();
        assert_eq!(times, vec![t(1.0), t(5.0)]);
    }

    proptest! {
        #[test]
        fn prop_extract_is_non_decreasing_and_stable(
            times in proptest::collection::vec(0u32..50, 0..64)
        ) {
            let mut w = world();
            let mut q = EventQueue::new();
            for (i, at) in times.iter().enumerate() {
                let mut e = Event::cargo_auction(t(f64::from(*at)));
                e.set_info(i.to_string());
                q.insert(e, &mut w).unwrap();
            }
            let out = q.drain_ordered();
            prop_assert_eq!(out.len(), times.len());
            for pair in out.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.time() <= b.time());
                if a.time() == b.time() {
                    let ia: usize = a.info().unwrap().parse().unwrap();
                    let ib: usize = b.info().unwrap().parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }

        #[test]
        fn prop_purge_removes_exactly_one_vessels_events(
            owners in proptest::collection::vec(prop_oneof![Just(1u64), Just(2u64), Just(0u64)], 0..48)
        ) {
            let mut w = world();
            let mut q = EventQueue::new();
            let mut expected_others = Vec::new();
            for (i, owner) in owners.iter().enumerate() {
                let at = t((i / 3) as f64);
                let mut e = match owner {
                    0 => Event::cargo_auction(at),
                    v => Event::idle(at, VesselId::new(*v), Location::port("A")),
                };
                e.set_info(i.to_string());
                if *owner != 1 {
                    expected_others.push(i.to_string());
                }
                q.insert(e, &mut w).unwrap();
            }

            let n = owners.iter().filter(|o| **o == 1).count();
            let purged = q.purge(VesselId::new(1), &w);
            prop_assert_eq!(purged.len(), n);
            prop_assert!(purged.iter().all(|e| e.vessel_id() == Some(VesselId::new(1))));

            let rest: Vec<String> = q
                .drain_ordered()
                .iter()
                .map(|e| e.info().unwrap().to_string())
                .collect();
            prop_assert_eq!(rest, expected_others);
        }
    }
}
