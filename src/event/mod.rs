//! Event taxonomy for the maritime kernel.
//!
//! Every state change in the simulated world is an [`Event`]: a time, a
//! diagnostic label, and one variant of the closed [`EventKind`] set.
//! Each kind defines two hooks with a fixed calling contract:
//!
//! 1. [`Event::on_enqueue`] runs exactly once, when the event is inserted
//!    into the queue and before it can be extracted. Vessel events fix
//!    their start time here; travel publishes the provisional
//!    "on journey" location.
//! 2. [`Event::on_execute`] runs exactly once, when the driver extracts
//!    the event as the earliest pending one. It publishes durable state
//!    and returns the payload forwarded to observers.
//!
//! Equality is structural (see [`Event`]'s `PartialEq`), which is what
//! the queue uses for removal and lookup.
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`duration`] | [`DurationState`] |
//! | [`vessel`] | [`VesselEvent`], [`VesselActivity`], [`Voyage`], [`CargoLeg`] |
//! | `announcement` | announcement and auction execution |

mod announcement;
pub mod duration;
pub mod vessel;

pub use duration::DurationState;
pub use vessel::{CargoLeg, VesselActivity, VesselEvent, Voyage};

use crate::error::KernelResult;
use crate::observer::ActionData;
use crate::simulation::ExecutionContext;
use crate::time::SimTime;
use crate::world::{Location, Network, PortId, Trade, VesselId, World};

// ── Event kind ────────────────────────────────────────────────────────

/// The closed set of event variants.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Announce the trades that become available at `cargo_available_time`.
    CargoAnnouncement { cargo_available_time: SimTime },
    /// Bootstrap announcement; also seeds the auction at time zero.
    FirstCargoAnnouncement { cargo_available_time: SimTime },
    /// Auction the trades that become available at the event's time.
    CargoAuction,
    /// Something happening to a vessel.
    Vessel(VesselEvent),
}

// ── Event ─────────────────────────────────────────────────────────────

/// A single scheduled occurrence.
#[derive(Debug, Clone)]
pub struct Event {
    time: SimTime,
    info: Option<String>,
    kind: EventKind,
}

impl Event {
    /// Wrap a kind into an event with no label.
    pub fn new(time: SimTime, kind: EventKind) -> Self {
        Event {
            time,
            info: None,
            kind,
        }
    }

    pub fn cargo_announcement(time: SimTime, cargo_available_time: SimTime) -> Self {
        Event::new(time, EventKind::CargoAnnouncement { cargo_available_time })
    }

    pub fn first_cargo_announcement(time: SimTime, cargo_available_time: SimTime) -> Self {
        Event::new(time, EventKind::FirstCargoAnnouncement { cargo_available_time })
    }

    pub fn cargo_auction(time: SimTime) -> Self {
        Event::new(time, EventKind::CargoAuction)
    }

    pub fn location_information(time: SimTime, vessel: VesselId, location: Location) -> Self {
        let info = format!("{} in {}", vessel, location);
        Event::vessel(time, vessel, VesselActivity::LocationInformation { location }, info)
    }

    pub fn travel(time: SimTime, vessel: VesselId, origin: PortId, destination: PortId) -> Self {
        let info = format!("{} travel ({}: {}->{})", destination, vessel, origin, destination);
        Event::vessel(
            time,
            vessel,
            VesselActivity::Travel(Voyage::new(origin, destination)),
            info,
        )
    }

    pub fn idle(time: SimTime, vessel: VesselId, location: Location) -> Self {
        let info = format!("{} idling ({})", location, vessel);
        Event::vessel(time, vessel, VesselActivity::Idle { location }, info)
    }

    pub fn arrival(time: SimTime, vessel: VesselId, trade: Trade, is_pickup: bool) -> Self {
        let leg = CargoLeg { trade, is_pickup };
        let info = Self::cargo_label(vessel, &leg, "arrival");
        Event::vessel(time, vessel, VesselActivity::Arrival(leg), info)
    }

    pub fn cargo_transfer(time: SimTime, vessel: VesselId, trade: Trade, is_pickup: bool) -> Self {
        let leg = CargoLeg { trade, is_pickup };
        let info = Self::cargo_label(vessel, &leg, "transfer");
        Event::vessel(time, vessel, VesselActivity::CargoTransfer(leg), info)
    }

    fn vessel(time: SimTime, vessel: VesselId, activity: VesselActivity, info: String) -> Self {
        Event {
            time,
            info: Some(info),
            kind: EventKind::Vessel(VesselEvent::new(vessel, activity)),
        }
    }

    fn cargo_label(vessel: VesselId, leg: &CargoLeg, what: &str) -> String {
        let side = if leg.is_pickup { "pick up" } else { "drop off" };
        format!("{} {} {} ({}, {})", leg.port(), side, what, vessel, leg.trade)
    }

    // ── Accessors ─────────────────────────────────────────────────────

    #[inline]
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = Some(info.into());
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn as_vessel_event(&self) -> Option<&VesselEvent> {
        match &self.kind {
            EventKind::Vessel(v) => Some(v),
            _ => None,
        }
    }

    /// Target time of an announcement; `None` for every other kind.
    pub fn cargo_available_time(&self) -> Option<SimTime> {
        match &self.kind {
            EventKind::CargoAnnouncement { cargo_available_time }
            | EventKind::FirstCargoAnnouncement { cargo_available_time } => {
                Some(*cargo_available_time)
            }
            _ => None,
        }
    }

    /// The vessel the event is bound to, if any.
    pub fn vessel_id(&self) -> Option<VesselId> {
        self.as_vessel_event().map(VesselEvent::vessel)
    }

    /// Short kind name for logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            EventKind::CargoAnnouncement { .. } => "cargo_announcement",
            EventKind::FirstCargoAnnouncement { .. } => "first_cargo_announcement",
            EventKind::CargoAuction => "cargo_auction",
            EventKind::Vessel(v) => v.kind_name(),
        }
    }

    /// When the event's activity started. `None` for instantaneous kinds
    /// and for vessel events not yet enqueued.
    pub fn time_started(&self) -> Option<SimTime> {
        self.as_vessel_event().and_then(|v| v.duration().started_at())
    }

    /// `time - time_started` once started, else zero.
    pub fn performed_duration(&self) -> f64 {
        self.as_vessel_event()
            .map(|v| v.duration().elapsed(self.time))
            .unwrap_or(0.0)
    }

    /// Location-at-occurrence of a vessel event.
    pub fn location(&self) -> Option<Location> {
        self.as_vessel_event().map(VesselEvent::location)
    }

    /// Distance covered by a vessel event; zero for everything else.
    pub fn distance(&self, network: &dyn Network) -> KernelResult<f64> {
        match &self.kind {
            EventKind::Vessel(v) => v.distance(network),
            _ => Ok(0.0),
        }
    }

    /// `true` only for an executed travel event that carried cargo.
    pub fn is_laden(&self) -> bool {
        self.as_vessel_event().is_some_and(VesselEvent::is_laden)
    }

    /// See [`VesselEvent::holds_provisional_location`]. Always `false`
    /// for non-vessel events.
    pub fn holds_provisional_location(&self, world: &World) -> bool {
        self.as_vessel_event()
            .is_some_and(|v| v.holds_provisional_location(world))
    }

    // ── Hooks ─────────────────────────────────────────────────────────

    /// Called by [`crate::queue::EventQueue::insert`] before the event
    /// becomes visible in the schedule.
    pub fn on_enqueue(&mut self, world: &mut World) -> KernelResult<()> {
        match &mut self.kind {
            EventKind::Vessel(v) => v.on_enqueue(self.time, world),
            EventKind::CargoAnnouncement { .. }
            | EventKind::FirstCargoAnnouncement { .. }
            | EventKind::CargoAuction => Ok(()),
        }
    }

    /// Perform the event. Called by the driver right after extraction.
    pub fn on_execute(&mut self, ctx: &mut ExecutionContext<'_>) -> KernelResult<ActionData> {
        match &mut self.kind {
            EventKind::CargoAnnouncement { cargo_available_time } => {
                announcement::announce(*cargo_available_time, false, &mut self.info, ctx)
            }
            EventKind::FirstCargoAnnouncement { cargo_available_time } => {
                announcement::announce(*cargo_available_time, true, &mut self.info, ctx)
            }
            EventKind::CargoAuction => announcement::auction(self.time, &mut self.info, ctx),
            EventKind::Vessel(v) => v.on_execute(self.time, ctx),
        }
    }
}

/// Structural equality: same time, same kind, same discriminating fields.
///
/// `info`, start times and the laden flag never take part. Cargo events
/// compare trade and pickup flag but not the vessel.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        if self.time != other.time {
            return false;
        }
        match (&self.kind, &other.kind) {
            (
                EventKind::CargoAnnouncement { cargo_available_time: a },
                EventKind::CargoAnnouncement { cargo_available_time: b },
            )
            | (
                EventKind::FirstCargoAnnouncement { cargo_available_time: a },
                EventKind::FirstCargoAnnouncement { cargo_available_time: b },
            ) => a == b,
            (EventKind::CargoAuction, EventKind::CargoAuction) => true,
            (EventKind::Vessel(a), EventKind::Vessel(b)) => a.same_as(b),
            _ => false,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event({}): time {}", self.kind_name(), self.time)?;
        if self.as_vessel_event().is_some() {
            write!(f, ", duration: {:.3}", self.performed_duration())?;
        }
        write!(f, ", info: {}.", self.info().unwrap_or("-"))
    }
}
