//! Observation of executed events.
//!
//! Collaborators that want to react to an event after it has run (for
//! scoring, statistics, UI) implement [`EventObserver`]. The driver
//! calls every registered observer once per executed event, after the
//! event's own mutation logic has completed. The kernel does not care
//! how many observers there are or what they do.

use tracing::debug;

use crate::event::Event;
use crate::time::SimTime;
use crate::world::{Location, PortId, TimeWindowViolation, TradeDistribution, TradeId, VesselId, World};

// ── Action data ───────────────────────────────────────────────────────

/// The direct result of executing one event.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionData {
    /// A vessel reported or kept its position.
    Relocated { vessel: VesselId, location: Location },
    /// A vessel completed a voyage.
    Travelled {
        vessel: VesselId,
        destination: PortId,
        laden: bool,
    },
    /// A vessel arrived at one end of a trade.
    Arrived {
        vessel: VesselId,
        trade: TradeId,
        is_pickup: bool,
        violation: Option<TimeWindowViolation>,
    },
    /// A vessel loaded or unloaded a trade's cargo. `applied` is false
    /// when an unload was skipped for lack of cargo.
    CargoTransferred {
        vessel: VesselId,
        trade: TradeId,
        is_pickup: bool,
        amount: f64,
        applied: bool,
    },
    /// The market was told about upcoming trades.
    Announced { for_time: SimTime, trades: usize },
    /// The market ran an auction.
    Auction(TradeDistribution),
}

/// Context surrounding one execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionContextSnapshot {
    /// World time when the event ran.
    pub time: SimTime,
    /// Events still pending after execution (follow-ups included).
    pub pending_events: usize,
}

/// Everything an observer is told about an execution.
#[derive(Debug, Clone, PartialEq)]
pub struct EventExecutionData {
    pub action_data: ActionData,
    pub other_data: ExecutionContextSnapshot,
}

// ── Observer ──────────────────────────────────────────────────────────

/// Receives a notification for every executed event.
pub trait EventObserver {
    fn notify(&mut self, world: &World, event: &Event, data: &EventExecutionData);
}

/// An observer backed by a closure, handy in tests.
impl<F> EventObserver for F
where
    F: FnMut(&World, &Event, &EventExecutionData),
{
    fn notify(&mut self, world: &World, event: &Event, data: &EventExecutionData) {
        (self)(world, event, data);
    }
}

// ── Execution log ─────────────────────────────────────────────────────

/// One executed event, as recorded by [`ExecutionLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    pub time: SimTime,
    pub kind: &'static str,
    pub vessel: Option<VesselId>,
    pub info: Option<String>,
    pub action_data: ActionData,
}

/// Append-only record of every executed event.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    records: Vec<ExecutionRecord>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        ExecutionLog::default()
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every time-window violation seen so far, in execution order.
    pub fn violations(&self) -> impl Iterator<Item = (VesselId, &TimeWindowViolation)> {
        self.records.iter().filter_map(|r| match &r.action_data {
            ActionData::Arrived {
                vessel,
                violation: Some(violation),
                ..
            } => Some((*vessel, violation)),
            _ => None,
        })
    }

    /// Records bound to one vessel.
    pub fn for_vessel(&self, vessel: VesselId) -> impl Iterator<Item = &ExecutionRecord> {
        self.records.iter().filter(move |r| r.vessel == Some(vessel))
    }
}

impl EventObserver for ExecutionLog {
    fn notify(&mut self, _world: &World, event: &Event, data: &EventExecutionData) {
        debug!(time = %data.other_data.time, kind = event.kind_name(), "recording execution");
        self.records.push(ExecutionRecord {
            time: data.other_data.time,
            kind: event.kind_name(),
            vessel: event.vessel_id(),
            info: event.info().map(str::to_string),
            action_data: data.action_data.clone(),
        });
    }
}
