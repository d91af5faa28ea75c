//! Vessel events: everything that happens to one ship.
//!
//! Every vessel event carries a [`DurationState`] and the id of the
//! vessel it is bound to. On execution it records the occurrence on the
//! vessel and moves the vessel to the event's location-at-occurrence;
//! each activity then layers its own effect on top.

use tracing::{error, warn};

use crate::error::KernelResult;
use crate::observer::ActionData;
use crate::simulation::ExecutionContext;
use crate::time::SimTime;
use crate::world::{
    Location, Network, OnJourney, PortId, Trade, VesselId, VesselOccurrence, World,
};

use super::duration::DurationState;

// ── Activities ────────────────────────────────────────────────────────

/// A vessel sailing from one port to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Voyage {
    pub origin: PortId,
    pub destination: PortId,
    laden: bool,
}

impl Voyage {
    pub fn new(origin: PortId, destination: PortId) -> Self {
        Voyage {
            origin,
            destination,
            laden: false,
        }
    }

    /// Whether the vessel carried cargo on this voyage. Only meaningful
    /// after execution; `false` before.
    pub fn is_laden(&self) -> bool {
        self.laden
    }
}

/// The trade half of a cargo event: which trade, and which end of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CargoLeg {
    pub trade: Trade,
    pub is_pickup: bool,
}

impl CargoLeg {
    /// Origin port for a pickup, destination port for a drop-off.
    pub fn port(&self) -> &PortId {
        if self.is_pickup {
            &self.trade.origin_port
        } else {
            &self.trade.destination_port
        }
    }

    /// Same leg: same trade, same end of it.
    fn same_as(&self, other: &CargoLeg) -> bool {
        self.is_pickup == other.is_pickup && self.trade == other.trade
    }
}

/// What the vessel is doing.
#[derive(Debug, Clone)]
pub enum VesselActivity {
    /// The vessel reports its position. Instantaneous.
    LocationInformation { location: Location },
    /// The vessel sails between ports.
    Travel(Voyage),
    /// The vessel does nothing at a location.
    Idle { location: Location },
    /// The vessel arrives to load or unload. Does not touch the hold.
    Arrival(CargoLeg),
    /// The vessel loads or unloads the trade's cargo.
    CargoTransfer(CargoLeg),
}

// ── VesselEvent ───────────────────────────────────────────────────────

/// An event bound to one vessel.
#[derive(Debug, Clone)]
pub struct VesselEvent {
    vessel: VesselId,
    duration: DurationState,
    activity: VesselActivity,
}

impl VesselEvent {
    pub fn new(vessel: VesselId, activity: VesselActivity) -> Self {
        VesselEvent {
            vessel,
            duration: DurationState::new(),
            activity,
        }
    }

    pub fn vessel(&self) -> VesselId {
        self.vessel
    }

    pub fn duration(&self) -> &DurationState {
        &self.duration
    }

    pub fn activity(&self) -> &VesselActivity {
        &self.activity
    }

    /// The cargo leg, for arrival and transfer events.
    pub fn cargo_leg(&self) -> Option<&CargoLeg> {
        match &self.activity {
            VesselActivity::Arrival(leg) | VesselActivity::CargoTransfer(leg) => Some(leg),
            _ => None,
        }
    }

    /// Short name of the activity, used in logs and journals.
    pub fn kind_name(&self) -> &'static str {
        match &self.activity {
            VesselActivity::LocationInformation { .. } => "location_information",
            VesselActivity::Travel(_) => "travel",
            VesselActivity::Idle { .. } => "idle",
            VesselActivity::Arrival(_) => "arrival",
            VesselActivity::CargoTransfer(_) => "cargo_transfer",
        }
    }

    /// Where the vessel is when the event happens.
    ///
    /// For travel this is the journey itself, not the destination.
    pub fn location(&self) -> Location {
        match &self.activity {
            VesselActivity::LocationInformation { location } | VesselActivity::Idle { location } => {
                location.clone()
            }
            VesselActivity::Travel(voyage) => Location::OnJourney(OnJourney {
                origin: voyage.origin.clone(),
                destination: voyage.destination.clone(),
                start_time: self.duration.started_at(),
            }),
            VesselActivity::Arrival(leg) | VesselActivity::CargoTransfer(leg) => {
                Location::Port(leg.port().clone())
            }
        }
    }

    /// The distance the vessel covers between start and occurrence.
    ///
    /// Arrivals report the trade's origin-to-destination distance: the
    /// minimum transit the trade commits the vessel to.
    pub fn distance(&self, network: &dyn Network) -> KernelResult<f64> {
        match &self.activity {
            VesselActivity::Travel(voyage) => {
                network.get_distance(&voyage.origin, &voyage.destination)
            }
            VesselActivity::Arrival(leg) => {
                network.get_distance(&leg.trade.origin_port, &leg.trade.destination_port)
            }
            VesselActivity::LocationInformation { .. }
            | VesselActivity::Idle { .. }
            | VesselActivity::CargoTransfer(_) => Ok(0.0),
        }
    }

    /// `true` only for an executed travel event that carried cargo.
    pub fn is_laden(&self) -> bool {
        match &self.activity {
            VesselActivity::Travel(voyage) => voyage.is_laden(),
            _ => false,
        }
    }

    /// `true` for a travel whose provisional on-journey location is still
    /// what the world shows for its vessel.
    pub fn holds_provisional_location(&self, world: &World) -> bool {
        matches!(self.activity, VesselActivity::Travel(_))
            && world
                .vessels()
                .get(self.vessel)
                .is_ok_and(|vessel| *vessel.location() == self.location())
    }

    /// Structural equality, excluding time (compared by [`super::Event`]).
    pub(super) fn same_as(&self, other: &VesselEvent) -> bool {
        use VesselActivity::*;
        match (&self.activity, &other.activity) {
            (LocationInformation { location: a }, LocationInformation { location: b })
            | (Idle { location: a }, Idle { location: b }) => self.vessel == other.vessel && a == b,
            (Travel(a), Travel(b)) => {
                self.vessel == other.vessel
                    && a.origin == b.origin
                    && a.destination == b.destination
            }
            (Arrival(a), Arrival(b)) | (CargoTransfer(a), CargoTransfer(b)) => a.same_as(b),
            _ => false,
        }
    }

    // ── Hooks ─────────────────────────────────────────────────────────

    pub(super) fn on_enqueue(&mut self, time: SimTime, world: &mut World) -> KernelResult<()> {
        // Resolve the vessel before touching any state so a failed
        // insert leaves both the event and the world unchanged.
        world.vessels().get(self.vessel)?;
        self.duration.mark_started(time, world.current_time());
        if let VesselActivity::Travel(_) = &self.activity {
            let provisional = self.location();
            world.vessels_mut().get_mut(self.vessel)?.set_location(provisional);
        }
        Ok(())
    }

    pub(super) fn on_execute(
        &mut self,
        time: SimTime,
        ctx: &mut ExecutionContext<'_>,
    ) -> KernelResult<ActionData> {
        let vessel_id = self.vessel;
        let location = self.location();
        let kind = self.kind_name();

        let vessel = ctx.world.vessels_mut().get_mut(vessel_id)?;
        vessel.event_occurrence(VesselOccurrence {
            time,
            kind,
            location: location.clone(),
        });
        vessel.set_location(location.clone());

        match &mut self.activity {
            VesselActivity::LocationInformation { .. } | VesselActivity::Idle { .. } => {
                Ok(ActionData::Relocated {
                    vessel: vessel_id,
                    location,
                })
            }
            VesselActivity::Travel(voyage) => {
                voyage.laden = vessel.has_any_load();
                vessel.set_location(Location::Port(voyage.destination.clone()));
                Ok(ActionData::Travelled {
                    vessel: vessel_id,
                    destination: voyage.destination.clone(),
                    laden: voyage.laden,
                })
            }
            VesselActivity::Arrival(leg) => {
                let violation = leg.trade.time_window.check(time, leg.is_pickup);
                if let Some(violation) = &violation {
                    let company = ctx
                        .headquarters
                        .company_for_vessel(vessel_id)
                        .map(|c| c.name)
                        .unwrap_or_else(|| "<unowned>".to_string());
                    error!(
                        %company,
                        vessel = %vessel_id,
                        trade = %leg.trade.id,
                        "company has violated trade time constraints: {}",
                        violation
                    );
                }
                Ok(ActionData::Arrived {
                    vessel: vessel_id,
                    trade: leg.trade.id,
                    is_pickup: leg.is_pickup,
                    violation,
                })
            }
            VesselActivity::CargoTransfer(leg) => {
                let cargo_type = &leg.trade.cargo_type;
                let amount = leg.trade.amount;
                let applied = if leg.is_pickup {
                    vessel.load_cargo(cargo_type.clone(), amount);
                    true
                } else {
                    match vessel.unload_cargo(cargo_type, amount) {
                        Ok(()) => true,
                        Err(err) => {
                            warn!(%time, trade = %leg.trade.id, %err, "cargo drop-off skipped");
                            false
                        }
                    }
                };
                Ok(ActionData::CargoTransferred {
                    vessel: vessel_id,
                    trade: leg.trade.id,
                    is_pickup: leg.is_pickup,
                    amount,
                    applied,
                })
            }
        }
    }
}
