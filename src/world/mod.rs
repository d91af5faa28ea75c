//! The world the kernel mutates, and the collaborators it talks to.
//!
//! The kernel owns nothing here beyond what events need to touch:
//! the clock, the vessel registry and a handle on the route network.
//! Everything economic (trades, auctions, companies) lives behind the
//! traits in [`traits`].
//!
//! # Module structure
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`id`] | [`VesselId`], [`CompanyId`], [`TradeId`], [`PortId`], [`CargoType`] |
//! | [`location`] | [`Location`], [`OnJourney`] |
//! | [`trade`] | [`Trade`], [`TimeWindow`], [`TimeWindowViolation`] |
//! | [`vessel`] | [`Vessel`], [`VesselRegistry`] |
//! | [`traits`] | [`Shipping`], [`Market`], [`Headquarters`], [`Network`] |
//! | [`builtin`] | table-driven collaborators for tests and demos |

pub mod builtin;
pub mod id;
pub mod location;
pub mod trade;
pub mod traits;
pub mod vessel;

pub use builtin::{DistanceTable, RecordingMarket, StaticHeadquarters, StaticShipping};
pub use id::{CargoType, CompanyId, PortId, TradeId, VesselId};
pub use location::{Location, OnJourney};
pub use trade::{TimeWindow, TimeWindowViolation, Trade, WindowBound};
pub use traits::{Company, Headquarters, Market, Network, Shipping, TradeDistribution};
pub use vessel::{Vessel, VesselOccurrence, VesselRegistry};

use crate::time::SimTime;

/// Mutable world state handed to event hooks.
///
/// `current_time` is read-only to events; only the driver moves it.
pub struct World {
    current_time: SimTime,
    vessels: VesselRegistry,
    network: Box<dyn Network>,
}

impl World {
    /// A world at time zero with no vessels.
    pub fn new(network: Box<dyn Network>) -> Self {
        World {
            current_time: SimTime::ZERO,
            vessels: VesselRegistry::new(),
            network,
        }
    }

    /// Builder-style vessel registration.
    pub fn with_vessel(mut self, vessel: Vessel) -> Self {
        self.vessels.register(vessel);
        self
    }

    #[inline]
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Move the clock. Only the driver (and tests) call this.
    pub(crate) fn set_current_time(&mut self, time: SimTime) {
        self.current_time = time;
    }

    pub fn vessels(&self) -> &VesselRegistry {
        &self.vessels
    }

    pub fn vessels_mut(&mut self) -> &mut VesselRegistry {
        &mut self.vessels
    }

    pub fn network(&self) -> &dyn Network {
        self.network.as_ref()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("current_time", &self.current_time)
            .field("vessels", &self.vessels)
            .finish_non_exhaustive()
    }
}
