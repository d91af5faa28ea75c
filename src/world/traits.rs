//! Collaborator traits: the narrow seams through which events reach the
//! market, the shipping schedule, company bookkeeping and the network.

use std::collections::BTreeMap;

use crate::error::KernelResult;
use crate::time::SimTime;

use super::id::{CompanyId, PortId, VesselId};
use super::trade::Trade;

/// A shipping company as seen by the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        Company { id, name: name.into() }
    }
}

/// Outcome of a cargo auction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeDistribution {
    /// Trades won, per company.
    pub allocations: BTreeMap<CompanyId, Vec<Trade>>,
    /// Trades nobody took.
    pub unallocated: Vec<Trade>,
}

impl TradeDistribution {
    /// Total number of trades awarded.
    pub fn allocated_count(&self) -> usize {
        self.allocations.values().map(Vec::len).sum()
    }
}

/// The source of trades over time.
pub trait Shipping {
    /// Trades that become available at `time`.
    fn get_trades(&mut self, time: SimTime) -> Vec<Trade>;
}

/// Trade economics and auctions.
pub trait Market {
    /// Tell companies which trades will be auctioned at `time`.
    fn inform_future_trades(&mut self, trades: &[Trade], time: SimTime, companies: &[Company]);

    /// Run the auction for `trades` at `time`.
    fn distribute_trades(
        &mut self,
        time: SimTime,
        trades: &[Trade],
        companies: &[Company],
    ) -> TradeDistribution;
}

/// Company and fleet ownership.
pub trait Headquarters {
    fn get_companies(&self) -> Vec<Company>;

    /// The company operating `vessel`, if known.
    fn company_for_vessel(&self, vessel: VesselId) -> Option<Company>;
}

/// The physical network of sea routes.
pub trait Network {
    /// Sailing distance between two ports.
    fn get_distance(&self, from: &PortId, to: &PortId) -> KernelResult<f64>;
}
