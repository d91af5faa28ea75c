//! Built-in collaborators for tests, demos and small scripted runs.
//!
//! - [`DistanceTable`]: symmetric port-to-port distances.
//! - [`StaticShipping`]: trades keyed by availability time.
//! - [`RecordingMarket`]: round-robin auction that remembers every call.
//! - [`StaticHeadquarters`]: fixed companies and fleets.

use std::collections::BTreeMap;

use crate::error::{KernelError, KernelResult};
use crate::time::SimTime;

use super::id::{CompanyId, PortId, VesselId};
use super::trade::Trade;
use super::traits::{Company, Headquarters, Market, Network, Shipping, TradeDistribution};

// ── DistanceTable ─────────────────────────────────────────────────────

/// A [`Network`] backed by a symmetric table of known distances.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    distances: BTreeMap<(PortId, PortId), f64>,
}

impl DistanceTable {
    pub fn new() -> Self {
        DistanceTable::default()
    }

    /// Record the distance between two ports (both directions).
    pub fn with_route(mut self, a: &str, b: &str, distance: f64) -> Self {
        self.insert(PortId::new(a), PortId::new(b), distance);
        self
    }

    pub fn insert(&mut self, a: PortId, b: PortId, distance: f64) {
        self.distances.insert(Self::key(a, b), distance);
    }

    fn key(a: PortId, b: PortId) -> (PortId, PortId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl Network for DistanceTable {
    fn get_distance(&self, from: &PortId, to: &PortId) -> KernelResult<f64> {
        if from == to {
            return Ok(0.0);
        }
        self.distances
            .get(&Self::key(from.clone(), to.clone()))
            .copied()
            .ok_or_else(|| KernelError::NoRoute {
                from: from.clone(),
                to: to.clone(),
            })
    }
}

// ── StaticShipping ────────────────────────────────────────────────────

/// A [`Shipping`] collaborator that hands out pre-loaded trades by time.
#[derive(Debug, Clone, Default)]
pub struct StaticShipping {
    trades: BTreeMap<SimTime, Vec<Trade>>,
    /// Times queried so far, in call order.
    pub requests: Vec<SimTime>,
}

impl StaticShipping {
    pub fn new() -> Self {
        StaticShipping::default()
    }

    /// Group `trades` by their availability time.
    pub fn from_trades(trades: impl IntoIterator<Item = Trade>) -> Self {
        let mut shipping = StaticShipping::new();
        for trade in trades {
            shipping.add(trade);
        }
        shipping
    }

    pub fn add(&mut self, trade: Trade) {
        self.trades.entry(trade.time).or_default().push(trade);
    }
}

impl Shipping for StaticShipping {
    fn get_trades(&mut self, time: SimTime) -> Vec<Trade> {
        self.requests.push(time);
        self.trades.get(&time).cloned().unwrap_or_default()
    }
}

// ── RecordingMarket ───────────────────────────────────────────────────

/// A call made to [`Market::inform_future_trades`].
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub time: SimTime,
    pub trades: Vec<Trade>,
    pub companies: Vec<CompanyId>,
}

/// A [`Market`] that awards trades round-robin and records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingMarket {
    pub announcements: Vec<Announcement>,
    pub auctions: Vec<(SimTime, TradeDistribution)>,
}

impl RecordingMarket {
    pub fn new() -> Self {
        RecordingMarket::default()
    }
}

impl Market for RecordingMarket {
    fn inform_future_trades(&mut self, trades: &[Trade], time: SimTime, companies: &[Company]) {
        self.announcements.push(Announcement {
            time,
            trades: trades.to_vec(),
            companies: companies.iter().map(|c| c.id).collect(),
        });
    }

    fn distribute_trades(
        &mut self,
        time: SimTime,
        trades: &[Trade],
        companies: &[Company],
    ) -> TradeDistribution {
        let mut distribution = TradeDistribution::default();
        if companies.is_empty() {
            distribution.unallocated = trades.to_vec();
        } else {
            for (i, trade) in trades.iter().enumerate() {
                let winner = companies[i % companies.len()].id;
                distribution
                    .allocations
                    .entry(winner)
                    .or_default()
                    .push(trade.clone());
            }
        }
        self.auctions.push((time, distribution.clone()));
        distribution
    }
}

// ── StaticHeadquarters ────────────────────────────────────────────────

/// A [`Headquarters`] with a fixed roster of companies and fleets.
#[derive(Debug, Clone, Default)]
pub struct StaticHeadquarters {
    companies: Vec<Company>,
    fleets: BTreeMap<VesselId, CompanyId>,
}

impl StaticHeadquarters {
    pub fn new() -> Self {
        StaticHeadquarters::default()
    }

    /// Add a company operating `fleet`.
    pub fn with_company(mut self, company: Company, fleet: &[VesselId]) -> Self {
        for vessel in fleet {
            self.fleets.insert(*vessel, company.id);
        }
        self.companies.push(company);
        self
    }
}

impl Headquarters for StaticHeadquarters {
    fn get_companies(&self) -> Vec<Company> {
        self.companies.clone()
    }

    fn company_for_vessel(&self, vessel: VesselId) -> Option<Company> {
        let owner = self.fleets.get(&vessel)?;
        self.companies.iter().find(|c| c.id == *owner).cloned()
    }
}
