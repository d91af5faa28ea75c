//! Vessels and the registry that owns them.

use std::collections::BTreeMap;

use crate::error::{KernelError, KernelResult};
use crate::time::SimTime;

use super::id::{CargoType, VesselId};
use super::location::Location;

/// Relative tolerance on cargo amounts.
const LOAD_EPSILON: f64 = 1e-9;

/// One entry of a vessel's occurrence journal.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselOccurrence {
    pub time: SimTime,
    /// Short name of the event kind, e.g. `"travel"`.
    pub kind: &'static str,
    /// The event's location-at-occurrence.
    pub location: Location,
}

/// A ship: where it is and what it carries.
#[derive(Debug, Clone)]
pub struct Vessel {
    id: VesselId,
    name: String,
    location: Location,
    hold: BTreeMap<CargoType, f64>,
    journal: Vec<VesselOccurrence>,
}

impl Vessel {
    /// An empty vessel at `location`.
    pub fn new(id: VesselId, name: impl Into<String>, location: Location) -> Self {
        Vessel {
            id,
            name: name.into(),
            location,
            hold: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    pub fn id(&self) -> VesselId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Record that an event concerning this vessel has occurred.
    pub fn event_occurrence(&mut self, occurrence: VesselOccurrence) {
        self.journal.push(occurrence);
    }

    /// Every occurrence recorded so far, oldest first.
    pub fn journal(&self) -> &[VesselOccurrence] {
        &self.journal
    }

    /// Take `amount` of `cargo_type` on board.
    pub fn load_cargo(&mut self, cargo_type: CargoType, amount: f64) {
        *self.hold.entry(cargo_type).or_insert(0.0) += amount;
    }

    /// Discharge `amount` of `cargo_type`. Fails without touching the hold
    /// if less than `amount` is on board.
    ///
    /// Amounts are compared with a relative tolerance, and a remainder
    /// inside that tolerance empties the slot, so summed pickups followed
    /// by their drop-offs leave the hold empty.
    pub fn unload_cargo(&mut self, cargo_type: &CargoType, amount: f64) -> KernelResult<()> {
        let available = self.load_of(cargo_type);
        let slack = load_tolerance(available.max(amount));
        if amount > available + slack {
            return Err(KernelError::InsufficientCargo {
                vessel: self.id,
                cargo_type: cargo_type.clone(),
                requested: amount,
                available,
            });
        }
        let remaining = available - amount;
        if remaining <= slack {
            self.hold.remove(cargo_type);
        } else {
            self.hold.insert(cargo_type.clone(), remaining);
        }
        Ok(())
    }

    /// Amount of `cargo_type` currently on board.
    pub fn load_of(&self, cargo_type: &CargoType) -> f64 {
        self.hold.get(cargo_type).copied().unwrap_or(0.0)
    }

    /// `true` if any cargo at all is on board (laden), `false` under ballast.
    pub fn has_any_load(&self) -> bool {
        self.hold.values().any(|amount| *amount > load_tolerance(*amount))
    }
}

/// Rounding slack for hold arithmetic at the magnitude of `scale`.
fn load_tolerance(scale: f64) -> f64 {
    LOAD_EPSILON * scale.abs().max(1.0)
}

// ── Registry ──────────────────────────────────────────────────────────

/// Owns every vessel in the world, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct VesselRegistry {
    vessels: BTreeMap<VesselId, Vessel>,
}

impl VesselRegistry {
    pub fn new() -> Self {
        VesselRegistry::default()
    }

    /// Add a vessel, replacing any previous vessel with the same id.
    pub fn register(&mut self, vessel: Vessel) {
        self.vessels.insert(vessel.id(), vessel);
    }

    pub fn get(&self, id: VesselId) -> KernelResult<&Vessel> {
        self.vessels.get(&id).ok_or(KernelError::UnknownVessel(id))
    }

    pub fn get_mut(&mut self, id: VesselId) -> KernelResult<&mut Vessel> {
        self.vessels.get_mut(&id).ok_or(KernelError::UnknownVessel(id))
    }

    pub fn contains(&self, id: VesselId) -> bool {
        self.vessels.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// Vessels in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Vessel> {
        self.vessels.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oil() -> CargoType {
        CargoType::new("Oil")
    }

    #[test]
    fn test_load_and_unload() {
        let mut v = Vessel::new(VesselId::new(1), "Aurora", Location::port("Aden"));
        assert!(!v.has_any_load());

        v.load_cargo(oil(), 100.0);
        assert_eq!(v.load_of(&oil()), 100.0);
        assert!(v.has_any_load());

        v.unload_cargo(&oil(), 100.0).unwrap();
        assert_eq!(v.load_of(&oil()), 0.0);
        assert!(!v.has_any_load());
    }

    #[test]
    fn test_split_shipments_leave_hold_empty() {
        let mut v = Vessel::new(VesselId::new(1), "Aurora", Location::port("Aden"));
        v.load_cargo(oil(), 0.1);
        v.load_cargo(oil(), 0.2);
        v.unload_cargo(&oil(), 0.1).unwrap();
        v.unload_cargo(&oil(), 0.2).unwrap();
        assert_eq!(v.load_of(&oil()), 0.0);
        assert!(!v.has_any_load());

        // The drop-off order must not matter either.
        v.load_cargo(oil(), 0.1);
        v.load_cargo(oil(), 0.2);
        v.unload_cargo(&oil(), 0.3).unwrap();
        assert!(!v.has_any_load());
    }

    #[test]
    fn test_partial_unload_keeps_remainder() {
        let mut v = Vessel::new(VesselId::new(1), "Aurora", Location::port("Aden"));
        v.load_cargo(oil(), 30_000.0);
        v.load_cargo(oil(), 0.7);
        v.unload_cargo(&oil(), 30_000.0).unwrap();
        assert!((v.load_of(&oil()) - 0.7).abs() < 1e-6);
        assert!(v.has_any_load());
    }

    #[test]
    fn test_unload_more_than_on_board() {
        let mut v = Vessel::new(VesselId::new(1), "Aurora", Location::port("Aden"));
        v.load_cargo(oil(), 10.0);
        let err = v.unload_cargo(&oil(), 25.0).unwrap_err();
        assert!(matches!(err, KernelError::InsufficientCargo { available, .. } if available == 10.0));
        assert_eq!(v.load_of(&oil()), 10.0);
    }

    #[test]
    fn test_registry_lookup() {
        let mut reg = VesselRegistry::new();
        reg.register(Vessel::new(VesselId::new(2), "Borealis", Location::port("Busan")));
        assert!(reg.contains(VesselId::new(2)));
        assert_eq!(reg.get(VesselId::new(2)).unwrap().name(), "Borealis");
        assert_eq!(
            reg.get(VesselId::new(9)).unwrap_err(),
            KernelError::UnknownVessel(VesselId::new(9))
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_journal_records_in_order() {
        let mut v = Vessel::new(VesselId::new(1), "Aurora", Location::port("Aden"));
        v.event_occurrence(VesselOccurrence {
            time: SimTime::new(1.0),
            kind: "idle",
            location: Location::port("Aden"),
        });
        v.event_occurrence(VesselOccurrence {
            time: SimTime::new(2.0),
            kind: "travel",
            location: Location::port("Busan"),
        });
        let kinds: Vec<_> = v.journal().iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec!["idle", "travel"]);
    }
}
