//! Where a vessel is: in a port, or somewhere between two of them.

use crate::time::SimTime;

use super::id::PortId;

/// A vessel's voyage in progress.
///
/// Published as a vessel's provisional location when a travel event is
/// enqueued; replaced by the destination port when that event executes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct OnJourney {
    pub origin: PortId,
    pub destination: PortId,
    /// `None` while the owning travel event has not been enqueued.
    pub start_time: Option<SimTime>,
}

/// The location of a vessel or of an event's occurrence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    /// Moored in (or anchored off) a port.
    Port(PortId),
    /// Sailing between two ports.
    OnJourney(OnJourney),
}

impl Location {
    /// Shorthand for `Location::Port(PortId::new(name))`.
    pub fn port(name: impl Into<String>) -> Self {
        Location::Port(PortId::new(name))
    }

    /// The port, if the location is one.
    pub fn as_port(&self) -> Option<&PortId> {
        match self {
            Location::Port(port) => Some(port),
            Location::OnJourney(_) => None,
        }
    }

    /// `true` while sailing.
    pub fn is_on_journey(&self) -> bool {
        matches!(self, Location::OnJourney(_))
    }
}

impl From<PortId> for Location {
    fn from(port: PortId) -> Self {
        Location::Port(port)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Port(port) => write!(f, "{}", port),
            Location::OnJourney(journey) => {
                write!(f, "{} -> {}", journey.origin, journey.destination)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_accessors() {
        let loc = Location::port("Aden");
        assert_eq!(loc.as_port(), Some(&PortId::new("Aden")));
        assert!(!loc.is_on_journey());
    }

    #[test]
    fn test_journey_equality_includes_start() {
        let a = Location::OnJourney(OnJourney {
            origin: PortId::new("A"),
            destination: PortId::new("B"),
            start_time: Some(SimTime::new(1.0)),
        });
        let mut b = a.clone();
        assert_eq!(a, b);
        if let Location::OnJourney(journey) = &mut b {
            journey.start_time = Some(SimTime::new(2.0));
        }
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "A -> B");
        assert!(a.as_port().is_none());
    }
}
