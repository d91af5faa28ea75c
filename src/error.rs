//! Structured error types for the kernel.
//!
//! Scheduling and extraction failures propagate to the driver, which
//! decides whether to halt. Anomalies that the simulation is expected to
//! survive (removing an already-fired event, breaking a trade's time
//! window) are not errors at all: they are logged and execution goes on.

use crate::time::SimTime;
use crate::world::id::{CargoType, PortId, VesselId};

/// The top-level error type for the simulation kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    // ── Scheduling errors ─────────────────────────────────

    /// Attempted to schedule an event at a non-finite time.
    #[error("cannot schedule event at non-finite time {time}")]
    InvalidSchedule { time: SimTime },

    /// Attempted to extract from an empty schedule.
    #[error("event schedule is empty")]
    EmptySchedule,

    /// A structural lookup found no matching event.
    #[error("no event matching {0} is scheduled")]
    NotFound(String),

    // ── World errors ──────────────────────────────────────

    /// An event referenced a vessel that is not in the registry.
    #[error("vessel {0} is not registered")]
    UnknownVessel(VesselId),

    /// The network has no distance for the port pair.
    #[error("no route from {from} to {to}")]
    NoRoute { from: PortId, to: PortId },

    /// A vessel was asked to unload more than it carries.
    #[error("vessel {vessel} cannot unload {requested} of {cargo_type}: only {available} on board")]
    InsufficientCargo {
        vessel: VesselId,
        cargo_type: CargoType,
        requested: f64,
        available: f64,
    },

    // ── Config errors ─────────────────────────────────────

    /// A kernel configuration value is out of range or unparsable.
    #[error("invalid kernel config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, KernelError>`.
pub type KernelResult<T> = Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_schedule() {
        let e = KernelError::InvalidSchedule { time: SimTime::INFINITY };
        assert_eq!(e.to_string(), "cannot schedule event at non-finite time T=inf");
    }

    #[test]
    fn test_error_display_unknown_vessel() {
        let e = KernelError::UnknownVessel(VesselId::new(5));
        assert_eq!(e.to_string(), "vessel V5 is not registered");
    }

    #[test]
    fn test_error_display_no_route() {
        let e = KernelError::NoRoute {
            from: PortId::new("Rotterdam"),
            to: PortId::new("Santos"),
        };
        assert!(e.to_string().contains("Rotterdam"));
        assert!(e.to_string().contains("Santos"));
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(KernelError::EmptySchedule);
        assert!(!e.to_string().is_empty());
    }
}
