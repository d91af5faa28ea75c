//! # Tideline — Maritime Discrete-Event Kernel
//!
//! The scheduling core of a maritime logistics simulation. Vessels sail,
//! load and unload; cargo is announced ahead of time and auctioned to
//! shipping companies. Time is simulated hours, moved forward only by
//! executing the earliest pending event.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │          Simulation             │ ← step / run / run_until
//! │  ┌───────────┐  ┌────────────┐  │
//! │  │ EventQueue│  │   World    │  │ ← min-heap, FIFO on ties
//! │  └───────────┘  │  vessels   │  │
//! │  ┌───────────┐  │  network   │  │
//! │  │  Events   │─▶│  clock     │  │ ← on_enqueue / on_execute
//! │  └───────────┘  └────────────┘  │
//! │  ┌───────────────────────────┐  │
//! │  │ EventObserver(s)          │  │ ← notified after each event
//! │  └───────────────────────────┘  │
//! └─────────────────────────────────┘
//!        │ Shipping · Market · Headquarters (collaborators)
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod observer;
pub mod queue;
pub mod simulation;
pub mod time;
pub mod world;

// Re-exports for convenience.
pub use config::KernelConfig;
pub use error::{KernelError, KernelResult};
pub use event::{CargoLeg, DurationState, Event, EventKind, VesselActivity, VesselEvent, Voyage};
pub use observer::{ActionData, EventExecutionData, EventObserver, ExecutionLog, ExecutionRecord};
pub use queue::{EventItem, EventQueue};
pub use simulation::{Collaborators, ExecutionContext, Simulation};
pub use time::SimTime;
pub use world::{
    CargoType, Company, CompanyId, Location, PortId, TimeWindow, Trade, TradeId, Vessel,
    VesselId, World,
};
