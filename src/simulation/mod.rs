//! Simulation driver.
//!
//! Owns the world and the event queue. Each step extracts the earliest
//! event, advances world time, executes the event and notifies the
//! observers. The loop is synchronous, single-threaded and
//! run-to-completion per event, so there is exactly one writer at a time.

use tracing::{debug, warn};

use crate::config::KernelConfig;
use crate::error::{KernelError, KernelResult};
use crate::event::Event;
use crate::observer::{EventExecutionData, EventObserver, ExecutionContextSnapshot, ExecutionLog};
use crate::queue::EventQueue;
use crate::time::SimTime;
use crate::world::{Headquarters, Market, Shipping, VesselId, World};


// ── Collaborators ─────────────────────────────────────────────────────

/// Borrowed handles on the collaborators an execution may call.
pub struct Collaborators<'a> {
    pub shipping: &'a mut dyn Shipping,
    pub market: &'a mut dyn Market,
    pub headquarters: &'a dyn Headquarters,
}

// ── Execution Context ─────────────────────────────────────────────────

/// Everything an event may touch while it executes.
///
/// The event being executed has already left the queue, so it can
/// schedule follow-ups through [`ExecutionContext::schedule`] without
/// aliasing itself.
pub struct ExecutionContext<'a> {
    pub world: &'a mut World,
    pub queue: &'a mut EventQueue,
    pub shipping: &'a mut dyn Shipping,
    pub market: &'a mut dyn Market,
    pub headquarters: &'a dyn Headquarters,
    pub config: &'a KernelConfig,
}

impl ExecutionContext<'_> {
    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.world.current_time()
    }

    /// Insert a follow-up event (enqueue hook included).
    pub fn schedule(&mut self, event: Event) -> KernelResult<()> {
        self.queue.insert(event, &mut *self.world)
    }
}

// ── Simulation ────────────────────────────────────────────────────────

/// Top-level driver.
pub struct Simulation {
    world: World,
    queue: EventQueue,
    config: KernelConfig,
    observers: Vec<Box<dyn EventObserver>>,
    execution_log: Option<ExecutionLog>,
    events_processed: u64,
}

impl Simulation {
    /// Create a driver over `world`, validating `config`.
    pub fn new(world: World, config: KernelConfig) -> KernelResult<Self> {
        config.validate()?;
        Ok(Simulation {
            world,
            queue: EventQueue::new(),
            config,
            observers: Vec::new(),
            execution_log: None,
            events_processed: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn current_time(&self) -> SimTime {
        self.world.current_time()
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Register an observer; it is told about every later execution.
    pub fn add_observer(&mut self, observer: Box<dyn EventObserver>) {
        self.observers.push(observer);
    }

    /// Start recording every execution in an [`ExecutionLog`].
    pub fn enable_execution_log(&mut self) {
        if self.execution_log.is_none() {
            self.execution_log = Some(ExecutionLog::new());
        }
    }

    pub fn execution_log(&self) -> Option<&ExecutionLog> {
        self.execution_log.as_ref()
    }

    /// Insert an event into the schedule.
    pub fn schedule(&mut self, event: Event) -> KernelResult<()> {
        self.queue.insert(event, &mut self.world)
    }

    /// Cancel pending events structurally equal to `events`.
    pub fn remove(&mut self, events: &[Event]) -> usize {
        self.queue.remove(events)
    }

    /// Cancel every pending event of `vessel`. See [`EventQueue::purge`].
    pub fn purge(&mut self, vessel: VesselId) -> Vec<Event> {
        self.queue.purge(vessel, &self.world)
    }

    /// Execute the earliest event.
    ///
    /// Returns `EmptySchedule` when nothing is pending.
    pub fn step(&mut self, collaborators: &mut Collaborators<'_>) -> KernelResult<Event> {
        let mut event = self.queue.extract_next()?;

        let now = self.world.current_time();
        if event.time() < now {
            warn!(%now, event = %event, "event scheduled in the past executes at current time");
        } else {
            self.world.set_current_time(event.time());
        }
        self.events_processed += 1;
        debug!(time = %self.world.current_time(), kind = event.kind_name(), "executing event");

        let action_data = {
            let mut ctx = ExecutionContext {
                world: &mut self.world,
                queue: &mut self.queue,
                shipping: &mut *collaborators.shipping,
                market: &mut *collaborators.market,
                headquarters: collaborators.headquarters,
                config: &self.config,
            };
            event.on_execute(&mut ctx)?
        };

        let data = EventExecutionData {
            action_data,
            other_data: ExecutionContextSnapshot {
                time: self.world.current_time(),
                pending_events: self.queue.len(),
            },
        };
        if let Some(log) = self.execution_log.as_mut() {
            log.notify(&self.world, &event, &data);
        }
        for observer in self.observers.iter_mut() {
            observer.notify(&self.world, &event, &data);
        }

        Ok(event)
    }

    /// Run until the schedule is empty.
    ///
    /// Returns the number of events processed during this call. With an
    /// unbounded announcement cycle this never returns; use
    /// [`Simulation::run_until`] or set a horizon.
    pub fn run(&mut self, collaborators: &mut Collaborators<'_>) -> KernelResult<u64> {
        self.run_while(collaborators, |_| true)
    }

    /// Run every event scheduled at or before `horizon`.
    pub fn run_until(
        &mut self,
        horizon: SimTime,
        collaborators: &mut Collaborators<'_>,
    ) -> KernelResult<u64> {
        self.run_while(collaborators, |next| next <= horizon)
    }

    fn run_while(
        &mut self,
        collaborators: &mut Collaborators<'_>,
        keep_going: impl Fn(SimTime) -> bool,
    ) -> KernelResult<u64> {
        let start = self.events_processed;
        while let Some(next) = self.queue.peek_time() {
            if !keep_going(next) {
                break;
            }
            match self.step(collaborators) {
                Ok(_) => {}
                Err(KernelError::EmptySchedule) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(self.events_processed - start)
    }

    /// `true` when nothing is pending.
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("current_time", &self.world.current_time())
            .field("pending", &self.queue.len())
            .field("events_processed", &self.events_processed)
            .field("observers", &self.observers.len())
            .finish()
    }
}
