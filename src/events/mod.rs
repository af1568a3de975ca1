//! Event system.
//!
//! Game objects react to each other through events instead of direct
//! references: damage, deaths, turn boundaries and card plays are announced
//! on the bus of the entity they concern, and cards, minions and secrets
//! subscribe to the ones they care about.
//!
//! ## Key Components
//!
//! - [`Event`]: a typed payload, one variant per event kind
//! - [`EventKind`]: the registry key for an event
//! - [`EventBus`]: ordered handler lists with one-shot and re-entrancy rules
//! - [`trigger`]: dispatch through a [`BusHost`]
//!
//! ## Example
//!
//! ```
//! use hearth_engine::events::{callback, trigger, BoundArg, BusHost, Event, EventBus, EventKind};
//!
//! #[derive(Default)]
//! struct Counter {
//!     bus: EventBus<Counter>,
//!     healed: i32,
//! }
//!
//! impl BusHost for Counter {
//!     type Address = ();
//!     fn bus_mut(&mut self, _: ()) -> Option<&mut EventBus<Counter>> {
//!         Some(&mut self.bus)
//!     }
//! }
//!
//! let mut host = Counter::default();
//! host.bus.bind_once(
//!     EventKind::Healed,
//!     callback(|host: &mut Counter, event: &Event, _: &[BoundArg]| {
//!         host.healed += event.amount().unwrap_or(0);
//!         Ok(())
//!     }),
//!     &[],
//! );
//!
//! trigger(&mut host, (), &Event::Healed { amount: 2 }).unwrap();
//! trigger(&mut host, (), &Event::Healed { amount: 5 }).unwrap();
//! assert_eq!(host.healed, 2);
//! ```

pub mod event;
pub mod bus;

pub use event::{BoundArg, BoundArgs, DamageSource, Event, EventKind};
pub use bus::{callback, trigger, BusHost, Callback, EventBus, HandlerId};
