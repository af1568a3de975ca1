//! Observer registry.
//!
//! An [`EventBus`] maps each [`EventKind`] to an ordered list of handlers.
//! The bus only stores handlers; dispatch goes through [`trigger`], which
//! needs mutable access to the whole host (the `Game`) so handlers can
//! mutate any part of the match, including other buses.
//!
//! ## Dispatch rules
//!
//! - Handlers run in registration order.
//! - The handler list is snapshotted when `trigger` starts: handlers bound
//!   during dispatch wait for the next trigger, handlers unbound during
//!   dispatch are skipped.
//! - A handler that is already running is skipped when the same event is
//!   re-triggered from inside it. This stops self-triggering loops; it is
//!   not a cycle detector across different events or buses.
//! - A one-shot handler is removed right after its single invocation.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

use super::event::{BoundArg, BoundArgs, Event, EventKind};
use crate::error::Result;

/// Handler callback: host, trigger-time payload, bound arguments.
pub type Callback<C> = Rc<dyn Fn(&mut C, &Event, &[BoundArg]) -> Result<()>>;

/// Wrap a closure as a [`Callback`].
pub fn callback<C, F>(f: F) -> Callback<C>
where
    F: Fn(&mut C, &Event, &[BoundArg]) -> Result<()> + 'static,
{
    Rc::new(f)
}

/// Identifier of a bound handler, unique within its bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u32);

struct Handler<C> {
    id: HandlerId,
    callback: Callback<C>,
    bound: BoundArgs,
    once: bool,
    active: bool,
}

/// Per-entity handler registry.
pub struct EventBus<C> {
    handlers: FxHashMap<EventKind, Vec<Handler<C>>>,
    next_id: u32,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            handlers: FxHashMap::default(),
            next_id: 0,
        }
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, list) in &self.handlers {
            map.entry(kind, &list.len());
        }
        map.finish()
    }
}

fn same_callback<C>(a: &Callback<C>, b: &Callback<C>) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler that fires on every trigger of `kind` until unbound.
    pub fn bind(
        &mut self,
        kind: EventKind,
        callback: Callback<C>,
        bound: &[BoundArg],
    ) -> HandlerId {
        self.insert(kind, callback, BoundArgs::from_slice(bound), false)
    }

    /// Bind a handler that fires on the next trigger of `kind` only.
    pub fn bind_once(
        &mut self,
        kind: EventKind,
        callback: Callback<C>,
        bound: &[BoundArg],
    ) -> HandlerId {
        self.insert(kind, callback, BoundArgs::from_slice(bound), true)
    }

    fn insert(&mut self, kind: EventKind, callback: Callback<C>, bound: BoundArgs, once: bool) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.entry(kind).or_default().push(Handler {
            id,
            callback,
            bound,
            once,
            active: false,
        });
        id
    }

    /// Remove every handler of `kind` bound with this callback. Returns how
    /// many were removed.
    pub fn unbind(&mut self, kind: EventKind, callback: &Callback<C>) -> usize {
        self.remove_where(kind, |h| same_callback(&h.callback, callback))
    }

    /// Remove a single handler by id.
    pub fn unbind_handler(&mut self, kind: EventKind, id: HandlerId) -> bool {
        self.remove_where(kind, |h| h.id == id) > 0
    }

    fn remove_where(&mut self, kind: EventKind, pred: impl Fn(&Handler<C>) -> bool) -> usize {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return 0;
        };
        let before = list.len();
        list.retain(|h| !pred(h));
        let removed = before - list.len();
        if list.is_empty() {
            self.handlers.remove(&kind);
        }
        removed
    }

    #[must_use]
    pub fn is_bound(&self, kind: EventKind, id: HandlerId) -> bool {
        self.handlers
            .get(&kind)
            .is_some_and(|list| list.iter().any(|h| h.id == id))
    }

    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn snapshot(&self, kind: EventKind) -> SmallVec<[HandlerId; 8]> {
        self.handlers
            .get(&kind)
            .map(|list| list.iter().map(|h| h.id).collect())
            .unwrap_or_default()
    }

    /// Mark a handler as running and hand out what is needed to call it.
    /// `None` if it was unbound or is already running.
    fn begin(&mut self, kind: EventKind, id: HandlerId) -> Option<(Callback<C>, BoundArgs)> {
        let handler = self
            .handlers
            .get_mut(&kind)?
            .iter_mut()
            .find(|h| h.id == id && !h.active)?;
        handler.active = true;
        Some((Rc::clone(&handler.callback), handler.bound.clone()))
    }

    fn finish(&mut self, kind: EventKind, id: HandlerId) {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return;
        };
        let Some(pos) = list.iter().position(|h| h.id == id) else {
            return;
        };
        if list[pos].once {
            list.remove(pos);
            if list.is_empty() {
                self.handlers.remove(&kind);
            }
        } else {
            list[pos].active = false;
        }
    }
}

/// Something that owns event buses and can look one up by address.
pub trait BusHost: Sized {
    type Address: Copy + fmt::Debug;

    fn bus_mut(&mut self, address: Self::Address) -> Option<&mut EventBus<Self>>;
}

/// Fire `event` on the bus at `address`.
///
/// The first handler error stops dispatch and is returned; the failing
/// handler is still released (and removed if one-shot).
pub fn trigger<H: BusHost>(host: &mut H, address: H::Address, event: &Event) -> Result<()> {
    let kind = event.kind();
    let pending = match host.bus_mut(address) {
        Some(bus) => bus.snapshot(kind),
        None => return Ok(()),
    };
    if pending.is_empty() {
        return Ok(());
    }
    trace!(?address, ?kind, handlers = pending.len(), "dispatching event");

    for id in pending {
        let Some((callback, bound)) = host.bus_mut(address).and_then(|bus| bus.begin(kind, id)) else {
            continue;
        };
        let outcome = callback(host, event, &bound);
        if let Some(bus) = host.bus_mut(address) {
            bus.finish(kind, id);
        }
        outcome?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::error::GameError;

    #[derive(Default)]
    struct Host {
        buses: [EventBus<Host>; 2],
        log: Vec<String>,
    }

    impl BusHost for Host {
        type Address = usize;

        fn bus_mut(&mut self, address: usize) -> Option<&mut EventBus<Host>> {
            self.buses.get_mut(address)
        }
    }

    fn logger(tag: &'static str) -> Callback<Host> {
        callback(move |host: &mut Host, event: &Event, bound: &[BoundArg]| {
            host.log.push(format!("{tag}:{:?}:{}", event.amount(), bound.len()));
            Ok(())
        })
    }

    fn healed(amount: i32) -> Event {
        Event::Healed { amount }
    }

    #[test]
    fn test_persistent_handler_fires_every_time() {
        let mut host = Host::default();
        host.buses[0].bind(EventKind::Healed, logger("a"), &[]);

        trigger(&mut host, 0, &healed(1)).unwrap();
        trigger(&mut host, 0, &healed(2)).unwrap();

        assert_eq!(host.log, vec!["a:Some(1):0", "a:Some(2):0"]);
        assert_eq!(host.buses[0].handler_count(EventKind::Healed), 1);
    }

    #[test]
    fn test_once_handler_fires_once() {
        let mut host = Host::default();
        let id = host.buses[0].bind_once(EventKind::Healed, logger("once"), &[]);

        trigger(&mut host, 0, &healed(1)).unwrap();
        assert!(!host.buses[0].is_bound(EventKind::Healed, id));
        assert!(host.buses[0].is_empty());

        trigger(&mut host, 0, &healed(2)).unwrap();
        assert_eq!(host.log.len(), 1);
    }

    #[test]
    fn test_registration_order_and_bound_args() {
        let mut host = Host::default();
        host.buses[0].bind(EventKind::Healed, logger("first"), &[BoundArg::Int(5)]);
        host.buses[0].bind(
            EventKind::Healed,
            logger("second"),
            &[BoundArg::Int(1), BoundArg::Entity(EntityId(3))],
        );

        trigger(&mut host, 0, &healed(4)).unwrap();
        assert_eq!(host.log, vec!["first:Some(4):1", "second:Some(4):2"]);
    }

    #[test]
    fn test_unbind_by_identity() {
        let mut host = Host::default();
        let shared = logger("shared");
        host.buses[0].bind(EventKind::Healed, Rc::clone(&shared), &[]);
        host.buses[0].bind(EventKind::Healed, Rc::clone(&shared), &[BoundArg::Int(1)]);
        host.buses[0].bind(EventKind::Healed, logger("other"), &[]);

        assert_eq!(host.buses[0].unbind(EventKind::Healed, &shared), 2);
        trigger(&mut host, 0, &healed(1)).unwrap();
        assert_eq!(host.log, vec!["other:Some(1):0"]);
    }

    #[test]
    fn test_recursive_trigger_skips_running_handler() {
        let mut host = Host::default();
        let recurse = callback(|host: &mut Host, event: &Event, _: &[BoundArg]| {
            host.log.push("recurse".into());
            trigger(host, 0, event)
        });
        host.buses[0].bind(EventKind::Healed, recurse, &[]);
        host.buses[0].bind(EventKind::Healed, logger("tail"), &[]);

        trigger(&mut host, 0, &healed(1)).unwrap();

        // The inner trigger skips the running handler but still reaches the tail.
        assert_eq!(host.log, vec!["recurse", "tail:Some(1):0", "tail:Some(1):0"]);
    }

    #[test]
    fn test_other_bus_may_reenter() {
        let mut host = Host::default();
        let forward = callback(|host: &mut Host, event: &Event, _: &[BoundArg]| trigger(host, 1, event));
        let back = callback(|host: &mut Host, event: &Event, _: &[BoundArg]| {
            host.log.push("bus1".into());
            trigger(host, 0, event)
        });
        host.buses[0].bind(EventKind::Healed, forward, &[]);
        host.buses[1].bind(EventKind::Healed, back, &[]);

        trigger(&mut host, 0, &healed(1)).unwrap();
        assert_eq!(host.log, vec!["bus1"]);
    }

    #[test]
    fn test_bind_during_dispatch_waits_for_next_trigger() {
        let mut host = Host::default();
        let binder = callback(|host: &mut Host, _: &Event, _: &[BoundArg]| {
            host.buses[0].bind(EventKind::Healed, logger("late"), &[]);
            Ok(())
        });
        host.buses[0].bind_once(EventKind::Healed, binder, &[]);

        trigger(&mut host, 0, &healed(1)).unwrap();
        assert!(host.log.is_empty());

        trigger(&mut host, 0, &healed(2)).unwrap();
        assert_eq!(host.log, vec!["late:Some(2):0"]);
    }

    #[test]
    fn test_unbind_during_dispatch_skips_later_handler() {
        let mut host = Host::default();
        let victim = logger("victim");
        let victim_key = Rc::clone(&victim);
        let remover = callback(move |host: &mut Host, _: &Event, _: &[BoundArg]| {
            host.buses[0].unbind(EventKind::Healed, &victim_key);
            Ok(())
        });
        host.buses[0].bind(EventKind::Healed, remover, &[]);
        host.buses[0].bind(EventKind::Healed, victim, &[]);

        trigger(&mut host, 0, &healed(1)).unwrap();
        assert!(host.log.is_empty());
    }

    #[test]
    fn test_error_stops_dispatch() {
        let mut host = Host::default();
        let failing = callback(|_: &mut Host, _: &Event, _: &[BoundArg]| Err(GameError::GameEnded));
        let id = host.buses[0].bind_once(EventKind::Healed, failing, &[]);
        host.buses[0].bind(EventKind::Healed, logger("after"), &[]);

        assert_eq!(trigger(&mut host, 0, &healed(1)), Err(GameError::GameEnded));
        assert!(host.log.is_empty());
        assert!(!host.buses[0].is_bound(EventKind::Healed, id));
    }

    #[test]
    fn test_other_kinds_untouched() {
        let mut host = Host::default();
        host.buses[0].bind(EventKind::Healed, logger("heal"), &[]);
        trigger(&mut host, 0, &Event::Silenced).unwrap();
        trigger(&mut host, 1, &healed(1)).unwrap();
        trigger(&mut host, 7, &healed(1)).unwrap();
        assert!(host.log.is_empty());
    }
}
