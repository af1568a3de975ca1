//! Event bus integration tests.
//!
//! A small host stands in for the game so the dispatch rules can be checked
//! against a model under arbitrary bind/trigger/unbind sequences.

use proptest::prelude::*;

use hearth_engine::core::EntityId;
use hearth_engine::events::{
    callback, trigger, BoundArg, BusHost, Event, EventBus, EventKind, HandlerId,
};

#[derive(Default)]
struct Host {
    bus: EventBus<Host>,
    fired: Vec<u32>,
}

impl BusHost for Host {
    type Address = ();

    fn bus_mut(&mut self, _: ()) -> Option<&mut EventBus<Host>> {
        Some(&mut self.bus)
    }
}

fn count(host: &mut Host, _: &Event, bound: &[BoundArg]) -> hearth_engine::Result<()> {
    if let Some(slot) = bound.first().and_then(|arg| arg.int()) {
        host.fired[slot as usize] += 1;
    }
    Ok(())
}

#[derive(Clone, Debug)]
enum Op {
    Bind { once: bool },
    Trigger,
    Unbind(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|once| Op::Bind { once }),
        Just(Op::Trigger),
        Just(Op::Trigger),
        (0usize..16).prop_map(Op::Unbind),
    ]
}

struct Model {
    id: HandlerId,
    once: bool,
    live: bool,
    expected: u32,
}

proptest! {
    /// One-shot handlers fire at most once and leave the registry; persistent
    /// handlers fire once per trigger until unbound.
    #[test]
    fn prop_handler_counts_follow_model(ops in prop::collection::vec(op(), 0..60)) {
        let mut host = Host::default();
        let mut model: Vec<Model> = Vec::new();

        for op in ops {
            match op {
                Op::Bind { once } => {
                    let slot = model.len() as i32;
                    let bound = [BoundArg::Int(slot)];
                    let id = if once {
                        host.bus.bind_once(EventKind::Healed, callback(count), &bound)
                    } else {
                        host.bus.bind(EventKind::Healed, callback(count), &bound)
                    };
                    host.fired.push(0);
                    model.push(Model { id, once, live: true, expected: 0 });
                }
                Op::Trigger => {
                    trigger(&mut host, (), &Event::Healed { amount: 1 }).unwrap();
                    for handler in model.iter_mut().filter(|h| h.live) {
                        handler.expected += 1;
                        if handler.once {
                            handler.live = false;
                        }
                    }
                }
                Op::Unbind(n) => {
                    if model.is_empty() {
                        continue;
                    }
                    let len = model.len();
                    let handler = &mut model[n % len];
                    let removed = host.bus.unbind_handler(EventKind::Healed, handler.id);
                    prop_assert_eq!(removed, handler.live);
                    handler.live = false;
                }
            }

            for (slot, handler) in model.iter().enumerate() {
                prop_assert_eq!(host.fired[slot], handler.expected);
                prop_assert_eq!(host.bus.is_bound(EventKind::Healed, handler.id), handler.live);
                if handler.once {
                    prop_assert!(handler.expected <= 1);
                }
            }
            let live = model.iter().filter(|h| h.live).count();
            prop_assert_eq!(host.bus.handler_count(EventKind::Healed), live);
        }
    }
}

#[test]
fn test_unbind_by_callback_identity() {
    let mut host = Host::default();
    host.fired = vec![0; 3];
    let shared = callback(count);

    host.bus.bind(EventKind::Silenced, shared.clone(), &[BoundArg::Int(0)]);
    host.bus.bind(EventKind::Silenced, callback(count), &[BoundArg::Int(1)]);
    host.bus.bind_once(EventKind::Silenced, shared.clone(), &[BoundArg::Int(2)]);

    assert_eq!(host.bus.unbind(EventKind::Silenced, &shared), 2);
    trigger(&mut host, (), &Event::Silenced).unwrap();
    assert_eq!(host.fired, vec![0, 1, 0]);
}

#[test]
fn test_payload_reaches_handler_before_bound_args() {
    #[derive(Default)]
    struct Recorder {
        bus: EventBus<Recorder>,
        seen: Vec<(i32, EntityId)>,
    }

    impl BusHost for Recorder {
        type Address = ();

        fn bus_mut(&mut self, _: ()) -> Option<&mut EventBus<Recorder>> {
            Some(&mut self.bus)
        }
    }

    let mut host = Recorder::default();
    host.bus.bind(
        EventKind::HealthIncreased,
        callback(|host: &mut Recorder, event: &Event, bound: &[BoundArg]| {
            let amount = event.amount().unwrap_or_default();
            let who = bound[0].entity().unwrap();
            host.seen.push((amount, who));
            Ok(())
        }),
        &[BoundArg::Entity(EntityId(9))],
    );

    trigger(&mut host, (), &Event::HealthIncreased { amount: 4 }).unwrap();
    trigger(&mut host, (), &Event::HealthIncreased { amount: 1 }).unwrap();
    assert_eq!(host.seen, vec![(4, EntityId(9)), (1, EntityId(9))]);
}
