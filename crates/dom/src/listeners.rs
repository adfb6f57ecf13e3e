use crate::{Document, Event, EventKind, Id};
use std::collections::HashMap;
use std::rc::Rc;

/// Receives dispatched events. Handlers take `&self` so that a listener can
/// be re-entered when it triggers another dispatch (moving focus fires
/// `blur`, for instance); keep mutable state in `Cell`/`RefCell`.
pub trait EventListener {
    fn handle_event(&self, doc: &mut Document, event: &mut Event);
}

impl<F> EventListener for F
where
    F: Fn(&mut Document, &mut Event),
{
    fn handle_event(&self, doc: &mut Document, event: &mut Event) {
        self(doc, event)
    }
}

/// Wrap a closure as a shareable listener handle.
///
/// Keep the returned `Rc` around: removal matches by pointer identity.
pub fn listener<F>(f: F) -> Rc<dyn EventListener>
where
    F: Fn(&mut Document, &mut Event) + 'static,
{
    Rc::new(f)
}

#[derive(Clone)]
struct Registration {
    kind: EventKind,
    capture: bool,
    listener: Rc<dyn EventListener>,
}

impl Registration {
    fn is(&self, kind: &EventKind, capture: bool, listener: &Rc<dyn EventListener>) -> bool {
        self.capture == capture && self.kind == *kind && Rc::ptr_eq(&self.listener, listener)
    }
}

#[derive(Default)]
pub(crate) struct ListenerStore {
    map: HashMap<Id, Vec<Registration>>,
}

impl ListenerStore {
    /// Returns `false` when an identical registration already exists.
    fn add(&mut self, node: Id, kind: EventKind, capture: bool, listener: Rc<dyn EventListener>) -> bool {
        let regs = self.map.entry(node).or_default();
        if regs.iter().any(|r| r.is(&kind, capture, &listener)) {
            return false;
        }
        regs.push(Registration {
            kind,
            capture,
            listener,
        });
        true
    }

    fn remove(
        &mut self,
        node: Id,
        kind: &EventKind,
        capture: bool,
        listener: &Rc<dyn EventListener>,
    ) -> bool {
        let Some(regs) = self.map.get_mut(&node) else {
            return false;
        };
        let Some(pos) = regs.iter().position(|r| r.is(kind, capture, listener)) else {
            return false;
        };
        regs.remove(pos);
        if regs.is_empty() {
            self.map.remove(&node);
        }
        true
    }

    pub(crate) fn contains(
        &self,
        node: Id,
        kind: &EventKind,
        capture: bool,
        listener: &Rc<dyn EventListener>,
    ) -> bool {
        self.map
            .get(&node)
            .is_some_and(|regs| regs.iter().any(|r| r.is(kind, capture, listener)))
    }

    /// Snapshot of the matching listeners, in registration order.
    pub(crate) fn collect(&self, node: Id, kind: &EventKind, capture: bool) -> Vec<Rc<dyn EventListener>> {
        self.map
            .get(&node)
            .map(|regs| {
                regs.iter()
                    .filter(|r| r.capture == capture && r.kind == *kind)
                    .map(|r| Rc::clone(&r.listener))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, node: Id) -> usize {
        self.map.get(&node).map(Vec::len).unwrap_or(0)
    }

    pub(crate) fn release(&mut self, node: Id) {
        self.map.remove(&node);
    }
}

impl Document {
    /// Register `listener` for `kind` on `node`. Registering the same
    /// listener twice for the same kind and phase is a no-op.
    pub fn add_event_listener(
        &mut self,
        node: Id,
        kind: EventKind,
        listener: Rc<dyn EventListener>,
        capture: bool,
    ) -> bool {
        if !self.is_live(node) {
            log::warn!(target: "dom.events", "add_event_listener on released node {node}");
            return false;
        }
        self.listeners.add(node, kind, capture, listener)
    }

    pub fn remove_event_listener(
        &mut self,
        node: Id,
        kind: &EventKind,
        listener: &Rc<dyn EventListener>,
        capture: bool,
    ) -> bool {
        self.listeners.remove(node, kind, capture, listener)
    }

    /// Number of registrations on `node`, across all kinds and phases.
    pub fn listener_count(&self, node: Id) -> usize {
        self.listeners.count(node)
    }
}
