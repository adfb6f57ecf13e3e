//! Event dispatch: capture down the ancestor path, target, then bubble.

use crate::event::EventPhase;
use crate::{DomError, Document, Event, Id};

impl Document {
    /// Dispatch `event` at `target` and return it after propagation, so the
    /// caller can inspect `default_prevented`.
    ///
    /// Listeners removed while the event is in flight are not invoked.
    pub fn dispatch_event(&mut self, target: Id, mut event: Event) -> Result<Event, DomError> {
        self.record(target)?;

        let mut path: Vec<Id> = self.ancestors(target).collect();
        path.reverse();

        event.target = Some(target);
        event.propagation_stopped = false;
        event.immediate_propagation_stopped = false;

        log::trace!(
            target: "dom.events",
            "dispatch {} at {target} (path len {})",
            event.kind(),
            path.len() + 1
        );

        'propagate: {
            event.phase = EventPhase::Capturing;
            for node in &path {
                self.invoke(*node, &mut event, true);
                if event.propagation_stopped {
                    break 'propagate;
                }
            }

            event.phase = EventPhase::AtTarget;
            self.invoke(target, &mut event, true);
            if event.propagation_stopped {
                break 'propagate;
            }
            self.invoke(target, &mut event, false);
            if event.propagation_stopped || !event.bubbles() {
                break 'propagate;
            }

            event.phase = EventPhase::Bubbling;
            for node in path.iter().rev() {
                self.invoke(*node, &mut event, false);
                if event.propagation_stopped {
                    break 'propagate;
                }
            }
        }

        log::trace!(
            target: "dom.events",
            "done {} at {target} default_prevented={} stopped={}",
            event.kind(),
            event.default_prevented(),
            event.propagation_stopped
        );

        event.phase = EventPhase::None;
        event.current_target = None;
        Ok(event)
    }

    fn invoke(&mut self, node: Id, event: &mut Event, capture: bool) {
        let kind = event.kind().clone();
        let listeners = self.listeners.collect(node, &kind, capture);
        if listeners.is_empty() {
            return;
        }
        event.current_target = Some(node);
        for listener in listeners {
            if !self.listeners.contains(node, &kind, capture, &listener) {
                continue;
            }
            log::trace!(
                target: "dom.events",
                "invoke {kind} on {node} phase={:?}",
                event.phase()
            );
            listener.handle_event(self, event);
            if event.immediate_propagation_stopped {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{DOCUMENT_ID, Document, Event, EventKind, listener};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn capture_target_bubble_order() {
        let mut doc = Document::new();
        let outer = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        let inner = doc.append_element(outer, "span", &[]).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        for (node, capture, label) in [
            (outer, true, "outer-capture"),
            (outer, false, "outer-bubble"),
            (inner, false, "inner-bubble"),
            (inner, true, "inner-capture"),
            (DOCUMENT_ID, false, "doc-bubble"),
        ] {
            let log = Rc::clone(&log);
            doc.add_event_listener(
                node,
                EventKind::Click,
                listener(move |_, _| log.borrow_mut().push(label)),
                capture,
            );
        }

        doc.dispatch_event(inner, Event::click()).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                "outer-capture",
                "inner-capture",
                "inner-bubble",
                "outer-bubble",
                "doc-bubble"
            ]
        );
    }

    #[test]
    fn non_bubbling_events_stop_at_target() {
        let mut doc = Document::new();
        let outer = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        let inner = doc.append_element(outer, "input", &[]).unwrap();

        let hits = Rc::new(RefCell::new(Vec::new()));
        for capture in [true, false] {
            let hits = Rc::clone(&hits);
            doc.add_event_listener(
                outer,
                EventKind::Blur,
                listener(move |_, _| hits.borrow_mut().push(capture)),
                capture,
            );
        }

        doc.dispatch_event(inner, Event::focus_change(EventKind::Blur, None))
            .unwrap();
        assert_eq!(*hits.borrow(), vec![true]);
    }

    #[test]
    fn stop_propagation_and_removal_during_dispatch() {
        let mut doc = Document::new();
        let outer = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        let inner = doc.append_element(outer, "span", &[]).unwrap();

        let hits = Rc::new(RefCell::new(0));
        let second = {
            let hits = Rc::clone(&hits);
            listener(move |_, _| *hits.borrow_mut() += 1)
        };
        let remover = {
            let second = Rc::clone(&second);
            listener(move |doc, event| {
                doc.remove_event_listener(inner, &EventKind::Click, &second, false);
                event.stop_propagation();
            })
        };
        doc.add_event_listener(inner, EventKind::Click, remover, false);
        doc.add_event_listener(inner, EventKind::Click, Rc::clone(&second), false);
        let outer_hits = Rc::clone(&hits);
        doc.add_event_listener(
            outer,
            EventKind::Click,
            listener(move |_, _| *outer_hits.borrow_mut() += 100),
            false,
        );

        let event = doc.dispatch_event(inner, Event::click()).unwrap();
        assert_eq!(*hits.borrow(), 0);
        assert!(event.propagation_stopped());
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut doc = Document::new();
        let hits = Rc::new(RefCell::new(0));
        let l = {
            let hits = Rc::clone(&hits);
            listener(move |_, _| *hits.borrow_mut() += 1)
        };
        assert!(doc.add_event_listener(DOCUMENT_ID, EventKind::Click, Rc::clone(&l), false));
        assert!(!doc.add_event_listener(DOCUMENT_ID, EventKind::Click, Rc::clone(&l), false));
        assert!(doc.add_event_listener(DOCUMENT_ID, EventKind::Click, Rc::clone(&l), true));

        doc.dispatch_event(DOCUMENT_ID, Event::click()).unwrap();
        assert_eq!(*hits.borrow(), 2);
    }
}
