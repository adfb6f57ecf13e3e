use dom::{Document, Event, EventKind, EventListener, EventPhase, Id};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedEvent {
    pub kind: String,
    pub target: Option<Id>,
    pub current_target: Option<Id>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    pub trusted: bool,
}

impl RecordedEvent {
    fn from_event(event: &Event) -> Self {
        Self {
            kind: event.kind().to_string(),
            target: event.target(),
            current_target: event.current_target(),
            phase: event.phase(),
            bubbles: event.bubbles(),
            cancelable: event.cancelable(),
            trusted: event.is_trusted(),
        }
    }
}

/// Listener that keeps a copy of every event it sees.
///
/// Clones share the same log. Full events are kept too, so tests can read
/// typed payloads with `Event::detail`.
#[derive(Clone, Default)]
pub struct EventRecorder {
    log: Rc<RefCell<Vec<(RecordedEvent, Event)>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register on `node` for `kind` and return the handle for later removal.
    pub fn attach(&self, doc: &mut Document, node: Id, kind: EventKind, capture: bool) -> Rc<dyn EventListener> {
        let handle: Rc<dyn EventListener> = Rc::new(self.clone());
        doc.add_event_listener(node, kind, Rc::clone(&handle), capture);
        handle
    }

    pub fn records(&self) -> Vec<RecordedEvent> {
        self.log.borrow().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn kinds(&self) -> Vec<String> {
        self.log.borrow().iter().map(|(r, _)| r.kind.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl EventListener for EventRecorder {
    fn handle_event(&self, _doc: &mut Document, event: &mut Event) {
        self.log
            .borrow_mut()
            .push((RecordedEvent::from_event(event), event.clone()));
    }
}
