use crate::Id;
use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

/// The closed set of event types the document dispatches. Application
/// notifications use [`EventKind::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Focus,
    Blur,
    Change,
    Custom(Arc<str>),
}

impl EventKind {
    pub fn custom(name: &str) -> Self {
        EventKind::Custom(Arc::from(name))
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "click" => EventKind::Click,
            "keydown" => EventKind::KeyDown,
            "focus" => EventKind::Focus,
            "blur" => EventKind::Blur,
            "change" => EventKind::Change,
            other => EventKind::custom(other),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Change => "change",
            EventKind::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical key, named after `KeyboardEvent.code`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Enter,
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other(Arc<str>),
}

impl KeyCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => KeyCode::Space,
            "Enter" => KeyCode::Enter,
            "Tab" => KeyCode::Tab,
            "Escape" => KeyCode::Escape,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            other => KeyCode::Other(Arc::from(other)),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            KeyCode::Space => "Space",
            KeyCode::Enter => "Enter",
            KeyCode::Tab => "Tab",
            KeyCode::Escape => "Escape",
            KeyCode::ArrowLeft => "ArrowLeft",
            KeyCode::ArrowRight => "ArrowRight",
            KeyCode::ArrowUp => "ArrowUp",
            KeyCode::ArrowDown => "ArrowDown",
            KeyCode::Other(code) => code,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardData {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

/// Propagation flags fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
}

impl EventInit {
    pub const NON_BUBBLING: EventInit = EventInit {
        bubbles: false,
        cancelable: false,
        composed: true,
    };
}

/// Notification defaults: bubbling, cancelable and composed.
impl Default for EventInit {
    fn default() -> Self {
        Self {
            bubbles: true,
            cancelable: true,
            composed: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Payload wrapper produced by [`extend_event`].
#[derive(Debug)]
pub struct EventDetail<T> {
    pub data: T,
    pub original_event: Option<Event>,
}

#[derive(Clone)]
pub struct Event {
    kind: EventKind,
    init: EventInit,
    pub(crate) target: Option<Id>,
    pub(crate) current_target: Option<Id>,
    pub(crate) phase: EventPhase,
    related_target: Option<Id>,
    keyboard: Option<KeyboardData>,
    detail: Option<Rc<dyn Any>>,
    pub(crate) is_trusted: bool,
    default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind, init: EventInit) -> Self {
        Self {
            kind,
            init,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            related_target: None,
            keyboard: None,
            detail: None,
            is_trusted: false,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn click() -> Self {
        Self::new(EventKind::Click, EventInit::default())
    }

    pub fn key_down(code: KeyCode, modifiers: Modifiers) -> Self {
        let mut event = Self::new(EventKind::KeyDown, EventInit::default());
        event.keyboard = Some(KeyboardData { code, modifiers });
        event
    }

    /// `focus` or `blur`; neither bubbles. `related` is the node focus moved
    /// from (focus) or to (blur).
    pub fn focus_change(kind: EventKind, related: Option<Id>) -> Self {
        debug_assert!(matches!(kind, EventKind::Focus | EventKind::Blur));
        let mut event = Self::new(kind, EventInit::NON_BUBBLING);
        event.related_target = related;
        event
    }

    pub fn change() -> Self {
        Self::new(
            EventKind::Change,
            EventInit {
                bubbles: true,
                cancelable: false,
                composed: false,
            },
        )
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn init(&self) -> EventInit {
        self.init
    }

    pub fn bubbles(&self) -> bool {
        self.init.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.init.cancelable
    }

    pub fn composed(&self) -> bool {
        self.init.composed
    }

    pub fn target(&self) -> Option<Id> {
        self.target
    }

    pub fn current_target(&self) -> Option<Id> {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn related_target(&self) -> Option<Id> {
        self.related_target
    }

    pub fn keyboard(&self) -> Option<&KeyboardData> {
        self.keyboard.as_ref()
    }

    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// No-op unless the event is cancelable.
    pub fn prevent_default(&mut self) {
        if self.init.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Typed access to a payload attached with [`extend_event`].
    pub fn detail<T: 'static>(&self) -> Option<&EventDetail<T>> {
        self.detail.as_deref()?.downcast_ref::<EventDetail<T>>()
    }

    pub(crate) fn mark_trusted(mut self) -> Self {
        self.is_trusted = true;
        self
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("init", &self.init)
            .field("target", &self.target)
            .field("phase", &self.phase)
            .field("related_target", &self.related_target)
            .field("keyboard", &self.keyboard)
            .field("has_detail", &self.detail.is_some())
            .field("default_prevented", &self.default_prevented)
            .finish()
    }
}

/// Build an application notification.
///
/// With an originating event, its `bubbles`, `cancelable` and `composed`
/// flags are copied and a snapshot of it travels in the payload. Without
/// one, all three flags default to `true`.
pub fn extend_event<T: 'static>(kind: EventKind, original: Option<&Event>, data: T) -> Event {
    let init = original.map(Event::init).unwrap_or_default();
    let mut event = Event::new(kind, init);
    event.detail = Some(Rc::new(EventDetail {
        data,
        original_event: original.cloned(),
    }));
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_event_defaults_without_original() {
        let event = extend_event(EventKind::custom("x:toggle"), None, 7u32);
        assert_eq!(event.init(), EventInit::default());
        let detail = event.detail::<u32>().unwrap();
        assert_eq!(detail.data, 7);
        assert!(detail.original_event.is_none());
        assert!(event.detail::<String>().is_none());
    }

    #[test]
    fn extend_event_copies_original_flags() {
        let blur = Event::focus_change(EventKind::Blur, None);
        let event = extend_event(EventKind::custom("x:toggle"), Some(&blur), ());
        assert!(!event.bubbles());
        assert!(!event.cancelable());
        assert!(event.composed());
        let original = event.detail::<()>().unwrap().original_event.as_ref().unwrap();
        assert_eq!(original.kind(), &EventKind::Blur);
    }

    #[test]
    fn prevent_default_respects_cancelable() {
        let mut change = Event::change();
        change.prevent_default();
        assert!(!change.default_prevented());

        let mut key = Event::key_down(KeyCode::Tab, Modifiers::SHIFT);
        key.prevent_default();
        assert!(key.default_prevented());
    }

    #[test]
    fn key_codes_round_trip_through_names() {
        assert_eq!(KeyCode::from_code("Escape"), KeyCode::Escape);
        assert_eq!(KeyCode::from_code("KeyA").as_code(), "KeyA");
        assert_eq!(EventKind::from_name("blur"), EventKind::Blur);
        assert_eq!(EventKind::from_name("multi-dropdown:toggle").as_str(), "multi-dropdown:toggle");
    }
}
