//! Multi-select dropdown custom element.
//!
//! Expected markup:
//!
//! ```text
//! <multi-dropdown>
//!   <div class="select-title">...</div>
//!   <div class="select-options">
//!     <input type="checkbox" value="...">  (any depth, any number)
//!   </div>
//! </multi-dropdown>
//! ```
//!
//! The controller is either `CLOSED` or `OPEN`, mirrored by the `open` class
//! on the root. Every `open`/`close`/`toggle` dispatches a
//! `multi-dropdown:toggle` notification from the root, even when the state
//! did not change. Checkbox `change` events inside the widget are re-emitted
//! as `multi-dropdown:change`.

use crate::focus_nav::focus_next;
use dom::{
    DOCUMENT_ID, DomError, Document, Event, EventKind, EventListener, Id, KeyCode,
    LifecycleCallbacks, SelectorList, extend_event,
};
use std::cell::Cell;
use std::rc::{Rc, Weak};

pub const TAG: &str = "multi-dropdown";

const CHECKBOX: &str = "[type=\"checkbox\"]";
const CHECKED_CHECKBOX: &str = "[type=\"checkbox\"]:checked";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownConfig {
    pub title_selector: String,
    pub options_selector: String,
    /// Class present on the root exactly while the dropdown is open.
    pub open_class: String,
    /// Notification names are `<prefix>:toggle` and `<prefix>:change`.
    pub event_prefix: String,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            title_selector: ".select-title".to_string(),
            options_selector: ".select-options".to_string(),
            open_class: "open".to_string(),
            event_prefix: TAG.to_string(),
        }
    }
}

/// Payload of the toggle notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleDetail {
    pub is_open: bool,
    pub values: Vec<String>,
}

/// Payload of the change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeDetail {
    /// The checkbox whose `change` triggered the notification.
    pub element: Id,
    pub values: Vec<String>,
}

/// Config compiled once per definition and shared by every instance.
struct Compiled {
    title: SelectorList,
    options: SelectorList,
    checkbox: SelectorList,
    checked: SelectorList,
    open_class: String,
    toggle_kind: EventKind,
    change_kind: EventKind,
}

impl Compiled {
    fn new(config: &DropdownConfig) -> Result<Self, DomError> {
        Ok(Self {
            title: SelectorList::parse(&config.title_selector)?,
            options: SelectorList::parse(&config.options_selector)?,
            checkbox: SelectorList::parse(CHECKBOX)?,
            checked: SelectorList::parse(CHECKED_CHECKBOX)?,
            open_class: config.open_class.clone(),
            toggle_kind: EventKind::custom(&format!("{}:toggle", config.event_prefix)),
            change_kind: EventKind::custom(&format!("{}:change", config.event_prefix)),
        })
    }
}

/// Register the dropdown under its default tag with the default config.
pub fn define(doc: &mut Document) -> Result<(), DomError> {
    define_with(doc, TAG, DropdownConfig::default())
}

pub fn define_with(doc: &mut Document, tag: &str, config: DropdownConfig) -> Result<(), DomError> {
    let compiled = Rc::new(Compiled::new(&config)?);
    doc.define_custom_element(tag, move |_, root| MultiDropdown::new(root, Rc::clone(&compiled)))
}

/// Controller for one dropdown element.
///
/// Handlers re-enter the controller (moving focus fires `blur` at it while
/// a `keydown` is being handled), so all state sits in `Cell`s.
pub struct MultiDropdown {
    root: Id,
    config: Rc<Compiled>,
    this: Weak<MultiDropdown>,
    is_open: Cell<bool>,
    mounted: Cell<bool>,
    title: Cell<Option<Id>>,
    options: Cell<Option<Id>>,
}

impl MultiDropdown {
    fn new(root: Id, config: Rc<Compiled>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            root,
            config,
            this: this.clone(),
            is_open: Cell::new(false),
            mounted: Cell::new(false),
            title: Cell::new(None),
            options: Cell::new(None),
        })
    }

    pub fn root(&self) -> Id {
        self.root
    }

    pub fn is_open(&self) -> bool {
        self.is_open.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// The clickable label region. Looked up again whenever the cached
    /// element has left the widget, so markup appended after mount is found.
    pub fn title_region(&self, doc: &Document) -> Option<Id> {
        self.region(doc, &self.title, &self.config.title)
    }

    pub fn options_region(&self, doc: &Document) -> Option<Id> {
        self.region(doc, &self.options, &self.config.options)
    }

    fn region(&self, doc: &Document, cache: &Cell<Option<Id>>, selector: &SelectorList) -> Option<Id> {
        if let Some(id) = cache.get()
            && id != self.root
            && doc.contains(self.root, id)
            && selector.matches(doc, id)
        {
            return Some(id);
        }
        let found = doc.query_selector(self.root, selector);
        cache.set(found);
        found
    }

    /// Values of the checked options, in document order. Recomputed on
    /// every call.
    pub fn selected_values(&self, doc: &Document) -> Vec<String> {
        let Some(options) = self.options_region(doc) else {
            return Vec::new();
        };
        doc.query_selector_all(options, &self.config.checked)
            .into_iter()
            .map(|id| doc.value(id).unwrap_or_default().to_string())
            .collect()
    }

    pub fn open(&self, doc: &mut Document, original: Option<&Event>) -> Result<Event, DomError> {
        self.set_open(doc, true, original)
    }

    pub fn close(&self, doc: &mut Document, original: Option<&Event>) -> Result<Event, DomError> {
        self.set_open(doc, false, original)
    }

    pub fn toggle(&self, doc: &mut Document, original: Option<&Event>) -> Result<Event, DomError> {
        self.set_open(doc, !self.is_open.get(), original)
    }

    /// Apply the state and its class marker, then notify. The notification
    /// is dispatched from the root and returned after propagation.
    fn set_open(&self, doc: &mut Document, open: bool, original: Option<&Event>) -> Result<Event, DomError> {
        doc.set_class(self.root, &self.config.open_class, open)?;
        self.is_open.set(open);
        log::debug!(
            target: "widgets.multi_dropdown",
            "{} {}",
            self.root,
            if open { "open" } else { "closed" }
        );
        let detail = ToggleDetail {
            is_open: open,
            values: self.selected_values(doc),
        };
        let event = extend_event(self.config.toggle_kind.clone(), original, detail);
        doc.dispatch_event(self.root, event)
    }

    fn handle(&self) -> Option<Rc<dyn EventListener>> {
        let this = self.this.upgrade()?;
        Some(this as Rc<dyn EventListener>)
    }

    /// `true` for `id` inside the widget subtree, the root included.
    fn owns(&self, doc: &Document, id: Option<Id>) -> bool {
        id.is_some_and(|id| doc.contains(self.root, id))
    }

    fn subscriptions(&self) -> [(Id, EventKind, bool); 4] {
        [
            (DOCUMENT_ID, EventKind::Click, false),
            (self.root, EventKind::Change, false),
            (self.root, EventKind::KeyDown, false),
            (self.root, EventKind::Blur, true),
        ]
    }

    fn mount(&self, doc: &mut Document) -> Result<(), DomError> {
        if self.mounted.get() || !doc.is_connected(self.root) {
            return Ok(());
        }
        let Some(handle) = self.handle() else {
            return Ok(());
        };
        self.title_region(doc);
        self.options_region(doc);
        for (node, kind, capture) in self.subscriptions() {
            doc.add_event_listener(node, kind, Rc::clone(&handle), capture);
        }
        doc.set_attr(self.root, "tabindex", "0")?;
        self.mounted.set(true);
        log::debug!(
            target: "widgets.multi_dropdown",
            "mounted {} (title {:?}, options {:?})",
            self.root,
            self.title.get(),
            self.options.get()
        );
        Ok(())
    }

    fn unmount(&self, doc: &mut Document) -> Result<(), DomError> {
        if !self.mounted.replace(false) {
            return Ok(());
        }
        if let Some(handle) = self.handle() {
            for (node, kind, capture) in self.subscriptions() {
                doc.remove_event_listener(node, &kind, &handle, capture);
            }
        }
        doc.remove_attr(self.root, "tabindex")?;
        doc.remove_class(self.root, &self.config.open_class)?;
        self.is_open.set(false);
        self.title.set(None);
        self.options.set(None);
        log::debug!(target: "widgets.multi_dropdown", "unmounted {}", self.root);
        Ok(())
    }

    fn on_click(&self, doc: &mut Document, event: &mut Event) -> Result<(), DomError> {
        let target = event.target();
        if target.is_some() && target == self.title_region(doc) {
            self.toggle(doc, Some(&*event))?;
        } else if self.is_open.get() && !self.owns(doc, target) {
            self.close(doc, Some(&*event))?;
        }
        Ok(())
    }

    fn on_keydown(&self, doc: &mut Document, event: &mut Event) -> Result<(), DomError> {
        let Some(code) = event.keyboard().map(|k| k.code.clone()) else {
            return Ok(());
        };
        if !is_handled_key(&code) {
            return Ok(());
        }
        // Tab leaves the default alone when focus runs off the end of the
        // page; `focus_next` prevents it only when it moved focus.
        if code != KeyCode::Tab {
            event.prevent_default();
        }
        let target = event.target();

        match code {
            KeyCode::Escape => {
                doc.focus(self.root)?;
                self.close(doc, Some(&*event))?;
            }
            KeyCode::Space | KeyCode::Enter => match target {
                Some(t) if t == self.root => {
                    self.toggle(doc, Some(&*event))?;
                }
                Some(t) if self.config.checkbox.matches(doc, t) => {
                    let checked = doc.is_checked(t);
                    doc.set_checked(t, !checked)?;
                }
                _ => {}
            },
            KeyCode::Tab => {
                focus_next(doc, Some(event))?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Runs in the capture phase, ahead of any listener inside the widget.
    fn on_blur(&self, doc: &mut Document, event: &mut Event) -> Result<(), DomError> {
        if !self.is_open.get() || self.owns(doc, event.related_target()) {
            return Ok(());
        }
        let origin = match event.target() {
            Some(t) if self.is_option_checkbox(doc, t) => "option",
            Some(t) if Some(t) == self.title_region(doc) => "title",
            _ => "widget",
        };
        log::debug!(
            target: "widgets.multi_dropdown",
            "{} lost focus from {origin}, closing",
            self.root
        );
        self.close(doc, Some(&*event))?;
        Ok(())
    }

    fn on_change(&self, doc: &mut Document, event: &mut Event) -> Result<(), DomError> {
        let Some(target) = event.target() else {
            return Ok(());
        };
        if !self.config.checkbox.matches(doc, target) {
            return Ok(());
        }
        let detail = ChangeDetail {
            element: target,
            values: self.selected_values(doc),
        };
        let notification = extend_event(self.config.change_kind.clone(), None, detail);
        doc.dispatch_event(self.root, notification)?;
        Ok(())
    }

    fn is_option_checkbox(&self, doc: &Document, id: Id) -> bool {
        self.options_region(doc)
            .is_some_and(|options| options != id && doc.contains(options, id))
            && self.config.checkbox.matches(doc, id)
    }
}

fn is_handled_key(code: &KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Space
            | KeyCode::Enter
            | KeyCode::Tab
            | KeyCode::ArrowLeft
            | KeyCode::ArrowRight
            | KeyCode::ArrowUp
            | KeyCode::ArrowDown
            | KeyCode::Escape
    )
}

impl EventListener for MultiDropdown {
    fn handle_event(&self, doc: &mut Document, event: &mut Event) {
        if !self.mounted.get() {
            log::warn!(
                target: "widgets.multi_dropdown",
                "{} event reached unmounted dropdown {}",
                event.kind(),
                self.root
            );
            return;
        }
        let result = match event.kind() {
            EventKind::Click => self.on_click(doc, event),
            EventKind::KeyDown => self.on_keydown(doc, event),
            EventKind::Blur => self.on_blur(doc, event),
            EventKind::Change => self.on_change(doc, event),
            _ => Ok(()),
        };
        if let Err(err) = result {
            log::warn!(
                target: "widgets.multi_dropdown",
                "dropdown {} failed to handle {}: {err}",
                self.root,
                event.kind()
            );
        }
    }
}

impl LifecycleCallbacks for MultiDropdown {
    fn connected_callback(&self, doc: &mut Document) {
        if let Err(err) = self.mount(doc) {
            log::warn!(target: "widgets.multi_dropdown", "mount {} failed: {err}", self.root);
        }
    }

    fn disconnected_callback(&self, doc: &mut Document) {
        if let Err(err) = self.unmount(doc) {
            log::warn!(target: "widgets.multi_dropdown", "unmount {} failed: {err}", self.root);
        }
    }
}

impl std::fmt::Debug for MultiDropdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiDropdown")
            .field("root", &self.root)
            .field("is_open", &self.is_open.get())
            .field("mounted", &self.mounted.get())
            .finish_non_exhaustive()
    }
}
