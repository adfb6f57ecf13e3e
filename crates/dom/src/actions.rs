//! Host-side user actions: the platform behaviour around a click or a key
//! press, as a browser would perform it for a real user.

use crate::{DOCUMENT_ID, DomError, Document, Event, Id, KeyCode, Modifiers};

impl Document {
    /// Click `id` as a user would.
    ///
    /// Checkboxes flip before the click is dispatched and flip back if a
    /// listener prevents the default; otherwise a bubbling `change` follows.
    pub fn click(&mut self, id: Id) -> Result<Event, DomError> {
        self.record(id)?;
        let activates = self.is_checkbox(id) && !self.is_disabled(id);
        if activates {
            let was = self.is_checked(id);
            self.set_checked(id, !was)?;
            let event = self.dispatch_event(id, Event::click().mark_trusted())?;
            if event.default_prevented() {
                self.set_checked(id, was)?;
            } else {
                self.dispatch_event(id, Event::change().mark_trusted())?;
            }
            return Ok(event);
        }
        self.dispatch_event(id, Event::click().mark_trusted())
    }

    /// Press a key. The `keydown` goes to the focused element, or to the
    /// document when nothing has focus.
    pub fn press_key(&mut self, code: KeyCode, modifiers: Modifiers) -> Result<Event, DomError> {
        let target = self.active_element.unwrap_or(DOCUMENT_ID);
        self.dispatch_event(target, Event::key_down(code, modifiers).mark_trusted())
    }
}
