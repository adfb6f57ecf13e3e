use crate::{DomError, Document, Event, EventKind, Id, SelectorList};
use std::sync::LazyLock;

/// Elements that accept focus from script (`element.focus()`).
static FOCUSABLE: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(
        "a[href], area[href], input:not([disabled]), select:not([disabled]), \
         textarea:not([disabled]), button:not([disabled]), iframe, object, embed, \
         [tabindex], [contenteditable], audio[controls], video[controls]",
    )
    .expect("focusable selector is valid")
});

impl Document {
    pub fn active_element(&self) -> Option<Id> {
        self.active_element
    }

    pub fn is_focusable(&self, id: Id) -> bool {
        self.is_connected(id) && FOCUSABLE.matches(self, id)
    }

    /// Move focus to `id`. Fires `blur` on the previously focused element
    /// (related target: `id`), then `focus` on `id` (related target: the
    /// previous element).
    ///
    /// Returns `false` when nothing changed: the node is not focusable or
    /// already focused.
    pub fn focus(&mut self, id: Id) -> Result<bool, DomError> {
        self.record(id)?;
        if self.active_element == Some(id) || !self.is_focusable(id) {
            return Ok(false);
        }

        let previous = self.active_element.take();
        log::debug!(target: "dom.focus", "focus {previous:?} -> {id}");
        if let Some(prev) = previous
            && self.is_live(prev)
        {
            self.dispatch_event(prev, Event::focus_change(EventKind::Blur, Some(id)).mark_trusted())?;
        }

        self.active_element = Some(id);
        self.dispatch_event(id, Event::focus_change(EventKind::Focus, previous).mark_trusted())?;
        Ok(true)
    }

    /// Drop focus from `id` if it is focused. Focus leaves the document.
    pub fn blur(&mut self, id: Id) -> Result<(), DomError> {
        self.record(id)?;
        if self.active_element != Some(id) {
            return Ok(());
        }
        log::debug!(target: "dom.focus", "blur {id}");
        self.active_element = None;
        self.dispatch_event(id, Event::focus_change(EventKind::Blur, None).mark_trusted())?;
        Ok(())
    }

    pub fn blur_active(&mut self) -> Result<(), DomError> {
        match self.active_element {
            Some(id) => self.blur(id),
            None => Ok(()),
        }
    }
}
