//! Tab-order traversal that skips elements a user cannot see.

use dom::style::is_hidden_visibility;
use dom::{DOCUMENT_ID, DomError, Document, Event, Id, SelectorList};
use std::sync::LazyLock;

/// Candidates for sequential keyboard navigation, in document order.
/// Unlike `Document::is_focusable`, only `tabindex="0"` opts an arbitrary
/// element in.
static TAB_ORDER: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse(
        "a[href], area[href], input:not([disabled]), select:not([disabled]), \
         textarea:not([disabled]), button:not([disabled]), iframe, object, embed, \
         [tabindex=\"0\"], [contenteditable], audio[controls], video[controls]",
    )
    .expect("tab order selector is valid")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Focus moved to this element.
    Moved(Id),
    /// No candidate remained in that direction; focus left the document.
    Released,
}

/// An element with no rendered height or with hidden visibility.
pub fn is_inert(doc: &Document, id: Id) -> bool {
    doc.offset_height(id) <= 0.0 || is_hidden_visibility(&doc.computed_visibility(id))
}

pub fn tab_order(doc: &Document) -> Vec<Id> {
    doc.query_selector_all(DOCUMENT_ID, &TAB_ORDER)
}

/// Move focus one step through the tab order: backwards when the key event
/// carries Shift, forwards otherwise. Inert candidates are skipped.
///
/// On success the event's default action is prevented. When the list runs
/// out, the active element is blurred and the event is left alone, so the
/// host may move focus out of the page.
pub fn focus_next(doc: &mut Document, event: Option<&mut Event>) -> Result<FocusOutcome, DomError> {
    let backwards = event
        .as_deref()
        .and_then(Event::keyboard)
        .is_some_and(|k| k.modifiers.shift);
    let candidates = tab_order(doc);
    let current = doc
        .active_element()
        .and_then(|active| candidates.iter().position(|c| *c == active));

    let next = match (current, backwards) {
        (Some(i), false) => candidates
            .iter()
            .skip(i + 1)
            .copied()
            .find(|c| !is_inert(doc, *c)),
        (None, false) => candidates.iter().copied().find(|c| !is_inert(doc, *c)),
        (Some(i), true) => candidates[..i]
            .iter()
            .rev()
            .copied()
            .find(|c| !is_inert(doc, *c)),
        (None, true) => None,
    };

    match next {
        Some(target) => {
            log::debug!(target: "widgets.focus_nav", "tab to {target}");
            doc.focus(target)?;
            if let Some(event) = event {
                event.prevent_default();
            }
            Ok(FocusOutcome::Moved(target))
        }
        None => {
            log::debug!(target: "widgets.focus_nav", "tab order exhausted, releasing focus");
            doc.blur_active()?;
            Ok(FocusOutcome::Released)
        }
    }
}
