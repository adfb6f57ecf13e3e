//! Umbrella crate for the element toolkit.
//!
//! - [`dom`]: node tree, selectors, event dispatch, focus and custom elements.
//! - [`widgets`]: the multi-select dropdown and tab-order traversal.
//! - [`frames`]: animation-frame and idle-callback scheduling.
//! - [`tools`]: byte formatting, relaxed JSON, path queries, enumerations and
//!   random ids.

pub use dom;
pub use frames;
pub use tools;
pub use widgets;

/// Register every custom element this toolkit ships under its default tag.
pub fn define_all(doc: &mut dom::Document) -> Result<(), dom::DomError> {
    widgets::define(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_all_registers_the_dropdown() {
        let mut doc = dom::Document::new();
        define_all(&mut doc).unwrap();
        assert!(doc.is_custom_element_defined(widgets::TAG));
        assert!(matches!(
            define_all(&mut doc),
            Err(dom::DomError::AlreadyDefined(_))
        ));
    }
}
