use crate::{DomError, Document, Id};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputControlType {
    Text,
    Checkbox,
    Radio,
    Other,
}

impl Document {
    /// Classify an element as a form input. Non-`input` elements are `Other`.
    pub fn input_control_type(&self, id: Id) -> InputControlType {
        if !self
            .tag_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case("input"))
        {
            return InputControlType::Other;
        }

        let ty = self
            .attr(id, "type")
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match ty {
            None => InputControlType::Text, // missing type defaults to text
            Some(t) if t.eq_ignore_ascii_case("text") => InputControlType::Text,
            Some(t) if t.eq_ignore_ascii_case("checkbox") => InputControlType::Checkbox,
            Some(t) if t.eq_ignore_ascii_case("radio") => InputControlType::Radio,
            _ => InputControlType::Other,
        }
    }

    pub fn is_checkbox(&self, id: Id) -> bool {
        self.input_control_type(id) == InputControlType::Checkbox
    }

    pub fn is_checked(&self, id: Id) -> bool {
        self.element(id).is_some_and(|el| el.checked)
    }

    /// Set checkedness without firing any event.
    ///
    /// Returns `true` if the state actually changed.
    pub fn set_checked(&mut self, id: Id, checked: bool) -> Result<bool, DomError> {
        let el = self.element_mut(id)?;
        let changed = el.checked != checked;
        el.checked = checked;
        Ok(changed)
    }

    pub fn is_disabled(&self, id: Id) -> bool {
        self.has_attr(id, "disabled")
    }

    /// The control's value. Checkboxes and radios without a `value`
    /// attribute report `"on"`.
    pub fn value(&self, id: Id) -> Option<&str> {
        match self.attr(id, "value") {
            Some(v) => Some(v),
            None => match self.input_control_type(id) {
                InputControlType::Checkbox | InputControlType::Radio => Some("on"),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DOCUMENT_ID;

    #[test]
    fn classifies_inputs() {
        let mut doc = Document::new();
        let bare = doc.append_element(DOCUMENT_ID, "input", &[]).unwrap();
        let cb = doc
            .append_element(DOCUMENT_ID, "INPUT", &[("type", " Checkbox ")])
            .unwrap();
        let div = doc.append_element(DOCUMENT_ID, "div", &[("type", "checkbox")]).unwrap();

        assert_eq!(doc.input_control_type(bare), InputControlType::Text);
        assert_eq!(doc.input_control_type(cb), InputControlType::Checkbox);
        assert_eq!(doc.input_control_type(div), InputControlType::Other);
    }

    #[test]
    fn checked_attribute_seeds_state_once() {
        let mut doc = Document::new();
        let cb = doc
            .append_element(DOCUMENT_ID, "input", &[("type", "checkbox"), ("checked", "")])
            .unwrap();
        assert!(doc.is_checked(cb));

        assert!(doc.set_checked(cb, false).unwrap());
        assert!(!doc.set_checked(cb, false).unwrap());
        doc.set_attr(cb, "checked", "checked").unwrap();
        assert!(!doc.is_checked(cb));
    }

    #[test]
    fn checkbox_value_defaults_to_on() {
        let mut doc = Document::new();
        let cb = doc
            .append_element(DOCUMENT_ID, "input", &[("type", "checkbox")])
            .unwrap();
        let text = doc.append_element(DOCUMENT_ID, "input", &[]).unwrap();
        assert_eq!(doc.value(cb), Some("on"));
        assert_eq!(doc.value(text), None);
    }
}
