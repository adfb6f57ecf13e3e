use dom::{DOCUMENT_ID, DomError, Document, Id};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub fn load_toml<T: DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture TOML {path:?}: {err}"));
    toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture TOML {path:?}: {err}"))
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture JSON {path:?}: {err}"));
    serde_json::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture JSON {path:?}: {err}"))
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct OptionMarkup {
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub disabled: bool,
}

/// Markup for one dropdown plus optional focusable neighbours:
///
/// ```text
/// <button class="before">            (focusable_before)
/// <multi-dropdown>
///   <div class="select-title">title</div>
///   <div class="select-options">
///     <label><input type="checkbox" value="..."></label> ...
/// <p class="outside">
/// <button class="after">             (focusable_after)
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DropdownMarkup {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub options: Vec<OptionMarkup>,
    #[serde(default)]
    pub focusable_before: bool,
    #[serde(default)]
    pub focusable_after: bool,
}

fn default_tag() -> String {
    "multi-dropdown".to_string()
}

fn default_title() -> String {
    "Choose".to_string()
}

impl Default for DropdownMarkup {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            title: default_title(),
            options: Vec::new(),
            focusable_before: false,
            focusable_after: false,
        }
    }
}

impl DropdownMarkup {
    /// Unchecked options with the given values.
    pub fn with_values(values: &[&str]) -> Self {
        Self {
            options: values
                .iter()
                .map(|v| OptionMarkup {
                    value: (*v).to_string(),
                    checked: false,
                    disabled: false,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn checked(mut self, value: &str) -> Self {
        for option in &mut self.options {
            if option.value == value {
                option.checked = true;
            }
        }
        self
    }

    pub fn surrounded(mut self) -> Self {
        self.focusable_before = true;
        self.focusable_after = true;
        self
    }

    /// Build the markup under the document. The dropdown root is assembled
    /// detached and appended last, so it connects with its full subtree.
    pub fn build(&self, doc: &mut Document) -> Result<DropdownFixture, DomError> {
        let before = if self.focusable_before {
            Some(doc.append_element(DOCUMENT_ID, "button", &[("class", "before")])?)
        } else {
            None
        };

        let root = doc.create_element(&self.tag, &[]);
        let title = doc.append_element(root, "div", &[("class", "select-title")])?;
        doc.append_text(title, &self.title)?;
        let options = doc.append_element(root, "div", &[("class", "select-options")])?;
        let mut checkboxes = Vec::with_capacity(self.options.len());
        for option in &self.options {
            let label = doc.append_element(options, "label", &[])?;
            let mut attrs = vec![("type", "checkbox"), ("value", option.value.as_str())];
            if option.checked {
                attrs.push(("checked", ""));
            }
            if option.disabled {
                attrs.push(("disabled", ""));
            }
            checkboxes.push(doc.append_element(label, "input", &attrs)?);
            doc.append_text(label, &option.value)?;
        }
        doc.append_child(DOCUMENT_ID, root)?;

        let outside = doc.append_element(DOCUMENT_ID, "p", &[("class", "outside")])?;
        let after = if self.focusable_after {
            Some(doc.append_element(DOCUMENT_ID, "button", &[("class", "after")])?)
        } else {
            None
        };

        Ok(DropdownFixture {
            root,
            title,
            options,
            checkboxes,
            outside,
            before,
            after,
        })
    }
}

#[derive(Clone, Debug)]
pub struct DropdownFixture {
    pub root: Id,
    pub title: Id,
    pub options: Id,
    pub checkboxes: Vec<Id>,
    pub outside: Id,
    pub before: Option<Id>,
    pub after: Option<Id>,
}

impl DropdownFixture {
    pub fn checkbox(&self, doc: &Document, value: &str) -> Id {
        self.checkboxes
            .iter()
            .copied()
            .find(|id| doc.attr(*id, "value") == Some(value))
            .unwrap_or_else(|| panic!("no option with value {value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_parses_from_toml() {
        let markup: DropdownMarkup = toml::from_str(
            r#"
            title = "Fruit"
            focusable_after = true
            options = [
              { value = "apple" },
              { value = "pear", checked = true },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(markup.tag, "multi-dropdown");
        assert_eq!(markup.options.len(), 2);
        assert!(markup.options[1].checked);
        assert!(!markup.focusable_before);
    }
}
