//! Inline style declarations and the headless layout model.
//!
//! There is no layout engine here. An element's box height is whatever the
//! host set with [`Document::set_layout_height`], or the nominal height from
//! [`LayoutDefaults`]. `display: none` on the element or any ancestor
//! collapses it to zero.

use crate::{DomError, Document, Id};
use memchr::{memchr, memchr2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutDefaults {
    /// Height reported for connected, displayed elements without an explicit height.
    pub default_box_height: f32,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            default_box_height: 16.0,
        }
    }
}

/// Parse a `style` attribute into lowercase property names and trimmed values.
pub fn parse_inline_style(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

pub(crate) fn contains_ignore_ascii_case(haystack: &str, needle: &[u8]) -> bool {
    let hay = haystack.as_bytes();
    let n = needle.len();
    if n == 0 {
        return true;
    }
    let hay_len = hay.len();
    if hay_len < n {
        return false;
    }
    let first = needle[0];
    let (a, b) = if first.is_ascii_alphabetic() {
        (first.to_ascii_lowercase(), first.to_ascii_uppercase())
    } else {
        (first, first)
    };
    let mut i = 0;
    while i + n <= hay_len {
        let rel = if a == b {
            memchr(a, &hay[i..])
        } else {
            memchr2(a, b, &hay[i..])
        };
        let Some(rel) = rel else {
            return false;
        };
        let pos = i + rel;
        if pos + n <= hay_len && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return true;
        }
        i = pos + 1;
    }
    false
}

/// `true` for visibility values that hide the box (`hidden`, and anything
/// containing that word).
pub fn is_hidden_visibility(value: &str) -> bool {
    contains_ignore_ascii_case(value, b"hidden")
}

impl Document {
    pub fn inline_style(&self, id: Id, property: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        parse_inline_style(style)
            .into_iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    /// Inherited `visibility`: the nearest inclusive ancestor declaring it,
    /// else `visible`.
    pub fn computed_visibility(&self, id: Id) -> String {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|n| self.is_element(*n))
            .find_map(|n| self.inline_style(n, "visibility"))
            .unwrap_or_else(|| "visible".to_string())
    }

    fn is_display_none(&self, id: Id) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter_map(|n| self.inline_style(n, "display"))
            .any(|v| v.eq_ignore_ascii_case("none"))
    }

    /// Rendered box height. Zero for non-elements, detached elements and
    /// anything under `display: none`.
    pub fn offset_height(&self, id: Id) -> f32 {
        let Some(el) = self.element(id) else {
            return 0.0;
        };
        if !self.is_connected(id) || self.is_display_none(id) {
            return 0.0;
        }
        el.layout_height
            .unwrap_or(self.layout.default_box_height)
    }

    pub fn set_layout_height(&mut self, id: Id, height: f32) -> Result<(), DomError> {
        self.element_mut(id)?.layout_height = Some(height);
        Ok(())
    }

    pub fn layout_defaults(&self) -> &LayoutDefaults {
        &self.layout
    }
}
