use crate::{Document, Id};
use std::collections::BTreeMap;

/// Collect `data-<prefix>-*` attributes of `id` into a map keyed by the
/// camel-cased remainder: `data-dropdown-close-on-blur` with prefix
/// `dropdown` yields `closeOnBlur`. Without a prefix every `data-*`
/// attribute is collected.
pub fn options_from_dataset(doc: &Document, id: Id, prefix: Option<&str>) -> BTreeMap<String, String> {
    let head = match prefix {
        Some(p) if !p.is_empty() => format!("data-{}-", p.to_ascii_lowercase()),
        _ => "data-".to_string(),
    };
    doc.attributes(id)
        .iter()
        .filter_map(|(name, value)| {
            let rest = name.strip_prefix(head.as_str())?;
            (!rest.is_empty()).then(|| (camel_case(rest), value.clone()))
        })
        .collect()
}

/// `close-on-blur` -> `closeOnBlur`. A dash followed by nothing is dropped.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
