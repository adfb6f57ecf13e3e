use crate::{DOCUMENT_ID, Document, SelectorList};
use std::sync::LazyLock;

static UNSAFE_BLANK_LINKS: LazyLock<SelectorList> = LazyLock::new(|| {
    SelectorList::parse("a[target=_blank]:not([rel*=noopener])").expect("link selector is valid")
});

/// Add `noopener` to the `rel` of every `target=_blank` link that lacks it.
/// Returns the number of links rewritten.
pub fn fix_rel_opener(doc: &mut Document) -> usize {
    let links = doc.query_selector_all(DOCUMENT_ID, &UNSAFE_BLANK_LINKS);
    for &link in &links {
        let rel = match doc.attr(link, "rel").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} noopener"),
            _ => "noopener".to_string(),
        };
        if let Err(err) = doc.set_attr(link, "rel", &rel) {
            log::warn!(target: "dom.links", "cannot rewrite rel on {link}: {err}");
        }
    }
    if !links.is_empty() {
        log::debug!(target: "dom.links", "added noopener to {} link(s)", links.len());
    }
    links.len()
}
