use crate::custom::CustomElements;
use crate::data::NodeData;
use crate::listeners::ListenerStore;
use crate::style::LayoutDefaults;
use crate::{DOCUMENT_ID, DomError, Id};
use std::sync::Arc;

pub(crate) struct NodeRecord {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<Id>,
    pub(crate) children: Vec<Id>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element(_))
    }
}

pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text { text: String },
}

pub(crate) struct ElementData {
    pub(crate) name: Arc<str>,
    pub(crate) attributes: Vec<(Arc<str>, String)>,
    /// Checkedness of checkbox/radio inputs. Seeded from the `checked`
    /// attribute at creation; later attribute writes do not touch it.
    pub(crate) checked: bool,
    pub(crate) layout_height: Option<f32>,
}

impl ElementData {
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, name: &str, value: String) {
        if let Some((_, existing)) = self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            *existing = value;
            return;
        }
        self.attributes
            .push((Arc::from(name.to_ascii_lowercase()), value));
    }

    fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before != self.attributes.len()
    }
}

/// Arena-backed document tree.
///
/// The document owns every node, the listener registry, the focus state and
/// the per-node side tables. Nodes are addressed by [`Id`]; created elements
/// start detached and become connected once appended under [`DOCUMENT_ID`].
pub struct Document {
    nodes: Vec<Option<NodeRecord>>,
    pub(crate) active_element: Option<Id>,
    pub(crate) listeners: ListenerStore,
    data: NodeData,
    pub(crate) custom: CustomElements,
    pub(crate) layout: LayoutDefaults,
}

impl Document {
    pub fn new() -> Self {
        Self::with_layout(LayoutDefaults::default())
    }

    pub fn with_layout(layout: LayoutDefaults) -> Self {
        Self {
            nodes: vec![Some(NodeRecord {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            })],
            active_element: None,
            listeners: ListenerStore::default(),
            data: NodeData::default(),
            custom: CustomElements::default(),
            layout,
        }
    }

    pub(crate) fn record(&self, id: Id) -> Result<&NodeRecord, DomError> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(DomError::UnknownNode(id))
    }

    fn record_mut(&mut self, id: Id) -> Result<&mut NodeRecord, DomError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(DomError::UnknownNode(id))
    }

    pub(crate) fn element(&self, id: Id) -> Option<&ElementData> {
        match &self.record(id).ok()?.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, id: Id) -> Result<&mut ElementData, DomError> {
        match &mut self.record_mut(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DomError::WrongNodeKind(id)),
        }
    }

    /// Slots ever allocated, released ones included.
    pub(crate) fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, kind: NodeKind) -> Id {
        let id = Id(self.nodes.len() as u32);
        self.nodes.push(Some(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    // ---------------------------------------------------------------------
    // Node creation
    // ---------------------------------------------------------------------

    /// Create a detached element. Tag and attribute names are lowercased;
    /// repeated attribute names keep their first value.
    pub fn create_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Id {
        let mut attrs: Vec<(Arc<str>, String)> = Vec::with_capacity(attributes.len());
        for (k, v) in attributes {
            if attrs.iter().any(|(existing, _)| existing.eq_ignore_ascii_case(k)) {
                continue;
            }
            attrs.push((Arc::from(k.to_ascii_lowercase()), (*v).to_string()));
        }
        let checked = attrs.iter().any(|(k, _)| &**k == "checked");
        let id = self.alloc(NodeKind::Element(ElementData {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: attrs,
            checked,
            layout_height: None,
        }));
        self.upgrade_if_defined(id);
        id
    }

    pub fn create_text(&mut self, text: &str) -> Id {
        self.alloc(NodeKind::Text {
            text: text.to_string(),
        })
    }

    pub fn append_element(
        &mut self,
        parent: Id,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<Id, DomError> {
        let id = self.create_element(name, attributes);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_text(&mut self, parent: Id, text: &str) -> Result<Id, DomError> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    // ---------------------------------------------------------------------
    // Tree mutation
    // ---------------------------------------------------------------------

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        if self.is_connected(child) {
            self.run_connected(child);
        }
        Ok(())
    }

    pub fn insert_before(&mut self, parent: Id, child: Id, before: Id) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        let pos = self
            .record(parent)?
            .children
            .iter()
            .position(|k| *k == before)
            .ok_or(DomError::NotAChild {
                parent,
                child: before,
            })?;
        self.record_mut(parent)?.children.insert(pos, child);
        self.record_mut(child)?.parent = Some(parent);
        if self.is_connected(child) {
            self.run_connected(child);
        }
        Ok(())
    }

    fn check_insertable(&self, parent: Id, child: Id) -> Result<(), DomError> {
        let parent_record = self.record(parent)?;
        let child_record = self.record(child)?;
        if !parent_record.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if matches!(child_record.kind, NodeKind::Document) {
            return Err(DomError::WrongNodeKind(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        if child_record.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        Ok(())
    }

    /// Detach `child` from `parent`. The subtree stays alive and can be
    /// re-appended; disconnected callbacks fire if it was connected.
    pub fn remove_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        if self.record(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        let was_connected = self.is_connected(child);
        self.record_mut(parent)?.children.retain(|k| *k != child);
        self.record_mut(child)?.parent = None;

        if let Some(active) = self.active_element
            && self.contains(child, active)
        {
            // Focus fixup: removal drops focus without firing blur.
            log::debug!(target: "dom.focus", "active element {active} removed with {child}");
            self.active_element = None;
        }

        if was_connected {
            self.run_disconnected(child);
        }
        Ok(())
    }

    /// Detach `id` from its parent, if it has one.
    pub fn remove(&mut self, id: Id) -> Result<(), DomError> {
        match self.record(id)?.parent {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(()),
        }
    }

    /// Detach and destroy a subtree. Listeners, node data and custom element
    /// instances attached to any node in it are dropped.
    pub fn release_subtree(&mut self, id: Id) -> Result<(), DomError> {
        if id == DOCUMENT_ID {
            return Err(DomError::WrongNodeKind(id));
        }
        self.remove(id)?;
        let mut doomed = vec![id];
        doomed.extend(self.descendants(id));
        for node in doomed {
            if let Some(slot) = self.nodes.get_mut(node.index()) {
                *slot = None;
            }
            self.listeners.release(node);
            self.data.release(node);
            self.custom.release(node);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Tree queries
    // ---------------------------------------------------------------------

    pub fn is_live(&self, id: Id) -> bool {
        self.record(id).is_ok()
    }

    pub fn is_element(&self, id: Id) -> bool {
        self.element(id).is_some()
    }

    pub fn tag_name(&self, id: Id) -> Option<&str> {
        self.element(id).map(|el| &*el.name)
    }

    pub fn text(&self, id: Id) -> Option<&str> {
        match &self.record(id).ok()?.kind {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).ok()?.parent
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn ancestors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: Id) -> Vec<Id> {
        let mut out = Vec::new();
        let mut stack: Vec<Id> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Inclusive containment: a node contains itself.
    pub fn contains(&self, ancestor: Id, node: Id) -> bool {
        if !self.is_live(node) {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn is_connected(&self, id: Id) -> bool {
        self.contains(DOCUMENT_ID, id)
    }

    // ---------------------------------------------------------------------
    // Attributes and classes
    // ---------------------------------------------------------------------

    pub fn attr(&self, id: Id, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn has_attr(&self, id: Id, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn attributes(&self, id: Id) -> &[(Arc<str>, String)] {
        self.element(id)
            .map(|el| el.attributes.as_slice())
            .unwrap_or(&[])
    }

    pub fn set_attr(&mut self, id: Id, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.set_attr(name, value.to_string());
        Ok(())
    }

    /// Returns `true` if the attribute was present.
    pub fn remove_attr(&mut self, id: Id, name: &str) -> Result<bool, DomError> {
        Ok(self.element_mut(id)?.remove_attr(name))
    }

    pub fn has_class(&self, id: Id, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: Id, class: &str) -> Result<(), DomError> {
        self.set_class(id, class, true)
    }

    pub fn remove_class(&mut self, id: Id, class: &str) -> Result<(), DomError> {
        self.set_class(id, class, false)
    }

    /// Returns the class's presence after the toggle.
    pub fn toggle_class(&mut self, id: Id, class: &str) -> Result<bool, DomError> {
        let present = !self.has_class(id, class);
        self.set_class(id, class, present)?;
        Ok(present)
    }

    /// Force a class token on or off. The `class` attribute is the only
    /// storage for classes, so readers never see a stale copy.
    pub fn set_class(&mut self, id: Id, class: &str, present: bool) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        let current = el.attr("class").unwrap_or("");
        let has = current.split_ascii_whitespace().any(|c| c == class);
        if has == present {
            return Ok(());
        }
        let next = if present {
            let mut tokens: Vec<&str> = current.split_ascii_whitespace().collect();
            tokens.push(class);
            tokens.join(" ")
        } else {
            current
                .split_ascii_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ")
        };
        el.set_attr("class", next);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Side tables
    // ---------------------------------------------------------------------

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }

    /// Store `value` under `key` for `id`. Released ids are rejected, since
    /// nothing would ever drop the entry again.
    pub fn put_data<T: 'static>(&mut self, id: Id, key: &str, value: T) -> Result<(), DomError> {
        self.record(id)?;
        self.data.put(id, key, value);
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.iter().filter(|n| n.is_some()).count())
            .field("active_element", &self.active_element)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_elements_start_detached() {
        let mut doc = Document::new();
        let div = doc.create_element("DIV", &[("Class", "a")]);
        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.attr(div, "class"), Some("a"));
        assert!(!doc.is_connected(div));

        doc.append_child(DOCUMENT_ID, div).unwrap();
        assert!(doc.is_connected(div));
    }

    #[test]
    fn append_rejects_cycles_and_second_parent() {
        let mut doc = Document::new();
        let a = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        let b = doc.append_element(a, "div", &[]).unwrap();

        assert_eq!(
            doc.append_child(b, a),
            Err(DomError::CycleDetected { parent: b, child: a })
        );
        let c = doc.create_element("span", &[]);
        doc.append_child(a, c).unwrap();
        assert_eq!(doc.append_child(b, c), Err(DomError::AlreadyAttached(c)));
    }

    #[test]
    fn text_nodes_cannot_have_children() {
        let mut doc = Document::new();
        let t = doc.append_text(DOCUMENT_ID, "hi").unwrap();
        let span = doc.create_element("span", &[]);
        assert_eq!(doc.append_child(t, span), Err(DomError::InvalidParent(t)));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut doc = Document::new();
        let root = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        let a = doc.append_element(root, "a", &[]).unwrap();
        let a1 = doc.append_element(a, "b", &[]).unwrap();
        let c = doc.append_element(root, "c", &[]).unwrap();
        let first = doc.create_element("z", &[]);
        doc.insert_before(root, first, a).unwrap();

        assert_eq!(doc.descendants(root), vec![first, a, a1, c]);
    }

    #[test]
    fn class_tokens_round_through_attribute() {
        let mut doc = Document::new();
        let el = doc.append_element(DOCUMENT_ID, "div", &[("class", "x  y")]).unwrap();

        doc.add_class(el, "open").unwrap();
        assert_eq!(doc.attr(el, "class"), Some("x y open"));
        doc.add_class(el, "open").unwrap();
        assert_eq!(doc.attr(el, "class"), Some("x y open"));

        assert!(!doc.toggle_class(el, "x").unwrap());
        assert!(!doc.has_class(el, "x"));
        assert!(doc.has_class(el, "open"));

        doc.remove_class(el, "open").unwrap();
        assert_eq!(doc.attr(el, "class"), Some("y"));
    }

    #[test]
    fn release_subtree_invalidates_ids() {
        let mut doc = Document::new();
        let root = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        let child = doc.append_element(root, "span", &[]).unwrap();
        doc.put_data(child, "k", 1u8).unwrap();

        doc.release_subtree(root).unwrap();
        assert!(!doc.is_live(root));
        assert!(!doc.is_live(child));
        assert!(!doc.data().has(child, "k"));
        assert!(doc.children(DOCUMENT_ID).is_empty());
        assert_eq!(doc.set_attr(child, "a", "b"), Err(DomError::UnknownNode(child)));
    }

    #[test]
    fn data_cannot_be_stored_on_released_nodes() {
        let mut doc = Document::new();
        let el = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        doc.release_subtree(el).unwrap();

        assert_eq!(
            doc.put_data(el, "k", vec![0u8; 1024]),
            Err(DomError::UnknownNode(el))
        );
        assert!(!doc.data().has(el, "k"));
        assert!(doc.data().is_empty());
    }

    #[test]
    fn removing_focused_subtree_clears_focus() {
        let mut doc = Document::new();
        let root = doc.append_element(DOCUMENT_ID, "div", &[]).unwrap();
        let button = doc.append_element(root, "button", &[]).unwrap();
        doc.focus(button).unwrap();
        assert_eq!(doc.active_element(), Some(button));

        doc.remove_child(DOCUMENT_ID, root).unwrap();
        assert_eq!(doc.active_element(), None);
    }
}
