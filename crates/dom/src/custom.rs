//! Custom element registry.
//!
//! A definition maps a tag name to a factory. Every element with that tag
//! gets one instance, created when the element is created (or when the tag
//! is defined later, for elements that already exist). Instances are told
//! when their element enters or leaves the document.

use crate::{DomError, Document, Id};
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// Lifecycle hooks of a custom element instance.
pub trait LifecycleCallbacks {
    /// The element became connected to the document.
    fn connected_callback(&self, doc: &mut Document);

    /// The element was detached from the document.
    fn disconnected_callback(&self, doc: &mut Document);
}

type Factory = Rc<dyn Fn(&Document, Id) -> Instance>;

#[derive(Clone)]
struct Instance {
    callbacks: Rc<dyn LifecycleCallbacks>,
    any: Rc<dyn Any>,
}

#[derive(Default)]
pub(crate) struct CustomElements {
    definitions: HashMap<Arc<str>, Factory>,
    instances: HashMap<Id, Instance>,
}

impl CustomElements {
    pub(crate) fn release(&mut self, node: Id) {
        self.instances.remove(&node);
    }

    fn callbacks(&self, node: Id) -> Option<Rc<dyn LifecycleCallbacks>> {
        self.instances.get(&node).map(|i| Rc::clone(&i.callbacks))
    }
}

impl Document {
    /// Register `tag` as a custom element. Live elements already carrying
    /// the tag are upgraded immediately, and connected ones receive
    /// `connected_callback` in document order.
    pub fn define_custom_element<T, F>(&mut self, tag: &str, factory: F) -> Result<(), DomError>
    where
        T: LifecycleCallbacks + 'static,
        F: Fn(&Document, Id) -> Rc<T> + 'static,
    {
        let tag = tag.to_ascii_lowercase();
        if self.custom.definitions.contains_key(tag.as_str()) {
            return Err(DomError::AlreadyDefined(tag));
        }
        let factory: Factory = Rc::new(move |doc, id| {
            let instance = factory(doc, id);
            Instance {
                callbacks: Rc::clone(&instance) as Rc<dyn LifecycleCallbacks>,
                any: instance as Rc<dyn Any>,
            }
        });
        log::debug!(target: "dom.custom", "define <{tag}>");
        self.custom.definitions.insert(Arc::from(tag.as_str()), factory);

        let existing: Vec<Id> = (0..self.node_capacity())
            .map(|i| Id(i as u32))
            .filter(|id| self.tag_name(*id) == Some(tag.as_str()))
            .collect();
        for id in &existing {
            self.upgrade_if_defined(*id);
        }
        let mut connected = self.descendants(crate::DOCUMENT_ID);
        connected.retain(|id| existing.contains(id));
        for id in connected {
            if let Some(callbacks) = self.custom.callbacks(id) {
                callbacks.connected_callback(self);
            }
        }
        Ok(())
    }

    pub fn is_custom_element_defined(&self, tag: &str) -> bool {
        self.custom
            .definitions
            .contains_key(tag.to_ascii_lowercase().as_str())
    }

    /// The instance upgraded onto `id`, if it is of type `T`.
    pub fn custom_element<T: 'static>(&self, id: Id) -> Option<Rc<T>> {
        let instance = self.custom.instances.get(&id)?;
        Rc::clone(&instance.any).downcast::<T>().ok()
    }

    pub(crate) fn upgrade_if_defined(&mut self, id: Id) {
        if self.custom.instances.contains_key(&id) {
            return;
        }
        let Some(factory) = self
            .tag_name(id)
            .and_then(|tag| self.custom.definitions.get(tag))
            .map(Rc::clone)
        else {
            return;
        };
        log::trace!(target: "dom.custom", "upgrade {id}");
        let instance = factory(self, id);
        self.custom.instances.insert(id, instance);
    }

    /// Fire `connected_callback` for every instance in the subtree rooted at
    /// `root`, in document order.
    pub(crate) fn run_connected(&mut self, root: Id) {
        for id in self.lifecycle_order(root) {
            if !self.is_connected(id) {
                continue;
            }
            if let Some(callbacks) = self.custom.callbacks(id) {
                callbacks.connected_callback(self);
            }
        }
    }

    pub(crate) fn run_disconnected(&mut self, root: Id) {
        for id in self.lifecycle_order(root) {
            if let Some(callbacks) = self.custom.callbacks(id) {
                callbacks.disconnected_callback(self);
            }
        }
    }

    fn lifecycle_order(&self, root: Id) -> Vec<Id> {
        if self.custom.instances.is_empty() {
            return Vec::new();
        }
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|id| self.custom.instances.contains_key(id))
            .collect()
    }
}
