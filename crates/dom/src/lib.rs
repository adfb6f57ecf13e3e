pub mod dataset;
pub mod links;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod snapshot;
pub mod style;

mod actions;
mod custom;
mod data;
mod dispatch;
mod document;
mod error;
mod event;
mod focus;
mod form;
mod listeners;
mod selector;
mod types;

pub use custom::LifecycleCallbacks;
pub use data::NodeData;
pub use dataset::options_from_dataset;
pub use document::Document;
pub use error::DomError;
pub use event::{
    Event, EventDetail, EventInit, EventKind, EventPhase, KeyCode, KeyboardData, Modifiers,
    extend_event,
};
pub use form::InputControlType;
pub use links::fix_rel_opener;
pub use listeners::{EventListener, listener};
pub use selector::{SelectorError, SelectorList};
pub use style::LayoutDefaults;
pub use types::{DOCUMENT_ID, Id, NodeId};
