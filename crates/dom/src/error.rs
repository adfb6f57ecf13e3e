use crate::Id;
use crate::selector::SelectorError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    UnknownNode(Id),
    WrongNodeKind(Id),
    InvalidParent(Id),
    AlreadyAttached(Id),
    NotAChild { parent: Id, child: Id },
    CycleDetected { parent: Id, child: Id },
    AlreadyDefined(String),
    Selector(SelectorError),
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::UnknownNode(id) => write!(f, "unknown or released node {id}"),
            DomError::WrongNodeKind(id) => write!(f, "node {id} has the wrong kind for this operation"),
            DomError::InvalidParent(id) => write!(f, "node {id} cannot have children"),
            DomError::AlreadyAttached(id) => write!(f, "node {id} already has a parent"),
            DomError::NotAChild { parent, child } => {
                write!(f, "node {child} is not a child of {parent}")
            }
            DomError::CycleDetected { parent, child } => {
                write!(f, "appending {child} to {parent} would create a cycle")
            }
            DomError::AlreadyDefined(name) => {
                write!(f, "custom element `{name}` is already defined")
            }
            DomError::Selector(err) => write!(f, "invalid selector: {err}"),
        }
    }
}

impl std::error::Error for DomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DomError::Selector(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SelectorError> for DomError {
    fn from(err: SelectorError) -> Self {
        DomError::Selector(err)
    }
}
