pub type NodeId = u32;

/// Handle to a node in a [`Document`](crate::Document) arena.
///
/// Ids are allocated sequentially and never reused, so a stale id held after
/// [`Document::release_subtree`](crate::Document::release_subtree) simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

/// The document node itself. Every connected node has it as its root.
pub const DOCUMENT_ID: Id = Id(0);

impl Id {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
