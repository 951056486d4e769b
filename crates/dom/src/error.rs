use crate::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("unknown or discarded node {0:?}")]
    MissingNode(NodeId),
    #[error("node {0:?} cannot have children")]
    InvalidParent(NodeId),
    #[error("node {0:?} already has a parent")]
    AlreadyAttached(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
    #[error("node {0:?} is not an element")]
    WrongNodeKind(NodeId),
    #[error("the document root cannot be moved or discarded")]
    RootImmovable,
    #[error("tree integrity violated at {node:?}: {detail}")]
    Integrity { node: NodeId, detail: String },
}
