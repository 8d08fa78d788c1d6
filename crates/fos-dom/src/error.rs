//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(&'static str),

    #[error("Invalid custom element name: {0}")]
    InvalidName(String),

    #[error("Custom element already defined: {0}")]
    AlreadyDefined(String),

    #[error("Element already has a shadow root")]
    ShadowAlreadyAttached,

    #[error("Element does not support a shadow root: <{0}>")]
    ShadowNotSupported(String),

    #[error("Custom element <{name}> failed to construct: {reason}")]
    Construction { name: String, reason: String },

    #[error("Node {0} is not a custom element")]
    NotCustom(NodeId),

    #[error("Custom element {0} is already running a callback")]
    ElementBusy(NodeId),

    #[error("Custom element {0} is not of the requested type")]
    WrongElementType(NodeId),

    #[error("HTML parse error: {0}")]
    Parse(String),

    #[error("<{tag}> rendered without #{part}")]
    MissingPart { tag: String, part: &'static str },
}

impl DomError {
    /// Build a construction error from any displayable reason
    pub fn construction(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::Construction {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// A rendered structure lacks a node the element relies on
    pub fn missing_part(tag: &str, part: &'static str) -> Self {
        Self::MissingPart {
            tag: tag.to_string(),
            part,
        }
    }
}
