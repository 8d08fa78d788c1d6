//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree plus the Web Components host pieces: shadow roots,
//! `<template>` content, the custom element registry with its reaction
//! queue, event dispatch and mutation records.

mod node;
mod tree;
mod document;
mod error;
mod shadow;
mod template;
mod custom_elements;
mod dom_events;
mod mutation;
mod serialize;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children};
pub use document::{Document, ElementContext};
pub use error::{DomError, DomResult};
pub use shadow::{ShadowRootMode, ShadowRootInit, ShadowRootData, can_attach_shadow};
pub use custom_elements::{
    AsAny, CustomElement, CustomElementDefinition, CustomElementRegistry,
    CustomElementState, LifecycleCallback, LifecycleCallbackInfo,
};
pub use dom_events::{Event, EventPhase, ListenerId, DispatchOutcome};
pub use mutation::{MutationRecord, MutationType};

use std::fmt;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the primary document)
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert to `Option`, mapping `NONE` to `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
