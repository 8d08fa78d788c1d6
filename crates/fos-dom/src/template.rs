//! HTML Template Element
//!
//! A `<template>` element holds an inert content fragment. The content is
//! not part of the template's children, never becomes connected, and is
//! used by cloning.

use crate::{DomError, DomResult, DomTree, NodeId};

impl DomTree {
    /// Content fragment of a `<template>` element
    pub fn template_content(&self, template: NodeId) -> Option<NodeId> {
        self.element(template).and_then(|e| e.template_content)
    }

    /// Deep clone of a template's content as a new fragment
    pub fn clone_template_content(&mut self, template: NodeId) -> DomResult<NodeId> {
        let content = self.template_content(template)
            .ok_or(DomError::NotAnElement(template))?;
        self.clone_node(content, true)
    }
}
