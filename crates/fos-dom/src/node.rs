//! DOM Node - Compact representation
//!
//! Nodes live in an arena and link to each other through `NodeId` indices
//! instead of pointers, so moving a subtree never invalidates an ID.

use crate::{NodeId, CustomElementState, ShadowRootData};
use crate::custom_elements::CustomElementRegistry;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Document that owns this node
    pub owner_document: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            owner_document: NodeId::ROOT,
            data,
        }
    }

    /// Create a new element node
    pub fn element(local_name: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(local_name)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a new comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Comment(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a document fragment node
    pub fn fragment() -> Self {
        Self::with_data(NodeData::DocumentFragment)
    }

    /// Create a shadow root node
    pub fn shadow_root(data: ShadowRootData) -> Self {
        Self::with_data(NodeData::ShadowRoot(data))
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Check if this is a document
    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    /// Check if this is a shadow root
    #[inline]
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot(_))
    }

    /// Check if this is a document fragment (shadow roots excluded)
    #[inline]
    pub fn is_fragment(&self) -> bool {
        matches!(self.data, NodeData::DocumentFragment)
    }

    /// Whether this node may hold children
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document | NodeData::DocumentFragment | NodeData::ShadowRoot(_) | NodeData::Element(_)
        )
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get shadow root data if this is a shadow root
    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Detached container whose children move on insertion
    DocumentFragment,
    /// Root of an encapsulated tree attached to a host element
    ShadowRoot(ShadowRootData),
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase local name
    pub local_name: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Attached shadow root
    pub shadow_root: Option<NodeId>,
    /// Inert content fragment (only for `<template>`)
    pub template_content: Option<NodeId>,
    /// Custom element state
    pub custom_state: CustomElementState,
}

impl ElementData {
    pub fn new(local_name: &str) -> Self {
        let local_name = local_name.to_ascii_lowercase();
        let custom_state = if CustomElementRegistry::is_valid_name(&local_name) {
            CustomElementState::Undefined
        } else {
            CustomElementState::Uncustomized
        };
        Self {
            local_name,
            attrs: Vec::new(),
            shadow_root: None,
            template_content: None,
            custom_state,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check if an attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        // Check if attribute already exists
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                return Some(std::mem::replace(&mut attr.value, value.to_string()));
            }
        }
        // Add new attribute
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        None
    }

    /// Remove an attribute, returning its value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }

    /// Value of the `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Whether this is a `<template>` element
    pub fn is_template(&self) -> bool {
        self.local_name == "template"
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
