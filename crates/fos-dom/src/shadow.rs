//! Shadow DOM v1
//!
//! Shadow roots, slot assignment and the composed (flat) tree view.
//!
//! A shadow root is an arena node with no parent; its host is recorded in
//! `ShadowRootData`. Tree-scoped lookups (`get_element_by_id`,
//! `descendants`) therefore never cross the boundary on their own.

use crate::{DomTree, NodeData, NodeId, CustomElementRegistry};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

impl ShadowRootMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Shadow root initialization options
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
}

impl ShadowRootInit {
    pub fn new(mode: ShadowRootMode) -> Self {
        Self { mode, delegates_focus: false }
    }

    pub fn open() -> Self {
        Self::new(ShadowRootMode::Open)
    }

    pub fn closed() -> Self {
        Self::new(ShadowRootMode::Closed)
    }
}

/// Data stored on a shadow root node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowRootData {
    /// Host element
    pub host: NodeId,
    /// Mode (open/closed)
    pub mode: ShadowRootMode,
    /// Whether focus is delegated to the first focusable element
    pub delegates_focus: bool,
}

/// HTML elements that accept a shadow root
const SHADOW_HOST_ELEMENTS: &[&str] = &[
    "article", "aside", "blockquote", "body", "div", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "main", "nav",
    "p", "section", "span",
];

/// Whether an element with this local name may host a shadow root
pub fn can_attach_shadow(local_name: &str) -> bool {
    SHADOW_HOST_ELEMENTS.contains(&local_name) || CustomElementRegistry::is_valid_name(local_name)
}

impl DomTree {
    pub(crate) fn create_shadow_root(&mut self, host: NodeId, init: ShadowRootInit) -> NodeId {
        let owner = self.owner_document(host).unwrap_or(NodeId::ROOT);
        let id = self.push(crate::Node::shadow_root(ShadowRootData {
            host,
            mode: init.mode,
            delegates_focus: init.delegates_focus,
        }));
        self.set_owner_document(id, owner);
        if let Some(elem) = self.element_mut(host) {
            elem.shadow_root = Some(id);
        }
        id
    }

    /// Shadow root attached to `host`, regardless of mode
    pub fn shadow_root_of(&self, host: NodeId) -> Option<NodeId> {
        self.element(host).and_then(|e| e.shadow_root)
    }

    /// Whether `id` is a shadow root node
    pub fn is_shadow_root(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(crate::Node::is_shadow_root)
    }

    // --- Slots ---

    /// Slot name a light-DOM node asks for (`""` is the default slot)
    pub fn slot_name(&self, node: NodeId) -> &str {
        self.get_attribute(node, "slot").unwrap_or("")
    }

    /// Name of a `<slot>` element
    fn slot_element_name(&self, slot: NodeId) -> &str {
        self.get_attribute(slot, "name").unwrap_or("")
    }

    /// First `<slot>` in the shadow tree with the given name
    pub fn find_slot(&self, shadow_root: NodeId, name: &str) -> Option<NodeId> {
        self.elements_by_tag_name(shadow_root, "slot")
            .into_iter()
            .find(|&slot| self.slot_element_name(slot) == name)
    }

    /// Light-DOM children of the host distributed into `slot`.
    ///
    /// Text nodes only go to the default slot. When two slots share a name
    /// the first one in tree order wins.
    pub fn assigned_nodes(&self, slot: NodeId) -> Vec<NodeId> {
        let root = self.root_of(slot);
        let Some(host) = self.host_of(root) else {
            return Vec::new();
        };
        let name = self.slot_element_name(slot);
        if self.find_slot(root, name) != Some(slot) {
            return Vec::new();
        }

        self.children(host)
            .filter(|&child| match self.get(child).map(|n| &n.data) {
                Some(NodeData::Element(_)) => self.slot_name(child) == name,
                Some(NodeData::Text(_)) => name.is_empty(),
                _ => false,
            })
            .collect()
    }

    /// Text of the composed tree: shadow hosts show their shadow tree and
    /// slots show their assigned nodes (or fallback children)
    pub fn flat_text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_flat_text(id, &mut out);
        out
    }

    fn collect_flat_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(elem) => {
                let children = if let Some(shadow) = elem.shadow_root {
                    self.child_ids(shadow)
                } else if elem.local_name == "slot" && self.is_shadow_root(self.root_of(id)) {
                    let assigned = self.assigned_nodes(id);
                    if assigned.is_empty() { self.child_ids(id) } else { assigned }
                } else {
                    self.child_ids(id)
                };
                for child in children {
                    self.collect_flat_text(child, out);
                }
            }
            NodeData::Document | NodeData::DocumentFragment | NodeData::ShadowRoot(_) => {
                for child in self.child_ids(id) {
                    self.collect_flat_text(child, out);
                }
            }
            NodeData::Comment(_) | NodeData::Doctype { .. } => {}
        }
    }
}
