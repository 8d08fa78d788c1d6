//! DOM Tree (arena-based allocation)
//!
//! Raw structural operations. Nothing here runs custom element reactions or
//! records mutations; `Document` wraps these for live trees.

use crate::{Node, NodeData, NodeId, ElementData, DomError, DomResult, CustomElementState};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the root document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Root document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // --- Creation ---

    /// Create a detached element. `<template>` gets its content fragment.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let id = self.push(Node::element(name));
        let is_template = self.element(id).is_some_and(ElementData::is_template);
        if is_template {
            let content = self.create_fragment();
            if let Some(elem) = self.element_mut(id) {
                elem.template_content = Some(content);
            }
        }
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text))
    }

    /// Create an empty document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(Node::fragment())
    }

    /// Create a doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node {
            data: NodeData::Doctype { name: name.to_string() },
            ..Node::document()
        })
    }

    /// Create an additional document node owning itself
    pub fn create_document(&mut self) -> NodeId {
        let id = self.push(Node::document());
        self.nodes[id.index()].owner_document = id;
        id
    }

    // --- Accessors ---

    /// Element data for `id`
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data for `id`
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Lowercase local name of an element
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.local_name.as_str())
    }

    /// Attribute value of an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    /// Custom element state of an element
    pub fn custom_state(&self, id: NodeId) -> Option<CustomElementState> {
        self.element(id).map(|e| e.custom_state)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.to_option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    /// Document that owns `id`
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.owner_document)
    }

    pub(crate) fn set_owner_document(&mut self, id: NodeId, document: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.owner_document = document;
        }
    }

    /// Iterate over children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Children collected into a vector
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    /// Descendants in tree order, excluding `id`. Does not enter shadow
    /// roots or template content.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(id).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.child_ids(node).into_iter().rev());
        }
        out
    }

    /// Shadow-including preorder, `id` first. A host's shadow tree is
    /// visited right after the host, before its light children.
    pub fn shadow_including_inclusive_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut next: Vec<NodeId> = Vec::new();
            if let Some(shadow) = self.element(node).and_then(|e| e.shadow_root) {
                next.push(shadow);
            }
            next.extend(self.children(node));
            stack.extend(next.into_iter().rev());
        }
        out
    }

    /// Elements under `scope` with the given local name, in tree order
    pub fn elements_by_tag_name(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        let name = name.to_ascii_lowercase();
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.local_name(id) == Some(name.as_str()))
            .collect()
    }

    /// First element under `scope` whose `id` attribute matches.
    ///
    /// Shadow trees are separate scopes: searching a document never finds
    /// nodes inside a shadow root, and vice versa.
    pub fn get_element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&node| self.element(node).and_then(ElementData::id) == Some(id))
    }

    /// Root of the tree containing `id` (a document, fragment, shadow root or
    /// detached node)
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Host of a shadow root
    pub fn host_of(&self, shadow_root: NodeId) -> Option<NodeId> {
        self.get(shadow_root)
            .and_then(Node::as_shadow_root)
            .map(|s| s.host)
    }

    /// Parent, or the host when `id` is a shadow root
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).or_else(|| self.host_of(id))
    }

    /// Shadow-including root is a document
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let root = self.root_of(current);
            match self.get(root).map(|n| &n.data) {
                Some(NodeData::Document) => return true,
                Some(NodeData::ShadowRoot(shadow)) => current = shadow.host,
                _ => return false,
            }
        }
    }

    /// `ancestor` is `node` or one of its ancestors, crossing shadow
    /// boundaries through hosts
    pub fn is_shadow_including_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.composed_parent(id);
        }
        false
    }

    /// Concatenated text of descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) | Some(NodeData::Comment(text)) => text.clone(),
            Some(_) => self.descendants(id)
                .into_iter()
                .filter_map(|node| self.get(node).and_then(Node::as_text))
                .collect(),
            None => String::new(),
        }
    }

    // --- Structure ---

    /// Insert `child` into `parent` before `reference` (append when `None`).
    ///
    /// A fragment moves its children instead of itself. Returns the nodes
    /// that were inserted.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<Vec<NodeId>> {
        self.validate_insertion(parent, child, reference)?;

        let nodes = if self.node(child)?.is_fragment() {
            self.child_ids(child)
        } else {
            vec![child]
        };

        let reference = reference.unwrap_or(NodeId::NONE);
        for &node in &nodes {
            self.detach(node);
            self.link_before(parent, node, reference);
        }
        Ok(nodes)
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<Vec<NodeId>> {
        self.insert_before(parent, child, None)
    }

    pub(crate) fn validate_insertion(&self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<()> {
        if !self.node(parent)?.can_have_children() {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }
        let child_node = self.node(child)?;
        if child_node.is_document() || child_node.is_shadow_root() {
            return Err(DomError::HierarchyRequest("node cannot be inserted"));
        }
        if self.is_host_including_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest("node is an ancestor of the parent"));
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::HierarchyRequest("reference is not a child of the parent"));
            }
        }
        Ok(())
    }

    fn is_host_including_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.is_shadow_including_inclusive_ancestor(ancestor, node)
    }

    fn link_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }

        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    /// Unlink `id` from its parent. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }

        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Detach every child of `id`, returning them in order
    pub fn remove_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.child_ids(id);
        for &child in &children {
            self.detach(child);
        }
        children
    }

    /// Replace the data of a text or comment node, returning the old data
    pub fn set_character_data(&mut self, id: NodeId, data: &str) -> DomResult<String> {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(text)) | Some(NodeData::Comment(text)) => {
                Ok(std::mem::replace(text, data.to_string()))
            }
            Some(_) => Err(DomError::HierarchyRequest("node has no character data")),
            None => Err(DomError::NotFound(id)),
        }
    }

    /// Clone a node, and its descendants when `deep`.
    ///
    /// Shadow roots are not cloned; template content is cloned along with a
    /// deep template clone. Cloned custom elements start out undefined.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let source = self.node(id)?;
        let owner = source.owner_document;
        let copy = match &source.data {
            NodeData::Document | NodeData::ShadowRoot(_) => {
                return Err(DomError::HierarchyRequest("node cannot be cloned"));
            }
            NodeData::Element(elem) => {
                let mut data = ElementData::new(&elem.local_name);
                data.attrs = elem.attrs.clone();
                Node { data: NodeData::Element(data), ..Node::fragment() }
            }
            other => Node { data: other.clone(), ..Node::fragment() },
        };
        let template_content = self.element(id).and_then(|e| e.template_content);

        let clone = self.push(copy);
        self.set_owner_document(clone, owner);

        if let Some(content) = template_content {
            let content_copy = if deep {
                self.clone_node(content, true)?
            } else {
                self.create_fragment()
            };
            if let Some(elem) = self.element_mut(clone) {
                elem.template_content = Some(content_copy);
            }
        }

        if deep {
            for child in self.child_ids(id) {
                let child_copy = self.clone_node(child, true)?;
                self.link_before(clone, child_copy, NodeId::NONE);
            }
        }
        Ok(clone)
    }

    /// Approximate heap usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("span");
        let b = tree.create_text("hello");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();
        (tree, div, a, b)
    }

    #[test]
    fn test_append_and_children() {
        let (tree, div, a, b) = sample();
        assert_eq!(tree.child_ids(div), vec![a, b]);
        assert_eq!(tree.parent(a), Some(div));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.previous_sibling(b), Some(a));
        assert_eq!(tree.text_content(div), "hello");
    }

    #[test]
    fn test_insert_before_and_detach() {
        let (mut tree, div, a, b) = sample();
        let c = tree.create_element("em");
        tree.insert_before(div, c, Some(b)).unwrap();
        assert_eq!(tree.child_ids(div), vec![a, c, b]);

        tree.detach(c);
        assert_eq!(tree.child_ids(div), vec![a, b]);
        assert_eq!(tree.parent(c), None);

        tree.detach(a);
        tree.detach(b);
        assert_eq!(tree.first_child(div), None);
        assert_eq!(tree.last_child(div), None);
    }

    #[test]
    fn test_fragment_moves_children() {
        let mut tree = DomTree::new();
        let frag = tree.create_fragment();
        let x = tree.create_element("p");
        let y = tree.create_element("p");
        tree.append_child(frag, x).unwrap();
        tree.append_child(frag, y).unwrap();

        let inserted = tree.append_child(tree.root(), frag).unwrap();
        assert_eq!(inserted, vec![x, y]);
        assert!(tree.child_ids(frag).is_empty());
        assert_eq!(tree.child_ids(tree.root()), vec![x, y]);
    }

    #[test]
    fn test_hierarchy_errors() {
        let (mut tree, div, a, _) = sample();
        assert!(matches!(tree.append_child(a, div), Err(DomError::HierarchyRequest(_))));
        assert!(matches!(tree.append_child(div, div), Err(DomError::HierarchyRequest(_))));
        let text = tree.create_text("x");
        assert!(matches!(tree.append_child(text, a), Err(DomError::HierarchyRequest(_))));
        let other = tree.create_element("p");
        assert!(matches!(
            tree.insert_before(div, other, Some(other)),
            Err(DomError::HierarchyRequest(_))
        ));
    }

    #[test]
    fn test_connectedness() {
        let (mut tree, div, a, _) = sample();
        assert!(tree.is_connected(a));
        tree.detach(div);
        assert!(!tree.is_connected(a));
        assert_eq!(tree.root_of(a), div);
    }

    #[test]
    fn test_get_element_by_id_scoped() {
        let (mut tree, div, a, _) = sample();
        tree.element_mut(a).unwrap().set_attr("id", "target");
        assert_eq!(tree.get_element_by_id(tree.root(), "target"), Some(a));
        assert_eq!(tree.get_element_by_id(a, "target"), None);
        assert_eq!(tree.elements_by_tag_name(div, "SPAN"), vec![a]);
    }

    #[test]
    fn test_deep_clone() {
        let (mut tree, div, _, _) = sample();
        tree.element_mut(div).unwrap().set_attr("class", "box");
        let copy = tree.clone_node(div, true).unwrap();
        assert_ne!(copy, div);
        assert_eq!(tree.parent(copy), None);
        assert_eq!(tree.get_attribute(copy, "class"), Some("box"));
        assert_eq!(tree.child_ids(copy).len(), 2);
        assert_eq!(tree.text_content(copy), "hello");

        let shallow = tree.clone_node(div, false).unwrap();
        assert!(tree.child_ids(shallow).is_empty());
        assert!(tree.clone_node(tree.root(), true).is_err());
    }

    #[test]
    fn test_template_has_content() {
        let mut tree = DomTree::new();
        let template = tree.create_element("template");
        let content = tree.element(template).unwrap().template_content.unwrap();
        assert!(tree.get(content).unwrap().is_fragment());
        assert!(tree.child_ids(template).is_empty());
    }

    #[test]
    fn test_character_data() {
        let (mut tree, _, a, b) = sample();
        assert_eq!(tree.set_character_data(b, "bye").unwrap(), "hello");
        assert_eq!(tree.get(b).unwrap().as_text(), Some("bye"));
        assert!(tree.set_character_data(a, "x").is_err());
    }
}
