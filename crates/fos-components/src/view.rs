//! Declarative views
//!
//! A view is a pure function returning a [`VNode`] tree. The [`Reconciler`]
//! mounts it under a root once, then patches the live nodes position by
//! position on every later render: text data and attributes are updated in
//! place, mismatched nodes are replaced, surplus nodes are removed.

use fos_dom::{DomResult, ElementContext, NodeId};

/// Virtual node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VNode {
    Element(VElement),
    Text(String),
}

/// Virtual element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<VNode>,
    /// Event types routed to the owning element's `handle_event`
    pub events: Vec<String>,
}

/// Start a virtual element
pub fn h(tag: &str) -> VElement {
    VElement {
        tag: tag.to_ascii_lowercase(),
        ..VElement::default()
    }
}

/// Virtual text node
pub fn text(content: impl Into<String>) -> VNode {
    VNode::Text(content.into())
}

impl VElement {
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Listen for `event_type` on this node
    pub fn on(mut self, event_type: &str) -> Self {
        self.events.push(event_type.to_string());
        self
    }
}

impl From<VElement> for VNode {
    fn from(element: VElement) -> Self {
        VNode::Element(element)
    }
}

impl From<&str> for VNode {
    fn from(content: &str) -> Self {
        VNode::Text(content.to_string())
    }
}

/// A mounted node and the description it was last patched to
#[derive(Debug)]
struct Mounted {
    node: NodeId,
    vnode: VNode,
    children: Vec<Mounted>,
}

/// Patches a root's children to match successive views
#[derive(Debug, Default)]
pub struct Reconciler {
    mounted: Vec<Mounted>,
    renders: usize,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a view has been mounted
    pub fn is_mounted(&self) -> bool {
        self.renders > 0
    }

    /// Number of renders so far
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Live node of the top-level view node at `index`
    pub fn root_node(&self, index: usize) -> Option<NodeId> {
        self.mounted.get(index).map(|m| m.node)
    }

    /// Bring the children of `root` in line with `view`
    pub fn render(&mut self, ctx: &mut ElementContext<'_>, root: NodeId, view: Vec<VNode>) -> DomResult<()> {
        let old = std::mem::take(&mut self.mounted);
        self.mounted = patch_children(ctx, root, old, view)?;
        self.renders += 1;
        Ok(())
    }
}

fn patch_children(
    ctx: &mut ElementContext<'_>,
    parent: NodeId,
    old: Vec<Mounted>,
    new: Vec<VNode>,
) -> DomResult<Vec<Mounted>> {
    let mut old = old.into_iter();
    let mut result = Vec::with_capacity(new.len());

    for vnode in new {
        let mounted = match old.next() {
            Some(existing) => patch(ctx, parent, existing, vnode)?,
            None => {
                let mounted = mount(ctx, vnode)?;
                ctx.append_child(parent, mounted.node)?;
                mounted
            }
        };
        result.push(mounted);
    }

    for surplus in old {
        ctx.remove(surplus.node)?;
    }
    Ok(result)
}

fn patch(ctx: &mut ElementContext<'_>, parent: NodeId, existing: Mounted, vnode: VNode) -> DomResult<Mounted> {
    match (&existing.vnode, vnode) {
        (VNode::Text(old), VNode::Text(new)) => {
            if *old != new {
                ctx.set_character_data(existing.node, &new)?;
            }
            Ok(Mounted { node: existing.node, vnode: VNode::Text(new), children: Vec::new() })
        }
        (VNode::Element(old), VNode::Element(mut new)) if old.tag == new.tag => {
            let node = existing.node;
            for (name, value) in &new.attrs {
                let current = old.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v);
                if current != Some(value) {
                    ctx.set_attribute(node, name, value)?;
                }
            }
            for (name, _) in &old.attrs {
                if !new.attrs.iter().any(|(n, _)| n == name) {
                    ctx.remove_attribute(node, name)?;
                }
            }
            for event_type in &new.events {
                if !old.events.contains(event_type) {
                    ctx.listen(node, event_type);
                }
            }

            let children = std::mem::take(&mut new.children);
            let mounted_children = patch_children(ctx, node, existing.children, children)?;
            Ok(Mounted { node, vnode: VNode::Element(new), children: mounted_children })
        }
        (_, vnode) => {
            let replacement = mount(ctx, vnode)?;
            ctx.insert_before(parent, replacement.node, Some(existing.node))?;
            ctx.remove(existing.node)?;
            Ok(replacement)
        }
    }
}

/// Create live nodes for `vnode` (detached)
fn mount(ctx: &mut ElementContext<'_>, vnode: VNode) -> DomResult<Mounted> {
    match vnode {
        VNode::Text(content) => {
            let node = ctx.create_text_node(&content);
            Ok(Mounted { node, vnode: VNode::Text(content), children: Vec::new() })
        }
        VNode::Element(mut element) => {
            let node = ctx.create_element(&element.tag)?;
            for (name, value) in &element.attrs {
                ctx.set_attribute(node, name, value)?;
            }
            for event_type in &element.events {
                ctx.listen(node, event_type);
            }

            let mut children = Vec::with_capacity(element.children.len());
            for child in std::mem::take(&mut element.children) {
                let mounted = mount(ctx, child)?;
                ctx.append_child(node, mounted.node)?;
                children.push(mounted);
            }
            Ok(Mounted { node, vnode: VNode::Element(element), children })
        }
    }
}
