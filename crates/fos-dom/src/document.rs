//! Document - High-level document API
//!
//! Wraps the raw `DomTree` with everything that makes a tree live: custom
//! element construction and upgrades, lifecycle reactions, event dispatch
//! and mutation records.
//!
//! Reactions are collected in a FIFO queue while a DOM operation runs and
//! are drained when the outermost operation returns. A callback that writes
//! to the DOM therefore never re-enters itself: the reactions it causes run
//! after it returns, one at a time.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::custom_elements::{Reaction, ReactionQueue};
use crate::dom_events::{ListenerKind, ListenerMap};
use crate::mutation::MutationLog;
use crate::{
    can_attach_shadow, CustomElement, CustomElementDefinition, CustomElementRegistry,
    CustomElementState, DispatchOutcome, DomError, DomResult, DomTree, Event, EventPhase,
    LifecycleCallback, LifecycleCallbackInfo, ListenerId, MutationRecord, NodeId,
    ShadowRootInit, ShadowRootMode,
};

/// Slot for an element instance; `None` while one of its callbacks runs
type InstanceSlot = Option<Box<dyn CustomElement>>;

/// HTML Document
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    registry: CustomElementRegistry,
    instances: HashMap<NodeId, InstanceSlot>,
    listeners: ListenerMap,
    reactions: ReactionQueue,
    mutations: MutationLog,
    /// Nesting of DOM operations currently running
    operation_depth: u32,
    /// Reaction queue is being drained
    flushing: bool,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        // Create basic document structure
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let root = tree.root();
        let structure = [(root, html), (html, head), (html, body)];
        for (parent, child) in structure {
            if let Err(err) = tree.append_child(parent, child) {
                tracing::error!("Failed to build document skeleton: {}", err);
            }
        }

        Self {
            html_element: html,
            head_element: head,
            body_element: body,
            ..Self::empty(url, tree)
        }
    }

    fn empty(url: &str, tree: DomTree) -> Self {
        Self {
            tree,
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            registry: CustomElementRegistry::new(),
            instances: HashMap::new(),
            listeners: ListenerMap::default(),
            reactions: ReactionQueue::default(),
            mutations: MutationLog::default(),
            operation_depth: 0,
            flushing: false,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Root document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably.
    ///
    /// Raw tree writes skip reactions and mutation records; use them only
    /// for inert content such as template fragments.
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get element by ID in the document tree
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.get_element_by_id(self.root(), id)
    }

    /// Elements in the document tree with the given local name
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<NodeId> {
        self.tree.elements_by_tag_name(self.root(), name)
    }

    // --- Reaction plumbing ---

    /// Run a DOM operation, draining reactions when the outermost one ends
    fn operation<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.operation_depth += 1;
        let result = f(self);
        self.operation_depth -= 1;
        if self.operation_depth == 0 {
            self.flush_reactions();
        }
        result
    }

    fn in_callback(&self) -> bool {
        self.operation_depth > 0 || self.flushing
    }

    fn flush_reactions(&mut self) {
        if self.flushing {
            return;
        }
        self.flushing = true;
        while let Some(reaction) = self.reactions.pop() {
            self.run_reaction(reaction);
        }
        self.flushing = false;
    }

    fn run_reaction(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Callback(info) => {
                let element = info.element_id;
                let result = self.invoke_element(element, |instance, ctx| match info.callback {
                    LifecycleCallback::Connected => instance.connected_callback(ctx),
                    LifecycleCallback::Disconnected => instance.disconnected_callback(ctx),
                    LifecycleCallback::Adopted => instance.adopted_callback(ctx),
                    LifecycleCallback::AttributeChanged => instance.attribute_changed_callback(
                        ctx,
                        info.attribute_name.as_deref().unwrap_or_default(),
                        info.old_value.as_deref(),
                        info.new_value.as_deref(),
                    ),
                });
                if let Err(err) = result {
                    tracing::error!("{:?} callback on {} failed: {}", info.callback, element, err);
                }
            }
            Reaction::Dispatch { target, event } => {
                self.dispatch_now(target, event);
            }
            Reaction::Release(node) => self.drop_subtree(node),
        }
    }

    /// Whether reactions are waiting to run
    pub fn has_pending_reactions(&self) -> bool {
        !self.reactions.is_empty()
    }

    fn enqueue_callback(&mut self, info: LifecycleCallbackInfo) {
        if self.tree.custom_state(info.element_id) == Some(CustomElementState::Custom)
            && self.instances.contains_key(&info.element_id)
        {
            self.reactions.enqueue(Reaction::Callback(info));
        }
    }

    fn enqueue_attribute_changed(&mut self, element: NodeId, name: &str, old: Option<&str>, new: Option<&str>) {
        if self.tree.custom_state(element) != Some(CustomElementState::Custom) {
            return;
        }
        let observed = self.tree.local_name(element)
            .and_then(|local| self.registry.get(local))
            .is_some_and(|definition| definition.observes(name));
        if observed {
            self.enqueue_callback(LifecycleCallbackInfo::attribute_changed(element, name, old, new));
        }
    }

    /// Take an instance out, run `f` with a context for it, put it back
    fn invoke_element<R>(
        &mut self,
        element: NodeId,
        f: impl FnOnce(&mut (dyn CustomElement + 'static), &mut ElementContext<'_>) -> DomResult<R>,
    ) -> DomResult<R> {
        let mut instance = match self.instances.get_mut(&element) {
            Some(slot) => slot.take().ok_or(DomError::ElementBusy(element))?,
            None => return Err(DomError::NotCustom(element)),
        };

        let result = {
            let mut ctx = ElementContext { doc: self, element };
            f(instance.as_mut(), &mut ctx)
        };

        self.instances.insert(element, Some(instance));
        result
    }

    // --- Custom elements ---

    /// Custom element registry
    pub fn registry(&self) -> &CustomElementRegistry {
        &self.registry
    }

    /// Define a custom element and upgrade connected elements that wait
    /// for it, in shadow-including tree order
    pub fn define(&mut self, definition: CustomElementDefinition) -> DomResult<()> {
        self.operation(|doc| {
            let name = definition.name.clone();
            doc.registry.define(definition)?;
            tracing::debug!("Defined custom element <{}>", name);

            let candidates: Vec<NodeId> = doc.tree
                .shadow_including_inclusive_descendants(doc.root())
                .into_iter()
                .filter(|&id| {
                    doc.tree.local_name(id) == Some(name.as_str())
                        && doc.tree.custom_state(id) == Some(CustomElementState::Undefined)
                })
                .collect();
            for id in candidates {
                doc.upgrade(id);
            }
            Ok(())
        })
    }

    /// Whether a name is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.registry.is_defined(name)
    }

    /// Custom element state of an element
    pub fn custom_element_state(&self, element: NodeId) -> Option<CustomElementState> {
        self.tree.custom_state(element)
    }

    fn construct(&mut self, element: NodeId, definition: &CustomElementDefinition) -> DomResult<()> {
        let result = {
            let mut ctx = ElementContext { doc: self, element };
            definition.construct(&mut ctx)
        };
        let (state, outcome) = match result {
            Ok(instance) => {
                self.instances.insert(element, Some(instance));
                (CustomElementState::Custom, Ok(()))
            }
            Err(err) => (CustomElementState::Failed, Err(err)),
        };
        if let Some(elem) = self.tree.element_mut(element) {
            elem.custom_state = state;
        }
        outcome
    }

    /// Upgrade an undefined element whose definition exists
    fn upgrade(&mut self, element: NodeId) {
        if self.tree.custom_state(element) != Some(CustomElementState::Undefined) {
            return;
        }
        let Some(definition) = self.tree.local_name(element)
            .and_then(|name| self.registry.get(name))
            .cloned()
        else {
            return;
        };

        if let Err(err) = self.construct(element, &definition) {
            tracing::error!("Upgrade of <{}> failed: {}", definition.name, err);
            return;
        }
        tracing::debug!("Upgraded <{}> {}", definition.name, element);

        let present: Vec<(String, String)> = self.tree.element(element)
            .map(|e| {
                e.attrs.iter()
                    .filter(|a| definition.observes(&a.name))
                    .map(|a| (a.name.clone(), a.value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for (name, value) in present {
            self.enqueue_callback(LifecycleCallbackInfo::attribute_changed(element, &name, None, Some(&value)));
        }
        if self.tree.is_connected(element) {
            self.enqueue_callback(LifecycleCallbackInfo::new(LifecycleCallback::Connected, element));
        }
    }

    /// Borrow a custom element instance by type
    pub fn element<T: CustomElement>(&self, element: NodeId) -> Option<&T> {
        let instance = self.instances.get(&element)?.as_deref()?;
        instance.as_any().downcast_ref::<T>()
    }

    /// Run `f` against a custom element instance with a context for it.
    /// Reactions caused by `f` run before this returns.
    pub fn with_element<T, R>(
        &mut self,
        element: NodeId,
        f: impl FnOnce(&mut T, &mut ElementContext<'_>) -> R,
    ) -> DomResult<R>
    where
        T: CustomElement,
    {
        self.operation(|doc| {
            doc.invoke_element(element, |instance, ctx| {
                let typed = instance.as_any_mut()
                    .downcast_mut::<T>()
                    .ok_or(DomError::WrongElementType(element))?;
                Ok(f(typed, ctx))
            })
        })
    }

    // --- Node creation ---

    /// Create an element, constructing it when its name is defined
    pub fn create_element(&mut self, name: &str) -> DomResult<NodeId> {
        self.operation(|doc| {
            let id = doc.tree.create_element(name);
            let definition = doc.tree.local_name(id)
                .and_then(|local| doc.registry.get(local))
                .cloned();
            if let Some(definition) = definition {
                doc.construct(id, &definition)?;
            }
            Ok(id)
        })
    }

    /// Create a text node
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.tree.create_text(text)
    }

    /// Create a comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.tree.create_comment(text)
    }

    /// Create an empty document fragment
    pub fn create_document_fragment(&mut self) -> NodeId {
        self.tree.create_fragment()
    }

    /// Create another document sharing this arena and registry
    pub fn create_document(&mut self) -> NodeId {
        self.tree.create_document()
    }

    /// Clone a node; defined custom elements in the copy are upgraded
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        self.operation(|doc| {
            let copy = doc.tree.clone_node(node, deep)?;
            for id in doc.tree.shadow_including_inclusive_descendants(copy) {
                doc.upgrade(id);
            }
            Ok(copy)
        })
    }

    // --- Tree mutation ---

    /// Append `child` to `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (append when `None`)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<()> {
        self.operation(|doc| {
            let reference = if reference == Some(child) {
                doc.tree.next_sibling(child)
            } else {
                reference
            };
            doc.tree.validate_insertion(parent, child, reference)?;
            doc.remove_inner(child);
            let inserted = doc.tree.insert_before(parent, child, reference)?;
            doc.mutations.push(MutationRecord::child_list(parent, inserted.clone(), Vec::new()));

            if doc.tree.is_connected(parent) {
                for node in inserted {
                    doc.on_connected(node);
                }
            }
            Ok(())
        })
    }

    fn on_connected(&mut self, node: NodeId) {
        for id in self.tree.shadow_including_inclusive_descendants(node) {
            match self.tree.custom_state(id) {
                Some(CustomElementState::Custom) => {
                    self.enqueue_callback(LifecycleCallbackInfo::new(LifecycleCallback::Connected, id));
                }
                Some(CustomElementState::Undefined) => self.upgrade(id),
                _ => {}
            }
        }
    }

    /// Remove `node` from its parent
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        self.tree.get(node).ok_or(DomError::NotFound(node))?;
        self.operation(|doc| doc.remove_inner(node));
        Ok(())
    }

    fn remove_inner(&mut self, node: NodeId) {
        let Some(parent) = self.tree.parent(node) else { return };
        let was_connected = self.tree.is_connected(node);
        self.tree.detach(node);
        self.mutations.push(MutationRecord::child_list(parent, Vec::new(), vec![node]));

        if was_connected {
            for id in self.tree.shadow_including_inclusive_descendants(node) {
                self.enqueue_callback(LifecycleCallbackInfo::new(LifecycleCallback::Disconnected, id));
            }
        }
    }

    /// Detach `node` and end the life of everything under it.
    ///
    /// Disconnected callbacks run first; the custom element instances and
    /// listeners of the subtree (shadow trees and template content
    /// included) are dropped once they have. Arena slots are not reused,
    /// so the ids stay valid but inert.
    pub fn release(&mut self, node: NodeId) -> DomResult<()> {
        if self.tree.get(node).ok_or(DomError::NotFound(node))?.is_document() {
            return Err(DomError::HierarchyRequest("documents cannot be released"));
        }
        self.operation(|doc| {
            doc.remove_inner(node);
            doc.reactions.enqueue(Reaction::Release(node));
        });
        Ok(())
    }

    fn drop_subtree(&mut self, node: NodeId) {
        let mut dropped = (0, 0);
        let mut pending = vec![node];
        while let Some(root) = pending.pop() {
            for id in self.tree.shadow_including_inclusive_descendants(root) {
                if let Some(content) = self.tree.template_content(id) {
                    pending.push(content);
                }
                if self.instances.remove(&id).is_some() {
                    dropped.0 += 1;
                }
                dropped.1 += self.listeners.clear_node(id);
            }
        }
        tracing::debug!("Released {}: {} elements, {} listeners", node, dropped.0, dropped.1);
    }

    /// Remove every child of `node`
    pub fn remove_children(&mut self, node: NodeId) -> DomResult<()> {
        self.tree.get(node).ok_or(DomError::NotFound(node))?;
        self.operation(|doc| {
            for child in doc.tree.child_ids(node) {
                doc.remove_inner(child);
            }
        });
        Ok(())
    }

    /// Replace all children of `node` with a single text node (none for "")
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        self.operation(|doc| {
            doc.remove_children(node)?;
            if !text.is_empty() {
                let text_node = doc.tree.create_text(text);
                doc.insert_before(node, text_node, None)?;
            }
            Ok(())
        })
    }

    /// Update only the text of `node`: a lone text child has its data
    /// replaced in place, anything else is replaced by one text node
    pub fn replace_text(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        let children = self.tree.child_ids(node);
        match children.as_slice() {
            [only] if self.tree.get(*only).is_some_and(crate::Node::is_text) => {
                self.set_character_data(*only, text)
            }
            _ => self.set_text_content(node, text),
        }
    }

    /// Replace the data of a text or comment node
    pub fn set_character_data(&mut self, node: NodeId, data: &str) -> DomResult<()> {
        let old = self.tree.set_character_data(node, data)?;
        self.mutations.push(MutationRecord::character_data(node, old));
        Ok(())
    }

    // --- Attributes ---

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.tree.get_attribute(element, &name.to_ascii_lowercase())
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.get_attribute(element, name).is_some()
    }

    /// Set an attribute. Observed attributes of custom elements queue an
    /// attribute-changed reaction on every call.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> DomResult<()> {
        let name = name.to_ascii_lowercase();
        self.operation(|doc| {
            let elem = doc.tree.element_mut(element).ok_or(DomError::NotAnElement(element))?;
            let old = elem.set_attr(&name, value);
            doc.enqueue_attribute_changed(element, &name, old.as_deref(), Some(value));
            doc.mutations.push(MutationRecord::attributes(element, &name, old));
            Ok(())
        })
    }

    /// Remove an attribute; no-op when absent
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> DomResult<()> {
        let name = name.to_ascii_lowercase();
        self.operation(|doc| {
            let elem = doc.tree.element_mut(element).ok_or(DomError::NotAnElement(element))?;
            if let Some(old) = elem.remove_attr(&name) {
                doc.enqueue_attribute_changed(element, &name, Some(&old), None);
                doc.mutations.push(MutationRecord::attributes(element, &name, Some(old)));
            }
            Ok(())
        })
    }

    // --- Shadow DOM ---

    /// Attach a shadow root to `host`
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> DomResult<NodeId> {
        let elem = self.tree.element(host).ok_or(DomError::NotAnElement(host))?;
        if !can_attach_shadow(&elem.local_name) {
            return Err(DomError::ShadowNotSupported(elem.local_name.clone()));
        }
        if elem.shadow_root.is_some() {
            return Err(DomError::ShadowAlreadyAttached);
        }
        let shadow = self.tree.create_shadow_root(host, init);
        tracing::debug!("Attached {} shadow root {} to {}", init.mode.as_str(), shadow, host);
        Ok(shadow)
    }

    /// Open shadow root of `host`; closed roots are hidden
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let shadow = self.tree.shadow_root_of(host)?;
        let data = self.tree.get(shadow)?.as_shadow_root()?;
        (data.mode == ShadowRootMode::Open).then_some(shadow)
    }

    // --- Adoption ---

    /// Move `node` into `document`, firing disconnected (if it was
    /// connected) and then adopted on every custom element in the subtree
    pub fn adopt_node(&mut self, node: NodeId, document: NodeId) -> DomResult<()> {
        if !self.tree.get(document).is_some_and(crate::Node::is_document) {
            return Err(DomError::HierarchyRequest("adoption target is not a document"));
        }
        if self.tree.get(node).is_some_and(crate::Node::is_document) {
            return Err(DomError::HierarchyRequest("documents cannot be adopted"));
        }
        self.operation(|doc| {
            doc.remove_inner(node);
            let old_document = doc.tree.owner_document(node).ok_or(DomError::NotFound(node))?;
            for id in doc.tree.shadow_including_inclusive_descendants(node) {
                doc.tree.set_owner_document(id, document);
                if let Some(content) = doc.tree.template_content(id) {
                    for inner in doc.tree.shadow_including_inclusive_descendants(content) {
                        doc.tree.set_owner_document(inner, document);
                    }
                }
                if old_document != document {
                    doc.enqueue_callback(LifecycleCallbackInfo::new(LifecycleCallback::Adopted, id));
                }
            }
            Ok(())
        })
    }

    // --- Events ---

    /// Add a closure listener
    pub fn add_event_listener<F>(&mut self, node: NodeId, event_type: &str, listener: F) -> ListenerId
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.listeners.add(node, event_type, ListenerKind::Callback(Box::new(listener)))
    }

    /// Remove a listener by handle
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of listeners registered on `node`
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.count(node)
    }

    /// Dispatch `event` at `target`. From inside a callback the dispatch is
    /// queued behind the reactions already pending.
    pub fn dispatch_event(&mut self, target: NodeId, event: Event) -> DispatchOutcome {
        if self.in_callback() {
            self.reactions.enqueue(Reaction::Dispatch { target, event });
            return DispatchOutcome::Queued;
        }
        self.operation(|doc| {
            let canceled = doc.dispatch_now(target, event);
            DispatchOutcome::Delivered { canceled }
        })
    }

    /// Simulate a user click on `target`
    pub fn click(&mut self, target: NodeId) -> DispatchOutcome {
        self.dispatch_event(target, Event::click())
    }

    /// Event path: target and ancestors; shadow roots lead to their host
    /// only for composed events
    fn event_path(&self, target: NodeId, composed: bool) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            path.push(node);
            current = match self.tree.parent(node) {
                Some(parent) => Some(parent),
                None if composed => self.tree.host_of(node),
                None => None,
            };
        }
        path
    }

    /// `target` as seen from `observer`: hosts stand in for nodes inside
    /// shadow trees the observer is not part of
    fn retarget(&self, target: NodeId, observer: NodeId) -> NodeId {
        let mut current = target;
        loop {
            let root = self.tree.root_of(current);
            match self.tree.host_of(root) {
                Some(host) if !self.tree.is_shadow_including_inclusive_ancestor(root, observer) => {
                    current = host;
                }
                _ => return current,
            }
        }
    }

    /// Returns whether the default action was prevented
    fn dispatch_now(&mut self, target: NodeId, mut event: Event) -> bool {
        event.reset_dispatch_state(target);
        let path = self.event_path(target, event.composed);

        for node in path {
            let seen_target = self.retarget(target, node);
            let phase = if seen_target == node { EventPhase::AtTarget } else { EventPhase::Bubbling };
            if phase == EventPhase::Bubbling && !event.bubbles {
                continue;
            }
            event.target = seen_target;
            event.current_target = Some(node);
            event.phase = phase;
            self.invoke_listeners(node, &mut event);
            if event.is_propagation_stopped() {
                break;
            }
        }

        event.reset_dispatch_state(target);
        event.is_default_prevented()
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut Event) {
        for id in self.listeners.ids_for(node, &event.event_type) {
            let owner = match self.listeners.get_mut(node, id).map(|l| &mut l.kind) {
                Some(ListenerKind::Callback(callback)) => {
                    callback(event);
                    None
                }
                Some(ListenerKind::Element { owner }) => Some(*owner),
                None => None,
            };
            if let Some(owner) = owner {
                let result = self.invoke_element(owner, |instance, ctx| instance.handle_event(ctx, event));
                if let Err(err) = result {
                    tracing::warn!("Listener of {} for '{}' failed: {}", owner, event.event_type, err);
                }
            }
        }
    }

    // --- Mutation records ---

    /// Drain recorded mutations
    pub fn take_mutation_records(&mut self) -> Vec<MutationRecord> {
        self.mutations.take()
    }

    // --- Serialization ---

    /// Markup of the children of `node`, shadow roots included
    pub fn inner_html(&self, node: NodeId) -> String {
        self.tree.inner_html(node)
    }

    /// Markup of `node` itself, shadow roots included
    pub fn outer_html(&self, node: NodeId) -> String {
        self.tree.outer_html(node)
    }

    /// Memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.tree.memory_usage() + self.url.capacity()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("nodes", &self.tree.len())
            .field("defined", &self.registry.len())
            .field("instances", &self.instances.len())
            .field("pending_reactions", &self.reactions.len())
            .finish_non_exhaustive()
    }
}

/// Handle given to custom element callbacks.
///
/// Dereferences to the [`Document`], so every DOM operation is available;
/// the methods here add what only the element itself may do.
pub struct ElementContext<'a> {
    doc: &'a mut Document,
    element: NodeId,
}

impl ElementContext<'_> {
    /// The element this context belongs to
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Attach a shadow root to this element
    pub fn attach_shadow(&mut self, init: ShadowRootInit) -> DomResult<NodeId> {
        self.doc.attach_shadow(self.element, init)
    }

    /// This element's shadow root, closed ones included
    pub fn shadow_root(&self) -> Option<NodeId> {
        self.doc.tree.shadow_root_of(self.element)
    }

    /// Attribute of this element
    pub fn host_attribute(&self, name: &str) -> Option<&str> {
        self.doc.get_attribute(self.element, name)
    }

    /// Set an attribute on this element
    pub fn set_host_attribute(&mut self, name: &str, value: &str) -> DomResult<()> {
        self.doc.set_attribute(self.element, name, value)
    }

    /// Route `event_type` events reaching `node` to this element's
    /// `handle_event`
    pub fn listen(&mut self, node: NodeId, event_type: &str) -> ListenerId {
        self.doc.listeners.add(node, event_type, ListenerKind::Element { owner: self.element })
    }

    /// Dispatch an event on this element
    pub fn emit(&mut self, event: Event) -> DispatchOutcome {
        let element = self.element;
        self.doc.dispatch_event(element, event)
    }

    /// Whether this element is connected
    pub fn is_connected(&self) -> bool {
        self.doc.tree.is_connected(self.element)
    }
}

impl Deref for ElementContext<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for ElementContext<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}
