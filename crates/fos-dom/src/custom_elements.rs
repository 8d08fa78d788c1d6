//! Custom Elements v1
//!
//! Custom element registry, definitions and lifecycle callbacks.
//!
//! A definition pairs a name with a constructor closure and the list of
//! observed attributes. Instances implement [`CustomElement`]; the
//! `Document` owns them and invokes their callbacks through the reaction
//! queue so no two callbacks ever overlap.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::{DomError, DomResult, ElementContext, Event, NodeId};

/// Downcasting support for element instances
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour of an autonomous custom element.
///
/// Every callback receives a context scoped to the element's own node.
/// DOM writes made through the context apply immediately; the callbacks and
/// events they cause are queued and run after the current callback returns.
pub trait CustomElement: AsAny {
    /// Element was inserted into a connected tree
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Element was removed from a connected tree
    fn disconnected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Element moved to a different document
    fn adopted_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// An observed attribute was set or removed
    fn attribute_changed_callback(
        &mut self,
        ctx: &mut ElementContext<'_>,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> DomResult<()> {
        let _ = (ctx, name, old_value, new_value);
        Ok(())
    }

    /// An event reached a listener this element registered with
    /// [`ElementContext::listen`]
    fn handle_event(&mut self, ctx: &mut ElementContext<'_>, event: &mut Event) -> DomResult<()> {
        let _ = (ctx, event);
        Ok(())
    }
}

/// Constructor closure stored in a definition
pub type Constructor = Rc<dyn Fn(&mut ElementContext<'_>) -> DomResult<Box<dyn CustomElement>>>;

/// Pins the closure signature to the higher-ranked constructor type
fn erase<F>(constructor: F) -> F
where
    F: Fn(&mut ElementContext<'_>) -> DomResult<Box<dyn CustomElement>> + 'static,
{
    constructor
}

/// Custom element definition
#[derive(Clone)]
pub struct CustomElementDefinition {
    /// Element name
    pub name: String,
    /// Observed attributes
    pub observed_attributes: Vec<String>,
    constructor: Constructor,
}

impl CustomElementDefinition {
    /// Create a definition from a constructor
    pub fn new<E, F>(name: impl Into<String>, constructor: F) -> Self
    where
        E: CustomElement,
        F: Fn(&mut ElementContext<'_>) -> DomResult<E> + 'static,
    {
        let boxed = erase(move |ctx| {
            constructor(ctx).map(|element| Box::new(element) as Box<dyn CustomElement>)
        });
        Self {
            name: name.into(),
            observed_attributes: Vec::new(),
            constructor: Rc::new(boxed),
        }
    }

    /// Set the observed attributes
    pub fn observed_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.observed_attributes = attributes.into_iter()
            .map(|a| a.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Whether `attribute` is observed
    pub fn observes(&self, attribute: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == attribute)
    }

    pub(crate) fn construct(&self, ctx: &mut ElementContext<'_>) -> DomResult<Box<dyn CustomElement>> {
        (self.constructor)(ctx)
    }
}

impl fmt::Debug for CustomElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomElementDefinition")
            .field("name", &self.name)
            .field("observed_attributes", &self.observed_attributes)
            .finish_non_exhaustive()
    }
}

/// Custom element state of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomElementState {
    /// Not a valid custom element name
    #[default]
    Uncustomized,
    /// Valid name, waiting for a definition
    Undefined,
    /// Constructed successfully
    Custom,
    /// Constructor failed
    Failed,
}

/// Custom element lifecycle callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCallback {
    Connected,
    Disconnected,
    Adopted,
    AttributeChanged,
}

/// Lifecycle callback info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleCallbackInfo {
    pub callback: LifecycleCallback,
    pub element_id: NodeId,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl LifecycleCallbackInfo {
    pub fn new(callback: LifecycleCallback, element_id: NodeId) -> Self {
        Self {
            callback,
            element_id,
            attribute_name: None,
            old_value: None,
            new_value: None,
        }
    }

    pub fn attribute_changed(
        element_id: NodeId,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> Self {
        Self {
            callback: LifecycleCallback::AttributeChanged,
            element_id,
            attribute_name: Some(name.to_string()),
            old_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
        }
    }
}

/// Queued work: a lifecycle callback or a deferred event dispatch
#[derive(Debug)]
pub(crate) enum Reaction {
    Callback(LifecycleCallbackInfo),
    Dispatch { target: NodeId, event: Event },
    /// Drop the instances and listeners of a released subtree
    Release(NodeId),
}

/// FIFO reaction queue
#[derive(Debug, Default)]
pub(crate) struct ReactionQueue {
    reactions: VecDeque<Reaction>,
}

impl ReactionQueue {
    pub fn enqueue(&mut self, reaction: Reaction) {
        self.reactions.push_back(reaction);
    }

    pub fn pop(&mut self) -> Option<Reaction> {
        self.reactions.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }
}

/// Custom elements registry
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, CustomElementDefinition>,
    /// Names in definition order
    order: Vec<String>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element
    pub fn define(&mut self, definition: CustomElementDefinition) -> DomResult<()> {
        let name = definition.name.clone();

        // Validate name
        if !Self::is_valid_name(&name) {
            return Err(DomError::InvalidName(name));
        }

        // Check if already defined
        if self.definitions.contains_key(&name) {
            return Err(DomError::AlreadyDefined(name));
        }

        self.definitions.insert(name.clone(), definition);
        self.order.push(name);
        Ok(())
    }

    /// Get element definition by name
    pub fn get(&self, name: &str) -> Option<&CustomElementDefinition> {
        self.definitions.get(name)
    }

    /// Check if element is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Defined names in definition order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Validate custom element name
    pub fn is_valid_name(name: &str) -> bool {
        // Must contain hyphen
        if !name.contains('-') {
            return false;
        }

        // Must start with lowercase letter
        if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return false;
        }

        // Reserved names
        const RESERVED: &[&str] = &[
            "annotation-xml", "color-profile", "font-face",
            "font-face-src", "font-face-uri", "font-face-format",
            "font-face-name", "missing-glyph",
        ];
        if RESERVED.contains(&name) {
            return false;
        }

        name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
    }
}
