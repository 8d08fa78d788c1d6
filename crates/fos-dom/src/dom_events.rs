//! DOM Events
//!
//! Events, listeners and the listener store. Path building and dispatch
//! live on `Document` since they need the element instances.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    AtTarget,
    Bubbling,
}

/// DOM event with an optional typed detail payload
#[derive(Clone)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    /// Crosses shadow boundaries
    pub composed: bool,
    detail: Option<Rc<dyn Any>>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create a non-bubbling, non-composed event
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target: NodeId::NONE,
            current_target: None,
            phase: EventPhase::None,
            bubbles: false,
            cancelable: false,
            composed: false,
            detail: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a custom event carrying `detail`
    pub fn custom<T: Any>(event_type: impl Into<String>, detail: T) -> Self {
        let mut event = Self::new(event_type);
        event.detail = Some(Rc::new(detail));
        event
    }

    /// Create a user click: bubbles, cancelable, composed
    pub fn click() -> Self {
        Self::new("click")
            .bubbles(true)
            .cancelable(true)
            .composed(true)
    }

    pub fn bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn composed(mut self, composed: bool) -> Self {
        self.composed = composed;
        self
    }

    /// Typed detail payload
    pub fn detail<T: Any>(&self) -> Option<&T> {
        self.detail.as_deref()?.downcast_ref::<T>()
    }

    /// Whether this event has the given type
    pub fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn reset_dispatch_state(&mut self, target: NodeId) {
        self.target = target;
        self.current_target = None;
        self.phase = EventPhase::None;
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("target", &self.target)
            .field("current_target", &self.current_target)
            .field("phase", &self.phase)
            .field("bubbles", &self.bubbles)
            .field("composed", &self.composed)
            .field("has_detail", &self.detail.is_some())
            .finish()
    }
}

/// Result of `Document::dispatch_event`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Listeners ran; `canceled` reports `prevent_default`
    Delivered { canceled: bool },
    /// Dispatched from inside a callback; runs once that callback returns
    Queued,
}

/// Listener handle for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Closure listener
pub(crate) type Callback = Box<dyn FnMut(&mut Event)>;

pub(crate) enum ListenerKind {
    /// External closure
    Callback(Callback),
    /// Routed to the owning custom element's `handle_event`
    Element { owner: NodeId },
}

pub(crate) struct Listener {
    pub id: ListenerId,
    pub event_type: String,
    pub kind: ListenerKind,
}

/// Listeners per node
#[derive(Default)]
pub(crate) struct ListenerMap {
    by_node: HashMap<NodeId, Vec<Listener>>,
    next_id: u64,
}

impl ListenerMap {
    pub fn add(&mut self, node: NodeId, event_type: &str, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.by_node.entry(node).or_default().push(Listener {
            id,
            event_type: event_type.to_string(),
            kind,
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        for listeners in self.by_node.values_mut() {
            if let Some(pos) = listeners.iter().position(|l| l.id == id) {
                listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Snapshot of listener IDs for a node and type, in registration order
    pub fn ids_for(&self, node: NodeId, event_type: &str) -> Vec<ListenerId> {
        self.by_node.get(&node)
            .map(|listeners| {
                listeners.iter()
                    .filter(|l| l.event_type == event_type)
                    .map(|l| l.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_mut(&mut self, node: NodeId, id: ListenerId) -> Option<&mut Listener> {
        self.by_node.get_mut(&node)?.iter_mut().find(|l| l.id == id)
    }

    pub fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }

    /// Drop every listener registered on `node`
    pub fn clear_node(&mut self, node: NodeId) -> usize {
        self.by_node.remove(&node).map_or(0, |listeners| listeners.len())
    }
}

impl fmt::Debug for ListenerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerMap")
            .field("nodes", &self.by_node.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Payload {
        counter: i64,
    }

    #[test]
    fn test_custom_event_detail() {
        let event = Event::custom("increased", Payload { counter: 3 });
        assert!(event.is("increased"));
        assert!(!event.bubbles);
        assert_eq!(event.detail::<Payload>(), Some(&Payload { counter: 3 }));
        assert_eq!(event.detail::<String>(), None);
    }

    #[test]
    fn test_click_defaults() {
        let mut event = Event::click();
        assert!(event.bubbles && event.composed && event.cancelable);
        event.prevent_default();
        assert!(event.is_default_prevented());

        let mut plain = Event::new("ping");
        plain.prevent_default();
        assert!(!plain.is_default_prevented());
    }

    #[test]
    fn test_listener_map() {
        let mut map = ListenerMap::default();
        let node = NodeId(3);
        let a = map.add(node, "click", ListenerKind::Element { owner: node });
        let b = map.add(node, "click", ListenerKind::Callback(Box::new(|_| {})));
        map.add(node, "increased", ListenerKind::Element { owner: node });

        assert_eq!(map.ids_for(node, "click"), vec![a, b]);
        assert_eq!(map.count(node), 3);
        assert!(map.remove(a));
        assert!(!map.remove(a));
        assert_eq!(map.ids_for(node, "click"), vec![b]);
        assert!(map.get_mut(node, b).is_some());
    }
}
