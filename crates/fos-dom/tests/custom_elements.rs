//! Custom element host tests
//!
//! Definitions, upgrades, the reaction queue, adoption and event dispatch
//! across shadow boundaries.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{
    CustomElement, CustomElementDefinition, CustomElementState, DispatchOutcome, Document,
    DomError, DomResult, ElementContext, Event, EventPhase, NodeId, ShadowRootInit,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Records every callback it receives
struct Recorder {
    log: Log,
    /// Attribute written back from `connected_callback`
    stamp_on_connect: bool,
}

impl Recorder {
    fn push(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl CustomElement for Recorder {
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        self.push("connected:start".to_string());
        if self.stamp_on_connect {
            ctx.set_host_attribute("counter", "7")?;
        }
        self.push("connected:end".to_string());
        Ok(())
    }

    fn disconnected_callback(&mut self, _ctx: &mut ElementContext<'_>) -> DomResult<()> {
        self.push("disconnected".to_string());
        Ok(())
    }

    fn adopted_callback(&mut self, _ctx: &mut ElementContext<'_>) -> DomResult<()> {
        self.push("adopted".to_string());
        Ok(())
    }

    fn attribute_changed_callback(
        &mut self,
        _ctx: &mut ElementContext<'_>,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> DomResult<()> {
        self.push(format!("{name}:{:?}->{:?}", old_value, new_value));
        Ok(())
    }
}

fn define_recorder(doc: &mut Document, name: &str, stamp_on_connect: bool) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let shared = Rc::clone(&log);
    doc.define(
        CustomElementDefinition::new(name, move |_| {
            shared.borrow_mut().push("constructed".to_string());
            Ok(Recorder { log: Rc::clone(&shared), stamp_on_connect })
        })
        .observed_attributes(["counter"]),
    )
    .unwrap();
    log
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

// ============================================================================
// DEFINITIONS AND UPGRADES
// ============================================================================

#[test]
fn test_duplicate_definition_fails() {
    let mut doc = Document::default();
    define_recorder(&mut doc, "x-rec", false);

    let again = CustomElementDefinition::new("x-rec", |_| {
        Ok(Recorder { log: Rc::default(), stamp_on_connect: false })
    });
    assert_eq!(doc.define(again), Err(DomError::AlreadyDefined("x-rec".to_string())));
}

#[test]
fn test_invalid_name_fails() {
    let mut doc = Document::default();
    let definition = CustomElementDefinition::new("counter", |_| {
        Ok(Recorder { log: Rc::default(), stamp_on_connect: false })
    });
    assert_eq!(doc.define(definition), Err(DomError::InvalidName("counter".to_string())));
}

#[test]
fn test_create_defined_element_constructs_synchronously() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);

    let el = doc.create_element("x-rec").unwrap();
    assert_eq!(entries(&log), vec!["constructed"]);
    assert_eq!(doc.custom_element_state(el), Some(CustomElementState::Custom));
    assert!(doc.element::<Recorder>(el).is_some());

    let body = doc.body();
    doc.append_child(body, el).unwrap();
    assert_eq!(entries(&log), vec!["constructed", "connected:start", "connected:end"]);
}

#[test]
fn test_upgrade_of_existing_elements() {
    let mut doc = Document::default();
    let el = doc.create_element("x-rec").unwrap();
    doc.set_attribute(el, "counter", "3").unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();
    assert_eq!(doc.custom_element_state(el), Some(CustomElementState::Undefined));

    let log = define_recorder(&mut doc, "x-rec", false);
    assert_eq!(
        entries(&log),
        vec![
            "constructed",
            "counter:None->Some(\"3\")",
            "connected:start",
            "connected:end",
        ]
    );
    assert_eq!(doc.custom_element_state(el), Some(CustomElementState::Custom));
}

#[test]
fn test_detached_elements_are_not_upgraded_on_define() {
    let mut doc = Document::default();
    let el = doc.create_element("x-rec").unwrap();

    let log = define_recorder(&mut doc, "x-rec", false);
    assert!(entries(&log).is_empty());
    assert_eq!(doc.custom_element_state(el), Some(CustomElementState::Undefined));

    let body = doc.body();
    doc.append_child(body, el).unwrap();
    assert_eq!(entries(&log), vec!["constructed", "connected:start", "connected:end"]);
}

#[test]
fn test_failed_constructor() {
    let mut doc = Document::default();
    doc.define(CustomElementDefinition::new("x-broken", |_| -> DomResult<Recorder> {
        Err(DomError::construction("x-broken", "no shadow"))
    }))
    .unwrap();

    let err = doc.create_element("x-broken").unwrap_err();
    assert!(matches!(err, DomError::Construction { .. }));

    let body = doc.body();
    let pending = doc.tree_mut().create_element("x-broken");
    doc.append_child(body, pending).unwrap();
    assert_eq!(doc.custom_element_state(pending), Some(CustomElementState::Failed));
}

#[test]
fn test_cloned_custom_element_is_upgraded() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);
    let el = doc.create_element("x-rec").unwrap();

    let copy = doc.clone_node(el, true).unwrap();
    assert_ne!(copy, el);
    assert_eq!(doc.custom_element_state(copy), Some(CustomElementState::Custom));
    assert_eq!(entries(&log), vec!["constructed", "constructed"]);
}

// ============================================================================
// REACTIONS
// ============================================================================

#[test]
fn test_attribute_reactions_fire_on_every_write() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);
    let el = doc.create_element("x-rec").unwrap();

    doc.set_attribute(el, "counter", "1").unwrap();
    doc.set_attribute(el, "counter", "1").unwrap();
    doc.set_attribute(el, "title", "ignored").unwrap();
    doc.remove_attribute(el, "counter").unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "constructed",
            "counter:None->Some(\"1\")",
            "counter:Some(\"1\")->Some(\"1\")",
            "counter:Some(\"1\")->None",
        ]
    );
}

#[test]
fn test_reaction_from_callback_runs_after_it_returns() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", true);
    let el = doc.create_element("x-rec").unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "constructed",
            "connected:start",
            "connected:end",
            "counter:None->Some(\"7\")",
        ]
    );
    assert!(!doc.has_pending_reactions());
}

#[test]
fn test_disconnect_and_reconnect() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);
    let el = doc.create_element("x-rec").unwrap();
    let body = doc.body();

    doc.append_child(body, el).unwrap();
    doc.remove(el).unwrap();
    doc.append_child(body, el).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "constructed",
            "connected:start",
            "connected:end",
            "disconnected",
            "connected:start",
            "connected:end",
        ]
    );
}

#[test]
fn test_moving_connected_element_disconnects_first() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);
    let el = doc.create_element("x-rec").unwrap();
    let body = doc.body();
    let div = doc.create_element("div").unwrap();
    doc.append_child(body, div).unwrap();
    doc.append_child(body, el).unwrap();
    log.borrow_mut().clear();

    doc.append_child(div, el).unwrap();
    assert_eq!(entries(&log), vec!["disconnected", "connected:start", "connected:end"]);
    assert_eq!(doc.tree().parent(el), Some(div));
}

#[test]
fn test_release_disconnects_then_drops_instances() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);
    let body = doc.body();
    let wrapper = doc.create_element("div").unwrap();
    let outer = doc.create_element("x-rec").unwrap();
    let inner = doc.create_element("x-rec").unwrap();
    doc.append_child(wrapper, outer).unwrap();
    let shadow = doc.attach_shadow(outer, ShadowRootInit::open()).unwrap();
    doc.append_child(shadow, inner).unwrap();
    doc.append_child(body, wrapper).unwrap();
    doc.add_event_listener(inner, "click", |_| {});
    log.borrow_mut().clear();

    doc.release(wrapper).unwrap();

    assert_eq!(entries(&log), vec!["disconnected", "disconnected"]);
    assert!(doc.element::<Recorder>(outer).is_none());
    assert!(doc.element::<Recorder>(inner).is_none());
    assert_eq!(doc.listener_count(inner), 0);
    assert!(!doc.has_pending_reactions());

    // Released nodes stay inert when reinserted
    doc.append_child(body, wrapper).unwrap();
    doc.set_attribute(outer, "counter", "1").unwrap();
    assert_eq!(entries(&log), vec!["disconnected", "disconnected"]);
}

#[test]
fn test_adoption_fires_adopted_after_disconnected() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);
    let el = doc.create_element("x-rec").unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();
    log.borrow_mut().clear();

    let other = doc.create_document();
    doc.adopt_node(el, other).unwrap();

    assert_eq!(entries(&log), vec!["disconnected", "adopted"]);
    assert_eq!(doc.tree().owner_document(el), Some(other));
    assert!(!doc.tree().is_connected(el));
}

#[test]
fn test_adopt_into_same_document_is_silent() {
    let mut doc = Document::default();
    let log = define_recorder(&mut doc, "x-rec", false);
    let el = doc.create_element("x-rec").unwrap();
    log.borrow_mut().clear();

    let root = doc.root();
    doc.adopt_node(el, root).unwrap();
    assert!(entries(&log).is_empty());
}

#[test]
fn test_element_busy_during_own_callback() {
    struct Reentrant {
        seen: Option<DomError>,
    }

    impl CustomElement for Reentrant {
        fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
            let me = ctx.element();
            self.seen = ctx.with_element::<Reentrant, _>(me, |_, _| ()).err();
            Ok(())
        }
    }

    let mut doc = Document::default();
    doc.define(CustomElementDefinition::new("x-reentrant", |_| Ok(Reentrant { seen: None }))).unwrap();
    let el = doc.create_element("x-reentrant").unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();

    let seen = doc.element::<Reentrant>(el).and_then(|r| r.seen.clone());
    assert_eq!(seen, Some(DomError::ElementBusy(el)));
    assert_eq!(
        doc.with_element::<Recorder, _>(el, |_, _| ()),
        Err(DomError::WrongElementType(el))
    );
}

// ============================================================================
// EVENTS
// ============================================================================

fn host_with_button(doc: &mut Document, init: ShadowRootInit) -> (NodeId, NodeId, NodeId) {
    let host = doc.create_element("x-host").unwrap();
    let body = doc.body();
    doc.append_child(body, host).unwrap();
    let shadow = doc.attach_shadow(host, init).unwrap();
    let button = doc.create_element("button").unwrap();
    doc.append_child(shadow, button).unwrap();
    (host, shadow, button)
}

#[test]
fn test_composed_click_is_retargeted_to_host() {
    let mut doc = Document::default();
    let (host, shadow, button) = host_with_button(&mut doc, ShadowRootInit::open());

    let seen: Rc<RefCell<Vec<(NodeId, NodeId)>>> = Rc::default();
    for node in [shadow, doc.body()] {
        let seen = Rc::clone(&seen);
        doc.add_event_listener(node, "click", move |event| {
            seen.borrow_mut().push((event.current_target.unwrap_or(NodeId::NONE), event.target));
        });
    }

    let outcome = doc.click(button);
    assert_eq!(outcome, DispatchOutcome::Delivered { canceled: false });
    assert_eq!(*seen.borrow(), vec![(shadow, button), (doc.body(), host)]);
}

#[test]
fn test_uncomposed_event_stays_in_shadow_tree() {
    let mut doc = Document::default();
    let (host, _shadow, button) = host_with_button(&mut doc, ShadowRootInit::closed());

    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    doc.add_event_listener(host, "ping", move |_| *counter.borrow_mut() += 1);

    doc.dispatch_event(button, Event::new("ping").bubbles(true));
    assert_eq!(*hits.borrow(), 0);

    doc.dispatch_event(button, Event::new("ping").bubbles(true).composed(true));
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn test_non_bubbling_event_reaches_target_only() {
    let mut doc = Document::default();
    let div = doc.create_element("div").unwrap();
    let body = doc.body();
    doc.append_child(body, div).unwrap();

    let phases: Rc<RefCell<Vec<EventPhase>>> = Rc::default();
    for node in [div, body] {
        let phases = Rc::clone(&phases);
        doc.add_event_listener(node, "increased", move |event| phases.borrow_mut().push(event.phase));
    }

    doc.dispatch_event(div, Event::custom("increased", 1_i64));
    assert_eq!(*phases.borrow(), vec![EventPhase::AtTarget]);
}

#[test]
fn test_stop_propagation_and_prevent_default() {
    let mut doc = Document::default();
    let div = doc.create_element("div").unwrap();
    let body = doc.body();
    doc.append_child(body, div).unwrap();

    doc.add_event_listener(div, "click", |event| {
        event.prevent_default();
        event.stop_propagation();
    });
    let reached_body = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&reached_body);
    doc.add_event_listener(body, "click", move |_| *flag.borrow_mut() = true);

    assert_eq!(doc.click(div), DispatchOutcome::Delivered { canceled: true });
    assert!(!*reached_body.borrow());
}

/// Emits a "pinged" event whenever it handles a click
struct Echo;

impl CustomElement for Echo {
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        let me = ctx.element();
        ctx.listen(me, "click");
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut ElementContext<'_>, event: &mut Event) -> DomResult<()> {
        if event.is("click") {
            let outcome = ctx.emit(Event::custom("pinged", "echo".to_string()));
            assert_eq!(outcome, DispatchOutcome::Queued);
        }
        Ok(())
    }
}

#[test]
fn test_event_emitted_from_handler_is_queued() {
    let mut doc = Document::default();
    doc.define(CustomElementDefinition::new("x-echo", |_| Ok(Echo))).unwrap();
    let el = doc.create_element("x-echo").unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();

    let order: Rc<RefCell<Vec<String>>> = Rc::default();
    let on_click = Rc::clone(&order);
    doc.add_event_listener(el, "click", move |_| on_click.borrow_mut().push("click".to_string()));
    let on_ping = Rc::clone(&order);
    doc.add_event_listener(el, "pinged", move |event| {
        let detail = event.detail::<String>().cloned().unwrap_or_default();
        on_ping.borrow_mut().push(format!("pinged:{detail}"));
    });

    doc.click(el);
    assert_eq!(*order.borrow(), vec!["click", "pinged:echo"]);
}
