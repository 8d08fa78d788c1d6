//! Hello-world family tests

use fos_components::{
    define_all, ComponentConfig, HelloLifecycleCallbacks, HelloWithShadowDom, HelloWithTemplate,
    HelloWorld,
};
use fos_dom::{Document, LifecycleCallback, NodeId};
use fos_html::{parse_into, ParseMode};

fn document() -> Document {
    let mut doc = Document::default();
    define_all(&mut doc, &ComponentConfig::default()).unwrap();
    doc
}

fn mount_markup(doc: &mut Document, html: &str) -> NodeId {
    let body = doc.body();
    let nodes = parse_into(doc, body, html, ParseMode::Live).unwrap();
    nodes[0]
}

// ============================================================================
// LIGHT DOM AND SHADOW DOM
// ============================================================================

#[test]
fn test_hello_world_renders_light_dom() {
    let mut doc = document();
    let el = mount_markup(&mut doc, "<hello-world>placeholder</hello-world>");

    assert_eq!(doc.inner_html(el), "<p>Hello World!</p>");
}

#[test]
fn test_hello_world_rerender_replaces_content() {
    let mut doc = document();
    let el = mount_markup(&mut doc, "<hello-world></hello-world>");
    doc.remove(el).unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();

    assert_eq!(doc.inner_html(el), "<p>Hello World!</p>");
    assert_eq!(HelloWorld::TAG, "hello-world");
}

#[test]
fn test_hello_with_shadowdom() {
    let mut doc = document();
    let el = doc.create_element(HelloWithShadowDom::TAG).unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();

    let shadow = doc.shadow_root(el).unwrap();
    assert_eq!(doc.inner_html(shadow), "<p>Hello World from inside the ShadowDOM!</p>");
    assert_eq!(doc.inner_html(el), "");

    doc.remove(el).unwrap();
    doc.append_child(body, el).unwrap();
    assert_eq!(doc.tree().child_ids(shadow).len(), 1);
}

// ============================================================================
// TEMPLATES AND SLOTS
// ============================================================================

#[test]
fn test_hello_with_template_distributes_slot() {
    let mut doc = document();
    let el = mount_markup(&mut doc, "<hello-with-template>fOS</hello-with-template>");

    let shadow = doc.shadow_root(el).unwrap();
    assert_eq!(doc.inner_html(shadow), "<p>Hello <slot></slot> with templates!</p>");

    let slot = doc.tree().elements_by_tag_name(shadow, "slot")[0];
    assert_eq!(doc.tree().assigned_nodes(slot).len(), 1);
    assert_eq!(doc.tree().flat_text_content(el), "Hello fOS with templates!");
}

#[test]
fn test_hello_with_template_renders_once() {
    let mut doc = document();
    let el = mount_markup(&mut doc, "<hello-with-template>x</hello-with-template>");
    doc.remove(el).unwrap();
    let body = doc.body();
    doc.append_child(body, el).unwrap();

    let shadow = doc.shadow_root(el).unwrap();
    assert_eq!(doc.tree().child_ids(shadow).len(), 1);
    assert!(doc.element::<HelloWithTemplate>(el).is_some());
}

// ============================================================================
// LIFECYCLE CALLBACKS
// ============================================================================

fn calls(doc: &Document, el: NodeId) -> Vec<LifecycleCallback> {
    doc.element::<HelloLifecycleCallbacks>(el)
        .map(|e| e.calls().to_vec())
        .unwrap_or_default()
}

#[test]
fn test_lifecycle_order_for_parsed_element() {
    let mut doc = document();
    let el = mount_markup(&mut doc, r#"<hello-lifecycle-callbacks hello="world"></hello-lifecycle-callbacks>"#);

    assert_eq!(
        calls(&doc, el),
        vec![LifecycleCallback::AttributeChanged, LifecycleCallback::Connected]
    );
    assert_eq!(doc.inner_html(el), "<p>Hello world</p>");
}

#[test]
fn test_lifecycle_attribute_content_is_markup() {
    let mut doc = document();
    let el = mount_markup(&mut doc, "<hello-lifecycle-callbacks></hello-lifecycle-callbacks>");

    doc.set_attribute(el, "hello", "<b>you</b>").unwrap();
    assert_eq!(doc.inner_html(el), "<p>Hello <b>you</b></p>");

    doc.set_attribute(el, "hello", "again").unwrap();
    assert_eq!(doc.inner_html(el), "<p>Hello again</p>");
}

#[test]
fn test_lifecycle_full_sequence() {
    let mut doc = document();
    let el = mount_markup(&mut doc, "<hello-lifecycle-callbacks></hello-lifecycle-callbacks>");
    doc.set_attribute(el, "hello", "again").unwrap();
    doc.set_attribute(el, "title", "not observed").unwrap();

    let other = doc.create_document();
    doc.adopt_node(el, other).unwrap();

    assert_eq!(
        calls(&doc, el),
        vec![
            LifecycleCallback::Connected,
            LifecycleCallback::AttributeChanged,
            LifecycleCallback::Disconnected,
            LifecycleCallback::Adopted,
        ]
    );
}
