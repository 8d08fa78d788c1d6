//! Reflecting counter elements
//!
//! `<my-vanilla-counter>` and `<my-vanilla-counter-with-template>` share one
//! implementation and differ only in how the static skeleton is produced:
//! built node by node, or cloned from a parsed `<template>`.
//!
//! ```text
//! #shadow-root
//!   div.container
//!     div#icon      click -> increment
//!       img[src]
//!     div#value     current count
//! ```

use std::marker::PhantomData;

use fos_dom::{
    CustomElement, CustomElementDefinition, Document, DomError, DomResult, ElementContext,
    Event, NodeId,
};

use crate::reflect::ReflectedProperty;
use crate::{ComponentConfig, Count};

/// Reflected attribute name
pub const COUNTER_ATTRIBUTE: &str = "counter";

/// Event emitted after every increment
pub const INCREASED_EVENT: &str = "increased";

/// Payload of the `increased` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncreasedDetail {
    pub counter: Count,
}

/// Nodes of a rendered skeleton the counter keeps hold of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonNodes {
    /// Increment control
    pub icon: NodeId,
    /// Display region
    pub display: NodeId,
}

/// Strategy producing the counter's static structure
pub trait Skeleton: 'static {
    /// Tag the counter is registered under
    const TAG: &'static str;

    /// Build the structure under `root`
    fn render(ctx: &mut ElementContext<'_>, root: NodeId, logo_src: &str) -> DomResult<SkeletonNodes>;
}

/// Skeleton built with `create_element` calls
#[derive(Debug)]
pub struct Constructed;

impl Skeleton for Constructed {
    const TAG: &'static str = "my-vanilla-counter";

    fn render(ctx: &mut ElementContext<'_>, root: NodeId, logo_src: &str) -> DomResult<SkeletonNodes> {
        let container = ctx.create_element("div")?;
        ctx.set_attribute(container, "class", "container")?;

        let icon = ctx.create_element("div")?;
        ctx.set_attribute(icon, "id", "icon")?;
        let logo = ctx.create_element("img")?;
        ctx.set_attribute(logo, "src", logo_src)?;
        ctx.append_child(icon, logo)?;
        ctx.append_child(container, icon)?;

        let display = ctx.create_element("div")?;
        ctx.set_attribute(display, "id", "value")?;
        ctx.append_child(container, display)?;

        ctx.append_child(root, container)?;
        Ok(SkeletonNodes { icon, display })
    }
}

/// Skeleton cloned from a `<template>`
#[derive(Debug)]
pub struct Templated;

impl Templated {
    fn markup(logo_src: &str) -> String {
        let src = logo_src.replace('&', "&amp;").replace('"', "&quot;");
        format!(
            r#"<div class="container">
                <div id="icon"><img src="{src}"></div>
                <div id="value"></div>
            </div>"#
        )
    }
}

impl Skeleton for Templated {
    const TAG: &'static str = "my-vanilla-counter-with-template";

    fn render(ctx: &mut ElementContext<'_>, root: NodeId, logo_src: &str) -> DomResult<SkeletonNodes> {
        let template = ctx.create_element("template")?;
        fos_html::set_inner_html(ctx, template, &Self::markup(logo_src))?;

        let content = ctx.tree_mut().clone_template_content(template)?;
        ctx.append_child(root, content)?;

        let tree = ctx.tree();
        let icon = tree.get_element_by_id(root, "icon")
            .ok_or_else(|| DomError::missing_part(Self::TAG, "icon"))?;
        let display = tree.get_element_by_id(root, "value")
            .ok_or_else(|| DomError::missing_part(Self::TAG, "value"))?;
        Ok(SkeletonNodes { icon, display })
    }
}

/// Operations every counter element offers
pub trait CounterElement: CustomElement {
    /// Current value
    fn counter(&self) -> Count;

    /// Set the value, reflecting it into the attribute and display.
    /// Returns whether it changed.
    fn set_counter(&mut self, ctx: &mut ElementContext<'_>, value: Count) -> DomResult<bool>;

    /// Add one and emit `increased`
    fn increment(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()>;
}

/// Attribute-reflecting, event-emitting counter
pub struct ReflectingCounter<S> {
    counter: ReflectedProperty<Count>,
    shadow: NodeId,
    /// Set once the skeleton exists
    rendered: Option<SkeletonNodes>,
    logo_src: String,
    bubbles: bool,
    _skeleton: PhantomData<fn() -> S>,
}

/// `<my-vanilla-counter>`
pub type VanillaCounter = ReflectingCounter<Constructed>;

/// `<my-vanilla-counter-with-template>`
pub type TemplatedCounter = ReflectingCounter<Templated>;

impl<S: Skeleton> ReflectingCounter<S> {
    /// Definition registering this counter under `S::TAG`
    pub fn definition(config: &ComponentConfig) -> CustomElementDefinition {
        let config = config.clone();
        let logo_src = config.assets().logo();
        CustomElementDefinition::new(S::TAG, move |ctx| Self::construct(ctx, &config, &logo_src))
            .observed_attributes([COUNTER_ATTRIBUTE])
    }

    fn construct(ctx: &mut ElementContext<'_>, config: &ComponentConfig, logo_src: &str) -> DomResult<Self> {
        let shadow = ctx.attach_shadow(config.shadow_init())?;
        Ok(Self {
            counter: ReflectedProperty::new(COUNTER_ATTRIBUTE, Count::ZERO),
            shadow,
            rendered: None,
            logo_src: logo_src.to_string(),
            bubbles: config.bubbling_events,
            _skeleton: PhantomData,
        })
    }

    /// Whether the skeleton has been rendered
    pub fn is_rendered(&self) -> bool {
        self.rendered.is_some()
    }

    /// Rendered skeleton nodes
    pub fn skeleton(&self) -> Option<SkeletonNodes> {
        self.rendered
    }

    fn render(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        if self.rendered.is_some() {
            return Ok(());
        }
        let nodes = S::render(ctx, self.shadow, &self.logo_src)?;
        ctx.listen(nodes.icon, "click");
        self.rendered = Some(nodes);
        tracing::debug!("Rendered <{}> skeleton into {}", S::TAG, self.shadow);
        Ok(())
    }

    fn display(&self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        match self.rendered {
            Some(nodes) => ctx.replace_text(nodes.display, &self.counter.get().to_string()),
            None => Ok(()),
        }
    }
}

impl<S: Skeleton> CounterElement for ReflectingCounter<S> {
    fn counter(&self) -> Count {
        self.counter.get()
    }

    fn set_counter(&mut self, ctx: &mut ElementContext<'_>, value: Count) -> DomResult<bool> {
        let changed = self.counter.set_if_changed(ctx, value)?;
        if changed {
            self.display(ctx)?;
        }
        Ok(changed)
    }

    fn increment(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        let next = self.counter.get().incremented();
        self.set_counter(ctx, next)?;
        let detail = IncreasedDetail { counter: self.counter.get() };
        ctx.emit(Event::custom(INCREASED_EVENT, detail).bubbles(self.bubbles));
        Ok(())
    }
}

impl<S: Skeleton> CustomElement for ReflectingCounter<S> {
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        self.render(ctx)?;
        self.display(ctx)
    }

    fn disconnected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        tracing::debug!("<{}> {} disconnected at {}", S::TAG, ctx.element(), self.counter.get());
        Ok(())
    }

    fn attribute_changed_callback(
        &mut self,
        ctx: &mut ElementContext<'_>,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> DomResult<()> {
        if name != COUNTER_ATTRIBUTE {
            return Ok(());
        }
        if self.counter.attribute_changed(ctx, old_value, new_value)? {
            self.display(ctx)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut ElementContext<'_>, event: &mut Event) -> DomResult<()> {
        if event.is("click") {
            self.increment(ctx)?;
        }
        Ok(())
    }
}

// --- Document-level helpers ---

/// Current value of the counter element at `node`
pub fn counter_value<E: CounterElement>(doc: &Document, node: NodeId) -> Option<Count> {
    doc.element::<E>(node).map(CounterElement::counter)
}

/// Set the value of the counter element at `node`, as a property write
pub fn set_counter<E: CounterElement>(doc: &mut Document, node: NodeId, value: Count) -> DomResult<bool> {
    doc.with_element::<E, _>(node, |counter, ctx| counter.set_counter(ctx, value))?
}

/// Run the increment operation of the counter element at `node`
pub fn increment<E: CounterElement>(doc: &mut Document, node: NodeId) -> DomResult<()> {
    doc.with_element::<E, _>(node, |counter, ctx| counter.increment(ctx))?
}
