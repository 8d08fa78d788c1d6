//! Hello-world elements
//!
//! The first steps of the tutorial: light DOM rendering, shadow DOM,
//! templates with slots, and the lifecycle callbacks themselves.

use fos_dom::{
    CustomElement, CustomElementDefinition, DomResult, ElementContext, LifecycleCallback, NodeId,
    ShadowRootInit,
};
use fos_html::set_inner_html;

/// `<hello-world>`: renders into its light DOM
#[derive(Debug)]
pub struct HelloWorld {
    msg: &'static str,
}

impl HelloWorld {
    pub const TAG: &'static str = "hello-world";

    pub fn definition() -> CustomElementDefinition {
        CustomElementDefinition::new(Self::TAG, |_| Ok(Self { msg: "Hello World!" }))
    }
}

impl CustomElement for HelloWorld {
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        let me = ctx.element();
        set_inner_html(ctx, me, &format!("<p>{}</p>", self.msg))
    }
}

/// `<hello-with-shadowdom>`: renders into an open shadow root
#[derive(Debug)]
pub struct HelloWithShadowDom {
    msg: &'static str,
    shadow: NodeId,
    rendered: bool,
}

impl HelloWithShadowDom {
    pub const TAG: &'static str = "hello-with-shadowdom";

    pub fn definition() -> CustomElementDefinition {
        CustomElementDefinition::new(Self::TAG, |ctx| {
            let shadow = ctx.attach_shadow(ShadowRootInit::open())?;
            Ok(Self {
                msg: "Hello World from inside the ShadowDOM!",
                shadow,
                rendered: false,
            })
        })
    }
}

impl CustomElement for HelloWithShadowDom {
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        if !self.rendered {
            set_inner_html(ctx, self.shadow, &format!("<p>{}</p>", self.msg))?;
            self.rendered = true;
        }
        Ok(())
    }
}

/// `<hello-with-template>`: clones a template with a default slot
#[derive(Debug)]
pub struct HelloWithTemplate {
    template: NodeId,
    shadow: NodeId,
    rendered: bool,
}

impl HelloWithTemplate {
    pub const TAG: &'static str = "hello-with-template";

    const MARKUP: &'static str = "<p>Hello <slot></slot> with templates!</p>";

    pub fn definition() -> CustomElementDefinition {
        CustomElementDefinition::new(Self::TAG, |ctx| {
            let template = ctx.create_element("template")?;
            set_inner_html(ctx, template, Self::MARKUP)?;
            let shadow = ctx.attach_shadow(ShadowRootInit::open())?;
            Ok(Self { template, shadow, rendered: false })
        })
    }
}

impl CustomElement for HelloWithTemplate {
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        if self.rendered {
            return Ok(());
        }
        let content = ctx.tree_mut().clone_template_content(self.template)?;
        ctx.append_child(self.shadow, content)?;
        self.rendered = true;
        Ok(())
    }
}

/// `<hello-lifecycle-callbacks>`: logs every callback it receives
#[derive(Debug, Default)]
pub struct HelloLifecycleCallbacks {
    calls: Vec<LifecycleCallback>,
}

impl HelloLifecycleCallbacks {
    pub const TAG: &'static str = "hello-lifecycle-callbacks";

    /// Observed attribute
    pub const HELLO_ATTRIBUTE: &'static str = "hello";

    pub fn definition() -> CustomElementDefinition {
        CustomElementDefinition::new(Self::TAG, |ctx| {
            tracing::info!("Hello from HelloLifecycleCallbacks constructor ({})", ctx.element());
            Ok(Self::default())
        })
        .observed_attributes([Self::HELLO_ATTRIBUTE])
    }

    /// Callbacks received so far, in order
    pub fn calls(&self) -> &[LifecycleCallback] {
        &self.calls
    }
}

impl CustomElement for HelloLifecycleCallbacks {
    fn connected_callback(&mut self, _ctx: &mut ElementContext<'_>) -> DomResult<()> {
        tracing::info!("Hello from HelloLifecycleCallbacks connected_callback()");
        self.calls.push(LifecycleCallback::Connected);
        Ok(())
    }

    fn disconnected_callback(&mut self, _ctx: &mut ElementContext<'_>) -> DomResult<()> {
        tracing::info!("Hello from HelloLifecycleCallbacks disconnected_callback()");
        self.calls.push(LifecycleCallback::Disconnected);
        Ok(())
    }

    fn adopted_callback(&mut self, _ctx: &mut ElementContext<'_>) -> DomResult<()> {
        tracing::info!("Hello from HelloLifecycleCallbacks adopted_callback()");
        self.calls.push(LifecycleCallback::Adopted);
        Ok(())
    }

    fn attribute_changed_callback(
        &mut self,
        ctx: &mut ElementContext<'_>,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> DomResult<()> {
        tracing::info!(
            "Hello from HelloLifecycleCallbacks attribute_changed_callback(). \
             Changed attribute: {}, old value: {:?}, new value: {:?}",
            name, old_value, new_value
        );
        self.calls.push(LifecycleCallback::AttributeChanged);

        let me = ctx.element();
        set_inner_html(ctx, me, &format!("<p>Hello {}</p>", new_value.unwrap_or_default()))
    }
}
