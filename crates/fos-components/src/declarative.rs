//! `<my-declarative-counter>`
//!
//! Same contract as the reflecting counters, rendered by a pure view
//! function and the [`Reconciler`] instead of hand-written DOM calls.

use fos_dom::{CustomElement, CustomElementDefinition, DomResult, ElementContext, Event, NodeId};

use crate::counter::{CounterElement, IncreasedDetail, COUNTER_ATTRIBUTE, INCREASED_EVENT};
use crate::reflect::ReflectedProperty;
use crate::view::{h, text, Reconciler, VNode};
use crate::{ComponentConfig, Count};

/// Id of the increment control in the view
const ICON_ID: &str = "icon";

/// Counter rendered from a view function
pub struct DeclarativeCounter {
    counter: ReflectedProperty<Count>,
    shadow: NodeId,
    view: Reconciler,
    logo_src: String,
    bubbles: bool,
}

impl DeclarativeCounter {
    pub const TAG: &'static str = "my-declarative-counter";

    pub fn definition(config: &ComponentConfig) -> CustomElementDefinition {
        let config = config.clone();
        let logo_src = config.assets().logo();
        CustomElementDefinition::new(Self::TAG, move |ctx| {
            let shadow = ctx.attach_shadow(config.shadow_init())?;
            Ok(Self {
                counter: ReflectedProperty::new(COUNTER_ATTRIBUTE, Count::ZERO),
                shadow,
                view: Reconciler::new(),
                logo_src: logo_src.clone(),
                bubbles: config.bubbling_events,
            })
        })
        .observed_attributes([COUNTER_ATTRIBUTE])
    }

    /// The view: same structure as the vanilla skeleton
    pub fn view(counter: Count, logo_src: &str) -> Vec<VNode> {
        vec![
            h("div")
                .attr("class", "container")
                .child(
                    h("div")
                        .attr("id", ICON_ID)
                        .on("click")
                        .child(h("img").attr("src", logo_src)),
                )
                .child(h("div").attr("id", "value").child(text(counter.to_string())))
                .into(),
        ]
    }

    /// Number of times the view has been reconciled
    pub fn renders(&self) -> usize {
        self.view.renders()
    }

    fn update(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        let view = Self::view(self.counter.get(), &self.logo_src);
        self.view.render(ctx, self.shadow, view)
    }
}

impl CounterElement for DeclarativeCounter {
    fn counter(&self) -> Count {
        self.counter.get()
    }

    fn set_counter(&mut self, ctx: &mut ElementContext<'_>, value: Count) -> DomResult<bool> {
        let changed = self.counter.set_if_changed(ctx, value)?;
        if changed && self.view.is_mounted() {
            self.update(ctx)?;
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

impl CustomElement for DeclarativeCounter {
    fn connected_callback(&mut self, ctx: &mut ElementContext<'_>) -> DomResult<()> {
        if !self.view.is_mounted() {
            self.update(ctx)?;
        }
        Ok(())
    }

    fn attribute_changed_callback(
        &mut self,
        ctx: &mut ElementContext<'_>,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> DomResult<()> {
        if name == COUNTER_ATTRIBUTE
            && self.counter.attribute_changed(ctx, old_value, new_value)?
            && self.view.is_mounted()
        {
            self.update(ctx)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut ElementContext<'_>, event: &mut Event) -> DomResult<()> {
        let on_icon = event.current_target
            .and_then(|node| ctx.get_attribute(node, "id"))
            == Some(ICON_ID);
        if event.is("click") && on_icon {
            self.increment(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_is_pure() {
        let a = DeclarativeCounter::view(Count::Value(3), "logo.png");
        let b = DeclarativeCounter::view(Count::Value(3), "logo.png");
        assert_eq!(a, b);
        assert_ne!(a, DeclarativeCounter::view(Count::Value(4), "logo.png"));
    }
}
