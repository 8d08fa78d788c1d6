//! fOS Components
//!
//! Web components built on the fOS DOM host, from a plain hello-world
//! element up to the attribute-reflecting counter in three renderings:
//! constructed DOM, cloned template and a declarative view.

mod assets;
mod config;
mod value;

pub mod counter;
pub mod declarative;
pub mod hello;
pub mod reflect;
pub mod view;

pub use assets::{AssetResolver, LOGO_PATH};
pub use config::{ComponentConfig, ASSET_BASE_ENV, EVENTS_BUBBLE_ENV};
pub use counter::{
    CounterElement, IncreasedDetail, ReflectingCounter, TemplatedCounter, VanillaCounter,
    COUNTER_ATTRIBUTE, INCREASED_EVENT,
};
pub use declarative::DeclarativeCounter;
pub use hello::{HelloLifecycleCallbacks, HelloWithShadowDom, HelloWithTemplate, HelloWorld};
pub use value::Count;

use fos_dom::{CustomElementDefinition, Document, DomResult};

/// Every component definition, in registration order
pub fn definitions(config: &ComponentConfig) -> Vec<CustomElementDefinition> {
    vec![
        HelloWorld::definition(),
        HelloWithShadowDom::definition(),
        HelloWithTemplate::definition(),
        HelloLifecycleCallbacks::definition(),
        VanillaCounter::definition(config),
        TemplatedCounter::definition(config),
        DeclarativeCounter::definition(config),
    ]
}

/// Register every component with the document
pub fn define_all(doc: &mut Document, config: &ComponentConfig) -> DomResult<()> {
    for definition in definitions(config) {
        doc.define(definition)?;
    }
    tracing::debug!("Registered {} components", doc.registry().len());
    Ok(())
}
