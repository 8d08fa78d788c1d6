//! fOS Showcase - Main Entry Point
//!
//! Registers every component, loads the demo page, clicks each counter,
//! changes one counter from outside and prints the resulting tree.

use anyhow::Context;
use fos_components::{define_all, ComponentConfig, IncreasedDetail, INCREASED_EVENT};
use fos_dom::{Document, NodeId};
use fos_html::{parse_into, ParseMode};
use tracing_subscriber::EnvFilter;

const DEMO_PAGE: &str = r#"
<h1>fOS web components</h1>
<hello-world></hello-world>
<hello-with-shadowdom></hello-with-shadowdom>
<hello-with-template>fOS</hello-with-template>
<hello-lifecycle-callbacks hello="world"></hello-lifecycle-callbacks>
<my-vanilla-counter id="vanilla"></my-vanilla-counter>
<my-vanilla-counter-with-template id="templated" counter="10"></my-vanilla-counter-with-template>
<my-declarative-counter id="declarative"></my-declarative-counter>
"#;

const COUNTERS: &[&str] = &["vanilla", "templated", "declarative"];

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Asset base: first argument, then FOS_ASSET_BASE
    let mut config = ComponentConfig::from_env();
    if let Some(base) = std::env::args().nth(1) {
        config = config.with_asset_base(base);
    }
    tracing::info!("Starting fOS showcase (asset base: {:?})", config.asset_base);

    let mut doc = Document::new("fos://showcase");
    define_all(&mut doc, &config).context("registering components")?;

    let body = doc.body();
    parse_into(&mut doc, body, DEMO_PAGE, ParseMode::Live).context("loading demo page")?;

    for &id in COUNTERS {
        let counter = doc.get_element_by_id(id)
            .with_context(|| format!("demo page has no #{id}"))?;
        watch_increased(&mut doc, counter, id);

        for _ in 0..3 {
            click_icon(&mut doc, counter)?;
        }
    }

    let vanilla = doc.get_element_by_id("vanilla").context("demo page has no #vanilla")?;
    doc.set_attribute(vanilla, "counter", "42")?;
    tracing::info!("Set #vanilla counter=\"42\" from outside");

    println!("{}", doc.outer_html(doc.document_element()));
    Ok(())
}

fn watch_increased(doc: &mut Document, counter: NodeId, id: &'static str) {
    doc.add_event_listener(counter, INCREASED_EVENT, move |event| {
        if let Some(detail) = event.detail::<IncreasedDetail>() {
            tracing::info!("#{} increased to {}", id, detail.counter);
        }
    });
}

fn click_icon(doc: &mut Document, counter: NodeId) -> anyhow::Result<()> {
    let shadow = doc.shadow_root(counter).context("counter has no open shadow root")?;
    let icon = doc.tree()
        .get_element_by_id(shadow, "icon")
        .context("counter skeleton has no #icon")?;
    doc.click(icon);
    Ok(())
}
