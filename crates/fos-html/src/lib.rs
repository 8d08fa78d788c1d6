//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever, converting into `fos-dom` nodes.
//! Components use it to build their shadow trees from markup.

mod parser;

pub use parser::{HtmlParser, ParseMode};
pub use fos_dom::Document;

use fos_dom::{DomResult, NodeId};

/// Parse an HTML string into a new document
pub fn parse(html: &str) -> DomResult<Document> {
    HtmlParser::new().parse(html)
}

/// Parse a fragment and append it to `parent`
pub fn parse_into(doc: &mut Document, parent: NodeId, html: &str, mode: ParseMode) -> DomResult<Vec<NodeId>> {
    HtmlParser::new().parse_into(doc, parent, html, mode)
}

/// Replace the children of `node` with parsed markup.
///
/// For a `<template>` the markup becomes its content.
pub fn set_inner_html(doc: &mut Document, node: NodeId, html: &str) -> DomResult<()> {
    if let Some(content) = doc.tree().template_content(node) {
        doc.tree_mut().remove_children(content);
        parse_into(doc, content, html, ParseMode::Inert)?;
        return Ok(());
    }
    doc.remove_children(node)?;
    parse_into(doc, node, html, ParseMode::Live)?;
    Ok(())
}
