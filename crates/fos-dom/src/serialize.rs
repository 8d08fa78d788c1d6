//! HTML Serialization (innerHTML/outerHTML)
//!
//! Shadow roots are written as declarative `<template shadowrootmode>`
//! elements ahead of the host's light children, and template content is
//! written inside its `<template>`, so the output shows the full composed
//! structure of a component.

use crate::{DomTree, NodeData, NodeId};

/// Void elements (self-closing, no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

impl DomTree {
    /// Serialize the children of a node
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(self.content_or_self(id), &mut output);
        output
    }

    /// Serialize a node including itself
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(id, &mut output);
        output
    }

    /// Templates serialize their content in place of children
    fn content_or_self(&self, id: NodeId) -> NodeId {
        self.template_content(id).unwrap_or(id)
    }

    fn serialize_node(&self, id: NodeId, output: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };

        match &node.data {
            NodeData::Document | NodeData::DocumentFragment => {
                self.serialize_children(id, output);
            }
            NodeData::ShadowRoot(shadow) => {
                output.push_str("<template shadowrootmode=\"");
                output.push_str(shadow.mode.as_str());
                output.push_str("\">");
                self.serialize_children(id, output);
                output.push_str("</template>");
            }
            NodeData::Element(elem) => {
                let tag = elem.local_name.as_str();

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(&attr.name);
                    if !attr.value.is_empty() {
                        output.push_str("=\"");
                        escape_attribute(&attr.value, output);
                        output.push('"');
                    }
                }

                if VOID_ELEMENTS.contains(&tag) {
                    output.push_str(" />");
                    return;
                }
                output.push('>');

                if let Some(shadow) = elem.shadow_root {
                    self.serialize_node(shadow, output);
                }
                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    output.push_str(&self.text_content(id));
                } else {
                    self.serialize_children(self.content_or_self(id), output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => escape_text(text, output),
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, parent: NodeId, output: &mut String) {
        for child in self.children(parent) {
            self.serialize_node(child, output);
        }
    }
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShadowRootInit;

    #[test]
    fn test_escape_text() {
        let mut output = String::new();
        escape_text("Hello <world> & \"friends\"", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; \"friends\"");
    }

    #[test]
    fn test_escape_attribute() {
        let mut output = String::new();
        escape_attribute("Hello <world> & \"friends\"", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; &quot;friends&quot;");
    }

    #[test]
    fn test_serialize_element_tree() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.element_mut(div).unwrap().set_attr("class", "container");
        let img = tree.create_element("img");
        tree.element_mut(img).unwrap().set_attr("src", "logo.png");
        let text = tree.create_text("1 < 2");
        tree.append_child(div, img).unwrap();
        tree.append_child(div, text).unwrap();

        assert_eq!(
            tree.outer_html(div),
            "<div class=\"container\"><img src=\"logo.png\" />1 &lt; 2</div>"
        );
        assert_eq!(tree.inner_html(div), "<img src=\"logo.png\" />1 &lt; 2");
    }

    #[test]
    fn test_serialize_shadow_root_and_template() {
        let mut tree = DomTree::new();
        let host = tree.create_element("x-host");
        let shadow = tree.create_shadow_root(host, ShadowRootInit::open());
        let slot = tree.create_element("slot");
        tree.append_child(shadow, slot).unwrap();
        let light = tree.create_text("light");
        tree.append_child(host, light).unwrap();

        assert_eq!(
            tree.outer_html(host),
            "<x-host><template shadowrootmode=\"open\"><slot></slot></template>light</x-host>"
        );

        let template = tree.create_element("template");
        let content = tree.template_content(template).unwrap();
        let p = tree.create_element("p");
        tree.append_child(content, p).unwrap();
        assert_eq!(tree.outer_html(template), "<template><p></p></template>");
        assert_eq!(tree.inner_html(template), "<p></p>");
    }
}
