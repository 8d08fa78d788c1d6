//! HTML5 Parser implementation
//!
//! Uses html5ever's build-in RcDom and converts to our DOM format.
//! This is simpler and more reliable than implementing TreeSink directly.

use fos_dom::{Document, DomError, DomResult, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Fragments are parsed as the body of a minimal document
const FRAGMENT_PREFIX: &str = "<!DOCTYPE html><body>";

/// How converted nodes reach their parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Insert through `Document`: custom elements are upgraded on
    /// connection and mutation records are kept
    #[default]
    Live,
    /// Write raw tree nodes; nothing reacts
    Inert,
}

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> DomResult<Document> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> DomResult<Document> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = Self::read(html)?;
        let mut document = Document::new(url);

        if let Some(name) = doctype_name(&dom.document) {
            let root = document.root();
            let html = document.document_element();
            let doctype = document.tree_mut().create_doctype(&name);
            document.tree_mut().insert_before(root, doctype, Some(html))?;
        }

        if let Some(head) = find_element(&dom.document, "head") {
            let target = document.head();
            self.convert_into(&head, &mut document, target, ParseMode::Inert)?;
        }
        if let Some(body) = find_element(&dom.document, "body") {
            let target = document.body();
            self.convert_into(&body, &mut document, target, ParseMode::Live)?;
        }

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse a fragment and append it to `parent`, returning the new
    /// top-level nodes
    pub fn parse_into(
        &self,
        doc: &mut Document,
        parent: NodeId,
        html: &str,
        mode: ParseMode,
    ) -> DomResult<Vec<NodeId>> {
        let source = format!("{FRAGMENT_PREFIX}{html}");
        let dom = Self::read(&source)?;
        let Some(body) = find_element(&dom.document, "body") else {
            return Ok(Vec::new());
        };
        self.convert_into(&body, doc, parent, mode)
    }

    fn read(html: &str) -> DomResult<RcDom> {
        parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|err| DomError::Parse(err.to_string()))
    }

    /// Convert the children of `source` and attach them to `parent`
    fn convert_into(
        &self,
        source: &Handle,
        doc: &mut Document,
        parent: NodeId,
        mode: ParseMode,
    ) -> DomResult<Vec<NodeId>> {
        let fragment = doc.create_document_fragment();
        let nodes = self.convert_children(source, doc.tree_mut(), fragment)?;

        match mode {
            ParseMode::Live => doc.append_child(parent, fragment)?,
            ParseMode::Inert => {
                doc.tree_mut().append_child(parent, fragment)?;
            }
        }
        tracing::trace!("Inserted {} parsed nodes into {}", nodes.len(), parent);
        Ok(nodes)
    }

    fn convert_children(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<Vec<NodeId>> {
        let mut converted = Vec::new();
        for child in handle.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree)? {
                tree.append_child(parent, id)?;
                converted.push(id);
            }
        }
        Ok(converted)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> DomResult<Option<NodeId>> {
        let id = match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(&contents.to_string()),
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }

                // Template children live in the inert content fragment
                let content = tree.template_content(id);
                if let (Some(content), Some(source)) = (content, template_contents.borrow().as_ref()) {
                    self.convert_children(source, tree, content)?;
                }

                self.convert_children(handle, tree, id)?;
                id
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };
        Ok(Some(id))
    }
}

/// Name of the document's doctype, if the source had one
fn doctype_name(document: &Handle) -> Option<String> {
    document.children.borrow().iter().find_map(|child| match &child.data {
        RcNodeData::Doctype { name, .. } => Some(name.to_string()),
        _ => None,
    })
}

/// First element named `local_name` in document order
fn find_element(handle: &Handle, local_name: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == local_name {
            return Some(handle.clone());
        }
    }
    handle.children.borrow().iter().find_map(|child| find_element(child, local_name))
}
