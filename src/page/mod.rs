//! In-memory page document mutated by the enhancement engine.
//!
//! The host owns rendering and layout; this model tracks the structural
//! state the engine cares about: elements with ids/classes/attributes,
//! inline styles, scroll position and activated embedded scripts.

mod events;

pub use events::{Event, Key};

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use ego_tree::NodeRef;
use scraper::{Html, Node as HtmlNode};
use tokio::sync::RwLock;

/// Shared handle to a document, cloned into every component.
pub type SharedDocument = Arc<RwLock<Document>>;

/// Wrap a document for shared use.
pub fn shared(doc: Document) -> SharedDocument {
    Arc::new(RwLock::new(doc))
}

/// Index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// How a programmatic scroll was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// Record of the most recent programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// A script element lifted out of fetched markup and re-registered.
///
/// Scripts inserted as raw markup never execute; activation is the explicit
/// step that re-attaches them so their side effects run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedScript {
    /// External source, if the script had a `src` attribute.
    pub src: Option<String>,
    /// Inline script body, if any.
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ElementNode {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    attrs: HashMap<String, String>,
    text: String,
    styles: HashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    offset_top: f64,
}

/// Arena-backed element tree plus page-level scroll state.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<ElementNode>,
    scroll_y: f64,
    viewport_width: u32,
    last_scroll: Option<ScrollRequest>,
    activated_scripts: Vec<EmbeddedScript>,
}

const ROOT: NodeId = NodeId(0);

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a root node.
    pub fn new() -> Self {
        let root = ElementNode {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            nodes: vec![root],
            scroll_y: 0.0,
            viewport_width: 1024,
            last_scroll: None,
            activated_scripts: Vec::new(),
        }
    }

    /// Parse a full HTML page into a fresh document.
    pub fn from_html(html: &str) -> Self {
        let mut doc = Self::new();
        let parsed = Html::parse_document(html);
        doc.import_children(ROOT, *parsed.root_element());
        doc
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    // ---- structure ----------------------------------------------------

    /// Append a new element under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(ElementNode {
            tag: tag.to_string(),
            parent: Some(parent),
            ..Default::default()
        });
        self.nodes[parent.0].children.push(node);
        node
    }

    /// Remove all children of `node`. Detached subtrees stay in the arena
    /// but are unreachable from the root.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace the content of the element with id `container_id` by parsing
    /// `html` as a fragment. Returns false when no such element exists.
    pub fn mount_html(&mut self, container_id: &str, html: &str) -> bool {
        let Some(container) = self.element_by_id(container_id) else {
            return false;
        };
        self.clear_children(container);
        let fragment = Html::parse_fragment(html);
        self.import_children(container, *fragment.root_element());
        true
    }

    fn import_children(&mut self, parent: NodeId, src: NodeRef<'_, HtmlNode>) {
        for child in src.children() {
            match child.value() {
                HtmlNode::Element(el) => {
                    let node = self.append_element(parent, el.name());
                    if let Some(id) = el.id() {
                        self.nodes[node.0].id = Some(id.to_string());
                    }
                    for class in el.classes() {
                        self.nodes[node.0].classes.insert(class.to_string());
                    }
                    for (name, value) in el.attrs() {
                        if name != "id" && name != "class" {
                            self.nodes[node.0]
                                .attrs
                                .insert(name.to_string(), value.to_string());
                        }
                    }
                    self.import_children(node, child);
                }
                HtmlNode::Text(text) => {
                    let trimmed = text.text.trim();
                    if !trimmed.is_empty() {
                        let buf = &mut self.nodes[parent.0].text;
                        if !buf.is_empty() {
                            buf.push(' ');
                        }
                        buf.push_str(trimmed);
                    }
                }
                _ => {}
            }
        }
    }

    /// True when `node` is `ancestor` or a descendant of it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes[n.0].parent;
        }
        false
    }

    /// Direct children of `node`.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Parent of `node`, None for the root and detached subtrees.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[node.0].children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// All descendants of `node` in document order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(node, &mut out);
        out
    }

    // ---- queries ------------------------------------------------------

    /// Find the first element with the given id attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![ROOT];
        while let Some(node) = stack.pop() {
            if self.nodes[node.0].id.as_deref() == Some(id) {
                return Some(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
        None
    }

    /// First element carrying `class`, in document order.
    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.all_by_class(class).into_iter().next()
    }

    /// All elements carrying `class`, in document order.
    pub fn all_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(ROOT)
            .into_iter()
            .filter(|n| self.nodes[n.0].classes.contains(class))
            .collect()
    }

    /// All elements carrying `class` within the subtree rooted at `scope`.
    pub fn all_by_class_in(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.nodes[n.0].classes.contains(class))
            .collect()
    }

    /// First element with the given tag name, in document order.
    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(ROOT)
            .into_iter()
            .find(|n| self.nodes[n.0].tag == tag)
    }

    /// All elements with the given tag within the subtree rooted at `scope`.
    pub fn all_by_tag_in(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.nodes[n.0].tag == tag)
            .collect()
    }

    // ---- element state ------------------------------------------------

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.nodes[node.0].id = Some(id.to_string());
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.contains(class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.remove(class);
    }

    /// Toggle `class`, returning whether it is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.nodes[node.0].classes.remove(class) {
            false
        } else {
            self.nodes[node.0].classes.insert(class.to_string());
            true
        }
    }

    /// Force `class` present or absent.
    pub fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Inline style property, if set.
    pub fn style(&self, node: NodeId, prop: &str) -> Option<&str> {
        self.nodes[node.0].styles.get(prop).map(String::as_str)
    }

    /// Set an inline style property. An empty value clears it, mirroring
    /// assignment of an empty string to a style field.
    pub fn set_style(&mut self, node: NodeId, prop: &str, value: &str) {
        if value.is_empty() {
            self.nodes[node.0].styles.remove(prop);
        } else {
            self.nodes[node.0]
                .styles
                .insert(prop.to_string(), value.to_string());
        }
    }

    pub fn offset_top(&self, node: NodeId) -> f64 {
        self.nodes[node.0].offset_top
    }

    /// Record the host-measured vertical offset of an element.
    pub fn set_offset_top(&mut self, node: NodeId, offset: f64) {
        self.nodes[node.0].offset_top = offset;
    }

    // ---- page state ---------------------------------------------------

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Update the scroll offset reported by the host.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    /// Issue a programmatic scroll.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_y = top;
        self.last_scroll = Some(ScrollRequest { top, behavior });
    }

    /// The most recent programmatic scroll, if any.
    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    // ---- embedded scripts ---------------------------------------------

    /// Re-register script elements found in the subtree under `container`.
    ///
    /// Raw-markup insertion leaves scripts inert; this lifts each one into
    /// the document's activated list so the host can run them. Returns the
    /// number of scripts activated.
    pub fn activate_embedded_scripts(&mut self, container: NodeId) -> usize {
        let scripts: Vec<NodeId> = self.all_by_tag_in(container, "script");
        let count = scripts.len();
        for node in scripts {
            let src = self.attr(node, "src").map(str::to_string);
            let body = self.text(node);
            let source = if body.is_empty() {
                None
            } else {
                Some(body.to_string())
            };
            self.activated_scripts.push(EmbeddedScript { src, source });
        }
        count
    }

    /// Scripts activated so far, oldest first.
    pub fn activated_scripts(&self) -> &[EmbeddedScript] {
        &self.activated_scripts
    }
}
