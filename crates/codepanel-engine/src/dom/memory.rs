//! Arena-backed [`Document`] for native use and tests.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Slots of discarded subtrees
//! go on a free list and are handed out again by later allocations.
//!
//! Layout is either set explicitly per element ([`MemoryDocument::set_offset_top`],
//! [`MemoryDocument::set_offset_width`]) or computed on demand by a pluggable
//! [`Layout`]. Unset metrics read as zero, which is what a browser reports
//! before layout.

use std::fmt;

use super::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Selected character range inside one element's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySelection {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

/// Computes geometry for elements of a [`MemoryDocument`].
///
/// Returning `None` falls back to the explicitly stored metrics.
pub trait Layout {
    fn offset_top(&self, doc: &MemoryDocument, node: NodeId) -> Option<i32>;
    fn offset_width(&self, doc: &MemoryDocument, node: NodeId) -> Option<i32>;
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Metrics {
    offset_top: i32,
    offset_width: i32,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    metrics: Metrics,
    released: bool,
}

pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    free: Vec<NodeId>,
    root: NodeId,
    body: NodeId,
    selection: Option<MemorySelection>,
    layout: Option<Box<dyn Layout>>,
    location: String,
    creates_elements: bool,
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &self.node_count())
            .field("location", &self.location)
            .field("selection", &self.selection)
            .field("layout", &self.layout.is_some())
            .finish()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty `<html><body></body></html>` page.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            selection: None,
            layout: None,
            location: "about:blank".to_string(),
            creates_elements: true,
        };
        doc.root = doc.push(NodeKind::Element(ElementData {
            tag: "html".to_string(),
            ..ElementData::default()
        }));
        let body = doc.new_element("body");
        let root = doc.root;
        doc.append_child(&root, &body);
        doc.body = body;
        doc
    }

    pub fn with_layout(mut self, layout: impl Layout + 'static) -> Self {
        self.layout = Some(Box::new(layout));
        self
    }

    pub fn set_layout(&mut self, layout: impl Layout + 'static) {
        self.layout = Some(Box::new(layout));
    }

    pub fn set_location(&mut self, url: &str) {
        self.location = url.to_string();
    }

    /// When `false`, [`Document::create_element`] and
    /// [`Document::clone_detached`] refuse like a browser rejecting a call.
    pub fn set_element_creation(&mut self, allowed: bool) {
        self.creates_elements = allowed;
    }

    pub fn set_offset_top(&mut self, node: NodeId, offset: i32) {
        self.nodes[node.0].metrics.offset_top = offset;
    }

    pub fn set_offset_width(&mut self, node: NodeId, width: i32) {
        self.nodes[node.0].metrics.offset_width = width;
    }

    /// Create `<tag class="...">` and append it to `parent`.
    pub fn element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let node = self.new_element(tag);
        for class in classes {
            self.add_class(&node, class);
        }
        self.append_child(&parent, &node);
        node
    }

    /// Append a text run to `parent`.
    pub fn text(&mut self, parent: NodeId, text: &str) {
        let node = self.push(NodeKind::Text(text.to_string()));
        self.attach(parent, node, None);
    }

    /// Select `start..end` of the text inside `node`.
    pub fn select(&mut self, node: NodeId, start: usize, end: usize) {
        self.selection = Some(MemorySelection { node, start, end });
    }

    pub fn selection(&self) -> Option<&MemorySelection> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Whether `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Nodes currently allocated, text runs included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Serialise `node` and its subtree.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
            NodeKind::Element(data) => {
                out.push('<');
                out.push_str(&data.tag);
                if !data.classes.is_empty() {
                    out.push_str(&format!(r#" class="{}""#, data.classes.join(" ")));
                }
                for (name, value) in &data.attributes {
                    out.push_str(&format!(
                        r#" {name}="{}""#,
                        html_escape::encode_double_quoted_attribute(value)
                    ));
                }
                if !data.style.is_empty() {
                    let style: Vec<String> = data
                        .style
                        .iter()
                        .map(|(property, value)| format!("{property}: {value}"))
                        .collect();
                    out.push_str(&format!(r#" style="{}""#, style.join("; ")));
                }
                out.push('>');
                for &child in &self.nodes[node.0].children {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", data.tag));
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
            metrics: Metrics::default(),
            released: false,
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = data;
                id
            }
            None => {
                self.nodes.push(data);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn new_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.to_lowercase(),
            ..ElementData::default()
        }))
    }

    /// Put `node` and its subtree on the free list.
    fn release(&mut self, node: NodeId) {
        let slot = &mut self.nodes[node.0];
        if slot.released || node == self.root || node == self.body {
            return;
        }
        slot.released = true;
        slot.parent = None;
        slot.kind = NodeKind::Text(String::new());
        for child in std::mem::take(&mut slot.children) {
            self.release(child);
        }
        if self.selection.as_ref().is_some_and(|s| s.node == node) {
            self.selection = None;
        }
        self.free.push(node);
    }

    fn element_data(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_data_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element_data(node).is_some()
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != node);
        }
    }

    fn attach(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>) {
        self.detach(node);
        let children = &mut self.nodes[parent.0].children;
        let position = before
            .and_then(|reference| children.iter().position(|&child| child == reference))
            .unwrap_or(children.len());
        children.insert(position, node);
        self.nodes[node.0].parent = Some(parent);
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[scope.0].children {
            if self.is_element(child) {
                out.push(child);
                self.descendants(child, out);
            }
        }
    }

    fn deep_copy(&mut self, node: NodeId) -> NodeId {
        let source = self.nodes[node.0].clone();
        let copy = self.push(source.kind);
        self.nodes[copy.0].metrics = source.metrics;
        for child in source.children {
            let child_copy = self.deep_copy(child);
            self.nodes[child_copy.0].parent = Some(copy);
            self.nodes[copy.0].children.push(child_copy);
        }
        copy
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;
    type Selection = MemorySelection;

    fn root(&self) -> NodeId {
        self.root
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn elements_by_tag(&self, scope: &NodeId, tag: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*scope, &mut all);
        all.into_iter()
            .filter(|&node| self.tag_name(&node) == tag)
            .collect()
    }

    fn elements_by_class(&self, scope: &NodeId, class: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*scope, &mut all);
        all.into_iter()
            .filter(|node| self.has_class(node, class))
            .collect()
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.element_data(*node)
            .map(|data| data.tag.clone())
            .unwrap_or_default()
    }

    fn class_list(&self, node: &NodeId) -> Vec<String> {
        self.element_data(*node)
            .map(|data| data.classes.clone())
            .unwrap_or_default()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.element_data(*node)
            .is_some_and(|data| data.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.element_data_mut(*node)
            && !data.classes.iter().any(|c| c == class)
        {
            data.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.element_data_mut(*node) {
            data.classes.retain(|c| c != class);
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        if name == "class" {
            let classes = self.class_list(node);
            return (!classes.is_empty()).then(|| classes.join(" "));
        }
        self.element_data(*node)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let Some(data) = self.element_data_mut(*node) else {
            return;
        };
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
            return;
        }
        match data.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.element_data(*node)?
            .style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.clone())
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let Some(data) = self.element_data_mut(*node) else {
            return;
        };
        match data.style.iter_mut().find(|(key, _)| key == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => data.style.push((property.to_string(), value.to_string())),
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect()
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.nodes[node.0].parent?;
        self.children(&parent)
            .into_iter()
            .skip_while(|child| child != node)
            .nth(1)
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        self.creates_elements.then(|| self.new_element(tag))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.attach(*parent, *child, None);
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: &NodeId) {
        self.attach(*parent, *child, Some(*reference));
    }

    fn remove(&mut self, node: &NodeId) {
        self.detach(*node);
    }

    fn clone_detached(&mut self, node: &NodeId) -> Option<NodeId> {
        self.creates_elements.then(|| self.deep_copy(*node))
    }

    fn discard(&mut self, node: &NodeId) {
        self.detach(*node);
        self.release(*node);
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.collect_text(*node, &mut out);
        out
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
            // Element children may still be held by callers.
            if !self.is_element(child) {
                self.release(child);
            }
        }
        self.text(*node, text);
    }

    fn append_text(&mut self, node: &NodeId, text: &str) {
        self.text(*node, text);
    }

    fn offset_top(&self, node: &NodeId) -> i32 {
        self.layout
            .as_ref()
            .and_then(|layout| layout.offset_top(self, *node))
            .unwrap_or(self.nodes[node.0].metrics.offset_top)
    }

    fn offset_width(&self, node: &NodeId) -> i32 {
        self.layout
            .as_ref()
            .and_then(|layout| layout.offset_width(self, *node))
            .unwrap_or(self.nodes[node.0].metrics.offset_width)
    }

    fn save_selection(&self) -> Option<MemorySelection> {
        self.selection.clone()
    }

    fn restore_selection(&mut self, selection: MemorySelection) {
        self.selection = Some(selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (MemoryDocument, NodeId, NodeId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let outer = doc.element(body, "div", &["outer"]);
        let inner = doc.element(outer, "span", &["inner", "x"]);
        doc.text(inner, "hello");
        (doc, outer, inner)
    }

    #[test]
    fn test_new_document_has_html_and_body() {
        let doc = MemoryDocument::new();
        let root = doc.root();
        assert_eq!(doc.tag_name(&root), "html");
        assert_eq!(doc.children(&root), vec![doc.body().unwrap()]);
    }

    #[test]
    fn test_queries_are_in_document_order() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let a = doc.element(body, "code", &[]);
        let wrap = doc.element(body, "div", &[]);
        let b = doc.element(wrap, "code", &["language-rust"]);
        let c = doc.element(body, "code", &[]);

        assert_eq!(doc.elements_by_tag(&doc.root(), "code"), vec![a, b, c]);
        assert_eq!(doc.elements_by_class(&body, "language-rust"), vec![b]);
    }

    #[test]
    fn test_closest_includes_self() {
        let (doc, outer, inner) = sample();
        assert_eq!(doc.closest(&inner, "inner"), Some(inner));
        assert_eq!(doc.closest(&inner, "outer"), Some(outer));
        assert_eq!(doc.closest(&inner, "missing"), None);
    }

    #[test]
    fn test_wrap_moves_node_into_wrapper() {
        let (mut doc, outer, inner) = sample();
        let wrapper = doc.create_element("div").unwrap();
        doc.wrap(&inner, &wrapper);

        assert_eq!(doc.children(&outer), vec![wrapper]);
        assert_eq!(doc.children(&wrapper), vec![inner]);
        assert_eq!(doc.parent(&inner), Some(wrapper));
    }

    #[test]
    fn test_clone_detached_is_independent() {
        let (mut doc, outer, inner) = sample();
        let copy = doc.clone_detached(&outer).unwrap();

        assert!(!doc.is_attached(copy));
        assert_eq!(doc.text_content(&copy), "hello");

        let copied_inner = doc.children(&copy)[0];
        doc.remove(&copied_inner);

        assert_eq!(doc.text_content(&copy), "");
        assert_eq!(doc.text_content(&outer), "hello");
        assert!(doc.is_attached(inner));
    }

    #[test]
    fn test_discarded_slots_are_reused() {
        let (mut doc, outer, _) = sample();
        let before = doc.node_count();

        for _ in 0..10 {
            let copy = doc.clone_detached(&outer).unwrap();
            assert_eq!(doc.node_count(), before + 3);
            doc.discard(&copy);
        }

        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.nodes.len(), before + 3);
        assert_eq!(doc.text_content(&outer), "hello");
    }

    #[test]
    fn test_discard_drops_selection_inside() {
        let (mut doc, outer, _) = sample();
        let body = doc.body().unwrap();
        let scratch = doc.element(body, "textarea", &[]);
        doc.select(scratch, 0, 0);

        doc.discard(&scratch);

        assert_eq!(doc.selection(), None);
        assert_eq!(doc.children(&body), vec![outer]);
    }

    #[test]
    fn test_set_text_frees_old_text() {
        let (mut doc, _, inner) = sample();
        let before = doc.node_count();

        for round in 0..5 {
            doc.set_text(&inner, &round.to_string());
        }

        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.text_content(&inner), "4");
    }

    #[test]
    fn test_previous_sibling() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let first = doc.element(body, "p", &[]);
        doc.text(body, "between");
        let second = doc.element(body, "p", &[]);

        assert_eq!(doc.previous_sibling(&second), Some(first));
        assert_eq!(doc.previous_sibling(&first), None);
    }

    #[test]
    fn test_next_sibling_skips_text() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let first = doc.element(body, "p", &[]);
        doc.text(body, "between");
        let second = doc.element(body, "p", &[]);

        assert_eq!(doc.next_sibling(&first), Some(second));
        assert_eq!(doc.next_sibling(&second), None);
    }

    #[test]
    fn test_outer_html() {
        let (mut doc, outer, inner) = sample();
        doc.set_attribute(&inner, "data-lang", "a&b");
        doc.set_style(&outer, "max-height", "40px");

        insta::assert_snapshot!(
            doc.outer_html(outer),
            @r#"<div class="outer" style="max-height: 40px"><span class="inner x" data-lang="a&amp;b">hello</span></div>"#
        );
    }

    struct FixedTop(i32);

    impl Layout for FixedTop {
        fn offset_top(&self, _doc: &MemoryDocument, _node: NodeId) -> Option<i32> {
            Some(self.0)
        }

        fn offset_width(&self, _doc: &MemoryDocument, _node: NodeId) -> Option<i32> {
            None
        }
    }

    #[test]
    fn test_layout_overrides_stored_metrics() {
        let (mut doc, outer, _) = sample();
        doc.set_offset_top(outer, 5);
        doc.set_offset_width(outer, 300);
        assert_eq!(doc.offset_top(&outer), 5);

        doc.set_layout(FixedTop(42));
        assert_eq!(doc.offset_top(&outer), 42);
        assert_eq!(doc.offset_width(&outer), 300);
    }
}
