/*!
 * # DOM Seam
 *
 * Every component in this crate talks to the page through the [`Document`]
 * trait. The browser front end implements it over `web-sys`; the
 * [`MemoryDocument`] implementation backs native tooling and tests.
 *
 * The trait is deliberately element-only: text nodes are reachable through
 * [`Document::text_content`] and [`Document::set_text`] but never handed out
 * as nodes.
 */

use std::fmt;

pub mod memory;

pub use memory::{Layout, MemoryDocument, MemorySelection, NodeId};

/// Element-level access to a rendered page.
pub trait Document {
    /// Handle to an element. Cheap to clone; equality is identity.
    type Node: Clone + PartialEq + fmt::Debug;
    /// Opaque snapshot of the user's text selection.
    type Selection;

    /// The `<html>` element.
    fn root(&self) -> Self::Node;
    fn body(&self) -> Option<Self::Node>;
    /// Address of the page, `document.URL` in a browser.
    fn location(&self) -> String;

    /// Descendants of `scope` with the given tag name, in document order.
    fn elements_by_tag(&self, scope: &Self::Node, tag: &str) -> Vec<Self::Node>;
    /// Descendants of `scope` carrying `class`, in document order.
    fn elements_by_class(&self, scope: &Self::Node, class: &str) -> Vec<Self::Node>;

    /// Lower-case tag name.
    fn tag_name(&self, node: &Self::Node) -> String;
    fn class_list(&self, node: &Self::Node) -> Vec<String>;
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Inline style property, e.g. `max-height`.
    fn style(&self, node: &Self::Node, property: &str) -> Option<String>;
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// A new detached element; `None` if the host refused to create it.
    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
    fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, reference: &Self::Node);
    /// Detach `node` from its parent.
    fn remove(&mut self, node: &Self::Node);
    /// Deep copy of `node` that is not attached anywhere.
    fn clone_detached(&mut self, node: &Self::Node) -> Option<Self::Node>;
    /// Detach `node` for good. The handle and every handle into its subtree
    /// must not be used afterwards.
    fn discard(&mut self, node: &Self::Node) {
        self.remove(node);
    }

    fn text_content(&self, node: &Self::Node) -> String;
    /// Replace all content of `node` with a single text run.
    fn set_text(&mut self, node: &Self::Node, text: &str);
    /// Append a text run after the existing content of `node`.
    fn append_text(&mut self, node: &Self::Node, text: &str);

    /// Distance from the offset parent's top edge, in CSS pixels. Zero while
    /// layout has not happened yet.
    fn offset_top(&self, node: &Self::Node) -> i32;
    fn offset_width(&self, node: &Self::Node) -> i32;

    fn save_selection(&self) -> Option<Self::Selection>;
    fn restore_selection(&mut self, selection: Self::Selection);

    /// `node` itself or its nearest ancestor carrying `class`.
    fn closest(&self, node: &Self::Node, class: &str) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.has_class(&candidate, class) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    fn toggle_class(&mut self, node: &Self::Node, class: &str) {
        if self.has_class(node, class) {
            self.remove_class(node, class);
        } else {
            self.add_class(node, class);
        }
    }

    /// Add or remove `class` so that its presence matches `present`.
    fn set_class(&mut self, node: &Self::Node, class: &str, present: bool) {
        match (present, self.has_class(node, class)) {
            (true, false) => self.add_class(node, class),
            (false, true) => self.remove_class(node, class),
            _ => {}
        }
    }

    /// Put `wrapper` where `node` is and move `node` inside it.
    fn wrap(&mut self, node: &Self::Node, wrapper: &Self::Node) {
        if let Some(parent) = self.parent(node) {
            self.insert_before(&parent, wrapper, node);
        }
        self.append_child(wrapper, node);
    }

    /// `data-<key>` attribute.
    fn data(&self, node: &Self::Node, key: &str) -> Option<String> {
        self.attribute(node, &format!("data-{key}"))
    }

    fn set_data(&mut self, node: &Self::Node, key: &str, value: &str) {
        self.set_attribute(node, &format!("data-{key}"), value);
    }

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node> {
        self.children(node).into_iter().next()
    }

    fn previous_sibling(&self, node: &Self::Node) -> Option<Self::Node> {
        let parent = self.parent(node)?;
        let siblings = self.children(&parent);
        let index = siblings.iter().position(|sibling| sibling == node)?;
        index.checked_sub(1).map(|before| siblings[before].clone())
    }
}
