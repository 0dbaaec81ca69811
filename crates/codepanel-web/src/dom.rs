//! [`Document`] over the live browser DOM.

use codepanel_engine::Document;
use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlCollection, HtmlElement, Range, Window};

/// Handles to the page; cheap to clone.
#[derive(Debug, Clone)]
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
    root: Element,
}

impl WebDocument {
    /// The page the module was loaded into, if there is one.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let root = document.document_element()?;
        Some(Self {
            window,
            document,
            root,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

fn collect(collection: HtmlCollection) -> Vec<Element> {
    (0..collection.length())
        .filter_map(|index| collection.item(index))
        .collect()
}

fn report(result: Result<(), JsValue>, action: &str) {
    if let Err(err) = result {
        warn!("{action} failed: {err:?}");
    }
}

impl Document for WebDocument {
    type Node = Element;
    type Selection = Vec<Range>;

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn location(&self) -> String {
        self.document.url().unwrap_or_else(|err| {
            warn!("document.URL failed: {err:?}");
            String::new()
        })
    }

    fn elements_by_tag(&self, scope: &Element, tag: &str) -> Vec<Element> {
        collect(scope.get_elements_by_tag_name(tag))
    }

    fn elements_by_class(&self, scope: &Element, class: &str) -> Vec<Element> {
        collect(scope.get_elements_by_class_name(class))
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_lowercase()
    }

    fn class_list(&self, node: &Element) -> Vec<String> {
        let list = node.class_list();
        (0..list.length()).filter_map(|index| list.item(index)).collect()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        report(node.class_list().add_1(class), "classList.add");
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        report(node.class_list().remove_1(class), "classList.remove");
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        report(node.set_attribute(name, value), "setAttribute");
    }

    fn style(&self, node: &Element, property: &str) -> Option<String> {
        node.dyn_ref::<HtmlElement>()?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            report(element.style().set_property(property, value), "style.setProperty");
        }
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        collect(node.children())
    }

    fn next_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn previous_sibling(&self, node: &Element) -> Option<Element> {
        node.previous_element_sibling()
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        self.document
            .create_element(tag)
            .map_err(|err| warn!("createElement({tag}) failed: {err:?}"))
            .ok()
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        report(parent.append_child(child).map(drop), "appendChild");
    }

    fn insert_before(&mut self, parent: &Element, child: &Element, reference: &Element) {
        let reference: &web_sys::Node = reference;
        report(
            parent.insert_before(child, Some(reference)).map(drop),
            "insertBefore",
        );
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn clone_detached(&mut self, node: &Element) -> Option<Element> {
        node.clone_node_with_deep(true)
            .map_err(|err| warn!("cloneNode failed: {err:?}"))
            .ok()?
            .dyn_into()
            .ok()
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn append_text(&mut self, node: &Element, text: &str) {
        report(node.insert_adjacent_text("beforeend", text), "insertAdjacentText");
    }

    fn offset_top(&self, node: &Element) -> i32 {
        node.dyn_ref::<HtmlElement>()
            .map(HtmlElement::offset_top)
            .unwrap_or_default()
    }

    fn offset_width(&self, node: &Element) -> i32 {
        node.dyn_ref::<HtmlElement>()
            .map(HtmlElement::offset_width)
            .unwrap_or_default()
    }

    fn save_selection(&self) -> Option<Vec<Range>> {
        let selection = self.window.get_selection().ok()??;
        let ranges: Vec<Range> = (0..selection.range_count())
            .filter_map(|index| selection.get_range_at(index).ok())
            .map(|range| range.clone_range())
            .collect();
        (!ranges.is_empty()).then_some(ranges)
    }

    fn restore_selection(&mut self, ranges: Vec<Range>) {
        let Ok(Some(selection)) = self.window.get_selection() else {
            return;
        };
        report(selection.remove_all_ranges(), "removeAllRanges");
        for range in &ranges {
            report(selection.add_range(range), "addRange");
        }
    }
}
