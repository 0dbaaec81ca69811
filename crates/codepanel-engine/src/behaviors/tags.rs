//! Post tag widget: expand / hide the full tag list and sort it.

use crate::click::ClickOutcome;
use crate::dom::Document;

pub const EXPAND: &str = "post_tags_toggle";
pub const HIDE: &str = "tags_hide";
pub const OPEN: &str = "jswidgetopen";
pub const LIST: &str = "tags_list";
pub const SORT: &str = "tags_sort";
pub const SORTED: &str = "sorted";
pub const TAG: &str = "post_tag";
const ACTIVE: &str = "active";

fn sort_button<D: Document>(doc: &D, target: &D::Node) -> Option<D::Node> {
    if doc.has_class(target, SORT) {
        return Some(target.clone());
    }
    doc.parent(target)
        .filter(|parent| doc.tag_name(target) == "span" && doc.has_class(parent, SORT))
}

/// Flip the sort order of every tag in the list containing `button`.
///
/// Active tags go back to their natural place (`order: 0`); the others are
/// reversed through a negative `order` derived from `data-position`.
fn sort_tags<D: Document>(doc: &mut D, button: &D::Node) {
    let Some(list) = doc.closest(button, LIST) else {
        return;
    };
    doc.toggle_class(button, SORTED);
    for tag in doc.elements_by_class(&list, TAG) {
        let order = if doc.has_class(&tag, ACTIVE) {
            "0".to_string()
        } else {
            let position = doc.data(&tag, "position").unwrap_or_default();
            format!("-{}", position.trim())
        };
        doc.set_style(&tag, "order", &order);
        doc.toggle_class(&tag, ACTIVE);
    }
}

pub fn handle_click<D: Document>(doc: &mut D, target: &D::Node) -> ClickOutcome {
    if let Some(button) = sort_button(doc, target) {
        sort_tags(doc, &button);
        return ClickOutcome::handled();
    }

    if doc.has_class(target, EXPAND) {
        if let Some(widget) = doc.next_sibling(target) {
            doc.add_class(&widget, OPEN);
        }
        return ClickOutcome::handled();
    }

    if doc.closest(target, HIDE).is_some() {
        let root = doc.root();
        for widget in doc.elements_by_class(&root, OPEN) {
            doc.remove_class(&widget, OPEN);
        }
        return ClickOutcome::handled();
    }

    if doc.has_class(target, OPEN) {
        doc.remove_class(target, OPEN);
        return ClickOutcome::handled();
    }
    ClickOutcome::ignored()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_widget_opens_and_hides() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let toggle = doc.element(body, "button", &[EXPAND]);
        let widget = doc.element(body, "div", &["tags_widget"]);
        let hide = doc.element(widget, "a", &[HIDE]);
        let icon = doc.element(hide, "svg", &[]);

        handle_click(&mut doc, &toggle);
        assert!(doc.has_class(&widget, OPEN));

        assert_eq!(handle_click(&mut doc, &icon), ClickOutcome::handled());
        assert!(!doc.has_class(&widget, OPEN));

        handle_click(&mut doc, &toggle);
        handle_click(&mut doc, &widget);
        assert!(!doc.has_class(&widget, OPEN));
    }

    #[test]
    fn test_sort_reverses_and_restores() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let list = doc.element(body, "div", &[LIST]);
        let button = doc.element(list, "a", &[SORT]);
        let label = doc.element(button, "span", &[]);
        let tags: Vec<_> = (1..=3)
            .map(|position| {
                let tag = doc.element(list, "a", &[TAG]);
                doc.set_data(&tag, "position", &position.to_string());
                tag
            })
            .collect();

        handle_click(&mut doc, &label);

        assert!(doc.has_class(&button, SORTED));
        let orders: Vec<_> = tags.iter().map(|tag| doc.style(tag, "order").unwrap()).collect();
        assert_eq!(orders, vec!["-1", "-2", "-3"]);
        assert!(tags.iter().all(|tag| doc.has_class(tag, ACTIVE)));

        handle_click(&mut doc, &button);

        assert!(!doc.has_class(&button, SORTED));
        let orders: Vec<_> = tags.iter().map(|tag| doc.style(tag, "order").unwrap()).collect();
        assert_eq!(orders, vec!["0", "0", "0"]);
    }
}
