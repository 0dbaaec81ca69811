//! Mobile navigation drawer and nested menus.

use crate::click::ClickOutcome;
use crate::dom::Document;

pub const NAV: &str = "nav";
pub const TOGGLE: &str = "nav_close";
pub const TOGGLE_ICON: &str = "nav_close_icon";
pub const ITEM: &str = "nav_item";
pub const SUB_MENU: &str = "nav_sub";
pub const SUB_OPEN: &str = "nav_open";
/// Set on the root element while the drawer is open.
pub const OPEN: &str = "jsopen";

pub fn icon_url(base_url: &str, open: bool) -> String {
    let name = if open { "cancel" } else { "bar" };
    if base_url.is_empty() || base_url.ends_with('/') {
        format!("{base_url}icons/{name}.svg")
    } else {
        format!("{base_url}/icons/{name}.svg")
    }
}

fn toggle_drawer<D: Document>(doc: &mut D, base_url: &str) {
    let root = doc.root();
    doc.toggle_class(&root, OPEN);
    let open = doc.has_class(&root, OPEN);
    if let Some(icon) = doc.elements_by_class(&root, TOGGLE_ICON).into_iter().next() {
        doc.set_attribute(&icon, "src", &icon_url(base_url, open));
    }
}

pub fn handle_click<D: Document>(doc: &mut D, base_url: &str, target: &D::Node) -> ClickOutcome {
    let root = doc.root();
    let mut outcome = ClickOutcome::ignored();

    if doc.closest(target, TOGGLE).is_some() {
        toggle_drawer(doc, base_url);
        outcome = ClickOutcome::prevented();
    } else if doc.has_class(&root, OPEN) && doc.closest(target, NAV).is_none() {
        toggle_drawer(doc, base_url);
        outcome = ClickOutcome::handled();
    }

    if let Some(item) = doc.closest(target, ITEM)
        && doc
            .next_sibling(&item)
            .is_some_and(|next| doc.has_class(&next, SUB_MENU))
    {
        doc.toggle_class(&item, SUB_OPEN);
        outcome = outcome.merge(ClickOutcome::prevented());
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, NodeId};
    use pretty_assertions::assert_eq;

    struct Page {
        doc: MemoryDocument,
        toggle: NodeId,
        icon: NodeId,
        item: NodeId,
        leaf: NodeId,
        outside: NodeId,
    }

    fn page() -> Page {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let nav = doc.element(body, "nav", &[NAV]);
        let toggle = doc.element(nav, "a", &[TOGGLE]);
        let icon = doc.element(toggle, "img", &[TOGGLE_ICON]);
        let item = doc.element(nav, "a", &[ITEM]);
        doc.element(nav, "ul", &[SUB_MENU]);
        let leaf = doc.element(nav, "a", &[ITEM]);
        let outside = doc.element(body, "main", &[]);
        Page {
            doc,
            toggle,
            icon,
            item,
            leaf,
            outside,
        }
    }

    #[test]
    fn test_icon_url_joins_base() {
        assert_eq!(icon_url("https://example.com/", true), "https://example.com/icons/cancel.svg");
        assert_eq!(icon_url("https://example.com", false), "https://example.com/icons/bar.svg");
        assert_eq!(icon_url("", false), "icons/bar.svg");
    }

    #[test]
    fn test_drawer_opens_and_closes_from_outside() {
        let Page {
            mut doc,
            toggle,
            icon,
            outside,
            ..
        } = page();
        let root = doc.root();

        let outcome = handle_click(&mut doc, "/", &toggle);
        assert_eq!(outcome, ClickOutcome::prevented());
        assert!(doc.has_class(&root, OPEN));
        assert_eq!(doc.attribute(&icon, "src").as_deref(), Some("/icons/cancel.svg"));

        let outcome = handle_click(&mut doc, "/", &outside);
        assert_eq!(outcome, ClickOutcome::handled());
        assert!(!doc.has_class(&root, OPEN));
        assert_eq!(doc.attribute(&icon, "src").as_deref(), Some("/icons/bar.svg"));
    }

    #[test]
    fn test_only_items_with_sub_menu_toggle() {
        let Page {
            mut doc, item, leaf, ..
        } = page();

        assert_eq!(handle_click(&mut doc, "/", &item), ClickOutcome::prevented());
        assert!(doc.has_class(&item, SUB_OPEN));

        assert_eq!(handle_click(&mut doc, "/", &leaf), ClickOutcome::ignored());
        assert!(!doc.has_class(&leaf, SUB_OPEN));
    }
}
