//! Link behaviors: external links open in a new tab, headings get a
//! copyable deep link, and share icons put a link on the clipboard.

use log::{debug, warn};

use crate::behaviors::images::POST_CONTENT;
use crate::classes;
use crate::click::ClickOutcome;
use crate::clipboard::{self, Clipboard};
use crate::dom::Document;
use crate::schedule::{Deferred, FEEDBACK_DELAY, Scheduler};

/// Deep-link anchor appended to a heading.
pub const LINK: &str = "link";
/// Heading that carries a deep-link anchor.
pub const LINK_OWNER: &str = "link_owner";
/// Anchor whose `href` is copied instead of followed.
pub const YANK: &str = "link_yank";
/// Temporary "Link Copied" note.
pub const YANKED: &str = "link_yanked";
/// Share icon.
pub const COPY: &str = "copy";
pub const COPY_DONE: &str = "copy_done";
/// Share icon inside a post excerpt; shares the post rather than the page.
pub const POST_COPY: &str = "post_copy";
pub const EXCERPT: &str = "excerpt";
pub const POST_CARD: &str = "post_card";

const FEEDBACK_TEXT: &str = "Link Copied";
const ANCHORED_HEADINGS: [&str; 5] = ["h2", "h3", "h4", "h5", "h6"];

/// `href` points off-site: absolute http(s) and not under `base_url`.
pub fn is_external(href: &str, base_url: &str) -> bool {
    href.starts_with("http") && (base_url.is_empty() || !href.starts_with(base_url))
}

/// Give every external link `target="_blank"` and `rel="noopener"`, leaving
/// values the author already set. Returns how many links were external.
pub fn open_external_links<D: Document>(doc: &mut D, base_url: &str) -> usize {
    let root = doc.root();
    let external: Vec<_> = doc
        .elements_by_tag(&root, "a")
        .into_iter()
        .filter(|link| {
            doc.attribute(link, "href")
                .is_some_and(|href| is_external(&href, base_url))
        })
        .collect();

    for link in &external {
        if doc.attribute(link, "target").is_none() {
            doc.set_attribute(link, "target", "_blank");
        }
        if doc.attribute(link, "rel").is_none() {
            doc.set_attribute(link, "rel", "noopener");
        }
    }
    external.len()
}

/// Address of the heading `id` on `page`, replacing any fragment already in
/// the page address.
pub fn heading_url(page: &str, id: &str) -> String {
    let page = page.split_once('#').map_or(page, |(base, _)| base);
    format!("{page}#{id}")
}

/// Append `a.link.icon` to every `h2`..`h6` with an `id` inside
/// `.post_content`. Returns how many anchors were added.
pub fn anchor_headings<D: Document>(doc: &mut D) -> usize {
    let root = doc.root();
    let Some(post) = doc.elements_by_class(&root, POST_CONTENT).into_iter().next() else {
        return 0;
    };
    let page = doc.location();

    let mut anchored = 0;
    for tag in ANCHORED_HEADINGS {
        for heading in doc.elements_by_tag(&post, tag) {
            if doc.has_class(&heading, LINK_OWNER) {
                continue;
            }
            let Some(id) = doc.attribute(&heading, "id").filter(|id| !id.is_empty()) else {
                continue;
            };
            let Some(anchor) = doc.create_element("a") else {
                continue;
            };
            doc.add_class(&anchor, LINK);
            doc.add_class(&anchor, classes::ICON);
            doc.set_attribute(&anchor, "href", &heading_url(&page, &id));
            doc.append_child(&heading, &anchor);
            doc.add_class(&heading, LINK_OWNER);
            anchored += 1;
        }
    }
    anchored
}

fn heading_link<D: Document>(doc: &D, target: &D::Node) -> Option<D::Node> {
    if doc.has_class(target, LINK) {
        return Some(target.clone());
    }
    doc.parent(target).filter(|parent| doc.has_class(parent, LINK))
}

/// What a share icon copies: the neighbouring post card's link for an icon
/// inside an excerpt, the page address otherwise.
fn share_link<D: Document>(doc: &D, icon: &D::Node) -> Option<String> {
    if !doc.has_class(icon, POST_COPY) {
        return Some(doc.location());
    }
    doc.closest(icon, EXCERPT)
        .and_then(|excerpt| doc.previous_sibling(&excerpt))
        .filter(|card| doc.has_class(card, POST_CARD))
        .and_then(|card| doc.attribute(&card, "href"))
}

fn copy_link<D, C>(doc: &mut D, clipboard: &mut C, href: &str) -> bool
where
    D: Document,
    C: Clipboard<D> + ?Sized,
{
    match clipboard::copy_text(doc, clipboard, href) {
        Ok(()) => {
            debug!("copied {href}");
            true
        }
        Err(err) => {
            warn!("copying {href} failed: {err}");
            false
        }
    }
}

/// Show "Link Copied" inside `parent` for [`FEEDBACK_DELAY`], unless a note
/// is already showing there.
fn show_feedback<D, S>(doc: &mut D, scheduler: &mut S, parent: &D::Node)
where
    D: Document,
    S: Scheduler<D::Node>,
{
    if !doc.elements_by_class(parent, YANKED).is_empty() {
        return;
    }
    let Some(note) = doc.create_element("div") else {
        return;
    };
    doc.add_class(&note, YANKED);
    doc.set_text(&note, FEEDBACK_TEXT);
    doc.append_child(parent, &note);
    scheduler.defer(FEEDBACK_DELAY, Deferred::Dismiss { node: note });
}

/// Heading deep links, share icons and `.link_yank` anchors.
pub fn handle_click<D, C, S>(
    doc: &mut D,
    clipboard: &mut C,
    scheduler: &mut S,
    target: &D::Node,
) -> ClickOutcome
where
    D: Document,
    C: Clipboard<D> + ?Sized,
    S: Scheduler<D::Node>,
{
    let mut outcome = ClickOutcome::ignored();

    if let Some(anchor) = heading_link(doc, target) {
        if let Some(href) = doc.attribute(&anchor, "href")
            && copy_link(doc, clipboard, &href)
        {
            show_feedback(doc, scheduler, &anchor);
        }
        outcome = ClickOutcome::prevented();
    }

    if let Some(icon) = doc.closest(target, COPY) {
        if let Some(link) = share_link(doc, &icon)
            && copy_link(doc, clipboard, &link)
        {
            doc.add_class(&icon, COPY_DONE);
        }
        outcome = outcome.merge(ClickOutcome::handled());
    }

    if let Some(yank) = doc.closest(target, YANK) {
        if let Some(href) = doc.attribute(&yank, "href")
            && copy_link(doc, clipboard, &href)
        {
            show_feedback(doc, scheduler, &yank);
        }
        outcome = outcome.merge(ClickOutcome::prevented());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardError, MemoryClipboard};
    use crate::dom::{MemoryDocument, NodeId};
    use crate::schedule::TaskQueue;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::Duration;

    const PAGE: &str = "https://example.com/posts/hello/";

    fn post() -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new();
        doc.set_location(PAGE);
        let body = doc.body().unwrap();
        let post = doc.element(body, "article", &[POST_CONTENT]);
        (doc, post)
    }

    #[rstest]
    #[case("https://docs.rs/log", "https://example.com/", true)]
    #[case("https://example.com/posts/", "https://example.com/", false)]
    #[case("/posts/", "https://example.com/", false)]
    #[case("#top", "", false)]
    #[case("http://example.org", "", true)]
    fn test_is_external(#[case] href: &str, #[case] base: &str, #[case] expected: bool) {
        assert_eq!(is_external(href, base), expected);
    }

    #[test]
    fn test_existing_attributes_are_kept() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let plain = doc.element(body, "a", &[]);
        doc.set_attribute(&plain, "href", "https://crates.io");
        let custom = doc.element(body, "a", &[]);
        doc.set_attribute(&custom, "href", "https://github.com");
        doc.set_attribute(&custom, "target", "_self");
        let internal = doc.element(body, "a", &[]);
        doc.set_attribute(&internal, "href", "https://example.com/about/");

        let count = open_external_links(&mut doc, "https://example.com/");

        assert_eq!(count, 2);
        assert_eq!(doc.attribute(&plain, "target").as_deref(), Some("_blank"));
        assert_eq!(doc.attribute(&plain, "rel").as_deref(), Some("noopener"));
        assert_eq!(doc.attribute(&custom, "target").as_deref(), Some("_self"));
        assert_eq!(doc.attribute(&internal, "target"), None);
    }

    #[rstest]
    #[case(PAGE, "setup", "https://example.com/posts/hello/#setup")]
    #[case("https://example.com/a/#old", "new", "https://example.com/a/#new")]
    fn test_heading_url(#[case] page: &str, #[case] id: &str, #[case] expected: &str) {
        assert_eq!(heading_url(page, id), expected);
    }

    #[test]
    fn test_headings_with_ids_get_anchors() {
        let (mut doc, post) = post();
        let title = doc.element(post, "h1", &[]);
        doc.set_attribute(&title, "id", "title");
        let setup = doc.element(post, "h2", &[]);
        doc.set_attribute(&setup, "id", "setup");
        let bare = doc.element(post, "h3", &[]);
        let usage = doc.element(post, "h4", &[]);
        doc.set_attribute(&usage, "id", "usage");

        assert_eq!(anchor_headings(&mut doc), 2);
        assert_eq!(anchor_headings(&mut doc), 0);

        assert!(doc.children(&title).is_empty());
        assert!(doc.children(&bare).is_empty());
        assert!(doc.has_class(&setup, LINK_OWNER));
        insta::assert_snapshot!(
            doc.outer_html(setup),
            @r#"<h2 class="link_owner" id="setup"><a class="link icon" href="https://example.com/posts/hello/#setup"></a></h2>"#
        );
    }

    #[test]
    fn test_heading_link_click_copies_and_shows_feedback() {
        let (mut doc, post) = post();
        let heading = doc.element(post, "h2", &[]);
        doc.set_attribute(&heading, "id", "setup");
        anchor_headings(&mut doc);
        let anchor = doc.children(&heading)[0];
        let icon = doc.element(anchor, "svg", &[]);
        let mut clipboard = MemoryClipboard::new();
        let mut queue = TaskQueue::new();

        let outcome = handle_click(&mut doc, &mut clipboard, &mut queue, &icon);

        assert_eq!(outcome, ClickOutcome::prevented());
        assert_eq!(clipboard.contents(), Some("https://example.com/posts/hello/#setup"));
        let notes = doc.elements_by_class(&anchor, YANKED);
        assert_eq!(notes.len(), 1);
        assert_eq!(doc.text_content(&notes[0]), "Link Copied");

        // A second click while the note is up does not stack another one.
        handle_click(&mut doc, &mut clipboard, &mut queue, &anchor);
        assert_eq!(doc.elements_by_class(&anchor, YANKED).len(), 1);
        assert_eq!(clipboard.writes(), 2);
    }

    #[test]
    fn test_feedback_is_removed_after_three_seconds() {
        let (mut doc, post) = post();
        let yank = doc.element(post, "a", &[YANK]);
        doc.set_attribute(&yank, "href", "https://example.com/feed.xml");
        let mut clipboard = MemoryClipboard::new();
        let mut queue = TaskQueue::new();
        let settled = doc.node_count();

        let outcome = handle_click(&mut doc, &mut clipboard, &mut queue, &yank);

        assert_eq!(outcome, ClickOutcome::prevented());
        assert_eq!(clipboard.contents(), Some("https://example.com/feed.xml"));
        assert_eq!(doc.elements_by_class(&yank, YANKED).len(), 1);

        queue.advance(FEEDBACK_DELAY - Duration::from_millis(1), &mut doc);
        assert_eq!(doc.elements_by_class(&yank, YANKED).len(), 1);

        queue.advance(Duration::from_millis(1), &mut doc);
        assert!(doc.elements_by_class(&yank, YANKED).is_empty());
        assert_eq!(doc.node_count(), settled);

        handle_click(&mut doc, &mut clipboard, &mut queue, &yank);
        assert_eq!(doc.elements_by_class(&yank, YANKED).len(), 1);
    }

    #[test]
    fn test_share_icon_copies_page_address() {
        let (mut doc, post) = post();
        let icon = doc.element(post, "span", &[COPY]);
        let glyph = doc.element(icon, "svg", &[]);
        let mut clipboard = MemoryClipboard::new();

        let outcome = handle_click(&mut doc, &mut clipboard, &mut TaskQueue::new(), &glyph);

        assert_eq!(outcome, ClickOutcome::handled());
        assert_eq!(clipboard.contents(), Some(PAGE));
        assert!(doc.has_class(&icon, COPY_DONE));
    }

    #[test]
    fn test_excerpt_share_icon_copies_post_card_link() {
        let (mut doc, post) = post();
        let card = doc.element(post, "a", &[POST_CARD]);
        doc.set_attribute(&card, "href", "https://example.com/posts/other/");
        let excerpt = doc.element(post, "div", &[EXCERPT]);
        let icon = doc.element(excerpt, "span", &[COPY, POST_COPY]);
        let mut clipboard = MemoryClipboard::new();

        handle_click(&mut doc, &mut clipboard, &mut TaskQueue::new(), &icon);

        assert_eq!(clipboard.contents(), Some("https://example.com/posts/other/"));
        assert!(doc.has_class(&icon, COPY_DONE));
    }

    #[test]
    fn test_excerpt_without_card_copies_nothing() {
        let (mut doc, post) = post();
        doc.element(post, "p", &[]);
        let excerpt = doc.element(post, "div", &[EXCERPT]);
        let icon = doc.element(excerpt, "span", &[COPY, POST_COPY]);
        let mut clipboard = MemoryClipboard::new();

        let outcome = handle_click(&mut doc, &mut clipboard, &mut TaskQueue::new(), &icon);

        assert_eq!(outcome, ClickOutcome::handled());
        assert_eq!(clipboard.writes(), 0);
        assert!(!doc.has_class(&icon, COPY_DONE));
    }

    #[test]
    fn test_failed_copy_shows_no_feedback() {
        let (mut doc, post) = post();
        let yank = doc.element(post, "a", &[YANK]);
        doc.set_attribute(&yank, "href", "https://example.com/feed.xml");
        let mut clipboard = MemoryClipboard::failing(ClipboardError::Denied);
        let mut queue = TaskQueue::new();

        let outcome = handle_click(&mut doc, &mut clipboard, &mut queue, &yank);

        assert_eq!(outcome, ClickOutcome::prevented());
        assert!(doc.elements_by_class(&yank, YANKED).is_empty());
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_unrelated_click_is_ignored() {
        let (mut doc, post) = post();
        let paragraph = doc.element(post, "p", &[]);
        let mut clipboard = MemoryClipboard::new();

        let outcome = handle_click(&mut doc, &mut clipboard, &mut TaskQueue::new(), &paragraph);

        assert_eq!(outcome, ClickOutcome::ignored());
        assert_eq!(clipboard.writes(), 0);
    }
}
