use codepanel_engine::behaviors::{BehaviorReport, color_mode, footer, links, nav, tags};
use codepanel_engine::page::read_settings;
use codepanel_engine::{
    ClickOutcome, CodeBlockMarkup, Document, LanguageTag, MemoryClipboard, MemoryDocument,
    NodeId, PageEnhancer, PlainHighlighter, TaskQueue, schedule,
};
use pretty_assertions::assert_eq;

#[test]
fn test_enhanced_block_markup() {
    let mut doc = MemoryDocument::new();
    let body = doc.body().unwrap();
    CodeBlockMarkup::new(&PlainHighlighter, LanguageTag::parse("sh"), "echo hi")
        .mount(&mut doc, &body)
        .unwrap();
    let mut enhancer = PageEnhancer::from_page();

    enhancer.enhance(&mut doc, &mut TaskQueue::new());

    let wrapper = doc.first_child(&body).unwrap();
    insta::assert_snapshot!(
        doc.outer_html(wrapper),
        @r##"<div class="highlight_wrap"><div class="highlight"><pre class="chroma"><code class="language-sh" data-lang="sh"><span class="ln">1</span><span class="cl">echo hi</span></code></pre></div><div class="panel_box"><a class="icon panel_icon panel_copy" href="#" title="Copy Code" data-icon="copy"></a><a class="icon panel_icon panel_lines" href="#" title="Toggle Line Numbers" data-icon="order"></a><a class="icon panel_icon panel_wrap panel_hide" href="#" title="Toggle Line Wrap" data-icon="carly"></a><a class="icon panel_icon panel_expand panel_hide" href="#" title="Toggle code block expand" data-icon="expand"></a></div><div class="lang">bash</div></div>"##
    );
}

#[test]
fn test_load_time_behaviors_run_with_page_settings() {
    let mut doc = MemoryDocument::new();
    let root = doc.root();
    let body = doc.body().unwrap();
    doc.set_attribute(&body, "data-url", "https://example.com/");
    doc.set_attribute(&root, "data-figures", "true");

    let post = doc.element(body, "article", &["post_content"]);
    let link = doc.element(post, "a", &[]);
    doc.set_attribute(&link, "href", "https://docs.rs/");
    let own = doc.element(post, "a", &[]);
    doc.set_attribute(&own, "href", "https://example.com/tags/");
    doc.element(post, "table", &[]);
    let image = doc.element(post, "img", &[]);
    doc.set_attribute(&image, "alt", "Request flow");
    let heading = doc.element(post, "h2", &[]);
    doc.set_attribute(&heading, "id", "flow");
    let year = doc.element(body, "span", &[footer::YEAR]);

    let mut enhancer = PageEnhancer::from_page().with_year(2026);
    let report = enhancer.enhance(&mut doc, &mut TaskQueue::new());

    assert_eq!(
        report.behaviors,
        BehaviorReport {
            external_links: 1,
            heading_links: 1,
            tables: 1,
            captions: 1,
            years: 1,
        }
    );
    assert_eq!(doc.text_content(&year), "2026");
    let caption = doc.next_sibling(&image).unwrap();
    assert_eq!(doc.text_content(&caption), "Figure 1: Request flow");
}

#[test]
fn test_single_listener_reaches_page_behaviors() {
    let mut doc = MemoryDocument::new();
    let root = doc.root();
    let body = doc.body().unwrap();
    let mode = doc.element(body, "button", &[color_mode::TOGGLE]);
    let nav_root = doc.element(body, "nav", &[nav::NAV]);
    let nav_toggle = doc.element(nav_root, "a", &[nav::TOGGLE]);
    let tag_toggle = doc.element(body, "a", &[tags::EXPAND]);
    let widget = doc.element(body, "div", &[]);

    let mut enhancer = PageEnhancer::from_page();
    let mut queue = TaskQueue::new();
    let mut clipboard = MemoryClipboard::new();
    enhancer.enhance(&mut doc, &mut queue);

    let mut click = |doc: &mut MemoryDocument, target: NodeId| {
        enhancer.handle_click(doc, &mut clipboard, &mut queue, &target)
    };

    assert_eq!(click(&mut doc, mode), ClickOutcome::handled());
    assert_eq!(doc.attribute(&root, "data-mode").as_deref(), Some("dim"));

    assert_eq!(click(&mut doc, nav_toggle), ClickOutcome::prevented());
    assert!(doc.has_class(&root, nav::OPEN));

    click(&mut doc, tag_toggle);
    assert!(doc.has_class(&widget, tags::OPEN));
    // Clicking outside the nav also closed the drawer.
    assert!(!doc.has_class(&root, nav::OPEN));
}

#[test]
fn test_settings_written_after_creation_are_used() {
    // The enhancer exists before the page template has set its attributes,
    // as it does when the module loads ahead of the document.
    let mut enhancer = PageEnhancer::from_page();
    let mut doc = MemoryDocument::new();
    let body = doc.body().unwrap();
    let source: String = (0..12).map(|i| format!("echo {i}\n")).collect();
    let code = CodeBlockMarkup::new(&PlainHighlighter, LanguageTag::parse("sh"), &source)
        .mount(&mut doc, &body)
        .unwrap();
    for (index, line) in doc.elements_by_class(&code, "ln").into_iter().enumerate() {
        doc.set_offset_top(line, 20 * index as i32);
    }
    doc.set_attribute(&body, "data-code", "4");
    doc.set_attribute(&body, "data-lines", "FALSE");

    let report = enhancer.enhance(&mut doc, &mut TaskQueue::new());

    assert_eq!(enhancer.settings(), &read_settings(&doc));
    assert_eq!(enhancer.settings().max_lines, 4);
    assert_eq!(enhancer.settings().lines_by_default, Some(false));
    assert_eq!(report.clamped, 1);
    let block = enhancer.blocks().get(0).unwrap();
    assert!(!block.state.line_numbers);
    assert_eq!(block.state.constrained_height, Some(80));
}

#[test]
fn test_heading_link_copy_through_single_listener() {
    let mut doc = MemoryDocument::new();
    doc.set_location("https://example.com/posts/intro/");
    let body = doc.body().unwrap();
    let post = doc.element(body, "article", &["post_content"]);
    let heading = doc.element(post, "h3", &[]);
    doc.set_attribute(&heading, "id", "install");

    let mut enhancer = PageEnhancer::from_page();
    let mut queue = TaskQueue::new();
    let mut clipboard = MemoryClipboard::new();
    enhancer.enhance(&mut doc, &mut queue);
    let anchor = doc.elements_by_class(&heading, links::LINK)[0];

    let outcome = enhancer.handle_click(&mut doc, &mut clipboard, &mut queue, &anchor);

    assert_eq!(outcome, ClickOutcome::prevented());
    assert_eq!(
        clipboard.contents(),
        Some("https://example.com/posts/intro/#install")
    );
    assert_eq!(doc.elements_by_class(&anchor, links::YANKED).len(), 1);

    queue.advance(schedule::FEEDBACK_DELAY, &mut doc);
    assert!(doc.elements_by_class(&anchor, links::YANKED).is_empty());
}
