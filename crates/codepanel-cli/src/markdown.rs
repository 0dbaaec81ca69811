//! Markdown to HTML with code blocks in highlighter markup.

use codepanel_config::{AttributeOwner, SiteConfig};
use codepanel_engine::{CodeBlockMarkup, Highlighter, LanguageTag};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

/// A code block lifted out of a Markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    pub language: LanguageTag,
    pub code: String,
}

enum Item<'a> {
    Block(SourceBlock),
    Event(Event<'a>),
}

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

fn language_of(kind: &CodeBlockKind<'_>) -> LanguageTag {
    match kind {
        // Only the first word of the info string names the language.
        CodeBlockKind::Fenced(info) => {
            LanguageTag::parse(info.split_whitespace().next().unwrap_or_default())
        }
        CodeBlockKind::Indented => LanguageTag::Fallback,
    }
}

/// Parser events with each code block collapsed into a single item.
fn items(markdown: &str) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut open: Option<SourceBlock> = None;

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                open = Some(SourceBlock {
                    language: language_of(&kind),
                    code: String::new(),
                });
            }
            Event::Text(text) if open.is_some() => {
                if let Some(block) = open.as_mut() {
                    block.code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = open.take() {
                    items.push(Item::Block(block));
                }
            }
            other => items.push(Item::Event(other)),
        }
    }
    items
}

/// Every code block in the document, in order.
pub fn code_blocks(markdown: &str) -> Vec<SourceBlock> {
    items(markdown)
        .into_iter()
        .filter_map(|item| match item {
            Item::Block(block) => Some(block),
            Item::Event(_) => None,
        })
        .collect()
}

/// Render the Markdown body, replacing code blocks with highlighter markup.
pub fn render_body<H: Highlighter + ?Sized>(markdown: &str, highlighter: &H) -> String {
    let events = items(markdown).into_iter().map(|item| match item {
        Item::Block(block) => {
            let markup = CodeBlockMarkup::new(highlighter, block.language, &block.code);
            Event::Html(format!("{}\n", markup.to_html()).into())
        }
        Item::Event(event) => event,
    });

    let mut body = String::new();
    html::push_html(&mut body, events);
    body
}

fn attributes(config: &SiteConfig, owner: AttributeOwner) -> String {
    config
        .attributes_for(owner)
        .into_iter()
        .map(|(name, value)| {
            format!(
                r#" {name}="{}""#,
                html_escape::encode_double_quoted_attribute(&value)
            )
        })
        .collect()
}

/// A standalone page carrying the page-level attributes the client reads.
pub fn render_page<H: Highlighter + ?Sized>(
    title: &str,
    markdown: &str,
    config: &SiteConfig,
    highlighter: &H,
) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html{root}>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body{body}>\n\
         <div class=\"post_content\">\n\
         {content}\
         </div>\n\
         </body>\n\
         </html>\n",
        root = attributes(config, AttributeOwner::Root),
        title = html_escape::encode_text(title),
        body = attributes(config, AttributeOwner::Body),
        content = render_body(markdown, highlighter),
    )
}
