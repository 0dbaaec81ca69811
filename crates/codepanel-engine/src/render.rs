//! Highlighter adapter: turns source text into the line-numbered block markup
//! the rest of the pipeline operates on.
//!
//! ```text
//! div.highlight
//!   pre.chroma
//!     code.language-<name>[data-lang]
//!       span.ln  span.cl   (one pair per line)
//! ```

use crate::classes;
use crate::dom::Document;
use crate::language::LanguageTag;

/// A run of highlighted text. `class` is the token class, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: Option<String>,
    pub text: String,
}

impl Token {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            class: None,
            text: text.into(),
        }
    }
}

pub type HighlightedLine = Vec<Token>;

/// Tokenises source text. Implementations keep each line's trailing newline so
/// that concatenating every token reproduces the input exactly.
pub trait Highlighter {
    fn highlight(&self, language: &LanguageTag, code: &str) -> Vec<HighlightedLine>;
}

/// Splits into lines without colouring anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, _language: &LanguageTag, code: &str) -> Vec<HighlightedLine> {
        code.split_inclusive('\n')
            .map(|line| vec![Token::plain(line)])
            .collect()
    }
}

/// Markup for one highlighted block, ready to serialise or mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockMarkup {
    pub language: LanguageTag,
    pub lines: Vec<HighlightedLine>,
}

impl CodeBlockMarkup {
    pub fn new<H: Highlighter + ?Sized>(
        highlighter: &H,
        language: LanguageTag,
        code: &str,
    ) -> Self {
        let lines = highlighter.highlight(&language, code);
        Self { language, lines }
    }

    pub fn to_html(&self) -> String {
        let lang = html_escape::encode_double_quoted_attribute(self.language.name());
        let mut html = format!(
            r#"<div class="{}"><pre class="chroma"><code class="language-{lang}" data-lang="{lang}">"#,
            classes::HIGHLIGHT
        );
        for (index, line) in self.lines.iter().enumerate() {
            html.push_str(&format!(
                r#"<span class="{}">{}</span><span class="{}">"#,
                classes::LINE_NUMBER,
                index + 1,
                classes::LINE_CONTENT
            ));
            for token in line {
                let text = html_escape::encode_text(&token.text);
                match &token.class {
                    Some(class) => html.push_str(&format!(r#"<span class="{class}">{text}</span>"#)),
                    None => html.push_str(&text),
                }
            }
            html.push_str("</span>");
        }
        html.push_str("</code></pre></div>");
        html
    }

    /// Build the markup under `parent`; returns the `code` element.
    ///
    /// Nothing is attached to `parent` unless every element was created.
    pub fn mount<D: Document>(&self, doc: &mut D, parent: &D::Node) -> Option<D::Node> {
        let highlight = doc.create_element("div")?;
        doc.add_class(&highlight, classes::HIGHLIGHT);
        let pre = doc.create_element("pre")?;
        doc.add_class(&pre, "chroma");
        let code = doc.create_element("code")?;
        doc.add_class(&code, &self.language.class_name());
        doc.set_data(&code, "lang", self.language.name());

        for (index, line) in self.lines.iter().enumerate() {
            let number = doc.create_element("span")?;
            doc.add_class(&number, classes::LINE_NUMBER);
            doc.set_text(&number, &(index + 1).to_string());
            doc.append_child(&code, &number);

            let content = doc.create_element("span")?;
            doc.add_class(&content, classes::LINE_CONTENT);
            for token in line {
                match &token.class {
                    Some(class) => {
                        let span = doc.create_element("span")?;
                        doc.add_class(&span, class);
                        doc.set_text(&span, &token.text);
                        doc.append_child(&content, &span);
                    }
                    None => doc.append_text(&content, &token.text),
                }
            }
            doc.append_child(&code, &content);
        }

        doc.append_child(&pre, &code);
        doc.append_child(&highlight, &pre);
        doc.append_child(parent, &highlight);
        Some(code)
    }
}
