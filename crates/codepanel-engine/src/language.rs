//! Language annotations on rendered code blocks.
//!
//! The highlighter marks each block with a `language-<name>` class and a
//! `data-lang` attribute; `fallback` is what it writes when it could not
//! detect anything.

use std::sync::LazyLock;

use regex::Regex;

use crate::classes;
use crate::dom::Document;

/// Name the highlighter uses when no language was detected.
pub const FALLBACK: &str = "fallback";

static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^language-([A-Za-z0-9_+#.-]+)$").expect("valid regex"));

/// Short codes shown under their long display name.
const ALIASES: &[(&str, &str)] = &[
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("yml", "yaml"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("py", "python"),
    ("rs", "rust"),
    ("md", "markdown"),
    ("golang", "go"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageTag {
    Named(String),
    Fallback,
}

impl LanguageTag {
    /// Normalise a fence info string or `data-lang` value.
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        if name.is_empty() || name == FALLBACK {
            LanguageTag::Fallback
        } else {
            LanguageTag::Named(name)
        }
    }

    /// Language from the first `language-*` class, if any.
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Option<Self> {
        classes.iter().find_map(|class| {
            LANGUAGE_CLASS
                .captures(class.as_ref())
                .map(|captures| Self::parse(&captures[1]))
        })
    }

    /// Language of a rendered `code` element: `data-lang` wins over the class.
    pub fn detect<D: Document>(doc: &D, code: &D::Node) -> Self {
        doc.data(code, "lang")
            .map(|lang| Self::parse(&lang))
            .or_else(|| Self::from_classes(&doc.class_list(code)))
            .unwrap_or(LanguageTag::Fallback)
    }

    pub fn name(&self) -> &str {
        match self {
            LanguageTag::Named(name) => name,
            LanguageTag::Fallback => FALLBACK,
        }
    }

    pub fn class_name(&self) -> String {
        format!("language-{}", self.name())
    }

    /// Text for the language badge; the fallback gets none.
    pub fn label(&self) -> Option<&str> {
        match self {
            LanguageTag::Named(name) => Some(display_label(name)),
            LanguageTag::Fallback => None,
        }
    }
}

/// Resolve a short language code to the name shown to readers.
pub fn display_label(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, label)| *label)
        .unwrap_or(name)
}

/// Append the `div.lang` badge to a block's wrapper.
pub fn append_label<D: Document>(doc: &mut D, wrapper: &D::Node, language: &LanguageTag) {
    let Some(label) = language.label() else {
        return;
    };
    let Some(badge) = doc.create_element("div") else {
        return;
    };
    doc.add_class(&badge, classes::LANG_LABEL);
    doc.set_text(&badge, label);
    doc.append_child(wrapper, &badge);
}
