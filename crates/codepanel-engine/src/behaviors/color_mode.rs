use crate::click::ClickOutcome;
use crate::dom::Document;

pub const TOGGLE: &str = "color_choice";
pub const ANIMATE: &str = "color_animate";
const MODE_ATTRIBUTE: &str = "data-mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Lit,
    Dim,
}

impl ColorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "lit" => Some(ColorMode::Lit),
            "dim" => Some(ColorMode::Dim),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Lit => "lit",
            ColorMode::Dim => "dim",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Lit => ColorMode::Dim,
            ColorMode::Dim => ColorMode::Lit,
        }
    }
}

/// Mode currently on the root element; an unset page counts as lit.
pub fn current<D: Document>(doc: &D) -> ColorMode {
    doc.attribute(&doc.root(), MODE_ATTRIBUTE)
        .and_then(|value| ColorMode::parse(&value))
        .unwrap_or(ColorMode::Lit)
}

pub fn handle_click<D: Document>(doc: &mut D, target: &D::Node) -> ClickOutcome {
    if !doc.has_class(target, TOGGLE) {
        return ClickOutcome::ignored();
    }
    doc.add_class(target, ANIMATE);
    let next = current(doc).toggled();
    let root = doc.root();
    doc.set_attribute(&root, MODE_ATTRIBUTE, next.as_str());
    ClickOutcome::handled()
}
