//! Footer copyright year.

use crate::dom::Document;

pub const YEAR: &str = "year";

/// Write `year` into every `.year` element. Returns how many were updated.
pub fn stamp_year<D: Document>(doc: &mut D, year: i32) -> usize {
    let root = doc.root();
    let targets = doc.elements_by_class(&root, YEAR);
    let text = year.to_string();
    for target in &targets {
        doc.set_text(target, &text);
    }
    targets.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_year_replaces_placeholder() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let footer = doc.element(body, "footer", &[]);
        let year = doc.element(footer, "span", &[YEAR]);
        doc.text(year, "2019");

        assert_eq!(stamp_year(&mut doc, 2026), 1);
        assert_eq!(doc.text_content(&footer), "2026");
    }
}
