//! Block discovery: find the `code` elements that get an action panel.

use crate::classes;
use crate::dom::Document;

/// Tag every class-less `code` element with the `noClass` sentinel.
///
/// Returns how many elements were tagged.
pub fn mark_unannotated<D: Document>(doc: &mut D) -> usize {
    let root = doc.root();
    let bare: Vec<_> = doc
        .elements_by_tag(&root, "code")
        .into_iter()
        .filter(|code| doc.class_list(code).is_empty())
        .collect();

    for code in &bare {
        doc.add_class(code, classes::NO_CLASS);
    }
    bare.len()
}

/// Annotated `code` elements in document order.
///
/// Elements carrying the sentinel are excluded, as are any still without a
/// class (i.e. when [`mark_unannotated`] has not run yet).
pub fn discover<D: Document>(doc: &D) -> Vec<D::Node> {
    let root = doc.root();
    doc.elements_by_tag(&root, "code")
        .into_iter()
        .filter(|code| {
            let names = doc.class_list(code);
            !names.is_empty() && !names.iter().any(|name| name == classes::NO_CLASS)
        })
        .collect()
}
