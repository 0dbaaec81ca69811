use crate::dom::Document;

pub const SCROLLABLE: &str = "scrollable";

/// Wrap every table in `div.scrollable` so wide tables scroll on their own.
pub fn wrap_tables<D: Document>(doc: &mut D) -> usize {
    let root = doc.root();
    let tables: Vec<_> = doc
        .elements_by_tag(&root, "table")
        .into_iter()
        .filter(|table| {
            doc.parent(table)
                .is_none_or(|parent| !doc.has_class(&parent, SCROLLABLE))
        })
        .collect();

    let mut wrapped = 0;
    for table in &tables {
        let Some(wrapper) = doc.create_element("div") else {
            continue;
        };
        doc.add_class(&wrapper, SCROLLABLE);
        doc.wrap(table, &wrapper);
        wrapped += 1;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    #[test]
    fn test_tables_are_wrapped_once() {
        let mut doc = MemoryDocument::new();
        let body = doc.body().unwrap();
        let table = doc.element(body, "table", &[]);

        assert_eq!(wrap_tables(&mut doc), 1);
        assert_eq!(wrap_tables(&mut doc), 0);

        let wrapper = doc.parent(&table).unwrap();
        assert!(doc.has_class(&wrapper, SCROLLABLE));
        assert_eq!(doc.parent(&wrapper), Some(body));
    }
}
