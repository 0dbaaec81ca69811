//! Terminal geometry for the in-memory document.
//!
//! Rows and columns are scaled to pixels so the engine's clamp arithmetic runs
//! unchanged: a line's `offset_top` is the number of rows above it times
//! [`ROW_HEIGHT`].

use codepanel_engine::dom::Layout;
use codepanel_engine::{Document, MemoryDocument, NodeId, classes};

pub const ROW_HEIGHT: i32 = 16;
pub const COLUMN_WIDTH: i32 = 8;

/// Width of the line-number gutter, including its trailing space.
pub fn gutter_width(line_count: usize, numbers_shown: bool) -> usize {
    if numbers_shown {
        line_count.max(1).to_string().len() + 1
    } else {
        0
    }
}

/// Rows a line of `width` characters occupies in `columns` columns.
pub fn rows_for(width: usize, columns: usize, wrapped: bool) -> usize {
    if wrapped && width > columns {
        width.div_ceil(columns)
    } else {
        1
    }
}

fn to_pixels(units: usize, scale: i32) -> i32 {
    i32::try_from(units)
        .unwrap_or(i32::MAX)
        .saturating_mul(scale)
}

/// Lays code blocks out in a fixed number of terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalLayout {
    columns: usize,
}

impl TerminalLayout {
    pub fn new(columns: u16) -> Self {
        Self {
            columns: usize::from(columns.max(1)),
        }
    }

    /// Character widths of each content line, gutter included.
    fn line_widths(doc: &MemoryDocument, code: NodeId) -> Vec<usize> {
        let numbers = doc.elements_by_class(&code, classes::LINE_NUMBER);
        let shown = numbers
            .first()
            .is_some_and(|line| !doc.has_class(line, classes::LINES_HIDDEN));
        let gutter = gutter_width(numbers.len(), shown);

        doc.elements_by_class(&code, classes::LINE_CONTENT)
            .iter()
            .map(|line| gutter + doc.text_content(line).trim_end_matches('\n').chars().count())
            .collect()
    }

    fn rows_above(&self, doc: &MemoryDocument, line: NodeId) -> Option<usize> {
        let code = doc.parent(&line)?;
        let pre = doc.parent(&code)?;
        let wrapped = doc.has_class(&pre, classes::WRAPPED);
        let index = doc
            .elements_by_class(&code, classes::LINE_NUMBER)
            .iter()
            .position(|candidate| *candidate == line)?;

        Some(
            Self::line_widths(doc, code)
                .into_iter()
                .take(index)
                .map(|width| rows_for(width, self.columns, wrapped))
                .sum(),
        )
    }
}

impl Layout for TerminalLayout {
    fn offset_top(&self, doc: &MemoryDocument, node: NodeId) -> Option<i32> {
        if !doc.has_class(&node, classes::LINE_NUMBER) {
            return None;
        }
        self.rows_above(doc, node)
            .map(|rows| to_pixels(rows, ROW_HEIGHT))
    }

    fn offset_width(&self, doc: &MemoryDocument, node: NodeId) -> Option<i32> {
        if doc.tag_name(&node) == "code" {
            let widest = Self::line_widths(doc, node).into_iter().max().unwrap_or(0);
            return Some(to_pixels(widest, COLUMN_WIDTH));
        }
        doc.has_class(&node, classes::HIGHLIGHT)
            .then(|| to_pixels(self.columns, COLUMN_WIDTH))
    }
}
