//! Line-height constraint: clamp long blocks to a fixed number of lines.
//!
//! The clamp point is the offset of the line at index `max_lines`, i.e. the
//! first line past the configured count.

use std::fmt;

use log::debug;

use crate::block::{CodeBlock, MaxHeight};
use crate::classes;
use crate::dom::Document;
use crate::panel::ActionButton;
use crate::schedule::{Deferred, REVEAL_DELAY, Scheduler};

const ELLIPSIS_TITLE: &str = "Toggle code block expand";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampOutcome {
    /// The block has no line past the limit.
    WithinLimit,
    /// The boundary line reports a zero offset; nothing was changed.
    NotLaidOut,
    /// The block is expanded, so the clamp was left alone.
    Expanded,
    /// The block was clamped to this many pixels.
    Clamped(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightConstraint {
    max_lines: usize,
}

impl HeightConstraint {
    /// `max_lines` of zero is treated as one.
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn exceeds(&self, line_count: usize) -> bool {
        line_count > self.max_lines
    }

    /// Measure the boundary line and clamp the block to its offset.
    ///
    /// Re-run whenever line geometry changes (wrap or line-number toggles).
    /// While the block is expanded neither the record nor the page changes.
    pub fn restrain<D, N>(&self, doc: &mut D, block: &mut CodeBlock<N>) -> ClampOutcome
    where
        D: Document<Node = N>,
        N: Clone + PartialEq + fmt::Debug,
    {
        let lines = block.lines(doc);
        let Some(boundary) = lines.get(self.max_lines) else {
            return ClampOutcome::WithinLimit;
        };

        let offset = doc.offset_top(boundary);
        if offset == 0 {
            debug!("boundary line of {:?} not laid out yet", block.code);
            return ClampOutcome::NotLaidOut;
        }
        if block.state.expanded {
            return ClampOutcome::Expanded;
        }

        block.state.constrained_height = Some(offset);
        block.state.max_height = Some(MaxHeight::Pixels(offset));
        block.render(doc);
        debug!("clamped {:?} to {offset}px", block.code);
        ClampOutcome::Clamped(offset)
    }

    /// First pass over a freshly discovered block: add the ellipsis
    /// affordance, schedule the expand button reveal and clamp.
    pub fn collapse<D, N, S>(
        &self,
        doc: &mut D,
        block: &mut CodeBlock<N>,
        scheduler: &mut S,
    ) -> ClampOutcome
    where
        D: Document<Node = N>,
        N: Clone + PartialEq + fmt::Debug,
        S: Scheduler<N>,
    {
        if !self.exceeds(block.lines(doc).len()) {
            return ClampOutcome::WithinLimit;
        }

        if let Some(ellipsis) = doc.create_element("div") {
            doc.add_class(&ellipsis, classes::PANEL_EXPAND);
            doc.add_class(&ellipsis, classes::PANEL_FROM);
            doc.set_attribute(&ellipsis, "title", ELLIPSIS_TITLE);
            doc.set_text(&ellipsis, "...");
            doc.append_child(&block.highlight, &ellipsis);
        }

        if let Some(panel) = &block.panel {
            scheduler.defer(
                REVEAL_DELAY,
                Deferred::Reveal {
                    node: panel.button(ActionButton::Expand).clone(),
                },
            );
        }

        self.restrain(doc, block)
    }
}
