//! Per-block state records and the registry that owns them.
//!
//! The [`BlockState`] record is the source of truth for a block's line-number,
//! wrap and expand state. Class presence and inline styles on the page are a
//! projection of it, written by [`CodeBlock::render`] and never read back
//! after discovery.

use std::fmt;

use crate::classes;
use crate::dom::Document;
use crate::error::EngineError;
use crate::language::LanguageTag;
use crate::panel::ActionPanel;

/// Inline `max-height` applied to a block's `code` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxHeight {
    Pixels(i32),
    FullViewport,
}

impl MaxHeight {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value == classes::FULL_VIEWPORT {
            return Some(MaxHeight::FullViewport);
        }
        value
            .strip_suffix("px")
            .and_then(|pixels| pixels.trim().parse().ok())
            .map(MaxHeight::Pixels)
    }

    pub fn is_pixels(self) -> bool {
        matches!(self, MaxHeight::Pixels(_))
    }
}

impl fmt::Display for MaxHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxHeight::Pixels(pixels) => write!(f, "{pixels}px"),
            MaxHeight::FullViewport => f.write_str(classes::FULL_VIEWPORT),
        }
    }
}

/// Display state of one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    pub line_numbers: bool,
    pub wrapped: bool,
    pub expanded: bool,
    /// Offset of the first hidden line, recorded when the block is clamped.
    pub constrained_height: Option<i32>,
    /// Cap currently applied to the block, if any.
    pub max_height: Option<MaxHeight>,
}

impl Default for BlockState {
    fn default() -> Self {
        Self {
            line_numbers: true,
            wrapped: false,
            expanded: false,
            constrained_height: None,
            max_height: None,
        }
    }
}

/// A discovered code block and the elements around it.
#[derive(Debug, Clone)]
pub struct CodeBlock<N> {
    pub code: N,
    pub pre: N,
    pub highlight: N,
    pub language: LanguageTag,
    pub state: BlockState,
    /// Present once the block has been given its action panel.
    pub wrapper: Option<N>,
    pub panel: Option<ActionPanel<N>>,
}

impl<N: Clone + PartialEq + fmt::Debug> CodeBlock<N> {
    /// Resolve the `pre` and `.highlight` ancestors of a `code` element and
    /// read its initial state from the markup.
    pub fn locate<D: Document<Node = N>>(doc: &D, code: N) -> Result<Self, EngineError> {
        let pre = doc.parent(&code).ok_or(EngineError::MissingPre)?;
        if doc.tag_name(&pre) != "pre" {
            return Err(EngineError::MissingPre);
        }
        let highlight = doc
            .parent(&pre)
            .filter(|parent| doc.has_class(parent, classes::HIGHLIGHT))
            .ok_or(EngineError::MissingHighlight)?;

        let mut block = Self {
            language: LanguageTag::detect(doc, &code),
            code,
            pre,
            highlight,
            state: BlockState::default(),
            wrapper: None,
            panel: None,
        };
        block.state = block.read_state(doc);
        Ok(block)
    }

    /// Line-number cells, one per rendered line.
    pub fn lines<D: Document<Node = N>>(&self, doc: &D) -> Vec<N> {
        doc.elements_by_class(&self.code, classes::LINE_NUMBER)
    }

    /// Whether the block's natural width fits inside its highlight container.
    pub fn fits<D: Document<Node = N>>(&self, doc: &D) -> bool {
        doc.offset_width(&self.code) <= doc.offset_width(&self.highlight)
    }

    /// Write the state record onto the page.
    pub fn render<D: Document<Node = N>>(&self, doc: &mut D) {
        for line in self.lines(doc) {
            doc.set_class(&line, classes::LINES_HIDDEN, !self.state.line_numbers);
        }
        doc.set_class(&self.pre, classes::WRAPPED, self.state.wrapped);
        doc.set_class(&self.highlight, classes::PANEL_EXPANDED, self.state.expanded);

        if let Some(height) = self.state.constrained_height {
            doc.set_data(&self.code, classes::HEIGHT_DATA, &format!("{height}px"));
        }
        if let Some(max_height) = self.state.max_height {
            doc.set_style(&self.code, classes::MAX_HEIGHT, &max_height.to_string());
        }
    }

    fn read_state<D: Document<Node = N>>(&self, doc: &D) -> BlockState {
        let line_numbers = self
            .lines(doc)
            .first()
            .is_none_or(|line| !doc.has_class(line, classes::LINES_HIDDEN));

        BlockState {
            line_numbers,
            wrapped: doc.has_class(&self.pre, classes::WRAPPED),
            expanded: doc.has_class(&self.highlight, classes::PANEL_EXPANDED),
            constrained_height: doc
                .data(&self.code, classes::HEIGHT_DATA)
                .and_then(|value| MaxHeight::parse(&value))
                .and_then(|height| match height {
                    MaxHeight::Pixels(pixels) => Some(pixels),
                    MaxHeight::FullViewport => None,
                }),
            max_height: doc
                .style(&self.code, classes::MAX_HEIGHT)
                .and_then(|value| MaxHeight::parse(&value)),
        }
    }
}

/// The working set of code blocks on a page, in document order.
#[derive(Debug, Clone)]
pub struct BlockRegistry<N> {
    blocks: Vec<CodeBlock<N>>,
}

impl<N> Default for BlockRegistry<N> {
    fn default() -> Self {
        Self { blocks: Vec::new() }
    }
}

impl<N: Clone + PartialEq + fmt::Debug> BlockRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: CodeBlock<N>) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&CodeBlock<N>> {
        self.blocks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CodeBlock<N>> {
        self.blocks.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodeBlock<N>> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the block whose wrapper contains `target`.
    pub fn find_containing<D: Document<Node = N>>(&self, doc: &D, target: &N) -> Option<usize> {
        let wrapper = doc.closest(target, classes::HIGHLIGHT_WRAP)?;
        self.blocks
            .iter()
            .position(|block| block.wrapper.as_ref() == Some(&wrapper))
    }
}
