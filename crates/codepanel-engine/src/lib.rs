/*!
 * # codepanel engine
 *
 * Platform-neutral core of the code-block action panel and the page
 * behaviors that ship alongside it. All DOM access goes through
 * [`dom::Document`], so the same pipeline runs against the browser (see the
 * `codepanel-web` crate) and against [`dom::MemoryDocument`] natively.
 *
 * ## Pipeline
 *
 * 1. **Discovery** tags bare `code` elements with the `noClass` sentinel and
 *    yields annotated blocks in document order.
 * 2. **Panel** wraps each block, attaches the copy / lines / wrap / expand
 *    controls and owns the per-block [`block::BlockState`] records.
 * 3. **Constraint** clamps blocks longer than the configured line count to the
 *    offset of the first hidden line.
 * 4. **Clipboard** copies a detached, line-number-free copy of a block while
 *    keeping the user's selection.
 *
 * [`page::PageEnhancer`] wires these together with the page behaviors and is
 * the body of the single delegated click listener.
 */

pub mod behaviors;
pub mod block;
pub mod classes;
pub mod click;
pub mod clipboard;
pub mod constraint;
pub mod discovery;
pub mod dom;
pub mod error;
pub mod language;
pub mod page;
pub mod panel;
pub mod render;
pub mod schedule;

pub use block::{BlockRegistry, BlockState, CodeBlock, MaxHeight};
pub use click::ClickOutcome;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use constraint::{ClampOutcome, HeightConstraint};
pub use dom::{Document, MemoryDocument, NodeId};
pub use error::EngineError;
pub use language::LanguageTag;
pub use page::{EnhanceReport, PageEnhancer};
pub use panel::{ActionButton, ActionPanel, PanelController};
pub use render::{CodeBlockMarkup, Highlighter, PlainHighlighter};
pub use schedule::{Deferred, Scheduler, TaskQueue};

pub use codepanel_config::PageSettings;
