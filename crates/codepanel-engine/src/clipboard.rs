//! Clipboard bridge: copy a block's text without its line numbers.
//!
//! Extraction works on a detached deep copy so the live block never changes.
//! The user's selection is saved before the write and put back afterwards,
//! whatever the write did to it.

use log::warn;
use thiserror::Error;

use crate::classes;
use crate::dom::Document;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard is not available on this host")]
    Unsupported,
    #[error("clipboard write was denied")]
    Denied,
    #[error("clipboard write failed: {0}")]
    Host(String),
    #[error("block text could not be read")]
    Unreadable,
}

/// System clipboard as seen from a [`Document`] host.
///
/// Implementations are free to disturb the document's selection; callers go
/// through [`copy_text`], which restores it.
pub trait Clipboard<D: Document> {
    fn write_text(&mut self, doc: &mut D, text: &str) -> Result<(), ClipboardError>;
}

/// Text of `node` with every line-number cell left out.
///
/// `None` if the host could not copy the block.
pub fn extract_text<D: Document>(doc: &mut D, node: &D::Node) -> Option<String> {
    let copy = doc.clone_detached(node)?;
    for line in doc.elements_by_class(&copy, classes::LINE_NUMBER) {
        doc.discard(&line);
    }
    let text = doc.text_content(&copy);
    doc.discard(&copy);
    Some(text)
}

/// Put `text` on the clipboard, keeping the user's selection.
pub fn copy_text<D, C>(doc: &mut D, clipboard: &mut C, text: &str) -> Result<(), ClipboardError>
where
    D: Document,
    C: Clipboard<D> + ?Sized,
{
    let selection = doc.save_selection();

    let written = clipboard.write_text(doc, text);

    if let Some(selection) = selection {
        doc.restore_selection(selection);
    }
    written
}

/// Put the text of `node` on the clipboard, keeping the user's selection.
///
/// Returns the text that was written.
pub fn copy_block<D, C>(
    doc: &mut D,
    clipboard: &mut C,
    node: &D::Node,
) -> Result<String, ClipboardError>
where
    D: Document,
    C: Clipboard<D> + ?Sized,
{
    let text = extract_text(doc, node).ok_or(ClipboardError::Unreadable)?;
    copy_text(doc, clipboard, &text).map(|()| text)
}

/// Like [`copy_block`], but failures are only logged.
pub fn copy_block_quietly<D, C>(doc: &mut D, clipboard: &mut C, node: &D::Node)
where
    D: Document,
    C: Clipboard<D> + ?Sized,
{
    if let Err(err) = copy_block(doc, clipboard, node) {
        warn!("copy failed: {err}");
    }
}

/// In-process clipboard for [`MemoryDocument`](crate::dom::MemoryDocument).
///
/// Mimics the browser's textarea trick: a temporary `textarea` is appended to
/// the body and selected, which replaces the user's selection.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    writes: usize,
    failure: Option<ClipboardError>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails with `error`.
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Clipboard<crate::dom::MemoryDocument> for MemoryClipboard {
    fn write_text(
        &mut self,
        doc: &mut crate::dom::MemoryDocument,
        text: &str,
    ) -> Result<(), ClipboardError> {
        let body = doc.body().ok_or(ClipboardError::Unsupported)?;
        let scratch = doc.element(body, "textarea", &[]);
        doc.set_text(&scratch, text);
        doc.select(scratch, 0, text.chars().count());

        let result = match &self.failure {
            Some(error) => Err(error.clone()),
            None => {
                self.contents = Some(text.to_string());
                self.writes += 1;
                Ok(())
            }
        };

        doc.discard(&scratch);
        doc.clear_selection();
        result
    }
}
