use codepanel_engine::{Clipboard, ClipboardError, Document};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, HtmlTextAreaElement};

use crate::dom::WebDocument;

/// Copies through an off-screen textarea and `document.execCommand("copy")`.
///
/// Selecting the textarea replaces the user's selection; the engine restores
/// it after the write.
#[derive(Debug, Default)]
pub struct ExecCommandClipboard;

fn host(err: JsValue) -> ClipboardError {
    ClipboardError::Host(format!("{err:?}"))
}

impl Clipboard<WebDocument> for ExecCommandClipboard {
    fn write_text(&mut self, doc: &mut WebDocument, text: &str) -> Result<(), ClipboardError> {
        let html = doc
            .document()
            .dyn_ref::<HtmlDocument>()
            .ok_or(ClipboardError::Unsupported)?
            .clone();
        let body = doc.body().ok_or(ClipboardError::Unsupported)?;

        let textarea: HtmlTextAreaElement = html
            .create_element("textarea")
            .map_err(host)?
            .dyn_into()
            .map_err(|_| ClipboardError::Unsupported)?;
        textarea.set_value(text);
        textarea.set_attribute("readonly", "").map_err(host)?;
        let style = textarea.style();
        style.set_property("position", "absolute").map_err(host)?;
        style.set_property("left", "-9999px").map_err(host)?;

        body.append_child(&textarea).map_err(host)?;
        textarea.select();
        let copied = html.exec_command("copy");
        textarea.remove();

        match copied {
            Ok(true) => Ok(()),
            Ok(false) => Err(ClipboardError::Denied),
            Err(err) => Err(host(err)),
        }
    }
}
