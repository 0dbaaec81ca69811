use std::time::Duration;

use codepanel_engine::{Deferred, Scheduler};
use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Element;

use crate::dom::WebDocument;

/// Runs deferred tasks from `window.setTimeout`. Nothing is cancelled.
#[derive(Debug, Clone)]
pub struct TimeoutScheduler {
    doc: WebDocument,
}

impl TimeoutScheduler {
    pub fn new(doc: WebDocument) -> Self {
        Self { doc }
    }
}

impl Scheduler<Element> for TimeoutScheduler {
    fn defer(&mut self, delay: Duration, task: Deferred<Element>) {
        let mut doc = self.doc.clone();
        let callback = Closure::once_into_js(move || task.run(&mut doc));
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        if let Err(err) = self
            .doc
            .window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            warn!("setTimeout failed: {err:?}");
        }
    }
}
