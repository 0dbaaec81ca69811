//! `wasm-bindgen` entry point: enhance the page once it has loaded and route
//! every document click through the engine.

use std::cell::RefCell;
use std::rc::Rc;

use codepanel_engine::PageEnhancer;
use log::{LevelFilter, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent};

use crate::clipboard::ExecCommandClipboard;
use crate::dom::WebDocument;
use crate::logger;
use crate::timers::TimeoutScheduler;

struct Page {
    doc: WebDocument,
    enhancer: PageEnhancer<Element>,
    clipboard: ExecCommandClipboard,
    scheduler: TimeoutScheduler,
}

fn current_year() -> i32 {
    i32::try_from(js_sys::Date::new_0().get_full_year()).unwrap_or_default()
}

impl Page {
    fn new(doc: WebDocument) -> Self {
        Self {
            // Page attributes are read when the load event fires.
            enhancer: PageEnhancer::from_page().with_year(current_year()),
            scheduler: TimeoutScheduler::new(doc.clone()),
            clipboard: ExecCommandClipboard,
            doc,
        }
    }

    fn enhance(&mut self) {
        self.enhancer.enhance(&mut self.doc, &mut self.scheduler);
    }

    fn on_click(&mut self, event: &MouseEvent) {
        let Some(target) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };
        let outcome = self.enhancer.handle_click(
            &mut self.doc,
            &mut self.clipboard,
            &mut self.scheduler,
            &target,
        );
        if outcome.prevent_default {
            event.prevent_default();
        }
    }
}

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                ),
                None => format!("panic: {info}"),
            };
            console_error(&msg);
        }));
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    if let Err(err) = logger::init(LevelFilter::Info) {
        console_error(&format!("logger already installed: {err}"));
    }

    let Some(doc) = WebDocument::from_window() else {
        warn!("no document to enhance");
        return Ok(());
    };
    let window = doc.window().clone();
    let document = doc.document().clone();
    let page = Rc::new(RefCell::new(Page::new(doc)));

    // Line offsets are only meaningful once layout has happened.
    if document.ready_state() == "complete" {
        page.borrow_mut().enhance();
    } else {
        let loaded = Rc::clone(&page);
        let on_load = Closure::once_into_js(move || loaded.borrow_mut().enhance());
        window.add_event_listener_with_callback("load", on_load.unchecked_ref())?;
    }

    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        page.borrow_mut().on_click(&event);
    });
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}
