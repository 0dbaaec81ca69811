#![forbid(unsafe_code)]

//! Browser front end for codepanel.
//!
//! Implements the engine's [`Document`](codepanel_engine::Document) seam over
//! `web-sys`, the clipboard through a hidden textarea and
//! `execCommand("copy")`, deferred tasks through `setTimeout`, and installs
//! the single delegated click listener. Everything except log formatting is
//! only compiled on `wasm32` targets.

pub mod logger;

#[cfg(target_arch = "wasm32")]
mod clipboard;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod timers;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use clipboard::ExecCommandClipboard;
#[cfg(target_arch = "wasm32")]
pub use dom::WebDocument;
#[cfg(target_arch = "wasm32")]
pub use timers::TimeoutScheduler;
#[cfg(target_arch = "wasm32")]
pub use wasm::start;
