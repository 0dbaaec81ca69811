//! Class names, ids and style values shared with the companion stylesheet.
//!
//! These strings are a contract with the theme CSS and must not change.

/// Line-number cell inside a code block.
pub const LINE_NUMBER: &str = "ln";
/// Line content cell inside a code block.
pub const LINE_CONTENT: &str = "cl";
/// Set on every line-number cell while line numbers are hidden.
pub const LINES_HIDDEN: &str = "pre_nolines";
/// Set on the `pre` element while lines wrap.
pub const WRAPPED: &str = "pre_wrap";

/// Container the highlighter emits around each block.
pub const HIGHLIGHT: &str = "highlight";
/// Wrapper added around the highlight container to host the panel.
pub const HIGHLIGHT_WRAP: &str = "highlight_wrap";
pub const PANEL_BOX: &str = "panel_box";
pub const PANEL_ICON: &str = "panel_icon";
pub const ICON: &str = "icon";
pub const PANEL_HIDE: &str = "panel_hide";
/// Shared by the expand button and the ellipsis affordance.
pub const PANEL_EXPAND: &str = "panel_expand";
pub const PANEL_FROM: &str = "panel_from";
/// Set on the highlight container while a block is expanded.
pub const PANEL_EXPANDED: &str = "panel_expanded";
pub const LANG_LABEL: &str = "lang";
pub const ACTIVE: &str = "active";

/// Sentinel for `code` elements that carry no class at all.
pub const NO_CLASS: &str = "noClass";

pub const MAX_HEIGHT: &str = "max-height";
/// `data-` key holding the recorded constrained height.
pub const HEIGHT_DATA: &str = "height";
pub const FULL_VIEWPORT: &str = "100vh";
