/*!
 * # Action Panel Controller
 *
 * Every block gets a `div.panel_box` with four controls (copy, lines, wrap,
 * expand) inside a `div.highlight_wrap` wrapper. Clicks reach the controller
 * through the single delegated listener; [`ActionButton::from_target`]
 * identifies the control and the dispatch table maps it to a handler.
 *
 * Handlers only ever touch the block's [`BlockState`](crate::block::BlockState)
 * and then re-render it.
 */

use std::fmt;

use log::debug;

use crate::block::{BlockRegistry, CodeBlock, MaxHeight};
use crate::classes;
use crate::click::ClickOutcome;
use crate::clipboard::{self, Clipboard};
use crate::constraint::HeightConstraint;
use crate::dom::Document;
use crate::error::EngineError;
use crate::language;
use crate::schedule::{Deferred, PULSE_DELAY, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionButton {
    Copy,
    Lines,
    Wrap,
    Expand,
}

impl ActionButton {
    /// Panel order.
    pub const ALL: [ActionButton; 4] = [
        ActionButton::Copy,
        ActionButton::Lines,
        ActionButton::Wrap,
        ActionButton::Expand,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ActionButton::Copy => "copy",
            ActionButton::Lines => "lines",
            ActionButton::Wrap => "wrap",
            ActionButton::Expand => "expand",
        }
    }

    /// `panel_<id>`
    pub fn class_name(self) -> String {
        format!("panel_{}", self.id())
    }

    pub fn title(self) -> &'static str {
        match self {
            ActionButton::Copy => "Copy Code",
            ActionButton::Lines => "Toggle Line Numbers",
            ActionButton::Wrap => "Toggle Line Wrap",
            ActionButton::Expand => "Toggle code block expand",
        }
    }

    /// Theme icon name, exposed as `data-icon` for the stylesheet.
    pub fn icon(self) -> &'static str {
        match self {
            ActionButton::Copy => "copy",
            ActionButton::Lines => "order",
            ActionButton::Wrap => "carly",
            ActionButton::Expand => "expand",
        }
    }

    /// Wrap is revealed only for overflowing blocks and expand only for
    /// clamped ones.
    pub fn shown_by_default(self) -> bool {
        matches!(self, ActionButton::Copy | ActionButton::Lines)
    }

    /// The control `target` belongs to, if any.
    ///
    /// The expand ellipsis shares the `panel_expand` class and so counts as
    /// the expand control.
    pub fn from_target<D: Document>(doc: &D, target: &D::Node) -> Option<Self> {
        let mut current = Some(target.clone());
        while let Some(node) = current {
            if doc.has_class(&node, classes::HIGHLIGHT_WRAP) {
                return None;
            }
            if let Some(button) = Self::ALL
                .into_iter()
                .find(|button| doc.has_class(&node, &button.class_name()))
            {
                return Some(button);
            }
            current = doc.parent(&node);
        }
        None
    }
}

impl fmt::Display for ActionButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The controls attached to one block.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPanel<N> {
    pub container: N,
    buttons: [N; 4],
}

impl<N: Clone> ActionPanel<N> {
    /// Build a detached `div.panel_box`.
    pub fn build<D: Document<Node = N>>(doc: &mut D) -> Option<Self> {
        let container = doc.create_element("div")?;
        doc.add_class(&container, classes::PANEL_BOX);

        let mut buttons = Vec::with_capacity(ActionButton::ALL.len());
        for button in ActionButton::ALL {
            let node = doc.create_element("a")?;
            doc.set_attribute(&node, "href", "#");
            doc.set_attribute(&node, "title", button.title());
            doc.add_class(&node, classes::ICON);
            doc.add_class(&node, classes::PANEL_ICON);
            doc.add_class(&node, &button.class_name());
            if !button.shown_by_default() {
                doc.add_class(&node, classes::PANEL_HIDE);
            }
            doc.set_data(&node, "icon", button.icon());
            doc.append_child(&container, &node);
            buttons.push(node);
        }

        Some(Self {
            container,
            buttons: buttons.try_into().ok()?,
        })
    }

    pub fn button(&self, button: ActionButton) -> &N {
        &self.buttons[button as usize]
    }
}

/// Wrap the block in `div.highlight_wrap`, append its panel and show the
/// wrap control if the block overflows its container.
///
/// The page is left untouched if the panel cannot be built.
pub fn attach_panel<D, N>(doc: &mut D, block: &mut CodeBlock<N>) -> Result<(), EngineError>
where
    D: Document<Node = N>,
    N: Clone + PartialEq + fmt::Debug,
{
    let panel = ActionPanel::build(doc).ok_or(EngineError::MissingPanel)?;
    let wrapper = doc.create_element("div").ok_or(EngineError::MissingPanel)?;
    doc.add_class(&wrapper, classes::HIGHLIGHT_WRAP);
    doc.wrap(&block.highlight, &wrapper);
    doc.append_child(&wrapper, &panel.container);

    if !block.fits(doc) {
        debug!("{:?} overflows, showing wrap control", block.code);
        doc.remove_class(panel.button(ActionButton::Wrap), classes::PANEL_HIDE);
    }

    block.wrapper = Some(wrapper);
    block.panel = Some(panel);
    Ok(())
}

/// What a handler gets to work with besides the block.
pub struct Dispatch<'a, D: Document, C: ?Sized> {
    pub doc: &'a mut D,
    pub clipboard: &'a mut C,
    pub constraint: HeightConstraint,
}

pub type Handler<D, C> = fn(&mut Dispatch<'_, D, C>, &mut CodeBlock<<D as Document>::Node>);

/// Button to handler mapping.
pub fn dispatch_table<D, C>() -> [(ActionButton, Handler<D, C>); 4]
where
    D: Document,
    C: Clipboard<D> + ?Sized,
{
    [
        (ActionButton::Copy, copy_code::<D, C> as Handler<D, C>),
        (ActionButton::Lines, toggle_lines::<D, C> as Handler<D, C>),
        (ActionButton::Wrap, toggle_wrap::<D, C> as Handler<D, C>),
        (ActionButton::Expand, toggle_expand::<D, C> as Handler<D, C>),
    ]
}

fn copy_code<D, C>(ctx: &mut Dispatch<'_, D, C>, block: &mut CodeBlock<D::Node>)
where
    D: Document,
    C: Clipboard<D> + ?Sized,
{
    clipboard::copy_block_quietly(ctx.doc, ctx.clipboard, &block.code);
}

fn toggle_lines<D, C>(ctx: &mut Dispatch<'_, D, C>, block: &mut CodeBlock<D::Node>)
where
    D: Document,
    C: ?Sized,
{
    block.state.line_numbers = !block.state.line_numbers;
    block.render(ctx.doc);
    ctx.constraint.restrain(ctx.doc, block);
}

fn toggle_wrap<D, C>(ctx: &mut Dispatch<'_, D, C>, block: &mut CodeBlock<D::Node>)
where
    D: Document,
    C: ?Sized,
{
    block.state.wrapped = !block.state.wrapped;
    block.render(ctx.doc);
    ctx.constraint.restrain(ctx.doc, block);
}

fn toggle_expand<D, C>(ctx: &mut Dispatch<'_, D, C>, block: &mut CodeBlock<D::Node>)
where
    D: Document,
    C: ?Sized,
{
    match (block.state.max_height, block.state.constrained_height) {
        (Some(MaxHeight::Pixels(_)), _) => {
            block.state.max_height = Some(MaxHeight::FullViewport);
            block.state.expanded = true;
        }
        (_, Some(height)) => {
            block.state.max_height = Some(MaxHeight::Pixels(height));
            block.state.expanded = false;
        }
        (_, None) => {
            debug!("{:?} was never clamped, nothing to expand", block.code);
            return;
        }
    }
    block.render(ctx.doc);
}

/// Owns the block records and reacts to clicks on their panels.
#[derive(Debug)]
pub struct PanelController<N> {
    constraint: HeightConstraint,
    lines_by_default: Option<bool>,
    blocks: BlockRegistry<N>,
}

impl<N: Clone + PartialEq + fmt::Debug> PanelController<N> {
    pub fn new(constraint: HeightConstraint, lines_by_default: Option<bool>) -> Self {
        Self {
            constraint,
            lines_by_default,
            blocks: BlockRegistry::new(),
        }
    }

    pub fn constraint(&self) -> HeightConstraint {
        self.constraint
    }

    /// Apply new settings to blocks adopted from now on and to later clicks.
    pub fn configure(&mut self, constraint: HeightConstraint, lines_by_default: Option<bool>) {
        self.constraint = constraint;
        self.lines_by_default = lines_by_default;
    }

    pub fn blocks(&self) -> &BlockRegistry<N> {
        &self.blocks
    }

    /// Take over a discovered `code` element: panel, default line-number
    /// state, language badge and initial clamp.
    pub fn adopt<D, S>(
        &mut self,
        doc: &mut D,
        code: N,
        scheduler: &mut S,
    ) -> Result<usize, EngineError>
    where
        D: Document<Node = N>,
        S: Scheduler<N>,
    {
        let mut block = CodeBlock::locate(doc, code)?;
        attach_panel(doc, &mut block)?;

        if let Some(line_numbers) = self.lines_by_default {
            block.state.line_numbers = line_numbers;
        }
        block.render(doc);

        if let Some(wrapper) = &block.wrapper {
            language::append_label(doc, wrapper, &block.language);
        }

        let outcome = self.constraint.collapse(doc, &mut block, scheduler);
        debug!("adopted {:?} ({outcome:?})", block.code);
        Ok(self.blocks.push(block))
    }

    /// Body of the delegated listener for panel controls.
    pub fn handle_click<D, C, S>(
        &mut self,
        doc: &mut D,
        clipboard: &mut C,
        scheduler: &mut S,
        target: &N,
    ) -> ClickOutcome
    where
        D: Document<Node = N>,
        C: Clipboard<D> + ?Sized,
        S: Scheduler<N>,
    {
        let Some(button) = ActionButton::from_target(doc, target) else {
            return ClickOutcome::ignored();
        };
        let Some(index) = self.blocks.find_containing(doc, target) else {
            debug!("{button} control outside any known block");
            return ClickOutcome::ignored();
        };

        if let Some(icon) = doc.closest(target, classes::ICON) {
            doc.remove_class(&icon, classes::ACTIVE);
            scheduler.defer(PULSE_DELAY, Deferred::Pulse { node: icon });
        }

        let Some((_, handler)) = dispatch_table::<D, C>()
            .into_iter()
            .find(|(candidate, _)| *candidate == button)
        else {
            return ClickOutcome::ignored();
        };
        let Some(block) = self.blocks.get_mut(index) else {
            return ClickOutcome::ignored();
        };

        let mut ctx = Dispatch {
            doc,
            clipboard,
            constraint: self.constraint,
        };
        handler(&mut ctx, block);
        debug!("{button} on block {index}");
        ClickOutcome::prevented()
    }
}
