//! Page behaviors that ship next to the code-block panel.
//!
//! Load-time passes run once from [`apply`]; click behaviors share the
//! single delegated listener through [`handle_click`].

use codepanel_config::PageSettings;

use crate::click::ClickOutcome;
use crate::clipboard::Clipboard;
use crate::dom::Document;
use crate::schedule::Scheduler;

pub mod color_mode;
pub mod footer;
pub mod images;
pub mod links;
pub mod nav;
pub mod tables;
pub mod tags;

/// What the load-time passes changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorReport {
    pub external_links: usize,
    pub heading_links: usize,
    pub tables: usize,
    pub captions: usize,
    pub years: usize,
}

/// Run the load-time passes. The footer year is only written when `year` is
/// known.
pub fn apply<D: Document>(
    doc: &mut D,
    settings: &PageSettings,
    year: Option<i32>,
) -> BehaviorReport {
    BehaviorReport {
        external_links: links::open_external_links(doc, &settings.base_url),
        heading_links: links::anchor_headings(doc),
        tables: tables::wrap_tables(doc),
        captions: images::caption_images(doc, settings),
        years: year.map_or(0, |year| footer::stamp_year(doc, year)),
    }
}

/// Every click behavior sees every click.
pub fn handle_click<D, C, S>(
    doc: &mut D,
    clipboard: &mut C,
    scheduler: &mut S,
    settings: &PageSettings,
    target: &D::Node,
) -> ClickOutcome
where
    D: Document,
    C: Clipboard<D> + ?Sized,
    S: Scheduler<D::Node>,
{
    color_mode::handle_click(doc, target)
        .merge(nav::handle_click(doc, &settings.base_url, target))
        .merge(tags::handle_click(doc, target))
        .merge(links::handle_click(doc, clipboard, scheduler, target))
}
