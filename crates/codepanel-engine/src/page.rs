//! Page orchestration: the load-time pass and the delegated click listener.

use std::fmt;

use codepanel_config::{AttributeOwner, PageAttribute, PageSettings};
use log::{debug, info, warn};

use crate::behaviors::{self, BehaviorReport};
use crate::block::BlockRegistry;
use crate::click::ClickOutcome;
use crate::clipboard::Clipboard;
use crate::constraint::HeightConstraint;
use crate::discovery;
use crate::dom::Document;
use crate::panel::PanelController;
use crate::schedule::Scheduler;

/// Read the page-level settings from the attributes on `<html>` and `<body>`.
pub fn read_settings<D: Document>(doc: &D) -> PageSettings {
    let root = doc.root();
    let body = doc.body();
    PageSettings::from_attributes(|attribute: PageAttribute| {
        let owner = match attribute.owner() {
            AttributeOwner::Root => Some(root.clone()),
            AttributeOwner::Body => body.clone(),
        }?;
        doc.attribute(&owner, attribute.name())
    })
}

/// Summary of one [`PageEnhancer::enhance`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceReport {
    /// Class-less `code` elements tagged with the sentinel.
    pub unannotated: usize,
    /// Blocks that received an action panel.
    pub blocks: usize,
    /// Blocks clamped to the configured line count.
    pub clamped: usize,
    /// Annotated `code` elements whose markup was not a highlighted block.
    pub skipped: usize,
    pub behaviors: BehaviorReport,
}

#[derive(Debug)]
pub struct PageEnhancer<N> {
    settings: PageSettings,
    /// Re-read `settings` from the page when [`PageEnhancer::enhance`] runs.
    from_page: bool,
    year: Option<i32>,
    panel: PanelController<N>,
}

impl<N: Clone + PartialEq + fmt::Debug> PageEnhancer<N> {
    pub fn new(settings: PageSettings) -> Self {
        let panel = PanelController::new(
            HeightConstraint::new(settings.max_lines),
            settings.lines_by_default,
        );
        Self {
            settings,
            from_page: false,
            year: None,
            panel,
        }
    }

    /// An enhancer that takes its settings from the page's own attributes at
    /// the moment [`PageEnhancer::enhance`] runs, so it can be created before
    /// the page has finished loading.
    pub fn from_page() -> Self {
        Self {
            from_page: true,
            ..Self::new(PageSettings::default())
        }
    }

    /// Write `year` into the footer's `.year` elements during the load pass.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    fn configure(&mut self, settings: PageSettings) {
        self.panel.configure(
            HeightConstraint::new(settings.max_lines),
            settings.lines_by_default,
        );
        self.settings = settings;
    }

    pub fn blocks(&self) -> &BlockRegistry<N> {
        self.panel.blocks()
    }

    /// Run once after the page has loaded.
    pub fn enhance<D, S>(&mut self, doc: &mut D, scheduler: &mut S) -> EnhanceReport
    where
        D: Document<Node = N>,
        S: Scheduler<N>,
    {
        if self.from_page {
            self.configure(read_settings(doc));
            debug!("page settings: {:?}", self.settings);
        }

        let mut report = EnhanceReport {
            unannotated: discovery::mark_unannotated(doc),
            ..EnhanceReport::default()
        };

        for code in discovery::discover(doc) {
            match self.panel.adopt(doc, code.clone(), scheduler) {
                Ok(index) => {
                    report.blocks += 1;
                    if self
                        .panel
                        .blocks()
                        .get(index)
                        .is_some_and(|block| block.state.constrained_height.is_some())
                    {
                        report.clamped += 1;
                    }
                }
                Err(err) => {
                    warn!("skipping {code:?}: {err}");
                    report.skipped += 1;
                }
            }
        }

        report.behaviors = behaviors::apply(doc, &self.settings, self.year);
        info!(
            "enhanced {} code blocks ({} clamped, {} skipped)",
            report.blocks, report.clamped, report.skipped
        );
        report
    }

    /// Body of the single document-level click listener.
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
        let panel = self.panel.handle_click(doc, clipboard, scheduler, target);
        panel.merge(behaviors::handle_click(
            doc,
            clipboard,
            scheduler,
            &self.settings,
            target,
        ))
    }
}
