//! Terminal preview: the full enhancement pipeline on an in-memory page, with
//! the action panel driven from the keyboard.

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use codepanel_config::{AttributeOwner, SiteConfig};
use codepanel_engine::behaviors::images::POST_CONTENT;
use codepanel_engine::{
    ActionButton, CodeBlock, CodeBlockMarkup, Document, EnhanceReport, MaxHeight,
    MemoryClipboard, MemoryDocument, NodeId, PageEnhancer, PlainHighlighter, TaskQueue, classes,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::info;
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::layout::{TerminalLayout, gutter_width};
use crate::markdown::code_blocks;

const TICK: Duration = Duration::from_millis(25);

/// Columns available to code in a terminal `width` wide.
pub fn code_columns(width: u16) -> u16 {
    (width.saturating_mul(3) / 4).saturating_sub(2).max(1)
}

fn key_for(button: ActionButton) -> char {
    match button {
        ActionButton::Copy => 'c',
        ActionButton::Lines => 'l',
        ActionButton::Wrap => 'w',
        ActionButton::Expand => 'e',
    }
}

pub struct App {
    title: String,
    doc: MemoryDocument,
    enhancer: PageEnhancer<NodeId>,
    queue: TaskQueue<NodeId>,
    clipboard: MemoryClipboard,
    block_list_state: ListState,
    status: String,
    last_tick: Instant,
}

impl App {
    pub fn new(title: &str, markdown: &str, config: &SiteConfig, width: u16) -> Result<Self> {
        let mut doc =
            MemoryDocument::new().with_layout(TerminalLayout::new(code_columns(width)));
        let root = doc.root();
        let body = doc.body().ok_or_else(|| anyhow!("document has no body"))?;
        for (owner, node) in [(AttributeOwner::Root, root), (AttributeOwner::Body, body)] {
            for (name, value) in config.attributes_for(owner) {
                doc.set_attribute(&node, name, &value);
            }
        }

        let content = doc.element(body, "div", &[POST_CONTENT]);
        for block in code_blocks(markdown) {
            CodeBlockMarkup::new(&PlainHighlighter, block.language, &block.code)
                .mount(&mut doc, &content)
                .ok_or_else(|| anyhow!("could not build code block markup"))?;
        }

        let mut app = Self {
            title: title.to_string(),
            enhancer: PageEnhancer::new(config.page_settings()),
            doc,
            queue: TaskQueue::new(),
            clipboard: MemoryClipboard::new(),
            block_list_state: ListState::default(),
            status: String::new(),
            last_tick: Instant::now(),
        };
        let report = app.enhancer.enhance(&mut app.doc, &mut app.queue);
        app.status = summary(&report);
        if !app.enhancer.blocks().is_empty() {
            app.block_list_state.select(Some(0));
        }
        Ok(app)
    }

    pub fn selected_block(&self) -> Option<&CodeBlock<NodeId>> {
        self.block_list_state
            .selected()
            .and_then(|index| self.enhancer.blocks().get(index))
    }

    pub fn next_block(&mut self) {
        let count = self.enhancer.blocks().len();
        if count == 0 {
            return;
        }
        let i = match self.block_list_state.selected() {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.block_list_state.select(Some(i));
    }

    pub fn previous_block(&mut self) {
        let count = self.enhancer.blocks().len();
        if count == 0 {
            return;
        }
        let i = match self.block_list_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.block_list_state.select(Some(i));
    }

    /// Click one of the selected block's panel controls.
    pub fn press(&mut self, button: ActionButton) {
        let Some(node) = self
            .selected_block()
            .and_then(|block| block.panel.as_ref())
            .map(|panel| *panel.button(button))
        else {
            return;
        };
        if self.doc.has_class(&node, classes::PANEL_HIDE) {
            self.status = format!("{} is not available for this block", button.title());
            return;
        }

        self.enhancer
            .handle_click(&mut self.doc, &mut self.clipboard, &mut self.queue, &node);
        self.status = match button {
            ActionButton::Copy => match self.clipboard.contents() {
                Some(text) => format!("Copied {} lines", text.lines().count()),
                None => "Nothing copied".to_string(),
            },
            _ => format!("{}: done", button.title()),
        };
    }

    /// Run deferred panel tasks that have come due.
    pub fn tick(&mut self) {
        let elapsed = self.last_tick.elapsed();
        self.last_tick = Instant::now();
        self.queue.advance(elapsed, &mut self.doc);
    }

    pub fn resize(&mut self, width: u16) {
        self.doc.set_layout(TerminalLayout::new(code_columns(width)));
    }

    fn block_lines(&self, block: &CodeBlock<NodeId>) -> Vec<Line<'static>> {
        let numbers = block.lines(&self.doc);
        let contents = self.doc.elements_by_class(&block.code, classes::LINE_CONTENT);
        let gutter = gutter_width(numbers.len(), block.state.line_numbers);
        let limit = match block.state.max_height {
            Some(MaxHeight::Pixels(pixels)) => Some(pixels),
            _ => None,
        };

        let mut lines = Vec::new();
        for (number, content) in numbers.iter().zip(&contents) {
            if limit.is_some_and(|limit| self.doc.offset_top(number) >= limit) {
                lines.push(Line::styled(
                    "...",
                    Style::default().fg(Color::Yellow),
                ));
                break;
            }
            let text = self.doc.text_content(content);
            let mut spans = Vec::new();
            if gutter > 0 {
                spans.push(Span::styled(
                    format!("{:>width$} ", self.doc.text_content(number), width = gutter - 1),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::raw(text.trim_end_matches('\n').to_string()));
            lines.push(Line::from(spans));
        }
        lines
    }

    fn panel_line(&self, block: &CodeBlock<NodeId>) -> Line<'static> {
        let Some(panel) = block.panel.as_ref() else {
            return Line::default();
        };
        let mut spans = Vec::new();
        for button in ActionButton::ALL {
            let node = panel.button(button);
            if self.doc.has_class(node, classes::PANEL_HIDE) {
                continue;
            }
            let style = if self.doc.has_class(node, classes::ACTIVE) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(
                format!("[{}] {}  ", key_for(button), button.title()),
                style,
            ));
        }
        if let Some(label) = block.language.label() {
            spans.push(Span::styled(
                label.to_string(),
                Style::default().fg(Color::Cyan),
            ));
        }
        Line::from(spans)
    }
}

fn summary(report: &EnhanceReport) -> String {
    info!(
        "preview ready: {} blocks, {} clamped",
        report.blocks, report.clamped
    );
    format!("{} code blocks, {} clamped", report.blocks, report.clamped)
}

pub fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next_block(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous_block(),
                    KeyCode::Char(key) => {
                        if let Some(button) =
                            ActionButton::ALL.into_iter().find(|b| key_for(*b) == key)
                        {
                            app.press(button);
                        }
                    }
                    _ => {}
                },
                Event::Resize(width, _) => app.resize(width),
                _ => {}
            }
        }
        app.tick();
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)].as_ref())
        .split(rows[0]);

    let block_items: Vec<ListItem> = app
        .enhancer
        .blocks()
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let name = block.language.label().unwrap_or("text");
            let marker = if block.state.constrained_height.is_some() { " *" } else { "" };
            ListItem::new(Line::from(format!("{}. {name}{marker}", index + 1)))
        })
        .collect();
    let block_list = List::new(block_items)
        .block(Block::default().borders(Borders::ALL).title(app.title.clone()))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(block_list, columns[0], &mut app.block_list_state);

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)].as_ref())
        .split(columns[1]);

    match app.selected_block() {
        Some(block) => {
            f.render_widget(Paragraph::new(app.panel_line(block)), detail[0]);
            let mut code = Paragraph::new(app.block_lines(block))
                .block(Block::default().borders(Borders::ALL).title("Code"));
            if block.state.wrapped {
                code = code.wrap(Wrap { trim: false });
            }
            f.render_widget(code, detail[1]);
        }
        None => {
            let empty = Paragraph::new("No code blocks in this page")
                .block(Block::default().borders(Borders::ALL).title("Code"));
            f.render_widget(empty, detail[1]);
        }
    }

    let help = Paragraph::new(vec![
        Line::from(app.status.clone()),
        Line::from("q: Quit | ↑/k ↓/j: Select block | c: Copy | l: Lines | w: Wrap | e: Expand"),
    ]);
    f.render_widget(help, rows[1]);
}
