mod backend;
mod update;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use gallery_core::{BulkStrategy, PAGE_SIZE, Record, SelectionStore, VisitedCache};

use crate::model::pager::PagerState;
use crate::model::popover::CountPopover;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;
use crate::view;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// The count popover is open and owns the keyboard.
    CountEntry,
}

/// Which pane receives cursor movement and row actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Panel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Transient one-line message shown in the footer.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    /// Tick at which the message was set (messages expire after a while).
    pub since_tick: usize,
}

/// Ticks a status message stays visible (at 100ms per tick).
const STATUS_TTL_TICKS: usize = 60;

/// Main application state.
pub struct App {
    /// Records of the page on screen, in server order.
    pub rows: Vec<Record>,
    pub pager: PagerState,
    pub selection: SelectionStore,
    pub visited: VisitedCache,
    pub strategy: BulkStrategy,
    pub popover: CountPopover,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub table_cursor: usize,
    pub panel_cursor: usize,
    /// Count of the fetch-ahead bulk selection in flight, if any.
    pub bulk_in_flight: Option<usize>,
    pub status: Option<StatusMessage>,
    pub theme: Theme,
    pub tick: usize,
    pub show_help: bool,
    pub confirm_quit: bool,
    pub should_quit: bool,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(theme: Theme, selection: SelectionStore, strategy: BulkStrategy) -> Self {
        Self {
            rows: Vec::new(),
            pager: PagerState::default(),
            selection,
            visited: VisitedCache::new(),
            strategy,
            popover: CountPopover::default(),
            focus: Focus::Table,
            input_mode: InputMode::Normal,
            table_cursor: 0,
            panel_cursor: 0,
            bulk_in_flight: None,
            status: None,
            theme,
            tick: 0,
            show_help: false,
            confirm_quit: false,
            should_quit: false,
            backend_cmd_tx: None,
        }
    }

    pub(crate) fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx
            && tx.send(cmd).is_err()
        {
            tracing::warn!("backend command channel closed");
        }
    }

    /// Handle a table page-change event, expressed the way the table reports
    /// it: first row index and rows per page.
    pub fn change_page(&mut self, first: usize, rows: usize) {
        let (page, generation) = self.pager.begin_load(first, rows);
        self.table_cursor = 0;
        tracing::debug!(page, generation, "requesting page");
        self.send(BackendCommand::LoadPage { page, generation });
    }

    pub fn go_to_page(&mut self, page: u32) {
        let first = self.pager.offset_for(page);
        self.change_page(first, PAGE_SIZE);
    }

    /// Handle a table selection-change event: `checked` is the full set of
    /// checked rows on the visible page.
    pub fn apply_page_selection(&mut self, checked: &[Record]) {
        self.selection
            .toggle_current_page_selection(&self.rows, checked);
        self.clamp_panel_cursor();
    }

    /// Rows of the visible page that are selected, i.e. what the table shows
    /// as checked.
    pub fn visible_selection(&self) -> Vec<Record> {
        self.selection.visible_selection(&self.rows)
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since_tick: self.tick,
        });
    }

    pub(crate) fn expire_status(&mut self) {
        if let Some(status) = &self.status
            && self.tick.wrapping_sub(status.since_tick) > STATUS_TTL_TICKS
        {
            self.status = None;
        }
    }

    pub(crate) fn clamp_panel_cursor(&mut self) {
        let len = self.selection.len();
        if len == 0 {
            self.panel_cursor = 0;
            self.focus = Focus::Table;
        } else if self.panel_cursor >= len {
            self.panel_cursor = len - 1;
        }
    }

    /// Render the whole screen.
    pub fn view(&mut self, f: &mut Frame) {
        let area = f.area();
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        view::gallery::render_header(f, header, self);

        let table_area = if self.selection.is_empty() {
            body
        } else {
            let panel_width = (body.width / 2).min(40);
            let [table_area, panel_area] =
                Layout::horizontal([Constraint::Min(20), Constraint::Length(panel_width)])
                    .areas(body);
            view::selection::render(f, panel_area, self);
            table_area
        };
        view::gallery::render_table(f, table_area, self);
        view::gallery::render_footer(f, footer, self);

        if self.popover.is_open() {
            view::popover::render(f, table_area, self);
        }
        if self.show_help {
            view::help::render(f, self);
        }
        if self.confirm_quit {
            view::quit_confirm::render(f, &self.theme);
        }
    }
}
