use gallery_core::{BulkStrategy, select_from_visited};

use super::{App, Focus, InputMode, StatusLevel};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.send(BackendCommand::CancelBulk);
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                Action::Tick => self.on_tick(),
                _ => {}
            }
            return false;
        }

        // Help overlay swallows everything except closing it
        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Quit => return self.request_quit(),
                Action::Tick => self.on_tick(),
                _ => {}
            }
            return false;
        }

        if self.popover.is_open() {
            match action {
                Action::ToggleCountPopover => {
                    self.popover.toggle();
                    self.input_mode = InputMode::Normal;
                }
                Action::CountInput(c) => self.popover.push_digit(c),
                Action::CountBackspace => self.popover.backspace(),
                Action::SubmitCount => {
                    if let Some(count) = self.popover.submit(self.pager.total) {
                        self.input_mode = InputMode::Normal;
                        self.start_bulk_select(count);
                    }
                }
                Action::Quit => return self.request_quit(),
                Action::Tick => self.on_tick(),
                _ => {}
            }
            return false;
        }

        match action {
            Action::Quit => return self.request_quit(),
            Action::Tick => self.on_tick(),
            Action::Resize(..) | Action::None => {}

            Action::MoveDown => match self.focus {
                Focus::Table => {
                    if self.table_cursor + 1 < self.rows.len() {
                        self.table_cursor += 1;
                    }
                }
                Focus::Panel => {
                    if self.panel_cursor + 1 < self.selection.len() {
                        self.panel_cursor += 1;
                    }
                }
            },
            Action::MoveUp => match self.focus {
                Focus::Table => self.table_cursor = self.table_cursor.saturating_sub(1),
                Focus::Panel => self.panel_cursor = self.panel_cursor.saturating_sub(1),
            },
            Action::GoTop => match self.focus {
                Focus::Table => self.table_cursor = 0,
                Focus::Panel => self.panel_cursor = 0,
            },
            Action::GoBottom => match self.focus {
                Focus::Table => self.table_cursor = self.rows.len().saturating_sub(1),
                Focus::Panel => self.panel_cursor = self.selection.len().saturating_sub(1),
            },

            Action::NextPage => {
                let next = self.pager.page.saturating_add(1);
                if self.pager.total == 0 || next <= self.pager.page_count() {
                    self.go_to_page(next);
                }
            }
            Action::PrevPage => {
                if self.pager.page > 1 {
                    self.go_to_page(self.pager.page - 1);
                }
            }
            Action::FirstPage => {
                if self.pager.page != 1 {
                    self.go_to_page(1);
                }
            }
            Action::LastPage => {
                let last = self.pager.page_count();
                if self.pager.total > 0 && self.pager.page != last {
                    self.go_to_page(last);
                }
            }
            Action::ReloadPage => {
                let first = self.pager.first_row();
                self.change_page(first, gallery_core::PAGE_SIZE);
            }

            Action::ToggleRow => {
                if self.focus == Focus::Table {
                    self.toggle_row(self.table_cursor);
                }
            }
            Action::TogglePage => self.toggle_page(),
            Action::RemoveSelected => {
                if self.focus == Focus::Panel
                    && let Some(id) = self.selection.items().get(self.panel_cursor).map(|r| r.id)
                {
                    self.selection.remove(id);
                    self.clamp_panel_cursor();
                }
            }
            Action::ClearSelection => {
                if !self.selection.is_empty() {
                    let n = self.selection.len();
                    self.selection.clear();
                    self.clamp_panel_cursor();
                    self.set_status(format!("Cleared {n} selected artworks"), StatusLevel::Info);
                }
            }
            Action::SwitchFocus => {
                self.focus = match self.focus {
                    Focus::Table if !self.selection.is_empty() => Focus::Panel,
                    _ => Focus::Table,
                };
                self.clamp_panel_cursor();
            }

            Action::ToggleCountPopover => {
                self.popover.toggle();
                self.input_mode = InputMode::CountEntry;
            }
            Action::CountInput(_) | Action::CountBackspace | Action::SubmitCount => {}

            Action::ToggleHelp => self.show_help = true,
            Action::NavigateBack => {
                if self.focus == Focus::Panel {
                    self.focus = Focus::Table;
                } else if self.bulk_in_flight.is_some() {
                    self.send(BackendCommand::CancelBulk);
                }
            }
        }

        false
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.expire_status();
    }

    fn request_quit(&mut self) -> bool {
        if self.bulk_in_flight.is_some() {
            self.confirm_quit = true;
            return false;
        }
        self.should_quit = true;
        true
    }

    /// Flip one row's checkbox and report the page's new checked set.
    fn toggle_row(&mut self, index: usize) {
        let Some(target) = self.rows.get(index).map(|r| r.id) else {
            return;
        };
        let checked: Vec<_> = self
            .rows
            .iter()
            .filter(|r| (r.id == target) != self.selection.contains(r.id))
            .cloned()
            .collect();
        self.apply_page_selection(&checked);
    }

    /// Header checkbox: check every row, or uncheck all when all are checked.
    fn toggle_page(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let all_checked = self.rows.iter().all(|r| self.selection.contains(r.id));
        let checked = if all_checked {
            Vec::new()
        } else {
            self.rows.clone()
        };
        self.apply_page_selection(&checked);
    }

    /// Run the configured bulk strategy for `count` records.
    pub(crate) fn start_bulk_select(&mut self, count: usize) {
        match self.strategy {
            BulkStrategy::FetchAhead => {
                if self.bulk_in_flight.is_some() {
                    self.set_status("A bulk selection is already running", StatusLevel::Warning);
                    return;
                }
                self.bulk_in_flight = Some(count);
                self.send(BackendCommand::BulkSelect {
                    count,
                    known: self.visited.pages_snapshot(),
                });
                self.set_status(format!("Selecting {count} artworks..."), StatusLevel::Info);
            }
            BulkStrategy::VisitedOnly => match select_from_visited(&self.visited, count) {
                Ok(records) => {
                    self.selection.replace_all(&records);
                    self.clamp_panel_cursor();
                    self.set_status(
                        format!("Selected the first {count} browsed artworks"),
                        StatusLevel::Info,
                    );
                }
                Err(e) => {
                    tracing::info!(count, error = %e, "visited-only selection rejected");
                    self.set_status(
                        format!(
                            "Cannot select {count}: only {} artworks browsed so far",
                            self.visited.len()
                        ),
                        StatusLevel::Warning,
                    );
                }
            },
        }
    }
}
