use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::CountEntry => map_key_count_entry(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') => Action::GoTop,
        KeyCode::Char('G') => Action::GoBottom,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Action::NextPage,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Action::PrevPage,
        KeyCode::Home => Action::FirstPage,
        KeyCode::End => Action::LastPage,
        KeyCode::Char('r') => Action::ReloadPage,
        KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleRow,
        KeyCode::Char('a') => Action::TogglePage,
        KeyCode::Char('x') | KeyCode::Delete => Action::RemoveSelected,
        KeyCode::Char('X') => Action::ClearSelection,
        KeyCode::Tab => Action::SwitchFocus,
        KeyCode::Char('v') => Action::ToggleCountPopover,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::NavigateBack,
        _ => Action::None,
    }
}

fn map_key_count_entry(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('v') => Action::ToggleCountPopover,
        KeyCode::Enter => Action::SubmitCount,
        KeyCode::Backspace => Action::CountBackspace,
        KeyCode::Char(c) if c.is_ascii_digit() => Action::CountInput(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn digits_only_reach_the_popover_in_count_entry() {
        assert_eq!(
            map_event(&press(KeyCode::Char('7')), &InputMode::CountEntry),
            Action::CountInput('7')
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('e')), &InputMode::CountEntry),
            Action::None
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('q')), &InputMode::CountEntry),
            Action::None
        );
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ev, &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&ev, &InputMode::CountEntry), Action::Quit);
    }

    #[test]
    fn arrows_page_in_normal_mode() {
        assert_eq!(
            map_event(&press(KeyCode::Right), &InputMode::Normal),
            Action::NextPage
        );
        assert_eq!(
            map_event(&press(KeyCode::Left), &InputMode::Normal),
            Action::PrevPage
        );
    }
}
