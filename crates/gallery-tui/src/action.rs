/// Everything the user (or the clock) can ask the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Resize(u16, u16),

    // Cursor movement in the focused pane
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,

    // Pagination
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    ReloadPage,

    // Selection
    ToggleRow,
    TogglePage,
    RemoveSelected,
    ClearSelection,
    SwitchFocus,

    // Count popover
    ToggleCountPopover,
    CountInput(char),
    CountBackspace,
    SubmitCount,

    ToggleHelp,
    NavigateBack,
    None,
}
