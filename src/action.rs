#[derive(Debug, Clone, PartialEq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    EnterFilterMode,
    ExitFilterMode,
    ClearFilter,
    UpdateFilter(String),
    CycleSortKey,
    ToggleKernelThreads,
    ToggleHelp,
    FasterRefresh,
    SlowerRefresh,
    Refresh,
    None,
}
