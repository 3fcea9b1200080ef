pub mod header;
pub mod help;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        &app.snapshot,
        app.monitor.operating_system(),
        app.monitor.kernel_version(),
        &app.cpu_history,
        &app.theme,
    );

    process_table::render(frame, chunks[1], app);

    statusbar::render(
        frame,
        chunks[2],
        app.input_mode,
        &app.filter_text,
        app.status_message.as_ref(),
        &app.theme,
    );

    // Help overlay renders last so it sits on top of everything else.
    if app.show_help() {
        help::render(frame, frame.area(), &app.keybinds.help_entries(), &app.theme);
    }
}
