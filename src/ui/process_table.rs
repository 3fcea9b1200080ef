use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::App;
use crate::format::{command_display, elapsed_hms, truncate_unicode};
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

/// Placeholder for processes with an empty cmdline.
const KERNEL_THREAD_LABEL: &str = "[kernel thread]";

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.panel_border))
        .title(Span::styled(
            format!(" Processes (by {}) ", app.sort_key.label()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.visible_rows();
    if rows.is_empty() {
        let msg = if app.filter_text.is_empty() {
            "No processes"
        } else {
            "No processes match the filter"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(theme.text_secondary)),
            inner,
        );
        return;
    }

    let widths = [
        Constraint::Length(6),  // PID
        Constraint::Length(9),  // USER
        Constraint::Length(1),  // S
        Constraint::Length(5),  // CPU%
        Constraint::Length(7),  // MEM(MB)
        Constraint::Length(8),  // TIME+
        Constraint::Fill(1),    // COMMAND
    ];
    // Fixed columns plus one spacing cell per gap; the command column gets
    // the remainder, truncated here instead of letting the table clip it.
    let fixed_width: u16 = 6 + 9 + 1 + 5 + 7 + 8 + 6;
    let command_width = inner.width.saturating_sub(fixed_width) as usize;

    let header_style = Style::default()
        .fg(theme.table_header_fg)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from(format!("{:>6}", "PID")).style(header_style),
        Cell::from("USER").style(header_style),
        Cell::from("S").style(header_style),
        Cell::from(format!("{:>5}", "CPU%")).style(header_style),
        Cell::from(format!("{:>7}", "MEM")).style(header_style),
        Cell::from("TIME+").style(header_style),
        Cell::from("COMMAND").style(header_style),
    ]);

    let body: Vec<Row<'_>> = rows
        .iter()
        .map(|record| process_row(record, command_width, theme))
        .collect();

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(table, inner, &mut state);
}

fn process_row<'a>(record: &ProcessRecord, command_width: usize, theme: &Theme) -> Row<'a> {
    let user = match (&record.user, record.uid) {
        (Some(name), _) => truncate_unicode(name, 9),
        (None, Some(uid)) => uid.to_string(),
        (None, None) => "?".to_string(),
    };

    let state = record.state.map(String::from).unwrap_or_else(|| "?".into());
    let state_style = if record.state == Some('R') {
        Style::default()
            .fg(theme.running_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_secondary)
    };

    let time = elapsed_hms(record.uptime_seconds.min(i64::MAX as u64) as i64)
        .unwrap_or_default();

    let cleaned = command_display(&record.command);
    let command = if cleaned.is_empty() {
        Cell::from(truncate_unicode(KERNEL_THREAD_LABEL, command_width))
            .style(Style::default().fg(theme.text_secondary))
    } else {
        Cell::from(truncate_unicode(&cleaned, command_width))
            .style(Style::default().fg(theme.text_primary))
    };

    Row::new(vec![
        Cell::from(format!("{:>6}", record.pid)),
        Cell::from(user),
        Cell::from(state).style(state_style),
        Cell::from(format!("{:>5.1}", record.cpu_utilization * 100.0)),
        Cell::from(format!("{:>7}", record.ram_megabytes)),
        Cell::from(time),
        command,
    ])
}
