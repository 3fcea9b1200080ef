use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Sparkline};

use crate::format::elapsed_hms;
use crate::system::monitor::SystemSnapshot;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SystemSnapshot,
    os_name: Option<&str>,
    kernel_version: Option<&str>,
    cpu_history: &VecDeque<u64>,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_system_info(frame, chunks[0], snapshot, os_name, kernel_version, theme);
    render_cpu_block(frame, chunks[1], snapshot, cpu_history, theme);
    render_memory_gauge(frame, chunks[2], snapshot, theme);
}

/// Branding plus the static system facts: distribution, kernel release,
/// uptime, and the per-tick process counts.
fn render_system_info(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SystemSnapshot,
    os_name: Option<&str>,
    kernel_version: Option<&str>,
    theme: &Theme,
) {
    let block = bordered_block(theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut top = vec![Span::styled(
        " proctop ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    )];
    top.push(Span::raw(" "));
    top.push(Span::styled(
        os_name.unwrap_or("Linux").to_string(),
        Style::default().fg(theme.text_primary),
    ));
    if let Some(kernel) = kernel_version {
        top.push(Span::styled(
            format!("  {kernel}"),
            Style::default().fg(theme.text_secondary),
        ));
    }

    let uptime = elapsed_hms(snapshot.uptime_seconds.min(i64::MAX as u64) as i64)
        .unwrap_or_default();
    let bottom = Line::from(vec![
        Span::styled(" up ", Style::default().fg(theme.text_secondary)),
        Span::styled(uptime, Style::default().fg(theme.text_primary)),
        Span::styled(
            format!(
                "  {} procs, {} running",
                snapshot.total_processes, snapshot.running_processes
            ),
            Style::default().fg(theme.text_secondary),
        ),
    ]);

    frame.render_widget(Paragraph::new(vec![Line::from(top), bottom]), inner);
}

/// Current utilization as a gauge with the recent history sparkline
/// underneath. History values are whole percentage points.
fn render_cpu_block(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SystemSnapshot,
    cpu_history: &VecDeque<u64>,
    theme: &Theme,
) {
    let cpu_ratio = snapshot.cpu_utilization.clamp(0.0, 1.0);
    let block = bordered_block(theme).title(Span::styled(
        " CPU ",
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(cpu_ratio)
        .label(format!("{:.1}%", cpu_ratio * 100.0));
    frame.render_widget(gauge, rows[0]);

    let data: Vec<u64> = cpu_history.iter().copied().collect();
    let sparkline = Sparkline::default()
        .data(&data)
        .max(100)
        .style(Style::default().fg(theme.sparkline_color));
    frame.render_widget(sparkline, rows[1]);
}

fn render_memory_gauge(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let ratio = snapshot.memory_utilization.clamp(0.0, 1.0);
    let block = bordered_block(theme).title(Span::styled(
        " MEM ",
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!(
            "{}/{} MB ({:.0}%)",
            snapshot.memory_used_kb / 1024,
            snapshot.memory_total_kb / 1024,
            ratio * 100.0
        ));

    frame.render_widget(gauge, area);
}

fn bordered_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.panel_border))
}
