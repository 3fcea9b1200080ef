use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::system::monitor::{Monitor, SystemSnapshot};
use crate::system::process::ProcessRecord;
use crate::system::procfs::ProcError;
use crate::ui::theme::Theme;

pub const MIN_REFRESH_MS: u64 = 250;
pub const MAX_REFRESH_MS: u64 = 10_000;
const REFRESH_STEP_MS: u64 = 250;
const CPU_HISTORY_LEN: usize = 60;
const PAGE_JUMP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub help: KeyCode,
    pub filter: KeyCode,
    pub sort_cycle: KeyCode,
    pub kernel_threads: KeyCode,
    pub faster: KeyCode,
    pub slower: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            sort_cycle: parse_key(&kb.sort_cycle).unwrap_or(KeyCode::Char('s')),
            kernel_threads: parse_key(&kb.kernel_threads).unwrap_or(KeyCode::Char('t')),
            faster: parse_key(&kb.faster).unwrap_or(KeyCode::Char('+')),
            slower: parse_key(&kb.slower).unwrap_or(KeyCode::Char('-')),
        }
    }

    /// Returns (key_label, description) pairs for the help overlay.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Filter processes"),
            (key_label(self.sort_cycle), "Cycle sort key"),
            (key_label(self.kernel_threads), "Toggle kernel threads"),
            (key_label(self.faster), "Refresh faster"),
            (key_label(self.slower), "Refresh slower"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("\u{2191}\u{2193}".to_string(), "Select process"));
        entries.push(("PgUp/PgDn".to_string(), "Page"));
        entries.push(("Home/End".to_string(), "Jump to edge"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

/// Presentation-side sort keys. The sampling layer always hands out
/// records in CPU order; the other keys re-sort the view only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
    Pid,
    Uptime,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            SortKey::Cpu => SortKey::Memory,
            SortKey::Memory => SortKey::Pid,
            SortKey::Pid => SortKey::Uptime,
            SortKey::Uptime => SortKey::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Cpu => "CPU",
            SortKey::Memory => "Memory",
            SortKey::Pid => "PID",
            SortKey::Uptime => "Uptime",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => SortKey::Memory,
            "pid" => SortKey::Pid,
            "uptime" | "time" => SortKey::Uptime,
            _ => SortKey::Cpu,
        }
    }
}

pub struct App {
    pub running: bool,
    pub monitor: Monitor,
    pub snapshot: SystemSnapshot,
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub show_kernel_threads: bool,
    pub sort_key: SortKey,
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    pub refresh_rate_ms: u64,
    pub cpu_history: VecDeque<u64>,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: Config, monitor: Monitor) -> Self {
        App {
            running: true,
            monitor,
            snapshot: SystemSnapshot::default(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            show_kernel_threads: config.table.show_kernel_threads,
            sort_key: SortKey::from_str_config(&config.general.default_sort),
            theme: Theme::from_config_str(&config.general.theme),
            status_message: None,
            refresh_rate_ms: config
                .general
                .refresh_rate_ms
                .clamp(MIN_REFRESH_MS, MAX_REFRESH_MS),
            cpu_history: VecDeque::with_capacity(CPU_HISTORY_LEN),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        }
    }

    /// One sampling tick. Propagates only a dead process table; everything
    /// else already degraded to defaults inside the monitor.
    pub fn refresh_data(&mut self) -> Result<(), ProcError> {
        self.snapshot = self.monitor.refresh()?;

        let cpu_percent = (self.snapshot.cpu_utilization * 100.0).round() as u64;
        if self.cpu_history.len() == CPU_HISTORY_LEN {
            self.cpu_history.pop_front();
        }
        self.cpu_history.push_back(cpu_percent);

        self.clamp_selection();

        // Clear expired status messages (older than 3 seconds)
        if let Some((_, created)) = &self.status_message
            && created.elapsed().as_secs() >= 3
        {
            self.status_message = None;
        }

        Ok(())
    }

    /// Rows the table shows this frame: kernel-thread visibility and the
    /// incremental filter applied, then the display sort.
    pub fn visible_rows(&self) -> Vec<&ProcessRecord> {
        let filter = self.filter_text.to_lowercase();
        let mut rows: Vec<&ProcessRecord> = self
            .snapshot
            .processes
            .iter()
            .filter(|p| self.show_kernel_threads || !p.command.is_empty())
            .filter(|p| {
                filter.is_empty()
                    || p.command.to_lowercase().contains(&filter)
                    || p.user
                        .as_deref()
                        .is_some_and(|u| u.to_lowercase().contains(&filter))
                    || p.pid.to_string().contains(&filter)
            })
            .collect();

        match self.sort_key {
            // The registry already ordered by CPU.
            SortKey::Cpu => {}
            SortKey::Memory => rows.sort_by(|a, b| b.ram_megabytes.cmp(&a.ram_megabytes)),
            SortKey::Pid => rows.sort_by(|a, b| a.pid.cmp(&b.pid)),
            SortKey::Uptime => rows.sort_by(|a, b| b.uptime_seconds.cmp(&a.uptime_seconds)),
        }
        rows
    }

    pub fn selected_record(&self) -> Option<&ProcessRecord> {
        self.visible_rows().get(self.selected_index).copied()
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Navigation keys are hardwired (not configurable)
        match code {
            KeyCode::Up | KeyCode::Char('k') => return Action::Navigate(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Home),
            KeyCode::End => return Action::Navigate(Direction::End),
            KeyCode::Esc if !self.filter_text.is_empty() => return Action::ClearFilter,
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.sort_cycle {
            return Action::CycleSortKey;
        }
        if code == kb.kernel_threads {
            return Action::ToggleKernelThreads;
        }
        if code == kb.faster {
            return Action::FasterRefresh;
        }
        if code == kb.slower {
            return Action::SlowerRefresh;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == KeyCode::Char('r') {
            return Action::Refresh;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        // In help mode, only the help key and Esc dismiss
        if key.code == self.keybinds.help || key.code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), ProcError> {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::EnterFilterMode => {
                self.input_mode = InputMode::Filter;
            }
            Action::ExitFilterMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.clamp_selection();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.clamp_selection();
            }
            Action::CycleSortKey => {
                self.sort_key = self.sort_key.next();
                self.set_status(format!("Sort: {}", self.sort_key.label()));
            }
            Action::ToggleKernelThreads => {
                self.show_kernel_threads = !self.show_kernel_threads;
                self.clamp_selection();
                self.set_status(if self.show_kernel_threads {
                    "Kernel threads shown".to_string()
                } else {
                    "Kernel threads hidden".to_string()
                });
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::FasterRefresh => {
                self.refresh_rate_ms =
                    (self.refresh_rate_ms.saturating_sub(REFRESH_STEP_MS)).max(MIN_REFRESH_MS);
                self.set_status(format!("Refresh: {} ms", self.refresh_rate_ms));
            }
            Action::SlowerRefresh => {
                self.refresh_rate_ms = (self.refresh_rate_ms + REFRESH_STEP_MS).min(MAX_REFRESH_MS);
                self.set_status(format!("Refresh: {} ms", self.refresh_rate_ms));
            }
            Action::Refresh => {
                self.refresh_data()?;
                self.set_status("Refreshed".to_string());
            }
            Action::None => {}
        }
        Ok(())
    }

    fn navigate(&mut self, dir: Direction) {
        let rows = self.visible_rows().len();
        if rows == 0 {
            self.selected_index = 0;
            return;
        }
        let last = rows - 1;
        self.selected_index = match dir {
            Direction::Up => self.selected_index.saturating_sub(1),
            Direction::Down => (self.selected_index + 1).min(last),
            Direction::PageUp => self.selected_index.saturating_sub(PAGE_JUMP),
            Direction::PageDown => (self.selected_index + PAGE_JUMP).min(last),
            Direction::Home => 0,
            Direction::End => last,
        };
    }

    fn clamp_selection(&mut self) {
        let rows = self.visible_rows().len();
        if rows == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= rows {
            self.selected_index = rows - 1;
        }
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }
}
