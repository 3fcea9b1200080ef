use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
#[cfg(not(feature = "perf-tracing"))]
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;

use proctop::app::App;
use proctop::config::{Config, load_config, load_config_from_path};
use proctop::event::{Event, EventHandler};
use proctop::system::clock_ticks_per_second;
use proctop::system::monitor::Monitor;
use proctop::system::procfs::ProcFs;
use proctop::ui;

#[derive(Parser)]
#[command(
    name = "proctop",
    about = "Terminal process monitor that reads Linux procfs directly"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Initial sort key: cpu, memory, pid, uptime
    #[arg(long)]
    sort: Option<String>,

    /// Color theme: dark, light
    #[arg(long)]
    theme: Option<String>,

    /// Read the process table from this directory instead of /proc
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Print one snapshot as JSON and exit
    #[arg(long, default_value_t = false)]
    snapshot: bool,

    /// Span event output file (JSON lines, needs the perf-tracing feature)
    #[arg(long)]
    trace_log: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(path) = cli.trace_log.as_deref() {
        init_trace_log(path)?;
    }

    let monitor = build_monitor(&cli);

    if cli.snapshot {
        return run_snapshot(monitor);
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config, monitor);

    ratatui::restore();

    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, config: Config, monitor: Monitor) -> Result<()> {
    let mut app = App::new(config, monitor);
    let mut events = EventHandler::new(Duration::from_millis(app.refresh_rate_ms));

    // The first sample doubles as the sampler seed: the opening frame
    // shows the since-boot average and the next tick measures a real
    // interval.
    app.refresh_data()?;
    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let mut should_draw = false;
        match events.next()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action)?;
                    should_draw = true;
                }
            }
            Event::Tick => {
                app.refresh_data()?;
                should_draw = true;
            }
            Event::Resize => should_draw = true,
        }

        let tick_rate = Duration::from_millis(app.refresh_rate_ms);
        if events.tick_rate() != tick_rate {
            events.set_tick_rate(tick_rate);
        }

        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &app))?;
        }
    }

    Ok(())
}

/// One refresh, pretty JSON on stdout, no terminal takeover. The CPU
/// fraction is the since-boot average because there is no prior sample.
fn run_snapshot(mut monitor: Monitor) -> Result<()> {
    let snapshot = monitor.refresh()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn build_monitor(cli: &Cli) -> Monitor {
    match &cli.proc_root {
        Some(root) => {
            let procfs = ProcFs::with_roots(root.clone(), "/etc/os-release", "/etc/passwd");
            Monitor::with_procfs(procfs, clock_ticks_per_second())
        }
        None => Monitor::new(),
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        config.general.default_sort = sort.clone();
    }
    if let Some(ref theme) = cli.theme {
        config.general.theme = theme.clone();
    }

    config
}

fn init_trace_log(path: &Path) -> Result<()> {
    #[cfg(not(feature = "perf-tracing"))]
    {
        let _ = path;
        Err(eyre!(
            "--trace-log requires the `perf-tracing` feature; run with `cargo run --features perf-tracing -- --trace-log <path>`"
        ))
    }

    #[cfg(feature = "perf-tracing")]
    {
        proctop::trace::init_tracing_json(path)
    }
}
