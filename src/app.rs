use std::io::Stdout;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    cursor::Show,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flexi_logger::LoggerHandle;
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::{config_path, home_dir, load_config, log_dir, resolve_vault_dir, Config};
use crate::controller::{Controller, Flow};
use crate::keys::from_crossterm;
use crate::logging::{default_log_level, init_logging};
use crate::storage::VaultStore;
use crate::ui::{draw, UiState};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run() -> Result<()> {
    let bin_name = executable_name();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("{bin_name} v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                print_usage(&bin_name);
                return Ok(());
            }
            other => {
                print_usage(&bin_name);
                anyhow::bail!("unknown argument '{other}'");
            }
        }
    }

    let config = match config_path() {
        Some(path) => load_config(&path)?,
        None => Config::default(),
    };
    let _logger = start_logging(&config);

    let home = home_dir()?;
    let vault_dir = resolve_vault_dir(&config, &home)?;
    let store = VaultStore::open(vault_dir.clone())
        .with_context(|| format!("cannot prepare vault directory {}", vault_dir.display()))?;
    info!("event=vault_ready module=app status=ok");

    run_tui(Controller::new(store))
}

fn start_logging(config: &Config) -> Option<LoggerHandle> {
    let dir = log_dir()?;
    let level = config.log_level.as_deref().unwrap_or(default_log_level());
    match init_logging(level, &dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    }
}

fn run_tui(mut controller: Controller<VaultStore>) -> Result<()> {
    restore_terminal_on_panic();
    enable_raw_mode().context("cannot enable raw mode")?;
    let mut stdout = std::io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(e).context("cannot enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            disable_raw_mode().ok();
            execute!(std::io::stdout(), LeaveAlternateScreen).ok();
            return Err(e).context("cannot initialise terminal");
        }
    };

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|f| {
                let state = UiState {
                    screen: controller.screen(),
                    status: controller.status(),
                };
                draw(f, &state);
            })?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            // Resize needs no handling here: the next draw lays out again.
            if let Event::Key(key_event) = event::read()? {
                let Some(key) = from_crossterm(key_event) else {
                    continue;
                };
                if controller.handle(key) == Flow::Quit {
                    break;
                }
            }
        }
        Ok(())
    })();

    if let Err(e) = &result {
        warn!("event=event_loop module=app status=error error={e}");
    }
    controller.shutdown();
    teardown_terminal(&mut terminal);
    result
}

/// Leaves raw mode and the alternate screen before the panic message prints.
fn restore_terminal_on_panic() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        disable_raw_mode().ok();
        execute!(std::io::stdout(), LeaveAlternateScreen, Show).ok();
        previous(panic_info);
    }));
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name} [OPTIONS]");
    eprintln!("  -h, --help              Show this help and exit");
    eprintln!("  -V, --version           Show version and exit");
}

fn executable_name() -> String {
    let fallback = "totion".to_string();
    let arg0 = match std::env::args().next() {
        Some(v) => v,
        None => return fallback,
    };
    let path = Path::new(&arg0);
    match path.file_name().and_then(|name| name.to_str()) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => fallback,
    }
}
