use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fieldfit_config::Config;
use fieldfit_engine::{Constraints, InputSource, reflow};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::OpenOptions,
    io::{self, Read, Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

mod app;
mod args;
mod ui;

use app::App;
use args::Mode;

fn main() -> Result<()> {
    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map_or("fieldfit-cli", String::as_str);

    let args = match args::parse(argv.get(1..).unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", args::usage(program));
            process::exit(2);
        }
    };

    // Limits come from the CLI, then the config file, then the defaults
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", config_path.display());
            process::exit(1);
        }
    };

    let constraints = match args.limits {
        Some((chars, lines)) => Constraints::new(chars, lines),
        None => config.constraints(),
    };
    let constraints = match constraints {
        Ok(constraints) => constraints,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", args::usage(program));
            process::exit(2);
        }
    };

    init_logging(args.mode, config.log_file.as_deref())?;
    log::info!(
        "fieldfit starting with {} lines of {} chars",
        constraints.max_lines,
        constraints.max_chars_per_line
    );

    match args.mode {
        Mode::Format => {
            if !format_stdin(&constraints)? {
                process::exit(1);
            }
            Ok(())
        }
        Mode::Interactive => run_interactive(constraints, config, config_path),
    }
}

/// Where log records end up.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    /// The textarea owns the terminal and there is no file to write to
    Off,
}

fn log_target(mode: Mode, log_file: Option<&Path>) -> LogTarget<'_> {
    match (log_file, mode) {
        (Some(path), _) => LogTarget::File(path),
        (None, Mode::Format) => LogTarget::Stderr,
        (None, Mode::Interactive) => LogTarget::Off,
    }
}

fn init_logging(mode: Mode, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    match log_target(mode, log_file) {
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .filter_level(log::LevelFilter::Info)
                .parse_default_env();
        }
        LogTarget::Stderr => {
            builder
                .filter_level(log::LevelFilter::Warn)
                .parse_default_env();
        }
        // RUST_LOG is ignored here so nothing draws over the alternate screen
        LogTarget::Off => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    builder.init();
    Ok(())
}

/// Reflow stdin as one paste and print it. Returns whether the text fits.
fn format_stdin(constraints: &Constraints) -> Result<bool> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    let input = input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(&input);

    let result = reflow(input, usize::MAX, constraints, InputSource::Pasted);
    if result.valid {
        println!("{}", result.output_text);
        eprintln!("{}", result.status);
    } else {
        eprintln!("Error: {}", result.status);
    }
    Ok(result.valid)
}

fn run_interactive(constraints: Constraints, config: Config, config_path: PathBuf) -> Result<()> {
    let (width, _) = terminal::size()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(constraints, width).with_config(config, config_path);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;
        app.handle_event(event::read()?);
    }
    Ok(())
}
