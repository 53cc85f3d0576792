//! formfield - render a form's tag list fields in the terminal.
//!
//! Loads a form schema, lets the user edit every tag list field, and prints
//! the final values as JSON on exit.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use formfield::app::App;
use formfield::config::{self, Settings};
use formfield::error::AppError;
use formfield::events::EventHandler;
use formfield::form::{FieldRegistry, FormData, FormErrors, FormSchema};
use formfield::logging;
use formfield::source::OptionClient;
use formfield::tasks::create_task_channel;
use formfield::ui::init_theme;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "formfield", version, about)]
struct Cli {
    /// Form schema (JSON with a `components` array).
    #[arg(required_unless_present_any = ["list_types", "write_config"])]
    schema: Option<PathBuf>,

    /// Initial form data (JSON object of field key to value list).
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Error messages to display (JSON object of field id to messages).
    #[arg(long, value_name = "FILE")]
    errors: Option<PathBuf>,

    /// Render every field read-only.
    #[arg(long)]
    disabled: bool,

    /// Settings file to use instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the known field types and exit.
    #[arg(long)]
    list_types: bool,

    /// Write the current settings to the settings file and exit.
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = run(cli).await;
    logging::shutdown();

    if let Err(e) = &result {
        if e.is_critical() {
            error!(error = %e, "formfield could not show the form");
        } else {
            warn!(error = %e, "formfield exited with an error");
        }
        eprintln!("Error: {}", e.user_message());
        if let Some(action) = e.suggested_action() {
            eprintln!("{action}");
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    if cli.write_config {
        let path = match cli.config {
            Some(path) => {
                settings.save_to(&path)?;
                path
            }
            None => {
                settings.save()?;
                config::config_path()?
            }
        };
        println!("{}", path.display());
        return Ok(());
    }

    let registry = FieldRegistry::with_defaults();
    if cli.list_types {
        for descriptor in registry.descriptors() {
            println!("{}\t{}", descriptor.type_name, descriptor.label);
        }
        return Ok(());
    }

    let Some(schema_path) = cli.schema else {
        return Err(AppError::other("No schema file given."));
    };
    let fields = FormSchema::load(&schema_path)?.fields(&registry)?;
    if fields.is_empty() {
        warn!(path = %schema_path.display(), "Schema has no tag list fields");
    }
    let data = match &cli.data {
        Some(path) => FormData::load(path)?,
        None => FormData::default(),
    };
    let errors = match &cli.errors {
        Some(path) => FormErrors::load(path)?,
        None => FormErrors::default(),
    };

    init_theme(&settings.theme);
    let client = OptionClient::with_timeout(Duration::from_secs(settings.request_timeout_secs))?;
    let (rx, spawner) = create_task_channel();

    let title = schema_path
        .file_name()
        .map(|name| format!("formfield - {}", name.to_string_lossy()))
        .unwrap_or_else(|| "formfield".to_string());
    let mut app = App::new(fields, &data, errors, client, spawner)
        .with_disabled(cli.disabled)
        .with_placeholder(&settings.placeholder)
        .with_title(title);

    let events = EventHandler::with_tick_rate(settings.tick_rate_ms);
    run_terminal(&mut app, &events, rx).map_err(|e| AppError::terminal(e.to_string()))?;

    let values = serde_json::to_string_pretty(&app.values_json())
        .map_err(|e| AppError::other(e.to_string()))?;
    println!("{values}");
    Ok(())
}

/// Set up the terminal, run the event loop, and restore the terminal.
fn run_terminal(
    app: &mut App,
    events: &EventHandler,
    rx: tokio::sync::mpsc::UnboundedReceiver<formfield::tasks::SourceMessage>,
) -> anyhow::Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, app, events, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    mut rx: tokio::sync::mpsc::UnboundedReceiver<formfield::tasks::SourceMessage>,
) -> anyhow::Result<()> {
    info!("Entering event loop");
    app.sync_sources();

    while !app.should_quit() {
        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);

        while let Ok(msg) = rx.try_recv() {
            app.handle_source_message(msg);
        }
        app.sync_sources();
    }

    Ok(())
}
