mod app;
mod domain;
mod input;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{Category, UiMode};
use notifications::{DesktopNotifier, NotificationSink, SilentNotifier};
use persistence::{
    atomic_write, ensure_data_dir, init_local_data_dir, load_settings, log_file, save_settings,
    settings_file, FileBlobStore, Settings,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use ticker::Ticker;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskbeat")]
#[command(about = "A terminal task tracker with per-task timers, a Pomodoro and achievements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .taskbeat directory in the current directory
    Init,
    /// Add a task without opening the TUI
    Add {
        text: String,
        /// work, personal, shopping, health or learning
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List tasks
    List {
        /// Include archived tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Generate a Markdown statistics report
    Report {
        /// Date to stamp the report with (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data-dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export tasks as JSON (stdout unless --output is given)
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all tasks with the contents of a JSON export
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        init_logging(true)?;
        return run_tui();
    };
    init_logging(false)?;

    match command {
        Commands::Init => {
            let data_dir = init_local_data_dir()?;
            save_settings(data_dir.join("settings.json"), &Settings::default())?;
            println!("Initialized taskbeat directory: {}", data_dir.display());
            println!();
            println!("Taskbeat will now use this local directory for task storage.");
            println!("Run 'taskbeat' to start tracking tasks.");
        }
        Commands::Add { text, category } => {
            let mut app = load_app(Box::new(SilentNotifier))?;
            if app.is_memory_only() {
                anyhow::bail!("Storage is unreadable, refusing to add a task that can't be saved");
            }
            let category = match category {
                Some(name) => Category::from_name(&name)
                    .with_context(|| format!("Unknown category: {}", name))?,
                None => app.settings.default_category,
            };
            let id = app.add_task(&text, category)?;
            app.save()?;
            println!("Added task {}", id);
        }
        Commands::List { all } => {
            let app = load_app(Box::new(SilentNotifier))?;
            for task in app.tasks().iter().filter(|t| all || !t.archived) {
                println!(
                    "[{}] {}{} ({}, {}, {}){}",
                    if task.completed { "x" } else { " " },
                    if task.starred { "* " } else { "" },
                    task.text,
                    task.category.name(),
                    task.priority.name(),
                    task.elapsed_formatted(),
                    if task.archived { " [archived]" } else { "" },
                );
            }
        }
        Commands::Report { date, output } => {
            let report_date = match date {
                Some(date_str) => chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?,
                None => chrono::Local::now().date_naive(),
            };
            let app = load_app(Box::new(SilentNotifier))?;
            let content = report::build_report(app.tasks(), &app.metrics, &app.achievements, report_date);
            let report_path = report::write_report(&content, report_date, output)?;
            println!("Report generated: {}", report_path.display());
        }
        Commands::Export { output } => {
            let app = load_app(Box::new(SilentNotifier))?;
            let json = app.export_json()?;
            match output {
                Some(path) => {
                    atomic_write(&path, &json)
                        .with_context(|| format!("Failed to write export: {}", path.display()))?;
                    println!("Exported {} tasks to {}", app.tasks().len(), path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Import { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut app = load_app(Box::new(SilentNotifier))?;
            if app.is_memory_only() {
                anyhow::bail!("Storage is unreadable, refusing to import");
            }
            let count = app.import_json(&content)?;
            app.save()?;
            println!("Imported {} tasks", count);
        }
    }

    Ok(())
}

/// Logs go to the data directory while the TUI owns the terminal, stderr otherwise
fn init_logging(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("TASKBEAT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if to_file {
        let path = log_file()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Settings fall back to defaults when settings.json can't be read
fn load_app(notifier: Box<dyn NotificationSink>) -> Result<AppState> {
    let data_dir = ensure_data_dir()?;
    let settings = match load_settings(settings_file()?) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "settings unreadable, using defaults");
            Settings::default()
        }
    };
    info!(dir = %data_dir.display(), "using data directory");
    Ok(AppState::load(Box::new(FileBlobStore::new(data_dir)), settings, notifier))
}

fn run_tui() -> Result<()> {
    let mut app = load_app(Box::new(DesktopNotifier))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit
    if let Err(e) = app.save() {
        warn!(error = %e, "final save failed");
        eprintln!("Error saving state: {}", e);
    }

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut ticker = Ticker::start(Instant::now());

    let outcome = loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll briefly so keys stay responsive between ticks
        if event::poll(ticker::poll_duration())? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let external_editor = app.ui_mode == UiMode::Normal
                        && key.code == KeyCode::Char('n')
                        && app.selected_task().is_some();

                    let should_quit = if external_editor {
                        disable_raw_mode()?;
                        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

                        let handled = input::handle_key(app, key);

                        enable_raw_mode()?;
                        execute!(io::stdout(), EnterAlternateScreen)?;
                        terminal.clear()?;

                        match handled {
                            Ok(quit) => quit,
                            Err(e) => {
                                warn!(error = %e, "notes editor failed");
                                app.status_message = Some(format!("Editor failed: {}", e));
                                false
                            }
                        }
                    } else {
                        input::handle_key(app, key)?
                    };

                    if should_quit {
                        break Ok(());
                    }
                }
            }
        }

        for _ in 0..ticker.due_ticks(Instant::now()) {
            app.tick();
        }

        if app.needs_save {
            if let Err(e) = app.save() {
                warn!(error = %e, "autosave failed");
            }
        }
    };

    ticker.cancel();
    outcome
}
