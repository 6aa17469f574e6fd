mod app;
mod domain;
mod input;
mod persistence;
mod store;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{checkbox_glyph, items_left_label, Filter, Placeholder};
use persistence::{
    ensure_data_dir, init_data_dir, load_settings_or_default, log_file, settings_file,
    storage_file, FileStore, KeyValueStore, MemoryStore, Settings, TaskRepository,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use store::TaskStore;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// How long to wait for a key before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "tl")]
#[command(about = "A small terminal to-do list with local persistence", long_about = None)]
struct Cli {
    /// Use this data directory instead of ./.tasklist or ~/.tasklist
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Keep tasks in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a data directory (./.tasklist unless --data-dir is given)
    Init,
    #[command(flatten)]
    Tasks(TaskCommand),
}

/// Commands that operate on the stored tasks
#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task without opening the interactive list
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print tasks
    List {
        /// all, active or completed
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Delete every task
    Purge {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_data_dir(cli.data_dir.as_deref())?;
            println!("Initialized task directory: {}", data_dir.display());
            println!();
            println!("Tasks will now be stored in this directory.");
            println!("Run 'tl' to open your list.");
            return Ok(());
        }
        Some(Commands::Tasks(command)) => Some(command),
        None => None,
    };

    let data_dir = ensure_data_dir(cli.data_dir.as_deref())?;
    let (settings, settings_error) = load_settings_or_default(settings_file(&data_dir));
    init_tracing(&data_dir, cli.verbose, &settings)?;
    info!(data_dir = %data_dir.display(), "starting");
    if let Some(e) = settings_error {
        warn!(error = %format!("{:#}", e), "using default settings");
    }

    if cli.in_memory {
        let store = TaskStore::open(TaskRepository::new(MemoryStore::new()));
        run_command(command, store, settings)
    } else {
        let repo = TaskRepository::new(FileStore::new(storage_file(&data_dir)));
        run_command(command, TaskStore::open(repo), settings)
    }
}

fn run_command<S: KeyValueStore>(
    command: Option<TaskCommand>,
    mut store: TaskStore<S>,
    settings: Settings,
) -> Result<()> {
    match command {
        Some(TaskCommand::Add { text }) => {
            let text = text.join(" ");
            match store.add(&text)? {
                Some(_) => println!("Added: {}", text.trim()),
                None => println!("Nothing to add"),
            }
            Ok(())
        }
        Some(TaskCommand::List { filter }) => {
            let filter = Filter::from_name(&filter)
                .ok_or_else(|| anyhow!("Unknown filter '{}'. Use all, active or completed", filter))?;
            store.set_filter(filter);
            print_list(&store, &settings);
            Ok(())
        }
        Some(TaskCommand::Purge { yes }) => {
            if yes || confirm_on_stdin("Are you sure you want to delete ALL tasks?")? {
                store.clear_all()?;
                println!("All tasks deleted");
            } else {
                println!("Nothing deleted");
            }
            Ok(())
        }
        None => run_tui(store, settings),
    }
}

/// Log to a file in the data directory; the terminal belongs to the UI
fn init_tracing(data_dir: &Path, verbose: u8, settings: &Settings) -> Result<()> {
    let default_filter = match verbose {
        0 => settings.log_filter.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}

fn print_list<S: KeyValueStore>(store: &TaskStore<S>, settings: &Settings) {
    let view = store.view(&settings.timestamp_format);
    match view.placeholder {
        Some(Placeholder::Empty) => println!("No tasks yet"),
        Some(Placeholder::NoMatches) => println!("No tasks match the current filter."),
        None => {
            for row in &view.rows {
                println!(
                    "{:>3}. {} {}  ({})",
                    row.visible_index + 1,
                    checkbox_glyph(row.completed, false),
                    row.text,
                    row.created
                );
            }
        }
    }
    println!();
    println!("{}", items_left_label(view.items_left));
}

fn confirm_on_stdin(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn run_tui<S: KeyValueStore>(store: TaskStore<S>, settings: Settings) -> Result<()> {
    let mut app = AppState::new(store, settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print any errors
    if let Err(err) = result {
        error!(error = %format!("{:#}", err), "event loop failed");
        eprintln!("Error: {:#}", err);
    }
    info!("exiting");

    Ok(())
}

fn run_app<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match input::handle_key(app, key) {
                    Ok(true) => return Ok(()),
                    Ok(false) => app.status_message = None,
                    Err(e) => {
                        // The change is kept in memory; only the write failed
                        error!(error = %format!("{:#}", e), "failed to save tasks");
                        app.status_message = Some(format!("Failed to save: {}", e));
                    }
                }
            }
        }
    }
}
