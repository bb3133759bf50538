//! Termview demo: open a file in a terminal view with a key-logging console.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use termview::actor::InputActor;
use termview::compositor::RenderContext;
use termview::config::{DepthPreference, FrontendConfig};
use termview::model::memory::MemoryModel;
use termview::style::{ColorTable, Palette, StyleResolver, Theme};
use termview::{CrosstermTerminal, Frontend, Scheduler};
use tracing_subscriber::EnvFilter;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "termview", version, about = "Terminal text view with a key-logging console")]
struct Args {
    /// File to open. An empty buffer is used if omitted or unreadable.
    file: Option<PathBuf>,
    /// TOML theme file.
    #[arg(long)]
    theme: Option<PathBuf>,
    /// Restrict output to the 8 base colors.
    #[arg(long)]
    low_color: bool,
    /// Write logs here; the terminal itself is busy with the view.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env("TERMVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_model(file: Option<&Path>) -> MemoryModel {
    let text = file.map_or_else(String::new, |path| {
        std::fs::read_to_string(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "unable to open file, starting empty");
            String::new()
        })
    });
    let mut model = MemoryModel::new();
    model.new_view(&text);
    let console = model.new_view("");
    model.set_console(console);
    model
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("termview: cannot open log file {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    let mut config = FrontendConfig::default();
    if args.low_color {
        config.color_depth = DepthPreference::Low;
    }
    let depth = config.resolve_depth();

    let theme = args
        .theme
        .as_deref()
        .map_or_else(Theme::default, Theme::load_or_default);
    let mut palette = Palette::new(depth);
    let table = ColorTable::build(&theme, &mut palette);
    let ctx = RenderContext::new(StyleResolver::new(table));

    let mut model = open_model(args.file.as_deref());

    let mut terminal = match CrosstermTerminal::new(depth, config.alternate_screen) {
        Ok(terminal) => terminal,
        Err(e) => {
            eprintln!("termview: {}", termview::Error::from(e));
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = terminal.install_palette(&palette) {
        tracing::warn!(error = %e, "unable to install palette");
    }

    let size = termview::Surface::size(&terminal);
    let poll_timeout = config.input_poll_timeout;
    let mut frontend = Frontend::new(config, ctx, size);
    if let Some(console) = model.console() {
        frontend.set_console(console);
    }
    frontend.post_status_message("ctrl+q to quit");
    if let Some(path) = &args.file {
        frontend.post_info(&format!("viewing {}", path.display()));
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut scheduler = Scheduler::new(frontend, terminal, rx);
    match InputActor::spawn(tx, poll_timeout) {
        Ok(actor) => scheduler.attach_input_actor(actor),
        Err(e) => {
            drop(scheduler);
            eprintln!("termview: cannot start input thread: {e}");
            return ExitCode::FAILURE;
        }
    }

    let result = scheduler.run(&mut model);
    // Dropping the scheduler restores the terminal before anything is printed.
    drop(scheduler);

    if let Err(e) = result {
        eprintln!("termview: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(console) = model.console().and_then(|id| model.view_mut(id)) {
        println!("{}", console.buffer_mut().text());
    }
    ExitCode::SUCCESS
}
