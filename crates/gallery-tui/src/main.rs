use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use gallery_core::catalog::http::DEFAULT_BASE_URL;
use gallery_core::config_file::{CatalogConfig, DisplayConfig, SelectionConfig, load_config};
use gallery_core::{
    BulkStrategy, ChannelStorage, FileStorage, HttpCatalog, MemoryStorage, PAGE_SIZE,
    SelectionStorage, SelectionStore,
};

mod action;
mod app;
mod backend;
mod input;
mod logging;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Status messages and the spinner advance once per tick.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Artworks gallery: browse the Art Institute of Chicago catalog page by page
/// and keep a selection that survives navigation and restarts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Catalog endpoint (default: the public Art Institute of Chicago API)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for the persisted selection
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// How "select first N" works: fetch-ahead or visited-only
    #[arg(long)]
    bulk_strategy: Option<BulkStrategy>,

    /// Keep the selection in memory only
    #[arg(long)]
    no_persist: bool,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = logging::init_logging();

    // Resolve config: CLI flags > env vars > config file > defaults
    let config = load_config();
    let catalog_cfg = config.catalog.unwrap_or_default();
    let selection_cfg = config.selection.unwrap_or_default();
    let display_cfg = config.display.unwrap_or_default();

    let base_url = resolve_base_url(args.base_url, &catalog_cfg);
    let strategy = args
        .bulk_strategy
        .or(selection_cfg.bulk_strategy)
        .unwrap_or_default();
    let persist = !args.no_persist && selection_cfg.persist.unwrap_or(true);
    let data_dir = resolve_data_dir(args.data_dir, &selection_cfg);
    let theme_name = args
        .theme
        .or(display_cfg.theme.clone())
        .unwrap_or_else(|| "hacker".to_string());
    let frame_rate = frame_interval(&display_cfg);

    tracing::info!(
        %base_url,
        %strategy,
        persist,
        data_dir = ?data_dir,
        "starting gallery"
    );

    let catalog = HttpCatalog::new(base_url, catalog_cfg.user_agent.as_deref())?;

    let inner: Arc<dyn SelectionStorage> = match (persist, data_dir) {
        (true, Some(dir)) => Arc::new(FileStorage::new(dir)),
        (true, None) => {
            tracing::warn!("no data directory available, selection will not be saved");
            Arc::new(MemoryStorage::new())
        }
        (false, _) => Arc::new(MemoryStorage::new()),
    };
    let (storage, writer) = ChannelStorage::spawn(inner);
    let selection = SelectionStore::restore(Arc::new(storage));

    let mut app = App::new(theme::Theme::by_name(&theme_name), selection, strategy);

    // Backend channels
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();
    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(backend::run(
        Arc::new(catalog),
        cmd_rx,
        event_tx,
        cancel.clone(),
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    // The table starts on its first page.
    app.change_page(0, PAGE_SIZE);

    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
            _ = async {
                if event::poll(frame_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt, &app.input_mode));
                }
            } => {}
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.update(action::Action::Tick);
            last_tick = Instant::now();
        }

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    // Dropping the app drops the last storage handle, letting the writer
    // flush and exit.
    drop(app);
    if let Err(e) = writer.await {
        tracing::warn!(error = %e, "selection writer did not finish cleanly");
    }

    Ok(())
}

fn resolve_base_url(cli: Option<String>, cfg: &CatalogConfig) -> String {
    cli.or_else(|| std::env::var("GALLERY_BASE_URL").ok())
        .or_else(|| cfg.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn resolve_data_dir(cli: Option<PathBuf>, cfg: &SelectionConfig) -> Option<PathBuf> {
    cli.or_else(|| std::env::var("GALLERY_DATA_DIR").ok().map(PathBuf::from))
        .or_else(|| cfg.data_dir.as_ref().map(PathBuf::from))
        .or_else(FileStorage::default_dir)
}

/// Redraw interval from the configured frame rate (default 10 fps).
fn frame_interval(cfg: &DisplayConfig) -> Duration {
    let fps = cfg.fps.unwrap_or(10).clamp(1, 60);
    Duration::from_millis(1000 / u64::from(fps))
}
