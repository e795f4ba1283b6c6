/// Coinlore Market Dashboard
///
/// Terminal dashboard over the public Coinlore API: headline stats, top-10 bar charts of coins by
/// price and exchanges by volume, and searchable coin and exchange tables.
///
/// Keys: Esc quit, Tab switch search input, F5 / Ctrl-R reload, Up / Down scroll.
use std::{
    error::Error,
    fs::OpenOptions,
    io,
    path::Path,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use coinlore_dashboard::{
    fetch_market_data, render_dashboard, Dashboard, DashboardConfig, MarketData, Page, UiState,
};
use coinlore_data::{CoinloreClient, FetchError, MarketFetcher};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

type RefreshResult = Result<MarketData, FetchError>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env();
    init_logging(&config.log_file)?;

    info!(?config, "starting coinlore dashboard");

    let client = CoinloreClient::new(config.client_config())?;
    info!(
        tickers = %client.tickers_url(),
        markets = %client.markets_url(),
        "coinlore endpoints"
    );
    let fetcher: Arc<dyn MarketFetcher> = Arc::new(client);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut page = Page::standard();
    let mut dashboard = Dashboard::new();
    let mut ui = UiState::default();

    // Refresh results come back from spawned fetch tasks; only this loop touches the page
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<RefreshResult>();
    request_refresh(&mut dashboard, &mut page, &fetcher, &refresh_tx);

    let mut last_draw: Option<Instant> = None;
    let mut dirty = true;

    let result = loop {
        while let Ok(result) = refresh_rx.try_recv() {
            dashboard.complete_refresh(result, &mut page);
            ui.coin_scroll = 0;
            ui.exchange_scroll = 0;
            dirty = true;
        }

        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Esc => break Ok(()),
                    KeyCode::Char('c') if ctrl => break Ok(()),
                    KeyCode::F(5) => request_refresh(&mut dashboard, &mut page, &fetcher, &refresh_tx),
                    KeyCode::Char('r') if ctrl => {
                        request_refresh(&mut dashboard, &mut page, &fetcher, &refresh_tx)
                    }
                    KeyCode::Tab | KeyCode::BackTab => ui.focus = ui.focus.toggle(),
                    KeyCode::Up => ui.scroll_up(),
                    KeyCode::Down => {
                        let row_count = page.rows(ui.focus.table_id()).map_or(0, |rows| rows.len());
                        ui.scroll_down(row_count);
                    }
                    KeyCode::Backspace => {
                        let input_id = ui.focus.input_id();
                        if let Some(query) = page.input_pop(input_id).map(str::to_string) {
                            dashboard.handle_search(input_id, &query, &mut page);
                            ui.reset_scroll();
                        }
                    }
                    KeyCode::Char(ch) if !ctrl => {
                        let input_id = ui.focus.input_id();
                        if let Some(query) = page.input_push(input_id, ch).map(str::to_string) {
                            dashboard.handle_search(input_id, &query, &mut page);
                            ui.reset_scroll();
                        }
                    }
                    _ => {}
                }
                dirty = true;
            }
        }

        let due = last_draw.map_or(true, |drawn| drawn.elapsed() >= config.tick);
        if dirty || due {
            terminal.draw(|f| render_dashboard(f, &page, &dashboard, &ui))?;
            last_draw = Some(Instant::now());
            dirty = false;
        }

        tokio::time::sleep(Duration::from_millis(5)).await;
    };

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("coinlore dashboard stopped");
    result
}

/// Start a refresh cycle unless one is already in flight
fn request_refresh(
    dashboard: &mut Dashboard,
    page: &mut Page,
    fetcher: &Arc<dyn MarketFetcher>,
    refresh_tx: &mpsc::UnboundedSender<RefreshResult>,
) {
    if dashboard.is_loading() {
        debug!("reload requested while a refresh is in flight, ignoring");
        return;
    }

    dashboard.begin_refresh(page);

    let fetcher = Arc::clone(fetcher);
    let refresh_tx = refresh_tx.clone();
    tokio::spawn(async move {
        let result = fetch_market_data(fetcher.as_ref()).await;
        // Receiver only drops on shutdown
        let _ = refresh_tx.send(result);
    });
}

/// Log to a file so output does not corrupt the terminal UI
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
