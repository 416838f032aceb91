//! MouseChat - ask an AI about the text you have selected

use anyhow::{Context, Result};
use clap::Parser;
use mousechat::client::OpenRouterClient;
use mousechat::clipboard::{PrimarySelection, SystemClipboard};
use mousechat::config::{self, AppConfig};
use mousechat::console::{self, ConsolePresenter};
use mousechat::coordinator::Coordinator;
use mousechat::dispatcher::Dispatcher;
use mousechat::events;
use mousechat::hotkey;
use mousechat::input::{DisabledKeyboard, KeyboardControl, SystemKeyboard};
use mousechat::keys::KeyCombo;
use mousechat::selection::SelectionAcquirer;
use mousechat::store::{Store, KEY_CURRENT_MODEL};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Hotkey combo, e.g. "Alt+Q"
    #[arg(long)]
    hotkey: Option<String>,

    /// Model to start with
    #[arg(short, long)]
    model: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let mut config = AppConfig::load_from(&config_path)?;
    if let Some(hotkey) = args.hotkey {
        config.hotkey = hotkey;
    }

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🖱️ MouseChat v{} starting...", env!("CARGO_PKG_VERSION"));

    let combo: KeyCombo = config.combo().context("invalid hotkey")?;
    let client = OpenRouterClient::from_config(&config)?;

    let mut store = Store::open(config::settings_path());
    if let Some(model) = args.model {
        store.set(KEY_CURRENT_MODEL, model);
    }

    // Acquisition problems only mean an empty prefill, never a failed start
    let query = PrimarySelection::new().unwrap_or_else(|e| {
        warn!("⚠️ Selection query disabled: {}", e);
        PrimarySelection::unavailable()
    });
    let clipboard = SystemClipboard::new().unwrap_or_else(|e| {
        warn!("⚠️ Clipboard disabled: {}", e);
        SystemClipboard::unavailable()
    });
    let keyboard: Box<dyn KeyboardControl> = if std::env::var_os("DISPLAY").is_some() {
        Box::new(SystemKeyboard::new())
    } else {
        warn!("⚠️ No X display, copy fallback disabled");
        Box::new(DisabledKeyboard::new("no X display"))
    };
    let acquirer =
        SelectionAcquirer::new(query, clipboard, keyboard).with_settle(config.settle());

    let (tx, rx) = events::channel();

    // Hook failure only disables the hotkey; /open still works
    if let Err(e) = hotkey::spawn_monitor(combo.clone(), config.debounce(), tx.clone()) {
        error!("❌ Hotkey monitor not started: {}", e);
    }
    console::spawn_stdin_reader(tx.clone())?;

    let dispatcher = Dispatcher::new(Arc::new(client), tx);
    let mut coordinator = Coordinator::new(
        acquirer,
        ConsolePresenter::new(),
        dispatcher,
        store,
        config.model_list(),
    );

    info!("✅ MouseChat ready - press {} over selected text", combo);
    coordinator.run(rx);

    Ok(())
}
