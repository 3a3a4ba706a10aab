use anyhow::bail;
use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;
use tracing::{error, info, warn};
use xsnap::actor::config_watcher::ConfigWatcher;
use xsnap::actor::engine::{Engine, Event};
use xsnap::common::config::{Config, config_file};
use xsnap::common::log;
use xsnap::layout::{Direction, Layout, Snapper};
use xsnap::sys::deps;
use xsnap::sys::notify::Notifier;
use xsnap::sys::window::XdoServer;

#[derive(Parser)]
#[command(name = "xsnap", about = "Hotkey-driven window snapping for X11 desktops")]
struct Cli {
    /// Check that the configuration file parses, then exit.
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the hotkey daemon (the default).
    Run,
    /// Apply a named layout to the focused window, then exit.
    Apply { layout: String },
    /// Snap the focused window in a direction (left/right/up/down), then exit.
    Snap { direction: String },
    /// List every layout name in canonical order.
    Layouts,
}

fn main() -> anyhow::Result<()> {
    let cli: Cli = Parser::parse();

    if std::env::var_os("RUST_BACKTRACE").is_none() {
        // SAFETY: We are single threaded at this point.
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    log::init_logging();
    install_panic_hook();

    if cli.validate {
        Config::read(&config_file())?;
        println!("{}: OK", config_file().display());
        return Ok(());
    }

    let notifier = Notifier::new();

    match cli.command.unwrap_or(Cmd::Run) {
        Cmd::Layouts => {
            for layout in Layout::iter() {
                println!("{layout}");
            }
            Ok(())
        }
        Cmd::Apply { layout } => {
            let (config, runtime) = bootstrap(&notifier)?;
            runtime.block_on(apply_once(&layout, &config))
        }
        Cmd::Snap { direction } => {
            let (config, runtime) = bootstrap(&notifier)?;
            runtime.block_on(snap_once(&direction, &config))
        }
        Cmd::Run => {
            let (config, runtime) = bootstrap(&notifier)?;
            runtime.block_on(run_daemon(config, notifier));
            Ok(())
        }
    }
}

/// Refuses to start without the external tools, then loads the config and
/// builds the runtime everything runs on.
fn bootstrap(notifier: &Notifier) -> anyhow::Result<(Config, tokio::runtime::Runtime)> {
    let missing = deps::missing_tools();
    if !missing.is_empty() {
        eprintln!("Error: missing required command(s): {}.", missing.join(", "));
        eprintln!(
            "On Debian, install them with: sudo apt install xdotool x11-xserver-utils libnotify-bin"
        );
        std::process::exit(1);
    }

    let config = load_config(notifier);
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    Ok((config, runtime))
}

/// Loads `~/.xsnap.json`, writing the defaults on first run. A malformed
/// file notifies the user once and falls back to the built-in defaults; it
/// never stops the program.
fn load_config(notifier: &Notifier) -> Config {
    let path = config_file();
    if !path.exists() {
        if let Err(err) = Config::save_default(&path) {
            warn!("could not write default config to {}: {err:#}", path.display());
        }
    }

    match Config::read(&path) {
        Ok(config) => config,
        Err(err) => {
            warn!("invalid config {}: {err:#}", path.display());
            notifier.send_error(
                "Invalid configuration",
                &format!("Using default config. Error in {}: {err}", path.display()),
            );
            Config::default()
        }
    }
}

async fn apply_once(name: &str, config: &Config) -> anyhow::Result<()> {
    let Some(layout) = Layout::from_name(name) else {
        bail!("unknown layout {name:?}; run `xsnap layouts` for the full list");
    };
    let mut snapper = Snapper::new(XdoServer::new(Notifier::new()));
    match snapper.apply_to_focused(layout, config).await? {
        Some(layout) => info!("applied {layout}"),
        None => info!("no focused window; nothing to do"),
    }
    Ok(())
}

async fn snap_once(direction: &str, config: &Config) -> anyhow::Result<()> {
    let Ok(direction) = direction.parse::<Direction>() else {
        bail!("unknown direction {direction:?}; expected left, right, up or down");
    };
    let mut snapper = Snapper::new(XdoServer::new(Notifier::new()));
    match snapper.modify_layout(direction, config).await? {
        Some(layout) => info!("applied {layout}"),
        None => info!("no focused window; nothing to do"),
    }
    Ok(())
}

async fn run_daemon(config: Config, notifier: Notifier) {
    let notify_on_launch = config.notify_on_launch;
    let (engine, events_tx) =
        Engine::new(config, XdoServer::new(notifier.clone()), notifier.clone());

    ConfigWatcher::spawn(events_tx.clone());

    let shutdown_tx = events_tx.clone();
    if let Err(err) = ctrlc::set_handler(move || shutdown_tx.send(Event::Shutdown)) {
        error!("could not install signal handler: {err}");
    }

    if notify_on_launch {
        notifier.send("xsnap launched", "Hotkey window snapping is active.");
    }
    info!("xsnap running");

    engine.run().await;
}

#[cfg(panic = "unwind")]
fn install_panic_hook() {
    // Abort on panic instead of propagating panics to the main thread.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        original_hook(info);
        std::process::abort();
    }));
}

#[cfg(not(panic = "unwind"))]
fn install_panic_hook() {}
