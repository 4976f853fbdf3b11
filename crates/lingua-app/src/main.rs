use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lingua_core::capture_and_handoff;
use tracing_subscriber::EnvFilter;

mod capture;
mod controller;
mod events;
mod io;
mod mock;
mod profile;
mod state;

#[cfg(test)]
mod tests;

use self::capture::FileCapture;
use self::controller::AppController;
use self::io::{DetailPrinter, print_out, render_words};
use self::state::AppState;

/// Pick a word from captured screen text and get a contextual explanation from a local LLM.
#[derive(Parser)]
#[command(name = "lingua", version, about)]
struct Cli {
    /// Capture saved as JSON: {"width", "height", "fragments": [{"text", "bbox"}]}
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Folder holding profile files (defaults to $LINGUA_CONFIG_DIR or ./profiles)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Profile name to load
    #[arg(short, long, default_value = profile::MAIN_PROFILE)]
    profile: String,

    /// Analyze this word once and exit instead of reading commands
    #[arg(short, long)]
    word: Option<String>,

    /// Use offline dictionary and model stand-ins
    #[arg(long)]
    mock: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    if let Ok(path) = dotenv {
        tracing::debug!("[APP] Loaded environment from {}", path.display());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli));
    // A pending stdin read would otherwise keep the runtime alive
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let dir = profile::profiles_dir(cli.config_dir);
    profile::init_user_config(&dir)?;
    let config = profile::load_user_profile(&dir, &cli.profile)?;
    let capacity = config.event_channel_capacity;

    let state = Arc::new(AppState::new(config, cli.mock).with_profile(dir, cli.profile));

    match &cli.snapshot {
        Some(path) => {
            if let Err(e) = capture_and_handoff(&FileCapture::new(path), &state.handoff).await {
                tracing::error!("[CAPTURE] {}", e);
            }
        }
        None => tracing::warn!("[CAPTURE] No --snapshot given"),
    }

    state.session.load(&state.handoff, &state.builder).await;
    let words = render_words(&state.session.words().borrow());
    print_out(&words).await;

    match cli.word {
        Some(word) => analyze_once(&state, &word).await,
        None => run_interactive(state, capacity).await,
    }
}

async fn analyze_once(state: &AppState, word: &str) -> anyhow::Result<()> {
    let session = &state.session;
    if session.select_text(word).is_none() {
        anyhow::bail!("'{word}' is not among the captured words");
    }

    let mut details = session.details();
    if !session.request_analysis() {
        anyhow::bail!("Analysis did not start");
    }

    let mut printer = DetailPrinter::default();
    loop {
        let (text, finished) = {
            let current = details.borrow_and_update();
            (printer.render(&current), !current.is_loading)
        };
        print_out(&text).await;

        if finished {
            break;
        }
        details.changed().await?;
    }

    match details.borrow().error.clone() {
        Some(error) => Err(anyhow::anyhow!(error)),
        None => Ok(()),
    }
}

async fn run_interactive(state: Arc<AppState>, capacity: usize) -> anyhow::Result<()> {
    let controller = AppController::new(state, capacity);
    let mut tasks = controller.spawn_tasks();
    let cancel = controller.cancel_token();
    print_out("type 'help' for commands\n").await;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("[APP] Ctrl+C received, shutting down");
        }
        _ = cancel.cancelled() => {}
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::debug!("[APP] Task finished"),
                Ok(Err(e)) => tracing::error!("[APP] Task failed: {:#}", e),
                Err(e) => tracing::error!("[APP] Task panicked: {}", e),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::debug!("[APP] Task exited with: {:#}", e);
        }
    }

    Ok(())
}
