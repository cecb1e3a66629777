/// Waveline - headless command-line player
mod headless;
mod settings;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use headless::{HeadlessMedia, LoggingSession};
use settings::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waveline_playback::{PlaybackStore, PlayerState, RepeatMode, TrackId};
use waveline_server_client::WavelineServerClient;
use waveline_session::{
    media_event_channel, MediaBridge, MediaSessionBridge, PlayOutcome, PlaybackOrchestrator,
};

#[derive(Parser)]
#[command(name = "waveline")]
#[command(about = "Headless Waveline player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./waveline.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL
    #[arg(long, global = true, env = "WAVELINE_URL")]
    server: Option<String>,

    /// Bearer token for the server
    #[arg(long, global = true, env = "WAVELINE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a collection, start it and print the queue
    Play {
        #[command(flatten)]
        target: Target,

        /// Track id to start at
        #[arg(long)]
        start: Option<i64>,

        /// Shuffle everything after the starting track
        #[arg(long)]
        shuffle: bool,

        /// Repeat mode: none, all or one
        #[arg(long)]
        repeat: Option<RepeatMode>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Playlist id
    #[arg(long)]
    playlist: Option<String>,

    /// Album id
    #[arg(long)]
    album: Option<String>,

    /// Music list id
    #[arg(long)]
    music_list: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waveline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(url) = cli.server {
        config.server.url = url;
    }
    if let Some(token) = cli.token {
        config.server.access_token = Some(token);
    }

    match cli.command {
        Commands::Play {
            target,
            start,
            shuffle,
            repeat,
        } => {
            play(config, target, start.map(TrackId::new), shuffle, repeat).await?;
        }
    }

    Ok(())
}

async fn play(
    config: AppConfig,
    target: Target,
    start: Option<TrackId>,
    shuffle: bool,
    repeat: Option<RepeatMode>,
) -> anyhow::Result<()> {
    let client = WavelineServerClient::new(config.server.client_config())
        .context("Invalid server configuration")?;
    let store = PlaybackStore::new(config.playback);

    let (media_tx, media_rx) = media_event_channel();
    let mut media_bridge = MediaBridge::new(
        store.clone(),
        Arc::new(HeadlessMedia::new(media_tx)),
        media_rx,
    );
    let _session_bridge = MediaSessionBridge::new(store.clone(), Arc::new(LoggingSession));

    let orchestrator = PlaybackOrchestrator::new(store.clone(), Arc::new(client));
    let outcome = match target {
        Target {
            playlist: Some(id), ..
        } => orchestrator.play_playlist(id, start).await,
        Target { album: Some(id), .. } => orchestrator.play_album(id, start).await,
        Target {
            music_list: Some(id),
            ..
        } => orchestrator.play_music_list(id, start).await,
        _ => anyhow::bail!("One of --playlist, --album or --music-list is required"),
    }?;

    if let PlayOutcome::Replaced { collection, length, .. } = &outcome {
        tracing::info!(collection = %collection, length, "Collection started");
    }

    if let Some(mode) = repeat {
        store.set_repeat_mode(mode);
    }
    if shuffle {
        store.toggle_shuffle();
    }
    media_bridge.drain().await;

    print_queue(&store.snapshot());
    Ok(())
}

fn print_queue(state: &PlayerState) {
    println!(
        "Queue ({} tracks, {:?}, repeat {}, shuffle {}):",
        state.tracks().len(),
        state.status(),
        state.repeat_mode(),
        if state.shuffle_enabled() { "on" } else { "off" }
    );
    for (index, track) in state.tracks().iter().enumerate() {
        let marker = if state.current_index() == Some(index) {
            ">"
        } else {
            " "
        };
        println!(
            "{} {:>3}. {} - {} [{}:{:02}]",
            marker,
            index + 1,
            track.artist_name,
            track.name,
            track.duration_seconds / 60,
            track.duration_seconds % 60
        );
    }
}
