use anyhow::{Context, Result};
use clap::Parser;
use playdeck::{MusicManager, Settings, shell};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Music library manager: playlist, queue, history and play counts
#[derive(Parser, Debug)]
#[command(name = "playdeck")]
#[command(version)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder of audio files to load
    #[arg(short, long)]
    songs_dir: Option<PathBuf>,

    /// Folder for the stats database
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Starting volume, 0-100
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(dir) = args.songs_dir {
        settings.songs_dir = dir;
    }
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }
    if let Some(volume) = args.volume {
        settings.volume = f32::from(volume) / 100.0;
    }
    let settings = settings.resolved()?;

    if args.print_config {
        print!("{}", toml::to_string(&settings)?);
        return Ok(());
    }

    info!(songs = %settings.songs_dir.display(), "Starting playdeck");
    let mut manager = MusicManager::open(settings).context("Failed to start playdeck")?;

    let loaded = manager.load_songs()?;
    if loaded == 0 {
        println!(
            "No audio files found in {}. Add up to {} songs and restart.",
            manager.songs_dir().display(),
            manager.settings().playlist_limit
        );
    } else {
        println!("Loaded {loaded} songs.");
    }

    shell::run(&mut manager)
}
