//! Replays recorded landmark sessions through the posture capture engine.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use posture_capture::{
    app::{ReplayApp, ReplaySession},
    config::{Config, EXAMPLE_CONFIG},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded session to replay (YAML format)
    #[arg(short, long, required_unless_present = "print_config")]
    session: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Posture capture replay");

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path).and_then(|cfg| cfg.validate().map(|()| cfg)) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let Some(session_path) = args.session else {
        return Ok(());
    };
    let session = ReplaySession::from_file(&session_path)
        .with_context(|| format!("Failed to load session from {session_path}"))?;

    let app = ReplayApp::new(config)?;
    let summary = app.run(&session)?;
    println!("{summary}");

    Ok(())
}
