use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Transcription relay
#[derive(Debug, Parser)]
#[command(name = "relay", about = "Relays multipart transcription requests to Deepgram")]
pub struct Args {
    /// Path to a TOML configuration file; without one, configuration is
    /// read from DEEPGRAM_API_KEY, DEEPGRAM_BASE_URL and RELAY_LISTEN
    #[arg(short, long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "RELAY_LISTEN")]
    pub listen: Option<SocketAddr>,
}
