use std::path::PathBuf;

use clap::Parser;

/// OpenAI-compatible bridge to a Gemini-style streaming backend
#[derive(Debug, Parser)]
#[command(name = "bridge", about = "Serve OpenAI chat completions from a Gemini-style backend")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "bridge.toml", env = "BRIDGE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "BRIDGE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
