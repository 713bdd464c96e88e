//! CLI entry-point for serving the HTTP API and public directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api, config::Settings};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (default 8080).
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Static directory to serve instead of PUBLIC_DIR.
    #[arg(long)]
    pub public_dir: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(dir) = args.public_dir {
        settings.public_dir = dir;
    }
    api::serve(settings, args.host, args.port).await
}
