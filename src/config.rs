//! Client configuration.

use std::path::PathBuf;

use clap::Args;

/// Settings shared by every command, sourced from flags or environment.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the backend API.
    #[arg(
        long,
        env = "PHARMALINK_API_URL",
        default_value = "http://localhost:5297/api"
    )]
    pub api_url: String,

    /// Where the session token is kept between invocations.
    #[arg(
        long,
        env = "PHARMALINK_CREDENTIAL_FILE",
        default_value = ".pharmalink-credential"
    )]
    pub credential_path: PathBuf,

    /// Log level filter when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
