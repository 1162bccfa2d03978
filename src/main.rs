use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
use config::FileConfig;

mod notices;
use notices::SqliteNoticeStore;

mod server;
use server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite notices database file.
    #[clap(value_parser = parse_path)]
    pub notices_db: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Lifetime of dismissal nonces in seconds.
    #[clap(long, default_value_t = 86400)]
    pub nonce_lifetime_secs: i64,

    /// Path to the admin frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Path to an optional TOML config file; its values override the CLI.
    #[clap(long, value_parser = parse_path)]
    pub config_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config_file {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let db_path = file_config
        .db_path
        .as_deref()
        .map(parse_path)
        .transpose()?
        .unwrap_or(cli_args.notices_db);

    let logging_level = match file_config.logging_level.as_deref() {
        Some("none") => RequestsLoggingLevel::None,
        Some("path") => RequestsLoggingLevel::Path,
        Some("headers") => RequestsLoggingLevel::Headers,
        Some(other) => anyhow::bail!("Unknown logging level in config file: {}", other),
        None => cli_args.logging_level,
    };

    let config = ServerConfig {
        requests_logging_level: logging_level,
        port: file_config.port.unwrap_or(cli_args.port),
        nonce_lifetime_secs: file_config
            .nonce_lifetime_secs
            .unwrap_or(cli_args.nonce_lifetime_secs),
        nonce_secret: file_config.nonce_secret,
        frontend_dir_path: file_config
            .frontend_dir_path
            .or(cli_args.frontend_dir_path),
    };

    let notice_store =
        Arc::new(SqliteNoticeStore::new(&db_path).context("Failed to open notices store")?);

    info!(
        "Serving admin notices from {:?} on port {}",
        db_path, config.port
    );
    run_server(notice_store, config).await
}
