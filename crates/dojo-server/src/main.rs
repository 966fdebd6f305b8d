//! dojo-server binary.
//!
//! ```text
//! dojo-server --config config.toml            # serve
//! dojo-server --config config.toml --check    # validate config and exit
//! dojo-server --hash-password                 # print a PHC hash for config.toml
//! ```

use std::{io::BufRead, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use dojo_server::{AppState, ServerConfig, auth::hash_password};
use dojo_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Dojo academy schedule server")]
struct Cli {
  /// TOML configuration file; `DOJO_*` environment variables override it.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read a password from stdin, print its argon2 hash and exit.
  #[arg(long, conflicts_with = "check")]
  hash_password: bool,

  /// Validate the configuration, print the effective settings and exit.
  #[arg(long)]
  check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let hash = hash_password(line.trim_end_matches(['\r', '\n']))
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("invalid configuration ({})", cli.config.display()))?;
  let store_path = cfg.resolved_store_path();

  tracing::info!(
    address = %cfg.address(),
    store = %store_path.display(),
    user = %cfg.auth_username,
    max_expansion_days = cfg.max_expansion_days,
    "configuration loaded"
  );
  if cli.check {
    println!("address            {}", cfg.address());
    println!("store_path         {}", store_path.display());
    println!("auth_username      {}", cfg.auth_username);
    println!("max_expansion_days {}", cfg.max_expansion_days);
    return Ok(());
  }

  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;

  let address = cfg.address();
  let state = AppState {
    store:  Arc::new(store),
    auth:   Arc::new(cfg.auth()),
    config: Arc::new(cfg),
  };
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!("listening on http://{address}");
  axum::serve(listener, dojo_server::router(state))
    .await
    .context("server error")
}
