//! `dojo`: command-line client for the Dojo schedule server.
//!
//! # Usage
//!
//! ```text
//! dojo --url http://localhost:8080 --user admin --password secret locations
//! dojo --config ~/.config/dojo/config.toml expand <location> --year 2025
//! ```

mod client;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, ExpandRange};
use dojo_core::schedule::{DayOfWeek, NewTemplate};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dojo", about = "Manage academy schedules on a Dojo server")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the dojo server (default: http://localhost:8080).
  #[arg(long, env = "DOJO_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "DOJO_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "DOJO_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all locations.
  Locations,
  /// Create a location.
  AddLocation { name: String },
  /// List the weekly templates of a location.
  Templates {
    location: Uuid,
    /// Include deactivated templates.
    #[arg(long)]
    all:      bool,
  },
  /// Add a weekly template to a location.
  AddTemplate {
    location:    Uuid,
    /// Day of week, 0 = Sunday .. 6 = Saturday.
    #[arg(long)]
    day:         u8,
    /// Start time, e.g. 18:00.
    #[arg(long, value_parser = parse_time)]
    start:       NaiveTime,
    /// End time, e.g. 19:30.
    #[arg(long, value_parser = parse_time)]
    end:         NaiveTime,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    capacity:    Option<u32>,
  },
  /// Stop a template from producing new sessions.
  Deactivate { template: Uuid },
  /// List sessions of a location.
  Sessions {
    location: Uuid,
    #[arg(long)]
    from:     Option<NaiveDate>,
    #[arg(long)]
    to:       Option<NaiveDate>,
    /// Include cancelled sessions.
    #[arg(long)]
    all:      bool,
  },
  /// Generate sessions from the active templates of a location.
  Expand {
    location: Uuid,
    #[arg(long, requires = "to", conflicts_with = "year")]
    from:     Option<NaiveDate>,
    #[arg(long, requires = "from", conflicts_with = "year")]
    to:       Option<NaiveDate>,
    /// Expand a whole calendar year.
    #[arg(long)]
    year:     Option<i32>,
  },
  /// Cancel a session.
  Cancel { session: Uuid },
}

/// Accepts `HH:MM` as well as `HH:MM:SS`.
fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
  NaiveTime::parse_from_str(s, "%H:%M")
    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
}

fn expand_range(
  from: Option<NaiveDate>,
  to: Option<NaiveDate>,
  year: Option<i32>,
) -> Result<ExpandRange> {
  match (from, to, year) {
    (None, None, Some(year)) => Ok(ExpandRange::Year { year }),
    (Some(start), Some(end), None) => Ok(ExpandRange::Range { start, end }),
    _ => bail!("expand needs either --from and --to, or --year"),
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// CLI flags override the config file, which overrides defaults.
fn resolve_config(args: &Args, file: ConfigFile) -> ApiConfig {
  fn pick(flag: &Option<String>, file: String) -> Option<String> {
    flag.clone().or_else(|| (!file.is_empty()).then_some(file))
  }
  ApiConfig {
    base_url: pick(&args.url, file.url).unwrap_or_else(|| DEFAULT_URL.to_string()),
    username: pick(&args.user, file.username).unwrap_or_default(),
    password: pick(&args.password, file.password).unwrap_or_default(),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve_config(&args, file_cfg))?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Locations => {
      for loc in client.list_locations().await? {
        println!("{}  {}", loc.location_id, loc.name);
      }
    }
    Command::AddLocation { name } => {
      let loc = client.add_location(&name).await?;
      println!("{}  {}", loc.location_id, loc.name);
    }
    Command::Templates { location, all } => {
      for t in client.list_templates(location, all).await? {
        println!(
          "{}  {:<9} {}-{}{}{}",
          t.template_id,
          t.day_of_week.to_string(),
          t.start_time.format("%H:%M"),
          t.end_time.format("%H:%M"),
          t.description.map(|d| format!("  {d}")).unwrap_or_default(),
          if t.active { "" } else { "  (inactive)" },
        );
      }
    }
    Command::AddTemplate { location, day, start, end, description, capacity } => {
      let mut input = NewTemplate::new(location, DayOfWeek::new(day)?, start, end);
      input.description = description;
      input.capacity = capacity;
      let t = client.add_template(&input).await?;
      println!("{}", t.template_id);
    }
    Command::Deactivate { template } => {
      let t = client.deactivate_template(template).await?;
      println!("deactivated {}", t.template_id);
    }
    Command::Sessions { location, from, to, all } => {
      for s in client.list_sessions(location, from, to, all).await? {
        println!(
          "{}  {} {}-{}{}",
          s.session_id,
          s.session_date,
          s.start_time.format("%H:%M"),
          s.end_time.format("%H:%M"),
          if s.active { "" } else { "  (cancelled)" },
        );
      }
    }
    Command::Expand { location, from, to, year } => {
      let outcome = client.expand(location, expand_range(from, to, year)?).await?;
      println!("{}", outcome.message);
      tracing::debug!(report = ?outcome.report, "expansion finished");
    }
    Command::Cancel { session } => {
      let s = client.cancel_session(session).await?;
      println!("cancelled {} on {}", s.session_id, s.session_date);
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(argv).unwrap()
  }

  #[test]
  fn flags_override_file_and_default() {
    let args = parse(&["dojo", "--url", "http://dojo:9000", "locations"]);
    let file = ConfigFile {
      url:      "http://file:1".into(),
      username: "coach".into(),
      password: String::new(),
    };
    let cfg = resolve_config(&args, file);
    assert_eq!(cfg.base_url, "http://dojo:9000");
    assert_eq!(cfg.username, "coach");
    assert_eq!(cfg.password, "");
  }

  #[test]
  fn default_url_when_nothing_given() {
    let args = Args {
      config:   None,
      url:      None,
      user:     None,
      password: None,
      command:  Command::Locations,
    };
    let cfg = resolve_config(&args, ConfigFile::default());
    assert_eq!(cfg.base_url, DEFAULT_URL);
    assert!(cfg.username.is_empty());
  }

  #[test]
  fn expand_accepts_range_or_year() {
    let loc = Uuid::new_v4().to_string();
    let args = parse(&["dojo", "expand", &loc, "--from", "2025-01-01", "--to", "2025-01-31"]);
    let Command::Expand { from, to, year, .. } = args.command else {
      panic!("expected expand");
    };
    assert_eq!(
      expand_range(from, to, year).unwrap(),
      ExpandRange::Range {
        start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end:   NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
      }
    );

    let args = parse(&["dojo", "expand", &loc, "--year", "2025"]);
    let Command::Expand { from, to, year, .. } = args.command else {
      panic!("expected expand");
    };
    assert_eq!(expand_range(from, to, year).unwrap(), ExpandRange::Year { year: 2025 });

    let both = ["dojo", "expand", &loc, "--year", "2025", "--from", "2025-01-01"];
    assert!(Args::try_parse_from(both).is_err());
    assert!(expand_range(None, None, None).is_err());
  }

  #[test]
  fn times_accept_minutes_or_seconds() {
    assert_eq!(parse_time("18:00").unwrap(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    assert_eq!(parse_time("18:00:30").unwrap(), NaiveTime::from_hms_opt(18, 0, 30).unwrap());
    assert!(parse_time("6pm").is_err());
  }
}
