//! Command-line exporter for SetGraph workout history.
//!
//! Thin shell over `setgraph_client`: flag parsing, credential sourcing,
//! and file writing. All export logic lives in the library.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, ValueEnum};
use secrecy::SecretString;
use setgraph_client::config::Config;
use setgraph_client::http_client::ReqwestSetgraphClient;
use setgraph_client::serialize::{self, DateRange};
use setgraph_client::{Credentials, ExportService, SetgraphError};

/// Export workout history from a SetGraph account.
#[derive(Parser)]
#[command(name = "setgraph-export", version)]
#[command(about = "Export workout history from SetGraph as JSON or CSV")]
struct Cli {
    /// Account email or username (falls back to SETGRAPH_EMAIL)
    #[arg(short, long)]
    email: Option<String>,

    /// Output file path; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Keep only workouts started on or after this date (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Keep only workouts started on or before this date (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// API base URL override (falls back to SETGRAPH_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::from_env();
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }

    let Some(email) = cli.email.clone().or_else(|| config.email.clone()) else {
        bail!("no account email: pass --email or set SETGRAPH_EMAIL");
    };
    let password = match config.password.clone() {
        Some(password) => password,
        None => prompt_password(&email)?,
    };
    let credentials = Credentials {
        username_or_email: email,
        password,
    };
    let range = date_range(cli.from.as_deref(), cli.to.as_deref())?;

    let client = ReqwestSetgraphClient::from_config(&config);
    let service = ExportService::new(Arc::new(client));
    let data = match service.run(&credentials).await {
        Ok(data) => data,
        // A rejected login reads differently from any other API failure.
        Err(SetgraphError::Auth(message)) => bail!("login failed: {message}"),
        Err(SetgraphError::Api {
            status: Some(status),
            message,
        }) => bail!("export failed (HTTP {status}): {message}"),
        Err(SetgraphError::Api {
            status: None,
            message,
        }) => bail!("export failed: {message}"),
    };

    let data = if range.is_unbounded() {
        data
    } else {
        serialize::filter_by_range(data, &range)
    };
    let rendered = match cli.format {
        OutputFormat::Json => serialize::to_json(&data).context("rendering JSON")?,
        OutputFormat::Csv => serialize::to_csv(&data),
    };
    write_rendered(cli.output.as_deref(), &rendered)?;
    if let Some(path) = &cli.output {
        tracing::info!(workouts = data.total_workouts, path = %path.display(), "export written");
    }
    Ok(())
}

/// Filter from `SETGRAPH_LOG_LEVEL` (or `RUST_LOG`); `-v` raises the
/// default. Logs go to stderr so stdout stays clean for the export.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("SETGRAPH_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
}

fn prompt_password(email: &str) -> Result<SecretString> {
    eprint!("Password for {email}: ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("empty password");
    }
    Ok(SecretString::new(password.into()))
}

/// Expand `--from`/`--to` dates to an inclusive UTC range covering the
/// whole named days.
fn date_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    Ok(DateRange::new(
        from.map(|s| day_bound(s, NaiveTime::MIN)).transpose()?,
        to.map(|s| day_bound(s, end_of_day())).transpose()?,
    ))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).expect("valid time of day")
}

fn day_bound(date: &str, time: NaiveTime) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("invalid date `{date}`, expected YYYY-MM-DD"))?;
    Ok(date.and_time(time).and_utc())
}

fn write_rendered(output: Option<&Path>, rendered: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
