//! `isdst` — report whether an instant falls in a zone's daylight saving period.
//!
//! ```text
//! isdst --zone Australia/Broken_Hill --local 2020-01-01T00:00:00
//! isdst --zone America/Los_Angeles --unix 1221681866 --json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clap::{ArgGroup, Parser};
use isdst::{describe_instant, parse_rfc3339, IanaProvider, ZoneProvider, ZoneRules};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const LOCAL_HINT: &str = "expected YYYY-MM-DDTHH:MM:SS";

#[derive(Parser, Debug)]
#[command(
    name = "isdst",
    version,
    about = "Report whether an instant falls in a time zone's daylight saving period"
)]
#[command(group(ArgGroup::new("when").args(["unix", "at", "local"])))]
struct Cli {
    /// IANA time zone name (e.g., Australia/Broken_Hill)
    #[arg(short, long, default_value = "UTC")]
    zone: String,

    /// Seconds since the Unix epoch
    #[arg(long, allow_negative_numbers = true)]
    unix: Option<i64>,

    /// RFC 3339 datetime (e.g., 2008-09-17T20:04:26Z)
    #[arg(long)]
    at: Option<String>,

    /// Wall-clock time in the zone (e.g., 2020-01-01T00:00:00)
    #[arg(long)]
    local: Option<String>,

    /// Print the full snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The instant selected on the command line; now if none was given.
fn instant_for<Z: ZoneRules>(cli: &Cli, zone: &Z) -> Result<DateTime<Utc>> {
    if let Some(secs) = cli.unix {
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .with_context(|| format!("unix timestamp {secs} is out of range"));
    }
    if let Some(at) = &cli.at {
        return Ok(parse_rfc3339(at)?);
    }
    if let Some(local) = &cli.local {
        let naive = NaiveDateTime::parse_from_str(local.trim(), LOCAL_FORMAT)
            .with_context(|| format!("invalid local time '{local}', {LOCAL_HINT}"))?;
        return Ok(zone.resolve_local(naive)?);
    }
    Ok(Utc::now())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let zone = IanaProvider.resolve(&cli.zone)?;
    let instant = instant_for(&cli, &zone)?;
    debug!(zone = zone.name(), %instant, "classifying");

    let snapshot = describe_instant(instant, &zone)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{} ({})", snapshot.local, snapshot.abbreviation);
        println!("Is daylight savings? {}", snapshot.dst_active);
    }
    Ok(())
}
