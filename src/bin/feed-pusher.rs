//! feed-pusher CLI
//!
//! Pushes every package in a directory to a NuGet feed and sorts the
//! leftovers: published packages are deleted, rejected ones quarantined.

use anyhow::Result;
use clap::Parser;
use feed_pusher::telemetry::init_tracing;
use feed_pusher::{CliOverrides, ConfigLoadOptions, ConfigLoader, PushError};
use std::path::PathBuf;
use std::process;
use tracing::Level;

/// Push packaged artifacts to a private NuGet feed
#[derive(Parser)]
#[command(name = "feed-pusher")]
#[command(version)]
#[command(about = "Push packaged artifacts to a private NuGet feed", long_about = None)]
struct Cli {
    /// Directory holding the packages to push
    #[arg(value_name = "SOURCE_DIR")]
    source_dir: PathBuf,

    /// Directory receiving packages whose push failed
    #[arg(value_name = "QUARANTINE_DIR")]
    quarantine_dir: PathBuf,

    /// Feed push source URL (env: FEED_PUSHER_SOURCE_URL)
    #[arg(long)]
    feed_url: Option<String>,

    /// Feed API key (prefer env: FEED_PUSHER_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Package-manager executable (env: FEED_PUSHER_DOTNET)
    #[arg(long, value_name = "PATH")]
    dotnet: Option<PathBuf>,

    /// Only push files whose name matches this regular expression
    #[arg(long, value_name = "REGEX")]
    pattern: Option<String>,

    /// Exit with status 1 when any package failed or was left in place
    #[arg(long)]
    fail_on_error: bool,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Show diagnostic output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { Level::DEBUG } else { Level::WARN });

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            if let Some(push_error) = e.downcast_ref::<PushError>() {
                for action in push_error.suggested_actions() {
                    eprintln!("  - {}", action);
                }
            }
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let options = ConfigLoadOptions {
        cli: CliOverrides {
            source_dir: cli.source_dir,
            quarantine_dir: cli.quarantine_dir,
            feed_url: cli.feed_url,
            api_key: cli.api_key,
            executable: cli.dotnet,
            pattern: cli.pattern,
            fail_on_error: cli.fail_on_error,
            report_path: cli.report,
        },
        env: std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect(),
    };

    let config = ConfigLoader::load(options)?;
    tracing::debug!(?config, "configuration resolved");

    Ok(feed_pusher::run(&config)?)
}
