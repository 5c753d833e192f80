use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use tagarela::core::config::{self, CliOverrides, EnvOverrides, TagarelaConfig};
use tagarela::tui;

#[derive(Parser)]
#[command(name = "tagarela", about = "Terminal client for a polling REST chat")]
struct Args {
    /// Chat server base URL, e.g. http://10.0.0.5/chat
    #[arg(short, long)]
    server: Option<String>,

    /// Seconds between polls
    #[arg(short, long)]
    interval: Option<u64>,

    /// Pre-fill the name prompt
    #[arg(short, long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to tagarela.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("tagarela.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}; using defaults", e);
        TagarelaConfig::default()
    });
    let cli = CliOverrides {
        server: args.server,
        interval_secs: args.interval,
    };
    let resolved = config::resolve(&file_config, &EnvOverrides::from_env(), &cli);

    log::info!(
        "Tagarela starting up against {} (poll every {:?})",
        resolved.base_url,
        resolved.poll_interval
    );

    tui::run(resolved, args.name)
}
