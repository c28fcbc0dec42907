mod routes;
mod server;
mod settings;

use crate::settings::Settings;
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load();
    info!("scoregate {} starting", env!("CARGO_PKG_VERSION"));
    server::serve(settings).await
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("scoregate {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "scoregate - NBA and F1 stats gateway

Usage:
  scoregate
  scoregate --help
  scoregate --version

Environment:
  SCOREGATE_ADDR                   Listen address (default 0.0.0.0:8000)
  SCOREGATE_LOGOS_DIR              Directory served under /logos (default logos)
  SCOREGATE_ERROR_MODE             legacy (always 200) or status (default legacy)
  SCOREGATE_UPSTREAM_TIMEOUT_SECS  Per-call upstream timeout (default 10)
  SCOREGATE_NBA_CDN_URL            Override cdn.nba.com
  SCOREGATE_NBA_STATS_URL          Override stats.nba.com
  SCOREGATE_JOLPICA_URL            Override api.jolpi.ca
  SCOREGATE_OPENF1_URL             Override api.openf1.org
  RUST_LOG                         Log filter (default info)"
}
