//! `proxy` — a concurrent HTTP/1.0 caching forward proxy.

use clap::Parser;
use std::sync::Arc;

use proxy_cache::config::CacheConfig;
use proxy_cache::governor::Governor;
use proxy_lib::config::Cli;
use proxy_lib::listener;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| tracing_subscriber::EnvFilter::new("info"),
        ))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprint!("{err}");
            std::process::exit(1);
        }
    };

    let governor = Arc::new(Governor::new(CacheConfig::default()));
    listener::run(cli.port, governor)?;

    Ok(())
}
