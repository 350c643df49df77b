//! Command-line configuration for the `proxy` binary.

use clap::Parser;

/// A concurrent HTTP/1.0 caching forward proxy.
#[derive(Parser, Debug)]
#[command(name = "proxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on.
    pub port: u16,
}
