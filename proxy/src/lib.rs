//! Library surface of the `proxy` binary, exposed so integration tests can
//! drive the request pipeline without spawning the full CLI.

/// Command-line argument parsing.
pub mod config;

/// Error types and the HTML error page they render.
pub mod error;

/// Canonical header substitution and forwarding.
pub mod headers;

/// The accept loop.
pub mod listener;

/// Connecting to, and relaying a response from, the origin server.
pub mod origin;

/// Request-line and URL parsing.
pub mod request;

/// The per-connection request pipeline.
pub mod worker;
