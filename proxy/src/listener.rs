//! The accept loop: binds the listening socket and dispatches each accepted
//! connection to its own detached worker thread.

use std::net::TcpListener;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use proxy_cache::governor::Governor;

use crate::worker;

/// Binds `port` and serves connections until the listener itself fails.
pub fn run(port: u16, governor: Arc<Governor>) -> std::io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    tracing::info!(port, "proxy listening");
    serve(listener, governor)
}

/// Serves connections from an already-bound listener until it fails.
///
/// Each accepted connection runs on its own thread; the `JoinHandle` is
/// dropped rather than joined, so the accept loop never waits on a
/// request in flight. A panic inside a single connection's handler is
/// caught at the thread boundary so it cannot take the process down.
pub fn serve(listener: TcpListener, governor: Arc<Governor>) -> std::io::Result<()> {
    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "failed to accept connection");
                continue;
            }
        };

        let governor = Arc::clone(&governor);
        thread::spawn(move || {
            let peer = stream.peer_addr().ok();
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                worker::handle_connection(stream, &governor)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(?peer, error = %err, "connection ended with an I/O error");
                }
                Err(_) => {
                    tracing::error!(?peer, "worker thread panicked");
                }
            }
        });
    }

    Ok(())
}
