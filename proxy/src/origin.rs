//! Connecting to, and relaying a response from, the origin server.

use std::io::{self, Read, Write};
use std::net::TcpStream;

use crate::error::ProxyError;

/// Opens a connection to the origin server named by `host`/`port`.
pub fn connect(host: &str, port: u16) -> Result<TcpStream, ProxyError> {
    TcpStream::connect((host, port)).map_err(|source| ProxyError::OriginConnect {
        host: host.to_string(),
        port,
        source,
    })
}

/// Streams the origin's response to the client byte-for-byte as it arrives,
/// while also collecting it for the cache — unless the response turns out
/// to exceed `object_max`, in which case the collected copy is dropped (the
/// client has already received every byte regardless).
///
/// Returns `Some(bytes)` when the full response fit within `object_max` and
/// is eligible for caching, `None` otherwise.
pub fn relay_response<R: Read, W: Write>(
    mut origin: R,
    mut client: W,
    object_max: u64,
) -> io::Result<Option<Vec<u8>>> {
    let mut buf = [0u8; 8192];
    let mut collected = Vec::new();
    let mut total: u64 = 0;
    let mut over_budget = false;

    loop {
        let n = origin.read(&mut buf)?;
        if n == 0 {
            break;
        }
        client.write_all(&buf[..n])?;
        total += n as u64;

        if !over_budget {
            if total <= object_max {
                collected.extend_from_slice(&buf[..n]);
            } else {
                over_budget = true;
                collected.clear();
                collected.shrink_to_fit();
            }
        }
    }

    Ok(if over_budget { None } else { Some(collected) })
}
