//! The per-connection request pipeline: parse, look up, fetch, relay,
//! cache.

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;

use proxy_cache::governor::Governor;

use crate::error::ProxyError;
use crate::headers::{CanonicalHeader, SeenHeaders};
use crate::origin;
use crate::request::{parse_request_line, parse_url};

/// Handles one accepted client connection end-to-end.
///
/// Only GET is served; anything else gets a `501` error page. A malformed
/// request line or URL gets a `400`. A cache hit is served directly from
/// the governor with no origin connection at all.
pub fn handle_connection(stream: TcpStream, governor: &Arc<Governor>) -> io::Result<()> {
    let mut client = stream;
    let mut reader = BufReader::new(client.try_clone()?);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(());
    }

    if let Err(err) = serve(&mut client, &mut reader, &request_line, governor) {
        tracing::warn!(error = %err, "request failed");
        match err {
            // Origin connect failures and mid-relay I/O errors close the
            // client connection silently: the client may already hold
            // partial response bytes, and appending an error page to them
            // would corrupt the stream. Matches the reference proxy's
            // `close(serverfd); return;`.
            ProxyError::OriginConnect { .. } => {}
            other => client.write_all(&other.render())?,
        }
    }

    Ok(())
}

fn serve(
    client: &mut TcpStream,
    reader: &mut BufReader<TcpStream>,
    request_line: &str,
    governor: &Arc<Governor>,
) -> Result<(), ProxyError> {
    let line = parse_request_line(request_line)?;

    if !line.method.eq_ignore_ascii_case("GET") {
        // Still drain the header block so the connection can be closed
        // cleanly, matching the reference proxy's single-pass reader.
        let _ = drain_headers(reader);
        return Err(ProxyError::UnsupportedMethod { method: line.method });
    }

    let url = parse_url(&line.uri)?;

    if let Some(bytes) = governor.lookup(&line.uri) {
        let _ = drain_headers(reader);
        client.write_all(&bytes).map_err(|source| ProxyError::OriginConnect {
            host: url.host.clone(),
            port: url.port,
            source,
        })?;
        return Ok(());
    }

    let mut origin_stream = origin::connect(&url.host, url.port)?;

    let request_head = format!("{} {} HTTP/1.0\r\n", line.method, url.path);
    write_to_origin(&mut origin_stream, &url, request_head.as_bytes())?;

    let mut seen = SeenHeaders::default();
    forward_client_headers(reader, &mut origin_stream, &url, &mut seen)?;

    let missing = seen.missing_header_lines(&url.host);
    write_to_origin(&mut origin_stream, &url, missing.as_bytes())?;
    write_to_origin(&mut origin_stream, &url, b"\r\n")?;

    let object_max = governor.object_max();
    let cacheable = origin::relay_response(&origin_stream, &mut *client, object_max).map_err(
        |source| ProxyError::OriginConnect {
            host: url.host.clone(),
            port: url.port,
            source,
        },
    )?;

    if let Some(bytes) = cacheable {
        if !bytes.is_empty() {
            let _ = governor.insert(line.uri.as_str().into(), bytes.into());
        }
    }

    Ok(())
}

/// Reads client header lines one at a time, writing each to the origin
/// either verbatim or substituted with its canonical value, stopping at the
/// blank line that ends the header block.
fn forward_client_headers(
    reader: &mut BufReader<TcpStream>,
    origin_stream: &mut TcpStream,
    url: &crate::request::ParsedUrl,
    seen: &mut SeenHeaders,
) -> Result<(), ProxyError> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).map_err(|source| ProxyError::OriginConnect {
            host: url.host.clone(),
            port: url.port,
            source,
        })?;
        if n == 0 || line.len() <= 2 {
            break;
        }

        match CanonicalHeader::classify(&line) {
            Some(header) => {
                seen.mark(header);
                match header.canonical_value() {
                    Some(value) => write_to_origin(origin_stream, url, value.as_bytes())?,
                    None => write_to_origin(origin_stream, url, line.as_bytes())?,
                }
            }
            None => write_to_origin(origin_stream, url, line.as_bytes())?,
        }
    }
    Ok(())
}

fn drain_headers(reader: &mut BufReader<TcpStream>) -> io::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 || line.len() <= 2 {
            break;
        }
    }
    Ok(())
}

fn write_to_origin(
    origin_stream: &mut TcpStream,
    url: &crate::request::ParsedUrl,
    bytes: &[u8],
) -> Result<(), ProxyError> {
    origin_stream
        .write_all(bytes)
        .map_err(|source| ProxyError::OriginConnect {
            host: url.host.clone(),
            port: url.port,
            source,
        })
}
