//! Request-line and URL parsing.

use crate::error::ProxyError;

/// The parsed first line of an HTTP request: `METHOD URI VERSION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// The request method, e.g. `"GET"`.
    pub method: String,
    /// The request URI exactly as sent by the client.
    pub uri: String,
    /// The HTTP version token the client sent, e.g. `"HTTP/1.1"`. The proxy
    /// never forwards this — the origin request line always speaks
    /// `HTTP/1.0` regardless.
    pub version: String,
}

/// Parses a request line of the form `METHOD URI VERSION`.
///
/// Mirrors the reference proxy's `sscanf(buf, "%s %s %s\n", ...)`: a line
/// with fewer than three whitespace-separated tokens is a parse failure.
pub fn parse_request_line(line: &str) -> Result<RequestLine, ProxyError> {
    let mut tokens = line.trim_end_matches(['\r', '\n']).split_whitespace();
    let method = tokens.next().ok_or(ProxyError::MalformedRequest)?;
    let uri = tokens.next().ok_or(ProxyError::MalformedRequest)?;
    let version = tokens.next().ok_or(ProxyError::MalformedRequest)?;

    Ok(RequestLine {
        method: method.to_string(),
        uri: uri.to_string(),
        version: version.to_string(),
    })
}

/// An absolute `http://` URL broken into the parts the proxy needs to
/// connect onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// The origin host, e.g. `"example.com"`.
    pub host: String,
    /// The origin port; defaults to 80 when the URL has none.
    pub port: u16,
    /// The path (and query string) to request from the origin, always
    /// starting with `/`.
    pub path: String,
}

const HOST_TERMINATORS: [char; 6] = [' ', ':', '/', '\r', '\n', '\0'];

/// Parses an absolute URL of the form `http://host[:port][/path]`.
///
/// Follows the reference proxy's `parse_url`: the host ends at the first of
/// `' '`, `':'`, `'/'`, `'\r'`, `'\n'`, `'\0'`, or end of string; a missing
/// path defaults to `"/"`; a missing port defaults to 80.
pub fn parse_url(uri: &str) -> Result<ParsedUrl, ProxyError> {
    let rest = uri.strip_prefix("http://").or_else(|| uri.strip_prefix("HTTP://")).ok_or_else(|| {
        ProxyError::MalformedUrl {
            uri: uri.to_string(),
        }
    })?;

    let host_end = rest.find(HOST_TERMINATORS).unwrap_or(rest.len());
    let (host_part, remainder) = rest.split_at(host_end);
    if host_part.is_empty() {
        return Err(ProxyError::MalformedUrl {
            uri: uri.to_string(),
        });
    }

    let (host, port) = if let Some(port_str) = remainder.strip_prefix(':') {
        let port_digits: String = port_str.chars().take_while(|c| c.is_ascii_digit()).collect();
        let port = port_digits.parse().unwrap_or(80);
        (host_part.to_string(), port)
    } else {
        (host_part.to_string(), 80)
    };

    let path_start = remainder.find('/');
    let path = match path_start {
        Some(idx) => remainder[idx..].to_string(),
        None => "/".to_string(),
    };

    Ok(ParsedUrl { host, port, path })
}
