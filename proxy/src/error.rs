//! Error types for the request pipeline, and the HTML error page they render
//! to the client.
//!
//! Each variant carries the `(errnum, shortmsg)` pair the wire response line
//! needs; `ProxyError::render` builds the full response the way the
//! reference proxy's `clienterror` built it, just from a typed error instead
//! of four loose string arguments.

use thiserror::Error;

/// Failure modes in parsing or serving a single client request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request used a method other than GET.
    #[error("unsupported method {method:?}")]
    UnsupportedMethod {
        /// The method token the client sent.
        method: String,
    },

    /// The request line did not have the form `METHOD URI VERSION`.
    #[error("malformed request line")]
    MalformedRequest,

    /// The request URI was not an absolute `http://` URL this proxy can
    /// parse into host/port/path.
    #[error("malformed url {uri:?}")]
    MalformedUrl {
        /// The URI the client sent.
        uri: String,
    },

    /// Connecting to the origin server failed.
    #[error("could not connect to origin {host}:{port}: {source}")]
    OriginConnect {
        /// The origin host the proxy attempted to reach.
        host: String,
        /// The origin port the proxy attempted to reach.
        port: u16,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl ProxyError {
    /// The three-digit status code this error is reported to the client as.
    pub fn errnum(&self) -> &'static str {
        match self {
            Self::UnsupportedMethod { .. } => "501",
            Self::MalformedRequest | Self::MalformedUrl { .. } => "400",
            Self::OriginConnect { .. } => "502",
        }
    }

    /// The short status phrase paired with `errnum`.
    pub fn shortmsg(&self) -> &'static str {
        match self {
            Self::UnsupportedMethod { .. } => "Not Implemented",
            Self::MalformedRequest | Self::MalformedUrl { .. } => "Bad Request",
            Self::OriginConnect { .. } => "Bad Gateway",
        }
    }

    /// The longer explanation shown in the error page body.
    pub fn longmsg(&self) -> &'static str {
        match self {
            Self::UnsupportedMethod { .. } => "Proxy only implements GET request",
            Self::MalformedRequest => "Proxy could not understand the request",
            Self::MalformedUrl { .. } => "Proxy could not understand the request",
            Self::OriginConnect { .. } => "Proxy could not reach the origin server",
        }
    }

    /// The value shown for "cause" in the error page — the offending
    /// method, URI, or origin, depending on the error kind.
    pub fn cause(&self) -> &str {
        match self {
            Self::UnsupportedMethod { method } => method,
            Self::MalformedRequest => "",
            Self::MalformedUrl { uri } => uri,
            Self::OriginConnect { host, .. } => host,
        }
    }

    /// Renders the full HTTP/1.0 error response to send to the client.
    pub fn render(&self) -> Vec<u8> {
        let body = format!(
            "<html><title>Proxy Server Error</title>\
             <body bgcolor=\"ffffff\">\r\n\
             {errnum}: {shortmsg}\r\n\
             <p>{longmsg}: {cause}\r\n\
             <hr><em>Proxy Server</em>\r\n",
            errnum = self.errnum(),
            shortmsg = self.shortmsg(),
            longmsg = self.longmsg(),
            cause = self.cause(),
        );

        let mut response = format!(
            "HTTP/1.0 {errnum} {shortmsg}\r\n\
             Content-type: text/html\r\n\
             Content-length: {len}\r\n\r\n",
            errnum = self.errnum(),
            shortmsg = self.shortmsg(),
            len = body.len(),
        )
        .into_bytes();
        response.extend_from_slice(body.as_bytes());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_method_renders_501() {
        let err = ProxyError::UnsupportedMethod {
            method: "POST".to_string(),
        };
        let rendered = String::from_utf8(err.render()).unwrap();
        assert!(rendered.starts_with("HTTP/1.0 501 Not Implemented"));
        assert!(rendered.contains("POST"));
    }

    #[test]
    fn malformed_url_renders_400() {
        let err = ProxyError::MalformedUrl {
            uri: "not-a-url".to_string(),
        };
        let rendered = String::from_utf8(err.render()).unwrap();
        assert!(rendered.starts_with("HTTP/1.0 400 Bad Request"));
        assert!(rendered.contains("not-a-url"));
    }
}
