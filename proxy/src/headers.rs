//! Canonical request headers and the substitution/forwarding logic applied
//! to each client header line.
//!
//! The proxy canonicalizes six request headers to fixed values regardless of
//! what the client sent, and forwards everything else verbatim. A header is
//! matched by its wire prefix (`"Host: "`, `"Accept: "`, …), exactly as the
//! reference proxy matched with `strstr`.

/// The six headers this proxy canonicalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalHeader {
    /// `Host: <host>\r\n` — not substituted, just tracked: the client's own
    /// `Host:` line is forwarded as-is if present.
    Host,
    /// `Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n`
    Accept,
    /// `Accept-Encoding: gzip, deflate\r\n`
    AcceptEncoding,
    /// `Connection: close\r\n`
    Connection,
    /// `User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3\r\n`
    UserAgent,
    /// `Proxy-Connection: close\r\n`
    ProxyConnection,
}

/// Canonical `Accept:` line sent to every origin.
pub const ACCEPT: &str =
    "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n";
/// Canonical `Accept-Encoding:` line sent to every origin.
pub const ACCEPT_ENCODING: &str = "Accept-Encoding: gzip, deflate\r\n";
/// Canonical `Connection:` line sent to every origin.
pub const CONNECTION: &str = "Connection: close\r\n";
/// Canonical `Proxy-Connection:` line sent to every origin.
pub const PROXY_CONNECTION: &str = "Proxy-Connection: close\r\n";
/// Canonical `User-Agent:` line sent to every origin.
pub const USER_AGENT: &str =
    "User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3\r\n";

impl CanonicalHeader {
    /// Classifies a raw header line by its prefix, if it is one of the six
    /// canonicalized headers.
    pub fn classify(line: &str) -> Option<Self> {
        if line.starts_with("Host: ") {
            Some(Self::Host)
        } else if line.starts_with("Accept-Encoding: ") {
            Some(Self::AcceptEncoding)
        } else if line.starts_with("Accept: ") {
            Some(Self::Accept)
        } else if line.starts_with("Connection: ") {
            Some(Self::Connection)
        } else if line.starts_with("User-Agent: ") {
            Some(Self::UserAgent)
        } else if line.starts_with("Proxy-Connection: ") {
            Some(Self::ProxyConnection)
        } else {
            None
        }
    }

    /// The fixed replacement text sent to the origin in place of whatever
    /// the client sent, or `None` for `Host`, whose client-supplied value is
    /// forwarded unchanged.
    pub fn canonical_value(self) -> Option<&'static str> {
        match self {
            Self::Host => None,
            Self::Accept => Some(ACCEPT),
            Self::AcceptEncoding => Some(ACCEPT_ENCODING),
            Self::Connection => Some(CONNECTION),
            Self::UserAgent => Some(USER_AGENT),
            Self::ProxyConnection => Some(PROXY_CONNECTION),
        }
    }
}

/// Tracks which of the six canonical headers have been seen while replaying
/// the client's header block, so the missing ones can be appended with
/// their default values before the blank line that ends the request.
#[derive(Debug, Default)]
pub struct SeenHeaders {
    host: bool,
    accept: bool,
    accept_encoding: bool,
    connection: bool,
    user_agent: bool,
    proxy_connection: bool,
}

impl SeenHeaders {
    /// Records that `header` appeared in the client's request.
    pub fn mark(&mut self, header: CanonicalHeader) {
        match header {
            CanonicalHeader::Host => self.host = true,
            CanonicalHeader::Accept => self.accept = true,
            CanonicalHeader::AcceptEncoding => self.accept_encoding = true,
            CanonicalHeader::Connection => self.connection = true,
            CanonicalHeader::UserAgent => self.user_agent = true,
            CanonicalHeader::ProxyConnection => self.proxy_connection = true,
        }
    }

    /// Builds the lines for headers the client never sent, filling in the
    /// default `Host:` from the parsed URL when it was absent too.
    pub fn missing_header_lines(&self, host: &str) -> String {
        let mut out = String::new();
        if !self.host {
            out.push_str("Host: ");
            out.push_str(host);
            out.push_str("\r\n");
        }
        if !self.accept {
            out.push_str(ACCEPT);
        }
        if !self.accept_encoding {
            out.push_str(ACCEPT_ENCODING);
        }
        if !self.connection {
            out.push_str(CONNECTION);
        }
        if !self.user_agent {
            out.push_str(USER_AGENT);
        }
        if !self.proxy_connection {
            out.push_str(PROXY_CONNECTION);
        }
        out
    }
}
