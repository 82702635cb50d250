//! Error types for the fetch pipeline.
//!
//! # Design
//! One flat enum for the whole URL → socket → response chain. Every variant
//! is fail-fast: nothing is retried or recovered internally, each error
//! surfaces to the caller and, in the CLI, aborts the run with a diagnostic
//! on stderr. The HTML parser has no variant here on purpose — it tolerates
//! any input and never fails.

use std::fmt;
use std::io;

/// Errors produced while resolving a URL, talking to the server, or
/// parsing the response head.
#[derive(Debug)]
pub enum BrowseError {
    /// The URL has no `://` delimiter, or its scheme is neither `http`
    /// nor `https`.
    MalformedUrl(String),

    /// The `:port` suffix on the host is not a valid decimal port number.
    MalformedPort(String),

    /// The TCP connection could not be established, or broke mid-stream.
    Connection(io::Error),

    /// TLS setup or handshake failed (trust store, SNI name, certificate).
    TlsHandshake(String),

    /// The response carries a `transfer-encoding` or `content-encoding`
    /// header — chunked and compressed bodies are detected and rejected,
    /// never decoded. Holds the offending header name.
    UnsupportedEncoding(String),

    /// The status line or a header line does not follow HTTP syntax
    /// (missing fields, non-numeric status, header without a colon).
    ProtocolParse(String),
}

impl fmt::Display for BrowseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowseError::MalformedUrl(url) => {
                write!(f, "URL malformée : {url:?} (attendu http://… ou https://…)")
            }
            BrowseError::MalformedPort(port) => {
                write!(f, "port invalide : {port:?}")
            }
            BrowseError::Connection(e) => {
                write!(f, "échec de connexion : {e}")
            }
            BrowseError::TlsHandshake(msg) => {
                write!(f, "échec du handshake TLS : {msg}")
            }
            BrowseError::UnsupportedEncoding(header) => {
                write!(f, "encodage de réponse non supporté (en-tête {header})")
            }
            BrowseError::ProtocolParse(msg) => {
                write!(f, "réponse HTTP malformée : {msg}")
            }
        }
    }
}

impl std::error::Error for BrowseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowseError::Connection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BrowseError {
    fn from(e: io::Error) -> Self {
        BrowseError::Connection(e)
    }
}

impl From<rustls::Error> for BrowseError {
    fn from(e: rustls::Error) -> Self {
        BrowseError::TlsHandshake(e.to_string())
    }
}
