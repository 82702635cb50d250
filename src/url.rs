//! Absolute URL parsing into connection parameters.
//!
//! Deliberately much smaller than a standards-compliant URL parser: split
//! on the
//! first `://`, then host[:port], then path. No percent-decoding, no
//! query/fragment separation, no IPv6 literals. Anything that is not an
//! `http` or `https` absolute URL is rejected up front.

use std::fmt;
use std::str::FromStr;

use crate::error::BrowseError;

/// Schéma supporté. Fixe le port par défaut de la connexion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Port par défaut du schéma, utilisé en l'absence de suffixe `:port`.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Paramètres de connexion résolus : schéma, hôte, port, chemin.
///
/// Immuable une fois construit — une instance par requête.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Chemin de la requête, commence toujours par `/`. Les `/` internes
    /// sont conservés tels quels, sans décodage.
    pub path: String,
}

impl FromStr for Endpoint {
    type Err = BrowseError;

    fn from_str(raw: &str) -> Result<Self, BrowseError> {
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| BrowseError::MalformedUrl(raw.to_string()))?;

        let scheme = match scheme {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            _ => return Err(BrowseError::MalformedUrl(raw.to_string())),
        };

        // Pas de `/` après le schéma → le chemin est la racine.
        let (authority, path) = match rest.split_once('/') {
            Some((authority, remainder)) => (authority, format!("/{remainder}")),
            None => (rest, String::from("/")),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| BrowseError::MalformedPort(port.to_string()))?;
                (host, port)
            }
            None => (authority, scheme.default_port()),
        };

        Ok(Endpoint {
            scheme,
            host: host.to_string(),
            port,
            path,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}{}",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.path
        )
    }
}
