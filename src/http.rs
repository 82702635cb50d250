//! Transport HTTP(S) bloquant — une connexion, une requête, une réponse.
//!
//! Volontairement HTTP/1.0 : le serveur ferme la connexion après la réponse,
//! donc « lire jusqu'à la fin du flux » suffit pour délimiter le corps. Pas
//! de keep-alive, pas de redirections, pas de cache, pas de timeout (un pair
//! muet bloque indéfiniment — limitation assumée).
//!
//! Pour `https`, le handshake TLS est fait par rustls au-dessus du même
//! `TcpStream`, avec le trust store de la plateforme et le nom d'hôte de la
//! connexion comme nom SNI/de vérification.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use tracing::{debug, info, warn};

use crate::error::BrowseError;
use crate::url::{Endpoint, Scheme};

/// Réponse HTTP décodée.
///
/// Construite incrémentalement pendant la lecture du flux, puis rendue au
/// caller une fois le corps lu en entier. La connexion est déjà fermée
/// quand cette valeur existe.
#[derive(Debug)]
pub struct Response {
    /// Version annoncée par le serveur (`HTTP/1.0`, `HTTP/1.1`, …).
    pub version: String,
    pub status: u16,
    pub reason: String,
    /// En-têtes, clés en minuscules. En cas de doublon, la dernière
    /// occurrence gagne.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Response {
    /// Recherche d'en-tête insensible à la casse.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport : TCP nu ou TCP + TLS
// ─────────────────────────────────────────────────────────────────────────────

/// Flux vers le serveur, avec ou sans TLS. Posséder cette valeur, c'est
/// posséder la socket : le drop la ferme sur tous les chemins de sortie.
enum Transport {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Transport::Plain(s) => s.read(buf),
            Transport::Tls(s) => s.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Transport::Plain(s) => s.write(buf),
            Transport::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Transport::Plain(s) => s.flush(),
            Transport::Tls(s) => s.flush(),
        }
    }
}

/// Monte une session TLS sur la socket, en vérifiant le certificat serveur
/// contre le trust store de la plateforme, avec `host` comme nom SNI.
///
/// Le handshake est mené à terme ici : toute erreur de certificat ou de
/// protocole sort en [`BrowseError::TlsHandshake`] avant qu'un seul octet
/// de requête ne parte.
fn tls_handshake(
    mut tcp: TcpStream,
    host: &str,
) -> Result<StreamOwned<ClientConnection, TcpStream>, BrowseError> {
    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for error in &native.errors {
        warn!(%error, "Certificat du système illisible, ignoré");
    }
    for cert in native.certs {
        // Un certificat individuel invalide n'empêche pas les autres
        // de servir.
        let _ = roots.add(cert);
    }
    if roots.is_empty() {
        return Err(BrowseError::TlsHandshake(String::from(
            "aucun certificat racine utilisable dans le trust store",
        )));
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let server_name = ServerName::try_from(host.to_string())
        .map_err(|_| BrowseError::TlsHandshake(format!("nom de serveur invalide : {host:?}")))?;

    let mut conn = ClientConnection::new(Arc::new(config), server_name)?;
    while conn.is_handshaking() {
        conn.complete_io(&mut tcp)
            .map_err(|e| BrowseError::TlsHandshake(e.to_string()))?;
    }

    Ok(StreamOwned::new(conn, tcp))
}

// ─────────────────────────────────────────────────────────────────────────────
// Requête
// ─────────────────────────────────────────────────────────────────────────────

/// Envoie un GET et lit la réponse en entier.
///
/// Exactement une requête par connexion :
/// `GET <path> HTTP/1.0\r\nHost: <host>\r\n\r\n`, aucun autre en-tête.
/// La socket appartient à cette fonction et est fermée au retour, succès
/// comme erreur.
pub fn fetch(endpoint: &Endpoint) -> Result<Response, BrowseError> {
    let tcp = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
        .map_err(BrowseError::Connection)?;
    debug!(host = %endpoint.host, port = endpoint.port, "Connexion TCP établie");

    let mut transport = match endpoint.scheme {
        Scheme::Http => Transport::Plain(tcp),
        Scheme::Https => {
            let tls = tls_handshake(tcp, &endpoint.host)?;
            debug!(host = %endpoint.host, "Handshake TLS terminé");
            Transport::Tls(Box::new(tls))
        }
    };

    let request = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\n\r\n",
        endpoint.path, endpoint.host
    );
    transport.write_all(request.as_bytes())?;

    let mut reader = BufReader::new(transport);
    let response = read_response(&mut reader)?;
    info!(
        status = response.status,
        reason = %response.reason,
        bytes = response.body.len(),
        "Réponse reçue"
    );
    Ok(response)
}

// ─────────────────────────────────────────────────────────────────────────────
// Lecture de la réponse
// ─────────────────────────────────────────────────────────────────────────────

/// Lit une ligne terminée par CRLF, sans son terminateur.
///
/// Une fin de flux pendant la tête de réponse est une violation de
/// protocole — le corps, lui, se termine légitimement par EOF.
fn read_crlf_line<R: BufRead>(reader: &mut R) -> Result<String, BrowseError> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(BrowseError::ProtocolParse(String::from(
            "fin de flux avant la fin des en-têtes",
        )));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

/// Décode ligne de statut, en-têtes, puis le reste du flux comme corps.
///
/// Refuse la réponse (`UnsupportedEncoding`) si un en-tête
/// `transfer-encoding` ou `content-encoding` est présent, avant de lire le
/// moindre octet du corps.
fn read_response<R: BufRead>(reader: &mut R) -> Result<Response, BrowseError> {
    // Ligne de statut : découpe sur les deux premiers espaces.
    let status_line = read_crlf_line(reader)?;
    let mut parts = status_line.splitn(3, ' ');
    let version = parts
        .next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BrowseError::ProtocolParse(String::from("ligne de statut vide")))?
        .to_string();
    let status = parts.next().ok_or_else(|| {
        BrowseError::ProtocolParse(format!("ligne de statut incomplète : {status_line:?}"))
    })?;
    let status: u16 = status.parse().map_err(|_| {
        BrowseError::ProtocolParse(format!("code de statut non numérique : {status_line:?}"))
    })?;
    let reason = parts.next().unwrap_or("").to_string();

    // En-têtes jusqu'à la ligne vide. Clés repliées en minuscules,
    // valeurs débarrassées des blancs, dernier doublon gagnant.
    let mut headers = HashMap::new();
    loop {
        let line = read_crlf_line(reader)?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| {
            BrowseError::ProtocolParse(format!("ligne d'en-tête sans ':' : {line:?}"))
        })?;
        headers.insert(name.to_ascii_lowercase(), value.trim().to_string());
    }

    for banned in ["transfer-encoding", "content-encoding"] {
        if headers.contains_key(banned) {
            return Err(BrowseError::UnsupportedEncoding(banned.to_string()));
        }
    }

    // HTTP/1.0 sans keep-alive : le corps est tout ce qui reste du flux.
    let mut raw_body = Vec::new();
    reader.read_to_end(&mut raw_body)?;
    let body = String::from_utf8_lossy(&raw_body).into_owned();

    Ok(Response {
        version,
        status,
        reason,
        headers,
        body,
    })
}
