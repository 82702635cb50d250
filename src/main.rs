//! Point d'entrée de Lucarne.
//!
//! Usage :
//!   lucarne <url>
//!
//! Requête l'URL, parse le corps HTML, et affiche l'arbre de nœuds indenté
//! (un nœud par ligne) sur la sortie standard. Pas de flag, pas de fichier
//! de configuration, pas de variable d'environnement — les échecs sortent
//! avec un statut non nul et un diagnostic sur stderr.

use std::env;
use std::error::Error;

use lucarne::html::{self, HtmlParser};
use lucarne::http;
use lucarne::url::Endpoint;

fn main() -> Result<(), Box<dyn Error>> {
    // ── 1. Logging / Tracing ───────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // ── 2. Provider crypto TLS ─────────────────────────────────────────
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Échec de l'installation du provider crypto rustls");

    // ── 3. URL depuis les arguments CLI ────────────────────────────────
    let raw = env::args().nth(1).ok_or("usage : lucarne <url>")?;
    let endpoint: Endpoint = raw.parse()?;

    // ── 4. Requête + parse ─────────────────────────────────────────────
    let response = http::fetch(&endpoint)?;
    let tree = HtmlParser::new(&response.body).parse();

    // ── 5. Affichage de l'arbre ────────────────────────────────────────
    print!("{}", html::format_tree(&tree));

    Ok(())
}
