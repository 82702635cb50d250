//! Variante texte de Lucarne.
//!
//! Usage :
//!   lucarne-texte <url>
//!
//! Même pipeline que le binaire principal, mais dépouille les balises et
//! affiche le texte visible de la page au lieu de l'arbre.

use std::env;
use std::error::Error;

use lucarne::html::{self, HtmlParser};
use lucarne::http;
use lucarne::url::Endpoint;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Échec de l'installation du provider crypto rustls");

    let raw = env::args().nth(1).ok_or("usage : lucarne-texte <url>")?;
    let endpoint: Endpoint = raw.parse()?;

    let response = http::fetch(&endpoint)?;
    let tree = HtmlParser::new(&response.body).parse();
    println!("{}", html::visible_text(&tree));

    Ok(())
}
