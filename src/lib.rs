//! # Lucarne — Navigateur pédagogique minimal
//!
//! Navigateur web d'étude, volontairement réduit à l'essentiel : une
//! requête HTTP/1.0 sur socket brute (TLS compris), un parseur HTML
//! incrémental tolérant aux balises non fermées, un moteur de mise en page
//! en flot de texte, et un viewport à défilement vertical. Pas de CSS, pas
//! de JavaScript, pas de cache, pas de redirections.
//!
//! ## Architecture des modules
//!
//! - [`url`] : Parse une URL absolue en paramètres de connexion
//!   ([`url::Endpoint`]) — schéma, hôte, port, chemin.
//!
//! - [`http`] : Transport bloquant — une connexion TCP (montée en TLS via
//!   rustls pour `https`), une requête GET, une réponse lue jusqu'à la
//!   fermeture du flux. Refuse les corps chunked ou compressés.
//!
//! - [`html`] : Machine à états à deux états (texte / balise) qui
//!   construit l'arbre de nœuds, avec fermeture implicite des balises
//!   restées ouvertes. Fournit aussi les vues dérivées : flux de jetons
//!   pour le layout, rendu indenté, texte visible.
//!
//! - [`layout`] : Flot de texte gauche-droite, haut-bas — gras, italique,
//!   tailles, sauts de ligne et de paragraphe — produisant une display
//!   list de mots positionnés. La mesure passe par le collaborateur
//!   [`layout::FontProvider`] injecté.
//!
//! - [`rendering`] : Le viewport écrème la display list à la fenêtre
//!   visible et dispatch à la surface de dessin externe
//!   ([`rendering::DrawSurface`]).
//!
//! - [`browser`] : Façade reliant le tout : charge une page, défile,
//!   dessine.
//!
//! - [`config`] : Géométrie de fenêtre et de mise en page (TOML), injectée
//!   plutôt qu'ambiante.
//!
//! - [`error`] : Taxonomie d'erreurs du chemin URL → socket → réponse,
//!   toutes fail-fast.

pub mod browser;
pub mod config;
pub mod error;
pub mod html;
pub mod http;
pub mod layout;
pub mod rendering;
pub mod url;
