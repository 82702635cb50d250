//! Cycle de vie d'une page : chargement, mise en page, défilement, dessin.
//!
//! C'est la façade qu'un embedder programme : il fournit les deux
//! collaborateurs externes (mesure de polices, surface de dessin) et pilote
//! `load` / `scroll_down` / `draw`. Le pipeline est entièrement synchrone :
//!
//! ```text
//! load(endpoint)
//!   └─ http::fetch     → corps texte
//!   └─ html::parse     → arbre de nœuds
//!   └─ html::flatten   → flux de jetons
//!   └─ Layout::run     → display list
//! draw(surface)
//!   └─ Viewport::draw  → écrémage + dispatch à la surface
//! ```

use tracing::info;

use crate::config::Config;
use crate::error::BrowseError;
use crate::html::{self, HtmlParser, Node};
use crate::http;
use crate::layout::{DisplayItem, FontCache, FontProvider, Layout};
use crate::rendering::{DrawSurface, Viewport};
use crate::url::Endpoint;

/// Navigateur une-page. Possède la géométrie, le cache de métriques
/// injecté, l'arbre de la page courante et sa display list.
pub struct Browser<P: FontProvider> {
    config: Config,
    cache: FontCache<P>,
    viewport: Viewport,
    tree: Option<Node>,
    display_list: Vec<DisplayItem>,
}

impl<P: FontProvider> Browser<P> {
    pub fn new(config: Config, provider: P) -> Self {
        let viewport = Viewport::new(&config);
        Self {
            config,
            cache: FontCache::new(provider),
            viewport,
            tree: None,
            display_list: Vec::new(),
        }
    }

    /// Charge une page : une requête, un arbre, une display list.
    /// Toute erreur de transport ou de protocole remonte telle quelle.
    pub fn load(&mut self, endpoint: &Endpoint) -> Result<(), BrowseError> {
        info!(endpoint = %endpoint, "Chargement");
        let response = http::fetch(endpoint)?;
        let tree = HtmlParser::new(&response.body).parse();
        let tokens = html::flatten(&tree);
        self.display_list = Layout::run(&tokens, &mut self.cache, &self.config);
        self.tree = Some(tree);
        Ok(())
    }

    /// Arbre de la dernière page chargée.
    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    /// Display list de la dernière page chargée.
    pub fn display_list(&self) -> &[DisplayItem] {
        &self.display_list
    }

    /// Événement « défiler vers le bas » d'un pas fixe.
    pub fn scroll_down(&mut self) {
        self.viewport.scroll_down();
    }

    /// Dessine la portion visible de la page sur la surface.
    pub fn draw<S: DrawSurface>(&mut self, surface: &mut S) {
        self.viewport
            .draw(&self.display_list, &mut self.cache, surface);
    }
}
