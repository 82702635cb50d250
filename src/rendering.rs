//! Surface de dessin et viewport à défilement vertical.
//!
//! Ce module isole tout ce qui touche au rendu derrière deux abstractions :
//! la surface de dessin est un collaborateur externe ([`DrawSurface`]), et
//! le [`Viewport`] ne fait que du tri — il écrème la display list aux
//! entrées visibles et les dispatch à la surface, décalées du scroll.
//!
//! Aucune dépendance graphique — les tests injectent une surface qui
//! enregistre les appels au lieu de dessiner.

use tracing::debug;

use crate::config::Config;
use crate::layout::{DisplayItem, FontCache, FontProvider, FontSpec};

/// Collaborateur externe de dessin : reçoit des mots positionnés en
/// coordonnées fenêtre (le scroll est déjà soustrait).
pub trait DrawSurface {
    fn draw_text(&mut self, x: f32, y: f32, text: &str, font: &FontSpec);
}

/// Fenêtre de visualisation : possède l'offset de défilement et la
/// hauteur visible.
pub struct Viewport {
    scroll: f32,
    height: f32,
    step: f32,
}

impl Viewport {
    pub fn new(config: &Config) -> Self {
        Self {
            scroll: 0.0,
            height: config.window.height as f32,
            step: config.scroll.step,
        }
    }

    /// Offset de défilement courant, en pixels canvas.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Événement « défiler vers le bas » : avance d'un pas fixe.
    pub fn scroll_down(&mut self) {
        self.scroll += self.step;
        debug!(scroll = self.scroll, "Défilement");
    }

    /// Dispatch les entrées visibles à la surface.
    ///
    /// Une entrée est écartée si elle commence sous la fenêtre, ou si son
    /// interligne entier se termine au-dessus. Les survivantes sont
    /// dessinées en coordonnées fenêtre : `(x, y − scroll)`.
    pub fn draw<P: FontProvider, S: DrawSurface>(
        &self,
        items: &[DisplayItem],
        cache: &mut FontCache<P>,
        surface: &mut S,
    ) {
        for item in items {
            let y = item.position.y;
            if y > self.scroll + self.height {
                continue;
            }
            if y + cache.metrics(item.font).linespace < self.scroll {
                continue;
            }
            surface.draw_text(item.position.x, y - self.scroll, &item.text, &item.font);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FontMetrics, Slant, Weight};
    use euclid::default::Point2D;

    struct FlatFont;

    impl FontProvider for FlatFont {
        fn measure(&self, text: &str, _spec: FontSpec) -> f32 {
            text.len() as f32
        }

        fn metrics(&self, _spec: FontSpec) -> FontMetrics {
            FontMetrics {
                ascent: 8.0,
                descent: 2.0,
                linespace: 10.0,
            }
        }
    }

    /// Surface qui enregistre les appels au lieu de dessiner.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(f32, f32, String)>,
    }

    impl DrawSurface for Recorder {
        fn draw_text(&mut self, x: f32, y: f32, text: &str, _font: &FontSpec) {
            self.calls.push((x, y, text.to_string()));
        }
    }

    fn item(y: f32, text: &str) -> DisplayItem {
        DisplayItem {
            position: Point2D::new(15.0, y),
            text: text.to_string(),
            font: FontSpec {
                size: 12,
                weight: Weight::Normal,
                slant: Slant::Roman,
            },
        }
    }

    fn draw_at(scroll_downs: usize, items: &[DisplayItem]) -> Vec<(f32, f32, String)> {
        let config = Config::default();
        let mut viewport = Viewport::new(&config);
        for _ in 0..scroll_downs {
            viewport.scroll_down();
        }
        let mut cache = FontCache::new(FlatFont);
        let mut recorder = Recorder::default();
        viewport.draw(items, &mut cache, &mut recorder);
        recorder.calls
    }

    #[test]
    fn test_items_below_window_culled() {
        let items = [item(20.0, "visible"), item(601.0, "caché")];
        let calls = draw_at(0, &items);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, "visible");
    }

    #[test]
    fn test_items_above_window_culled_by_linespace() {
        // Après un pas de scroll (100) : un mot à y=85 dont l'interligne
        // descend jusqu'à 95 est entièrement au-dessus ; à y=95 il mord
        // encore dans la fenêtre.
        let items = [item(85.0, "dessus"), item(95.0, "bord")];
        let calls = draw_at(1, &items);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, "bord");
    }

    #[test]
    fn test_scroll_offset_subtracted_from_y() {
        let items = [item(120.0, "mot")];
        let calls = draw_at(1, &items);
        assert_eq!(calls[0].0, 15.0);
        assert_eq!(calls[0].1, 20.0);
    }

    #[test]
    fn test_scroll_down_accumulates_fixed_steps() {
        let mut viewport = Viewport::new(&Config::default());
        assert_eq!(viewport.scroll(), 0.0);
        viewport.scroll_down();
        viewport.scroll_down();
        assert_eq!(viewport.scroll(), 200.0);
    }
}
