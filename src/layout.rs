//! Moteur de mise en page — flot de texte en ligne, gauche-droite puis
//! haut-bas.
//!
//! Un seul passage sur le flux de jetons aplati de l'arbre. Les balises
//! reconnues modifient l'état courant (graisse, pente, taille) ou forcent
//! un saut de ligne ; tout le reste est ignoré. Les mots d'une ligne sont
//! accumulés avec leur abscisse en attente, puis *flushés* d'un bloc une
//! fois la ligne complète : c'est à ce moment que la baseline commune est
//! calculée à partir de la police la plus haute de la ligne.
//!
//! Aucune dépendance graphique — la mesure des mots passe par le
//! collaborateur [`FontProvider`] injecté, jamais par un backend de rendu.

use std::collections::HashMap;

use euclid::default::Point2D;
use tracing::debug;

use crate::config::Config;
use crate::html::Token;

// ─────────────────────────────────────────────────────────────────────────────
// Polices : spécification, métriques, collaborateur, cache
// ─────────────────────────────────────────────────────────────────────────────

/// Graisse de police.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Normal,
    Bold,
}

/// Pente de police.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slant {
    Roman,
    Italic,
}

/// Police stylée d'un mot : (taille en pixels, graisse, pente).
/// C'est la clé du cache de métriques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub size: i32,
    pub weight: Weight,
    pub slant: Slant,
}

/// Métriques verticales d'une police, immuables pour une clé donnée.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub linespace: f32,
}

/// Collaborateur externe de mesure de texte. Le vrai backend (canvas,
/// rastériseur) vit hors de ce crate ; les tests injectent une
/// implémentation déterministe.
pub trait FontProvider {
    /// Largeur du texte en pixels dans la police donnée.
    fn measure(&self, text: &str, spec: FontSpec) -> f32;

    /// Métriques verticales de la police donnée.
    fn metrics(&self, spec: FontSpec) -> FontMetrics;
}

/// Cache de métriques par [`FontSpec`], peuplé paresseusement, jamais
/// invalidé (les permutations de style sont peu nombreuses et les
/// métriques immuables pour une clé).
///
/// Objet explicite passé au layout et au viewport — pas d'état global.
pub struct FontCache<P: FontProvider> {
    provider: P,
    metrics: HashMap<FontSpec, FontMetrics>,
}

impl<P: FontProvider> FontCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            metrics: HashMap::new(),
        }
    }

    /// Mesure d'un mot — déléguée telle quelle, la largeur dépend du texte.
    pub fn measure(&self, text: &str, spec: FontSpec) -> f32 {
        self.provider.measure(text, spec)
    }

    /// Métriques de la police, mémorisées à la première demande.
    pub fn metrics(&mut self, spec: FontSpec) -> FontMetrics {
        if let Some(metrics) = self.metrics.get(&spec) {
            return *metrics;
        }
        let metrics = self.provider.metrics(spec);
        self.metrics.insert(spec, metrics);
        metrics
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display list
// ─────────────────────────────────────────────────────────────────────────────

/// Un mot positionné et stylé, prêt à dessiner. Immuable après création.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    /// Coordonnées canvas du coin haut-gauche du mot.
    pub position: Point2D<f32>,
    pub text: String,
    pub font: FontSpec,
}

// ─────────────────────────────────────────────────────────────────────────────
// Moteur
// ─────────────────────────────────────────────────────────────────────────────

/// État du curseur de mise en page. La ligne en attente accumule des
/// triplets (x, mot, police) non encore placés verticalement ; elle est
/// flushée sur débordement, saut explicite, ou fin de flux.
pub struct Layout<'a, P: FontProvider> {
    cache: &'a mut FontCache<P>,
    width: f32,
    hstep: f32,
    vstep: f32,
    leading: f32,
    display_list: Vec<DisplayItem>,
    line: Vec<(f32, String, FontSpec)>,
    cursor_x: f32,
    cursor_y: f32,
    weight: Weight,
    slant: Slant,
    size: i32,
}

impl<'a, P: FontProvider> Layout<'a, P> {
    /// Consomme le flux de jetons et rend la display list.
    pub fn run(tokens: &[Token], cache: &'a mut FontCache<P>, config: &Config) -> Vec<DisplayItem> {
        let mut layout = Layout {
            cache,
            width: config.window.width as f32,
            hstep: config.layout.hstep,
            vstep: config.layout.vstep,
            leading: config.layout.leading,
            display_list: Vec::new(),
            line: Vec::new(),
            cursor_x: config.layout.hstep,
            cursor_y: config.layout.vstep,
            weight: Weight::Normal,
            slant: Slant::Roman,
            size: config.layout.base_font_size,
        };

        for token in tokens {
            layout.token(token);
        }
        layout.flush();

        debug!(items = layout.display_list.len(), "Mise en page terminée");
        layout.display_list
    }

    /// Jeu fixe de balises de formatage ; tout autre nom de balise est
    /// ignoré par le layout.
    fn token(&mut self, token: &Token) {
        match token {
            Token::Text(text) => {
                for word in text.split_whitespace() {
                    self.word(word);
                }
            }
            Token::Tag(tag) => match tag.as_str() {
                "i" => self.slant = Slant::Italic,
                "/i" => self.slant = Slant::Roman,
                "b" => self.weight = Weight::Bold,
                "/b" => self.weight = Weight::Normal,
                "small" => self.size -= 2,
                "/small" => self.size += 2,
                "big" => self.size += 4,
                "/big" => self.size -= 4,
                "br" => self.flush(),
                "/p" => {
                    self.flush();
                    self.cursor_y += self.vstep;
                }
                _ => {}
            },
        }
    }

    /// Place un mot sur la ligne en attente, en flushant d'abord si le mot
    /// déborderait la largeur utile (largeur de fenêtre moins la marge).
    fn word(&mut self, word: &str) {
        let font = FontSpec {
            size: self.size,
            weight: self.weight,
            slant: self.slant,
        };
        let w = self.cache.measure(word, font);
        if self.cursor_x + w > self.width - self.hstep {
            self.flush();
        }
        self.line.push((self.cursor_x, word.to_string(), font));
        self.cursor_x += w + self.cache.measure(" ", font);
    }

    /// Convertit la ligne en attente en display items partageant une même
    /// baseline : `y + leading × max(ascent)`, chaque mot remonté de son
    /// propre ascent. Avance ensuite le curseur vertical et ramène
    /// l'horizontal à la marge.
    fn flush(&mut self) {
        if self.line.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.line);

        let mut max_ascent: f32 = 0.0;
        let mut max_descent: f32 = 0.0;
        for (_, _, font) in &line {
            let m = self.cache.metrics(*font);
            max_ascent = max_ascent.max(m.ascent);
            max_descent = max_descent.max(m.descent);
        }

        let baseline = self.cursor_y + self.leading * max_ascent;
        for (x, word, font) in line {
            let y = baseline - self.cache.metrics(font).ascent;
            self.display_list.push(DisplayItem {
                position: Point2D::new(x, y),
                text: word,
                font,
            });
        }

        self.cursor_y = baseline + self.leading * max_descent;
        self.cursor_x = self.hstep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider déterministe : chaque caractère avance de `size` pixels,
    /// ascent = 0.8 × size, descent = 0.2 × size.
    struct FixedFont;

    impl FontProvider for FixedFont {
        fn measure(&self, text: &str, spec: FontSpec) -> f32 {
            text.chars().count() as f32 * spec.size as f32
        }

        fn metrics(&self, spec: FontSpec) -> FontMetrics {
            let size = spec.size as f32;
            FontMetrics {
                ascent: 0.8 * size,
                descent: 0.2 * size,
                linespace: size,
            }
        }
    }

    fn run(tokens: Vec<Token>) -> Vec<DisplayItem> {
        let mut cache = FontCache::new(FixedFont);
        Layout::run(&tokens, &mut cache, &Config::default())
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    fn tag(s: &str) -> Token {
        Token::Tag(s.to_string())
    }

    #[test]
    fn test_single_line_advances_by_word_and_space_width() {
        let items = run(vec![text("ab cd")]);
        assert_eq!(items.len(), 2);
        // hstep, puis hstep + largeur("ab") + largeur(" ") = 15 + 24 + 12.
        assert_eq!(items[0].position.x, 15.0);
        assert_eq!(items[1].position.x, 51.0);
        // Même ligne : même y.
        assert_eq!(items[0].position.y, items[1].position.y);
    }

    #[test]
    fn test_baseline_formula_on_uniform_line() {
        let items = run(vec![text("mot")]);
        // baseline = vstep + 1.25 × ascent ; y = baseline − ascent.
        // ascent = 0.8 × 12 = 9.6 → y = 18 + 1.25×9.6 − 9.6 = 20.4.
        assert!((items[0].position.y - 20.4).abs() < 1e-4);
    }

    #[test]
    fn test_overflow_flushes_before_the_overflowing_word() {
        // Largeur utile : 800 − 15 = 785. Mots de 10 caractères → 120 px
        // + 12 px d'espace. Le 6e mot déborde (cursor_x 675 + 120 > 785).
        let words = vec!["aaaaaaaaaa"; 7].join(" ");
        let items = run(vec![text(&words)]);
        let first_y = items[0].position.y;
        let on_first_line = items
            .iter()
            .filter(|i| i.position.y == first_y)
            .count();
        assert_eq!(on_first_line, 5);
        // Le mot débordant repart à la marge, une ligne plus bas.
        assert_eq!(items[5].position.x, 15.0);
        assert!(items[5].position.y > first_y);
    }

    #[test]
    fn test_second_line_y_advances_by_leading_times_descent() {
        let items = run(vec![text("a"), tag("br"), text("b")]);
        // Ligne 1 : baseline = 18 + 1.25×9.6 = 30, y = 20.4,
        // cursor_y suivant = 30 + 1.25×2.4 = 33 → y ligne 2 = 33 + 12 − 9.6.
        assert!((items[0].position.y - 20.4).abs() < 1e-4);
        assert!((items[1].position.y - 35.4).abs() < 1e-4);
    }

    #[test]
    fn test_bold_italic_toggles() {
        let items = run(vec![
            tag("b"),
            text("gras"),
            tag("/b"),
            tag("i"),
            text("penché"),
            tag("/i"),
            text("normal"),
        ]);
        assert_eq!(items[0].font.weight, Weight::Bold);
        assert_eq!(items[0].font.slant, Slant::Roman);
        assert_eq!(items[1].font.weight, Weight::Normal);
        assert_eq!(items[1].font.slant, Slant::Italic);
        assert_eq!(items[2].font.weight, Weight::Normal);
        assert_eq!(items[2].font.slant, Slant::Roman);
    }

    #[test]
    fn test_size_modifiers_nest_and_restore() {
        let items = run(vec![
            tag("small"),
            text("petit"),
            tag("/small"),
            tag("big"),
            tag("big"),
            text("énorme"),
            tag("/big"),
            tag("/big"),
            text("normal"),
        ]);
        assert_eq!(items[0].font.size, 10);
        assert_eq!(items[1].font.size, 20);
        assert_eq!(items[2].font.size, 12);
    }

    #[test]
    fn test_mixed_sizes_share_tallest_baseline() {
        let items = run(vec![text("a"), tag("big"), text("B")]);
        // Police 16 : ascent 12.8 domine. baseline = 18 + 1.25×12.8 = 34.
        // y du petit mot = 34 − 9.6 = 24.4 ; y du grand = 34 − 12.8 = 21.2.
        assert!((items[0].position.y - 24.4).abs() < 1e-4);
        assert!((items[1].position.y - 21.2).abs() < 1e-4);
    }

    #[test]
    fn test_paragraph_close_adds_vertical_gap() {
        let with_p = run(vec![text("a"), tag("/p"), text("b")]);
        let with_br = run(vec![text("a"), tag("br"), text("b")]);
        let gap = with_p[1].position.y - with_br[1].position.y;
        assert!((gap - 18.0).abs() < 1e-4); // vstep
    }

    #[test]
    fn test_unknown_tags_ignored() {
        let items = run(vec![tag("html"), tag("div"), text("x"), tag("/div")]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].font.size, 12);
    }

    #[test]
    fn test_trailing_line_flushed_at_end_of_stream() {
        let items = run(vec![text("dernier")]);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_whitespace_split_collapses_runs() {
        let items = run(vec![text("  un\n  deux  ")]);
        let words: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(words, ["un", "deux"]);
    }

    #[test]
    fn test_metrics_cache_populated_per_spec() {
        let mut cache = FontCache::new(FixedFont);
        let tokens = vec![text("a"), tag("big"), text("b")];
        Layout::run(&tokens, &mut cache, &Config::default());
        assert_eq!(cache.metrics.len(), 2);
    }
}
