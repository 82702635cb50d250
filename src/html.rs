//! Tokenizer HTML et construction d'arbre — machine à états à deux états.
//!
//! Un seul passage, caractère par caractère, avec deux états (`dans-texte`,
//! `dans-balise`) délimités par `<` / `>`. Pas d'attributs, pas d'entités,
//! pas de CDATA ; les doctypes et commentaires (`<!…>`) sont jetés.
//!
//! ## Ouverture en deux temps
//!
//! Une balise ouvrante *empile* un élément sans l'attacher à son parent.
//! L'attachement n'a lieu qu'au dépilage — balise fermante ou drain de fin
//! d'entrée. C'est ce protocole qui rend le parseur tolérant aux balises
//! jamais fermées : tout ce qui reste ouvert à la fin est rattaché à son
//! parent, silencieusement. Il n'existe aucune notion de « HTML invalide »
//! ici — pas de variante d'erreur, pas de récupération à signaler.
//!
//! Le lien parent de l'implémentation d'origine est réalisé par la position
//! dans la pile elle-même (l'élément sous vous est votre parent), jamais
//! par un pointeur possédant — pas de cycle de références.

use std::fmt;

use tracing::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Modèle de nœuds
// ─────────────────────────────────────────────────────────────────────────────

/// Élément nommé avec ses enfants, dans l'ordre du document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Nom de balise, verbatim et sensible à la casse.
    pub tag: String,
    pub children: Vec<Node>,
}

/// Nœud d'arbre : texte littéral ou élément. Le parent possède ses
/// enfants ; l'arbre est figé une fois le parse terminé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    /// Nom de balise si le nœud est un élément.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element(e) => Some(&e.tag),
            Node::Text(_) => None,
        }
    }

    /// Contenu si le nœud est un texte.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }

    /// Enfants du nœud (vide pour un texte).
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Text(_) => &[],
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(t) => write!(f, "{t:?}"),
            Node::Element(e) => write!(f, "<{}>", e.tag),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parseur
// ─────────────────────────────────────────────────────────────────────────────

/// Parseur une-passe. La pile contient les éléments ouverts non encore
/// attachés, le plus extérieur en premier ; elle n'existe que pendant le
/// parse et est entièrement drainée à la fin.
pub struct HtmlParser<'a> {
    body: &'a str,
    stack: Vec<Element>,
}

impl<'a> HtmlParser<'a> {
    pub fn new(body: &'a str) -> HtmlParser<'a> {
        HtmlParser {
            body,
            stack: Vec::new(),
        }
    }

    /// Consomme le corps et rend la racine de l'arbre.
    pub fn parse(mut self) -> Node {
        let mut buffer = String::new();
        let mut in_tag = false;

        for c in self.body.chars() {
            match c {
                '<' => {
                    self.flush_text(&mut buffer);
                    in_tag = true;
                }
                '>' if in_tag => {
                    self.dispatch_tag(&buffer);
                    buffer.clear();
                    in_tag = false;
                }
                _ => buffer.push(c),
            }
        }

        // Du texte en suspens, oui ; une balise jamais refermée, non.
        if !in_tag {
            self.flush_text(&mut buffer);
        }

        self.finish()
    }

    /// Émet le tampon comme nœud texte sous le sommet de pile, sauf s'il
    /// est vide ou purement blanc. Du texte sans élément ouvert est perdu.
    fn flush_text(&mut self, buffer: &mut String) {
        if !buffer.trim().is_empty() {
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(Node::Text(buffer.clone())),
                None => debug!(text = %buffer, "Texte avant la première balise, ignoré"),
            }
        }
        buffer.clear();
    }

    /// Aiguille le contenu d'une balise complète.
    fn dispatch_tag(&mut self, tag: &str) {
        if tag.starts_with('!') {
            // Doctype ou commentaire : aucun nœud produit.
            return;
        }
        if tag.starts_with('/') {
            // On ne referme jamais la racine.
            if self.stack.len() > 1 {
                self.pop_and_attach();
            }
        } else {
            // Ouverture : empilé, pas encore attaché. La toute première
            // balise devient la racine implicite.
            self.stack.push(Element {
                tag: tag.to_string(),
                children: Vec::new(),
            });
        }
    }

    /// Dépile le sommet et l'attache comme dernier enfant du nouveau
    /// sommet — l'unique endroit où un élément rejoint l'arbre.
    fn pop_and_attach(&mut self) {
        if let Some(node) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(Node::Element(node)),
                None => self.stack.push(node),
            }
        }
    }

    /// Draine la pile (fermeture implicite des balises restées ouvertes)
    /// et rend l'unique élément restant comme racine.
    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.pop_and_attach();
        }
        match self.stack.pop() {
            Some(root) => Node::Element(root),
            // Entrée sans la moindre balise : racine synthétique vide.
            None => Node::Element(Element {
                tag: String::from("html"),
                children: Vec::new(),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vues dérivées de l'arbre
// ─────────────────────────────────────────────────────────────────────────────

/// Jeton du flux aplati consommé par le layout : passage de texte, ou nom
/// de balise (`p`, `/p`, …) dans l'ordre du document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Tag(String),
}

/// Aplati l'arbre en flux de jetons : balise ouvrante, enfants, balise
/// fermante correspondante, en préordre.
pub fn flatten(node: &Node) -> Vec<Token> {
    let mut tokens = Vec::new();
    flatten_into(node, &mut tokens);
    tokens
}

fn flatten_into(node: &Node, tokens: &mut Vec<Token>) {
    match node {
        Node::Text(t) => tokens.push(Token::Text(t.clone())),
        Node::Element(e) => {
            tokens.push(Token::Tag(e.tag.clone()));
            for child in &e.children {
                flatten_into(child, tokens);
            }
            tokens.push(Token::Tag(format!("/{}", e.tag)));
        }
    }
}

/// Rendu indenté de l'arbre, un nœud par ligne — le format de sortie du
/// binaire principal.
pub fn format_tree(node: &Node) -> String {
    let mut out = String::new();
    format_tree_into(node, 0, &mut out);
    out
}

fn format_tree_into(node: &Node, indent: usize, out: &mut String) {
    out.push_str(&" ".repeat(indent));
    out.push_str(&node.to_string());
    out.push('\n');
    for child in node.children() {
        format_tree_into(child, indent + 2, out);
    }
}

/// Texte visible de la page : les passages de texte, balises dépouillées,
/// un passage par ligne.
pub fn visible_text(node: &Node) -> String {
    let mut runs = Vec::new();
    collect_text(node, &mut runs);
    runs.join("\n")
}

fn collect_text(node: &Node, runs: &mut Vec<String>) {
    match node {
        Node::Text(t) => runs.push(t.clone()),
        Node::Element(e) => {
            for child in &e.children {
                collect_text(child, runs);
            }
        }
    }
}
