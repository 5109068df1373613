//! # Annotated Document Model
//!
//! Clean DTOs shared by every stage: adapter ↔ deconstructor ↔ constructor.
//! Tokens live in a per-document arena and are referenced everywhere by
//! [`TokenId`] (arena index), so set membership and equality checks are
//! stable across components without relying on reference identity.
//!
//! Design rule: this module is pure data — no I/O, no rule logic.

pub mod srl;
pub mod coref;

pub use srl::{Role, SrlFrame};
pub use coref::CorefClusters;

use smallvec::SmallVec;

/// Handle to a token in a [`Doc`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One token of the parsed document, as supplied by the external parser.
#[derive(Debug, Clone)]
pub struct Token {
    /// Character offset of the token's first character in the source text.
    pub offset: usize,
    pub text: String,
    /// Coarse part-of-speech (NOUN, PROPN, VERB, ADP, ...).
    pub pos: String,
    /// Fine-grained tag (NN, NNS, VBZ, VBD, MD, ...).
    pub tag: String,
    /// Dependency label to the head (nsubj, dobj, prep, ...).
    pub dep: String,
    /// Head token; the root points at itself.
    pub head: TokenId,
    /// Sentence index within the document.
    pub sent: usize,
    /// Optional shallow-parse IOB tag (B-VP, S-PRT, ...), if chunks were supplied.
    pub chunk: Option<String>,
}

/// A token-indexed document: the arena plus a dependency child index.
#[derive(Debug, Clone)]
pub struct Doc {
    tokens: Vec<Token>,
    children: Vec<SmallVec<[TokenId; 4]>>,
}

impl Doc {
    /// Build the document and its child index. Head references must be in
    /// range; the adapter validates this before constructing a `Doc`.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut children: Vec<SmallVec<[TokenId; 4]>> = vec![SmallVec::new(); tokens.len()];
        for (i, tok) in tokens.iter().enumerate() {
            let id = TokenId(i as u32);
            if tok.head != id {
                children[tok.head.index()].push(id);
            }
        }
        Doc { tokens, children }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TokenId> {
        (0..self.tokens.len() as u32).map(TokenId)
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn text(&self, id: TokenId) -> &str {
        &self.tokens[id.index()].text
    }

    pub fn tag(&self, id: TokenId) -> &str {
        &self.tokens[id.index()].tag
    }

    pub fn pos(&self, id: TokenId) -> &str {
        &self.tokens[id.index()].pos
    }

    pub fn dep(&self, id: TokenId) -> &str {
        &self.tokens[id.index()].dep
    }

    pub fn head(&self, id: TokenId) -> TokenId {
        self.tokens[id.index()].head
    }

    pub fn sent(&self, id: TokenId) -> usize {
        self.tokens[id.index()].sent
    }

    pub fn chunk(&self, id: TokenId) -> Option<&str> {
        self.tokens[id.index()].chunk.as_deref()
    }

    /// Direct dependents of a token, in arena order.
    pub fn children(&self, id: TokenId) -> &[TokenId] {
        &self.children[id.index()]
    }

    /// Walk up the head chain, excluding the token itself. Stops at the root.
    pub fn ancestors(&self, id: TokenId) -> Ancestors<'_> {
        Ancestors { doc: self, cur: id }
    }

    /// Tokens whose start offset falls inside `[start, end)`.
    pub fn tokens_in_span(&self, start: usize, end: usize) -> Vec<TokenId> {
        self.ids()
            .filter(|&id| {
                let off = self.tokens[id.index()].offset;
                start <= off && off < end
            })
            .collect()
    }
}

/// Iterator over a token's syntactic ancestors (head, head's head, ...).
pub struct Ancestors<'d> {
    doc: &'d Doc,
    cur: TokenId,
}

impl Iterator for Ancestors<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let head = self.doc.head(self.cur);
        if head == self.cur {
            return None;
        }
        self.cur = head;
        Some(head)
    }
}

/// Normalized named-entity label. LOC subsumes facility/org/GPE/loc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Date,
    Cardinal,
    Person,
    Loc,
}

/// A named-entity mention resolved onto the token arena.
#[derive(Debug, Clone)]
pub struct Entity {
    pub label: EntityLabel,
    /// Surface text as reported by the recognizer.
    pub text: String,
    pub tokens: Vec<TokenId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(offset: usize, text: &str, head: u32) -> Token {
        Token {
            offset,
            text: text.into(),
            pos: "NOUN".into(),
            tag: "NN".into(),
            dep: "dep".into(),
            head: TokenId(head),
            sent: 0,
            chunk: None,
        }
    }

    #[test]
    fn child_index_excludes_self_loop_root() {
        // "cats sleep" with root "sleep" heading "cats"
        let doc = Doc::new(vec![tok(0, "cats", 1), tok(5, "sleep", 1)]);
        assert_eq!(doc.children(TokenId(1)), &[TokenId(0)]);
        assert!(doc.children(TokenId(0)).is_empty());
    }

    #[test]
    fn ancestors_stop_at_root() {
        let doc = Doc::new(vec![tok(0, "a", 1), tok(2, "b", 2), tok(4, "c", 2)]);
        let chain: Vec<_> = doc.ancestors(TokenId(0)).collect();
        assert_eq!(chain, vec![TokenId(1), TokenId(2)]);
        assert!(doc.ancestors(TokenId(2)).next().is_none());
    }

    #[test]
    fn span_lookup_is_half_open() {
        let doc = Doc::new(vec![tok(0, "a", 2), tok(2, "b", 2), tok(4, "c", 2)]);
        assert_eq!(doc.tokens_in_span(0, 4), vec![TokenId(0), TokenId(1)]);
        assert_eq!(doc.tokens_in_span(4, 5), vec![TokenId(2)]);
    }
}
