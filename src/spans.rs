//! Linguistic Helpers — stateless functions over token spans.
//!
//! All walks return spans sorted by arena position, so rendering a span
//! always reads in document order.

use crate::doc::{CorefClusters, Doc, TokenId};

/// Punctuation that attaches to the preceding word without a space.
const TIGHT: &[&str] = &[".", ",", "!", "?", ":", ";"];

/// Render a token span to text. Punctuation and the possessive marker
/// attach without a preceding space; everything else is space-separated.
pub fn merge_tokens(doc: &Doc, toks: &[TokenId]) -> String {
    let mut out = String::new();
    for &id in toks {
        let text = doc.text(id);
        if TIGHT.contains(&text) || text == "'s" {
            out.push_str(text);
        } else {
            out.push(' ');
            out.push_str(text);
        }
    }
    out.trim().to_string()
}

/// String-level twin of [`merge_tokens`], for spans rewritten after
/// verb-phrase analysis. Empty parts are skipped.
pub fn merge_strs<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if TIGHT.contains(&part) || part == "'s" {
            out.push_str(part);
        } else {
            out.push(' ');
            out.push_str(part);
        }
    }
    out.trim().to_string()
}

fn collect_subtree(doc: &Doc, root: TokenId, relevant: &[&str], out: &mut Vec<TokenId>) {
    out.push(root);
    for &child in doc.children(root) {
        if relevant.contains(&doc.dep(child)) {
            collect_subtree(doc, child, relevant, out);
        }
    }
}

fn sorted(mut toks: Vec<TokenId>) -> Vec<TokenId> {
    toks.sort();
    toks.dedup();
    toks
}

/// Expand a subject token to its full noun phrase: determiners, modifiers,
/// compounds, possessives, and coordination.
pub fn find_full_subject(doc: &Doc, subj: TokenId) -> Vec<TokenId> {
    let relevant = ["det", "amod", "compound", "nummod", "poss", "cc", "conj", "case"];
    let mut out = Vec::new();
    collect_subtree(doc, subj, &relevant, &mut out);
    sorted(out)
}

/// Expand a verb to its full predicate: auxiliaries, negation, particles,
/// plus any extra dependency labels in `include`.
///
/// Coordinated verbs (`cc`/`conj`) are included only when the verb has no
/// direct object: with no object the coordination is assumed to share one,
/// while an explicit object is assumed exclusive to the last coordinated
/// verb. Documented heuristic, biased toward under-splitting.
pub fn find_full_predicate(doc: &Doc, verb: TokenId, include: &[&str]) -> Vec<TokenId> {
    let mut relevant: Vec<&str> = vec!["aux", "auxpass", "neg", "prt", "cc", "conj"];
    relevant.extend_from_slice(include);

    let has_dobj = doc.children(verb).iter().any(|&c| doc.dep(c) == "dobj");
    if has_dobj {
        relevant.retain(|d| *d != "cc" && *d != "conj");
    }

    let mut out = Vec::new();
    collect_subtree(doc, verb, &relevant, &mut out);
    sorted(out)
}

fn collect_object_like(doc: &Doc, root: TokenId, relevant: &[&str]) -> Vec<TokenId> {
    fn walk(doc: &Doc, tok: TokenId, root: TokenId, relevant: &[&str], out: &mut Vec<TokenId>) {
        if out.contains(&tok) {
            return;
        }
        out.push(tok);
        for &child in doc.children(tok) {
            if doc.dep(tok) == "poss" && doc.dep(child) == "case" {
                out.push(child);
            } else if doc.dep(child) == "prep" && tok == root {
                // A prepositional complement of the head itself ("with X")
                // is not part of the object span.
                continue;
            } else if relevant.contains(&doc.dep(child)) {
                walk(doc, child, root, relevant, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(doc, root, root, relevant, &mut out);
    sorted(out)
}

/// Expand a direct object to its full span, excluding a prepositional
/// child of the object head itself.
pub fn find_full_direct_object(doc: &Doc, dobj: TokenId) -> Vec<TokenId> {
    let relevant = ["det", "amod", "compound", "nummod", "poss", "prep", "advmod", "cc", "conj"];
    collect_object_like(doc, dobj, &relevant)
}

/// Expand an attribute to its full span. Same walk as
/// [`find_full_direct_object`]; kept separate because attribute call sites
/// evolve independently.
pub fn find_full_attribute(doc: &Doc, attr: TokenId) -> Vec<TokenId> {
    let relevant = ["det", "amod", "compound", "nummod", "poss", "prep", "advmod", "cc", "conj"];
    collect_object_like(doc, attr, &relevant)
}

/// Strip an embedded relative clause (and all of its dependents) from a
/// span when the clause's head is itself inside the span. Prevents
/// runaway recursive inclusion when widening spans.
pub fn simplify_dependencies(doc: &Doc, span: &[TokenId]) -> Vec<TokenId> {
    fn remove_subtree(doc: &Doc, tok: TokenId, out: &mut Vec<TokenId>) {
        for &child in doc.children(tok) {
            remove_subtree(doc, child, out);
            out.retain(|&t| t != child);
        }
    }
    let mut out = span.to_vec();
    for &tok in span {
        if doc.dep(tok) == "relcl" && span.contains(&doc.head(tok)) {
            remove_subtree(doc, tok, &mut out);
            out.retain(|&t| t != tok);
        }
    }
    out
}

/// True when the token sits inside a relative clause: its own dependency
/// or any ancestor's is a relative-clause label, or the token is a
/// relative pronoun not in `exclude`.
pub fn is_in_relative_clause(doc: &Doc, tok: TokenId, exclude: &[&str]) -> bool {
    const RELCL_DEPS: &[&str] = &["relcl", "acl:relcl"];
    const REL_PRONOUNS: &[&str] = &["who", "whom", "whose", "which", "that"];

    if RELCL_DEPS.contains(&doc.dep(tok)) {
        return true;
    }
    let lower = doc.text(tok).to_lowercase();
    if REL_PRONOUNS.contains(&lower.as_str()) && !exclude.contains(&lower.as_str()) {
        return true;
    }
    doc.ancestors(tok).any(|a| RELCL_DEPS.contains(&doc.dep(a)))
}

/// Look up a token's coreference antecedent. Unclustered tokens resolve to
/// themselves.
pub fn antecedent(coref: &CorefClusters, tok: TokenId) -> (Vec<TokenId>, Vec<TokenId>) {
    match coref.antecedent_of(tok) {
        Some((ante, own)) => (ante.to_vec(), own.to_vec()),
        None => (vec![tok], vec![tok]),
    }
}

/// Splice the antecedent of `tok` over its own mention span inside
/// `span`: mention tokens are dropped and the antecedent is inserted once
/// at the first mention position.
pub fn replace_antecedent(coref: &CorefClusters, tok: TokenId, span: &[TokenId]) -> Vec<TokenId> {
    let (ante, own) = antecedent(coref, tok);
    let mut out = Vec::with_capacity(span.len() + ante.len());
    let mut replaced = false;
    for &t in span {
        if !own.contains(&t) {
            out.push(t);
        } else if !replaced {
            out.extend_from_slice(&ante);
            replaced = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Token;
    use pretty_assertions::assert_eq;

    fn tok(offset: usize, text: &str, tag: &str, dep: &str, head: u32) -> Token {
        Token {
            offset,
            text: text.into(),
            pos: String::new(),
            tag: tag.into(),
            dep: dep.into(),
            head: TokenId(head),
            sent: 0,
            chunk: None,
        }
    }

    fn ids(v: &[u32]) -> Vec<TokenId> {
        v.iter().copied().map(TokenId).collect()
    }

    // "The quick dog chased the cat"
    fn chase_doc() -> Doc {
        Doc::new(vec![
            tok(0, "The", "DT", "det", 2),
            tok(4, "quick", "JJ", "amod", 2),
            tok(10, "dog", "NN", "nsubj", 3),
            tok(14, "chased", "VBD", "ROOT", 3),
            tok(21, "the", "DT", "det", 5),
            tok(25, "cat", "NN", "dobj", 3),
        ])
    }

    #[test]
    fn merge_attaches_punctuation_and_possessive() {
        let doc = Doc::new(vec![
            tok(0, "Titan", "NNP", "compound", 1),
            tok(6, "Sports", "NNP", "dobj", 1),
            tok(12, ",", ",", "punct", 1),
            tok(14, "Inc", "NNP", "appos", 1),
            tok(17, ".", ".", "punct", 1),
        ]);
        let all: Vec<TokenId> = doc.ids().collect();
        assert_eq!(merge_tokens(&doc, &all), "Titan Sports, Inc.");

        let doc2 = Doc::new(vec![tok(0, "John", "NNP", "poss", 2), tok(4, "'s", "POS", "case", 0), tok(7, "dog", "NN", "ROOT", 2)]);
        let all2: Vec<TokenId> = doc2.ids().collect();
        assert_eq!(merge_tokens(&doc2, &all2), "John's dog");
    }

    #[test]
    fn merge_strs_skips_empty_parts() {
        assert_eq!(merge_strs(&["", "did", "found"]), "did found");
    }

    #[test]
    fn full_subject_includes_modifiers() {
        let doc = chase_doc();
        assert_eq!(find_full_subject(&doc, TokenId(2)), ids(&[0, 1, 2]));
    }

    #[test]
    fn full_object_excludes_head_preposition() {
        // "saw the man with binoculars" — "with binoculars" hangs off "man"
        let doc = Doc::new(vec![
            tok(0, "saw", "VBD", "ROOT", 0),
            tok(4, "the", "DT", "det", 2),
            tok(8, "man", "NN", "dobj", 0),
            tok(12, "with", "IN", "prep", 2),
            tok(17, "binoculars", "NNS", "pobj", 3),
        ]);
        assert_eq!(find_full_direct_object(&doc, TokenId(2)), ids(&[1, 2]));
    }

    #[test]
    fn predicate_keeps_conj_only_without_dobj() {
        // "sang and danced" — no dobj, coordination shared
        let doc = Doc::new(vec![
            tok(0, "sang", "VBD", "ROOT", 0),
            tok(5, "and", "CC", "cc", 0),
            tok(9, "danced", "VBD", "conj", 0),
        ]);
        assert_eq!(find_full_predicate(&doc, TokenId(0), &[]), ids(&[0, 1, 2]));

        // "sang songs and danced" — dobj present, stop at coordination
        let doc2 = Doc::new(vec![
            tok(0, "sang", "VBD", "ROOT", 0),
            tok(5, "songs", "NNS", "dobj", 0),
            tok(11, "and", "CC", "cc", 0),
            tok(15, "danced", "VBD", "conj", 0),
        ]);
        assert_eq!(find_full_predicate(&doc2, TokenId(0), &[]), ids(&[0]));
    }

    #[test]
    fn predicate_collects_aux_and_negation() {
        // "did not run"
        let doc = Doc::new(vec![
            tok(0, "did", "VBD", "aux", 2),
            tok(4, "not", "RB", "neg", 2),
            tok(8, "run", "VB", "ROOT", 2),
        ]);
        assert_eq!(find_full_predicate(&doc, TokenId(2), &[]), ids(&[0, 1, 2]));
    }

    #[test]
    fn simplify_strips_embedded_relative_clause() {
        // "the man who slept left" — relcl "slept" headed by "man"
        let doc = Doc::new(vec![
            tok(0, "the", "DT", "det", 1),
            tok(4, "man", "NN", "nsubj", 4),
            tok(8, "who", "WP", "nsubj", 3),
            tok(12, "slept", "VBD", "relcl", 1),
            tok(18, "left", "VBD", "ROOT", 4),
        ]);
        let span = ids(&[0, 1, 2, 3]);
        assert_eq!(simplify_dependencies(&doc, &span), ids(&[0, 1]));
    }

    #[test]
    fn relative_clause_detection_honors_exclusions() {
        let doc = Doc::new(vec![
            tok(0, "which", "WDT", "nsubj", 1),
            tok(6, "ran", "VBD", "ROOT", 1),
        ]);
        assert!(is_in_relative_clause(&doc, TokenId(0), &[]));
        assert!(!is_in_relative_clause(&doc, TokenId(0), &["which"]));
    }

    #[test]
    fn replace_antecedent_splices_once() {
        let doc = chase_doc();
        let coref = CorefClusters::new(vec![vec![ids(&[4, 5]), ids(&[2])]]);
        // Span "quick dog" with "dog" clustered: mention replaced by "the cat"
        let out = replace_antecedent(&coref, TokenId(2), &ids(&[1, 2]));
        assert_eq!(out, ids(&[1, 4, 5]));
        let _ = doc;
    }
}
