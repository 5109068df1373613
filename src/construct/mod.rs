//! Constructor — renders deconstruction results into question/answer
//! pairs: verb-phrase analysis, template interpolation, formatting,
//! deduplication, ordering, and selection.

mod enhance;
mod lemma;
mod templates;

use hashbrown::HashSet;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotate::Annotated;
use crate::deconstruct::{Deconstruction, QuestionKind};
use crate::doc::{Doc, TokenId};
use crate::spans;
use crate::{GenerateOptions, SelectionMethod};

use templates::TemplateParts;

/// One generated question/answer pair. `kind` serializes as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Render, deduplicate, order, and select. Options are validated by the
/// caller before any rule runs.
pub fn run(ann: &Annotated, results: &[Deconstruction], opts: &GenerateOptions) -> Vec<QaPair> {
    let doc = &ann.doc;
    let mut pairs = Vec::new();

    for result in results {
        let phrase = analyze_predicate(doc, result);
        if phrase.invalidated {
            debug!(kind = result.kind.as_str(), "gerund predicate, result dropped");
            continue;
        }
        let subject_text = spans::merge_tokens(doc, &result.subject);
        let object_text = spans::merge_tokens(doc, &result.object);
        let extra_text = spans::merge_tokens(doc, &result.extra);
        let predicate_text = spans::merge_tokens(doc, &result.predicate);
        let answer_text = spans::merge_tokens(doc, &result.key_answer);

        let enrichment = (opts.enhance_level > 0)
            .then(|| enhance::enrich(ann, result, opts.enhance_level))
            .flatten();

        if result.kind == QuestionKind::Direct {
            // One question, possibly several progressively richer answers.
            let base_answer = if phrase.negative.is_empty() { "Yes" } else { "No" };
            let parts = TemplateParts {
                aux: &phrase.aux,
                negative: &phrase.negative,
                subject: &subject_text,
                remainder: &phrase.remainder,
                predicate: &predicate_text,
                object: &object_text,
                extra: &extra_text,
                answer: base_answer,
            };
            let question = format_question(&templates::render(result.kind, ann, &parts), result.kind);
            if question.is_empty() {
                continue;
            }
            let mut answers = vec![base_answer.to_string()];
            if let Some(e) = &enrichment {
                for k in 1..=e.clauses.len() {
                    answers.push(format!(
                        "{base_answer}; and {} {}",
                        e.antecedent,
                        e.clauses[..k].join(" and ")
                    ));
                }
            }
            for answer in answers {
                pairs.push(QaPair {
                    question: question.clone(),
                    answer,
                    kind: result.kind.as_str().to_string(),
                });
            }
        } else {
            // One answer, possibly several progressively wider subjects.
            let mut subjects = vec![subject_text.clone()];
            if let Some(e) = &enrichment {
                for k in 1..=e.clauses.len() {
                    subjects.push(format!(
                        "{subject_text}, the one that {}",
                        e.clauses[..k].join(" and ")
                    ));
                }
            }
            for subject in subjects {
                let parts = TemplateParts {
                    aux: &phrase.aux,
                    negative: &phrase.negative,
                    subject: &subject,
                    remainder: &phrase.remainder,
                    predicate: &predicate_text,
                    object: &object_text,
                    extra: &extra_text,
                    answer: &answer_text,
                };
                let question =
                    format_question(&templates::render(result.kind, ann, &parts), result.kind);
                if question.is_empty() || answer_text.is_empty() {
                    continue;
                }
                pairs.push(QaPair {
                    question,
                    answer: answer_text.clone(),
                    kind: result.kind.as_str().to_string(),
                });
            }
        }
    }

    let mut pairs = dedup(pairs);
    pairs.sort_by_key(|p| p.question.len());
    select(&mut pairs, opts);
    debug!(pairs = pairs.len(), "construction complete");
    pairs
}

// ============================================================
// Verb-phrase analysis
// ============================================================

struct VerbPhrase {
    aux: String,
    negative: String,
    /// Predicate text after auxiliary extraction.
    remainder: String,
    invalidated: bool,
}

const VERB_TAGS: &[&str] = &["VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "MD"];
const COPULAS: &[&str] = &["am", "is", "are", "was", "were"];
const HOISTABLE: &[&str] = &["am", "is", "are", "was", "were", "has", "have", "had", "will"];

fn split_words(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

/// The verb-phrase state machine: scan for coordination, infinitive
/// marker, negation, and verb count, then pick an auxiliary and rewrite
/// the predicate accordingly. Coordinated predicates are left untouched
/// apart from an empty leading placeholder.
fn analyze_predicate(doc: &Doc, result: &Deconstruction) -> VerbPhrase {
    let mut pred: Vec<TokenId> = result.predicate.clone();
    let mut has_and = false;
    let mut has_to = false;
    let mut num_verbs = 0usize;
    let mut first_verb = None;
    let mut neg_idx = None;

    for (idx, &tok) in pred.iter().enumerate() {
        let text = doc.text(tok);
        if text == "and" {
            has_and = true;
        }
        if text == "to" {
            has_to = true;
        }
        if VERB_TAGS.contains(&doc.tag(tok)) {
            if num_verbs == 0 {
                first_verb = Some(idx);
            }
            num_verbs += 1;
        }
        if doc.tag(tok) == "RB" && text.eq_ignore_ascii_case("not") {
            if num_verbs == 0 {
                first_verb = Some(idx);
            }
            num_verbs += 1;
            neg_idx = Some(idx);
        }
    }

    let mut aux = String::new();
    let mut negative = String::new();
    let mut invalidated = false;

    if has_and {
        // Coordinated predicate: no rewriting, only the placeholder that
        // keeps template slots aligned.
        let mut strs = split_words(&spans::merge_tokens(doc, &pred));
        strs.insert(0, String::new());
        return VerbPhrase {
            aux,
            negative,
            remainder: spans::merge_strs(&strs),
            invalidated,
        };
    }

    if let Some(ni) = neg_idx {
        negative = doc.text(pred.remove(ni)).to_string();
    }
    let mut strs = split_words(&spans::merge_tokens(doc, &pred));

    if (num_verbs == 1 || has_to) && !pred.is_empty() {
        if !COPULAS.contains(&doc.text(pred[0])) {
            let fv = first_verb.unwrap_or(0).min(pred.len() - 1);
            let tok = pred[fv];
            let word = doc.text(tok).to_string();
            match doc.tag(tok) {
                "MD" => {}
                "VBG" => invalidated = true,
                tag => {
                    let root = match tag {
                        "VBZ" => {
                            aux = "does".to_string();
                            if word == "has" {
                                word.clone()
                            } else {
                                lemma::lemmatize(&word)
                            }
                        }
                        "VBP" => {
                            aux = "do".to_string();
                            word.clone()
                        }
                        "VBD" | "VBN" => {
                            aux = "did".to_string();
                            lemma::lemmatize(&word)
                        }
                        _ => {
                            aux = subject_aux(doc, &result.subject).to_string();
                            word.clone()
                        }
                    };
                    pred.remove(fv);
                    let mut rewritten = vec![root];
                    rewritten.extend(split_words(&spans::merge_tokens(doc, &pred)));
                    strs = rewritten;
                }
            }
        }
    }
    if num_verbs == 0 && pred.len() == 1 && result.kind != QuestionKind::Attr {
        let main = doc.text(pred[0]).to_string();
        aux = if lemma::lemmatize(&main) == main {
            "do".to_string()
        } else {
            "does".to_string()
        };
        strs = vec![main];
    }
    if num_verbs > 1 {
        if let Some(fv) = first_verb {
            if fv < pred.len() && HOISTABLE.contains(&doc.text(pred[fv])) {
                aux = doc.text(pred[fv]).to_string();
                pred.remove(fv);
                strs = split_words(&spans::merge_tokens(doc, &pred));
            }
        }
    }

    VerbPhrase {
        aux,
        negative,
        remainder: spans::merge_strs(&strs),
        invalidated,
    }
}

/// Auxiliary for a bare verb with no inflection signal, decided by the
/// number of the first subject noun found in document order.
fn subject_aux(doc: &Doc, subject: &[TokenId]) -> &'static str {
    for id in doc.ids() {
        if !subject.contains(&id) {
            continue;
        }
        match doc.tag(id) {
            "NN" => return "does",
            "NNS" => return "do",
            _ => {}
        }
    }
    "do"
}

// ============================================================
// Formatting, dedup, selection
// ============================================================

const TIGHT: &[&str] = &[".", ",", "!", "?", ":", ";"];
const DEMOTED: &[&str] = &["He", "She", "It", "They", "We", "In"];

/// Collapse whitespace, demote mid-question capitalized pronouns, attach
/// punctuation, and add the final mark. Directive templates (acomp) end
/// in a period, interrogatives in a question mark.
fn format_question(raw: &str, kind: QuestionKind) -> String {
    let mut out = String::new();
    for (idx, word) in raw.split_whitespace().enumerate() {
        let word = if idx != 0 && DEMOTED.contains(&word) {
            word.to_lowercase()
        } else {
            word.to_string()
        };
        if TIGHT.contains(&word.as_str()) || word == "'s" {
            out.push_str(&word);
        } else {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&word);
        }
    }
    if out.is_empty() {
        return out;
    }
    out.push(if kind == QuestionKind::Acomp { '.' } else { '?' });
    out
}

/// Keep a pair when its question *or* its answer is unseen. Collapsing
/// only fully-seen pairs keeps distinct answers to a repeated question
/// and distinct questions over a repeated answer.
fn dedup(pairs: Vec<QaPair>) -> Vec<QaPair> {
    let mut seen_questions: HashSet<String> = HashSet::new();
    let mut seen_answers: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(pairs.len());
    for pair in pairs {
        if seen_questions.contains(&pair.question) && seen_answers.contains(&pair.answer) {
            continue;
        }
        seen_questions.insert(pair.question.clone());
        seen_answers.insert(pair.answer.clone());
        out.push(pair);
    }
    out
}

/// Apply the caller's selection method on top of the base
/// ascending-question-length order, then truncate.
fn select(pairs: &mut Vec<QaPair>, opts: &GenerateOptions) {
    match opts.selection_method {
        None | Some(SelectionMethod::Shortest) => {}
        Some(SelectionMethod::Random) => pairs.shuffle(&mut rand::thread_rng()),
        Some(SelectionMethod::OnlyType) => {
            let prefix = opts.type_name.as_deref().unwrap_or_default();
            pairs.retain(|p| p.kind.starts_with(prefix));
        }
        Some(SelectionMethod::Longest) => {
            pairs.sort_by(|a, b| b.question.len().cmp(&a.question.len()));
        }
        Some(SelectionMethod::Alphabetical) => pairs.sort_by(|a, b| a.question.cmp(&b.question)),
        Some(SelectionMethod::ReverseAlphabetical) => {
            pairs.sort_by(|a, b| b.question.cmp(&a.question));
        }
        Some(SelectionMethod::AnswerLength) => pairs.sort_by_key(|p| p.answer.len()),
        Some(SelectionMethod::ReverseAnswerLength) => {
            pairs.sort_by(|a, b| b.answer.len().cmp(&a.answer.len()));
        }
    }
    if opts.limit > 0 {
        pairs.truncate(opts.limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(q: &str, a: &str, kind: &str) -> QaPair {
        QaPair {
            question: q.to_string(),
            answer: a.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn format_attaches_punctuation_and_demotes_pronouns() {
        let q = format_question("What did They find in 1988 ,   there", QuestionKind::Dobj);
        assert_eq!(q, "What did they find in 1988, there?");
    }

    #[test]
    fn format_keeps_leading_pronoun_capitalized() {
        let q = format_question("They made roads", QuestionKind::Dobj);
        assert_eq!(q, "They made roads?");
    }

    #[test]
    fn acomp_gets_a_period() {
        let q = format_question("Indicate characteristics of them", QuestionKind::Acomp);
        assert_eq!(q, "Indicate characteristics of them.");
    }

    #[test]
    fn dedup_is_or_gated() {
        let pairs = vec![
            pair("Q1?", "A1", "direct"),
            pair("Q1?", "A1", "direct"),
            pair("Q1?", "A2", "direct"),
            pair("Q2?", "A1", "direct"),
            pair("Q2?", "A2", "direct"),
        ];
        let out = dedup(pairs);
        assert_eq!(
            out,
            vec![
                pair("Q1?", "A1", "direct"),
                pair("Q1?", "A2", "direct"),
                pair("Q2?", "A1", "direct"),
            ]
        );
    }

    #[test]
    fn select_truncates_after_ordering() {
        let mut pairs = vec![
            pair("BB?", "x", "direct"),
            pair("A?", "yy", "direct"),
            pair("CCC?", "z", "direct"),
        ];
        let opts = GenerateOptions {
            selection_method: Some(SelectionMethod::Longest),
            limit: 2,
            ..Default::default()
        };
        select(&mut pairs, &opts);
        assert_eq!(pairs, vec![pair("CCC?", "z", "direct"), pair("BB?", "x", "direct")]);
    }

    #[test]
    fn only_type_prefix_matches() {
        let mut pairs = vec![
            pair("Q1?", "a", "ner_date_question"),
            pair("Q2?", "b", "direct"),
            pair("Q3?", "c", "ner_loc_question"),
        ];
        let opts = GenerateOptions {
            selection_method: Some(SelectionMethod::OnlyType),
            type_name: Some("ner".to_string()),
            ..Default::default()
        };
        select(&mut pairs, &opts);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.kind.starts_with("ner")));
    }

    // ------------------------------------------------------------
    // Verb-phrase analysis
    // ------------------------------------------------------------

    use crate::doc::Token;

    fn vtok(offset: usize, text: &str, tag: &str) -> Token {
        Token {
            offset,
            text: text.into(),
            pos: String::new(),
            tag: tag.into(),
            dep: String::new(),
            head: TokenId(0),
            sent: 0,
            chunk: None,
        }
    }

    fn phrase_for(tokens: Vec<Token>, subject: Vec<TokenId>, kind: QuestionKind) -> VerbPhrase {
        let predicate: Vec<TokenId> = (subject.len() as u32..tokens.len() as u32)
            .map(TokenId)
            .collect();
        let doc = Doc::new(tokens);
        let result = Deconstruction {
            subject,
            predicate,
            object: Vec::new(),
            extra: Vec::new(),
            key_answer: Vec::new(),
            kind,
        };
        analyze_predicate(&doc, &result)
    }

    #[test]
    fn vbz_takes_does_and_lemmatizes() {
        let p = phrase_for(vec![vtok(0, "runs", "VBZ")], vec![], QuestionKind::Dobj);
        assert_eq!(p.aux, "does");
        assert_eq!(p.remainder, "run");
    }

    #[test]
    fn vbd_takes_did_and_lemmatizes() {
        let p = phrase_for(vec![vtok(0, "ran", "VBD")], vec![], QuestionKind::Dobj);
        assert_eq!(p.aux, "did");
        assert_eq!(p.remainder, "run");
    }

    #[test]
    fn vbp_takes_do_unchanged() {
        let p = phrase_for(vec![vtok(0, "run", "VBP")], vec![], QuestionKind::Dobj);
        assert_eq!(p.aux, "do");
        assert_eq!(p.remainder, "run");
    }

    #[test]
    fn gerund_invalidates_the_result() {
        let p = phrase_for(vec![vtok(0, "running", "VBG")], vec![], QuestionKind::Dobj);
        assert!(p.invalidated);
    }

    #[test]
    fn modal_is_left_in_place_without_auxiliary() {
        let p = phrase_for(vec![vtok(0, "will", "MD")], vec![], QuestionKind::Dobj);
        assert_eq!(p.aux, "");
        assert_eq!(p.remainder, "will");
    }

    #[test]
    fn leading_copula_is_hoisted_from_verb_groups() {
        let p = phrase_for(
            vec![vtok(0, "was", "VBD"), vtok(4, "saved", "VBN")],
            vec![],
            QuestionKind::Direct,
        );
        assert_eq!(p.aux, "was");
        assert_eq!(p.remainder, "saved");
    }

    #[test]
    fn lone_copula_predicate_is_untouched() {
        let p = phrase_for(vec![vtok(0, "is", "VBZ")], vec![], QuestionKind::Direct);
        assert_eq!(p.aux, "");
        assert_eq!(p.remainder, "is");
    }

    #[test]
    fn negation_is_extracted_from_the_predicate() {
        let p = phrase_for(
            vec![vtok(0, "did", "VBD"), vtok(4, "not", "RB"), vtok(8, "run", "VB")],
            vec![],
            QuestionKind::Direct,
        );
        assert_eq!(p.negative, "not");
        assert_eq!(p.remainder, "did run");
        assert_eq!(p.aux, "");
    }

    #[test]
    fn coordinated_predicates_are_not_rewritten() {
        let p = phrase_for(
            vec![vtok(0, "sang", "VBD"), vtok(5, "and", "CC"), vtok(9, "danced", "VBD")],
            vec![],
            QuestionKind::Direct,
        );
        assert_eq!(p.aux, "");
        assert_eq!(p.remainder, "sang and danced");
    }

    proptest::proptest! {
        #[test]
        fn formatting_is_whitespace_clean(raw in "[ a-zA-Z']{0,40}") {
            let q = format_question(&raw, QuestionKind::Dobj);
            proptest::prop_assert!(!q.contains("  "));
            proptest::prop_assert!(!q.starts_with(' '));
            if !q.is_empty() {
                proptest::prop_assert!(q.ends_with('?'));
            }
        }
    }

    #[test]
    fn bare_verb_checks_subject_number() {
        let p = phrase_for(
            vec![vtok(0, "forests", "NNS"), vtok(8, "grow", "VB")],
            vec![TokenId(0)],
            QuestionKind::Dobj,
        );
        assert_eq!(p.aux, "do");
        assert_eq!(p.remainder, "grow");

        let p = phrase_for(
            vec![vtok(0, "forest", "NN"), vtok(7, "grow", "VB")],
            vec![TokenId(0)],
            QuestionKind::Dobj,
        );
        assert_eq!(p.aux, "does");
    }
}
