//! End-to-end tests for construction options: selection methods, limits,
//! type filtering, configuration errors, and coreference enhancement.

use questgen::{
    Error, GenerateOptions, Generator, RawAnnotations, RawEntity, RawSrlFrame, RawToken,
    SelectionMethod,
};

// ============================================================================
// Fixture helpers
// ============================================================================

fn tok(
    offset: usize,
    text: &str,
    pos: &str,
    tag: &str,
    dep: &str,
    head: usize,
    sent: usize,
) -> RawToken {
    RawToken {
        offset,
        text: text.to_string(),
        pos: pos.to_string(),
        tag: tag.to_string(),
        dep: dep.to_string(),
        head,
        sent,
    }
}

fn frame(roles: &[(&str, (usize, usize))]) -> RawSrlFrame {
    RawSrlFrame {
        roles: roles.iter().map(|(k, s)| (k.to_string(), *s)).collect(),
    }
}

// "Vincent Kennedy McMahon founded Titan Sports, Inc in 1980."
fn mcmahon() -> RawAnnotations {
    RawAnnotations {
        tokens: vec![
            tok(0, "Vincent", "PROPN", "NNP", "compound", 2, 0),
            tok(8, "Kennedy", "PROPN", "NNP", "compound", 2, 0),
            tok(16, "McMahon", "PROPN", "NNP", "nsubj", 3, 0),
            tok(24, "founded", "VERB", "VBD", "ROOT", 3, 0),
            tok(32, "Titan", "PROPN", "NNP", "compound", 5, 0),
            tok(38, "Sports", "PROPN", "NNP", "dobj", 3, 0),
            tok(44, ",", "PUNCT", ",", "punct", 5, 0),
            tok(46, "Inc", "PROPN", "NNP", "appos", 5, 0),
            tok(50, "in", "ADP", "IN", "prep", 3, 0),
            tok(53, "1980", "NUM", "CD", "pobj", 8, 0),
            tok(57, ".", "PUNCT", ".", "punct", 3, 0),
        ],
        srl: vec![frame(&[
            ("V", (24, 31)),
            ("ARG0", (0, 23)),
            ("ARG1", (32, 49)),
            ("ARGM-TMP", (50, 57)),
        ])],
        entities: vec![
            RawEntity {
                text: "Vincent Kennedy McMahon".to_string(),
                label: "PERSON".to_string(),
                start: 0,
                end: 23,
            },
            RawEntity {
                text: "Titan Sports, Inc".to_string(),
                label: "ORG".to_string(),
                start: 32,
                end: 49,
            },
        ],
        ..Default::default()
    }
}

// "The Kuna saved their forest. They made a forest park."
fn kuna() -> RawAnnotations {
    RawAnnotations {
        tokens: vec![
            tok(0, "The", "DET", "DT", "det", 1, 0),
            tok(4, "Kuna", "PROPN", "NNP", "nsubj", 2, 0),
            tok(9, "saved", "VERB", "VBD", "ROOT", 2, 0),
            tok(15, "their", "PRON", "PRP$", "poss", 4, 0),
            tok(21, "forest", "NOUN", "NN", "dobj", 2, 0),
            tok(27, ".", "PUNCT", ".", "punct", 2, 0),
            tok(29, "They", "PRON", "PRP", "nsubj", 7, 1),
            tok(34, "made", "VERB", "VBD", "ROOT", 7, 1),
            tok(39, "a", "DET", "DT", "det", 10, 1),
            tok(41, "forest", "NOUN", "NN", "compound", 10, 1),
            tok(48, "park", "NOUN", "NN", "dobj", 7, 1),
            tok(52, ".", "PUNCT", ".", "punct", 7, 1),
        ],
        srl: vec![
            frame(&[("V", (9, 14)), ("ARG0", (0, 8)), ("ARG1", (15, 27))]),
            frame(&[("V", (34, 38)), ("ARG0", (29, 33)), ("ARG1", (39, 52))]),
        ],
        coref: vec![vec![(0, 8), (29, 33)]],
        ..Default::default()
    }
}

fn run(opts: GenerateOptions) -> Vec<questgen::QaPair> {
    Generator::with_options(opts).generate(&mcmahon()).unwrap()
}

// ============================================================================
// 1. Ordering methods
// ============================================================================

#[test]
fn default_order_is_ascending_question_length() {
    let pairs = run(GenerateOptions::default());
    for window in pairs.windows(2) {
        assert!(window[0].question.len() <= window[1].question.len());
    }
}

#[test]
fn longest_orders_descending() {
    let pairs = run(GenerateOptions {
        selection_method: Some(SelectionMethod::Longest),
        ..Default::default()
    });
    for window in pairs.windows(2) {
        assert!(window[0].question.len() >= window[1].question.len());
    }
}

#[test]
fn alphabetical_and_reverse_are_mirror_images() {
    let forward = run(GenerateOptions {
        selection_method: Some(SelectionMethod::Alphabetical),
        ..Default::default()
    });
    let mut backward = run(GenerateOptions {
        selection_method: Some(SelectionMethod::ReverseAlphabetical),
        ..Default::default()
    });
    backward.reverse();
    assert_eq!(forward, backward);
    for window in forward.windows(2) {
        assert!(window[0].question <= window[1].question);
    }
}

#[test]
fn answer_length_orders_by_answer() {
    let pairs = run(GenerateOptions {
        selection_method: Some(SelectionMethod::AnswerLength),
        ..Default::default()
    });
    for window in pairs.windows(2) {
        assert!(window[0].answer.len() <= window[1].answer.len());
    }
}

#[test]
fn random_preserves_the_pair_set() {
    let mut base = run(GenerateOptions::default());
    let mut shuffled = run(GenerateOptions {
        selection_method: Some(SelectionMethod::Random),
        ..Default::default()
    });
    base.sort_by(|a, b| a.question.cmp(&b.question));
    shuffled.sort_by(|a, b| a.question.cmp(&b.question));
    assert_eq!(base, shuffled);
}

// ============================================================================
// 2. Type filtering and limits
// ============================================================================

#[test]
fn only_type_filters_by_prefix() {
    let direct = run(GenerateOptions {
        selection_method: Some(SelectionMethod::OnlyType),
        type_name: Some("direct".to_string()),
        ..Default::default()
    });
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].kind, "direct");

    let ner = run(GenerateOptions {
        selection_method: Some(SelectionMethod::OnlyType),
        type_name: Some("ner".to_string()),
        ..Default::default()
    });
    assert!(!ner.is_empty());
    assert!(ner.iter().all(|p| p.kind.starts_with("ner")));
}

#[test]
fn limit_truncates_after_ordering() {
    let all = run(GenerateOptions::default());
    let limited = run(GenerateOptions {
        limit: 3,
        ..Default::default()
    });
    assert_eq!(limited.len(), 3);
    assert_eq!(limited, all[..3].to_vec());
}

#[test]
fn zero_limit_means_unlimited() {
    let pairs = run(GenerateOptions {
        limit: 0,
        ..Default::default()
    });
    assert!(pairs.len() > 3);
}

// ============================================================================
// 3. Configuration errors fail fast
// ============================================================================

#[test]
fn only_type_without_type_name_is_rejected() {
    let generator = Generator::with_options(GenerateOptions {
        selection_method: Some(SelectionMethod::OnlyType),
        ..Default::default()
    });
    let err = generator.generate(&mcmahon()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

// ============================================================================
// 4. Coreference enhancement
// ============================================================================

#[test]
fn enhancement_widens_direct_answers_with_prior_clauses() {
    let base = Generator::new().generate(&kuna()).unwrap();
    assert!(base
        .iter()
        .all(|p| !p.answer.contains("saved their forest") || p.kind != "direct"));

    let enhanced = Generator::with_options(GenerateOptions {
        enhance_level: 1,
        ..Default::default()
    })
    .generate(&kuna())
    .unwrap();

    // Second-sentence yes/no question keeps its plain answer and gains an
    // enriched variant citing the antecedent's earlier clause.
    assert!(enhanced
        .iter()
        .any(|p| p.question == "Did they make a forest park?" && p.answer == "Yes"));
    assert!(enhanced.iter().any(|p| {
        p.question == "Did they make a forest park?"
            && p.answer == "Yes; and The Kuna saved their forest"
    }));
}

#[test]
fn enhancement_widens_subjects_on_wh_questions() {
    let enhanced = Generator::with_options(GenerateOptions {
        enhance_level: 1,
        ..Default::default()
    })
    .generate(&kuna())
    .unwrap();

    assert!(enhanced
        .iter()
        .any(|p| p.question.contains("the one that saved their forest")));
}

#[test]
fn coreference_resolves_nsubj_answers_to_antecedents() {
    let pairs = Generator::new().generate(&kuna()).unwrap();
    assert!(pairs
        .iter()
        .any(|p| p.kind == "nsubj_question" && p.answer == "The Kuna"));
}
