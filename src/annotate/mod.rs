//! Annotation Adapter — normalizes externally-computed parse, SRL,
//! named-entity, and coreference results into the token-indexed model.
//!
//! This is the only collaborator-facing module. It is a pure transform:
//! malformed or empty annotations yield `None`, which the orchestrator
//! turns into an empty question list rather than an error ("no extractable
//! structure" is a normal outcome for arbitrary text).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doc::{CorefClusters, Doc, Entity, EntityLabel, Role, SrlFrame, Token, TokenId};

/// One token from the external parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawToken {
    /// Character offset in the source text.
    pub offset: usize,
    pub text: String,
    /// Coarse part-of-speech (NOUN, VERB, ADP, ...).
    pub pos: String,
    /// Fine-grained tag (NN, VBZ, MD, ...).
    pub tag: String,
    /// Dependency label.
    pub dep: String,
    /// Index of the head token; the root points at itself.
    pub head: usize,
    /// Sentence index.
    pub sent: usize,
}

/// One SRL frame: role key → character span. Role order is significant and
/// preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSrlFrame {
    pub roles: Vec<(String, (usize, usize))>,
}

/// A named-entity mention with its surface text and character span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// A coreference cluster: mention character spans, antecedent first.
pub type RawCluster = Vec<(usize, usize)>;

/// The full annotation bundle for one input text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAnnotations {
    pub tokens: Vec<RawToken>,
    #[serde(default)]
    pub srl: Vec<RawSrlFrame>,
    #[serde(default)]
    pub entities: Vec<RawEntity>,
    #[serde(default)]
    pub coref: Vec<RawCluster>,
    /// Optional per-token shallow-parse IOB tags (B-VP, S-PRT, ...). Must
    /// be parallel to `tokens`; ignored otherwise.
    #[serde(default)]
    pub chunks: Vec<String>,
    /// Optional noun-phrase character spans.
    #[serde(default)]
    pub noun_phrases: Vec<(usize, usize)>,
}

impl RawAnnotations {
    /// Parse a JSON annotation bundle as emitted by the external
    /// annotation services.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// The adapter's output: everything downstream references the same arena.
#[derive(Debug, Clone)]
pub struct Annotated {
    pub doc: Doc,
    pub frames: Vec<SrlFrame>,
    pub entities: Vec<Entity>,
    pub coref: CorefClusters,
    pub noun_phrases: Vec<Vec<TokenId>>,
}

/// Build the internal representation. Returns `None` when the annotations
/// are unusable (empty token list, head index out of range, inverted span).
pub fn build(raw: &RawAnnotations) -> Option<Annotated> {
    if raw.tokens.is_empty() {
        debug!("annotation bundle has no tokens");
        return None;
    }
    let n = raw.tokens.len();
    for t in &raw.tokens {
        if t.head >= n {
            debug!(head = t.head, len = n, "head index out of range");
            return None;
        }
    }

    let use_chunks = raw.chunks.len() == n;
    let tokens: Vec<Token> = raw
        .tokens
        .iter()
        .enumerate()
        .map(|(i, t)| Token {
            offset: t.offset,
            text: t.text.clone(),
            pos: t.pos.clone(),
            tag: t.tag.clone(),
            dep: t.dep.clone(),
            head: TokenId(t.head as u32),
            sent: t.sent,
            chunk: use_chunks.then(|| raw.chunks[i].clone()),
        })
        .collect();
    let doc = Doc::new(tokens);

    let mut frames = Vec::with_capacity(raw.srl.len());
    for frame in &raw.srl {
        let mut roles = Vec::with_capacity(frame.roles.len());
        for (key, &(start, end)) in frame.roles.iter().map(|(k, s)| (k, s)) {
            if end < start {
                debug!(key, start, end, "inverted SRL span");
                return None;
            }
            let Some(role) = Role::parse(key) else {
                continue; // unknown modifier roles are not consumed by any rule
            };
            roles.push((role, doc.tokens_in_span(start, end)));
        }
        frames.push(SrlFrame::new(roles));
    }

    let entities = normalize_entities(&doc, &raw.entities);

    let clusters: Vec<Vec<Vec<TokenId>>> = raw
        .coref
        .iter()
        .map(|cluster| {
            cluster
                .iter()
                .map(|&(start, end)| doc.tokens_in_span(start, end))
                .collect()
        })
        .collect();
    let coref = CorefClusters::new(clusters);

    let noun_phrases = raw
        .noun_phrases
        .iter()
        .map(|&(start, end)| doc.tokens_in_span(start, end))
        .filter(|span| !span.is_empty())
        .collect();

    debug!(
        tokens = doc.len(),
        frames = frames.len(),
        entities = entities.len(),
        "annotations adapted"
    );
    Some(Annotated {
        doc,
        frames,
        entities,
        coref,
        noun_phrases,
    })
}

/// Map raw entity labels onto the closed internal set, dropping entities
/// no rule consumes. Date entities that are really age phrases ("10 years
/// old") are filtered out here.
fn normalize_entities(doc: &Doc, raw: &[RawEntity]) -> Vec<Entity> {
    let mut out = Vec::new();
    for ent in raw {
        let label = match ent.label.as_str() {
            "DATE" if !ent.text.contains("year old") && !ent.text.contains("years old") => {
                EntityLabel::Date
            }
            "CARDINAL" => EntityLabel::Cardinal,
            "PERSON" => EntityLabel::Person,
            "FACILITY" | "ORG" | "GPE" | "LOC" => EntityLabel::Loc,
            _ => continue,
        };
        let tokens = doc.tokens_in_span(ent.start, ent.end);
        if tokens.is_empty() {
            continue;
        }
        out.push(Entity {
            label,
            text: ent.text.clone(),
            tokens,
        });
    }
    out
}
