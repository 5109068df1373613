//! Deconstructor — the rule engine.
//!
//! A single pass over the annotation set evaluates three rule families:
//! dependency-relation triggers (one firing per matching token),
//! named-entity triggers (one per qualifying entity), and global
//! semantic-role rules (one per frame). Rules are pure functions; results
//! never feed back into other rules, so one pass reaches the fixed point.
//!
//! Nothing is deduplicated here — the constructor collapses duplicates on
//! the final rendered text.

mod dep_rules;
mod ner_rules;
mod srl_rules;

use tracing::debug;

use crate::annotate::Annotated;
use crate::doc::{Doc, EntityLabel, Role, SrlFrame, TokenId};
use crate::spans;

/// The fixed taxonomy of question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Dative,
    Dobj,
    Acomp,
    Attr,
    Pcomp,
    Nsubj,
    NerDate,
    NerLoc,
    NerCardinal,
    NerPerson,
    Direct,
    SrlCausal,
    SrlPurpose,
    SrlManner,
    SrlTemporal,
    SrlLocative,
}

impl QuestionKind {
    /// The wire tag carried on the output QA pair.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Dative => "dative_question",
            QuestionKind::Dobj => "dobj_question",
            QuestionKind::Acomp => "acomp_question",
            QuestionKind::Attr => "attr_question",
            QuestionKind::Pcomp => "pcomp_question",
            QuestionKind::Nsubj => "nsubj_question",
            QuestionKind::NerDate => "ner_date_question",
            QuestionKind::NerLoc => "ner_loc_question",
            QuestionKind::NerCardinal => "ner_cardinal_question",
            QuestionKind::NerPerson => "ner_person_question",
            QuestionKind::Direct => "direct",
            QuestionKind::SrlCausal => "srl_causal",
            QuestionKind::SrlPurpose => "srl_purpose",
            QuestionKind::SrlManner => "srl_manner",
            QuestionKind::SrlTemporal => "srl_temporal",
            QuestionKind::SrlLocative => "srl_locative",
        }
    }
}

/// One structured rule firing: the (subject, predicate, object, extra,
/// answer, kind) tuple handed to the constructor. Immutable after
/// creation; each firing builds a complete, independent value.
#[derive(Debug, Clone)]
pub struct Deconstruction {
    pub subject: Vec<TokenId>,
    pub predicate: Vec<TokenId>,
    pub object: Vec<TokenId>,
    pub extra: Vec<TokenId>,
    pub key_answer: Vec<TokenId>,
    pub kind: QuestionKind,
}

/// Evaluate the whole rule table over one annotated document.
pub fn deconstruct(ann: &Annotated) -> Vec<Deconstruction> {
    let mut out = Vec::new();

    for id in ann.doc.ids() {
        match ann.doc.dep(id) {
            "dative" => out.extend(dep_rules::dative(ann, id)),
            "dobj" => out.extend(dep_rules::dobj(ann, id)),
            "acomp" => out.extend(dep_rules::acomp(ann, id)),
            "attr" => out.extend(dep_rules::attr(ann, id)),
            "pcomp" => out.extend(dep_rules::pcomp(ann, id)),
            "nsubj" | "nsubjpass" => out.extend(dep_rules::nsubj(ann, id)),
            _ => {}
        }
    }

    for ent in &ann.entities {
        match ent.label {
            EntityLabel::Date => out.extend(ner_rules::date(ann, ent)),
            EntityLabel::Loc => out.extend(ner_rules::loc(ann, ent)),
            EntityLabel::Cardinal => out.extend(ner_rules::cardinal(ann, ent)),
            EntityLabel::Person => out.extend(ner_rules::person(ann, ent)),
        }
    }

    out.extend(srl_rules::global(ann));

    debug!(results = out.len(), "deconstruction complete");
    out
}

/// Full predicate span for a frame. Multi-token verb groups expand around
/// the token tagged as a verb; a frame with no verb-tagged token falls
/// back to the raw `V` span.
pub(crate) fn frame_predicate(doc: &Doc, frame: &SrlFrame) -> Vec<TokenId> {
    let Some(v) = frame.verb() else {
        return Vec::new();
    };
    if v.len() == 1 {
        return spans::find_full_predicate(doc, v[0], &[]);
    }
    let mut pred = None;
    for &tok in v {
        if doc.tag(tok).starts_with("VB") {
            pred = Some(spans::find_full_predicate(doc, tok, &[]));
        }
    }
    pred.unwrap_or_else(|| v.to_vec())
}

/// A frame's predicate is passive when its verb token carries an
/// `auxpass` child.
pub(crate) fn frame_is_passive(doc: &Doc, frame: &SrlFrame) -> bool {
    let Some(v) = frame.verb() else {
        return false;
    };
    let verb_tokens: Vec<TokenId> = if v.len() == 1 {
        vec![v[0]]
    } else {
        v.iter().copied().filter(|&t| doc.tag(t).starts_with("VB")).collect()
    };
    verb_tokens
        .iter()
        .any(|&t| doc.children(t).iter().any(|&c| doc.dep(c) == "auxpass"))
}

/// Collect the given modifier roles into an extra-field span. Unless
/// `unconditional`, a modifier already folded into the predicate text is
/// skipped (substring check on merged text).
pub(crate) fn modifier_extras(
    doc: &Doc,
    frame: &SrlFrame,
    pred_text: &str,
    roles: &[Role],
    unconditional: bool,
) -> Vec<TokenId> {
    let mut out = Vec::new();
    for &role in roles {
        if let Some(span) = frame.get(role) {
            if unconditional || !pred_text.contains(&spans::merge_tokens(doc, span)) {
                out.extend_from_slice(span);
            }
        }
    }
    out
}
