//! Dependency-relation rules: dative, dobj, acomp, attr, pcomp, nsubj.
//!
//! Each rule receives its triggering token plus the full annotation set
//! and emits zero or more complete results. Unmet preconditions are
//! silent skips, not errors.

use crate::annotate::Annotated;
use crate::doc::{Doc, Role, SrlFrame, TokenId};
use crate::spans;

use super::{frame_predicate, modifier_extras, Deconstruction, QuestionKind};

const LOC_TMP: &[Role] = &[Role::Loc, Role::Tmp];

/// Indirect object ("gave *him* a book"). Requires a co-occurring direct
/// object on the same verb head and an SRL frame carrying all three of
/// subject, object, and indirect object as distinct spans.
pub(super) fn dative(ann: &Annotated, dative_tok: TokenId) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let mut out = Vec::new();

    for dobj_tok in doc.ids().filter(|&t| doc.dep(t) == "dobj") {
        if doc.head(dobj_tok) != doc.head(dative_tok) {
            continue;
        }
        for frame in &ann.frames {
            let Some(verb) = frame.verb() else { continue };
            let subject = frame.nth_core_arg(0);
            let object = frame.nth_core_arg(1);
            let indirect = frame.nth_core_arg(2);
            let subject_text = spans::merge_tokens(doc, subject);
            let object_text = spans::merge_tokens(doc, object);
            let indirect_text = spans::merge_tokens(doc, indirect);

            if subject_text.is_empty() || object_text.is_empty() || indirect_text.is_empty() {
                continue;
            }
            if subject_text == object_text
                || indirect_text == object_text
                || indirect_text == subject_text
            {
                continue;
            }
            if verb.contains(&doc.head(dobj_tok))
                && object_text.contains(doc.text(dobj_tok))
                && indirect_text.contains(doc.text(dative_tok))
            {
                let predicate = frame_predicate(doc, frame);
                let pred_text = spans::merge_tokens(doc, &predicate);
                out.push(Deconstruction {
                    subject: subject.to_vec(),
                    predicate,
                    object: object.to_vec(),
                    extra: modifier_extras(doc, frame, &pred_text, LOC_TMP, false),
                    key_answer: indirect.to_vec(),
                    kind: QuestionKind::Dative,
                });
            }
        }
    }
    out
}

/// Direct object. Fires once per frame whose verb heads the object token
/// and whose patient role contains it.
pub(super) fn dobj(ann: &Annotated, dobj_tok: TokenId) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let mut out = Vec::new();

    for frame in &ann.frames {
        let Some(verb) = frame.verb() else { continue };
        let subject = frame.nth_core_arg(0);
        let object = frame.nth_core_arg(1);
        let subject_text = spans::merge_tokens(doc, subject);
        let object_text = spans::merge_tokens(doc, object);

        if subject_text.is_empty() || object_text.is_empty() || subject_text == object_text {
            continue;
        }
        if verb.contains(&doc.head(dobj_tok)) && object_text.contains(doc.text(dobj_tok)) {
            let predicate = frame_predicate(doc, frame);
            let pred_text = spans::merge_tokens(doc, &predicate);
            out.push(Deconstruction {
                subject: subject.to_vec(),
                predicate,
                object: object.to_vec(),
                extra: modifier_extras(doc, frame, &pred_text, LOC_TMP, false),
                key_answer: object.to_vec(),
                kind: QuestionKind::Dobj,
            });
        }
    }
    out
}

/// Adjective complement ("the sky is *blue*"). The answer is the
/// characteristic itself, not a full clause.
pub(super) fn acomp(ann: &Annotated, acomp_tok: TokenId) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let mut out = Vec::new();

    for frame in &ann.frames {
        let Some(verb) = frame.verb() else { continue };
        let subject = frame.nth_core_arg(0);
        let object = frame.nth_core_arg(1);
        let subject_text = spans::merge_tokens(doc, subject);
        let object_text = spans::merge_tokens(doc, object);

        if subject_text.is_empty() || object_text.is_empty() || subject_text == object_text {
            continue;
        }
        let verb_text = spans::merge_tokens(doc, verb);
        if verb_text == doc.text(doc.head(acomp_tok)) && object_text.contains(doc.text(acomp_tok)) {
            out.push(Deconstruction {
                subject: subject.to_vec(),
                predicate: Vec::new(),
                object: object.to_vec(),
                extra: modifier_extras(doc, frame, "", LOC_TMP, true),
                key_answer: vec![acomp_tok],
                kind: QuestionKind::Acomp,
            });
        }
    }
    out
}

/// Attribute ("the result was *a disaster*"). Scans every non-verb role
/// for one containing the attribute that is not the subject itself.
pub(super) fn attr(ann: &Annotated, attr_tok: TokenId) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let mut out = Vec::new();

    for frame in &ann.frames {
        let Some(verb) = frame.verb() else { continue };
        let subject = frame.nth_core_arg(0);
        let subject_text = spans::merge_tokens(doc, subject);
        if subject_text.is_empty() {
            continue;
        }
        let verb_text = spans::merge_tokens(doc, verb);
        if verb_text != doc.text(doc.head(attr_tok)) {
            continue;
        }
        for (role, span) in frame.roles() {
            let span_text = spans::merge_tokens(doc, span);
            if role != Role::V
                && span_text != subject_text
                && span_text.contains(doc.text(attr_tok))
            {
                out.push(Deconstruction {
                    subject: Vec::new(),
                    predicate: Vec::new(),
                    object: subject.to_vec(),
                    extra: modifier_extras(doc, frame, "", LOC_TMP, true),
                    key_answer: vec![attr_tok],
                    kind: QuestionKind::Attr,
                });
            }
        }
    }
    out
}

/// Prepositional complement ("interested *in sailing*"). The predicate is
/// rebuilt by walking backward from the preposition to the frame's main
/// verb, then on through verb-phrase chunk tags up to the subject. The
/// answer keeps the matched role span from the complement onward (the
/// whole span in passive voice).
pub(super) fn pcomp(ann: &Annotated, pcomp_tok: TokenId) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let mut out = Vec::new();

    for frame in &ann.frames {
        if frame.verb().is_none() {
            continue;
        }
        let subject = frame.nth_core_arg(0);
        let subject_text = spans::merge_tokens(doc, subject);
        if subject_text.is_empty() {
            continue;
        }
        let Some(predicate) = walk_back_to_verb(doc, frame, doc.head(pcomp_tok), &subject_text)
        else {
            continue;
        };
        let object = frame.nth_core_arg(1);
        let object_text = spans::merge_tokens(doc, object);

        for (role, span) in frame.roles() {
            if role == Role::V || !spans::merge_tokens(doc, span).contains(doc.text(pcomp_tok)) {
                continue;
            }
            let Some(pcomp_idx) = span.iter().position(|&t| t == pcomp_tok) else {
                continue;
            };
            let is_passive = subject.iter().any(|&t| doc.dep(t) == "nsubjpass");

            let mut result_subject = subject.to_vec();
            if subject_text == spans::merge_tokens(doc, span)
                && !object_text.is_empty()
                && object_text != subject_text
            {
                result_subject = object.to_vec();
            }
            let key_answer = if is_passive {
                span.to_vec()
            } else {
                span[pcomp_idx..].to_vec()
            };
            out.push(Deconstruction {
                subject: result_subject,
                predicate: predicate.clone(),
                object: Vec::new(),
                extra: span[..pcomp_idx].to_vec(),
                key_answer,
                kind: QuestionKind::Pcomp,
            });
        }
    }
    out
}

/// Backward walk from the preposition to the frame's verb, then through
/// verb-phrase chunks until a token of the subject is reached. Yields
/// `None` when the verb never appears before the preposition. A leading
/// infinitive "to" is dropped.
fn walk_back_to_verb(
    doc: &Doc,
    frame: &SrlFrame,
    prep: TokenId,
    subject_text: &str,
) -> Option<Vec<TokenId>> {
    const VP_TAGS: &[&str] = &["B-VP", "I-VP", "E-VP", "S-VP"];
    let verb = frame.verb()?;

    let mut pred = vec![prep];
    let mut i = prep.index();
    let mut found = false;
    while i > 0 && !found {
        i -= 1;
        let id = TokenId(i as u32);
        pred.push(id);
        if verb.contains(&id) {
            found = true;
        }
    }
    if !found {
        return None;
    }
    while i > 0 {
        let id = TokenId(i as u32 - 1);
        match doc.chunk(id) {
            Some(tag) if VP_TAGS.contains(&tag) => {
                if subject_text.contains(doc.text(id)) {
                    break;
                }
                pred.push(id);
                i -= 1;
            }
            _ => break,
        }
    }
    pred.sort();
    pred.dedup();
    if pred.first().is_some_and(|&t| doc.text(t) == "to") {
        pred.remove(0);
    }
    Some(pred)
}

/// Nominal subject. Emits one result per direct object under the
/// subject's head verb, with the (coreference-resolved) subject as the
/// answer — "who does X" style.
pub(super) fn nsubj(ann: &Annotated, nsubj_tok: TokenId) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let head = doc.head(nsubj_tok);
    let predicate = spans::find_full_predicate(doc, head, &["advmod"]);
    let full_subject = spans::find_full_subject(doc, nsubj_tok);
    let full_subject = spans::replace_antecedent(&ann.coref, nsubj_tok, &full_subject);

    let mut out = Vec::new();
    for &child in doc.children(head) {
        if doc.dep(child) != "dobj" {
            continue;
        }
        let object = spans::find_full_direct_object(doc, child);
        let object = spans::replace_antecedent(&ann.coref, child, &object);
        out.push(Deconstruction {
            subject: Vec::new(),
            predicate: predicate.clone(),
            object,
            extra: Vec::new(),
            key_answer: full_subject.clone(),
            kind: QuestionKind::Nsubj,
        });
    }
    out
}
