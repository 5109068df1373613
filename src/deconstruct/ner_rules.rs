//! Named-entity rules: DATE, LOC, CARDINAL, PERSON.

use crate::annotate::Annotated;
use crate::doc::{Doc, Entity, Role, TokenId};
use crate::spans;

use super::{frame_predicate, modifier_extras, Deconstruction, QuestionKind};

/// DATE entity → "when" material. Matches a frame role that holds the
/// date but is neither the temporal modifier itself nor the plain
/// subject/object span.
pub(super) fn date(ann: &Annotated, ent: &Entity) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let date_text = spans::merge_tokens(doc, &ent.tokens);
    let mut out = Vec::new();

    for frame in &ann.frames {
        if frame.verb().is_none() {
            continue;
        }
        let subject = frame.nth_core_arg(0);
        let object = frame.nth_core_arg(1);
        let subject_text = spans::merge_tokens(doc, subject);
        let object_text = spans::merge_tokens(doc, object);
        if subject_text.is_empty() || subject_text == object_text {
            continue;
        }
        for (role, span) in frame.roles() {
            if role == Role::V || role == Role::Tmp {
                continue;
            }
            let span_text = spans::merge_tokens(doc, span);
            if span_text.contains(&date_text)
                && span_text != subject_text
                && span_text != object_text
            {
                let predicate = frame_predicate(doc, frame);
                let pred_text = spans::merge_tokens(doc, &predicate);
                let extra: Vec<TokenId> =
                    modifier_extras(doc, frame, &pred_text, &[Role::Loc], false)
                        .into_iter()
                        .filter(|t| !ent.tokens.contains(t))
                        .collect();
                out.push(Deconstruction {
                    subject: subject.to_vec(),
                    predicate,
                    object: object.to_vec(),
                    extra,
                    key_answer: ent.tokens.clone(),
                    kind: QuestionKind::NerDate,
                });
            }
        }
    }
    out
}

/// LOC entity → "where" material. When the location hides inside the
/// object role, the true object is reconstructed from the raw token
/// sequence up to the preposition that introduces the location.
pub(super) fn loc(ann: &Annotated, ent: &Entity) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let loc_text = spans::merge_tokens(doc, &ent.tokens);
    let mut out = Vec::new();

    for frame in &ann.frames {
        if frame.verb().is_none() {
            continue;
        }
        let subject = frame.nth_core_arg(0);
        let object = frame.nth_core_arg(1);
        let subject_text = spans::merge_tokens(doc, subject);
        let object_text = spans::merge_tokens(doc, object);
        if subject_text.is_empty() || subject_text == object_text {
            continue;
        }
        let predicate = frame_predicate(doc, frame);
        let pred_text = spans::merge_tokens(doc, &predicate);

        for (role, span) in frame.roles() {
            let span_text = spans::merge_tokens(doc, span);
            if !span_text.contains(&loc_text)
                || role == Role::V
                || role == Role::Loc
                || span_text == subject_text
            {
                continue;
            }
            let mut real_object = if !object_text.is_empty() && span_text == object_text {
                object_before_location(doc, span, &ent.tokens)
            } else {
                object.to_vec()
            };
            if real_object.last().is_some_and(|&t| doc.text(t) == "the") {
                real_object.pop();
            }
            out.push(Deconstruction {
                subject: subject.to_vec(),
                predicate: predicate.clone(),
                object: real_object,
                extra: modifier_extras(doc, frame, &pred_text, &[Role::Tmp], false),
                key_answer: ent.tokens.clone(),
                kind: QuestionKind::NerLoc,
            });
        }
    }
    out
}

/// Scan consecutive token pairs inside the matched span and keep tokens
/// up to the preposition immediately preceding the location mention.
fn object_before_location(doc: &Doc, span: &[TokenId], loc_tokens: &[TokenId]) -> Vec<TokenId> {
    let mut out = Vec::new();
    for i in 0..doc.len().saturating_sub(1) {
        let cur = TokenId(i as u32);
        let next = TokenId(i as u32 + 1);
        if !span.contains(&cur) || !span.contains(&next) {
            continue;
        }
        if loc_tokens.contains(&next) && doc.pos(cur) == "ADP" {
            break;
        }
        out.push(cur);
    }
    out
}

/// CARDINAL entity → "how many" material. The matched role span is split
/// at the number: tokens after it become the counted noun ("first
/// part"), tokens before it the qualifier ("last part", minus a trailing
/// bare "the"). Field assignment depends on whether the span is the
/// frame's subject or object.
pub(super) fn cardinal(ann: &Annotated, ent: &Entity) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let cardinal_text = spans::merge_tokens(doc, &ent.tokens);
    let mut out = Vec::new();

    for frame in &ann.frames {
        if frame.verb().is_none() {
            continue;
        }
        let subject = frame.nth_core_arg(0);
        let object = frame.nth_core_arg(1);
        let subject_text = spans::merge_tokens(doc, subject);
        let object_text = spans::merge_tokens(doc, object);
        if subject_text.is_empty() || subject_text == object_text {
            continue;
        }
        let predicate = frame_predicate(doc, frame);
        let pred_text = spans::merge_tokens(doc, &predicate);

        for (role, span) in frame.roles() {
            let span_text = spans::merge_tokens(doc, span);
            if role == Role::V || !span_text.contains(&cardinal_text) {
                continue;
            }
            let mut last_part: Vec<TokenId> = span
                .iter()
                .copied()
                .take_while(|t| !ent.tokens.contains(t))
                .collect();
            let first_part: Vec<TokenId> = span
                .iter()
                .copied()
                .filter(|t| !last_part.contains(t) && !ent.tokens.contains(t))
                .collect();
            if last_part.last().is_some_and(|&t| doc.text(t) == "the") {
                last_part.pop();
            }

            let mods = modifier_extras(doc, frame, &pred_text, &[Role::Loc, Role::Tmp], false);
            let (result_object, result_extra) = if span_text == object_text
                && !subject_text.is_empty()
            {
                // The counted phrase is the object: the subject moves to
                // the extra field and modifiers stand in for the object.
                (mods, subject.to_vec())
            } else if span_text == subject_text && !object_text.is_empty() {
                let mut obj = last_part.clone();
                obj.extend_from_slice(object);
                obj.extend_from_slice(&mods);
                (obj, Vec::new())
            } else {
                (Vec::new(), Vec::new())
            };

            out.push(Deconstruction {
                subject: first_part,
                predicate: predicate.clone(),
                object: result_object,
                extra: result_extra,
                key_answer: ent.tokens.clone(),
                kind: QuestionKind::NerCardinal,
            });
        }
    }
    out
}

/// PERSON entity → "who" material. Guarded twice: the mention must not
/// sit inside a relative clause (self-reference), and the noun phrase
/// containing it must hold no other noun — "John's friend" would make
/// the answer ambiguous.
pub(super) fn person(ann: &Annotated, ent: &Entity) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let person_text = spans::merge_tokens(doc, &ent.tokens);
    let mut out = Vec::new();

    for frame in &ann.frames {
        if frame.verb().is_none() {
            continue;
        }
        let subject = frame.nth_core_arg(0);
        let object = frame.nth_core_arg(1);
        let subject_text = spans::merge_tokens(doc, subject);
        let object_text = spans::merge_tokens(doc, object);
        if subject_text.is_empty() || subject_text == object_text {
            continue;
        }
        let predicate = frame_predicate(doc, frame);
        let pred_text = spans::merge_tokens(doc, &predicate);

        for (role, span) in frame.roles() {
            let span_text = spans::merge_tokens(doc, span);
            if role == Role::V
                || !span_text.contains(&person_text)
                || span_text != subject_text
                || span_text == object_text
            {
                continue;
            }
            let in_relcl = ent
                .tokens
                .iter()
                .any(|&t| spans::is_in_relative_clause(doc, t, &["which"]));
            if in_relcl || has_other_nouns(ann, &ent.tokens) {
                continue;
            }
            out.push(Deconstruction {
                subject: Vec::new(),
                predicate: predicate.clone(),
                object: object.to_vec(),
                extra: modifier_extras(doc, frame, &pred_text, &[Role::Loc, Role::Tmp], false),
                key_answer: ent.tokens.clone(),
                kind: QuestionKind::NerPerson,
            });
        }
    }
    out
}

/// True when the noun phrase around the mention contains a noun or proper
/// noun that is not part of the mention itself. Uses supplied noun-phrase
/// spans when available, otherwise derives the phrase by subtree walk
/// from the mention root.
fn has_other_nouns(ann: &Annotated, mention: &[TokenId]) -> bool {
    let doc = &ann.doc;
    let phrase: Vec<TokenId> = ann
        .noun_phrases
        .iter()
        .find(|np| mention.iter().all(|t| np.contains(t)))
        .cloned()
        .unwrap_or_else(|| {
            let root = mention
                .iter()
                .copied()
                .find(|&t| !mention.contains(&doc.head(t)) || doc.head(t) == t)
                .or_else(|| mention.last().copied());
            match root {
                Some(root) => spans::find_full_attribute(doc, root),
                None => Vec::new(),
            }
        });
    phrase.iter().any(|&t| {
        !mention.contains(&t) && matches!(doc.pos(t), "NOUN" | "PROPN")
    })
}
