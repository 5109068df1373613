//! Global semantic-role rules: the yes/no "direct" question plus one rule
//! per adjunct modifier (cause, purpose, manner, time, place).
//!
//! Unlike the dependency and entity rules these need no trigger token:
//! every frame with a verb and a distinct subject/object pair qualifies.

use crate::annotate::Annotated;
use crate::doc::Role;
use crate::spans;

use super::{frame_is_passive, frame_predicate, modifier_extras, Deconstruction, QuestionKind};

pub(super) fn global(ann: &Annotated) -> Vec<Deconstruction> {
    let doc = &ann.doc;
    let mut out = Vec::new();

    for frame in &ann.frames {
        if frame.verb().is_none() {
            continue;
        }
        let subject = frame.nth_core_arg(0);
        let object = frame.nth_core_arg(1);
        let subject_text = spans::merge_tokens(doc, subject);
        let object_text = spans::merge_tokens(doc, object);
        if subject_text.is_empty() || object_text.is_empty() || subject_text == object_text {
            continue;
        }
        let predicate = frame_predicate(doc, frame);
        let pred_text = spans::merge_tokens(doc, &predicate);

        // Yes/no question over the whole clause. Passive voice restores the
        // logical order by swapping the two arguments.
        let (direct_subject, direct_object) = if frame_is_passive(doc, frame) {
            (object, subject)
        } else {
            (subject, object)
        };
        out.push(Deconstruction {
            subject: direct_subject.to_vec(),
            predicate: predicate.clone(),
            object: direct_object.to_vec(),
            extra: modifier_extras(doc, frame, &pred_text, &[Role::Loc, Role::Tmp], false),
            key_answer: Vec::new(),
            kind: QuestionKind::Direct,
        });

        // Each adjunct modifier present on the frame becomes the answer of
        // its own wh-question. Purpose prefers PNC over PRP when both occur.
        let purpose = frame.get(Role::Pnc).or_else(|| frame.get(Role::Prp));
        let modifier_rules: [(Option<&[_]>, QuestionKind, &[Role]); 5] = [
            (frame.get(Role::Cau), QuestionKind::SrlCausal, &[Role::Loc, Role::Tmp]),
            (purpose, QuestionKind::SrlPurpose, &[Role::Loc, Role::Tmp]),
            (frame.get(Role::Mnr), QuestionKind::SrlManner, &[Role::Loc, Role::Tmp]),
            (frame.get(Role::Tmp), QuestionKind::SrlTemporal, &[Role::Loc]),
            (frame.get(Role::Loc), QuestionKind::SrlLocative, &[Role::Tmp]),
        ];
        for (span, kind, extra_roles) in modifier_rules {
            let Some(span) = span else { continue };
            if span.is_empty() {
                continue;
            }
            out.push(Deconstruction {
                subject: subject.to_vec(),
                predicate: predicate.clone(),
                object: object.to_vec(),
                extra: modifier_extras(doc, frame, &pred_text, extra_roles, false),
                key_answer: span.to_vec(),
                kind,
            });
        }
    }
    out
}
