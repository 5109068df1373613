//! Question templates: one fixed interpolation order per question type.
//!
//! The table below is the literal domain knowledge of the system. Field
//! order within each template is deliberate and must not be "cleaned up";
//! extra whitespace is collapsed by the caller's formatting pass.

use crate::annotate::Annotated;
use crate::deconstruct::QuestionKind;
use crate::doc::EntityLabel;

/// Everything a template may interpolate, already rendered to text.
#[derive(Clone, Copy)]
pub(super) struct TemplateParts<'a> {
    pub aux: &'a str,
    pub negative: &'a str,
    pub subject: &'a str,
    /// Predicate remainder after verb-phrase analysis.
    pub remainder: &'a str,
    /// Original predicate text, untouched by the analysis.
    pub predicate: &'a str,
    pub object: &'a str,
    pub extra: &'a str,
    pub answer: &'a str,
}

/// Subject pronoun → object pronoun. Non-pronoun subjects pass through.
fn object_pronoun(subject: &str) -> &str {
    match subject.to_lowercase().as_str() {
        "i" => "me",
        "you" => "you",
        "he" => "him",
        "she" => "her",
        "it" => "it",
        "we" => "us",
        "they" => "them",
        _ => subject,
    }
}

/// True when `text` is a PERSON entity's exact surface text.
fn is_person(ann: &Annotated, text: &str) -> bool {
    !text.is_empty()
        && ann
            .entities
            .iter()
            .any(|e| e.label == EntityLabel::Person && e.text == text)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render the raw question string for one result.
pub(super) fn render(kind: QuestionKind, ann: &Annotated, p: &TemplateParts) -> String {
    let TemplateParts {
        aux,
        negative: neg,
        subject,
        remainder,
        predicate,
        object,
        extra,
        answer,
    } = *p;
    match kind {
        QuestionKind::Dative => {
            let wh = if is_person(ann, answer) { "Whom" } else { "What" };
            format!("{wh} {aux} {subject} {neg} {remainder} {object} {extra}")
        }
        QuestionKind::Dobj | QuestionKind::Pcomp => {
            let wh = if is_person(ann, object) { "Who" } else { "What" };
            format!("{wh} {aux} {neg} {subject} {remainder} {extra}")
        }
        QuestionKind::Attr => format!("How would you describe {object}"),
        QuestionKind::Acomp => {
            format!("Indicate characteristics of {}", object_pronoun(subject))
        }
        QuestionKind::Nsubj => {
            let wh = if is_person(ann, answer) { "Who" } else { "What" };
            format!("{wh} {predicate} {object} {extra}")
        }
        QuestionKind::Direct => {
            let object = object.strip_suffix('.').unwrap_or(object);
            format!("{} {subject} {remainder} {object} {extra}", capitalize(aux))
        }
        QuestionKind::SrlCausal => {
            format!("Why {aux} {neg} {subject} {remainder} {object} {extra}")
        }
        QuestionKind::SrlPurpose => {
            format!("For what purpose {aux} {neg} {subject} {remainder} {object} {extra}")
        }
        QuestionKind::SrlManner => {
            format!("How {aux} {neg} {subject} {remainder} {object} {extra}")
        }
        QuestionKind::SrlTemporal | QuestionKind::NerDate => {
            format!("When {aux} {neg} {subject} {remainder} {object} {extra}")
        }
        QuestionKind::SrlLocative | QuestionKind::NerLoc => {
            format!("Where {aux} {neg} {subject} {remainder} {object} {extra}")
        }
        QuestionKind::NerCardinal => {
            format!("How many {subject} {aux} {neg} {extra} {remainder} {object}")
        }
        QuestionKind::NerPerson => {
            let object = object.strip_suffix('.').unwrap_or(object);
            format!("Who {aux} {neg} {remainder} {object} {extra}")
        }
    }
}
