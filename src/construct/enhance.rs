//! Coreference-aware enrichment: widen a subject (or a yes/no answer)
//! with clauses from earlier sentences that mention the same cluster.

use crate::annotate::Annotated;
use crate::deconstruct::Deconstruction;
use crate::doc::{Role, TokenId};
use crate::spans;

pub(super) struct Enrichment {
    /// Rendered text of the cluster's antecedent mention.
    pub antecedent: String,
    /// One clause per qualifying earlier-sentence frame, frame order.
    pub clauses: Vec<String>,
}

/// Collect up to `level` supporting clauses for the result's subject (or,
/// when the subject is empty, its answer span). A frame qualifies when one
/// of its non-verb roles contains a token of the same coreference cluster
/// in an *earlier* sentence; the clause is the rest of that frame's roles
/// with relative clauses simplified out.
pub(super) fn enrich(ann: &Annotated, result: &Deconstruction, level: usize) -> Option<Enrichment> {
    let doc = &ann.doc;
    let anchor = result
        .subject
        .first()
        .or_else(|| result.key_answer.first())
        .copied()?;
    let cluster = ann.coref.cluster_of(anchor)?;
    let sent = doc.sent(anchor);
    let antecedent = spans::merge_tokens(doc, &ann.coref.mentions(cluster)[0]);

    let mut clauses = Vec::new();
    for frame in &ann.frames {
        if clauses.len() == level {
            break;
        }
        let mention = frame.roles().find(|(role, span)| {
            *role != Role::V
                && span
                    .iter()
                    .any(|&t| ann.coref.cluster_of(t) == Some(cluster) && doc.sent(t) < sent)
        });
        let Some((_, mention)) = mention else { continue };

        let mut toks: Vec<TokenId> = frame
            .roles()
            .filter(|(_, span)| *span != mention)
            .flat_map(|(_, span)| span.iter().copied())
            .collect();
        toks.sort();
        toks.dedup();
        let toks = spans::simplify_dependencies(doc, &toks);
        let clause = spans::merge_tokens(doc, &toks);
        if !clause.is_empty() {
            clauses.push(clause);
        }
    }
    (!clauses.is_empty()).then_some(Enrichment { antecedent, clauses })
}
