//! Semantic-role frames: one frame per predicate, mapping role keys to
//! token spans. Role order is preserved from the annotation source because
//! several rules scan roles in that order.

use super::TokenId;

/// Closed role set accepted from the SRL collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The predicate itself. At most one per frame.
    V,
    /// Core argument ARG0..ARG5.
    Arg(u8),
    /// ARGM-LOC — locative modifier.
    Loc,
    /// ARGM-TMP — temporal modifier.
    Tmp,
    /// ARGM-MNR — manner modifier.
    Mnr,
    /// ARGM-CAU — causal modifier.
    Cau,
    /// ARGM-PNC — purpose (PropBank "purpose not cause").
    Pnc,
    /// ARGM-PRP — purpose (newer PropBank label).
    Prp,
}

impl Role {
    /// Parse a raw role key. Unknown keys return `None` and are dropped by
    /// the adapter.
    pub fn parse(key: &str) -> Option<Role> {
        match key {
            "V" => Some(Role::V),
            "ARGM-LOC" => Some(Role::Loc),
            "ARGM-TMP" => Some(Role::Tmp),
            "ARGM-MNR" => Some(Role::Mnr),
            "ARGM-CAU" => Some(Role::Cau),
            "ARGM-PNC" => Some(Role::Pnc),
            "ARGM-PRP" => Some(Role::Prp),
            _ => {
                let n = key.strip_prefix("ARG")?;
                let n: u8 = n.parse().ok()?;
                (n <= 5).then_some(Role::Arg(n))
            }
        }
    }
}

/// One predicate's role → span mapping, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SrlFrame {
    roles: Vec<(Role, Vec<TokenId>)>,
}

impl SrlFrame {
    /// Build a frame, keeping insertion order. A second `V` entry is
    /// ignored to uphold the at-most-one-predicate invariant.
    pub fn new(roles: Vec<(Role, Vec<TokenId>)>) -> Self {
        let mut out: Vec<(Role, Vec<TokenId>)> = Vec::with_capacity(roles.len());
        for (role, span) in roles {
            if role == Role::V && out.iter().any(|(r, _)| *r == Role::V) {
                continue;
            }
            out.push((role, span));
        }
        SrlFrame { roles: out }
    }

    pub fn get(&self, role: Role) -> Option<&[TokenId]> {
        self.roles
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, span)| span.as_slice())
    }

    pub fn has(&self, role: Role) -> bool {
        self.get(role).is_some()
    }

    pub fn verb(&self) -> Option<&[TokenId]> {
        self.get(Role::V)
    }

    /// All roles in annotation order.
    pub fn roles(&self) -> impl Iterator<Item = (Role, &[TokenId])> {
        self.roles.iter().map(|(r, span)| (*r, span.as_slice()))
    }

    /// The `occur`-th core argument present on this frame, following the
    /// agent/patient/beneficiary ordering heuristic: occurrence 0 and 1
    /// scan ARG0..ARG4, occurrence 2 scans ARG0..ARG5. Out-of-range
    /// occurrences and missing arguments yield an empty span.
    pub fn nth_core_arg(&self, occur: usize) -> &[TokenId] {
        if occur > 2 {
            return &[];
        }
        let max = if occur < 2 { 5 } else { 6 };
        let mut remaining = occur;
        for i in 0..max {
            if let Some(span) = self.get(Role::Arg(i as u8)) {
                if remaining == 0 {
                    return span;
                }
                remaining -= 1;
            }
        }
        &[]
    }
}
