//! Coreference clusters with a precomputed token → cluster back-reference.
//!
//! The index is built once per document; lookups during rule evaluation are
//! O(1) instead of a linear scan over every mention.

use hashbrown::HashMap;

use super::TokenId;

/// Read-only coreference view. The first mention of each cluster is the
/// designated antecedent.
#[derive(Debug, Clone, Default)]
pub struct CorefClusters {
    clusters: Vec<Vec<Vec<TokenId>>>,
    index: HashMap<TokenId, (u32, u32)>,
}

impl CorefClusters {
    pub fn new(clusters: Vec<Vec<Vec<TokenId>>>) -> Self {
        let mut index = HashMap::new();
        for (ci, cluster) in clusters.iter().enumerate() {
            for (mi, mention) in cluster.iter().enumerate() {
                for &tok in mention {
                    // First owner wins if annotations overlap.
                    index.entry(tok).or_insert((ci as u32, mi as u32));
                }
            }
        }
        CorefClusters { clusters, index }
    }

    pub fn cluster_of(&self, tok: TokenId) -> Option<usize> {
        self.index.get(&tok).map(|&(ci, _)| ci as usize)
    }

    /// Mentions of a cluster, antecedent first.
    pub fn mentions(&self, cluster: usize) -> &[Vec<TokenId>] {
        &self.clusters[cluster]
    }

    /// The cluster antecedent and the token's own mention span, or `None`
    /// if the token is not part of any cluster.
    pub fn antecedent_of(&self, tok: TokenId) -> Option<(&[TokenId], &[TokenId])> {
        let &(ci, mi) = self.index.get(&tok)?;
        let cluster = &self.clusters[ci as usize];
        Some((&cluster[0], &cluster[mi as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[u32]) -> Vec<TokenId> {
        v.iter().copied().map(TokenId).collect()
    }

    #[test]
    fn antecedent_is_first_mention() {
        let coref = CorefClusters::new(vec![vec![ids(&[0, 1]), ids(&[7])]]);
        let (ante, own) = coref.antecedent_of(TokenId(7)).unwrap();
        assert_eq!(ante, ids(&[0, 1]).as_slice());
        assert_eq!(own, ids(&[7]).as_slice());
    }

    #[test]
    fn unclustered_token_has_no_entry() {
        let coref = CorefClusters::new(vec![vec![ids(&[0]), ids(&[3])]]);
        assert!(coref.antecedent_of(TokenId(5)).is_none());
        assert_eq!(coref.cluster_of(TokenId(3)), Some(0));
    }
}
