//! Overlap clustering of candidate spans
//!
//! Groups spans into clusters by pairwise IoU, transitively: a chain of
//! overlapping spans forms one cluster even when its endpoints do not
//! directly overlap. Implemented as union-find over all ordered pairs,
//! which is O(n²) but n here is spans-per-chapter, not corpus-scale.

use crate::consensus::overlap::overlap_ratio;
use crate::describe::span::CandidateSpan;

/// Cluster spans by transitive IoU overlap.
///
/// Returns clusters of indices into `spans`. Output is deterministic
/// regardless of input order: spans are visited in `(start, end,
/// extractor, kind)` order, clusters are emitted in order of their
/// first member, and members within a cluster follow the same sort.
///
/// Two spans belong to the same cluster when a chain of pairwise
/// overlaps with IoU ≥ `threshold` connects them.
pub fn cluster_indices(spans: &[CandidateSpan], threshold: f64) -> Vec<Vec<usize>> {
    if spans.is_empty() {
        return Vec::new();
    }

    // Deterministic visiting order independent of caller ordering
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        let sa = &spans[a];
        let sb = &spans[b];
        (sa.start, sa.end, &sa.extractor, sa.kind.vote_priority())
            .cmp(&(sb.start, sb.end, &sb.extractor, sb.kind.vote_priority()))
            .then(a.cmp(&b))
    });

    let mut parent: Vec<usize> = (0..spans.len()).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        let mut root = i;
        while parent[root] != root {
            root = parent[root];
        }
        // Path compression
        let mut cur = i;
        while parent[cur] != root {
            let next = parent[cur];
            parent[cur] = root;
            cur = next;
        }
        root
    }

    for (pos, &i) in order.iter().enumerate() {
        for &j in &order[pos + 1..] {
            if overlap_ratio(&spans[i].range(), &spans[j].range()) >= threshold {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut root_to_cluster: Vec<Option<usize>> = vec![None; spans.len()];

    for &i in &order {
        let root = find(&mut parent, i);
        match root_to_cluster[root] {
            Some(c) => clusters[c].push(i),
            None => {
                root_to_cluster[root] = Some(clusters.len());
                clusters.push(vec![i]);
            }
        }
    }

    clusters
}
