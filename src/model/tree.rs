//! Decision-tree representation and CART growth.
//!
//! Trees are stored as flat parallel arrays (SoA) indexed by [`NodeId`]:
//! compact, cache-friendly, and cheap to traverse. Growth is classic CART
//! with Gini impurity on exact thresholds (midpoints between distinct
//! adjacent values), bounded by depth and leaf-size limits.

use ndarray::{ArrayView1, ArrayView2};
use rand::seq::index::sample as sample_indices;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Node index within a [`Tree`].
pub type NodeId = u32;

/// An immutable binary decision tree with hard class votes at the leaves.
#[derive(Debug, Clone)]
pub struct Tree {
    /// Split feature per node. Unused at leaves.
    feature: Vec<u32>,
    /// Split threshold per node; `value <= threshold` goes left.
    threshold: Vec<f32>,
    left: Vec<NodeId>,
    right: Vec<NodeId>,
    /// Leaf vote (0.0 or 1.0). Unused at split nodes.
    vote: Vec<f32>,
    is_leaf: Vec<bool>,
}

impl Tree {
    fn new() -> Self {
        Self {
            feature: Vec::new(),
            threshold: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
            vote: Vec::new(),
            is_leaf: Vec::new(),
        }
    }

    fn push_leaf(&mut self, vote: f32) -> NodeId {
        let id = self.feature.len() as NodeId;
        self.feature.push(0);
        self.threshold.push(0.0);
        self.left.push(0);
        self.right.push(0);
        self.vote.push(vote);
        self.is_leaf.push(true);
        id
    }

    fn push_split(&mut self, feature: u32, threshold: f32) -> NodeId {
        let id = self.feature.len() as NodeId;
        self.feature.push(feature);
        self.threshold.push(threshold);
        // Children patched once grown.
        self.left.push(0);
        self.right.push(0);
        self.vote.push(0.0);
        self.is_leaf.push(false);
        id
    }

    fn set_children(&mut self, node: NodeId, left: NodeId, right: NodeId) {
        self.left[node as usize] = left;
        self.right[node as usize] = right;
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.feature.len()
    }

    /// Number of leaf nodes.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&l| l).count()
    }

    /// Traverse from the root and return this tree's hard vote (0.0 or 1.0)
    /// for one sample, given in training feature order.
    #[inline]
    pub fn vote_for(&self, sample: ArrayView1<'_, f32>) -> f32 {
        let mut node = 0usize;
        while !self.is_leaf[node] {
            let value = sample[self.feature[node] as usize];
            node = if value <= self.threshold[node] {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
        self.vote[node]
    }
}

/// Parameters and data views for growing one tree.
pub(crate) struct TreeGrower<'a> {
    /// Full feature matrix, `[n_features, n_samples]`.
    pub features: ArrayView2<'a, f32>,
    /// Binary labels, length = n_samples.
    pub labels: ArrayView1<'a, f32>,
    /// Depth limit; `u32::MAX` when unbounded.
    pub max_depth: u32,
    pub min_samples_leaf: usize,
    /// Features considered per split before the exhaustive fallback.
    pub n_split_features: usize,
}

struct Split {
    feature: u32,
    threshold: f32,
    /// Weighted child Gini, `n_l * gini_l + n_r * gini_r`.
    score: f64,
}

impl<'a> TreeGrower<'a> {
    /// Grow a tree over the given (bootstrap) sample indices.
    pub fn grow(&self, indices: &mut [u32], rng: &mut Xoshiro256PlusPlus) -> Tree {
        let mut tree = Tree::new();
        self.grow_node(&mut tree, indices, 0, rng);
        tree
    }

    fn grow_node(
        &self,
        tree: &mut Tree,
        indices: &mut [u32],
        depth: u32,
        rng: &mut Xoshiro256PlusPlus,
    ) -> NodeId {
        let n = indices.len();
        let n_pos = indices
            .iter()
            .filter(|&&i| self.labels[i as usize] == 1.0)
            .count();

        let pure = n_pos == 0 || n_pos == n;
        if pure || depth >= self.max_depth || n < 2 * self.min_samples_leaf.max(1) {
            return tree.push_leaf(majority_vote(n_pos, n));
        }

        // Random feature subset first; exhaustive fallback if it yields no
        // valid split (all sampled features constant over this node).
        let n_features = self.features.nrows();
        let subset = sample_indices(rng, n_features, self.n_split_features.min(n_features));
        let best = self
            .best_split(indices, subset.iter())
            .or_else(|| self.best_split(indices, 0..n_features));

        let Some(split) = best else {
            return tree.push_leaf(majority_vote(n_pos, n));
        };

        let mid = partition(indices, |i| {
            self.features[[split.feature as usize, i as usize]] <= split.threshold
        });
        // A split that leaves one side empty cannot make progress; terminate
        // the node instead of recursing on itself.
        if mid == 0 || mid == n {
            return tree.push_leaf(majority_vote(n_pos, n));
        }

        let node = tree.push_split(split.feature, split.threshold);
        let (left_idx, right_idx) = indices.split_at_mut(mid);
        let left = self.grow_node(tree, left_idx, depth + 1, rng);
        let right = self.grow_node(tree, right_idx, depth + 1, rng);
        tree.set_children(node, left, right);
        node
    }

    /// Best Gini split over the given candidate features, or `None` when no
    /// feature admits a threshold separating the node.
    fn best_split(
        &self,
        indices: &[u32],
        candidates: impl IntoIterator<Item = usize>,
    ) -> Option<Split> {
        let n = indices.len();
        let mut best: Option<Split> = None;
        let mut pairs: Vec<(f32, bool)> = Vec::with_capacity(n);

        for f in candidates {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| {
                (
                    self.features[[f, i as usize]],
                    self.labels[i as usize] == 1.0,
                )
            }));
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let total_pos = pairs.iter().filter(|&&(_, p)| p).count();
            let mut left_pos = 0usize;
            for i in 1..n {
                if pairs[i - 1].1 {
                    left_pos += 1;
                }
                // Thresholds only between distinct values.
                if pairs[i].0 <= pairs[i - 1].0 {
                    continue;
                }
                let (n_l, n_r) = (i, n - i);
                if n_l < self.min_samples_leaf || n_r < self.min_samples_leaf {
                    continue;
                }
                let score = weighted_gini(left_pos, n_l) + weighted_gini(total_pos - left_pos, n_r);
                if best.as_ref().map_or(true, |b| score < b.score) {
                    // Midpoint in f64; when the two values are adjacent f32
                    // representations the cast can round back up onto the
                    // right-hand value, which would empty the right child.
                    // Clamp onto the left value so `<= threshold` still
                    // separates the pair.
                    let mut threshold =
                        ((pairs[i - 1].0 as f64 + pairs[i].0 as f64) / 2.0) as f32;
                    if threshold >= pairs[i].0 {
                        threshold = pairs[i - 1].0;
                    }
                    best = Some(Split {
                        feature: f as u32,
                        threshold,
                        score,
                    });
                }
            }
        }
        best
    }
}

/// Majority class of a node; ties vote negative.
#[inline]
fn majority_vote(n_pos: usize, n: usize) -> f32 {
    if n_pos * 2 > n {
        1.0
    } else {
        0.0
    }
}

/// `n * gini` for a child with `n_pos` positives out of `n`.
#[inline]
fn weighted_gini(n_pos: usize, n: usize) -> f64 {
    let n_f = n as f64;
    let p = n_pos as f64 / n_f;
    let q = 1.0 - p;
    n_f * (1.0 - p * p - q * q)
}

/// In-place stable-enough partition; returns the boundary index. Elements
/// satisfying the predicate end up in `[0, mid)`.
fn partition<F: Fn(u32) -> bool>(indices: &mut [u32], pred: F) -> usize {
    let mut mid = 0;
    for i in 0..indices.len() {
        if pred(indices[i]) {
            indices.swap(mid, i);
            mid += 1;
        }
    }
    mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn grower<'a>(
        features: &'a ndarray::Array2<f32>,
        labels: &'a ndarray::Array1<f32>,
    ) -> TreeGrower<'a> {
        TreeGrower {
            features: features.view(),
            labels: labels.view(),
            max_depth: u32::MAX,
            min_samples_leaf: 1,
            n_split_features: features.nrows(),
        }
    }

    #[test]
    fn pure_node_becomes_a_single_leaf() {
        let features = array![[1.0, 2.0, 3.0]];
        let labels = array![1.0, 1.0, 1.0];
        let g = grower(&features, &labels);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let tree = g.grow(&mut [0, 1, 2], &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.vote_for(array![5.0].view()), 1.0);
    }

    #[test]
    fn separable_data_splits_on_the_informative_feature() {
        // Feature 0 separates perfectly; feature 1 is constant.
        let features = array![
            [1.0, 2.0, 3.0, 10.0, 11.0, 12.0],
            [5.0, 5.0, 5.0, 5.0, 5.0, 5.0]
        ];
        let labels = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let g = grower(&features, &labels);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut idx: Vec<u32> = (0..6).collect();
        let tree = g.grow(&mut idx, &mut rng);

        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.vote_for(array![0.0, 5.0].view()), 0.0);
        assert_eq!(tree.vote_for(array![100.0, 5.0].view()), 1.0);
    }

    #[test]
    fn constant_features_fall_back_to_majority_leaf() {
        let features = array![[4.0, 4.0, 4.0, 4.0]];
        let labels = array![0.0, 0.0, 0.0, 1.0];
        let g = grower(&features, &labels);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let tree = g.grow(&mut [0, 1, 2, 3], &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.vote_for(array![4.0].view()), 0.0);
    }

    #[test]
    fn depth_limit_is_respected() {
        let features = array![[1.0, 2.0, 3.0, 4.0]];
        let labels = array![0.0, 1.0, 0.0, 1.0];
        let g = TreeGrower {
            max_depth: 1,
            ..grower(&features, &labels)
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let tree = g.grow(&mut [0, 1, 2, 3], &mut rng);
        // One split, two leaves at most.
        assert!(tree.n_nodes() <= 3);
    }

    #[test]
    fn tie_votes_negative() {
        assert_eq!(majority_vote(2, 4), 0.0);
        assert_eq!(majority_vote(3, 4), 1.0);
    }

    #[test]
    fn adjacent_float_values_split_and_terminate() {
        // 1.0 + 1ulp vs 1.0 + 2ulp: no f32 lies strictly between them, so
        // the rounded midpoint lands on one of the two values. Growth must
        // still terminate and keep the pair separated.
        let lo = f32::from_bits(0x3F80_0001);
        let hi = f32::from_bits(0x3F80_0002);
        let features = array![[lo, hi]];
        let labels = array![0.0, 1.0];
        let g = grower(&features, &labels);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let tree = g.grow(&mut [0, 1], &mut rng);

        assert_eq!(tree.vote_for(array![lo].view()), 0.0);
        assert_eq!(tree.vote_for(array![hi].view()), 1.0);
    }

    #[test]
    fn bootstrap_duplicates_are_handled() {
        let features = array![[1.0, 10.0]];
        let labels = array![0.0, 1.0];
        let g = grower(&features, &labels);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        // Index 1 drawn three times, index 0 once.
        let tree = g.grow(&mut [1, 1, 0, 1], &mut rng);
        assert_eq!(tree.vote_for(array![1.0].view()), 0.0);
        assert_eq!(tree.vote_for(array![10.0].view()), 1.0);
    }
}
