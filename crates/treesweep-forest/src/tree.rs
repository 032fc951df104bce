use std::collections::VecDeque;

use rand::Rng;

use crate::node::{Node, NodeId};
use crate::split::{best_split, class_counts};

/// Growth limits shared by every tree of a forest.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GrowthLimits {
    pub(crate) variables_per_split: usize,
    pub(crate) min_leaf_population: usize,
    pub(crate) max_nodes: Option<usize>,
}

/// A fitted CART classification tree over dense class indices.
#[derive(Debug, Clone)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
}

struct Pending {
    node: NodeId,
    indices: Vec<usize>,
}

impl DecisionTree {
    /// Grow a tree breadth-first over the samples in `indices`.
    ///
    /// Growing level by level means a `max_nodes` budget cuts the deepest
    /// splits first, which is how the hosted classifier bounds its trees.
    pub(crate) fn grow(
        columns: &[Vec<f64>],
        labels: &[usize],
        indices: Vec<usize>,
        n_classes: usize,
        limits: GrowthLimits,
        rng: &mut impl Rng,
    ) -> Self {
        let mut nodes = vec![Node::pending()];
        let mut queue = VecDeque::from([Pending {
            node: NodeId::ROOT,
            indices,
        }]);
        let mut n_leaves = 1usize;

        while let Some(Pending { node, indices }) = queue.pop_front() {
            let counts = class_counts(labels, &indices, n_classes);
            let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
            let budget_left = limits.max_nodes.is_none_or(|max| n_leaves < max);

            let split = if !pure && budget_left && indices.len() >= 2 * limits.min_leaf_population {
                best_split(
                    columns,
                    labels,
                    &indices,
                    n_classes,
                    limits.variables_per_split,
                    limits.min_leaf_population,
                    rng,
                )
            } else {
                None
            };

            match split {
                Some(split) => {
                    let left = NodeId::new(nodes.len());
                    nodes.push(Node::pending());
                    let right = NodeId::new(nodes.len());
                    nodes.push(Node::pending());
                    nodes[node.index()] = Node::Split {
                        variable: split.variable,
                        threshold: split.threshold,
                        left,
                        right,
                    };
                    n_leaves += 1;
                    queue.push_back(Pending { node: left, indices: split.left });
                    queue.push_back(Pending { node: right, indices: split.right });
                }
                None => {
                    nodes[node.index()] = Node::Leaf {
                        class: majority(&counts),
                    };
                }
            }
        }

        Self { nodes }
    }

    /// Dense class index of the leaf reached by `sample`.
    pub(crate) fn vote(&self, sample: &[f64]) -> usize {
        let mut id = NodeId::ROOT;
        loop {
            match &self.nodes[id.index()] {
                Node::Split {
                    variable,
                    threshold,
                    left,
                    right,
                } => {
                    id = if sample[*variable] <= *threshold { *left } else { *right };
                }
                Node::Leaf { class } => return *class,
            }
        }
    }

    pub(crate) fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    #[cfg(test)]
    pub(crate) fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Index of the largest count; ties go to the smallest index.
pub(crate) fn majority(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn limits(max_nodes: Option<usize>) -> GrowthLimits {
        GrowthLimits {
            variables_per_split: 2,
            min_leaf_population: 1,
            max_nodes,
        }
    }

    fn quadrants() -> (Vec<Vec<f64>>, Vec<usize>) {
        // Class = quadrant of (x, y) around (5, 5).
        let points = [
            (1.0, 1.0, 0),
            (2.0, 2.0, 0),
            (8.0, 1.0, 1),
            (9.0, 2.0, 1),
            (1.0, 8.0, 2),
            (2.0, 9.0, 2),
            (8.0, 8.0, 3),
            (9.0, 9.0, 3),
        ];
        let columns = vec![
            points.iter().map(|p| p.0).collect(),
            points.iter().map(|p| p.1).collect(),
        ];
        let labels = points.iter().map(|p| p.2).collect();
        (columns, labels)
    }

    #[test]
    fn fits_training_data_exactly() {
        let (columns, labels) = quadrants();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tree = DecisionTree::grow(&columns, &labels, (0..8).collect(), 4, limits(None), &mut rng);

        for i in 0..8 {
            let sample = [columns[0][i], columns[1][i]];
            assert_eq!(tree.vote(&sample), labels[i], "sample {i}");
        }
        assert_eq!(tree.n_leaves(), 4);
        assert_eq!(tree.n_nodes(), 7);
    }

    #[test]
    fn max_nodes_caps_leaf_count() {
        let (columns, labels) = quadrants();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tree = DecisionTree::grow(&columns, &labels, (0..8).collect(), 4, limits(Some(2)), &mut rng);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn pure_root_is_single_leaf() {
        let columns = vec![vec![1.0, 2.0, 3.0]];
        let labels = vec![1, 1, 1];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tree = DecisionTree::grow(&columns, &labels, vec![0, 1, 2], 2, limits(None), &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.vote(&[100.0]), 1);
    }

    #[test]
    fn majority_prefers_lowest_index_on_tie() {
        assert_eq!(majority(&[2, 3, 3]), 1);
        assert_eq!(majority(&[0, 0]), 0);
    }
}
