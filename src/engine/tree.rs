use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::{Debug, Write as _};
use std::hash::Hash;

use tracing::debug;

use crate::engine::error::CodingError;
use crate::engine::frequency::FrequencyTable;

/// Index of a node inside a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode<S> {
    Leaf {
        symbol: S,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: NodeId,
        right: NodeId,
    },
}

impl<S> HuffmanNode<S> {
    pub fn weight(&self) -> usize {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }
}

/// Heap entry ordered by weight, then by creation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    weight: usize,
    id: NodeId,
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: lightest first, oldest first on ties
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Optimal prefix code tree stored as an arena.
///
/// Leaves occupy ids `0..leaf_count` in the frequency table's order; internal
/// nodes follow in merge order, so the root is always the last node. The tree
/// never changes after [`HuffmanTree::build`] and can be shared read-only
/// between any number of concurrent decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S> {
    nodes: Vec<HuffmanNode<S>>,
    root: NodeId,
}

impl<S> HuffmanTree<S>
where
    S: Eq + Hash + Clone + Debug,
{
    pub fn build(frequencies: &FrequencyTable<S>) -> Result<Self, CodingError> {
        if frequencies.is_empty() {
            return Err(CodingError::EmptyInput);
        }

        let leaf_count = frequencies.len();
        let mut nodes = Vec::with_capacity(2 * leaf_count - 1);
        let mut heap = BinaryHeap::with_capacity(leaf_count);

        for (symbol, weight) in frequencies.iter() {
            let id = NodeId(nodes.len());
            nodes.push(HuffmanNode::Leaf {
                symbol: symbol.clone(),
                weight,
            });
            heap.push(Pending { weight, id });
        }

        loop {
            let first = match heap.pop() {
                Some(p) => p,
                None => return Err(CodingError::EmptyInput),
            };
            let second = match heap.pop() {
                Some(p) => p,
                None => {
                    let tree = Self { nodes, root: first.id };
                    debug!(
                        leaves = leaf_count,
                        nodes = tree.len(),
                        depth = tree.depth(),
                        "huffman tree built"
                    );
                    return Ok(tree);
                }
            };

            let weight = first
                .weight
                .checked_add(second.weight)
                .ok_or(CodingError::WeightOverflow)?;
            let id = NodeId(nodes.len());
            nodes.push(HuffmanNode::Internal {
                weight,
                left: first.id,
                right: second.id,
            });
            heap.push(Pending { weight, id });
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffmanNode<S> {
        &self.nodes[id.0]
    }

    pub fn root_node(&self) -> &HuffmanNode<S> {
        self.node(self.root)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Root weight, equal to the length of the counted input.
    pub fn weight(&self) -> usize {
        self.root_node().weight()
    }

    /// A lone leaf at the root: the alphabet had one distinct symbol.
    pub fn is_single_leaf(&self) -> bool {
        self.root_node().is_leaf()
    }

    /// Length of the longest root-to-leaf path, counting the one-bit code a
    /// single-leaf tree assigns.
    pub fn depth(&self) -> usize {
        if self.is_single_leaf() {
            return 1;
        }
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                HuffmanNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
            }
        }
        deepest
    }

    /// Indented, human-readable dump of the tree structure.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.node(id) {
                HuffmanNode::Leaf { symbol, weight } => {
                    let _ = writeln!(
                        out,
                        "{}{} -> Leaf {:?} [weight: {}]",
                        indent, label, symbol, weight
                    );
                }
                HuffmanNode::Internal { weight, left, right } => {
                    let _ = writeln!(
                        out,
                        "{}{} -> Internal [weight: {}]",
                        indent, label, weight
                    );
                    stack.push((*right, depth + 1, "1"));
                    stack.push((*left, depth + 1, "0"));
                }
            }
        }
        out
    }
}
