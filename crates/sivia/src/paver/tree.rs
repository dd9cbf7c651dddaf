//! Paving tree: an arena of nodes addressed by [`NodeId`].

use crate::interval::IntervalVector;

/// Classification of a leaf box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PavingLabel {
    /// Certainly inside the set.
    In,
    /// Certainly outside the set.
    Out,
    /// Undetermined at the requested resolution.
    Boundary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Debug)]
pub enum NodeKind {
    Leaf(PavingLabel),
    /// Bisection along `dim`; the two children partition the parent box.
    Split { dim: usize, children: [NodeId; 2] },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub bx: IntervalVector,
    pub depth: usize,
    pub kind: NodeKind,
}

impl Node {
    pub fn label(&self) -> Option<PavingLabel> {
        match self.kind {
            NodeKind::Leaf(l) => Some(l),
            NodeKind::Split { .. } => None,
        }
    }
}

/// Binary partition of a box into labelled leaves.
#[derive(Clone, Debug)]
pub struct Paving {
    pub(super) nodes: Vec<Node>,
    pub(super) root: NodeId,
}

impl Paving {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The paved box.
    pub fn bbox(&self) -> &IntervalVector {
        &self.node(self.root).bx
    }

    pub fn dim(&self) -> usize {
        self.bbox().size()
    }

    /// Total node count (leaves and splits).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaves with their labels, in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = (&IntervalVector, PavingLabel)> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| n.label().map(|l| (&n.bx, l)))
    }

    /// Leaf boxes carrying `label`.
    pub fn boxes(&self, label: PavingLabel) -> impl Iterator<Item = &IntervalVector> + '_ {
        self.leaves()
            .filter(move |(_, l)| *l == label)
            .map(|(b, _)| b)
    }

    pub fn count(&self, label: PavingLabel) -> usize {
        self.boxes(label).count()
    }

    /// Summed volume of the leaves carrying `label`.
    pub fn volume(&self, label: PavingLabel) -> f64 {
        self.boxes(label).map(IntervalVector::volume).sum()
    }

    /// Depth of the deepest leaf (the root has depth 0).
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Label of the leaf containing `p`, or `None` outside the paved box.
    ///
    /// Points on a shared face go to the first child.
    pub fn label_at(&self, p: &[f64]) -> Option<PavingLabel> {
        let mut id = self.root;
        if !self.node(id).bx.contains(p) {
            return None;
        }
        loop {
            let n = self.node(id);
            match n.kind {
                NodeKind::Leaf(l) => return Some(l),
                NodeKind::Split { children, .. } => {
                    id = if self.node(children[0]).bx.contains(p) {
                        children[0]
                    } else {
                        children[1]
                    };
                }
            }
        }
    }
}
