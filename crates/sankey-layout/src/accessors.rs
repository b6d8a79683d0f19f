use crate::{LinkInput, SankeyGraph};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for extracting the node and link sequences from a graph
pub trait GraphSource {
    /// Node payload type
    type Node;

    /// Identity type used by [`Endpoint::Id`](crate::Endpoint::Id) references
    type Key;

    /// Get the node sequence
    fn nodes(&self) -> &[Self::Node];

    /// Get the link sequence
    fn links(&self) -> &[LinkInput<Self::Key>];
}

impl<N, K> GraphSource for SankeyGraph<N, K> {
    type Node = N;
    type Key = K;

    fn nodes(&self) -> &[N] {
        &self.nodes
    }

    fn links(&self) -> &[LinkInput<K>] {
        &self.links
    }
}

/// Trait for deriving the identity of a node during layout computation
///
/// Identities are only used to resolve links that reference their endpoints
/// by [`Endpoint::Id`](crate::Endpoint::Id).
pub trait NodeId<N> {
    /// The identity type, must be unique among the nodes of one graph
    type Id: Eq + Hash + Debug;

    /// Get the identity of the node at `index`
    fn id(&self, index: usize, node: &N) -> Self::Id;
}

/// Default identity: the position of the node in the node sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct ByIndex;

impl<N> NodeId<N> for ByIndex {
    type Id = usize;

    fn id(&self, index: usize, _node: &N) -> usize {
        index
    }
}

// Blanket implementation for closures
impl<N, K, F> NodeId<N> for F
where
    F: Fn(usize, &N) -> K,
    K: Eq + Hash + Debug,
{
    type Id = K;

    fn id(&self, index: usize, node: &N) -> K {
        self(index, node)
    }
}
