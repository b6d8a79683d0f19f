use serde::{Deserialize, Serialize};

/// One end of an input link
///
/// Either the position of the node in the node sequence, or the node's
/// identity as returned by the [`NodeId`](crate::NodeId) accessor in use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint<K = usize> {
    Index(usize),
    Id(K),
}

/// A weighted directed link as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkInput<K = usize> {
    pub source: Endpoint<K>,
    pub target: Endpoint<K>,
    pub value: f64,
}

impl<K> LinkInput<K> {
    /// Link between two nodes referenced by their position in the node sequence
    pub fn new(source: usize, target: usize, value: f64) -> Self {
        Self {
            source: Endpoint::Index(source),
            target: Endpoint::Index(target),
            value,
        }
    }

    /// Link between two nodes referenced by identity
    pub fn between(source: K, target: K, value: f64) -> Self {
        Self {
            source: Endpoint::Id(source),
            target: Endpoint::Id(target),
            value,
        }
    }
}

/// Input graph: a node sequence and the links between them
///
/// Missing `nodes` or `links` fields deserialize as empty sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "N: Deserialize<'de>, K: Deserialize<'de>"))]
pub struct SankeyGraph<N, K = usize> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<N>,
    #[serde(default = "Vec::new")]
    pub links: Vec<LinkInput<K>>,
}

impl<N, K> Default for SankeyGraph<N, K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl<N, K> SankeyGraph<N, K> {
    pub fn new(nodes: Vec<N>, links: Vec<LinkInput<K>>) -> Self {
        Self { nodes, links }
    }
}

/// Minimal node payload carrying a display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SankeyGraph<NodeInfo> {
    /// Five nodes fanning out from `A` and merging back into `E`
    pub fn sample() -> Self {
        let nodes = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|name| NodeInfo::new(format!("Node {name}")))
            .collect();
        let links = vec![
            LinkInput::new(0, 1, 50.0),
            LinkInput::new(0, 2, 30.0),
            LinkInput::new(0, 3, 20.0),
            LinkInput::new(1, 4, 40.0),
            LinkInput::new(2, 4, 20.0),
            LinkInput::new(3, 4, 20.0),
        ];
        Self::new(nodes, links)
    }
}
