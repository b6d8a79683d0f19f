mod breadths;
mod levels;
mod resolve;

use crate::accessors::{ByIndex, GraphSource, NodeId};
use crate::align::NodeAlign;
use crate::{LayoutEngine, Point, Rect, Vec2};
use petgraph::Direction;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use breadths::{assign_link_breadths, assign_node_breadths};
use levels::{assign_levels, check_acyclic};
use resolve::{accumulate, resolve_links};

/// Errors that can occur during sankey layout computation
///
/// All of them are detected before any coordinate is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SankeyError {
    /// A link weight is NaN or infinite
    #[error("link {link} has a non-finite value {value}")]
    NonFiniteValue { link: usize, value: f64 },

    /// A link weight is below zero
    #[error("link {link} has a negative value {value}")]
    NegativeValue { link: usize, value: f64 },

    /// A link endpoint index is past the end of the node sequence
    #[error("link {link} references node {index} but the graph has {len} nodes")]
    IndexOutOfRange { link: usize, index: usize, len: usize },

    /// A link endpoint identity matches no node
    #[error("link {link} references unknown node {id}")]
    UnknownNode { link: usize, id: String },

    /// Two nodes share the same identity
    #[error("node {node} has id {id} which is already used by node {first}")]
    DuplicateId { node: usize, first: usize, id: String },

    /// A link starts and ends on the same node
    #[error("link {link} loops on node {node}")]
    SelfLoop { link: usize, node: usize },

    /// The graph contains a cycle at the given node
    #[error("graph contains a cycle at node {0}")]
    GraphHasCycle(usize),
}

/// Shared ordering function used to sort nodes within a column or links
/// around a node
pub struct Comparator<T>(Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>);

impl<T> Comparator<T> {
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self(Arc::new(compare))
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

/// Configuration for the sankey (flow diagram) layout
#[derive(Debug, Clone)]
pub struct SankeyLayout {
    /// Thickness of node boxes along the flow axis
    pub node_width: f64,

    /// Vertical gap between stacked nodes of one column
    pub node_padding: f64,

    /// Output rectangle the columns are spread across
    pub extent: Rect,

    /// Column assignment policy
    ///
    /// When `None` nodes are bucketed by their raw depth. Otherwise the
    /// alignment function output is floored and clamped to a valid column.
    pub align: Option<NodeAlign>,

    /// Ordering of nodes within a column, input order when unset
    pub node_sort: Option<Comparator<PositionedNode>>,

    /// Ordering of the incident links of each node, input order when unset
    pub link_sort: Option<Comparator<PositionedLink>>,
}

impl Default for SankeyLayout {
    fn default() -> Self {
        Self {
            node_width: 24.0,
            node_padding: 8.0,
            extent: Rect::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            align: None,
            node_sort: None,
            link_sort: None,
        }
    }
}

impl SankeyLayout {
    /// Create a new sankey layout filling the given extent
    pub fn new(extent: Rect) -> Self {
        Self {
            extent,
            ..Default::default()
        }
    }

    pub fn with_node_width(self, node_width: f64) -> Self {
        Self { node_width, ..self }
    }

    pub fn with_node_padding(self, node_padding: f64) -> Self {
        Self {
            node_padding,
            ..self
        }
    }

    pub fn with_extent(self, extent: Rect) -> Self {
        Self { extent, ..self }
    }

    /// Use an extent anchored at the origin with the given size
    pub fn with_size(self, size: Vec2) -> Self {
        self.with_extent(Rect::from_size(size))
    }

    pub fn with_align(self, align: NodeAlign) -> Self {
        Self {
            align: Some(align),
            ..self
        }
    }

    pub fn with_node_sort<F>(self, compare: F) -> Self
    where
        F: Fn(&PositionedNode, &PositionedNode) -> Ordering + Send + Sync + 'static,
    {
        Self {
            node_sort: Some(Comparator::new(compare)),
            ..self
        }
    }

    pub fn with_link_sort<F>(self, compare: F) -> Self
    where
        F: Fn(&PositionedLink, &PositionedLink) -> Ordering + Send + Sync + 'static,
    {
        Self {
            link_sort: Some(Comparator::new(compare)),
            ..self
        }
    }

    /// Size of the extent
    pub fn size(&self) -> Vec2 {
        self.extent.size()
    }
}

/// A node with its derived flow value, levels and box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    /// Position of the node in the input sequence
    pub index: usize,

    /// Sum of the values of all incident links, incoming and outgoing
    pub value: f64,

    /// Indices of the links leaving this node
    pub source_links: Vec<usize>,

    /// Indices of the links entering this node
    pub target_links: Vec<usize>,

    /// Rank from the roots, see [`SankeyLayout::compute`]
    pub depth: usize,

    /// Rank from the sinks
    pub height: usize,

    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl PositionedNode {
    fn new(index: usize) -> Self {
        Self {
            index,
            value: 0.0,
            source_links: Vec::new(),
            target_links: Vec::new(),
            depth: 0,
            height: 0,
            x0: 0.0,
            x1: 0.0,
            y0: 0.0,
            y1: 0.0,
        }
    }

    /// Links incident to this node on the given side
    pub(crate) fn links(&self, direction: Direction) -> &[usize] {
        match direction {
            Direction::Outgoing => &self.source_links,
            Direction::Incoming => &self.target_links,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(Point::new(self.x0, self.y0), Point::new(self.x1, self.y1))
    }
}

/// A link with its resolved endpoints and ribbon placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedLink {
    /// Position of the link in the input sequence
    pub index: usize,

    /// Index of the source node
    pub source: usize,

    /// Index of the target node
    pub target: usize,

    pub value: f64,

    /// Vertical midpoint where the ribbon leaves its source
    pub y0: f64,

    /// Vertical midpoint where the ribbon enters its target
    pub y1: f64,

    /// Ribbon thickness
    pub width: f64,
}

impl PositionedLink {
    /// Node at the far end of the link when walking in `direction`
    pub(crate) fn end(&self, direction: Direction) -> usize {
        match direction {
            Direction::Outgoing => self.target,
            Direction::Incoming => self.source,
        }
    }
}

/// Result of a sankey layout, index aligned with the input graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sankey {
    pub nodes: Vec<PositionedNode>,
    pub links: Vec<PositionedLink>,
}

/// A link together with its two endpoint nodes
#[derive(Debug, Clone, Copy)]
pub struct LinkView<'a> {
    pub link: &'a PositionedLink,
    pub source: &'a PositionedNode,
    pub target: &'a PositionedNode,
}

impl Sankey {
    pub fn link_view(&self, link: usize) -> Option<LinkView<'_>> {
        let link = self.links.get(link)?;
        Some(LinkView {
            link,
            source: self.nodes.get(link.source)?,
            target: self.nodes.get(link.target)?,
        })
    }

    pub fn link_views(&self) -> impl Iterator<Item = LinkView<'_>> {
        (0..self.links.len()).filter_map(|link| self.link_view(link))
    }

    /// Number of depth levels, `0` for an empty graph
    pub fn depth_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.depth + 1)
            .max()
            .unwrap_or(0)
    }
}

impl SankeyLayout {
    /// Compute the layout of `graph`, resolving identity references with `ids`
    ///
    /// Depths and heights are "first reached" breadth-first ranks: a node
    /// reachable through several paths keeps the rank of the shortest one,
    /// so in a diamond `a → b → c, a → c` the node `c` shares a column with
    /// `b`. Node values add every incident link once on each side, so an
    /// interior node counts both its inflow and its outflow.
    ///
    /// # Errors
    /// Returns an error if a link value is negative or not finite, an
    /// endpoint cannot be resolved, or the graph has a self loop or a cycle
    pub fn compute<G, I>(&self, graph: &G, ids: &I) -> Result<Sankey, SankeyError>
    where
        G: GraphSource,
        G::Key: Eq + Hash + fmt::Debug,
        I: NodeId<G::Node, Id = G::Key>,
    {
        let nodes = graph.nodes();
        let links = graph.links();
        debug!("Sankey layout of {} nodes and {} links", nodes.len(), links.len());

        let endpoints = resolve_links(nodes, links, ids)?;
        check_acyclic(nodes.len(), &endpoints)?;

        let mut sankey = accumulate(nodes.len(), links, &endpoints);
        assign_levels(&mut sankey, Direction::Outgoing);
        assign_levels(&mut sankey, Direction::Incoming);
        assign_node_breadths(self, &mut sankey);
        assign_link_breadths(self, &mut sankey);

        Ok(sankey)
    }
}

// Any graph whose links reference nodes by position can be laid out directly
impl<G> LayoutEngine<&G> for SankeyLayout
where
    G: GraphSource<Key = usize>,
{
    type Output = Sankey;
    type Error = SankeyError;

    fn layout(&self, graph: &G) -> Result<Sankey, SankeyError> {
        self.compute(graph, &ByIndex)
    }
}
