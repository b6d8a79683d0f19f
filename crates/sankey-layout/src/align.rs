//! Node alignment policies
//!
//! Each function maps a node and the number of depth levels `n` to a
//! fractional depth. They are pure and only read the leveled layout.
//!
//! `center` and `justify` average the depths of neighbours, so they describe
//! where a node's flow comes from or goes to rather than a column of its own.
//! [`NodeAlign`] places nodes with [`center_column`] and [`justify_column`]
//! instead, which keep every link pointing forward on a leveled chain.

use crate::{PositionedNode, Sankey};
use std::fmt;
use std::sync::Arc;

/// Signature shared by all alignment functions
pub type AlignFn = Arc<dyn Fn(&PositionedNode, &Sankey, usize) -> f64 + Send + Sync>;

/// Push every node as far left as possible
pub fn left(node: &PositionedNode, _sankey: &Sankey, _n: usize) -> f64 {
    node.depth as f64
}

/// Push every node as far right as possible
pub fn right(node: &PositionedNode, _sankey: &Sankey, n: usize) -> f64 {
    n as f64 - 1.0 - node.height as f64
}

/// Average depth of the sources feeding the node, middle column for roots
pub fn center(node: &PositionedNode, sankey: &Sankey, n: usize) -> f64 {
    if node.target_links.is_empty() {
        return (n as f64 - 1.0) / 2.0;
    }
    let total: usize = node
        .target_links
        .iter()
        .map(|&link| sankey.nodes[sankey.links[link].source].depth)
        .sum();
    total as f64 / node.target_links.len() as f64
}

/// Average depth of the targets fed by the node, middle column for sinks
pub fn justify(node: &PositionedNode, sankey: &Sankey, n: usize) -> f64 {
    if node.source_links.is_empty() {
        return (n as f64 - 1.0) / 2.0;
    }
    let total: usize = node
        .source_links
        .iter()
        .map(|&link| sankey.nodes[sankey.links[link].target].depth)
        .sum();
    total as f64 / node.source_links.len() as f64
}

/// Sinks move to the last column, every other node stays at its depth
pub fn justify_column(node: &PositionedNode, _sankey: &Sankey, n: usize) -> f64 {
    if node.source_links.is_empty() {
        n as f64 - 1.0
    } else {
        node.depth as f64
    }
}

/// Roots move next to their nearest target, every other node stays at its
/// depth
pub fn center_column(node: &PositionedNode, sankey: &Sankey, _n: usize) -> f64 {
    if !node.target_links.is_empty() {
        return node.depth as f64;
    }
    node.source_links
        .iter()
        .map(|&link| sankey.nodes[sankey.links[link].target].depth)
        .min()
        .map_or(0.0, |depth| depth as f64 - 1.0)
}

/// Alignment policy used to pick node columns
#[derive(Clone, Default)]
pub enum NodeAlign {
    Left,
    Right,
    Center,
    #[default]
    Justify,
    Custom(AlignFn),
}

impl NodeAlign {
    pub fn custom<F>(align: F) -> Self
    where
        F: Fn(&PositionedNode, &Sankey, usize) -> f64 + Send + Sync + 'static,
    {
        NodeAlign::Custom(Arc::new(align))
    }

    /// Fractional column of `node` among `n` depth levels, before flooring
    /// and clamping
    pub fn column(&self, node: &PositionedNode, sankey: &Sankey, n: usize) -> f64 {
        match self {
            NodeAlign::Left => left(node, sankey, n),
            NodeAlign::Right => right(node, sankey, n),
            NodeAlign::Center => center_column(node, sankey, n),
            NodeAlign::Justify => justify_column(node, sankey, n),
            NodeAlign::Custom(align) => align(node, sankey, n),
        }
    }
}

impl fmt::Debug for NodeAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeAlign::Left => f.write_str("Left"),
            NodeAlign::Right => f.write_str("Right"),
            NodeAlign::Center => f.write_str("Center"),
            NodeAlign::Justify => f.write_str("Justify"),
            NodeAlign::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
