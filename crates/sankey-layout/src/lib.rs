//! Sankey (flow diagram) layout
//!
//! This crate turns a weighted DAG into node boxes and link ribbons. Node
//! heights are proportional to the flow through them, columns follow the
//! topological rank of each node, and ribbons are stacked along their
//! endpoints. It only computes coordinates and SVG path data, rendering is
//! left to the caller.
//!
//! # Example
//!
//! ```
//! use sankey_layout::{LayoutEngine, LinkInput, LinkPath, NodeInfo, SankeyGraph, SankeyLayout, Vec2};
//!
//! // Create a graph, links reference nodes by index
//! let graph: SankeyGraph<NodeInfo> = SankeyGraph::new(
//!     vec![NodeInfo::new("coal"), NodeInfo::new("power"), NodeInfo::new("homes")],
//!     vec![LinkInput::new(0, 1, 30.0), LinkInput::new(1, 2, 25.0)],
//! );
//!
//! // Create a layout engine filling a 600x400 area
//! let engine = SankeyLayout::default().with_size(Vec2::new(600.0, 400.0));
//!
//! // Use the LayoutEngine trait for index based graphs
//! let sankey = engine.layout(&graph).unwrap();
//! assert_eq!(sankey.nodes[2].x1, 600.0);
//!
//! // Then generate one path per link
//! let paths = sankey.paths(&LinkPath::horizontal());
//! assert_eq!(paths.len(), 2);
//! ```

mod accessors;
mod curve;
mod engine;
mod geometry;
mod graph;

pub mod align;
pub mod sankey;

// Re-export core types and traits
pub use accessors::{ByIndex, GraphSource, NodeId};
pub use curve::{LinkEndpoint, LinkPath, SourceRight, TargetLeft};
pub use engine::LayoutEngine;
pub use geometry::{Point, Rect, Vec2};
pub use graph::{Endpoint, LinkInput, NodeInfo, SankeyGraph};

pub use align::NodeAlign;

// Re-export sankey layout types
pub use sankey::{
    Comparator, LinkView, PositionedLink, PositionedNode, Sankey, SankeyError, SankeyLayout,
};
