use crate::{LinkView, Point, Sankey};

/// Trait for extracting one end of a link ribbon
pub trait LinkEndpoint {
    /// Get the point where the ribbon centerline starts or ends
    fn point(&self, link: &LinkView<'_>) -> Point;
}

// Blanket implementation for closures
impl<F> LinkEndpoint for F
where
    F: Fn(&LinkView<'_>) -> Point,
{
    fn point(&self, link: &LinkView<'_>) -> Point {
        self(link)
    }
}

/// Right edge of the source node, at the link's outgoing midpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRight;

impl LinkEndpoint for SourceRight {
    fn point(&self, link: &LinkView<'_>) -> Point {
        Point::new(link.source.x1, link.link.y0)
    }
}

/// Left edge of the target node, at the link's incoming midpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetLeft;

impl LinkEndpoint for TargetLeft {
    fn point(&self, link: &LinkView<'_>) -> Point {
        Point::new(link.target.x0, link.link.y1)
    }
}

/// Cubic Bezier path generator for link ribbons
///
/// Control points sit at 30% and 70% of the horizontal span, each at the
/// height of its nearer endpoint, which gives the usual S-shaped ribbon.
///
/// ```
/// use sankey_layout::{LayoutEngine, LinkPath, SankeyGraph, SankeyLayout, Vec2};
///
/// let sankey = SankeyLayout::default()
///     .with_size(Vec2::new(600.0, 400.0))
///     .layout(&SankeyGraph::sample())
///     .unwrap();
/// let paths = sankey.paths(&LinkPath::horizontal());
/// assert!(paths[0].starts_with("M24,25C"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkPath<S = SourceRight, T = TargetLeft> {
    source: S,
    target: T,
}

impl LinkPath {
    /// Generator for left-to-right diagrams
    pub fn horizontal() -> Self {
        Self {
            source: SourceRight,
            target: TargetLeft,
        }
    }
}

impl<S, T> LinkPath<S, T> {
    /// Replace the source endpoint accessor
    pub fn with_source<S2: LinkEndpoint>(self, source: S2) -> LinkPath<S2, T> {
        LinkPath {
            source,
            target: self.target,
        }
    }

    /// Replace the target endpoint accessor
    pub fn with_target<T2: LinkEndpoint>(self, target: T2) -> LinkPath<S, T2> {
        LinkPath {
            source: self.source,
            target,
        }
    }
}

impl<S: LinkEndpoint, T: LinkEndpoint> LinkPath<S, T> {
    /// SVG path data for one link
    pub fn path(&self, link: &LinkView<'_>) -> String {
        let Point { x: x0, y: y0 } = self.source.point(link);
        let Point { x: x1, y: y1 } = self.target.point(link);
        let x2 = x0 + (x1 - x0) * 0.3;
        let x3 = x0 + (x1 - x0) * 0.7;
        format!("M{x0},{y0}C{x2},{y0} {x3},{y1} {x1},{y1}")
    }
}

impl Sankey {
    /// SVG path data for every link, in link order
    pub fn paths<S, T>(&self, generator: &LinkPath<S, T>) -> Vec<String>
    where
        S: LinkEndpoint,
        T: LinkEndpoint,
    {
        self.link_views().map(|link| generator.path(&link)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PositionedLink, PositionedNode};
    use test_log::test;

    fn node(x0: f64, x1: f64) -> PositionedNode {
        PositionedNode {
            index: 0,
            value: 0.0,
            source_links: Vec::new(),
            target_links: Vec::new(),
            depth: 0,
            height: 0,
            x0,
            x1,
            y0: 0.0,
            y1: 0.0,
        }
    }

    fn link(y0: f64, y1: f64) -> PositionedLink {
        PositionedLink {
            index: 0,
            source: 0,
            target: 1,
            value: 1.0,
            y0,
            y1,
            width: 1.0,
        }
    }

    #[test]
    fn horizontal_path() {
        let (source, target, link) = (node(0.0, 24.0), node(124.0, 148.0), link(12.5, 40.0));
        let view = LinkView {
            link: &link,
            source: &source,
            target: &target,
        };

        let x2 = 24.0 + 100.0 * 0.3;
        let x3 = 24.0 + 100.0 * 0.7;
        assert_eq!(
            LinkPath::horizontal().path(&view),
            format!("M24,12.5C{x2},12.5 {x3},40 124,40")
        );
    }

    #[test]
    fn flat_link_has_flat_controls() {
        let (source, target, link) = (node(0.0, 10.0), node(10.0, 20.0), link(5.0, 5.0));
        let view = LinkView {
            link: &link,
            source: &source,
            target: &target,
        };
        assert_eq!(LinkPath::horizontal().path(&view), "M10,5C10,5 10,5 10,5");
    }

    #[test]
    fn custom_accessors_swap_axes() {
        let (source, target, link) = (node(0.0, 10.0), node(50.0, 60.0), link(2.0, 8.0));
        let view = LinkView {
            link: &link,
            source: &source,
            target: &target,
        };
        let vertical = LinkPath::horizontal()
            .with_source(|view: &LinkView<'_>| Point::new(view.link.y0, view.source.x1))
            .with_target(|view: &LinkView<'_>| Point::new(view.link.y1, view.target.x0));

        let x2 = 2.0 + 6.0 * 0.3;
        let x3 = 2.0 + 6.0 * 0.7;
        assert_eq!(vertical.path(&view), format!("M2,10C{x2},10 {x3},50 8,50"));
    }

    #[test]
    fn paths_for_every_link() {
        let sankey = Sankey {
            nodes: vec![node(0.0, 10.0), node(90.0, 100.0)],
            links: vec![link(1.0, 1.0), link(3.0, 3.0)],
        };
        let paths = sankey.paths(&LinkPath::horizontal());
        assert_eq!(paths.len(), 2);
        assert!(paths[1].starts_with("M10,3C"));
        assert!(paths[1].ends_with(" 90,3"));
    }
}
