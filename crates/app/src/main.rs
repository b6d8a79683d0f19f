use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sankey_layout::{
    LayoutEngine, LinkPath, NodeAlign, NodeInfo, Rect, Sankey, SankeyGraph, SankeyLayout, Vec2,
};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Align {
    /// Columns follow the raw node depth
    Depth,
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// RON graph file, links may reference nodes by index or by name. The
    /// built-in sample graph is used when omitted
    graph: Option<PathBuf>,

    #[arg(long, default_value_t = 600.0)]
    width: f64,

    #[arg(long, default_value_t = 400.0)]
    height: f64,

    #[arg(long, default_value_t = 24.0)]
    node_width: f64,

    #[arg(long, default_value_t = 8.0)]
    node_padding: f64,

    #[arg(long, value_enum, default_value_t = Align::Depth)]
    align: Align,

    /// Stack the nodes of each column by decreasing value
    #[arg(long)]
    sort_nodes: bool,

    /// Dump the whole layout as RON
    #[arg(long)]
    ron: bool,
}

impl Args {
    fn engine(&self) -> SankeyLayout {
        let mut engine = SankeyLayout::default()
            .with_size(Vec2::new(self.width, self.height))
            .with_node_width(self.node_width)
            .with_node_padding(self.node_padding);

        engine = match self.align {
            Align::Depth => engine,
            Align::Left => engine.with_align(NodeAlign::Left),
            Align::Right => engine.with_align(NodeAlign::Right),
            Align::Center => engine.with_align(NodeAlign::Center),
            Align::Justify => engine.with_align(NodeAlign::Justify),
        };

        if self.sort_nodes {
            engine = engine.with_node_sort(|a, b| b.value.total_cmp(&a.value));
        }

        engine
    }
}

fn load_graph(path: &Path) -> Result<SankeyGraph<NodeInfo, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn compute(args: &Args) -> Result<(Vec<NodeInfo>, Sankey)> {
    let engine = args.engine();
    debug!("Layout engine: {engine:?}");

    match &args.graph {
        Some(path) => {
            let graph = load_graph(path)?;
            let by_name = |_: usize, node: &NodeInfo| node.name.clone();
            let sankey = engine
                .compute(&graph, &by_name)
                .with_context(|| format!("Failed to lay out {}", path.display()))?;
            Ok((graph.nodes, sankey))
        }
        None => {
            info!("No graph given, using the sample graph");
            let graph = SankeyGraph::sample();
            let sankey = engine.layout(&graph)?;
            Ok((graph.nodes, sankey))
        }
    }
}

fn summary(nodes: &[NodeInfo], sankey: &Sankey) -> String {
    let mut out = String::new();
    for (info, node) in nodes.iter().zip(&sankey.nodes) {
        let Rect { min, max } = node.rect();
        out.push_str(&format!(
            "{}: depth {} height {} value {} box [{}, {}] - [{}, {}]\n",
            info.name, node.depth, node.height, node.value, min.x, min.y, max.x, max.y
        ));
    }

    let generator = LinkPath::horizontal();
    for view in sankey.link_views() {
        out.push_str(&format!(
            "{} -> {} ({}): {}\n",
            nodes[view.link.source].name,
            nodes[view.link.target].name,
            view.link.value,
            generator.path(&view)
        ));
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let (nodes, sankey) = compute(&args)?;

    if args.ron {
        let pretty = ron::ser::PrettyConfig::default();
        println!("{}", ron::ser::to_string_pretty(&sankey, pretty)?);
    } else {
        print!("{}", summary(&nodes, &sankey));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("sankey").chain(extra.iter().copied()))
    }

    #[test]
    fn sample_summary() {
        let args = args(&[]);
        let (nodes, sankey) = compute(&args).unwrap();
        let text = summary(&nodes, &sankey);

        assert!(text.starts_with("Node A: depth 0 height 2 value 100 box [0, 0] - [24, 400]\n"));
        assert!(text.contains("Node A -> Node B (50): M24,25C"));
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn flags_configure_engine() {
        let args = args(&[
            "--width",
            "300",
            "--node-padding",
            "2",
            "--align",
            "right",
            "--sort-nodes",
        ]);
        let engine = args.engine();

        assert_eq!(engine.size(), Vec2::new(300.0, 400.0));
        assert_eq!(engine.node_padding, 2.0);
        assert!(matches!(engine.align, Some(NodeAlign::Right)));
        assert!(engine.node_sort.is_some());
    }

    #[test]
    fn sorted_columns_put_largest_first() {
        let (_, sankey) = compute(&args(&["--sort-nodes"])).unwrap();
        assert_eq!(sankey.nodes[1].y0, 0.0);
        assert!(sankey.nodes[3].y0 > sankey.nodes[2].y0);
    }

    #[test]
    fn graph_file_links_by_name() {
        let path = std::env::temp_dir().join(format!("sankey-app-{}.ron", std::process::id()));
        std::fs::write(
            &path,
            r#"(
                nodes: [(name: "in"), (name: "mid"), (name: "out")],
                links: [
                    (source: "in", target: "mid", value: 3.0),
                    (source: 1, target: "out", value: 2.0),
                ],
            )"#,
        )
        .unwrap();

        let result = compute(&args(&[path.to_str().unwrap()]));
        std::fs::remove_file(&path).unwrap();
        let (nodes, sankey) = result.unwrap();

        assert_eq!(nodes[2].name, "out");
        let depths: Vec<_> = sankey.nodes.iter().map(|n| n.depth).collect();
        assert_eq!(depths, [0, 1, 2]);
        assert!(summary(&nodes, &sankey).contains("mid -> out (2): "));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = compute(&args(&["does-not-exist.ron"])).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.ron"));
    }
}
