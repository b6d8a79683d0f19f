use super::{Sankey, SankeyLayout};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Assign node boxes column by column
pub(crate) fn assign_node_breadths(layout: &SankeyLayout, sankey: &mut Sankey) {
    let columns = group_columns(layout, sankey);
    let extent = layout.extent;
    let dx = (extent.width() - layout.node_width) / columns.len().saturating_sub(1).max(1) as f64;

    for (i, (key, mut column)) in columns.into_iter().enumerate() {
        if let Some(sort) = &layout.node_sort {
            column.sort_by(|&a, &b| sort.compare(&sankey.nodes[a], &sankey.nodes[b]));
        }

        let total: f64 = column.iter().map(|&node| sankey.nodes[node].value).sum();
        let available = extent.height() - (column.len() - 1) as f64 * layout.node_padding;
        if available < 0.0 {
            warn!(
                "Column {key} needs {} of padding but the extent is only {} high",
                (column.len() - 1) as f64 * layout.node_padding,
                extent.height()
            );
        }

        // Zero-valued columns get flat boxes instead of a division by zero
        let dy = if total > 0.0 { available / total } else { 0.0 };
        debug!("Column {key}: {} nodes, total {total}, dy {dy}", column.len());

        let x0 = extent.min.x + i as f64 * dx;
        let mut y = extent.min.y;
        for &index in &column {
            let node = &mut sankey.nodes[index];
            node.x0 = x0;
            node.x1 = x0 + layout.node_width;
            node.y0 = y;
            node.y1 = y + node.value * dy;
            y = node.y1 + layout.node_padding;
        }
    }
}

/// Bucket nodes by column key, keys in ascending order
fn group_columns(layout: &SankeyLayout, sankey: &Sankey) -> BTreeMap<usize, Vec<usize>> {
    let count = sankey.depth_count();
    let mut columns: BTreeMap<usize, Vec<usize>> = BTreeMap::new();

    for node in &sankey.nodes {
        let key = match &layout.align {
            Some(align) => {
                let last = count.saturating_sub(1) as f64;
                align.column(node, sankey, count).floor().clamp(0.0, last) as usize
            }
            None => node.depth,
        };
        columns.entry(key).or_default().push(node.index);
    }

    columns
}

/// Stack link ribbons along each node, outgoing and incoming sides
/// independently
pub(crate) fn assign_link_breadths(layout: &SankeyLayout, sankey: &mut Sankey) {
    let Sankey { nodes, links } = sankey;

    for node in nodes.iter_mut() {
        if let Some(sort) = &layout.link_sort {
            node.source_links
                .sort_by(|&a, &b| sort.compare(&links[a], &links[b]));
            node.target_links
                .sort_by(|&a, &b| sort.compare(&links[a], &links[b]));
        }

        let mut y = node.y0;
        for &index in &node.source_links {
            let link = &mut links[index];
            link.y0 = y + link.value / 2.0;
            link.width = link.value;
            y += link.value;
        }

        let mut y = node.y0;
        for &index in &node.target_links {
            let link = &mut links[index];
            link.y1 = y + link.value / 2.0;
            // Already set unless the source node comes later in node order
            if link.width == 0.0 {
                link.width = link.value;
            }
            y += link.value;
        }
    }
}
