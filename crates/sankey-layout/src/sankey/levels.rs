use super::{Sankey, SankeyError};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::VecDeque;
use tracing::trace;

/// Reject graphs containing a cycle
///
/// Leveling only terminates with meaningful ranks on a DAG: nodes on a cycle
/// that no root reaches would never receive a depth.
pub(crate) fn check_acyclic(
    node_count: usize,
    endpoints: &[(usize, usize)],
) -> Result<(), SankeyError> {
    let mut graph = DiGraphMap::<usize, ()>::with_capacity(node_count, endpoints.len());
    for node in 0..node_count {
        graph.add_node(node);
    }
    for &(source, target) in endpoints {
        graph.add_edge(source, target, ());
    }

    toposort(&graph, None)
        .map(|_| ())
        .map_err(|cycle| SankeyError::GraphHasCycle(cycle.node_id()))
}

/// Assign breadth-first ranks walking links in `direction`
///
/// `Outgoing` starts from the nodes without incoming links and fills in
/// `depth`, `Incoming` starts from the nodes without outgoing links and
/// fills in `height`. A node is marked visited when it is first enqueued,
/// so it keeps the rank of the first path that reaches it.
pub(crate) fn assign_levels(sankey: &mut Sankey, direction: Direction) {
    let Sankey { nodes, links } = sankey;
    let mut visited = vec![false; nodes.len()];
    let mut queue = VecDeque::new();

    for node in nodes.iter() {
        if node.links(direction.opposite()).is_empty() {
            visited[node.index] = true;
            queue.push_back((node.index, 0));
        }
    }

    while let Some((index, level)) = queue.pop_front() {
        let node = &mut nodes[index];
        match direction {
            Direction::Outgoing => node.depth = node.depth.max(level),
            Direction::Incoming => node.height = node.height.max(level),
        }
        trace!("Node {index} at level {level} ({direction:?})");

        for &link in node.links(direction) {
            let next = links[link].end(direction);
            if !visited[next] {
                visited[next] = true;
                queue.push_back((next, level + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sankey::resolve::accumulate;
    use crate::LinkInput;
    use test_log::test;

    fn leveled(node_count: usize, links: &[(usize, usize)]) -> Sankey {
        let inputs: Vec<LinkInput> = links
            .iter()
            .map(|&(source, target)| LinkInput::new(source, target, 1.0))
            .collect();
        let mut sankey = accumulate(node_count, &inputs, links);
        assign_levels(&mut sankey, Direction::Outgoing);
        assign_levels(&mut sankey, Direction::Incoming);
        sankey
    }

    #[test]
    fn chain_levels() {
        let sankey = leveled(3, &[(0, 1), (1, 2)]);
        let levels: Vec<_> = sankey.nodes.iter().map(|n| (n.depth, n.height)).collect();
        assert_eq!(levels, [(0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn shortcut_keeps_first_reached_rank() {
        // 0 -> 1 -> 2 -> 3 plus a shortcut 0 -> 3
        let sankey = leveled(4, &[(0, 1), (1, 2), (2, 3), (0, 3)]);
        assert_eq!(sankey.nodes[3].depth, 1);
        assert_eq!(sankey.nodes[0].height, 1);
        assert_eq!(sankey.nodes[2].depth, 2);
    }

    #[test]
    fn disconnected_components() {
        let sankey = leveled(5, &[(0, 1), (2, 3)]);
        let depths: Vec<_> = sankey.nodes.iter().map(|n| n.depth).collect();
        let heights: Vec<_> = sankey.nodes.iter().map(|n| n.height).collect();
        assert_eq!(depths, [0, 1, 0, 1, 0]);
        assert_eq!(heights, [1, 0, 1, 0, 0]);
    }

    #[test]
    fn cycle_is_detected() {
        let err = check_acyclic(4, &[(0, 1), (1, 2), (2, 3), (3, 1)]).unwrap_err();
        assert!(matches!(err, SankeyError::GraphHasCycle(_)));
    }

    #[test]
    fn dag_passes() {
        assert!(check_acyclic(3, &[(0, 1), (0, 2), (1, 2)]).is_ok());
        assert!(check_acyclic(0, &[]).is_ok());
    }
}
