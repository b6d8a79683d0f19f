use super::{PositionedLink, PositionedNode, Sankey, SankeyError};
use crate::accessors::NodeId;
use crate::{Endpoint, LinkInput};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Resolve every link to a `(source, target)` pair of node indices
///
/// Identity lookups are only built when at least one link references a node
/// by [`Endpoint::Id`].
pub(crate) fn resolve_links<N, K, I>(
    nodes: &[N],
    links: &[LinkInput<K>],
    ids: &I,
) -> Result<Vec<(usize, usize)>, SankeyError>
where
    I: NodeId<N, Id = K>,
    K: Eq + Hash + Debug,
{
    let uses_ids = links.iter().any(|link| {
        matches!(link.source, Endpoint::Id(_)) || matches!(link.target, Endpoint::Id(_))
    });
    let by_id = if uses_ids {
        index_by_id(nodes, ids)?
    } else {
        HashMap::new()
    };

    links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            if !link.value.is_finite() {
                return Err(SankeyError::NonFiniteValue {
                    link: index,
                    value: link.value,
                });
            }
            if link.value < 0.0 {
                return Err(SankeyError::NegativeValue {
                    link: index,
                    value: link.value,
                });
            }

            let source = resolve_endpoint(index, &link.source, nodes.len(), &by_id)?;
            let target = resolve_endpoint(index, &link.target, nodes.len(), &by_id)?;
            if source == target {
                return Err(SankeyError::SelfLoop {
                    link: index,
                    node: source,
                });
            }

            Ok((source, target))
        })
        .collect()
}

fn index_by_id<N, I>(nodes: &[N], ids: &I) -> Result<HashMap<I::Id, usize>, SankeyError>
where
    I: NodeId<N>,
{
    let mut by_id = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        match by_id.entry(ids.id(index, node)) {
            Entry::Occupied(entry) => {
                return Err(SankeyError::DuplicateId {
                    node: index,
                    first: *entry.get(),
                    id: format!("{:?}", entry.key()),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(index);
            }
        }
    }
    Ok(by_id)
}

fn resolve_endpoint<K>(
    link: usize,
    endpoint: &Endpoint<K>,
    len: usize,
    by_id: &HashMap<K, usize>,
) -> Result<usize, SankeyError>
where
    K: Eq + Hash + Debug,
{
    match endpoint {
        Endpoint::Index(index) if *index < len => Ok(*index),
        Endpoint::Index(index) => Err(SankeyError::IndexOutOfRange {
            link,
            index: *index,
            len,
        }),
        Endpoint::Id(id) => by_id
            .get(id)
            .copied()
            .ok_or_else(|| SankeyError::UnknownNode {
                link,
                id: format!("{id:?}"),
            }),
    }
}

/// Build the node and link records, attaching links to their endpoints in
/// input order and adding each link value to both endpoints
pub(crate) fn accumulate<K>(
    node_count: usize,
    links: &[LinkInput<K>],
    endpoints: &[(usize, usize)],
) -> Sankey {
    let mut nodes: Vec<_> = (0..node_count).map(PositionedNode::new).collect();
    let mut positioned = Vec::with_capacity(links.len());

    for (index, (link, &(source, target))) in links.iter().zip(endpoints).enumerate() {
        nodes[source].source_links.push(index);
        nodes[source].value += link.value;
        nodes[target].target_links.push(index);
        nodes[target].value += link.value;

        positioned.push(PositionedLink {
            index,
            source,
            target,
            value: link.value,
            y0: 0.0,
            y1: 0.0,
            width: 0.0,
        });
    }

    Sankey {
        nodes,
        links: positioned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::ByIndex;
    use crate::NodeInfo;
    use test_log::test;

    fn nodes(names: &[&str]) -> Vec<NodeInfo> {
        names.iter().map(|name| NodeInfo::new(*name)).collect()
    }

    fn by_name(_: usize, node: &NodeInfo) -> String {
        node.name.clone()
    }

    #[test]
    fn resolves_indices() {
        let links = [LinkInput::new(0, 2, 1.0), LinkInput::new(1, 2, 0.0)];
        let endpoints = resolve_links(&nodes(&["a", "b", "c"]), &links, &ByIndex).unwrap();
        assert_eq!(endpoints, [(0, 2), (1, 2)]);
    }

    #[test]
    fn resolves_mixed_endpoints() {
        let links = [LinkInput {
            source: Endpoint::Index(1),
            target: Endpoint::Id("a".to_string()),
            value: 3.0,
        }];
        let endpoints = resolve_links(&nodes(&["a", "b"]), &links, &by_name).unwrap();
        assert_eq!(endpoints, [(1, 0)]);
    }

    #[test]
    fn index_out_of_range() {
        let links = [LinkInput::new(0, 5, 1.0)];
        let err = resolve_links(&nodes(&["a", "b"]), &links, &ByIndex).unwrap_err();
        assert_eq!(
            err,
            SankeyError::IndexOutOfRange {
                link: 0,
                index: 5,
                len: 2
            }
        );
    }

    #[test]
    fn unknown_id() {
        let links = [LinkInput::between("a".to_string(), "z".to_string(), 1.0)];
        let err = resolve_links(&nodes(&["a", "b"]), &links, &by_name).unwrap_err();
        assert_eq!(
            err,
            SankeyError::UnknownNode {
                link: 0,
                id: "\"z\"".to_string()
            }
        );
    }

    #[test]
    fn duplicate_id() {
        let links = [LinkInput::between("a".to_string(), "b".to_string(), 1.0)];
        let err = resolve_links(&nodes(&["a", "b", "a"]), &links, &by_name).unwrap_err();
        assert!(matches!(err, SankeyError::DuplicateId { node: 2, first: 0, .. }));
    }

    #[test]
    fn duplicate_id_ignored_without_id_links() {
        let links = [LinkInput::new(0, 1, 1.0)];
        let endpoints = resolve_links(&nodes(&["a", "a"]), &links, &by_name).unwrap();
        assert_eq!(endpoints, [(0, 1)]);
    }

    #[test]
    fn rejects_bad_values() {
        let names = nodes(&["a", "b"]);

        let err = resolve_links(&names, &[LinkInput::new(0, 1, f64::NAN)], &ByIndex).unwrap_err();
        assert!(matches!(err, SankeyError::NonFiniteValue { link: 0, .. }));

        let err =
            resolve_links(&names, &[LinkInput::new(0, 1, f64::INFINITY)], &ByIndex).unwrap_err();
        assert!(matches!(err, SankeyError::NonFiniteValue { link: 0, .. }));

        let err = resolve_links(&names, &[LinkInput::new(0, 1, -1.0)], &ByIndex).unwrap_err();
        assert_eq!(err, SankeyError::NegativeValue { link: 0, value: -1.0 });
    }

    #[test]
    fn accumulate_preserves_input_order() {
        let links: [LinkInput; 3] = [
            LinkInput::new(0, 1, 2.0),
            LinkInput::new(0, 2, 3.0),
            LinkInput::new(1, 2, 4.0),
        ];
        let sankey = accumulate(3, &links, &[(0, 1), (0, 2), (1, 2)]);

        assert_eq!(sankey.nodes[0].source_links, [0, 1]);
        assert_eq!(sankey.nodes[2].target_links, [1, 2]);
        assert_eq!(sankey.nodes[0].value, 5.0);
        assert_eq!(sankey.nodes[1].value, 6.0);
        assert_eq!(sankey.nodes[2].value, 7.0);
        assert_eq!(sankey.links[2].source, 1);
    }
}
