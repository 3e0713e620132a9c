use crate::graph::{Edge, UndirectedGraph};
use crate::matrix::Distance;

/// Minimum spanning tree by Prim's algorithm, rooted at vertex 0.
///
/// Tie-break between equally light crossing edges: lowest tree-side
/// endpoint, then lowest outside endpoint. The edge set is part of the
/// solver's deterministic contract, so the relaxation keeps the lowest
/// attaining tree vertex for every outside vertex.
pub fn minimum_spanning_tree(graph: &UndirectedGraph) -> Vec<Edge> {
    let n = graph.vertex_count();
    let mut tree = Vec::with_capacity(n.saturating_sub(1));
    if n < 2 {
        return tree;
    }

    let mut in_tree = vec![false; n];
    let mut key = vec![Distance::MAX; n];
    let mut parent = vec![0usize; n];

    in_tree[0] = true;
    relax(graph, 0, &in_tree, &mut key, &mut parent);

    for _ in 1..n {
        let picked = (0..n)
            .filter(|&v| !in_tree[v])
            .min_by_key(|&v| (key[v], parent[v], v));
        let Some(v) = picked else {
            break;
        };
        tree.push(Edge {
            from: parent[v],
            to: v,
            weight: key[v],
        });
        in_tree[v] = true;
        relax(graph, v, &in_tree, &mut key, &mut parent);
    }

    tree
}

fn relax(
    graph: &UndirectedGraph,
    added: usize,
    in_tree: &[bool],
    key: &mut [Distance],
    parent: &mut [usize],
) {
    for e in graph.neighbors(added) {
        if in_tree[e.to] {
            continue;
        }
        if e.weight < key[e.to] || (e.weight == key[e.to] && added < parent[e.to]) {
            key[e.to] = e.weight;
            parent[e.to] = added;
        }
    }
}
