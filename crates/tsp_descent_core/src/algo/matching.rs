use crate::graph::UndirectedGraph;
use crate::matrix::Matrix;

/// Greedy minimum-weight perfect matching over the odd-degree vertex
/// set `odd` (even-sized for any spanning tree).
///
/// Edges of the induced complete subgraph are walked in (weight, lower
/// endpoint, higher endpoint) order; an edge is kept when both ends
/// are still free. Deterministic, not guaranteed optimal; sufficient
/// for the construction heuristic's contract.
pub fn greedy_matching(matrix: &Matrix, odd: &[usize]) -> Vec<(usize, usize)> {
    let induced = UndirectedGraph::complete(&matrix.submatrix(odd));
    let mut matched = vec![false; odd.len()];
    let mut pairs = Vec::with_capacity(odd.len() / 2);

    for edge in induced.edges() {
        if pairs.len() == odd.len() / 2 {
            break;
        }
        if matched[edge.from] || matched[edge.to] {
            continue;
        }
        matched[edge.from] = true;
        matched[edge.to] = true;
        pairs.push((odd[edge.from], odd[edge.to]));
    }

    pairs
}
