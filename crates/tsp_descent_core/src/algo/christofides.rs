use crate::algo::{euler, matching, mst};
use crate::error::{Error, Result};
use crate::graph::UndirectedGraph;
use crate::matrix::Matrix;

/// Construction heuristic: minimum spanning tree, greedy matching on
/// its odd-degree vertices, Euler circuit of the union multigraph,
/// Hamiltonian shortcut. The resulting tour starts at vertex 0.
pub fn christofides(matrix: &Matrix) -> Result<Vec<usize>> {
    let n = matrix.len();
    if n < 2 {
        return Err(Error::EmptyProblem);
    }

    let tree = mst::minimum_spanning_tree(&UndirectedGraph::complete(matrix));

    let mut multigraph = UndirectedGraph::empty(n);
    for edge in &tree {
        multigraph.add_edge(edge.from, edge.to, edge.weight);
    }

    let odd = multigraph.odd_vertices();
    log::debug!(
        "heuristic: tree_edges={} odd_vertices={}",
        tree.len(),
        odd.len()
    );

    // Matching edges go in even when already present in the tree; the
    // multigraph keeps the parallel copy.
    for (u, v) in matching::greedy_matching(matrix, &odd) {
        multigraph.add_edge(u, v, matrix.at(u, v));
    }

    let circuit = euler::euler_circuit(&mut multigraph);
    Ok(euler::shortcut(&circuit, n))
}
