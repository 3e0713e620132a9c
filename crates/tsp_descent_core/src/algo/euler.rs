use crate::graph::UndirectedGraph;

/// Euler circuit by Hierholzer's method, starting at vertex 0.
///
/// The walk always takes the lowest-index remaining neighbor and
/// splices sub-circuits in on backtrack; the graph's edges are
/// consumed in the process. Callers guarantee every degree is even
/// (the matching re-balances the spanning tree), so the circuit covers
/// all edges and closes back at the start.
pub fn euler_circuit(graph: &mut UndirectedGraph) -> Vec<usize> {
    let mut circuit = Vec::new();
    let mut stack = vec![0usize];

    while let Some(&v) = stack.last() {
        match graph.min_neighbor(v) {
            Some(u) => {
                graph.remove_edge(v, u);
                stack.push(u);
            }
            None => {
                circuit.push(v);
                stack.pop();
            }
        }
    }

    circuit.reverse();
    circuit
}

/// Collapse a circuit to a Hamiltonian tour: emit each vertex on its
/// first appearance, skip the rest.
pub fn shortcut(circuit: &[usize], vertex_count: usize) -> Vec<usize> {
    let mut seen = vec![false; vertex_count];
    let mut tour = Vec::with_capacity(vertex_count);
    for &v in circuit {
        if !seen[v] {
            seen[v] = true;
            tour.push(v);
        }
    }
    tour
}
