use crate::matrix::{Distance, Matrix};

/// Adjacency entry: the far endpoint and the edge weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub to: usize,
    pub weight: Distance,
}

/// Weighted undirected edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: Distance,
}

/// Undirected multigraph over vertices `0..n`.
///
/// Parallel edges are kept as repeated adjacency entries, which is
/// what the Euler stage needs when the matching re-adds a tree edge.
#[derive(Clone, Debug)]
pub struct UndirectedGraph {
    adjacency: Vec<Vec<Neighbor>>,
}

impl UndirectedGraph {
    pub fn empty(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Complete graph over the matrix: one edge per pair `i < j`,
    /// weighted by the matrix entry.
    pub fn complete(matrix: &Matrix) -> Self {
        let n = matrix.len();
        let mut graph = Self::empty(n);
        for i in 0..n {
            let row = matrix.row(i);
            for j in (i + 1)..n {
                graph.add_edge(i, j, row.at(j));
            }
        }
        graph
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn add_edge(&mut self, u: usize, v: usize, weight: Distance) {
        self.adjacency[u].push(Neighbor { to: v, weight });
        self.adjacency[v].push(Neighbor { to: u, weight });
    }

    /// Remove one instance of `{u, v}`; `false` when no copy remains.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let Some(pos) = self.adjacency[u].iter().position(|e| e.to == v) else {
            return false;
        };
        self.adjacency[u].remove(pos);
        if let Some(pos) = self.adjacency[v].iter().position(|e| e.to == u) {
            self.adjacency[v].remove(pos);
        }
        true
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// Vertices of odd degree, ascending.
    pub fn odd_vertices(&self) -> Vec<usize> {
        (0..self.vertex_count())
            .filter(|&v| self.degree(v) % 2 == 1)
            .collect()
    }

    /// Adjacency of `v` sorted by weight, then neighbor index.
    pub fn neighbors(&self, v: usize) -> Vec<Neighbor> {
        let mut neighbors = self.adjacency[v].clone();
        neighbors.sort_by_key(|e| (e.weight, e.to));
        neighbors
    }

    /// Lowest-index neighbor of `v` with a remaining edge.
    pub fn min_neighbor(&self, v: usize) -> Option<usize> {
        self.adjacency[v].iter().map(|e| e.to).min()
    }

    /// Every edge once per parallel copy (`from < to`), sorted by
    /// weight, then lower endpoint, then higher endpoint.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for e in neighbors {
                if u < e.to {
                    edges.push(Edge {
                        from: u,
                        to: e.to,
                        weight: e.weight,
                    });
                }
            }
        }
        edges.sort_by_key(|e| (e.weight, e.from, e.to));
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::UndirectedGraph;
    use crate::matrix::Matrix;

    fn line_matrix() -> Matrix {
        Matrix::new(vec![(0.0, 0.0), (1.0, 0.0), (3.0, 0.0), (6.0, 0.0)])
    }

    #[test]
    fn complete_graph_connects_every_pair_once() {
        let graph = UndirectedGraph::complete(&line_matrix());
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edges().len(), 6);
        for v in 0..4 {
            assert_eq!(graph.degree(v), 3);
        }
    }

    #[test]
    fn parallel_edges_are_kept_and_removed_one_at_a_time() {
        let mut graph = UndirectedGraph::empty(2);
        graph.add_edge(0, 1, 5);
        graph.add_edge(0, 1, 5);

        assert_eq!(graph.degree(0), 2);
        assert!(graph.remove_edge(0, 1));
        assert_eq!(graph.degree(0), 1);
        assert_eq!(graph.degree(1), 1);
        assert!(graph.remove_edge(1, 0));
        assert!(!graph.remove_edge(0, 1));
    }

    #[test]
    fn odd_vertices_are_listed_in_ascending_order() {
        let mut graph = UndirectedGraph::empty(5);
        graph.add_edge(0, 1, 1);
        graph.add_edge(1, 2, 1);
        graph.add_edge(2, 3, 1);

        assert_eq!(graph.odd_vertices(), vec![0, 3]);
    }

    #[test]
    fn edges_sort_by_weight_then_endpoints() {
        let mut graph = UndirectedGraph::empty(4);
        graph.add_edge(2, 3, 7);
        graph.add_edge(0, 3, 7);
        graph.add_edge(0, 1, 2);

        let edges: Vec<(usize, usize, u64)> =
            graph.edges().iter().map(|e| (e.from, e.to, e.weight)).collect();
        assert_eq!(edges, vec![(0, 1, 2), (0, 3, 7), (2, 3, 7)]);
    }

    #[test]
    fn neighbors_sort_by_weight_then_index() {
        let mut graph = UndirectedGraph::empty(4);
        graph.add_edge(0, 3, 4);
        graph.add_edge(0, 2, 4);
        graph.add_edge(0, 1, 9);

        let neighbors: Vec<usize> = graph.neighbors(0).iter().map(|e| e.to).collect();
        assert_eq!(neighbors, vec![2, 3, 1]);
    }

    #[test]
    fn min_neighbor_picks_the_lowest_index() {
        let mut graph = UndirectedGraph::empty(4);
        graph.add_edge(1, 3, 1);
        graph.add_edge(1, 2, 9);

        assert_eq!(graph.min_neighbor(1), Some(2));
        assert_eq!(graph.min_neighbor(0), None);
    }
}
