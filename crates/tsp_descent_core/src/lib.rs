//! Symmetric planar TSP solving: a Christofides-style construction
//! (spanning tree, greedy odd-vertex matching, Euler shortcut) seeds a
//! multi-threaded 2-opt / relocate / or-opt descent to a local optimum.

mod algo;
mod error;
mod graph;
mod io;
mod location;
pub mod logging;
mod matrix;
pub mod solver;

pub use algo::christofides::christofides;
pub use algo::euler::{euler_circuit, shortcut};
pub use algo::local_search::LocalSearch;
pub use algo::matching::greedy_matching;
pub use algo::mst::minimum_spanning_tree;
pub use error::{Error, Result};
pub use graph::{Edge, Neighbor, UndirectedGraph};
pub use io::input::{parse_locations, read_input_text};
pub use io::options::{LogFormat, LogLevel, SolverOptions};
pub use io::output::{ComputingTimes, Solution, write_solution};
pub use location::Location;
pub use matrix::{Distance, Matrix, Row, SELF_DISTANCE};
