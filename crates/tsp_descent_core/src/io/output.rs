use std::io::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::io::options::SolverOptions;
use crate::location::Location;
use crate::matrix::Distance;

/// Millisecond timing breakdown of the solver phases.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ComputingTimes {
    pub matrix_loading: u64,
    pub heuristic: u64,
    pub local_search: u64,
}

/// Final solution document.
///
/// `route` lists the coordinate pair of every tour vertex in visit
/// order; `tour` lists input indices in the same order. The cycle
/// closes implicitly from the last entry back to the first.
#[derive(Clone, Debug, Serialize)]
pub struct Solution {
    pub solution_cost: Distance,
    pub route: Vec<[f64; 2]>,
    pub tour: Vec<usize>,
    pub computing_times: ComputingTimes,
}

impl Solution {
    pub fn new(
        locations: &[Location],
        tour: &[usize],
        cost: Distance,
        computing_times: ComputingTimes,
    ) -> Self {
        Self {
            solution_cost: cost,
            route: tour.iter().map(|&v| [locations[v].x, locations[v].y]).collect(),
            tour: tour.iter().map(|&v| locations[v].index).collect(),
            computing_times,
        }
    }
}

/// Serialize the solution as pretty JSON to the configured output
/// path, or stdout when none.
pub fn write_solution(solution: &Solution, options: &SolverOptions) -> Result<()> {
    let document = serde_json::to_string_pretty(solution)
        .map_err(|e| Error::other(format!("solution serialization failed: {e}")))?;

    match options.output_path() {
        Some(path) => std::fs::write(path, document)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
