use std::time::Instant;

use crate::algo::christofides::christofides;
use crate::algo::local_search::LocalSearch;
use crate::error::Result;
use crate::io::input::parse_locations;
use crate::io::options::SolverOptions;
use crate::io::output::{ComputingTimes, Solution};
use crate::matrix::{Distance, Matrix};

/// Solve the problem text end to end: load locations, build the
/// matrix, run the construction heuristic, then iterate the three
/// local-search operators until none improves.
pub fn solve(input: &str, options: &SolverOptions) -> Result<Solution> {
    let build_start = Instant::now();
    log::info!("matrix: start problem loading and matrix build");

    let locations = parse_locations(input)?;
    let matrix = Matrix::from_locations(&locations);

    let matrix_loading = elapsed_ms(build_start);
    log::info!("matrix: done n={} took_ms={matrix_loading}", matrix.len());

    let heuristic_start = Instant::now();
    log::info!("heuristic: start construction");

    let seed_tour = christofides(&matrix)?;
    let seed_cost = sequence_cost(&matrix, &seed_tour);

    let heuristic = elapsed_ms(heuristic_start);
    log::info!("heuristic: done cost={seed_cost} took_ms={heuristic}");

    let search_start = Instant::now();
    let mut search = LocalSearch::new(&matrix, &seed_tour, options.threads)?;
    log::info!("local search: start threads={}", search.thread_count());

    loop {
        let two_opt_gain = search.perform_all_two_opt_steps();
        let relocate_gain = search.perform_all_relocate_steps();
        let or_opt_gain = search.perform_all_or_opt_steps();
        if two_opt_gain == 0 && relocate_gain == 0 && or_opt_gain == 0 {
            break;
        }
    }

    let tour = search.tour(0);
    let cost = sequence_cost(&matrix, &tour);

    let local_search = elapsed_ms(search_start);
    log::info!(
        "local search: done cost={cost} improvement_pct={:.2} took_ms={local_search}",
        improvement_pct(seed_cost, cost)
    );

    Ok(Solution::new(
        &locations,
        &tour,
        cost,
        ComputingTimes {
            matrix_loading,
            heuristic,
            local_search,
        },
    ))
}

/// Tour cost in ordered-sequence form, closing last to first.
fn sequence_cost(matrix: &Matrix, tour: &[usize]) -> Distance {
    let n = tour.len();
    (0..n).map(|i| matrix.at(tour[i], tour[(i + 1) % n])).sum()
}

fn improvement_pct(seed_cost: Distance, cost: Distance) -> f64 {
    if seed_cost == 0 {
        return 0.0;
    }
    100.0 * (1.0 - cost as f64 / seed_cost as f64)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::{sequence_cost, solve};
    use crate::error::Error;
    use crate::io::options::SolverOptions;
    use crate::matrix::Matrix;

    fn options(threads: usize) -> SolverOptions {
        SolverOptions {
            threads,
            ..SolverOptions::default()
        }
    }

    #[test]
    fn square_query_reaches_the_perimeter_tour() {
        let solution =
            solve("loc=0,0&loc=0,10&loc=10,10&loc=10,0", &options(2)).expect("solve square");

        assert_eq!(solution.solution_cost, 40);
        assert_eq!(solution.tour, vec![0, 1, 2, 3]);
        assert_eq!(
            solution.route,
            vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]
        );
    }

    #[test]
    fn collinear_query_visits_endpoints_at_cycle_ends() {
        let solution =
            solve("loc=0,0&loc=1,0&loc=2,0&loc=3,0", &options(2)).expect("solve collinear");
        assert_eq!(solution.solution_cost, 6);
    }

    #[test]
    fn crossed_tsplib_square_is_solved_to_the_optimum() {
        let input = "DIMENSION : 4\nNODE_COORD_SECTION\n\
                     1 0 0\n2 10 10\n3 0 10\n4 10 0\nEOF\n";
        let solution = solve(input, &options(2)).expect("solve tsplib");

        assert_eq!(solution.solution_cost, 40);
        assert_eq!(solution.tour, vec![1, 3, 2, 4]);
    }

    #[test]
    fn duplicate_points_cost_the_double_link() {
        let solution =
            solve("loc=0,0&loc=0,0&loc=5,0&loc=5,0", &options(2)).expect("solve duplicates");
        assert_eq!(solution.solution_cost, 10);
    }

    #[test]
    fn right_triangle_costs_its_perimeter() {
        let solution = solve("loc=0,0&loc=3,0&loc=0,4", &options(2)).expect("solve triangle");
        assert_eq!(solution.solution_cost, 12);
    }

    #[test]
    fn a_single_location_fails_with_empty_problem() {
        let err = solve("loc=0,0", &options(1)).expect_err("single location");
        assert!(matches!(err, Error::EmptyProblem));
    }

    #[test]
    fn solution_is_independent_of_the_thread_count() {
        let mut rng = StdRng::seed_from_u64(4321);
        let records: Vec<String> = (0..30)
            .map(|_| {
                format!(
                    "loc={:.3},{:.3}",
                    rng.random_range(0.0..100.0),
                    rng.random_range(0.0..100.0)
                )
            })
            .collect();
        let input = records.join("&");

        let reference = solve(&input, &options(1)).expect("solve single-threaded");
        for threads in [2, 4, 8] {
            let solution = solve(&input, &options(threads)).expect("solve multi-threaded");
            assert_eq!(solution.solution_cost, reference.solution_cost);
            assert_eq!(solution.tour, reference.tour);
        }
    }

    #[test]
    fn sequence_cost_closes_the_cycle() {
        let matrix = Matrix::new(vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert_eq!(sequence_cost(&matrix, &[0, 1, 2, 3]), 40);
        assert_eq!(sequence_cost(&matrix, &[0, 2, 1, 3]), 48);
    }
}
