use std::process::ExitCode;

use log::info;

use tsp_descent_core::{Result, SolverOptions, logging, read_input_text, solver, write_solution};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("tsp-descent: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    let input = read_input_text(&options)?;
    let solution = solver::solve(&input, &options)?;
    write_solution(&solution, &options)
}
