//! The bibcite command-line executable.

mod app;
mod cli;

use bibcite_lib::error::SplitError;
use std::process::ExitCode;

fn main() -> ExitCode {
    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<SplitError>() {
                Some(missing) if matches!(missing, SplitError::MissingInput(_)) => {
                    eprintln!("{missing}")
                }
                _ => eprintln!("Error: {err:?}"),
            }
            ExitCode::FAILURE
        }
    }
}
