//! Binary entrypoint for the `codescribe` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env is fine; set variables always win.
    let _ = dotenvy::dotenv();
    match codescribe::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
