use std::process::ExitCode;

use tracing::error;

mod app;

fn main() -> ExitCode {
    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(error = %message, "startup_failed");
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}
