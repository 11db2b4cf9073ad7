use std::process::ExitCode;

use pushrelay::ui::output;

fn main() -> ExitCode {
    match pushrelay::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
