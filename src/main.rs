use std::process::ExitCode;

fn main() -> ExitCode {
    cmdjson::cli::run()
}
