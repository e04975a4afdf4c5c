// Entrypoint for the CLI application.
// - Keeps `main` small: read the environment, run one command, report.
// - Every failure is printed once with the `ERROR:` prefix and exits 1.

use apod_cli::{commands, config::Config, logging, ui};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let mut stdout = std::io::stdout().lock();
    commands::run(args, &config, &mut stdout)
}
