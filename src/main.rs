use clap::Parser;
use dirsort::cli::{Cli, run_cli_with_config};
use dirsort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    dirsort::logging::init(cli.verbose, cli.quiet);

    match run_cli_with_config(
        cli.command(),
        &cli.directory,
        cli.config.as_deref(),
        cli.format(),
    ) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::from(2)
        }
    }
}
