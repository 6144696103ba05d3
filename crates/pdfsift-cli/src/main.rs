mod classify_cmd;
mod cli;
mod logging;
mod preview_cmd;
mod run_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let log_file = match cli.command {
        cli::Commands::Run { ref log_file, .. } => log_file.as_deref(),
        _ => None,
    };
    if let Err(code) = logging::init(cli.verbose, cli.quiet, log_file) {
        std::process::exit(code);
    }

    let result = match cli.command {
        cli::Commands::Run {
            ref templates,
            ref input,
            ref output,
            workers,
            criteria_column,
            ..
        } => run_cmd::run(templates, input, output, workers, criteria_column),
        cli::Commands::Classify {
            ref templates,
            ref file,
            ref format,
        } => classify_cmd::run(templates, file, format),
        cli::Commands::Preview(ref args) => preview_cmd::run(args),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
