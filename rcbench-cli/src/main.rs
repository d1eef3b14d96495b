// rcbench-cli/src/main.rs
//
// Entry point for the `rcbench` binary.
//
// Responsibilities include:
// - Parsing user-provided arguments.
// - Setting up logging (console, or console plus a run log for `run`).
// - Dispatching to the subcommand implementations in `commands`.
// - Reporting errors and managing the process exit code.

use rcbench_core::external::SystemProcessRunner;
use rcbench_core::terminal;
use rcbench_cli::error::{CliResult, suggestion_for};
use rcbench_cli::logging::{init_console_logging, init_file_logging, level_for};
use rcbench_cli::{
    Commands, parse_cli, resolve_run_config, run_bench, run_probe, run_reduce, run_variants,
};
use std::process;

fn main() {
    let cli = parse_cli();
    let level = level_for(cli.verbose);

    // Set once a logger is installed; until then errors go straight to stderr.
    let mut logging_ready = false;

    let result: CliResult<()> = match cli.command {
        Commands::Run(args) => resolve_run_config(&args).and_then(|config| {
            match &config.log_dir {
                Some(dir) => {
                    let log_path = init_file_logging(level, dir)?;
                    log::debug!("Run log: {}", log_path.display());
                }
                None => init_console_logging(level),
            }
            logging_ready = true;
            run_bench(&SystemProcessRunner, &config, args.reduce)
        }),
        Commands::Reduce(args) => {
            init_console_logging(level);
            logging_ready = true;
            run_reduce(args)
        }
        Commands::Probe(args) => {
            init_console_logging(level);
            logging_ready = true;
            run_probe(args)
        }
        Commands::Variants(args) => {
            init_console_logging(level);
            logging_ready = true;
            run_variants(args)
        }
    };

    if let Err(e) = result {
        if logging_ready {
            terminal::print_error("Error", &e.to_string(), suggestion_for(&e));
        } else {
            eprintln!("Error: {e}");
            if let Some(hint) = suggestion_for(&e) {
                eprintln!("Suggestion: {hint}");
            }
        }
        process::exit(1);
    }
}
