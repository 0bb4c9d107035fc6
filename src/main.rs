use azure_vnet_mermaid::cli::{normalize_args, Args};
use azure_vnet_mermaid::logging::init_logging;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    let args = Args::parse_from(normalize_args(std::env::args()));
    dotenv::dotenv().ok();

    if let Err(e) = init_logging(args.verbosity) {
        eprintln!("{e}");
        return ExitCode::from(e.exit_code());
    }
    log::info!("#Start main()");

    match azure_vnet_mermaid::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{} {e}", "error:".red());
            ExitCode::from(e.exit_code())
        }
    }
}
