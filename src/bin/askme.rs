//! AskMe CLI binary.

use std::process;

use askme::cli::{args::*, commands::*};
use clap::Parser;
use log::LevelFilter;

fn main() {
    // Parse command line arguments using clap
    let args = AskmeArgs::parse();

    // RUST_LOG, when set, takes precedence over the verbosity flags
    let level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
