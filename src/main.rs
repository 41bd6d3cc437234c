use clap::Parser;
use colored::*;
use frost_ranking::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();
    cli::setup_logging(&args);

    if let Err(error) = cli::run(args) {
        eprintln!("{} {:#}", "Error:".red().bold(), error);
        process::exit(cli::exit_code(&error));
    }
}
