use anyhow::Context;
use clap::Parser;
use std::process;
use ugs_extract::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    // Database access is the only async work and it is sequential
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    // A report that could not be written was already shown to the user
    runtime.block_on(commands::run(args))?;
    Ok(())
}
