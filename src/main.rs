use clap::Parser;
use trisignal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
