use clap::Parser;
use peascreen::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
