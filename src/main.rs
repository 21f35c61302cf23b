use clap::Parser;
use quantdesk::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
