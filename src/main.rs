use clap::Parser;

use polish::cli::{normalize_args, Cli};
use polish::run;

fn main() {
    env_logger::init();
    let cli = Cli::parse_from(normalize_args(std::env::args()));
    if let Err(err) = run(&cli) {
        eprintln!("error: {:#}", anyhow::Error::from(err));
        std::process::exit(1);
    }
}
