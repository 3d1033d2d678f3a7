#[macro_use]
extern crate log;

use clap::Parser;

use catcheck::cli;

use catcheck::verify::verify;

fn run() -> anyhow::Result<i32> {
    let cli = cli::Cli::parse();
    if let Some(level) = cli.verbose.log_level() {
        ocli::init(level).unwrap();
    }

    verify(&cli.verify)
}

fn main() {
    match run() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}
