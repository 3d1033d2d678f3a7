use clap::{Parser, command};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::verify::VerifyArgs;

/// A simple tool to stress a cat-like utility with randomized files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub verify: VerifyArgs,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}
