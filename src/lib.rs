use std::io::{self, Write as _};

extern crate log;

pub mod cli;
pub mod generate;
pub mod verify;

/// Ask on the console how many trials to run.
///
/// Used when `--count` is not given, to keep the harness usable as a purely
/// interactive tool. A non-integer answer is a fatal error.
pub fn prompt_trial_count() -> anyhow::Result<u32> {
    print!("Enter the number of files to generate and test: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().parse()?)
}
