use anyhow::anyhow;
use clap::Args;
use log::debug;
use parse_size::parse_size;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use crate::generate::{Trial, materialize};
use crate::prompt_trial_count;

/// The completion message the program under test appends after the file
/// content, e.g. `Completed reading 'f.txt': Duration = 0.01 seconds,
/// File Size = 2048 bytes.` surrounded by newlines.
static TRAILER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\nCompleted reading.*?bytes\.\n").unwrap());

/// Incidental trailing newlines or formatting added by the program under
/// test, trimmed before comparison. Safe only because generated payloads are
/// strictly alphanumeric.
static TRAILING_JUNK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+$").unwrap());

/// Verify a file-reading utility against randomized payloads
///
/// Each trial writes a random alphanumeric payload to a file, runs the
/// utility with that file path as its sole argument, strips the completion
/// trailer from the captured output and compares the rest to the payload.
/// The loop stops on the first failed trial; failing files are kept on disk.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// The file-reading utility under test
    ///
    /// Must accept a file path as its sole argument and print the file
    /// content followed by a "Completed reading ... bytes." trailer line
    #[arg()]
    pub program: PathBuf,

    /// The number of files to generate and test
    ///
    /// Prompted for interactively when not provided
    #[clap(short, long)]
    pub count: Option<u32>,

    /// The directory where generated files are placed
    #[clap(short, long, env = "PWD", default_value = ".")]
    pub directory: PathBuf,

    /// The smallest payload size
    #[clap(long, default_value = "1Ki")]
    pub min_size: String,

    /// The largest payload size
    #[clap(long, default_value = "4Ki")]
    pub max_size: String,

    /// The random generator seed
    ///
    /// An hexadecimal notation is expected. The size can't exceed 16 bytes
    #[clap(short = 'S', long)]
    pub seed: Option<String>,
}

pub fn verify(args: &VerifyArgs) -> anyhow::Result<i32> {
    let min_size = parse_size(&args.min_size)? as usize;
    let max_size = parse_size(&args.max_size)? as usize;
    if min_size == 0 || min_size > max_size {
        return Err(anyhow!(
            "Invalid payload size range {min_size}..={max_size}. \
             The minimum must be non-zero and not exceed the maximum."
        ));
    }
    let mut rng = if let Some(seed_hex) = &args.seed {
        let mut seed = [0u8; 16];
        hex::decode_to_slice(format!("{:0>32}", seed_hex), &mut seed)?;
        debug!("seed: {}", hex::encode(seed));
        Pcg64Mcg::from_seed(seed)
    } else {
        Pcg64Mcg::from_os_rng()
    };
    debug!("payload sizes: {min_size}..={max_size}");
    debug!("directory: {}", args.directory.display());

    let count = match args.count {
        Some(count) => count,
        None => prompt_trial_count()?,
    };
    debug!("trials: {count}");

    for _ in 0..count {
        let trial = materialize(&mut rng, &args.directory, min_size..=max_size)?;
        println!("File created at: {}", trial.path.display());
        if !run_program(&args.program, &trial) {
            break;
        }
    }
    Ok(0)
}

/// Run one trial against the program under test.
///
/// Errors while spawning the program or scrubbing its output never escape:
/// they are reported on the console and count as a failed trial.
pub fn run_program(program: &Path, trial: &Trial) -> bool {
    match check_output(program, trial) {
        Ok(passed) => passed,
        Err(err) => {
            println!("An error occurred: {err}");
            false
        }
    }
}

fn check_output(program: &Path, trial: &Trial) -> anyhow::Result<bool> {
    let output = Command::new(program).arg(&trial.path).output()?;
    debug!(
        "{} exited with {}, {} bytes on stdout",
        program.display(),
        output.status,
        output.stdout.len()
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let (trailer, cleaned) = scrub_output(&stdout);

    if cleaned == trial.content {
        println!("{}", trailer.trim());
        println!("Successful: Content matches.");
        fs::remove_file(&trial.path)?;
        Ok(true)
    } else {
        println!("Fail: Content does not match.");
        println!("Detail comparison:");
        println!("Expected: {}", trial.content);
        println!("Received: {cleaned}");
        Ok(false)
    }
}

/// Split the captured output into the completion trailer and the echoed
/// content, with the trailer and any trailing run of non-word characters
/// removed from the latter.
fn scrub_output(stdout: &str) -> (String, String) {
    let trailer = TRAILER_RE.find(stdout).map(|m| m.as_str().to_owned()).unwrap_or_default();
    let cleaned = TRAILER_RE.replace_all(stdout, "");
    let cleaned = TRAILING_JUNK_RE.replace(&cleaned, "").into_owned();
    (trailer, cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrub_splits_trailer_from_content() {
        let stdout = "abc123\nCompleted reading 'f.txt': Duration = 0.01 seconds, \
                      File Size = 6 bytes.\n";
        let (trailer, cleaned) = scrub_output(stdout);
        assert!(trailer.trim().starts_with("Completed reading"));
        assert!(trailer.trim().ends_with("bytes."));
        assert_eq!(cleaned, "abc123");
    }

    #[test]
    fn scrub_accepts_minimal_trailer() {
        let (trailer, cleaned) = scrub_output("abc123\nCompleted reading 6 bytes.\n");
        assert_eq!(trailer.trim(), "Completed reading 6 bytes.");
        assert_eq!(cleaned, "abc123");
    }

    #[test]
    fn scrub_tolerates_trailing_newlines() {
        let (_, cleaned) = scrub_output("payload77\n\nCompleted reading 9 bytes.\n\n\n");
        assert_eq!(cleaned, "payload77");
    }

    #[test]
    fn scrub_of_empty_output_is_empty() {
        let (trailer, cleaned) = scrub_output("");
        assert!(trailer.is_empty());
        assert!(cleaned.is_empty());
    }

    #[test]
    fn dropped_character_is_a_mismatch() {
        let trial = Trial { path: PathBuf::from("unused.txt"), content: "abc123".into() };
        let (_, cleaned) = scrub_output("abc12\nCompleted reading 6 bytes.\n");
        assert_ne!(cleaned, trial.content);
    }

    #[test]
    fn missing_program_is_reported_not_fatal() {
        let trial = Trial {
            path: PathBuf::from("/nonexistent/random_file_0000.txt"),
            content: "x".into(),
        };
        assert!(!run_program(Path::new("/nonexistent/my_cat"), &trial));
    }
}
