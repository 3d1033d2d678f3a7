use log::debug;
use rand::Rng as _;
use rand::distr::{Alphanumeric, SampleString as _};
use rand_pcg::Pcg64Mcg;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// One generate-write-invoke-compare cycle.
///
/// The file is left on disk when the trial fails, so that it can be inspected
/// manually; it is removed on success.
pub struct Trial {
    pub path: PathBuf,
    pub content: String,
}

/// Generate `size` characters drawn uniformly from ASCII letters and digits.
///
/// The alphabet is deliberately restricted to word characters: the verifier
/// trims trailing non-word characters from the program output, so payloads
/// must never end in one.
pub fn random_content(rng: &mut Pcg64Mcg, size: usize) -> String {
    Alphanumeric.sample_string(rng, size)
}

/// Write a random payload to a freshly named file under `directory`.
///
/// The directory is created if it does not exist. The file name carries a
/// random 4-digit suffix; collisions across runs are possible but harmless,
/// the file is simply overwritten.
pub fn materialize(
    rng: &mut Pcg64Mcg,
    directory: &Path,
    sizes: RangeInclusive<usize>,
) -> anyhow::Result<Trial> {
    let size = rng.random_range(sizes);
    let content = random_content(rng, size);
    fs::create_dir_all(directory)?;
    let path = directory.join(format!("random_file_{}.txt", rng.random_range(1000..=9999)));
    fs::write(&path, &content)?;
    debug!("materialized {} bytes at {}", content.len(), path.display());
    Ok(Trial { path, content })
}
