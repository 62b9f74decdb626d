use crate::error::Result;
use crate::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BYTES_PER_MEGABYTE: f64 = (1024 * 1024) as f64;

/// Writes fixture files from a single random source.
///
/// `Generator::new()` is seeded from system entropy, so two runs never
/// produce the same data. Use `with_seed` when a fixture must be
/// reproducible.
pub struct Generator {
    rng: StdRng,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Writes `format` for `panel` into any writer.
    pub fn write<W: Write>(&mut self, wtr: W, format: Format, panel: &Panel) -> Result<()> {
        format.write(wtr, panel, &mut self.rng)
    }

    /// Creates (or truncates) `path`, fills it and returns its size in bytes.
    ///
    /// The panel is checked before the file is touched, and the file is
    /// closed before its size is read.
    pub fn generate<P: AsRef<Path>>(&mut self, path: P, format: Format, panel: &Panel) -> Result<u64> {
        let path = path.as_ref();
        panel.validate()?;
        debug!(path = %path.display(), %format, rows = panel.row_count(), "creating fixture");
        self.write(File::create(path)?, format, panel)?;

        let size = fs::metadata(path)?.len();
        info!(path = %path.display(), bytes = size, "fixture written");
        Ok(size)
    }

    /// Generates `files` files named `{prefix}_{i}.{extension}`.
    ///
    /// `i` counts from 1 and is zero-padded to the width of `files`. Each
    /// file gets fresh SNP and sample ids continuing from the previous one;
    /// the ids of the last file are checked before the first is created.
    /// `progress` hears about every file as it starts and as it finishes.
    pub fn generate_batch<F>(
        &mut self,
        prefix: &str,
        format: Format,
        panel: &Panel,
        files: u64,
        mut progress: F,
    ) -> Result<Vec<(PathBuf, u64)>>
    where
        F: FnMut(BatchProgress),
    {
        if files == 0 {
            return Ok(vec![]);
        }
        panel.offset(files - 1)?;

        let mut written = Vec::new();
        for file in 0..files {
            let path = PathBuf::from(batch_file_name(prefix, format, file, files));
            progress(BatchProgress::Started(&path));
            let size = self.generate(&path, format, &panel.offset(file)?)?;
            progress(BatchProgress::Written(&path, size));
            written.push((path, size));
        }
        Ok(written)
    }
}

/// Per-file events of `Generator::generate_batch`
#[derive(Debug, PartialEq)]
pub enum BatchProgress<'a> {
    Started(&'a Path),
    /// Path and size in bytes
    Written(&'a Path, u64),
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// File name of the zero-based `file` out of `files` in a batch
pub fn batch_file_name(prefix: &str, format: Format, file: u64, files: u64) -> String {
    let width = files.to_string().len();
    format!(
        "{}_{:0width$}.{}",
        prefix,
        file + 1,
        format.extension(),
        width = width
    )
}

pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MEGABYTE
}
