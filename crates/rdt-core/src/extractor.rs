//! [`SeedSource`] backed by the external `rdt_seed_extractor` binary.
//!
//! The binary reads sensor files and prints a 256-bit seed in the format
//! chosen by a flag (`-b`, `-c`, `-u`; hex by default). A non-zero exit is
//! surfaced as [`SeedError::ExtractorFailed`] carrying the binary's stderr.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SeedError;
use crate::seed::{SeedFormat, SeedOutput, SeedSource, check_inputs, decode_output};

/// File name of the extractor binary.
pub const EXTRACTOR_BINARY: &str = "rdt_seed_extractor";

/// Handle to a located extractor binary.
#[derive(Debug, Clone)]
pub struct ExtractorProcess {
    binary: PathBuf,
}

impl ExtractorProcess {
    /// Use an explicit binary path.
    pub fn new(binary: impl Into<PathBuf>) -> Result<Self, SeedError> {
        let binary = binary.into();
        if !binary.is_file() {
            return Err(SeedError::BinaryNotFound {
                searched: vec![binary],
            });
        }
        Ok(Self { binary })
    }

    /// Find [`EXTRACTOR_BINARY`] in the first of `dirs` that contains it.
    pub fn discover(dirs: &[PathBuf]) -> Result<Self, SeedError> {
        let candidates: Vec<PathBuf> = dirs.iter().map(|d| d.join(EXTRACTOR_BINARY)).collect();
        match candidates.iter().find(|c| c.is_file()) {
            Some(found) => {
                log::debug!("using seed extractor at {}", found.display());
                Ok(Self {
                    binary: found.clone(),
                })
            }
            None => Err(SeedError::BinaryNotFound {
                searched: candidates,
            }),
        }
    }

    /// Default search order: parent of the executable's directory, the
    /// executable's directory, then the working directory.
    pub fn default_search_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            if let Some(parent) = exe_dir.parent() {
                dirs.push(parent.to_path_buf());
            }
            dirs.push(exe_dir);
        }
        dirs.push(PathBuf::from("."));
        dirs
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl SeedSource for ExtractorProcess {
    fn extract(&self, inputs: &[PathBuf], format: SeedFormat) -> Result<SeedOutput, SeedError> {
        check_inputs(inputs)?;

        let mut cmd = Command::new(&self.binary);
        if let Some(flag) = format.extractor_flag() {
            cmd.arg(flag);
        }
        cmd.args(inputs);
        log::debug!(
            "running {} ({format}) on {} input file(s)",
            self.binary.display(),
            inputs.len()
        );

        let output = cmd.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::warn!("seed extractor exited with {}: {stderr}", output.status);
            return Err(SeedError::ExtractorFailed {
                status: output.status.code(),
                stderr,
            });
        }
        decode_output(format, output.stdout)
    }
}
