use std::path::PathBuf;

use fdoc_model::CodecError;
use fdoc_style::RegistryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for a round trip that did not reproduce its input.
pub const MISMATCH_EXIT_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("style registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("input file does not exist: {path}")]
    MissingInput { path: PathBuf },

    #[error("round trip diverged at item {index}")]
    Mismatch { index: usize },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Mismatch { .. } => MISMATCH_EXIT_CODE,
            _ => 1,
        }
    }
}
