#![forbid(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod error;
pub mod util;

pub use cli::run_from_env;
pub use error::{CliError, Result};
