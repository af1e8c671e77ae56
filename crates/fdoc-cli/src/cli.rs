use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::codec::{
    DecodeArgs, EncodeArgs, RoundtripArgs, run_decode, run_encode, run_roundtrip, run_styles,
};
use crate::error::Result;
use crate::util::load_styles;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FDOC_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "fdoc",
    about = "Decode, encode and check frankendoc styled-run text",
    version
)]
pub struct Cli {
    /// JSON style configuration; the standard styles when omitted.
    #[arg(long, global = true)]
    pub styles: Option<PathBuf>,

    /// Log codec activity at debug level unless FDOC_LOG says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode flat items into a node tree.
    Decode(DecodeArgs),

    /// Encode a node tree into flat items.
    Encode(EncodeArgs),

    /// Decode then encode, and check the items come back unchanged.
    Roundtrip(RoundtripArgs),

    /// Print the active style registry as JSON.
    Styles,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_with_output(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let styles = load_styles(cli.styles.as_deref())?;
    match cli.command {
        Commands::Decode(args) => run_decode(&args, &styles, out),
        Commands::Encode(args) => run_encode(&args, &styles, out),
        Commands::Roundtrip(args) => run_roundtrip(&args, &styles, out).map(|_| ()),
        Commands::Styles => run_styles(&styles, out),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
