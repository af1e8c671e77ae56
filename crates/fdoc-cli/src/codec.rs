use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use fdoc_model::markup::to_markup;
use fdoc_model::{
    EncodeOptions, Item, Node, TreeSink, canonicalize, decode_with_stats, encode_to_vec,
};
use fdoc_style::{StyleConfig, StyleRegistry};
use serde::Serialize;

use crate::error::{CliError, Result};
use crate::util::read_input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TreeFormat {
    /// Compact escaped markup, e.g. `<b>a</b>`.
    #[default]
    Markup,
    /// Node tree as JSON.
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct DecodeArgs {
    /// JSON array of items; stdin when omitted or `-`.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = TreeFormat::Markup)]
    pub format: TreeFormat,
}

#[derive(Debug, Clone, Args)]
pub struct EncodeArgs {
    /// JSON array of nodes; stdin when omitted or `-`.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Merge adjacent unstyled characters into one item.
    #[arg(long)]
    pub coalesce: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RoundtripArgs {
    /// JSON array of items; stdin when omitted or `-`.
    #[arg(long, short)]
    pub input: Option<PathBuf>,
}

/// Summary printed by a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundtripReport {
    pub items: usize,
    pub top_level: usize,
    pub wrappers_opened: usize,
    pub wrappers_reused: usize,
}

pub fn run_decode(args: &DecodeArgs, styles: &StyleRegistry, out: &mut dyn Write) -> Result<()> {
    let items: Vec<Item> = serde_json::from_str(&read_input(args.input.as_deref())?)?;
    let (nodes, _) = decode_with_stats(&items, &mut TreeSink, styles)?;
    match args.format {
        TreeFormat::Markup => writeln!(out, "{}", to_markup(&nodes))?,
        TreeFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &nodes)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn run_encode(args: &EncodeArgs, styles: &StyleRegistry, out: &mut dyn Write) -> Result<()> {
    let nodes: Vec<Node> = serde_json::from_str(&read_input(args.input.as_deref())?)?;
    let options = EncodeOptions {
        coalesce_plain: args.coalesce,
    };
    let items = encode_to_vec(&nodes, styles, options)?;
    serde_json::to_writer(&mut *out, &items)?;
    writeln!(out)?;
    Ok(())
}

pub fn run_roundtrip(
    args: &RoundtripArgs,
    styles: &StyleRegistry,
    out: &mut dyn Write,
) -> Result<RoundtripReport> {
    let items: Vec<Item> = serde_json::from_str(&read_input(args.input.as_deref())?)?;
    let (nodes, stats) = decode_with_stats(&items, &mut TreeSink, styles)?;
    let back = encode_to_vec(&nodes, styles, EncodeOptions::coalesced())?;
    let expected = canonicalize(items.iter().cloned());

    if let Some(index) = first_mismatch(&expected, &back) {
        tracing::warn!(index, "round trip diverged");
        return Err(CliError::Mismatch { index });
    }

    let report = RoundtripReport {
        items: items.len(),
        top_level: nodes.len(),
        wrappers_opened: stats.wrappers_opened,
        wrappers_reused: stats.wrappers_reused,
    };
    serde_json::to_writer(&mut *out, &report)?;
    writeln!(out)?;
    Ok(report)
}

pub fn run_styles(styles: &StyleRegistry, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &StyleConfig::from_registry(styles))?;
    writeln!(out)?;
    Ok(())
}

fn first_mismatch(expected: &[Item], actual: &[Item]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then_some(expected.len().min(actual.len())))
}
