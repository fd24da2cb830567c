// src/cli/handlers/extract.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons;
use crate::system::archive::{self, ExtractOutcome};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Unpacks a tarball. Inputs that are not archives are copied as is."
)]
struct ExtractArgs {
    /// Archive to unpack.
    #[arg(short = 'i', long = "input_fp")]
    input_fp: String,

    /// Destination: the file itself for single-member archives, a directory otherwise.
    #[arg(short = 'o', long = "output_path")]
    output_path: String,

    /// Fail on non-archive input instead of copying it.
    #[arg(long)]
    strict: bool,
}

/// The main handler for the `extract` command.
pub fn handle(args: Vec<String>) -> Result<()> {
    let extract_args = ExtractArgs::try_parse_from(&args)?;
    let input = commons::existing_path(&extract_args.input_fp)?;
    let output = commons::target_path(&extract_args.output_path)?;

    let outcome = if extract_args.strict {
        archive::extract_archive(&input, &output)?
    } else {
        archive::extract_or_copy(&input, &output)?
    };

    match outcome {
        ExtractOutcome::Copied => println!(
            "{}",
            format!(t!("extract.info.copied"), path = output.display()).yellow()
        ),
        ExtractOutcome::SingleMember | ExtractOutcome::Directory { .. } => println!(
            "{}",
            format!(t!("extract.success"), path = output.display()).green()
        ),
    }
    Ok(())
}
