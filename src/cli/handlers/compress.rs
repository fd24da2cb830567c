// src/cli/handlers/compress.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons;
use crate::system::archive;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Packs a file or directory into a gzipped tarball."
)]
struct CompressArgs {
    /// File or directory to pack.
    #[arg(short = 'i', long = "input_path")]
    input_path: String,

    /// Archive to create.
    #[arg(short = 'o', long = "output_fp")]
    output_fp: String,
}

/// The main handler for the `compress` command.
pub fn handle(args: Vec<String>) -> Result<()> {
    let compress_args = CompressArgs::try_parse_from(&args)?;
    let input = commons::existing_path(&compress_args.input_path)?;
    let output = commons::target_path(&compress_args.output_fp)?;

    archive::compress_path(&input, &output)?;
    println!(
        "{}",
        format!(t!("compress.success"), path = output.display()).green()
    );
    Ok(())
}
