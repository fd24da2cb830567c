// src/cli/handlers/make_xml.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::fs;

use super::commons;
use crate::core::{script_loader, xml_generator::script::parse_removal_list};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Generates the Galaxy descriptor of one script."
)]
struct MakeXmlArgs {
    /// Script metadata file (`<script_id>.toml`).
    #[arg(short = 'i', long = "input_fp")]
    input_fp: String,

    /// Directory the descriptor is written to. Created if missing.
    #[arg(short = 'o', long = "output_dir")]
    output_dir: String,

    /// Comma-separated optional options to leave out of the descriptor.
    #[arg(short = 'r', long = "remove_opts")]
    remove_opts: Option<String>,

    /// Settings file to use instead of the default one.
    #[arg(long)]
    settings: Option<String>,
}

/// The main handler for the `make-xml` command.
pub fn handle(args: Vec<String>) -> Result<()> {
    let make_args = MakeXmlArgs::try_parse_from(&args)?;
    let settings = commons::load_settings(make_args.settings.as_deref())?;

    let script_path = commons::existing_path(&make_args.input_fp)?;
    let output_dir = commons::target_path(&make_args.output_dir)?;
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create '{}'", output_dir.display()))?;

    let remove = make_args
        .remove_opts
        .as_deref()
        .map(parse_removal_list)
        .unwrap_or_default();
    log::debug!("Options to remove: {:?}", remove);

    let written = script_loader::make_xml(&script_path, &output_dir, &remove, &settings)
        .with_context(|| format!("Failed to generate descriptor for '{}'", script_path.display()))?;

    println!(
        "{}",
        format!(t!("make_xml.success"), path = written.display()).green()
    );
    Ok(())
}
