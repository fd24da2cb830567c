// src/cli/handlers/inspect.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons;
use crate::core::{script_loader, xml_generator::command};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the normalized option model of a script, or its command template."
)]
struct InspectArgs {
    /// Script metadata file (`<script_id>.toml`).
    script: String,

    /// Print the generated command template instead of the model.
    #[arg(long)]
    command: bool,

    /// Settings file to use instead of the default one.
    #[arg(long)]
    settings: Option<String>,
}

/// The main handler for the `inspect` command.
pub fn handle(args: Vec<String>) -> Result<()> {
    let inspect_args = InspectArgs::try_parse_from(&args)?;
    let script_path = commons::existing_path(&inspect_args.script)?;
    let script = script_loader::load_script(&script_path)?;

    if inspect_args.command {
        let settings = commons::load_settings(inspect_args.settings.as_deref())?;
        println!("{}", command::build_command(&script, &settings.archive)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(t!("inspect.header"), id = script.id).yellow().bold()
    );
    println!("{}", serde_json::to_string_pretty(&script)?);
    Ok(())
}
