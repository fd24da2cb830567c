// src/cli/handlers/integrate.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

use super::commons;
use crate::core::integration::{self, IntegrationOptions, IntegrationReport};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Generates every configured descriptor and registers them in tool_conf.xml."
)]
struct IntegrateArgs {
    /// Directory holding the script metadata files.
    #[arg(short = 'i', long = "scripts_dir")]
    scripts_dir: String,

    /// Galaxy installation directory.
    #[arg(short = 'g', long = "galaxy_dist_dir")]
    galaxy_dist_dir: String,

    /// Integration config declaring the sections and the placement of each script.
    #[arg(short = 'c', long = "config_file")]
    config_file: String,

    /// Merge into the existing tool_conf.xml instead of replacing it.
    #[arg(short = 'u', long = "update_tool_conf", visible_alias = "update")]
    update_tool_conf: bool,

    /// Integration log. Defaults to `<scripts_dir>/integration.log`.
    #[arg(short = 'l', long = "log_fp")]
    log_fp: Option<String>,

    /// Do not ask before replacing tool_conf.xml.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Settings file to use instead of the default one.
    #[arg(long)]
    settings: Option<String>,
}

/// The main handler for the `integrate` command.
pub fn handle(args: Vec<String>) -> Result<()> {
    let integrate_args = IntegrateArgs::try_parse_from(&args)?;
    let settings = commons::load_settings(integrate_args.settings.as_deref())?;

    let options = IntegrationOptions {
        scripts_dir: commons::existing_path(&integrate_args.scripts_dir)?,
        galaxy_dir: commons::existing_path(&integrate_args.galaxy_dist_dir)?,
        config_path: commons::existing_path(&integrate_args.config_file)?,
        update: integrate_args.update_tool_conf,
        log_path: integrate_args
            .log_fp
            .as_deref()
            .map(commons::target_path)
            .transpose()?,
    };

    let registry_path = integration::check_galaxy_root(&options.galaxy_dir)?;
    if !options.update
        && !integrate_args.yes
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                t!("integrate.prompt.overwrite_registry"),
                path = registry_path.display()
            ))
            .default(false)
            .interact()?
    {
        println!("\n{}", t!("common.info.operation_cancelled"));
        return Ok(());
    }

    println!(
        "{}",
        format!(t!("integrate.info.start"), dir = options.scripts_dir.display()).bold()
    );
    let report = integration::integrate(&options, &settings)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &IntegrationReport) {
    for id in &report.generated {
        println!("  {} {}", "ok".green(), id);
    }
    for id in &report.skipped {
        println!("  {} {}", "skipped".yellow(), id.dimmed());
    }
    for (id, reason) in &report.failed {
        println!("  {} {}: {}", "failed".red(), id, reason);
    }

    println!(
        "\n{}",
        format!(
            t!("integrate.summary"),
            generated = report.generated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len()
        )
        .bold()
    );
    if report.registry_written {
        println!(
            "{}",
            format!(
                t!("integrate.info.registry_written"),
                path = report.registry_path.display()
            )
            .green()
        );
    } else {
        println!("{}", t!("integrate.info.registry_unchanged").dimmed());
    }
    println!(
        "{}",
        format!(t!("integrate.info.log_written"), path = report.log_path.display()).dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = IntegrateArgs::try_parse_from([
            "-i", "scripts", "-g", "galaxy", "-c", "conf.toml", "--update_tool_conf", "-y",
        ])
        .unwrap();
        assert!(args.update_tool_conf);
        assert!(args.yes);
        assert!(args.log_fp.is_none());
    }

    #[test]
    fn test_config_is_required() {
        assert!(IntegrateArgs::try_parse_from(["-i", "scripts", "-g", "galaxy"]).is_err());
    }
}
