// src/bin/toolwrap.rs

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser};
use colored::*;
use toolwrap::{
    cli::{Cli, handlers},
    t,
};

// --- Command Definition and Registry ---

/// A command, its aliases, and its handler. Every handler takes the remaining arguments.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// Every command `toolwrap` knows. To add one, add an entry here and a handler module.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "compress",
        aliases: &[],
        handler: handlers::compress::handle,
    },
    CommandDefinition {
        name: "extract",
        aliases: &["uncompress"],
        handler: handlers::extract::handle,
    },
    CommandDefinition {
        name: "inspect",
        aliases: &[],
        handler: handlers::inspect::handle,
    },
    CommandDefinition {
        name: "integrate",
        aliases: &[],
        handler: handlers::integrate::handle,
    },
    CommandDefinition {
        name: "make-xml",
        aliases: &["xml"],
        handler: handlers::make_xml::handle,
    },
];

/// Finds a command definition by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Sets up logging, dispatches to the handler and reports any error.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Clap errors (including `--help` of a subcommand) render themselves.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            let _ = clap_err.print();
            std::process::exit(clap_err.exit_code());
        }
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut args = cli.args.into_iter();
    let Some(command_name) = args.next() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let command = find_command(&command_name)
        .ok_or_else(|| anyhow!(t!("error.unknown_command"), name = command_name))?;
    (command.handler)(args.collect())
}
