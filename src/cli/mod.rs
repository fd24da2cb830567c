use clap::Parser;

pub mod handlers;

/// Semantic tags of the help template and the ANSI style each one stands for.
const HELP_STYLES: &[(&str, &str)] = &[
    ("title", "\x1b[1;33m"),
    ("hl", "\x1b[1;36m"),
    ("hi", "\x1b[1m"),
    ("cmd", "\x1b[36m"),
    ("group", "\x1b[1;32m"),
    ("err", "\x1b[91m"),
    ("dim", "\x1b[2m"),
];

const RESET: &str = "\x1b[0m";

/// Renders the localized help template, dropping the styles when colors are off.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();
    let rendered = HELP_STYLES
        .iter()
        .fold(t!("cli.help.template").to_string(), |text, (tag, style)| {
            let (open, close) = if use_colors { (*style, RESET) } else { ("", "") };
            text.replace(&format!("<{}>", tag), open)
                .replace(&format!("</{}>", tag), close)
        });
    Box::leak(rendered.into_boxed_str())
}

/// toolwrap: compiles script option metadata into Galaxy tool wrapper descriptors.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// The command name followed by its own arguments. Each handler parses the rest.
    #[arg()]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_are_passed_through() {
        let cli = Cli::try_parse_from(["toolwrap", "make-xml", "-i", "a.toml", "-o", "out"]).unwrap();
        assert_eq!(cli.args, vec!["make-xml", "-i", "a.toml", "-o", "out"]);
    }

    #[test]
    fn test_help_template_has_no_raw_tags() {
        let help = build_help_string();
        assert!(!help.contains("<title>"));
        assert!(!help.contains("</cmd>"));
        assert!(help.contains("make-xml"));
    }
}
