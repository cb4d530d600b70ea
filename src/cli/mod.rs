//! Command line interface

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::debug;

use crate::client::{DiscordApi, DiscordClient};
use crate::config::{CredentialSources, PartialCredentials, config_instructions, resolve_credentials};
use crate::error::{Error, Result};
use crate::output::report_file::DEFAULT_OUTPUT_DIR;
use crate::output::{OutputFormat, ReportWriter};
use crate::reporters::{ALL_REPORTS_DELAY, ReportKind, RunOptions, Streams, run_all, run_report};

/// Command list printed after an unknown command
pub const AVAILABLE_COMMANDS: &str =
    "Available commands: roles, channels, members, emojis, permissions, all";

/// guildscope - reports on a Discord guild's roles, channels, members,
/// emojis and permissions
#[derive(Parser, Debug)]
#[command(name = "guildscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Report to run: roles, channels, members, emojis, permissions or all
    pub command: Option<String>,

    /// Discord bot token
    pub token: Option<String>,

    /// Guild (server) ID
    pub guild_id: Option<String>,

    /// Output format (pretty, json)
    #[arg(
        long,
        env = "GUILDSCOPE_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Directory JSON reports are written to
    #[arg(long, env = "GUILDSCOPE_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR, hide_env = true)]
    pub output_dir: PathBuf,

    /// Enable debug logging
    #[arg(long, env = "GUILDSCOPE_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Discord API base URL
    #[arg(long, env = "GUILDSCOPE_API_BASE", hide = true)]
    pub api_base: Option<String>,
}

/// Help shown when no command is given
pub fn usage() -> String {
    let mut text = String::from("guildscope - Discord guild reports\n");
    text.push_str("==================================\n\n");
    text.push_str("Usage: guildscope [OPTIONS] <command> [BOT_TOKEN] [GUILD_ID]\n\n");
    text.push_str("Available commands:\n");
    for (command, description) in [
        ("roles", "Fetch and display all roles"),
        ("channels", "Fetch and display all channels and categories"),
        ("members", "Fetch and display all members"),
        ("emojis", "Fetch and display all emojis and stickers"),
        ("permissions", "Analyze role permissions and hierarchy"),
        ("all", "Run all commands sequentially"),
    ] {
        text.push_str(&format!("  {:<12} - {}\n", command, description));
    }
    text.push_str("\nOptions:\n");
    text.push_str("  --format <pretty|json>  Print tables or JSON payloads\n");
    text.push_str("  --output-dir <DIR>      Where roles and members reports are saved (default: output)\n");
    text.push_str("  --debug                 Enable debug logging\n");
    text.push_str("\nExamples:\n");
    text.push_str("  guildscope roles YOUR_TOKEN YOUR_GUILD_ID\n");
    text.push_str("  guildscope all YOUR_TOKEN YOUR_GUILD_ID\n");
    text.push_str("  guildscope --format json members\n");
    text
}

/// Extra help printed to stdout after an error
pub fn error_help(err: &Error) -> Option<String> {
    match err {
        Error::UnknownCommand(_) => Some(AVAILABLE_COMMANDS.to_string()),
        Error::MissingCredentials { command } => Some(format!(
            "Usage: guildscope {} <BOT_TOKEN> <GUILD_ID>\n{}",
            command,
            config_instructions()
        )),
        _ => None,
    }
}

/// Parse the command, resolve credentials and run the report(s).
pub async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command.as_deref() else {
        println!("{}", usage());
        println!("{}", config_instructions());
        return Ok(());
    };

    let kind: ReportKind = command.parse().map_err(Error::UnknownCommand)?;

    let resolved = resolve_credentials(
        PartialCredentials::new(cli.token.clone(), cli.guild_id.clone()),
        &CredentialSources::system(),
    );
    let credentials = resolved.complete().ok_or_else(|| Error::MissingCredentials {
        command: kind.name().to_string(),
    })?;
    debug!("Running {} for guild {}", kind, credentials.guild_id);

    let client = DiscordClient::new(credentials.token.clone(), cli.api_base.as_deref())?;
    let api: Arc<dyn DiscordApi> = Arc::new(client);
    let options = RunOptions {
        format: cli.format,
        writer: ReportWriter::new(&cli.output_dir),
    };

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let mut streams = Streams {
        out: &mut out,
        err: &mut err,
    };

    match kind.reporter() {
        Some(reporter) => {
            run_report(reporter.as_ref(), api, &credentials, &options, &mut streams).await
        }
        None => run_all(api, &credentials, &options, &mut streams, ALL_REPORTS_DELAY).await,
    }
}
