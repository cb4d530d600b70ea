//! Guild reports
//!
//! Every report runs through the same skeleton: validate, connect, fetch
//! the guild, collect, render, persist (roles and members only), close.

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use log::{debug, warn};
use serde_json::{Value, json};

use crate::client::{DiscordApi, Guild};
use crate::config::Credentials;
use crate::error::{CODE_MISSING_ACCESS, CODE_MISSING_PERMISSIONS, CODE_UNKNOWN_GUILD, Error, Result};
use crate::output::export::{
    render_array_export, render_comma_list, render_map_export, render_separator,
};
use crate::output::json::format_json;
use crate::output::{OutputFormat, ReportWriter};
use crate::session::Session;

pub mod channels;
pub mod emojis;
pub mod members;
pub mod permissions;
pub mod roles;

/// Pause between reports when running all of them
pub const ALL_REPORTS_DELAY: Duration = Duration::from_secs(1);

/// Width of the banner printed before each report in `all`
const BANNER_WIDTH: usize = 80;

/// A rendered report and the data behind it
#[derive(Debug, Clone)]
pub struct Report {
    /// File stem and JSON label (`roles`, `members`, ...)
    pub category: &'static str,
    /// Human-readable output
    pub text: String,
    /// Structured data, persisted or printed with `--format json`
    pub payload: Value,
    /// Write the payload to disk after rendering
    pub persist: bool,
    /// Nothing was found; no footer, no file
    pub empty: bool,
}

impl Report {
    pub fn new(category: &'static str, text: String, payload: Value) -> Self {
        Self {
            category,
            text,
            payload,
            persist: false,
            empty: false,
        }
    }

    /// A report for a guild with nothing to show
    pub fn empty(category: &'static str, message: &str, payload: Value) -> Self {
        Self {
            category,
            text: format!("{}\n", message),
            payload,
            persist: false,
            empty: true,
        }
    }

    pub fn persistent(mut self) -> Self {
        self.persist = true;
        self
    }
}

/// Line buffer for report text
#[derive(Debug, Default)]
pub struct Text(String);

impl Text {
    /// Append `s` followed by a newline.
    pub fn line(&mut self, s: impl AsRef<str>) -> &mut Self {
        self.0.push_str(s.as_ref());
        self.0.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.0.push('\n');
        self
    }

    pub fn separator(&mut self, width: usize) -> &mut Self {
        self.line(render_separator(width, '='))
    }

    /// The three copy-paste encodings of the same id list.
    pub fn exports<T>(
        &mut self,
        label: &str,
        array_binding: &str,
        map_binding: &str,
        items: &[T],
        id_of: impl Fn(&T) -> String,
        name_of: impl Fn(&T) -> String,
    ) -> &mut Self {
        let named: &dyn Fn(&T) -> String = &name_of;

        self.line(format!("\n📋 {} IDs (copy-paste format):\n", label));
        self.line(render_array_export(array_binding, items, &id_of, Some(named)));
        self.line("📋 Comma-separated IDs:");
        self.line(render_comma_list(items, &id_of));
        self.blank();
        self.line(format!("📋 {} IDs with names (object format):", label));
        self.line(render_map_export(map_binding, items, &id_of, &name_of))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// `{id, name}` of the guild, shared by every payload
pub fn guild_json(guild: &Guild) -> Value {
    json!({ "id": guild.id, "name": guild.name })
}

/// One entity report
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Report name (`roles`, `channels`, ...)
    fn category(&self) -> &'static str;

    /// What the error line says was going on
    fn action(&self) -> String {
        format!("fetching {}", self.category())
    }

    /// What the missing-permission hint says the bot can't view
    fn subject(&self) -> &'static str {
        self.category()
    }

    /// Printed once the guild is known
    fn heading(&self, guild: &Guild) -> String {
        format!(
            "📋 Fetching {} from: {} ({})\n",
            self.category(),
            guild.name,
            guild.id
        )
    }

    /// Fetch the collections and render the report.
    async fn collect(&self, session: &Session, guild: &Guild) -> Result<Report>;
}

/// Commands accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Roles,
    Channels,
    Members,
    Emojis,
    Permissions,
    All,
}

impl ReportKind {
    /// Order used by `all`
    pub const SEQUENCE: [ReportKind; 5] = [
        ReportKind::Roles,
        ReportKind::Channels,
        ReportKind::Members,
        ReportKind::Emojis,
        ReportKind::Permissions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::Roles => "roles",
            ReportKind::Channels => "channels",
            ReportKind::Members => "members",
            ReportKind::Emojis => "emojis",
            ReportKind::Permissions => "permissions",
            ReportKind::All => "all",
        }
    }

    /// The reporter behind a single report; `None` for `all`.
    pub fn reporter(self) -> Option<Box<dyn Reporter>> {
        match self {
            ReportKind::Roles => Some(Box::new(roles::RolesReporter)),
            ReportKind::Channels => Some(Box::new(channels::ChannelsReporter)),
            ReportKind::Members => Some(Box::new(members::MembersReporter)),
            ReportKind::Emojis => Some(Box::new(emojis::EmojisReporter)),
            ReportKind::Permissions => Some(Box::new(permissions::PermissionsReporter)),
            ReportKind::All => None,
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "roles" => Ok(ReportKind::Roles),
            "channels" => Ok(ReportKind::Channels),
            "members" => Ok(ReportKind::Members),
            "emojis" => Ok(ReportKind::Emojis),
            "permissions" => Ok(ReportKind::Permissions),
            "all" => Ok(ReportKind::All),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings shared by every report in one invocation
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub format: OutputFormat,
    pub writer: ReportWriter,
}

/// Where report output goes
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

/// Run one report end to end.
///
/// Every failure, including validation and the handshake, gets a
/// diagnostic on the error stream before it is returned. The session is
/// closed on every path once connected.
pub async fn run_report(
    reporter: &dyn Reporter,
    api: Arc<dyn DiscordApi>,
    credentials: &Credentials,
    options: &RunOptions,
    streams: &mut Streams<'_>,
) -> Result<()> {
    let session = match Session::connect(api, credentials).await {
        Ok(session) => session,
        Err(e) => {
            warn!("{} report could not connect: {}", reporter.category(), e);
            write_diagnostic(reporter, &e, streams.err)?;
            return Err(e);
        }
    };

    let result = run_connected(reporter, &session, credentials, options, streams).await;
    let reported = match &result {
        Err(e) => {
            warn!("{} report failed: {}", reporter.category(), e);
            write_diagnostic(reporter, e, streams.err)
        }
        Ok(()) => Ok(()),
    };

    session.close();
    reported?;
    result
}

async fn run_connected(
    reporter: &dyn Reporter,
    session: &Session,
    credentials: &Credentials,
    options: &RunOptions,
    streams: &mut Streams<'_>,
) -> Result<()> {
    let pretty = options.format == OutputFormat::Pretty;

    if pretty {
        writeln!(streams.out, "✅ Connected as {}\n", session.user().tag())?;
    }

    let guild = session.fetch_guild(&credentials.guild_id).await?;
    if pretty {
        writeln!(streams.out, "{}", reporter.heading(&guild))?;
    }

    let report = reporter.collect(session, &guild).await?;

    let saved = if report.persist && !report.empty {
        Some(options.writer.write(report.category, report.payload.clone(), &guild.id)?)
    } else {
        None
    };

    match options.format {
        OutputFormat::Json => {
            writeln!(streams.out, "{}", format_json(report.category, &report.payload)?)?;
        }
        OutputFormat::Pretty => {
            write!(streams.out, "{}", report.text)?;
            if let Some(path) = &saved {
                writeln!(streams.out, "\n💾 Output saved to: {}", path.display())?;
            }
            if !report.empty {
                writeln!(streams.out, "\n{}", "✅ Done!".green())?;
            }
        }
    }

    debug!("{} report complete", report.category);
    Ok(())
}

/// Hint for the Discord error codes that have a known cause
pub fn hint(subject: &str, error: &Error) -> Option<String> {
    match error.discord_code()? {
        CODE_MISSING_ACCESS => Some("The bot doesn't have access to this guild.".to_string()),
        CODE_UNKNOWN_GUILD => Some("Guild not found. Check the guild ID.".to_string()),
        CODE_MISSING_PERMISSIONS => {
            Some(format!("The bot doesn't have permission to view {}.", subject))
        }
        _ => None,
    }
}

fn write_diagnostic(reporter: &dyn Reporter, error: &Error, err: &mut dyn Write) -> Result<()> {
    writeln!(
        err,
        "{} {}: {}",
        "❌ Error".red(),
        reporter.action(),
        error
    )?;
    if let Some(hint) = hint(reporter.subject(), error) {
        writeln!(err, "   {}", hint)?;
    }
    Ok(())
}

/// Run every report in order, waiting `delay` between them.
///
/// A failing report is logged and the next one still runs.
pub async fn run_all(
    api: Arc<dyn DiscordApi>,
    credentials: &Credentials,
    options: &RunOptions,
    streams: &mut Streams<'_>,
    delay: Duration,
) -> Result<()> {
    for kind in ReportKind::SEQUENCE {
        let Some(reporter) = kind.reporter() else {
            continue;
        };

        if options.format == OutputFormat::Pretty {
            let banner = render_separator(BANNER_WIDTH, '=');
            writeln!(streams.out, "\n{}", banner)?;
            writeln!(
                streams.out,
                "{}",
                format!("Running: {}", kind.name().to_uppercase()).bold()
            )?;
            writeln!(streams.out, "{}", banner)?;
        }

        if let Err(e) =
            run_report(reporter.as_ref(), api.clone(), credentials, options, streams).await
        {
            warn!("Continuing after failed {} report", kind);
            writeln!(streams.err, "{} running {}: {}", "❌ Error".red(), kind, e)?;
        }

        tokio::time::sleep(delay).await;
    }

    Ok(())
}
