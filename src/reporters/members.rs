//! Members report

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use serde_json::{Value, json};

use super::{Report, Reporter, Text, guild_json};
use crate::client::{Guild, Member, Role};
use crate::error::Result;
use crate::output::export::{render_row, render_table};
use crate::output::formatters::{format_date_local, format_iso};
use crate::session::Session;

const TABLE_WIDTH: usize = 100;
const COLUMN_WIDTHS: [usize; 5] = [25, 20, 20, 12, 20];

/// Rows shown in the table; exports always cover every member
pub const DISPLAY_LIMIT: usize = 50;

pub struct MembersReporter;

#[async_trait]
impl Reporter for MembersReporter {
    fn category(&self) -> &'static str {
        "members"
    }

    fn heading(&self, guild: &Guild) -> String {
        format!(
            "📋 Fetching members from: {} ({})\n\n⏳ Fetching members (this may take a while for large servers)...\n",
            guild.name, guild.id
        )
    }

    async fn collect(&self, session: &Session, guild: &Guild) -> Result<Report> {
        let progress = spinner("Fetching members...");
        let members = session.api().list_members(&guild.id).await;
        progress.finish_and_clear();
        let members = members?;

        // Role names only decorate the payload; members render without them.
        let roles = match session.api().list_roles(&guild.id).await {
            Ok(roles) => roles,
            Err(e) => {
                warn!("Could not resolve role names for members: {}", e);
                Vec::new()
            }
        };

        Ok(render(guild, &members, &roles))
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Aggregate counts over the full member list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStats {
    pub total: usize,
    pub humans: usize,
    pub bots: usize,
    pub with_roles: usize,
    pub without_roles: usize,
    /// role count -> members with that many roles, ascending
    pub role_distribution: BTreeMap<usize, usize>,
}

impl MemberStats {
    pub fn from_members(members: &[Member]) -> Self {
        let bots = members.iter().filter(|m| m.user.bot).count();
        let with_roles = members.iter().filter(|m| m.role_count() > 0).count();

        let mut role_distribution = BTreeMap::new();
        for member in members {
            *role_distribution.entry(member.role_count()).or_insert(0) += 1;
        }

        Self {
            total: members.len(),
            humans: members.len() - bots,
            bots,
            with_roles,
            without_roles: members.len() - with_roles,
            role_distribution,
        }
    }
}

/// Render members in fetch order. `roles` resolves role names for the
/// payload.
pub fn render(guild: &Guild, members: &[Member], roles: &[Role]) -> Report {
    if members.is_empty() {
        return Report::empty(
            "members",
            "⚠️  No members found in this guild.",
            json!({ "guild": guild_json(guild), "members": [] }),
        );
    }

    let role_names: HashMap<&str, &str> = roles
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();
    let stats = MemberStats::from_members(members);

    let mut text = Text::default();
    text.line(format!("Found {} member(s):\n", members.len()))
        .separator(TABLE_WIDTH)
        .line(render_row(
            &["USERNAME", "USER ID", "DISPLAY NAME", "ROLES COUNT", "JOINED"],
            &COLUMN_WIDTHS,
        ))
        .separator(TABLE_WIDTH);

    let rows: Vec<Vec<String>> = members
        .iter()
        .take(DISPLAY_LIMIT)
        .map(|member| {
            vec![
                member.user.tag(),
                member.id().to_string(),
                member.display_name().to_string(),
                member.role_count().to_string(),
                format_date_local(member.joined_at.as_ref()),
            ]
        })
        .collect();
    text.line(render_table(&rows, &COLUMN_WIDTHS));

    if members.len() > DISPLAY_LIMIT {
        text.line(format!(
            "\n... and {} more members (not shown in table)\n",
            members.len() - DISPLAY_LIMIT
        ));
    }

    text.separator(TABLE_WIDTH).exports(
        "Member",
        "memberIds",
        "members",
        members,
        |m| m.id().to_string(),
        |m| m.user.tag(),
    );

    text.line("\n📊 Member Statistics:")
        .line(format!("   Total Members: {}", stats.total))
        .line(format!("   Human Members: {}", stats.humans))
        .line(format!("   Bot Members: {}", stats.bots))
        .line(format!("   Members with Roles: {}", stats.with_roles))
        .line(format!("   Members without Roles: {}", stats.without_roles));

    text.line("\n📊 Role Distribution:");
    for (role_count, member_count) in &stats.role_distribution {
        text.line(format!(
            "   {} role(s): {} member(s)",
            role_count, member_count
        ));
    }

    let payload = json!({
        "guild": guild_json(guild),
        "members": members.iter().map(|member| json!({
            "id": member.id(),
            "username": member.user.username,
            "discriminator": member.user.discriminator,
            "tag": member.user.tag(),
            "displayName": member.display_name(),
            "bot": member.user.bot,
            "roles": member.roles.iter().map(|id| json!({
                "id": id,
                "name": role_names.get(id.as_str()),
            })).collect::<Vec<_>>(),
            "roleCount": member.role_count(),
            "joinedAt": format_iso(member.joined_at.as_ref()),
            "premiumSince": format_iso(member.premium_since.as_ref()),
            "nickname": member.nick,
        })).collect::<Vec<Value>>(),
        "statistics": {
            "total": stats.total,
            "humans": stats.humans,
            "bots": stats.bots,
            "withRoles": stats.with_roles,
            "withoutRoles": stats.without_roles,
            "roleDistribution": stats.role_distribution,
        },
    });

    Report::new("members", text.into_string(), payload).persistent()
}
