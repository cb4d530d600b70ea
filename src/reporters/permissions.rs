//! Role permission analysis

use async_trait::async_trait;
use serde_json::json;

use super::roles::sort_by_position_desc;
use super::{Report, Reporter, Text, guild_json};
use crate::client::{Guild, Role};
use crate::error::Result;
use crate::output::export::render_row;
use crate::output::formatters::yes_no;
use crate::permissions::{Permission, has_flag, hierarchy_issues, names};
use crate::session::Session;

const TABLE_WIDTH: usize = 100;
const COLUMN_WIDTHS: [usize; 4] = [30, 10, 18, 15];

/// Flags summarized in the analysis section, with their JSON keys
const SUMMARIZED: [(Permission, &str); 4] = [
    (Permission::Administrator, "administrator"),
    (Permission::ManageRoles, "manageRoles"),
    (Permission::KickMembers, "kickMembers"),
    (Permission::BanMembers, "banMembers"),
];

pub struct PermissionsReporter;

#[async_trait]
impl Reporter for PermissionsReporter {
    fn category(&self) -> &'static str {
        "permissions"
    }

    fn action(&self) -> String {
        "analyzing permissions".to_string()
    }

    fn subject(&self) -> &'static str {
        "roles"
    }

    fn heading(&self, guild: &Guild) -> String {
        format!(
            "📋 Analyzing permissions for: {} ({})\n",
            guild.name, guild.id
        )
    }

    async fn collect(&self, session: &Session, guild: &Guild) -> Result<Report> {
        let mut roles = session.api().list_roles(&guild.id).await?;
        sort_by_position_desc(&mut roles);

        Ok(render(guild, &roles))
    }
}

fn holders(roles: &[Role], flag: Permission) -> Vec<&str> {
    roles
        .iter()
        .filter(|r| has_flag(r.permission_bits(), flag))
        .map(|r| r.name.as_str())
        .collect()
}

/// Render roles already sorted by position.
pub fn render(guild: &Guild, roles: &[Role]) -> Report {
    if roles.is_empty() {
        return Report::empty(
            "permissions",
            "⚠️  No roles found in this guild.",
            json!({ "guild": guild_json(guild), "roles": [] }),
        );
    }

    let issues = hierarchy_issues(roles);

    let mut text = Text::default();
    text.line(format!("Found {} role(s) to analyze:\n", roles.len()))
        .separator(TABLE_WIDTH)
        .line("ROLE HIERARCHY (sorted by position, highest first):")
        .separator(TABLE_WIDTH)
        .line(render_row(
            &["ROLE NAME", "POSITION", "PERMISSIONS COUNT", "ADMINISTRATOR"],
            &COLUMN_WIDTHS,
        ))
        .separator(TABLE_WIDTH);

    for role in roles {
        let bits = role.permission_bits();
        text.line(render_row(
            &[
                role.name.clone(),
                role.position.to_string(),
                names(bits).len().to_string(),
                yes_no(has_flag(bits, Permission::Administrator)).to_string(),
            ],
            &COLUMN_WIDTHS,
        ));
    }
    text.separator(TABLE_WIDTH).blank();

    text.line("📊 Permission Analysis:\n");
    let mut analysis = serde_json::Map::new();
    for (flag, key) in SUMMARIZED {
        let holding = holders(roles, flag);
        text.line(format!("   Roles with {}: {}", flag.label(), holding.len()));
        if !holding.is_empty() {
            text.line(format!("      {}", holding.join(", ")));
        }
        analysis.insert(key.to_string(), json!(holding));
    }
    text.blank();

    text.line("⚠️  Potential Issues:\n");
    if issues.is_empty() {
        text.line("   No obvious permission conflicts detected.");
    } else {
        for issue in &issues {
            text.line(format!("   {}", issue));
        }
    }
    text.blank();

    text.separator(TABLE_WIDTH)
        .line("DETAILED PERMISSION BREAKDOWN:")
        .separator(TABLE_WIDTH);
    for role in roles.iter().filter(|r| r.id != guild.id) {
        text.line(format!("\n{} (Position: {}):", role.name, role.position));
        let granted = names(role.permission_bits());
        if granted.is_empty() {
            text.line("   No special permissions");
        } else {
            for name in granted {
                text.line(format!("   - {}", name));
            }
        }
    }

    let payload = json!({
        "guild": guild_json(guild),
        "roles": roles.iter().map(|role| {
            let bits = role.permission_bits();
            json!({
                "id": role.id,
                "name": role.name,
                "position": role.position,
                "administrator": has_flag(bits, Permission::Administrator),
                "permissions": names(bits),
            })
        }).collect::<Vec<_>>(),
        "analysis": analysis,
        "issues": issues.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
    });

    Report::new("permissions", text.into_string(), payload)
}
