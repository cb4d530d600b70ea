//! Roles report

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Report, Reporter, Text, guild_json};
use crate::client::{Guild, Role};
use crate::error::Result;
use crate::output::export::render_row;
use crate::output::formatters::format_iso;
use crate::session::Session;

const TABLE_WIDTH: usize = 80;
const HEADER_WIDTHS: [usize; 3] = [30, 20, 10];
const ROW_WIDTHS: [usize; 3] = [30, 20, 30];

pub struct RolesReporter;

#[async_trait]
impl Reporter for RolesReporter {
    fn category(&self) -> &'static str {
        "roles"
    }

    async fn collect(&self, session: &Session, guild: &Guild) -> Result<Report> {
        let mut roles = session.api().list_roles(&guild.id).await?;
        sort_by_position_desc(&mut roles);

        Ok(render(guild, &roles, &session.user().id))
    }
}

/// Highest position first
pub fn sort_by_position_desc(roles: &mut [Role]) {
    roles.sort_by(|a, b| b.position.cmp(&a.position));
}

/// Hex color, or `Default` for uncolored roles
fn color_label(role: &Role) -> String {
    if role.color == 0 {
        "Default".to_string()
    } else {
        role.hex_color()
    }
}

fn role_ref(role: &Role) -> Value {
    json!({ "id": role.id, "name": role.name })
}

/// Render roles already sorted by position. `bot_user_id` picks out the
/// bot's own managed role.
pub fn render(guild: &Guild, roles: &[Role], bot_user_id: &str) -> Report {
    if roles.is_empty() {
        return Report::empty(
            "roles",
            "⚠️  No roles found in this guild.",
            json!({ "guild": guild_json(guild), "roles": [] }),
        );
    }

    let everyone = roles.iter().find(|r| r.id == guild.id);
    let bot_role = roles.iter().find(|r| r.bot_id() == Some(bot_user_id));
    let managed: Vec<&Role> = roles.iter().filter(|r| r.managed).collect();

    let mut text = Text::default();
    text.line(format!("Found {} role(s):\n", roles.len()))
        .separator(TABLE_WIDTH)
        .line(render_row(&["ROLE NAME", "ROLE ID", "POSITION"], &HEADER_WIDTHS))
        .separator(TABLE_WIDTH);

    for role in roles {
        text.line(render_row(
            &[
                role.name.clone(),
                role.id.clone(),
                format!("{} (Color: {})", role.position, color_label(role)),
            ],
            &ROW_WIDTHS,
        ));
    }

    text.separator(TABLE_WIDTH).exports(
        "Role",
        "roleIds",
        "roles",
        roles,
        |r| r.id.clone(),
        |r| r.name.clone(),
    );

    if let Some(role) = everyone {
        text.line(format!("ℹ️  @everyone role: {}", role.id));
    }
    if let Some(role) = bot_role {
        text.line(format!("ℹ️  Bot role: {} ({})", role.id, role.name));
    }
    if !managed.is_empty() {
        let names: Vec<&str> = managed.iter().map(|r| r.name.as_str()).collect();
        text.line(format!(
            "ℹ️  Managed roles ({}): {}",
            managed.len(),
            names.join(", ")
        ));
    }

    let payload = json!({
        "guild": guild_json(guild),
        "roles": roles.iter().map(|role| json!({
            "id": role.id,
            "name": role.name,
            "position": role.position,
            "color": role.hex_color(),
            "managed": role.managed,
            "mentionable": role.mentionable,
            "hoist": role.hoist,
            "permissions": role.permissions,
            "createdAt": format_iso(role.created_at().as_ref()),
        })).collect::<Vec<_>>(),
        "statistics": {
            "total": roles.len(),
            "everyoneRole": everyone.map(|r| r.id.clone()),
            "botRole": bot_role.map(role_ref),
            "managedCount": managed.len(),
            "managedRoles": managed.iter().map(|r| role_ref(r)).collect::<Vec<_>>(),
        },
    });

    Report::new("roles", text.into_string(), payload).persistent()
}
