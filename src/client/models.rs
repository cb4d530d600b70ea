//! Discord API response models
//!
//! Only the fields the reports need are deserialized; Discord sends more.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Extract the creation time encoded in a Discord snowflake id.
///
/// Returns `None` when the id is not a decimal snowflake.
pub fn snowflake_timestamp(id: &str) -> Option<DateTime<Utc>> {
    let raw: u64 = id.parse().ok()?;
    let millis = (raw >> 22) + DISCORD_EPOCH_MS;
    DateTime::from_timestamp_millis(i64::try_from(millis).ok()?)
}

/// A Discord user account (the bot itself, or a member's user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    pub username: String,

    /// Legacy four-digit discriminator, `"0"` for migrated usernames
    #[serde(default = "default_discriminator")]
    pub discriminator: String,

    #[serde(default)]
    pub global_name: Option<String>,

    #[serde(default)]
    pub bot: bool,
}

fn default_discriminator() -> String {
    "0".to_string()
}

impl User {
    /// `username#discriminator`, or just the username once migrated.
    pub fn tag(&self) -> String {
        if self.discriminator == "0" || self.discriminator.is_empty() {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

/// Guild (server) summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

/// Role resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,

    pub name: String,

    /// RGB color as an integer, 0 for none
    #[serde(default)]
    pub color: u32,

    /// Shown separately in the member list
    #[serde(default)]
    pub hoist: bool,

    pub position: i64,

    /// Permission bitfield serialized as a decimal string
    pub permissions: String,

    /// Managed by an integration (bots, boosts, linked roles)
    #[serde(default)]
    pub managed: bool,

    #[serde(default)]
    pub mentionable: bool,

    #[serde(default)]
    pub tags: Option<RoleTags>,
}

/// Tags describing what manages a role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleTags {
    #[serde(default)]
    pub bot_id: Option<String>,

    #[serde(default)]
    pub integration_id: Option<String>,
}

impl Role {
    /// Permission bitfield, zero if Discord sent something unparsable
    pub fn permission_bits(&self) -> u64 {
        self.permissions.parse().unwrap_or(0)
    }

    /// Color as `#rrggbb`
    pub fn hex_color(&self) -> String {
        format!("#{:06x}", self.color)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        snowflake_timestamp(&self.id)
    }

    /// The bot user this role was created for, if any
    pub fn bot_id(&self) -> Option<&str> {
        self.tags.as_ref().and_then(|t| t.bot_id.as_deref())
    }
}

/// Channel type tag for categories
pub const CHANNEL_TYPE_CATEGORY: u8 = 4;

/// Guild channel resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: u8,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub position: i64,

    /// Parent category id
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Channel {
    pub fn is_category(&self) -> bool {
        self.kind == CHANNEL_TYPE_CATEGORY
    }

    /// Human-readable name of the channel type
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            0 => "Text",
            2 => "Voice",
            4 => "Category",
            5 => "Announcement",
            10 => "Announcement Thread",
            11 => "Public Thread",
            12 => "Private Thread",
            13 => "Stage",
            15 => "Forum",
            16 => "Media",
            _ => "Unknown",
        }
    }
}

/// Guild member resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user: User,

    #[serde(default)]
    pub nick: Option<String>,

    /// Role ids, never including `@everyone`
    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub premium_since: Option<DateTime<Utc>>,
}

impl Member {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// Nickname, then global display name, then username
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .or(self.user.global_name.as_deref())
            .unwrap_or(&self.user.username)
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }
}

/// Custom guild emoji
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emoji {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub animated: bool,

    #[serde(default = "default_true")]
    pub available: bool,

    #[serde(default)]
    pub managed: bool,
}

fn default_true() -> bool {
    true
}

impl Emoji {
    /// Markup that renders the emoji in a Discord message
    pub fn chat_format(&self) -> String {
        if self.animated {
            format!("<a:{}:{}>", self.name, self.id)
        } else {
            format!("<:{}:{}>", self.name, self.id)
        }
    }
}

/// Sticker type tag for Discord-provided stickers
pub const STICKER_TYPE_STANDARD: u8 = 1;

/// Sticker type tag for guild-uploaded stickers
pub const STICKER_TYPE_GUILD: u8 = 2;

/// Guild sticker resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sticker {
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: u8,

    #[serde(default = "default_true")]
    pub available: bool,

    #[serde(default)]
    pub description: Option<String>,
}

impl Sticker {
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            STICKER_TYPE_STANDARD => "Standard",
            STICKER_TYPE_GUILD => "Guild",
            _ => "Unknown",
        }
    }

    pub fn is_guild_sticker(&self) -> bool {
        self.kind == STICKER_TYPE_GUILD
    }
}
