//! Discord REST API client

use async_trait::async_trait;

use crate::error::Result;

pub mod discord;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod rate_limit;

pub use discord::DiscordClient;
#[cfg(test)]
pub use mock::MockDiscordClient;
pub use models::{Channel, Emoji, Guild, Member, Role, Sticker, User};

/// Read-only Discord API surface used by the reporters
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Identity of the account owning the token
    async fn current_user(&self) -> Result<User>;

    /// Fetch a guild by id
    async fn get_guild(&self, guild_id: &str) -> Result<Guild>;

    /// List all roles in a guild
    async fn list_roles(&self, guild_id: &str) -> Result<Vec<Role>>;

    /// List all channels in a guild (threads excluded)
    async fn list_channels(&self, guild_id: &str) -> Result<Vec<Channel>>;

    /// List every member of a guild, following pagination to the end
    async fn list_members(&self, guild_id: &str) -> Result<Vec<Member>>;

    /// List custom emojis in a guild
    async fn list_emojis(&self, guild_id: &str) -> Result<Vec<Emoji>>;

    /// List stickers in a guild
    async fn list_stickers(&self, guild_id: &str) -> Result<Vec<Sticker>>;
}
