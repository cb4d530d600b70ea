//! Mock Discord API client for testing
//!
//! Provides a mock implementation of [`DiscordApi`] for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Channel, DiscordApi, Emoji, Guild, Member, Role, Sticker, User};
use crate::error::{ApiError, Error, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockDiscordClient::new()
///     .with_guild(Guild { id: "1".into(), name: "Test Guild".into() })
///     .await;
///
/// let guild = mock.get_guild("1").await?;
/// ```
pub struct MockDiscordClient {
    user: Arc<Mutex<User>>,
    guild: Arc<Mutex<Option<Guild>>>,
    roles: Arc<Mutex<Vec<Role>>>,
    channels: Arc<Mutex<Vec<Channel>>>,
    members: Arc<Mutex<Vec<Member>>>,
    emojis: Arc<Mutex<Vec<Emoji>>>,
    stickers: Arc<Mutex<Vec<Sticker>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<Error>>>,
    /// Error returned by the named call only
    error_on: Arc<Mutex<Option<(&'static str, Error)>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

impl Default for MockDiscordClient {
    fn default() -> Self {
        Self {
            user: Arc::new(Mutex::new(User {
                id: "900".to_string(),
                username: "guildscope".to_string(),
                discriminator: "0".to_string(),
                global_name: None,
                bot: true,
            })),
            guild: Arc::new(Mutex::new(None)),
            roles: Arc::new(Mutex::new(Vec::new())),
            channels: Arc::new(Mutex::new(Vec::new())),
            members: Arc::new(Mutex::new(Vec::new())),
            emojis: Arc::new(Mutex::new(Vec::new())),
            stickers: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
            error_on: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub current_user: usize,
    pub get_guild: usize,
    pub list_roles: usize,
    pub list_channels: usize,
    pub list_members: usize,
    pub list_emojis: usize,
    pub list_stickers: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.current_user
            + self.get_guild
            + self.list_roles
            + self.list_channels
            + self.list_members
            + self.list_emojis
            + self.list_stickers
    }
}

impl MockDiscordClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the bot identity returned by current_user.
    pub async fn with_user(self, user: User) -> Self {
        *self.user.lock().await = user;
        self
    }

    /// Configure the guild returned by get_guild.
    pub async fn with_guild(self, guild: Guild) -> Self {
        *self.guild.lock().await = Some(guild);
        self
    }

    pub async fn with_roles(self, roles: Vec<Role>) -> Self {
        *self.roles.lock().await = roles;
        self
    }

    pub async fn with_channels(self, channels: Vec<Channel>) -> Self {
        *self.channels.lock().await = channels;
        self
    }

    pub async fn with_members(self, members: Vec<Member>) -> Self {
        *self.members.lock().await = members;
        self
    }

    pub async fn with_emojis(self, emojis: Vec<Emoji>) -> Self {
        *self.emojis.lock().await = emojis;
        self
    }

    pub async fn with_stickers(self, stickers: Vec<Sticker>) -> Self {
        *self.stickers.lock().await = stickers;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: impl Into<Error>) -> Self {
        *self.error.lock().await = Some(error.into());
        self
    }

    /// Configure an error for one specific call (e.g. `"list_roles"`).
    pub async fn with_error_on(self, method: &'static str, error: impl Into<Error>) -> Self {
        *self.error_on.lock().await = Some((method, error.into()));
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Check for a pending error and consume it.
    async fn check_error(&self, method: &'static str) -> Result<()> {
        if let Some(e) = self.error.lock().await.take() {
            return Err(e);
        }

        let mut targeted = self.error_on.lock().await;
        if matches!(&*targeted, Some((m, _)) if *m == method) {
            if let Some((_, e)) = targeted.take() {
                return Err(e);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl DiscordApi for MockDiscordClient {
    async fn current_user(&self) -> Result<User> {
        self.call_count.lock().await.current_user += 1;
        self.check_error("current_user").await?;

        Ok(self.user.lock().await.clone())
    }

    async fn get_guild(&self, guild_id: &str) -> Result<Guild> {
        self.call_count.lock().await.get_guild += 1;
        self.check_error("get_guild").await?;

        match self.guild.lock().await.clone() {
            Some(guild) if guild.id == guild_id => Ok(guild),
            _ => Err(ApiError::Discord {
                status: 404,
                code: Some(crate::error::CODE_UNKNOWN_GUILD),
                message: "Unknown Guild".to_string(),
            }
            .into()),
        }
    }

    async fn list_roles(&self, _guild_id: &str) -> Result<Vec<Role>> {
        self.call_count.lock().await.list_roles += 1;
        self.check_error("list_roles").await?;

        Ok(self.roles.lock().await.clone())
    }

    async fn list_channels(&self, _guild_id: &str) -> Result<Vec<Channel>> {
        self.call_count.lock().await.list_channels += 1;
        self.check_error("list_channels").await?;

        Ok(self.channels.lock().await.clone())
    }

    async fn list_members(&self, _guild_id: &str) -> Result<Vec<Member>> {
        self.call_count.lock().await.list_members += 1;
        self.check_error("list_members").await?;

        Ok(self.members.lock().await.clone())
    }

    async fn list_emojis(&self, _guild_id: &str) -> Result<Vec<Emoji>> {
        self.call_count.lock().await.list_emojis += 1;
        self.check_error("list_emojis").await?;

        Ok(self.emojis.lock().await.clone())
    }

    async fn list_stickers(&self, _guild_id: &str) -> Result<Vec<Sticker>> {
        self.call_count.lock().await.list_stickers += 1;
        self.check_error("list_stickers").await?;

        Ok(self.stickers.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_default_empty() {
        let mock = MockDiscordClient::new();

        assert!(mock.list_roles("1").await.unwrap().is_empty());
        assert!(mock.list_members("1").await.unwrap().is_empty());
        assert!(mock.get_guild("1").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_with_guild() {
        let mock = MockDiscordClient::new()
            .with_guild(Guild {
                id: "1".to_string(),
                name: "Test Guild".to_string(),
            })
            .await;

        let guild = mock.get_guild("1").await.unwrap();
        assert_eq!(guild.name, "Test Guild");
        assert!(mock.get_guild("2").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_with_error() {
        let mock = MockDiscordClient::new()
            .with_error(ApiError::Unauthorized)
            .await;

        assert!(mock.current_user().await.is_err());
        // Error is consumed
        assert!(mock.current_user().await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_with_targeted_error() {
        let mock = MockDiscordClient::new()
            .with_error_on("list_stickers", ApiError::Network("reset".to_string()))
            .await;

        assert!(mock.list_emojis("1").await.is_ok());
        assert!(mock.list_stickers("1").await.is_err());
        assert!(mock.list_stickers("1").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_call_counts() {
        let mock = MockDiscordClient::new();

        let _ = mock.current_user().await;
        let _ = mock.list_channels("1").await;
        let _ = mock.list_channels("1").await;

        let counts = mock.call_counts().await;
        assert_eq!(counts.current_user, 1);
        assert_eq!(counts.list_channels, 2);
        assert_eq!(counts.total(), 3);
    }
}
