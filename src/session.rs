//! Connection lifecycle for one report run
//!
//! A [`Session`] only exists once the handshake reached the ready state.
//! It is passed explicitly to whoever needs it and consumed by
//! [`Session::close`].

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::client::{DiscordApi, Guild, User};
use crate::config::Credentials;
use crate::error::{
    ApiError, CODE_MISSING_ACCESS, CODE_MISSING_PERMISSIONS, CODE_UNKNOWN_GUILD, Error, Result,
};

/// How long to wait for the ready signal
pub const READY_TIMEOUT: Duration = Duration::from_secs(30);

const TOKEN_PLACEHOLDERS: [&str; 3] = ["", "CHANGE", "YOUR_BOT_TOKEN_HERE"];
const GUILD_PLACEHOLDERS: [&str; 3] = ["", "000000000000000000", "YOUR_GUILD_ID_HERE"];

/// Reject empty or placeholder credentials before touching the network.
pub fn validate(credentials: &Credentials) -> Result<()> {
    if TOKEN_PLACEHOLDERS.contains(&credentials.token.as_str()) {
        return Err(Error::Validation("Bot token is required!".to_string()));
    }

    if GUILD_PLACEHOLDERS.contains(&credentials.guild_id.as_str()) {
        return Err(Error::Validation("Guild ID is required!".to_string()));
    }

    Ok(())
}

/// Outcome of the connect handshake
#[derive(Debug)]
pub enum Handshake {
    Ready(User),
    Failed(Error),
}

/// Race the identity call against `timeout`; whichever finishes first wins.
pub async fn handshake(api: &dyn DiscordApi, timeout: Duration) -> Handshake {
    tokio::select! {
        result = api.current_user() => match result {
            Ok(user) => Handshake::Ready(user),
            Err(Error::Api(ApiError::Unauthorized)) => {
                Handshake::Failed(Error::Connection(ApiError::Unauthorized.to_string()))
            }
            Err(e) => Handshake::Failed(e),
        },
        _ = tokio::time::sleep(timeout) => Handshake::Failed(Error::Connection(format!(
            "Timed out after {}s waiting for Discord to become ready",
            timeout.as_secs()
        ))),
    }
}

/// A connected, ready session
pub struct Session {
    api: Arc<dyn DiscordApi>,
    user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("user", &self.user).finish()
    }
}

impl Session {
    /// Validate credentials and wait for the ready signal.
    pub async fn connect(api: Arc<dyn DiscordApi>, credentials: &Credentials) -> Result<Self> {
        Self::connect_with_timeout(api, credentials, READY_TIMEOUT).await
    }

    pub async fn connect_with_timeout(
        api: Arc<dyn DiscordApi>,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        validate(credentials)?;

        match handshake(api.as_ref(), timeout).await {
            Handshake::Ready(user) => {
                debug!("Session ready as {} ({})", user.tag(), user.id);
                Ok(Self { api, user })
            }
            Handshake::Failed(e) => {
                warn!("Connection failed: {}", e);
                Err(e)
            }
        }
    }

    /// The bot account this session is connected as
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn api(&self) -> &dyn DiscordApi {
        self.api.as_ref()
    }

    /// Fetch a guild, translating the access-related Discord error codes.
    pub async fn fetch_guild(&self, guild_id: &str) -> Result<Guild> {
        self.api.get_guild(guild_id).await.map_err(translate_guild_error)
    }

    /// End the session.
    pub fn close(self) {
        debug!("Session closed for {}", self.user.tag());
    }
}

fn translate_guild_error(err: Error) -> Error {
    match err {
        Error::Api(ApiError::Discord {
            code: Some(code), ..
        }) if code == CODE_MISSING_ACCESS => Error::NoAccess,
        Error::Api(ApiError::Discord {
            code: Some(code), ..
        }) if code == CODE_UNKNOWN_GUILD => Error::GuildNotFound,
        Error::Api(ApiError::Discord {
            code: Some(code), ..
        }) if code == CODE_MISSING_PERMISSIONS => Error::MissingPermission,
        other => other,
    }
}
