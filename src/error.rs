//! Error types for guildscope

use std::time::Duration;
use thiserror::Error;

/// Discord JSON error code: the bot is not a member of the guild
pub const CODE_MISSING_ACCESS: u32 = 50001;

/// Discord JSON error code: unknown guild
pub const CODE_UNKNOWN_GUILD: u32 = 10004;

/// Discord JSON error code: the bot lacks a required permission
pub const CODE_MISSING_PERMISSIONS: u32 = 50013;

/// Result type alias for guildscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials are missing or still set to a placeholder value
    #[error("{0}")]
    Validation(String),

    /// The handshake with Discord did not reach the ready state
    #[error("{0}")]
    Connection(String),

    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),

    /// No source provided both a token and a guild id
    #[error("Bot token and guild ID are required!")]
    MissingCredentials { command: String },

    #[error("The bot doesn't have access to this guild.")]
    NoAccess,

    #[error("Guild not found. Check the guild ID.")]
    GuildNotFound,

    #[error("The bot doesn't have permission to view this guild.")]
    MissingPermission,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The Discord error code behind this error, if it is one of the
    /// codes that get a dedicated hint.
    pub fn discord_code(&self) -> Option<u32> {
        match self {
            Error::NoAccess => Some(CODE_MISSING_ACCESS),
            Error::GuildNotFound => Some(CODE_UNKNOWN_GUILD),
            Error::MissingPermission => Some(CODE_MISSING_PERMISSIONS),
            Error::Api(ApiError::Discord { code, .. }) => *code,
            _ => None,
        }
    }
}

/// Errors surfaced by the Discord REST client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid bot token. Please check your token and try again.")]
    Unauthorized,

    /// Non-success response carrying Discord's JSON error body
    #[error("{message} (HTTP {status}{})", code_suffix(.code))]
    Discord {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to Discord".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

fn code_suffix(code: &Option<u32>) -> String {
    code.map(|c| format!(", code {c}")).unwrap_or_default()
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translated_errors_carry_codes() {
        assert_eq!(Error::NoAccess.discord_code(), Some(50001));
        assert_eq!(Error::GuildNotFound.discord_code(), Some(10004));
        assert_eq!(Error::MissingPermission.discord_code(), Some(50013));
    }

    #[test]
    fn test_raw_discord_error_code_passes_through() {
        let err: Error = ApiError::Discord {
            status: 403,
            code: Some(50013),
            message: "Missing Permissions".to_string(),
        }
        .into();

        assert_eq!(err.discord_code(), Some(50013));
    }

    #[test]
    fn test_unclassified_error_has_no_code() {
        let err: Error = ApiError::Network("Connection refused".to_string()).into();
        assert_eq!(err.discord_code(), None);
        assert!(Error::Validation("Bot token is required!".into())
            .discord_code()
            .is_none());
    }

    #[test]
    fn test_discord_error_message() {
        let err = ApiError::Discord {
            status: 404,
            code: Some(10004),
            message: "Unknown Guild".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Unknown Guild"));
        assert!(msg.contains("404"));
        assert!(msg.contains("10004"));
    }

    #[test]
    fn test_discord_error_message_without_code() {
        let err = ApiError::Discord {
            status: 502,
            code: None,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Bad Gateway (HTTP 502)");
    }

    #[test]
    fn test_unauthorized_message() {
        assert!(ApiError::Unauthorized.to_string().contains("Invalid bot token"));
    }

    #[test]
    fn test_api_error_rate_limit() {
        let msg = ApiError::RateLimit(Duration::from_secs(30)).to_string();
        assert!(msg.contains("Rate limit"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_translated_error_messages() {
        assert!(Error::NoAccess.to_string().contains("access"));
        assert!(Error::GuildNotFound.to_string().contains("guild ID"));
        assert!(Error::MissingPermission.to_string().contains("permission"));
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("bot_token: [oops").unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::Unauthorized.into();
        match err {
            Error::Api(ApiError::Unauthorized) => (),
            _ => panic!("Expected Error::Api(ApiError::Unauthorized)"),
        }
    }
}
