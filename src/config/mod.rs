//! Credential resolution for guildscope
//!
//! Sources, highest priority first:
//! 1. command line arguments (when both are given)
//! 2. environment variables (when both resolve)
//! 3. `./config.yaml`
//! 4. `~/.guildscope/config.yaml`
//!
//! Whatever is left over is returned as a partial result.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variables checked for the bot token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["DISCORD_BOT_TOKEN", "BOT_TOKEN"];

/// Environment variables checked for the guild id, in order
pub const GUILD_ENV_VARS: [&str; 2] = ["DISCORD_GUILD_ID", "GUILD_ID"];

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "config.yaml";

/// Token and guild id, both present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub guild_id: String,
}

/// Credentials as resolved; either field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCredentials {
    pub token: Option<String>,
    pub guild_id: Option<String>,
}

impl PartialCredentials {
    pub fn new(token: Option<String>, guild_id: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            guild_id: guild_id.filter(|g| !g.is_empty()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.guild_id.is_some()
    }

    /// Both fields, or `None` if either is missing
    pub fn complete(self) -> Option<Credentials> {
        match (self.token, self.guild_id) {
            (Some(token), Some(guild_id)) => Some(Credentials { token, guild_id }),
            _ => None,
        }
    }

    /// Fill missing fields from `fallback`.
    fn or(self, fallback: PartialCredentials) -> Self {
        Self {
            token: self.token.or(fallback.token),
            guild_id: self.guild_id.or(fallback.guild_id),
        }
    }
}

/// Contents of a config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default, alias = "botToken", skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    #[serde(default, alias = "guildId", skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
}

impl FileConfig {
    /// Load a config file from a path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: FileConfig = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        Ok(config)
    }

    fn credentials(&self) -> PartialCredentials {
        PartialCredentials::new(self.bot_token.clone(), self.guild_id.clone())
    }
}

/// Where the resolver looks for configuration
pub struct CredentialSources<'a> {
    /// Environment lookup, `std::env::var` in production
    pub env: &'a dyn Fn(&str) -> Option<String>,
    /// Project-local config file
    pub local_path: Option<PathBuf>,
    /// User-global config file
    pub global_path: Option<PathBuf>,
}

impl CredentialSources<'static> {
    /// Real environment, `./config.yaml` and `~/.guildscope/config.yaml`
    pub fn system() -> Self {
        Self {
            env: &process_env,
            local_path: std::env::current_dir()
                .ok()
                .map(|dir| dir.join(LOCAL_CONFIG_FILE)),
            global_path: global_config_path().ok(),
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Path of the user-global config file
pub fn global_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::Invalid(
        "Could not determine home directory".to_string(),
    ))?;

    Ok(home.join(".guildscope").join("config.yaml"))
}

/// Help text describing every credential source, in priority order
pub fn config_instructions() -> &'static str {
    r#"
📝 Configuration Options:

You can provide bot token and guild ID in several ways (in order of priority):

1. Command line arguments:
   guildscope roles <BOT_TOKEN> <GUILD_ID>

2. Environment variables:
   export DISCORD_BOT_TOKEN="your_token"
   export DISCORD_GUILD_ID="your_guild_id"
   guildscope roles

3. Local config.yaml file (in current directory):
   bot_token: "your_token"
   guild_id: "your_guild_id"

4. Global config file (~/.guildscope/config.yaml):
   mkdir -p ~/.guildscope
   Create ~/.guildscope/config.yaml with the same format as above.
"#
}

/// First non-empty value among the named environment variables
fn first_env(env: &dyn Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env(name))
        .find(|value| !value.is_empty())
}

/// Config file credentials, if the file exists, parses and has both fields
fn file_credentials(path: Option<&Path>) -> Option<PartialCredentials> {
    let path = path.filter(|p| p.exists())?;
    match FileConfig::load_from(path) {
        Ok(config) => {
            let creds = config.credentials();
            if creds.is_complete() {
                debug!("Using credentials from {}", path.display());
                Some(creds)
            } else {
                debug!("Skipping {}: bot_token or guild_id missing", path.display());
                None
            }
        }
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

/// Resolve credentials from the CLI arguments and the configured sources.
pub fn resolve_credentials(
    cli: PartialCredentials,
    sources: &CredentialSources<'_>,
) -> PartialCredentials {
    if cli.is_complete() {
        debug!("Using credentials from command line");
        return cli;
    }

    let env = PartialCredentials::new(
        first_env(sources.env, &TOKEN_ENV_VARS),
        first_env(sources.env, &GUILD_ENV_VARS),
    );
    if env.is_complete() {
        debug!("Using credentials from environment");
        return env;
    }

    for path in [&sources.local_path, &sources.global_path] {
        if let Some(file) = file_credentials(path.as_deref()) {
            return cli.or(file);
        }
    }

    cli.or(env)
}
