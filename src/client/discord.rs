//! Discord REST client implementation

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::pagination::{MAX_MEMBER_PAGE_SIZE, MemberCursor};
use super::rate_limit::{MAX_RATE_LIMIT_RETRIES, ReactiveRateLimiter, retry_after};
use super::{Channel, DiscordApi, Emoji, Guild, Member, Role, Sticker, User};
use crate::error::{ApiError, Error, Result};

/// Discord REST API base URL
pub const API_BASE_URL: &str = "https://discord.com/api/v10";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body Discord attaches to failed requests
#[derive(Debug, Deserialize)]
struct DiscordErrorBody {
    code: u32,
    message: String,
}

/// Discord REST client authenticated with a bot token
pub struct DiscordClient {
    http: HttpClient,
    base_url: String,
    token: String,
    rate_limiter: ReactiveRateLimiter,
    member_page_size: usize,
}

impl DiscordClient {
    /// Create a client for the given bot token.
    ///
    /// `base_url` overrides the Discord API host (used for testing).
    pub fn new(token: impl Into<String>, base_url: Option<&str>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or(API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            token: token.into(),
            rate_limiter: ReactiveRateLimiter::default(),
            member_page_size: MAX_MEMBER_PAGE_SIZE,
        })
    }

    /// Override the member page size.
    #[cfg(test)]
    pub fn with_member_page_size(mut self, size: usize) -> Self {
        self.member_page_size = size;
        self
    }

    /// GET a JSON resource, retrying on 429.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempts = 0;

        loop {
            self.rate_limiter.wait_if_active().await;
            debug!("GET {} {:?}", path, query);

            let response = self
                .http
                .get(&url)
                .header(AUTHORIZATION, format!("Bot {}", self.token))
                .header(
                    USER_AGENT,
                    concat!("DiscordBot (guildscope, ", env!("CARGO_PKG_VERSION"), ")"),
                )
                .query(query)
                .send()
                .await
                .map_err(ApiError::from)?;

            let status = response.status();
            if status.is_success() {
                return response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse {}: {}", path, e)).into()
                });
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let header = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                let body = response.text().await.unwrap_or_default();
                let wait = retry_after(header.as_deref(), &body);

                self.rate_limiter.activate();
                if attempts >= MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimit(wait).into());
                }
                attempts += 1;
                warn!(
                    "Rate limited on {} (attempt {}), retrying in {:?}",
                    path, attempts, wait
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            return Err(error_from_response(status, response).await);
        }
    }
}

/// Map a non-success, non-429 response to an error.
async fn error_from_response(status: StatusCode, response: Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized.into();
    }

    let text = response.text().await.unwrap_or_default();

    if status.is_server_error() {
        let msg = if text.is_empty() {
            format!("Discord returned {}", status)
        } else {
            text
        };
        return ApiError::ServerError(msg).into();
    }

    match serde_json::from_str::<DiscordErrorBody>(&text) {
        Ok(body) => ApiError::Discord {
            status: status.as_u16(),
            code: Some(body.code),
            message: body.message,
        },
        Err(_) => ApiError::Discord {
            status: status.as_u16(),
            code: None,
            message: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or(text),
        },
    }
    .into()
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn current_user(&self) -> Result<User> {
        self.get("/users/@me", &[]).await
    }

    async fn get_guild(&self, guild_id: &str) -> Result<Guild> {
        self.get(&format!("/guilds/{}", guild_id), &[]).await
    }

    async fn list_roles(&self, guild_id: &str) -> Result<Vec<Role>> {
        self.get(&format!("/guilds/{}/roles", guild_id), &[]).await
    }

    async fn list_channels(&self, guild_id: &str) -> Result<Vec<Channel>> {
        self.get(&format!("/guilds/{}/channels", guild_id), &[])
            .await
    }

    async fn list_members(&self, guild_id: &str) -> Result<Vec<Member>> {
        let path = format!("/guilds/{}/members", guild_id);
        let mut cursor = MemberCursor::new(self.member_page_size);
        let mut members = Vec::new();

        while cursor.has_more() {
            let page: Vec<Member> = self.get(&path, &cursor.to_query_params()).await?;
            cursor.advance(page.len(), page.last().map(Member::id));
            debug!("Fetched {} members (total {})", page.len(), members.len() + page.len());
            members.extend(page);
        }

        Ok(members)
    }

    async fn list_emojis(&self, guild_id: &str) -> Result<Vec<Emoji>> {
        self.get(&format!("/guilds/{}/emojis", guild_id), &[]).await
    }

    async fn list_stickers(&self, guild_id: &str) -> Result<Vec<Sticker>> {
        self.get(&format!("/guilds/{}/stickers", guild_id), &[])
            .await
    }
}
