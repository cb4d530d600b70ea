//! Emojis and stickers report

use async_trait::async_trait;
use serde_json::json;

use super::{Report, Reporter, Text, guild_json};
use crate::client::{Emoji, Guild, Sticker};
use crate::error::Result;
use crate::output::export::render_row;
use crate::output::formatters::yes_no;
use crate::session::Session;

const TABLE_WIDTH: usize = 100;
const EMOJI_WIDTHS: [usize; 5] = [30, 20, 10, 12, 10];
const STICKER_WIDTHS: [usize; 5] = [25, 20, 15, 12, 30];

pub struct EmojisReporter;

#[async_trait]
impl Reporter for EmojisReporter {
    fn category(&self) -> &'static str {
        "emojis"
    }

    fn heading(&self, guild: &Guild) -> String {
        format!(
            "📋 Fetching emojis and stickers from: {} ({})\n",
            guild.name, guild.id
        )
    }

    async fn collect(&self, session: &Session, guild: &Guild) -> Result<Report> {
        let emojis = session.api().list_emojis(&guild.id).await?;
        let stickers = session.api().list_stickers(&guild.id).await?;

        Ok(render(guild, &emojis, &stickers))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiStats {
    pub total: usize,
    pub animated: usize,
    pub available: usize,
    pub managed: usize,
}

impl EmojiStats {
    pub fn from_emojis(emojis: &[Emoji]) -> Self {
        Self {
            total: emojis.len(),
            animated: emojis.iter().filter(|e| e.animated).count(),
            available: emojis.iter().filter(|e| e.available).count(),
            managed: emojis.iter().filter(|e| e.managed).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickerStats {
    pub total: usize,
    pub available: usize,
    pub guild: usize,
}

impl StickerStats {
    pub fn from_stickers(stickers: &[Sticker]) -> Self {
        Self {
            total: stickers.len(),
            available: stickers.iter().filter(|s| s.available).count(),
            guild: stickers.iter().filter(|s| s.is_guild_sticker()).count(),
        }
    }
}

fn render_emojis(text: &mut Text, emojis: &[Emoji], stats: &EmojiStats) {
    if emojis.is_empty() {
        text.line("⚠️  No emojis found in this guild.\n");
        return;
    }

    text.line(format!("Found {} emoji(s):\n", emojis.len()))
        .separator(TABLE_WIDTH)
        .line(render_row(
            &["EMOJI NAME", "EMOJI ID", "ANIMATED", "AVAILABLE", "MANAGED"],
            &EMOJI_WIDTHS,
        ))
        .separator(TABLE_WIDTH);
    for emoji in emojis {
        text.line(render_row(
            &[
                emoji.name.as_str(),
                emoji.id.as_str(),
                yes_no(emoji.animated),
                yes_no(emoji.available),
                yes_no(emoji.managed),
            ],
            &EMOJI_WIDTHS,
        ));
    }

    text.separator(TABLE_WIDTH).exports(
        "Emoji",
        "emojiIds",
        "emojis",
        emojis,
        |e| e.id.clone(),
        |e| e.name.clone(),
    );

    text.line("\n📋 Emoji format (for use in Discord):");
    for emoji in emojis {
        text.line(format!("   {}: {}", emoji.name, emoji.chat_format()));
    }
    text.blank();

    text.line("📊 Emoji Statistics:")
        .line(format!("   Total Emojis: {}", stats.total))
        .line(format!("   Animated: {}", stats.animated))
        .line(format!("   Static: {}", stats.total - stats.animated))
        .line(format!("   Available: {}", stats.available))
        .line(format!("   Unavailable: {}", stats.total - stats.available))
        .line(format!("   Managed: {}", stats.managed))
        .line(format!("   Custom: {}", stats.total - stats.managed))
        .blank();
}

fn render_stickers(text: &mut Text, stickers: &[Sticker], stats: &StickerStats) {
    if stickers.is_empty() {
        text.line("⚠️  No stickers found in this guild.\n");
        return;
    }

    text.separator(TABLE_WIDTH)
        .line(format!("Found {} sticker(s):\n", stickers.len()))
        .separator(TABLE_WIDTH)
        .line(render_row(
            &["STICKER NAME", "STICKER ID", "TYPE", "AVAILABLE", "DESCRIPTION"],
            &STICKER_WIDTHS,
        ))
        .separator(TABLE_WIDTH);
    for sticker in stickers {
        text.line(render_row(
            &[
                sticker.name.as_str(),
                sticker.id.as_str(),
                sticker.type_name(),
                yes_no(sticker.available),
                sticker
                    .description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or("None"),
            ],
            &STICKER_WIDTHS,
        ));
    }

    text.separator(TABLE_WIDTH).exports(
        "Sticker",
        "stickerIds",
        "stickers",
        stickers,
        |s| s.id.clone(),
        |s| s.name.clone(),
    );

    text.line("\n📊 Sticker Statistics:")
        .line(format!("   Total Stickers: {}", stats.total))
        .line(format!("   Available: {}", stats.available))
        .line(format!("   Unavailable: {}", stats.total - stats.available))
        .line(format!("   Guild Stickers: {}", stats.guild))
        .line(format!("   Standard Stickers: {}", stats.total - stats.guild))
        .blank();
}

/// Render emojis and stickers in fetch order.
pub fn render(guild: &Guild, emojis: &[Emoji], stickers: &[Sticker]) -> Report {
    if emojis.is_empty() && stickers.is_empty() {
        return Report::empty(
            "emojis",
            "⚠️  No emojis or stickers found in this guild.",
            json!({ "guild": guild_json(guild), "emojis": [], "stickers": [] }),
        );
    }

    let emoji_stats = EmojiStats::from_emojis(emojis);
    let sticker_stats = StickerStats::from_stickers(stickers);

    let mut text = Text::default();
    render_emojis(&mut text, emojis, &emoji_stats);
    render_stickers(&mut text, stickers, &sticker_stats);

    let payload = json!({
        "guild": guild_json(guild),
        "emojis": emojis.iter().map(|e| json!({
            "id": e.id,
            "name": e.name,
            "animated": e.animated,
            "available": e.available,
            "managed": e.managed,
            "format": e.chat_format(),
        })).collect::<Vec<_>>(),
        "stickers": stickers.iter().map(|s| json!({
            "id": s.id,
            "name": s.name,
            "type": s.type_name(),
            "available": s.available,
            "description": s.description,
        })).collect::<Vec<_>>(),
        "statistics": {
            "emojis": {
                "total": emoji_stats.total,
                "animated": emoji_stats.animated,
                "static": emoji_stats.total - emoji_stats.animated,
                "available": emoji_stats.available,
                "unavailable": emoji_stats.total - emoji_stats.available,
                "managed": emoji_stats.managed,
                "custom": emoji_stats.total - emoji_stats.managed,
            },
            "stickers": {
                "total": sticker_stats.total,
                "available": sticker_stats.available,
                "unavailable": sticker_stats.total - sticker_stats.available,
                "guild": sticker_stats.guild,
                "standard": sticker_stats.total - sticker_stats.guild,
            },
        },
    });

    Report::new("emojis", text.into_string(), payload)
}
