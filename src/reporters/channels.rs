//! Channels report

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::{Report, Reporter, Text, guild_json};
use crate::client::{Channel, Guild};
use crate::error::Result;
use crate::output::export::render_row;
use crate::session::Session;

const TABLE_WIDTH: usize = 80;
const CATEGORY_WIDTHS: [usize; 3] = [35, 20, 10];
const CHANNEL_WIDTHS: [usize; 4] = [30, 20, 15, 15];

pub struct ChannelsReporter;

#[async_trait]
impl Reporter for ChannelsReporter {
    fn category(&self) -> &'static str {
        "channels"
    }

    async fn collect(&self, session: &Session, guild: &Guild) -> Result<Report> {
        let channels = session.api().list_channels(&guild.id).await?;
        Ok(render(guild, &channels))
    }
}

/// Categories and other channels, each sorted by position
pub fn split_categories(channels: &[Channel]) -> (Vec<&Channel>, Vec<&Channel>) {
    let (mut categories, mut regular): (Vec<&Channel>, Vec<&Channel>) =
        channels.iter().partition(|c| c.is_category());
    categories.sort_by_key(|c| c.position);
    regular.sort_by_key(|c| c.position);
    (categories, regular)
}

/// Channel count per type name, in first-seen order
pub fn type_counts(channels: &[Channel]) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for channel in channels {
        let name = channel.type_name();
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }
    counts
}

/// Render channels in fetch order.
pub fn render(guild: &Guild, channels: &[Channel]) -> Report {
    if channels.is_empty() {
        return Report::empty(
            "channels",
            "⚠️  No channels found in this guild.",
            json!({ "guild": guild_json(guild), "channels": [] }),
        );
    }

    let names: HashMap<&str, &str> = channels
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let parent_name = |channel: &Channel| -> String {
        channel
            .parent_id
            .as_deref()
            .and_then(|id| names.get(id).copied())
            .unwrap_or("None")
            .to_string()
    };

    let (categories, regular) = split_categories(channels);
    let counts = type_counts(channels);

    let mut text = Text::default();
    text.line(format!(
        "Found {} channel(s): {} category/categories, {} regular channel(s)\n",
        channels.len(),
        categories.len(),
        regular.len()
    ));

    if !categories.is_empty() {
        text.separator(TABLE_WIDTH)
            .line("CATEGORIES:")
            .separator(TABLE_WIDTH)
            .line(render_row(
                &["CATEGORY NAME", "CATEGORY ID", "POSITION"],
                &CATEGORY_WIDTHS,
            ))
            .separator(TABLE_WIDTH);
        for &category in &categories {
            text.line(render_row(
                &[
                    category.name.clone(),
                    category.id.clone(),
                    category.position.to_string(),
                ],
                &CATEGORY_WIDTHS,
            ));
        }
        text.separator(TABLE_WIDTH).blank();
    }

    text.separator(TABLE_WIDTH)
        .line("CHANNELS:")
        .separator(TABLE_WIDTH)
        .line(render_row(
            &["CHANNEL NAME", "CHANNEL ID", "TYPE", "CATEGORY"],
            &CHANNEL_WIDTHS,
        ))
        .separator(TABLE_WIDTH);
    for &channel in &regular {
        text.line(render_row(
            &[
                channel.name.clone(),
                channel.id.clone(),
                channel.type_name().to_string(),
                parent_name(channel),
            ],
            &CHANNEL_WIDTHS,
        ));
    }

    text.separator(TABLE_WIDTH).exports(
        "Channel",
        "channelIds",
        "channels",
        channels,
        |c| c.id.clone(),
        |c| c.name.clone(),
    );

    text.line("\n📊 Channel Statistics:");
    for (name, count) in &counts {
        text.line(format!("   {}: {}", name, count));
    }

    let by_type: Map<String, Value> = counts
        .iter()
        .map(|(name, count)| (name.to_string(), json!(count)))
        .collect();

    let payload = json!({
        "guild": guild_json(guild),
        "categories": categories.iter().map(|c| json!({
            "id": c.id,
            "name": c.name,
            "position": c.position,
        })).collect::<Vec<_>>(),
        "channels": channels.iter().map(|c| json!({
            "id": c.id,
            "name": c.name,
            "type": c.type_name(),
            "position": c.position,
            "parentId": c.parent_id,
            "category": c.parent_id.as_ref().map(|_| parent_name(c)),
        })).collect::<Vec<_>>(),
        "statistics": {
            "total": channels.len(),
            "categories": categories.len(),
            "regular": regular.len(),
            "byType": by_type,
        },
    });

    Report::new("channels", text.into_string(), payload)
}
