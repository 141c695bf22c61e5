//! Discord webhook alerts for a finished run

use crate::publish::PublishError;
use crate::updater::Report;
use odds_processor::parlay::DEFAULT_LEGS;
use odds_processor::types::{GameAnalysis, Parlay};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Singles listed in the alert
const MAX_SINGLES: usize = 5;
const EMBED_COLOR: u32 = 0x00ff41;

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: String,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Clone)]
pub struct DiscordNotifier {
    client: Client,
    webhook_url: Url,
    min_confidence: u8,
}

impl DiscordNotifier {
    pub fn new(webhook_url: Url, min_confidence: u8) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            webhook_url,
            min_confidence,
        }
    }

    pub async fn send_report(&self, report: &Report) -> Result<(), PublishError> {
        let payload = build_payload(report, self.min_confidence);
        let resp = self
            .client
            .post(self.webhook_url.clone())
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            debug!("Discord alert sent ({})", status);
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            error!("Discord alert failed: {} - {}", status, body);
            Err(PublishError::WebhookStatus(status))
        }
    }
}

pub fn build_payload(report: &Report, min_confidence: u8) -> WebhookPayload {
    let mut fields: Vec<EmbedField> = report
        .leagues
        .iter()
        .map(|l| EmbedField {
            name: format!("{} {}-GAME PARLAY", l.league, DEFAULT_LEGS),
            value: parlay_field(&l.parlay),
            inline: false,
        })
        .collect();

    let mut singles: Vec<&GameAnalysis> = report
        .leagues
        .iter()
        .flat_map(|l| l.games.iter())
        .filter(|g| g.pick.confidence >= min_confidence)
        .collect();
    singles.sort_by(|a, b| b.pick.confidence.cmp(&a.pick.confidence));
    singles.truncate(MAX_SINGLES);

    let singles_value = if singles.is_empty() {
        "No high confidence picks this week".to_string()
    } else {
        singles
            .iter()
            .map(|g| {
                format!(
                    "**{}**\nPick: {} {} ({}%)",
                    g.game.matchup(),
                    g.pick.short_team(),
                    g.pick.line,
                    g.pick.confidence
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    fields.push(EmbedField {
        name: "HIGH CONFIDENCE SINGLES".to_string(),
        value: singles_value,
        inline: false,
    });

    WebhookPayload {
        embeds: vec![Embed {
            title: "🔥 WEEKLY PICKS ALERT 🔥".to_string(),
            description: format!("**Week {} • Auto-Generated Picks**", report.week),
            color: EMBED_COLOR,
            timestamp: report.generated_at.to_rfc3339(),
            fields,
            footer: EmbedFooter {
                text: "💰 Auto-Updated".to_string(),
            },
        }],
    }
}

fn parlay_field(parlay: &Parlay) -> String {
    match parlay.odds {
        Some(odds) if !parlay.is_empty() => {
            let mut lines: Vec<String> = parlay
                .legs
                .iter()
                .enumerate()
                .map(|(i, leg)| format!("**{}.** {}", i + 1, leg.pick))
                .collect();
            lines.push(format!("**Odds:** {odds:+}"));
            lines.join("\n")
        }
        _ => format!("No {} parlay this week", parlay.league),
    }
}
