use super::notifier::{AlertEvent, AlertProvider};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde_json::json;

/// Posts alert events to an admin chat via the Bot API. Separate from
/// the infra gateway on purpose: alerting must work even when the rest
/// of the stack is the thing that is failing.
pub(crate) struct TelegramAlertProvider {
    bot_token: String,
    chat_id: i64,
    client: Client,
}

impl TelegramAlertProvider {
    pub(crate) fn new(bot_token: String, chat_id: i64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(3))
            .build()
            .expect("reqwest client must build");

        Self {
            bot_token,
            chat_id,
            client,
        }
    }

    fn format_content(&self, event: &AlertEvent) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "[{}] {} / {}",
            event.level.as_str(),
            event.service_name,
            event.component
        ));

        lines.push(format!(
            "{} {}",
            event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            event.target
        ));

        if let Some(message) = event.message.as_ref().filter(|m| !m.trim().is_empty()) {
            lines.push(message.trim().to_string());
        }

        for (key, value) in &event.fields {
            lines.push(format!("- {key} = {value}"));
        }

        truncate_for_telegram(lines.join("\n"))
    }
}

#[async_trait]
impl AlertProvider for TelegramAlertProvider {
    async fn send(&self, event: &AlertEvent) -> Result<()> {
        let content = self.format_content(event);
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let response = self
            .client
            .post(url)
            .json(&json!({ "chat_id": self.chat_id, "text": content }))
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "telegram alert returned non-success status: {}",
            response.status()
        ))
    }

    fn provider_name(&self) -> &'static str {
        "telegram"
    }
}

// The request URL embeds the bot token; never surface reqwest errors
// verbatim.
fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("telegram alert request timed out");
    }
    if error.is_connect() {
        return anyhow!("telegram alert connection failed");
    }
    anyhow!("telegram alert request failed")
}

fn truncate_for_telegram(mut content: String) -> String {
    const LIMIT: usize = 4096;
    const SUFFIX: &str = "\n… (truncated)";

    if content.chars().count() <= LIMIT {
        return content;
    }

    let allowed = LIMIT.saturating_sub(SUFFIX.chars().count());
    let truncated: String = content.chars().take(allowed).collect();
    content.clear();
    content.push_str(&truncated);
    content.push_str(SUFFIX);
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_oversized_alerts() {
        let content = "x".repeat(5000);
        let truncated = truncate_for_telegram(content);
        assert!(truncated.chars().count() <= 4096);
        assert!(truncated.ends_with("… (truncated)"));
    }

    #[test]
    fn keeps_short_alerts_untouched() {
        assert_eq!(truncate_for_telegram("short".to_string()), "short");
    }
}
