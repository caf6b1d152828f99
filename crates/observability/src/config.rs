use std::env;
use tracing::Level;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct TelegramAlertConfig {
    pub(crate) bot_token: String,
    pub(crate) chat_id: i64,
    pub(crate) min_level: Level,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) telegram: Option<TelegramAlertConfig>,
    /// Warnings collected during parsing, logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();

        let service_name = env_string("SERVICE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "channel-pass".to_string());

        let service_context = ServiceContext {
            service_name,
            component,
        };

        let (telegram, warnings) = telegram_from_env();

        Self {
            service_context,
            telegram,
            warnings,
        }
    }
}

fn telegram_from_env() -> (Option<TelegramAlertConfig>, Vec<String>) {
    let mut warnings = Vec::new();

    let enabled = env_bool("ALERT_NOTIFY_ENABLED").unwrap_or(true);
    if !enabled {
        return (None, warnings);
    }

    let bot_token = env_string("TELEGRAM_BOT_TOKEN").filter(|v| !v.is_empty());
    let chat_id_raw = env_string("ALERT_CHAT_ID").filter(|v| !v.is_empty());

    let (Some(bot_token), Some(chat_id_raw)) = (bot_token, chat_id_raw) else {
        return (None, warnings);
    };

    let chat_id = match chat_id_raw.trim().parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            warnings.push(
                "ALERT_CHAT_ID is set but not a numeric chat id; admin alerts disabled"
                    .to_string(),
            );
            return (None, warnings);
        }
    };

    let min_level = match env_string("ALERT_NOTIFY_LEVEL") {
        Some(raw) if !raw.trim().is_empty() => match parse_level(&raw) {
            Some(level) => level,
            None => {
                warnings.push(format!(
                    "ALERT_NOTIFY_LEVEL is invalid (value: {raw}); defaulting to ERROR"
                ));
                Level::ERROR
            }
        },
        _ => Level::ERROR,
    };

    (
        Some(TelegramAlertConfig {
            bot_token,
            chat_id,
            min_level,
        }),
        warnings,
    )
}

fn parse_level(input: &str) -> Option<Level> {
    match input.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    let raw = env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
