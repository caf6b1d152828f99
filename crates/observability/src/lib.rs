mod config;
mod layer;
mod notifier;
mod telegram;

use anyhow::Result;
use config::ObservabilityConfig;
use layer::ErrorAlertLayer;
use notifier::Notifier;
use std::sync::Arc;
use telegram::TelegramAlertProvider;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initializes tracing for a binary: fmt output filtered by `RUST_LOG`
/// (default `info`), plus an optional layer that forwards ERROR-level
/// events to an admin chat. Inconsistent-state conditions are logged at
/// ERROR precisely so they end up in front of a human.
pub fn init_observability(component: &str) -> Result<()> {
    let config = ObservabilityConfig::from_env(component);

    let alert_layer = config.telegram.as_ref().map(|telegram| {
        let notifier = Notifier::new(vec![Arc::new(TelegramAlertProvider::new(
            telegram.bot_token.clone(),
            telegram.chat_id,
        )) as Arc<dyn notifier::AlertProvider>]);

        ErrorAlertLayer::new(notifier, config.service_context.clone(), telegram.min_level)
            .with_filter(tracing_subscriber::filter::LevelFilter::from_level(
                telegram.min_level,
            ))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(alert_layer)
        .with(env_filter)
        .try_init()?;

    for warning in &config.warnings {
        warn!(
            service = %config.service_context.service_name,
            component = %config.service_context.component,
            warning = %warning,
            "Observability config warning"
        );
    }

    if config.telegram.is_some() {
        info!(
            service = %config.service_context.service_name,
            component = %config.service_context.component,
            "Admin chat error alerts enabled"
        );
    } else {
        info!(
            service = %config.service_context.service_name,
            component = %config.service_context.component,
            "Admin chat error alerts disabled"
        );
    }

    Ok(())
}
