use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;
use tracing::warn;

#[derive(Clone, Debug)]
pub(crate) struct AlertEvent {
    pub(crate) level: Level,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) service_name: String,
    pub(crate) component: String,
    pub(crate) target: String,
    pub(crate) message: Option<String>,
    pub(crate) fields: BTreeMap<String, String>,
}

#[async_trait]
pub(crate) trait AlertProvider: Send + Sync {
    async fn send(&self, event: &AlertEvent) -> Result<()>;
    fn provider_name(&self) -> &'static str;
}

/// Fans alert events out to providers from a dedicated task, so the hot
/// path only pays for an mpsc try_send. The queue is bounded and drops
/// on overflow rather than blocking logging.
#[derive(Clone)]
pub(crate) struct Notifier {
    tx: mpsc::Sender<AlertEvent>,
}

impl Notifier {
    pub(crate) fn new(providers: Vec<Arc<dyn AlertProvider>>) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertEvent>(256);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                for provider in &providers {
                    if let Err(error) = provider.send(&event).await {
                        warn!(
                            provider = provider.provider_name(),
                            error = %error,
                            "Alert provider failed"
                        );
                    }
                }
            }
        });

        Self { tx }
    }

    pub(crate) fn try_notify(&self, event: AlertEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Alert queue full; dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Alert queue closed; dropping event");
            }
        }
    }
}
