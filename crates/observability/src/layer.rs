use super::config::ServiceContext;
use super::notifier::{AlertEvent, Notifier};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Forwards matching events to the notifier. Only event-level fields
/// are captured; span context is not needed for admin alerts.
#[derive(Clone)]
pub(crate) struct ErrorAlertLayer {
    notifier: Notifier,
    service_context: ServiceContext,
    min_level: Level,
}

impl ErrorAlertLayer {
    pub(crate) fn new(
        notifier: Notifier,
        service_context: ServiceContext,
        min_level: Level,
    ) -> Self {
        Self {
            notifier,
            service_context,
            min_level,
        }
    }
}

#[derive(Default)]
struct FieldMapVisitor {
    values: BTreeMap<String, String>,
}

impl Visit for FieldMapVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.values
            .insert(field.name().to_string(), redact(field.name(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.values
            .insert(field.name().to_string(), redact(field.name(), value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.values
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.values
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.values
            .insert(field.name().to_string(), value.to_string());
    }
}

impl<S> Layer<S> for ErrorAlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() > self.min_level {
            return;
        }

        let mut visitor = FieldMapVisitor::default();
        event.record(&mut visitor);

        let mut message = None;
        if let Some(raw) = visitor.values.remove("message") {
            message = Some(unquote_debug_string(&raw));
        }

        let alert = AlertEvent {
            level: *event.metadata().level(),
            timestamp: Utc::now(),
            service_name: self.service_context.service_name.clone(),
            component: self.service_context.component.clone(),
            target: event.metadata().target().to_string(),
            message,
            fields: visitor.values,
        };

        self.notifier.try_notify(alert);
    }
}

fn unquote_debug_string(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        return trimmed[1..trimmed.len() - 1].to_string();
    }
    trimmed.to_string()
}

fn redact(field_name: &str, value: String) -> String {
    if is_sensitive_key(field_name) {
        return "[REDACTED]".to_string();
    }
    value
}

fn is_sensitive_key(field_name: &str) -> bool {
    let field = field_name.to_ascii_lowercase();
    field.contains("secret")
        || field.contains("password")
        || field.contains("token")
        || field.contains("authorization")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_sensitive_field_names() {
        assert_eq!(redact("bot_token", "abc".to_string()), "[REDACTED]");
        assert_eq!(redact("service_token", "abc".to_string()), "[REDACTED]");
        assert_eq!(redact("user_id", "42".to_string()), "42");
    }

    #[test]
    fn unquotes_debug_formatted_messages() {
        assert_eq!(unquote_debug_string("\"hello\""), "hello");
        assert_eq!(unquote_debug_string("hello"), "hello");
    }
}
