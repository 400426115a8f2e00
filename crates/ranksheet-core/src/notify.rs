use std::fmt;

use serde_json::Value;

use crate::model::Identity;

/// Receipt for a delivered notification.
#[derive(Debug, Clone)]
pub struct Sent {
    pub recipient: String,
}

#[derive(Debug)]
pub struct DeliveryError(pub String);

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DeliveryError {}

/// Outbound notification seam. Implementors own their retry policy and any
/// sender-credential fallback; the core only hands over identity + payload.
pub trait Notifier: Send + Sync {
    fn notify(&self, identity: &Identity, payload: &Value) -> Result<Sent, DeliveryError>;
}

/// Logs instead of delivering; the default wiring until an operator plugs
/// in a real channel.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, identity: &Identity, payload: &Value) -> Result<Sent, DeliveryError> {
        let recipient = identity.email.trim().to_string();
        tracing::info!(recipient = %recipient, payload = %payload, "notification (log only)");
        Ok(Sent { recipient })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_notifier_always_delivers() {
        let identity = Identity {
            name: "A. Kumar".into(),
            email: " a@example.com ".into(),
        };
        let sent = LogNotifier
            .notify(&identity, &serde_json::json!({ "event": "score_recorded" }))
            .unwrap();
        assert_eq!(sent.recipient, "a@example.com");
    }
}
