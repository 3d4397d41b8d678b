//! Best-effort notifications through the messaging relay.
//!
//! A dispatch never fails past this module: every problem becomes a
//! [`DispatchOutcome`] and a log line. Nothing is retried.

use crate::confirmation::BoxFuture;
use crate::format;
use crate::types::Appointment;
use serde::Serialize;
use std::time::Duration;

/// Result of one dispatch attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Relay accepted the message (2xx)
    Delivered,
    /// Relay answered with a non-success status
    Rejected {
        /// HTTP status code
        status: u16,
    },
    /// Connection or protocol failure
    TransportFailed {
        /// Error description
        reason: String,
    },
    /// No answer within the timeout
    TimedOut,
    /// Target had no digits after normalization
    InvalidTarget,
}

impl DispatchOutcome {
    /// True for [`DispatchOutcome::Delivered`]
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    const fn metric_label(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Rejected { .. } => "rejected",
            Self::TransportFailed { .. } => "transport_failed",
            Self::TimedOut => "timed_out",
            Self::InvalidTarget => "invalid_target",
        }
    }
}

/// Sends one message to one phone-number-shaped target
pub trait NotificationDispatcher: Send + Sync {
    /// Delivers `message` to `target` within `timeout`
    fn dispatch(&self, target: &str, message: String, timeout: Duration) -> BoxFuture<DispatchOutcome>;
}

/// Keeps only the ASCII digits of a phone number
#[must_use]
pub fn normalize_target(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Relay request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayMessage {
    target_number: String,
    message: String,
}

/// [`NotificationDispatcher`] posting JSON to the WhatsApp relay
#[derive(Clone, Debug)]
pub struct RelayNotificationDispatcher {
    client: reqwest::Client,
    relay_url: String,
}

impl RelayNotificationDispatcher {
    /// Creates a dispatcher posting to `relay_url`
    #[must_use]
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: relay_url.into(),
        }
    }

    /// Relay endpoint
    #[must_use]
    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }
}

impl NotificationDispatcher for RelayNotificationDispatcher {
    fn dispatch(&self, target: &str, message: String, timeout: Duration) -> BoxFuture<DispatchOutcome> {
        let target_number = normalize_target(target);
        let client = self.client.clone();
        let url = self.relay_url.clone();

        Box::pin(async move {
            if target_number.is_empty() {
                tracing::error!("Notification target has no digits, skipping dispatch");
                return record(DispatchOutcome::InvalidTarget);
            }

            let exchange = async {
                let response = client
                    .post(&url)
                    .json(&RelayMessage {
                        target_number: target_number.clone(),
                        message,
                    })
                    .send()
                    .await?;
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Ok::<_, reqwest::Error>((status, body))
            };

            // The deadline covers the response body as well as the headers
            let outcome = match tokio::time::timeout(timeout, exchange).await {
                Ok(Ok((status, body))) if status.is_success() => {
                    tracing::info!(target = %target_number, response = %body, "Notification delivered");
                    DispatchOutcome::Delivered
                },
                Ok(Ok((status, details))) => {
                    let status = status.as_u16();
                    tracing::error!(target = %target_number, status, %details, "Relay rejected notification");
                    DispatchOutcome::Rejected { status }
                },
                Ok(Err(error)) => {
                    tracing::error!(target = %target_number, %error, "Notification transport failed");
                    DispatchOutcome::TransportFailed {
                        reason: error.to_string(),
                    }
                },
                Err(_) => {
                    tracing::error!(target = %target_number, ?timeout, "Notification timed out");
                    DispatchOutcome::TimedOut
                },
            };
            record(outcome)
        })
    }
}

fn record(outcome: DispatchOutcome) -> DispatchOutcome {
    metrics::counter!("studio.notifications", "outcome" => outcome.metric_label()).increment(1);
    outcome
}

/// Text of the new-booking notice sent to the shop
#[must_use]
pub fn shop_notice(appointment: &Appointment, shop_name: &str) -> String {
    format!(
        "\u{1F514} NEW BOOKING ({shop_name}) \u{1F514}\n\
         Client: {client}\n\
         Client contact: {contact}\n\
         Service: {service}\n\
         Barber: {barber}\n\
         Date: {date}\n\
         Time: {time}\n\
         Price: {price}\n\
         Payment: {payment}\n\
         (This is an automatic notification)",
        client = appointment.client_name,
        contact = appointment.client_contact,
        service = appointment.service.name,
        barber = appointment.barber_name.as_deref().unwrap_or("Not specified"),
        date = format::long_date(appointment.date),
        time = appointment.time,
        price = appointment.service.price,
        payment = appointment.payment_method,
    )
}
