//! In-memory stand-ins for the booking environment.
//!
//! Used by the unit tests and the integration tests.

use crate::catalog::Catalog;
use crate::confirmation::{BoxFuture, GenerationError, GenerationPrompt, TemplateProducer, TextGenerator};
use crate::ledger::BookingLedger;
use crate::notification::{DispatchOutcome, NotificationDispatcher, normalize_target};
use crate::payment::PaymentMethod;
use crate::types::{Appointment, AppointmentId, BarberSelection, ClockTime, Service, ServiceId};
use crate::wizard::BookingEnvironment;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use studio_core::environment::Clock;

/// One call seen by a [`RecordingDispatcher`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchCall {
    /// Target after normalization
    pub target: String,
    /// Message text
    pub message: String,
    /// Timeout the caller asked for
    pub timeout: Duration,
}

/// Dispatcher that records every call and answers with a fixed outcome
///
/// Clones share the recorded calls.
#[derive(Clone, Debug)]
pub struct RecordingDispatcher {
    outcome: DispatchOutcome,
    calls: Arc<Mutex<Vec<DispatchCall>>>,
}

impl RecordingDispatcher {
    /// Dispatcher reporting every message as delivered
    #[must_use]
    pub fn new() -> Self {
        Self::with_outcome(DispatchOutcome::Delivered)
    }

    /// Dispatcher reporting `outcome` for every message
    #[must_use]
    pub fn with_outcome(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Calls recorded so far, in dispatch order
    #[must_use]
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls addressed to `target` (compared after normalization)
    #[must_use]
    pub fn calls_to(&self, target: &str) -> Vec<DispatchCall> {
        let target = normalize_target(target);
        self.calls()
            .into_iter()
            .filter(|call| call.target == target)
            .collect()
    }
}

impl Default for RecordingDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, target: &str, message: String, timeout: Duration) -> BoxFuture<DispatchOutcome> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DispatchCall {
                target: normalize_target(target),
                message,
                timeout,
            });
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

#[derive(Clone, Debug)]
enum Script {
    Reply(String),
    Fail,
    Stall,
}

/// Text generator with a canned behaviour
#[derive(Clone, Debug)]
pub struct ScriptedGenerator {
    script: Script,
    prompts: Arc<Mutex<Vec<GenerationPrompt>>>,
}

impl ScriptedGenerator {
    fn scripted(script: Script) -> Self {
        Self {
            script,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers `text`
    #[must_use]
    pub fn replying(text: &str) -> Self {
        Self::scripted(Script::Reply(text.to_string()))
    }

    /// Always fails with a backend error
    #[must_use]
    pub fn failing() -> Self {
        Self::scripted(Script::Fail)
    }

    /// Never answers
    #[must_use]
    pub fn stalled() -> Self {
        Self::scripted(Script::Stall)
    }

    /// Prompts received so far
    #[must_use]
    pub fn prompts(&self) -> Vec<GenerationPrompt> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: GenerationPrompt) -> BoxFuture<Result<String, GenerationError>> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt);
        let script = self.script.clone();
        Box::pin(async move {
            match script {
                Script::Reply(text) => Ok(text),
                Script::Fail => Err(GenerationError::Backend("scripted failure".to_string())),
                Script::Stall => std::future::pending().await,
            }
        })
    }
}

/// Environment over the studio catalog with template confirmations
#[must_use]
pub fn template_environment(
    ledger: BookingLedger,
    clock: Arc<dyn Clock>,
    dispatcher: Arc<dyn NotificationDispatcher>,
) -> BookingEnvironment {
    let catalog = Catalog::studio();
    let producer = Arc::new(TemplateProducer::new(catalog.shop_name.clone()));
    BookingEnvironment::new(Arc::new(catalog), ledger, clock, producer, dispatcher)
}

/// Ana's Corte Social with Rayff, Thursday 2026-03-12 at 10:30, paid by Pix
#[must_use]
pub fn sample_appointment() -> Appointment {
    Appointment {
        id: AppointmentId::new(),
        service: Service {
            id: ServiceId::new("1"),
            name: "Corte Social".to_string(),
            duration_minutes: 30,
            price: "R$ 25,00".to_string(),
            description: "Classic, elegant cut for everyday and formal occasions.".to_string(),
        },
        barber: BarberSelection::concrete("barber1"),
        barber_name: Some("Rayff".to_string()),
        date: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap_or_default(),
        time: ClockTime::new(10, 30).unwrap_or_default(),
        client_name: "Ana Souza".to_string(),
        client_contact: "(83) 98765-4321".to_string(),
        payment_method: PaymentMethod::Pix,
        booked_at: Utc
            .with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    }
}
