//! Wizard dependencies.

use crate::catalog::Catalog;
use crate::config::{Config, NotificationConfig};
use crate::confirmation::{self, ConfirmationProducer};
use crate::ledger::{BookingLedger, WildcardPolicy};
use crate::notification::NotificationDispatcher;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use std::sync::Arc;
use studio_core::environment::Clock;

/// Everything the booking reducer talks to
///
/// The ledger is shared by every session built from the same handle; the
/// other members are read-only.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Shop data
    pub catalog: Arc<Catalog>,
    /// Shared booking ledger
    pub ledger: BookingLedger,
    /// Time source (UTC)
    pub clock: Arc<dyn Clock>,
    /// Confirmation text producer
    pub producer: Arc<dyn ConfirmationProducer>,
    /// Relay dispatcher
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    /// Shop number and dispatch timeouts
    pub notifications: NotificationConfig,
    /// Shop local offset from UTC
    pub utc_offset: FixedOffset,
    /// How wildcard bookings are recorded
    pub wildcard_policy: WildcardPolicy,
}

impl BookingEnvironment {
    /// Creates an environment with default notification settings, shop time
    /// equal to UTC and the resolving wildcard policy
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        ledger: BookingLedger,
        clock: Arc<dyn Clock>,
        producer: Arc<dyn ConfirmationProducer>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            clock,
            producer,
            dispatcher,
            notifications: NotificationConfig::default(),
            utc_offset: FixedOffset::east_opt(0).unwrap_or_else(|| Utc.fix()),
            wildcard_policy: WildcardPolicy::default(),
        }
    }

    /// Builds the production environment from configuration
    #[must_use]
    pub fn from_config(
        config: &Config,
        ledger: BookingLedger,
        clock: Arc<dyn Clock>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let catalog = Arc::new(config.scheduling.catalog.clone());
        let producer = confirmation::producer_from_config(&config.generation, &catalog.shop_name);
        Self::new(catalog, ledger, clock, producer, dispatcher)
            .with_notifications(config.notifications.clone())
            .with_utc_offset(config.scheduling.utc_offset)
            .with_wildcard_policy(config.scheduling.wildcard_policy)
    }

    /// Builder: notification settings
    #[must_use]
    pub fn with_notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    /// Builder: shop local offset
    #[must_use]
    pub const fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    /// Builder: wildcard policy
    #[must_use]
    pub const fn with_wildcard_policy(mut self, policy: WildcardPolicy) -> Self {
        self.wildcard_policy = policy;
        self
    }

    /// Current shop local time
    #[must_use]
    pub fn now_local(&self) -> NaiveDateTime {
        self.clock.now().with_timezone(&self.utc_offset).naive_local()
    }

    /// Current shop local day
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}
