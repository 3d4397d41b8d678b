//! In-memory, append-only booking ledger.
//!
//! One ledger is created at process start and handed to every wizard session
//! through its environment. Clones share the same records. Nothing survives
//! a restart.

use crate::availability;
use crate::catalog::Catalog;
use crate::error::LedgerError;
use crate::types::{BarberSelection, BookingRecord, ClockTime};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

/// What a wildcard booking is recorded as
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardPolicy {
    /// Assign the first free concrete barber and record them
    #[default]
    ResolveAtCommit,
    /// Record the wildcard itself; it then blocks every concrete barber
    RecordWildcard,
}

impl FromStr for WildcardPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resolve" | "resolve_at_commit" => Ok(Self::ResolveAtCommit),
            "record" | "record_wildcard" => Ok(Self::RecordWildcard),
            other => Err(other.to_string()),
        }
    }
}

/// Shared, append-only collection of committed bookings
#[derive(Clone, Debug, Default)]
pub struct BookingLedger {
    records: Arc<RwLock<Vec<BookingRecord>>>,
}

impl BookingLedger {
    /// Creates an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger holding `records`
    #[must_use]
    pub fn with_records(records: Vec<BookingRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Appends a record without any availability check
    pub fn append(&self, record: BookingRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Every record committed so far, oldest first
    #[must_use]
    pub fn snapshot(&self) -> Vec<BookingRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing has been booked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically checks a slot and records it
    ///
    /// The write lock is held across the availability check and the append,
    /// so two sessions racing for the same slot cannot both succeed. Under
    /// [`WildcardPolicy::ResolveAtCommit`] a wildcard request is recorded for
    /// the first free concrete barber.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnknownBarber`] when a concrete barber is not in the
    ///   catalog.
    /// - [`LedgerError::SlotUnavailable`] when the slot is off-grid, not in
    ///   the future at `now`, or already taken for the selection.
    pub fn commit(
        &self,
        date: NaiveDate,
        time: ClockTime,
        selection: &BarberSelection,
        catalog: &Catalog,
        now: NaiveDateTime,
        policy: WildcardPolicy,
    ) -> Result<BookingRecord, LedgerError> {
        if let BarberSelection::Concrete(id) = selection {
            if !catalog.is_concrete_barber(id) {
                return Err(LedgerError::UnknownBarber(id.clone()));
            }
        }

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);

        if !availability::is_bookable(date, time, selection, &records, catalog, now) {
            tracing::debug!(%date, %time, ?selection, "Commit rejected, slot unavailable");
            return Err(LedgerError::SlotUnavailable { date, time });
        }

        let barber = match (selection, policy) {
            (BarberSelection::AnyAvailable, WildcardPolicy::ResolveAtCommit) => {
                availability::resolve_any_available(date, time, &records, catalog)
                    .map(|barber| BarberSelection::Concrete(barber.id.clone()))
                    .ok_or(LedgerError::SlotUnavailable { date, time })?
            },
            _ => selection.clone(),
        };

        let record = BookingRecord::new(date, time, barber);
        records.push(record.clone());
        tracing::info!(
            %date,
            %time,
            barber = ?record.barber,
            total = records.len(),
            "Booking committed"
        );
        Ok(record)
    }
}
