//! Domain types for the booking studio.
//!
//! Catalog entries (services, barbers), the barber selection variant, clock
//! times, slots, ledger records and the final appointment.

use crate::payment::PaymentMethod;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Catalog identifier of a service
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a `ServiceId` from any string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog identifier of a concrete barber
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarberId(String);

impl BarberId {
    /// Creates a `BarberId` from any string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BarberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for BarberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a confirmed appointment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    /// Creates a new random `AppointmentId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Catalog entries
// ============================================================================

/// A service the shop offers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: ServiceId,
    /// Display name
    pub name: String,
    /// Duration in minutes (informational, slots are fixed size)
    pub duration_minutes: u32,
    /// Price as shown to the client, e.g. "R$ 25,00"
    pub price: String,
    /// Short description
    pub description: String,
}

/// A concrete, individually schedulable barber
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    /// Unique identifier
    pub id: BarberId,
    /// Display name
    pub name: String,
    /// Optional avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Which barber a booking is for
///
/// `AnyAvailable` is a scheduling wildcard, not a resource: it consumes the
/// capacity of one concrete barber at its slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "barber_id", rename_all = "snake_case")]
pub enum BarberSelection {
    /// A specific barber
    Concrete(BarberId),
    /// Whichever concrete barber is free
    AnyAvailable,
}

impl BarberSelection {
    /// Selection for a specific barber
    #[must_use]
    pub fn concrete(id: impl Into<String>) -> Self {
        Self::Concrete(BarberId::new(id))
    }

    /// The concrete barber, if any
    #[must_use]
    pub const fn barber_id(&self) -> Option<&BarberId> {
        match self {
            Self::Concrete(id) => Some(id),
            Self::AnyAvailable => None,
        }
    }

    /// True for the wildcard
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::AnyAvailable)
    }
}

// ============================================================================
// Time
// ============================================================================

/// A time of day with minute precision, written `"HH:MM"`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minute_of_day: u16,
}

impl ClockTime {
    /// Minutes in a day
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Builds a time from hour and minute, `None` when out of range
    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minute_of_day: hour as u16 * 60 + minute as u16,
            })
        } else {
            None
        }
    }

    /// Builds a time from minutes since midnight, `None` past 23:59
    #[must_use]
    pub const fn from_minute_of_day(minute_of_day: u16) -> Option<Self> {
        if minute_of_day < Self::MINUTES_PER_DAY {
            Some(Self { minute_of_day })
        } else {
            None
        }
    }

    /// Minutes since midnight
    #[must_use]
    pub const fn minute_of_day(self) -> u16 {
        self.minute_of_day
    }

    /// Hour component
    #[must_use]
    pub const fn hour(self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // < 24
        let hour = (self.minute_of_day / 60) as u8;
        hour
    }

    /// Minute component
    #[must_use]
    pub const fn minute(self) -> u8 {
        #[allow(clippy::cast_possible_truncation)] // < 60
        let minute = (self.minute_of_day % 60) as u8;
        minute
    }

    /// The same instant as a `chrono` time
    #[must_use]
    pub fn to_naive(self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or(chrono::NaiveTime::MIN)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Error returned when a string is not a valid `"HH:MM"` time
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time '{0}', expected HH:MM")]
pub struct ParseClockTimeError(String);

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseClockTimeError(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(err)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(err());
        }
        let hour: u8 = hour.parse().map_err(|_| err())?;
        let minute: u8 = minute.parse().map_err(|_| err())?;
        Self::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ParseClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// One bookable position in the day, derived on every query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start of the slot
    pub time: ClockTime,
    /// Whether the requested selection can still book it
    pub available: bool,
}

// ============================================================================
// Ledger and appointments
// ============================================================================

/// One committed reservation of a slot
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Calendar day
    pub date: NaiveDate,
    /// Start of the slot
    pub time: ClockTime,
    /// Barber the slot was booked for
    pub barber: BarberSelection,
}

impl BookingRecord {
    /// Creates a new record
    #[must_use]
    pub const fn new(date: NaiveDate, time: ClockTime, barber: BarberSelection) -> Self {
        Self { date, time, barber }
    }

    /// True when the record sits at `(date, time)`
    #[must_use]
    pub fn is_at(&self, date: NaiveDate, time: ClockTime) -> bool {
        self.date == date && self.time == time
    }
}

/// A fully composed, confirmed booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique identifier
    pub id: AppointmentId,
    /// Booked service
    pub service: Service,
    /// Barber as committed to the ledger
    pub barber: BarberSelection,
    /// Display name of the committed barber, `None` for an unresolved wildcard
    pub barber_name: Option<String>,
    /// Calendar day
    pub date: NaiveDate,
    /// Start time
    pub time: ClockTime,
    /// Client name, trimmed
    pub client_name: String,
    /// Client contact as typed, trimmed
    pub client_contact: String,
    /// Chosen payment method
    pub payment_method: PaymentMethod,
    /// When the booking was committed
    pub booked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    #[test]
    fn clock_time_parses_and_formats() {
        let time: ClockTime = "09:30".parse().unwrap();
        assert_eq!(time.hour(), 9);
        assert_eq!(time.minute(), 30);
        assert_eq!(time.minute_of_day(), 570);
        assert_eq!(time.to_string(), "09:30");
    }

    #[test]
    fn clock_time_rejects_malformed_input() {
        for input in ["9:30", "24:00", "12:60", "1230", "ab:cd", "", "12:3"] {
            assert!(input.parse::<ClockTime>().is_err(), "accepted {input}");
        }
    }

    #[test]
    fn clock_time_orders_by_minute_of_day() {
        let early = ClockTime::new(9, 0).unwrap();
        let late = ClockTime::new(18, 30).unwrap();
        assert!(early < late);
        assert_eq!(ClockTime::from_minute_of_day(1440), None);
    }

    #[test]
    fn clock_time_serializes_as_string() {
        let time = ClockTime::new(14, 0).unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), r#""14:00""#);
        let back: ClockTime = serde_json::from_str(r#""14:00""#).unwrap();
        assert_eq!(back, time);
        assert!(serde_json::from_str::<ClockTime>(r#""25:00""#).is_err());
    }

    #[test]
    fn barber_selection_accessors() {
        let rayff = BarberSelection::concrete("barber1");
        assert_eq!(rayff.barber_id().map(BarberId::as_str), Some("barber1"));
        assert!(!rayff.is_any());
        assert!(BarberSelection::AnyAvailable.is_any());
        assert_eq!(BarberSelection::AnyAvailable.barber_id(), None);
    }

    #[test]
    fn barber_selection_wire_shape() {
        let json = serde_json::to_value(BarberSelection::concrete("barber2")).unwrap();
        assert_eq!(json["kind"], "concrete");
        assert_eq!(json["barber_id"], "barber2");

        let any = serde_json::to_value(BarberSelection::AnyAvailable).unwrap();
        assert_eq!(any["kind"], "any_available");
    }
}
