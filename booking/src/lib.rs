//! # Studio Booking
//!
//! Appointment booking for a small barbershop, built as a reducer on
//! `studio-core` and driven by a `studio-runtime` store.
//!
//! ## Pieces
//!
//! - [`catalog`]: services, barbers and opening hours
//! - [`availability`]: pure slot computation over a ledger snapshot
//! - [`ledger`]: the shared, append-only record of taken slots
//! - [`wizard`]: the multi-step booking flow (state, actions, reducer)
//! - [`confirmation`]: client confirmation text, generated or templated
//! - [`notification`]: best-effort messages through the WhatsApp relay
//! - [`payment`]: payment methods and their instructions
//! - [`config`]: environment-driven configuration
//!
//! ## Example
//!
//! ```ignore
//! use studio_booking::wizard::{BookingAction, BookingReducer, BookingState};
//! use studio_runtime::Store;
//!
//! let store = Store::new(BookingState::new(), BookingReducer::new(), environment);
//! store.send(BookingAction::SelectService { service_id: "1".into() }).await?;
//! ```

pub mod availability;
pub mod catalog;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod format;
pub mod ledger;
pub mod mocks;
pub mod notification;
pub mod payment;
pub mod types;
pub mod wizard;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{BookingError, FieldError, LedgerError};
pub use ledger::{BookingLedger, WildcardPolicy};
pub use types::{
    Appointment, AppointmentId, Barber, BarberId, BarberSelection, BookingRecord, ClockTime, Service,
    ServiceId, TimeSlot,
};
pub use wizard::{BookingAction, BookingEnvironment, BookingReducer, BookingState, BookingStep};
