//! The booking wizard as a reducer.
//!
//! `service -> barber -> date/time -> details -> payment -> confirmed`, driven
//! by [`BookingAction`]s against a [`BookingState`]. Confirmation commits to
//! the shared ledger inside the reducer and hands the slow work (message
//! production and both notifications) to a single effect.

mod actions;
mod environment;
mod reducer;
mod state;

pub use actions::{BookingAction, Confirmation};
pub use environment::BookingEnvironment;
pub use reducer::{BookingReducer, validate_contact, validate_name};
pub use state::{BookingState, BookingStep};
