//! Wizard actions.

use crate::notification::DispatchOutcome;
use crate::payment::PaymentMethod;
use crate::types::{Appointment, BarberSelection, ClockTime, ServiceId};
use chrono::NaiveDate;

use super::state::BookingStep;

/// Everything that can happen to a wizard session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    // ========== Commands ==========
    /// "Book this service" shortcut: restart at the barber step with the
    /// service chosen
    PreselectService {
        /// Service to book
        service_id: ServiceId,
    },
    /// Choose a service
    SelectService {
        /// Chosen service
        service_id: ServiceId,
    },
    /// Choose a barber or the wildcard
    SelectBarber {
        /// Chosen barber
        selection: BarberSelection,
    },
    /// Choose a day
    SelectDate {
        /// Chosen day (shop local)
        date: NaiveDate,
    },
    /// Choose a slot on the selected day
    SelectTime {
        /// Chosen slot start
        time: ClockTime,
    },
    /// Recompute the visible slots against the current ledger
    RefreshSlots,
    /// Client name field changed
    UpdateClientName {
        /// Raw input
        name: String,
    },
    /// Client contact field changed
    UpdateClientContact {
        /// Raw input
        contact: String,
    },
    /// Validate the details and move on to payment
    SubmitDetails,
    /// Choose how to pay
    SelectPaymentMethod {
        /// Chosen method
        method: PaymentMethod,
    },
    /// Go back to an earlier step
    EditStep {
        /// Step to return to
        step: BookingStep,
    },
    /// Commit the booking
    ConfirmBooking,
    /// Leave the confirmation and start over
    StartNewBooking,

    // ========== Events ==========
    /// Confirmation message produced and notifications attempted
    BookingFinalized {
        /// Outcome of the confirmation flow
        confirmation: Confirmation,
    },
}

/// A committed booking together with what was sent about it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    /// The appointment as committed
    pub appointment: Appointment,
    /// Text sent to the client, never empty
    pub message: String,
    /// Result of the shop notice
    pub shop_notification: DispatchOutcome,
    /// Result of the client message
    pub client_notification: DispatchOutcome,
}

