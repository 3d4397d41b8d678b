//! Wizard state.

use crate::error::{BookingError, FieldError};
use crate::payment::PaymentMethod;
use crate::types::{BarberSelection, ClockTime, Service, ServiceId, TimeSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::actions::Confirmation;

/// Wizard steps, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    /// Picking a service
    ChoosingService,
    /// Picking a barber or the wildcard
    ChoosingBarber,
    /// Picking a day and a slot
    ChoosingDateTime,
    /// Typing name and contact
    EnteringDetails,
    /// Picking a payment method
    ChoosingPayment,
    /// Booking committed (terminal)
    Confirmed,
}

impl BookingStep {
    /// Human-readable step name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChoosingService => "service",
            Self::ChoosingBarber => "barber",
            Self::ChoosingDateTime => "date and time",
            Self::EnteringDetails => "details",
            Self::ChoosingPayment => "payment",
            Self::Confirmed => "confirmation",
        }
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State of one wizard session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingState {
    /// Current step
    pub step: BookingStep,
    /// Service chosen through the "book this service" shortcut
    pub pending_service: Option<ServiceId>,
    /// Chosen service
    pub service: Option<Service>,
    /// Chosen barber
    pub barber: Option<BarberSelection>,
    /// Chosen day (shop local)
    pub date: Option<NaiveDate>,
    /// Chosen slot
    pub time: Option<ClockTime>,
    /// Slots last computed for `date` and `barber`
    pub slots: Vec<TimeSlot>,
    /// Client name as typed
    pub client_name: String,
    /// Client contact as typed
    pub client_contact: String,
    /// Validation error on the name field
    pub name_error: Option<FieldError>,
    /// Validation error on the contact field
    pub contact_error: Option<FieldError>,
    /// Chosen payment method
    pub payment_method: Option<PaymentMethod>,
    /// A confirmation is running
    pub booking_in_progress: bool,
    /// Error shown above the current step
    pub last_error: Option<BookingError>,
    /// Set once the wizard is confirmed
    pub confirmation: Option<Confirmation>,
}

impl BookingState {
    /// Fresh wizard at the service step
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: BookingStep::ChoosingService,
            pending_service: None,
            service: None,
            barber: None,
            date: None,
            time: None,
            slots: Vec::new(),
            client_name: String::new(),
            client_contact: String::new(),
            name_error: None,
            contact_error: None,
            payment_method: None,
            booking_in_progress: false,
            last_error: None,
            confirmation: None,
        }
    }

    /// Fresh wizard entering at the barber step with `service` chosen
    #[must_use]
    pub fn with_pending(service: Service) -> Self {
        Self {
            step: BookingStep::ChoosingBarber,
            pending_service: Some(service.id.clone()),
            service: Some(service),
            ..Self::new()
        }
    }

    /// True once the booking is committed and finalized
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.step, BookingStep::Confirmed)
    }

    /// Slots the client can still pick
    pub fn available_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter().filter(|slot| slot.available)
    }

    /// First step whose selection is missing, if any
    #[must_use]
    pub const fn first_incomplete_step(&self) -> Option<BookingStep> {
        if self.service.is_none() {
            Some(BookingStep::ChoosingService)
        } else if self.barber.is_none() {
            Some(BookingStep::ChoosingBarber)
        } else if self.date.is_none() || self.time.is_none() {
            Some(BookingStep::ChoosingDateTime)
        } else {
            None
        }
    }

    /// Clears the barber and everything after it
    pub(crate) fn clear_from_barber(&mut self) {
        self.barber = None;
        self.clear_from_date();
    }

    /// Clears the day and everything after it
    pub(crate) fn clear_from_date(&mut self) {
        self.date = None;
        self.slots.clear();
        self.clear_from_time();
    }

    /// Clears the slot and the payment method
    pub(crate) fn clear_from_time(&mut self) {
        self.time = None;
        self.payment_method = None;
    }

    /// Clears the typed details and their errors
    pub(crate) fn clear_details(&mut self) {
        self.client_name.clear();
        self.client_contact.clear();
        self.clear_field_errors();
    }

    pub(crate) fn clear_field_errors(&mut self) {
        self.name_error = None;
        self.contact_error = None;
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new()
    }
}
