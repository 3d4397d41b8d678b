//! Wizard reducer.
//!
//! Every action either moves the wizard or records a [`BookingError`] in
//! `last_error`; nothing here returns an error or panics. The only effect is
//! the confirmation flow started by a successful commit.

use crate::availability;
use crate::confirmation::TemplateProducer;
use crate::error::{BookingError, FieldError, LedgerError};
use crate::notification::shop_notice;
use crate::payment::PaymentMethod;
use crate::types::{Appointment, AppointmentId, BarberSelection, ClockTime, ServiceId};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use studio_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

use super::actions::{BookingAction, Confirmation};
use super::environment::BookingEnvironment;
use super::state::{BookingState, BookingStep};

type Effects = SmallVec<[Effect<BookingAction>; 4]>;

static CONTACT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,20}$").ok());

/// Checks the client name
///
/// # Errors
///
/// [`FieldError::NameRequired`] when blank after trimming.
pub fn validate_name(name: &str) -> Result<(), FieldError> {
    if name.trim().is_empty() {
        Err(FieldError::NameRequired)
    } else {
        Ok(())
    }
}

/// Checks the client contact
///
/// An optional leading `+` followed by 10 to 20 digits, spaces, hyphens or
/// parentheses.
///
/// # Errors
///
/// [`FieldError::ContactRequired`] when blank after trimming,
/// [`FieldError::ContactMalformed`] when it does not look like a phone number.
pub fn validate_contact(contact: &str) -> Result<(), FieldError> {
    let contact = contact.trim();
    if contact.is_empty() {
        return Err(FieldError::ContactRequired);
    }
    match CONTACT_PATTERN.as_ref() {
        Some(pattern) if pattern.is_match(contact) => Ok(()),
        _ => Err(FieldError::ContactMalformed),
    }
}

/// Reducer for one booking wizard session
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fail(state: &mut BookingState, error: BookingError) -> Effects {
        tracing::debug!(step = %state.step, %error, "Booking action rejected");
        state.last_error = Some(error);
        SmallVec::new()
    }

    /// Rejects changes while confirmed or while a confirmation runs, and
    /// actions that belong to a step the wizard has not reached
    fn guard(state: &BookingState, required: BookingStep) -> Result<(), BookingError> {
        if state.booking_in_progress {
            return Err(BookingError::ConfirmationInProgress);
        }
        if state.is_confirmed() || state.step < required {
            return Err(BookingError::NotAtStep(state.step));
        }
        Ok(())
    }

    fn refresh_slots(state: &mut BookingState, env: &BookingEnvironment) {
        state.slots = match (&state.barber, state.date) {
            (Some(selection), Some(date)) => availability::compute_slots(
                date,
                selection,
                &env.ledger.snapshot(),
                &env.catalog,
                env.now_local(),
            ),
            _ => Vec::new(),
        };
    }

    fn validate_details(state: &mut BookingState) -> bool {
        state.name_error = validate_name(&state.client_name).err();
        state.contact_error = validate_contact(&state.client_contact).err();
        state.name_error.is_none() && state.contact_error.is_none()
    }

    // ========== Selection ==========

    fn preselect_service(state: &mut BookingState, service_id: &ServiceId, env: &BookingEnvironment) -> Effects {
        if state.booking_in_progress {
            return Self::fail(state, BookingError::ConfirmationInProgress);
        }
        let Some(service) = env.catalog.service(service_id) else {
            return Self::fail(state, BookingError::UnknownService(service_id.clone()));
        };
        *state = BookingState::with_pending(service.clone());
        SmallVec::new()
    }

    fn select_service(state: &mut BookingState, service_id: &ServiceId, env: &BookingEnvironment) -> Effects {
        if let Err(error) = Self::guard(state, BookingStep::ChoosingService) {
            return Self::fail(state, error);
        }
        let Some(service) = env.catalog.service(service_id) else {
            return Self::fail(state, BookingError::UnknownService(service_id.clone()));
        };

        state.clear_from_barber();
        state.clear_field_errors();
        state.service = Some(service.clone());
        state.last_error = None;
        state.step = BookingStep::ChoosingBarber;
        SmallVec::new()
    }

    fn select_barber(state: &mut BookingState, selection: BarberSelection, env: &BookingEnvironment) -> Effects {
        if let Err(error) = Self::guard(state, BookingStep::ChoosingBarber) {
            return Self::fail(state, error);
        }
        if let BarberSelection::Concrete(id) = &selection {
            if !env.catalog.is_concrete_barber(id) {
                return Self::fail(state, BookingError::UnknownBarber(id.clone()));
            }
        }

        // Re-selecting, even the same barber, starts the later steps over
        state.clear_from_date();
        state.clear_field_errors();
        state.barber = Some(selection);
        Self::refresh_slots(state, env);
        state.last_error = None;
        state.step = BookingStep::ChoosingDateTime;
        SmallVec::new()
    }

    fn select_date(state: &mut BookingState, date: NaiveDate, env: &BookingEnvironment) -> Effects {
        if let Err(error) = Self::guard(state, BookingStep::ChoosingDateTime) {
            return Self::fail(state, error);
        }
        if date < env.today() {
            return Self::fail(state, BookingError::DateInPast(date));
        }

        state.clear_from_time();
        state.date = Some(date);
        Self::refresh_slots(state, env);
        state.clear_field_errors();
        state.last_error = None;
        state.step = BookingStep::ChoosingDateTime;
        SmallVec::new()
    }

    fn select_time(state: &mut BookingState, time: ClockTime, env: &BookingEnvironment) -> Effects {
        if let Err(error) = Self::guard(state, BookingStep::ChoosingDateTime) {
            return Self::fail(state, error);
        }
        let Some(date) = state.date else {
            return Self::fail(state, BookingError::IncompleteSelection);
        };

        // Availability may have moved since the slots were shown
        Self::refresh_slots(state, env);
        let free = state.slots.iter().any(|slot| slot.time == time && slot.available);
        if !free {
            state.step = BookingStep::ChoosingDateTime;
            return Self::fail(state, BookingError::SlotUnavailable { date, time });
        }

        state.time = Some(time);
        state.payment_method = None;
        state.clear_field_errors();
        state.last_error = None;
        state.step = BookingStep::EnteringDetails;
        SmallVec::new()
    }

    // ========== Details and payment ==========

    fn submit_details(state: &mut BookingState) -> Effects {
        if let Err(error) = Self::guard(state, BookingStep::EnteringDetails) {
            return Self::fail(state, error);
        }
        if !Self::validate_details(state) {
            state.step = BookingStep::EnteringDetails;
            return Self::fail(state, BookingError::InvalidDetails);
        }
        state.last_error = None;
        state.step = BookingStep::ChoosingPayment;
        SmallVec::new()
    }

    fn select_payment(state: &mut BookingState, method: PaymentMethod) -> Effects {
        if let Err(error) = Self::guard(state, BookingStep::ChoosingPayment) {
            return Self::fail(state, error);
        }
        state.payment_method = Some(method);
        state.last_error = None;
        SmallVec::new()
    }

    fn edit_step(state: &mut BookingState, step: BookingStep, env: &BookingEnvironment) -> Effects {
        // Only steps already reached can be revisited
        if let Err(error) = Self::guard(state, step) {
            return Self::fail(state, error);
        }

        match step {
            BookingStep::ChoosingService => {
                state.clear_from_barber();
                state.clear_details();
                state.pending_service = None;
            },
            BookingStep::ChoosingBarber => state.clear_from_date(),
            BookingStep::ChoosingDateTime => {
                state.payment_method = None;
                Self::refresh_slots(state, env);
            },
            BookingStep::EnteringDetails => state.payment_method = None,
            BookingStep::ChoosingPayment | BookingStep::Confirmed => {},
        }
        state.clear_field_errors();
        state.last_error = None;
        state.step = step;
        SmallVec::new()
    }

    // ========== Confirmation ==========

    fn confirm(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        if state.booking_in_progress {
            return Self::fail(state, BookingError::ConfirmationInProgress);
        }
        if state.is_confirmed() {
            return Self::fail(state, BookingError::NotAtStep(state.step));
        }

        let (Some(service), Some(selection), Some(date), Some(time)) =
            (state.service.clone(), state.barber.clone(), state.date, state.time)
        else {
            state.step = state
                .first_incomplete_step()
                .unwrap_or(BookingStep::ChoosingService);
            return Self::fail(state, BookingError::IncompleteSelection);
        };

        // Only the payment step can confirm
        if state.step != BookingStep::ChoosingPayment {
            return Self::fail(state, BookingError::NotAtStep(state.step));
        }

        if !Self::validate_details(state) {
            state.step = BookingStep::EnteringDetails;
            return Self::fail(state, BookingError::InvalidDetails);
        }

        let Some(payment_method) = state.payment_method else {
            state.step = BookingStep::ChoosingPayment;
            return Self::fail(state, BookingError::PaymentMethodRequired);
        };

        let record = match env.ledger.commit(
            date,
            time,
            &selection,
            &env.catalog,
            env.now_local(),
            env.wildcard_policy,
        ) {
            Ok(record) => record,
            Err(LedgerError::SlotUnavailable { date, time }) => {
                metrics::counter!("studio.bookings.rejected", "reason" => "slot_unavailable").increment(1);
                state.clear_from_time();
                Self::refresh_slots(state, env);
                state.step = BookingStep::ChoosingDateTime;
                return Self::fail(state, BookingError::SlotUnavailable { date, time });
            },
            Err(LedgerError::UnknownBarber(id)) => {
                metrics::counter!("studio.bookings.rejected", "reason" => "unknown_barber").increment(1);
                state.clear_from_barber();
                state.step = BookingStep::ChoosingBarber;
                return Self::fail(state, BookingError::UnknownBarber(id));
            },
        };

        let barber_name = record
            .barber
            .barber_id()
            .and_then(|id| env.catalog.barber(id))
            .map(|barber| barber.name.clone());

        let appointment = Appointment {
            id: AppointmentId::new(),
            service,
            barber: record.barber,
            barber_name,
            date,
            time,
            client_name: state.client_name.trim().to_string(),
            client_contact: state.client_contact.trim().to_string(),
            payment_method,
            booked_at: env.clock.now(),
        };

        tracing::info!(
            appointment_id = %appointment.id,
            %date,
            %time,
            barber = ?appointment.barber,
            "Booking confirmed, sending notifications"
        );
        metrics::counter!("studio.bookings.committed").increment(1);

        state.booking_in_progress = true;
        state.last_error = None;

        smallvec![Self::finalize_effect(appointment, env)]
    }

    /// Produces the client message and sends both notifications
    ///
    /// The shop notice runs concurrently with the producer; the client
    /// message goes out as soon as it is produced. All three are awaited
    /// before the wizard is told the booking is finalized.
    fn finalize_effect(appointment: Appointment, env: &BookingEnvironment) -> Effect<BookingAction> {
        let producer = Arc::clone(&env.producer);
        let dispatcher = Arc::clone(&env.dispatcher);
        let settings = env.notifications.clone();
        let shop_name = env.catalog.shop_name.clone();

        Effect::future(async move {
            let notice = shop_notice(&appointment, &shop_name);

            let shop = dispatcher.dispatch(&settings.shop_number, notice, settings.shop_timeout);
            let client = async {
                let produced = producer.produce(appointment.clone()).await;
                let message = if produced.trim().is_empty() {
                    TemplateProducer::new(shop_name.clone()).render(&appointment)
                } else {
                    produced.trim().to_string()
                };
                let outcome = dispatcher
                    .dispatch(&appointment.client_contact, message.clone(), settings.client_timeout)
                    .await;
                (message, outcome)
            };

            let (shop_notification, (message, client_notification)) = tokio::join!(shop, client);

            Some(BookingAction::BookingFinalized {
                confirmation: Confirmation {
                    appointment,
                    message,
                    shop_notification,
                    client_notification,
                },
            })
        })
    }

    fn finalize(state: &mut BookingState, confirmation: Confirmation) -> Effects {
        tracing::info!(
            appointment_id = %confirmation.appointment.id,
            shop = ?confirmation.shop_notification,
            client = ?confirmation.client_notification,
            "Booking finalized"
        );
        state.booking_in_progress = false;
        state.last_error = None;
        state.confirmation = Some(confirmation);
        state.step = BookingStep::Confirmed;
        SmallVec::new()
    }

    fn start_new(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        if state.booking_in_progress {
            return Self::fail(state, BookingError::ConfirmationInProgress);
        }
        let pending = state
            .pending_service
            .as_ref()
            .and_then(|id| env.catalog.service(id))
            .cloned();
        *state = pending.map_or_else(BookingState::new, BookingState::with_pending);
        SmallVec::new()
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            BookingAction::PreselectService { service_id } => {
                Self::preselect_service(state, &service_id, env)
            },
            BookingAction::SelectService { service_id } => Self::select_service(state, &service_id, env),
            BookingAction::SelectBarber { selection } => Self::select_barber(state, selection, env),
            BookingAction::SelectDate { date } => Self::select_date(state, date, env),
            BookingAction::SelectTime { time } => Self::select_time(state, time, env),
            BookingAction::RefreshSlots => {
                Self::refresh_slots(state, env);
                SmallVec::new()
            },
            BookingAction::UpdateClientName { name } => {
                if let Err(error) = Self::guard(state, BookingStep::EnteringDetails) {
                    return Self::fail(state, error);
                }
                state.client_name = name;
                state.name_error = None;
                SmallVec::new()
            },
            BookingAction::UpdateClientContact { contact } => {
                if let Err(error) = Self::guard(state, BookingStep::EnteringDetails) {
                    return Self::fail(state, error);
                }
                state.client_contact = contact;
                state.contact_error = None;
                SmallVec::new()
            },
            BookingAction::SubmitDetails => Self::submit_details(state),
            BookingAction::SelectPaymentMethod { method } => Self::select_payment(state, method),
            BookingAction::EditStep { step } => Self::edit_step(state, step, env),
            BookingAction::ConfirmBooking => Self::confirm(state, env),
            BookingAction::StartNewBooking => Self::start_new(state, env),

            // ========== Events ==========
            BookingAction::BookingFinalized { confirmation } => Self::finalize(state, confirmation),
        }
    }
}
