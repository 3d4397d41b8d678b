//! End-to-end wizard sessions driven through the store

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use studio_booking::config::GenerationConfig;
use studio_booking::confirmation::GenerativeProducer;
use studio_booking::mocks::{RecordingDispatcher, ScriptedGenerator, template_environment};
use studio_booking::notification::DispatchOutcome;
use studio_booking::payment::PaymentMethod;
use studio_booking::{
    BarberSelection, BookingAction, BookingEnvironment, BookingError, BookingLedger, BookingReducer,
    BookingState, BookingStep, ClockTime, ServiceId,
};
use studio_runtime::Store;
use studio_testing::{init_test_tracing, test_clock};

type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

fn thursday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()
}

fn at(hour: u8, minute: u8) -> ClockTime {
    ClockTime::new(hour, minute).unwrap()
}

fn store(env: BookingEnvironment) -> BookingStore {
    Store::new(BookingState::new(), BookingReducer::new(), env)
}

async fn fill_wizard(store: &BookingStore, selection: BarberSelection, time: ClockTime) {
    for action in [
        BookingAction::SelectService {
            service_id: ServiceId::new("2"),
        },
        BookingAction::SelectBarber { selection },
        BookingAction::SelectDate { date: thursday() },
        BookingAction::SelectTime { time },
        BookingAction::UpdateClientName {
            name: "Bruno Lima".to_string(),
        },
        BookingAction::UpdateClientContact {
            contact: "83 99123-4567".to_string(),
        },
        BookingAction::SubmitDetails,
        BookingAction::SelectPaymentMethod {
            method: PaymentMethod::DebitCard,
        },
    ] {
        store.send(action).await.unwrap();
    }
}

async fn confirm(store: &BookingStore) -> BookingAction {
    store
        .send_and_wait_for(
            BookingAction::ConfirmBooking,
            |action| matches!(action, BookingAction::BookingFinalized { .. }),
            Duration::from_secs(5),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn happy_path_confirms_and_notifies() {
    init_test_tracing();
    let dispatcher = RecordingDispatcher::new();
    let ledger = BookingLedger::new();
    let env = template_environment(ledger.clone(), Arc::new(test_clock()), Arc::new(dispatcher.clone()));
    let shop_number = env.notifications.shop_number.clone();
    let store = store(env);

    fill_wizard(&store, BarberSelection::concrete("barber2"), at(15, 0)).await;
    let BookingAction::BookingFinalized { confirmation } = confirm(&store).await else {
        panic!("expected BookingFinalized");
    };

    assert_eq!(confirmation.appointment.service.name, "Corte Navalhado");
    assert_eq!(confirmation.appointment.barber_name.as_deref(), Some("Nicolas"));
    assert_eq!(
        confirmation.message,
        "Hello Bruno Lima, your Corte Navalhado appointment with Nicolas on 12/03/2026 at 15:00 is \
         confirmed! Thank you for choosing StudioBarber1002."
    );

    let state = store.state(Clone::clone).await;
    assert_eq!(state.step, BookingStep::Confirmed);
    assert!(!state.booking_in_progress);
    assert_eq!(ledger.len(), 1);

    let shop = dispatcher.calls_to(&shop_number);
    assert_eq!(shop.len(), 1);
    assert!(shop[0].message.contains("Client: Bruno Lima\n"));
    assert!(shop[0].message.contains("Payment: Debit card\n"));
    assert_eq!(dispatcher.calls_to("83991234567").len(), 1);
}

#[tokio::test]
async fn failed_notifications_do_not_undo_the_booking() {
    let dispatcher = RecordingDispatcher::with_outcome(DispatchOutcome::Rejected { status: 502 });
    let ledger = BookingLedger::new();
    let store = store(template_environment(
        ledger.clone(),
        Arc::new(test_clock()),
        Arc::new(dispatcher),
    ));

    fill_wizard(&store, BarberSelection::AnyAvailable, at(9, 0)).await;
    let BookingAction::BookingFinalized { confirmation } = confirm(&store).await else {
        panic!("expected BookingFinalized");
    };

    assert_eq!(confirmation.shop_notification, DispatchOutcome::Rejected { status: 502 });
    assert_eq!(confirmation.client_notification, DispatchOutcome::Rejected { status: 502 });
    assert!(store.state(BookingState::is_confirmed).await);
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn generated_message_reaches_the_client() {
    let dispatcher = RecordingDispatcher::new();
    let generator = ScriptedGenerator::replying("Bruno, see you Thursday at 15:00 with Nicolas!");
    let env = template_environment(BookingLedger::new(), Arc::new(test_clock()), Arc::new(dispatcher.clone()));
    let producer = GenerativeProducer::new(
        Arc::new(generator.clone()),
        env.catalog.shop_name.clone(),
        GenerationConfig::default(),
    );
    let env = BookingEnvironment {
        producer: Arc::new(producer),
        ..env
    };
    let store = store(env);

    fill_wizard(&store, BarberSelection::concrete("barber2"), at(15, 0)).await;
    let BookingAction::BookingFinalized { confirmation } = confirm(&store).await else {
        panic!("expected BookingFinalized");
    };

    assert_eq!(confirmation.message, "Bruno, see you Thursday at 15:00 with Nicolas!");
    assert_eq!(dispatcher.calls_to("83991234567")[0].message, confirmation.message);
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].user.contains("Barber: Nicolas"));
}

#[tokio::test]
async fn editing_date_then_resubmitting_books_the_new_slot() {
    let ledger = BookingLedger::new();
    let store = store(template_environment(
        ledger.clone(),
        Arc::new(test_clock()),
        Arc::new(RecordingDispatcher::new()),
    ));

    fill_wizard(&store, BarberSelection::concrete("barber1"), at(11, 0)).await;
    store
        .send(BookingAction::EditStep {
            step: BookingStep::ChoosingDateTime,
        })
        .await
        .unwrap();

    let state = store.state(Clone::clone).await;
    assert_eq!(state.step, BookingStep::ChoosingDateTime);
    assert_eq!(state.time, Some(at(11, 0)));
    assert_eq!(state.payment_method, None);
    assert_eq!(state.client_name, "Bruno Lima");

    for action in [
        BookingAction::SelectTime { time: at(16, 30) },
        BookingAction::SubmitDetails,
        BookingAction::SelectPaymentMethod {
            method: PaymentMethod::Cash,
        },
    ] {
        store.send(action).await.unwrap();
    }
    let BookingAction::BookingFinalized { confirmation } = confirm(&store).await else {
        panic!("expected BookingFinalized");
    };

    assert_eq!(confirmation.appointment.time, at(16, 30));
    assert_eq!(confirmation.appointment.payment_method, PaymentMethod::Cash);
    assert_eq!(ledger.snapshot()[0].time, at(16, 30));
}

#[tokio::test]
async fn booked_slot_disappears_for_the_next_session() {
    let ledger = BookingLedger::new();
    let env = template_environment(ledger.clone(), Arc::new(test_clock()), Arc::new(RecordingDispatcher::new()));

    let first = store(env.clone());
    fill_wizard(&first, BarberSelection::concrete("barber1"), at(10, 0)).await;
    confirm(&first).await;

    let second = store(env);
    for action in [
        BookingAction::SelectService {
            service_id: ServiceId::new("4"),
        },
        BookingAction::SelectBarber {
            selection: BarberSelection::concrete("barber1"),
        },
        BookingAction::SelectDate { date: thursday() },
        BookingAction::SelectTime { time: at(10, 0) },
    ] {
        second.send(action).await.unwrap();
    }

    let state = second.state(Clone::clone).await;
    assert_eq!(state.step, BookingStep::ChoosingDateTime);
    assert_eq!(
        state.last_error,
        Some(BookingError::SlotUnavailable {
            date: thursday(),
            time: at(10, 0)
        })
    );
    assert!(state.available_slots().all(|slot| slot.time != at(10, 0)));
}

#[tokio::test]
async fn start_new_booking_after_confirmation_resets() {
    let store = store(template_environment(
        BookingLedger::new(),
        Arc::new(test_clock()),
        Arc::new(RecordingDispatcher::new()),
    ));

    fill_wizard(&store, BarberSelection::AnyAvailable, at(12, 0)).await;
    confirm(&store).await;
    store.send(BookingAction::StartNewBooking).await.unwrap();

    assert_eq!(store.state(Clone::clone).await, BookingState::new());
    store.shutdown(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn refresh_picks_up_bookings_from_other_sessions() {
    let ledger = BookingLedger::new();
    let store = store(template_environment(
        ledger.clone(),
        Arc::new(test_clock()),
        Arc::new(RecordingDispatcher::new()),
    ));

    for action in [
        BookingAction::SelectService {
            service_id: ServiceId::new("5"),
        },
        BookingAction::SelectBarber {
            selection: BarberSelection::concrete("barber2"),
        },
        BookingAction::SelectDate { date: thursday() },
    ] {
        store.send(action).await.unwrap();
    }
    assert_eq!(store.state(|s| s.available_slots().count()).await, 20);

    ledger.append(studio_booking::BookingRecord::new(
        thursday(),
        at(17, 0),
        BarberSelection::concrete("barber2"),
    ));
    store.send(BookingAction::RefreshSlots).await.unwrap();

    let state = store.state(Clone::clone).await;
    assert_eq!(state.available_slots().count(), 19);
    assert!(state.slots.iter().any(|slot| slot.time == at(17, 0) && !slot.available));
}
