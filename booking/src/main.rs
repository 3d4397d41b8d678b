//! Scripted walk through the booking wizard.
//!
//! Books the first free slot tomorrow for a sample client, printing each
//! step. Configuration comes from the environment (and `.env`); without
//! `ANTHROPIC_API_KEY` the confirmation uses the template, and without a
//! reachable relay both notifications are reported as failed.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use studio_booking::notification::RelayNotificationDispatcher;
use studio_booking::payment::PaymentMethod;
use studio_booking::{
    BarberSelection, BookingAction, BookingEnvironment, BookingLedger, BookingReducer, BookingState,
    Config, ServiceId, format,
};
use studio_core::environment::SystemClock;
use studio_runtime::Store;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let catalog = &config.scheduling.catalog;
    println!("=== {} ===", catalog.shop_name);
    println!("{}\n", catalog.shop_address);

    println!("Services:");
    for service in &catalog.services {
        println!("  [{}] {} ({} min) {}", service.id, service.name, service.duration_minutes, service.price);
    }
    println!("\nBarbers:");
    for selection in catalog.selections() {
        println!("  {}", catalog.selection_label(&selection));
    }

    let dispatcher = Arc::new(RelayNotificationDispatcher::new(config.notifications.relay_url.clone()));
    let env = BookingEnvironment::from_config(&config, BookingLedger::new(), Arc::new(SystemClock), dispatcher);
    let tomorrow = env.today().succ_opt().ok_or("calendar overflow")?;
    let store = Store::new(BookingState::new(), BookingReducer::new(), env);

    let service_id = ServiceId::new("1");
    println!("\nChoosing service {service_id} and any available barber...");
    store.send(BookingAction::SelectService { service_id }).await?;
    store
        .send(BookingAction::SelectBarber {
            selection: BarberSelection::AnyAvailable,
        })
        .await?;

    println!("Looking at {}...", format::long_date(tomorrow));
    store.send(BookingAction::SelectDate { date: tomorrow }).await?;

    let free = store
        .state(|s| s.available_slots().map(|slot| slot.time).collect::<Vec<_>>())
        .await;
    println!(
        "Free slots: {}",
        free.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    );
    let Some(&time) = free.first() else {
        println!("No free slots tomorrow.");
        return Ok(());
    };

    println!("Taking {time}...");
    store.send(BookingAction::SelectTime { time }).await?;
    store
        .send(BookingAction::UpdateClientName {
            name: "Ana Souza".to_string(),
        })
        .await?;
    store
        .send(BookingAction::UpdateClientContact {
            contact: "(83) 98765-4321".to_string(),
        })
        .await?;
    store.send(BookingAction::SubmitDetails).await?;

    let method = PaymentMethod::Pix;
    store.send(BookingAction::SelectPaymentMethod { method }).await?;
    println!("\nPayment: {method}\n{}\n", method.instructions());

    let finalized = store
        .send_and_wait_for(
            BookingAction::ConfirmBooking,
            |action| matches!(action, BookingAction::BookingFinalized { .. }),
            Duration::from_secs(60),
        )
        .await;

    match finalized {
        Ok(BookingAction::BookingFinalized { confirmation }) => {
            println!("Booked {} ({})", confirmation.appointment.id, confirmation.appointment.time);
            println!("\n{}\n", confirmation.message);
            println!("Shop notice:    {:?}", confirmation.shop_notification);
            println!("Client message: {:?}", confirmation.client_notification);
        },
        Ok(_) => {},
        Err(error) => {
            let reason = store.state(|s| s.last_error.clone()).await;
            match reason {
                Some(reason) => println!("Booking not confirmed: {reason}"),
                None => println!("Booking not confirmed: {error}"),
            }
        },
    }

    store.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
