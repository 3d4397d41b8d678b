//! Availability engine.
//!
//! Pure functions over a ledger snapshot: the same inputs always produce the
//! same slots. A wildcard booking occupies one unit of the shop's concrete
//! capacity without naming a barber, so it blocks every concrete barber at
//! its slot and counts towards the wildcard's own capacity.

use crate::catalog::Catalog;
use crate::types::{Barber, BarberSelection, BookingRecord, ClockTime, TimeSlot};
use chrono::{NaiveDate, NaiveDateTime};

/// Every slot start between opening (inclusive) and closing (exclusive)
pub fn candidate_times(catalog: &Catalog) -> impl Iterator<Item = ClockTime> + '_ {
    let open = u16::from(catalog.opening_hour) * 60;
    let close = (u16::from(catalog.closing_hour) * 60).min(ClockTime::MINUTES_PER_DAY);
    let step = usize::from(catalog.slot_interval_minutes.max(1));
    (open..close)
        .step_by(step)
        .filter_map(ClockTime::from_minute_of_day)
}

/// True when `time` is one of the catalog's slot starts
#[must_use]
pub fn is_slot_start(catalog: &Catalog, time: ClockTime) -> bool {
    candidate_times(catalog).any(|candidate| candidate == time)
}

/// Whether the slot at `(date, time)` has already started or passed at `now`
///
/// Days before today are entirely past; today's slots are past unless they
/// start strictly after `now`.
#[must_use]
pub fn is_past(date: NaiveDate, time: ClockTime, now: NaiveDateTime) -> bool {
    let today = now.date();
    date < today || (date == today && time.to_naive() <= now.time())
}

/// Computes the slots a selection can see on `date`
///
/// Slots that are not strictly in the future at `now` are omitted, so a day
/// before today yields nothing. The rest are returned in ascending time order
/// with their availability against `records`.
#[must_use]
pub fn compute_slots(
    date: NaiveDate,
    selection: &BarberSelection,
    records: &[BookingRecord],
    catalog: &Catalog,
    now: NaiveDateTime,
) -> Vec<TimeSlot> {
    let slots: Vec<TimeSlot> = candidate_times(catalog)
        .filter(|&time| !is_past(date, time, now))
        .map(|time| TimeSlot {
            time,
            available: is_slot_available(date, time, selection, records, catalog),
        })
        .collect();

    tracing::trace!(
        %date,
        ?selection,
        slots = slots.len(),
        available = slots.iter().filter(|s| s.available).count(),
        "Computed slots"
    );
    slots
}

/// Booked-state check for a single slot, ignoring the clock
///
/// - `Concrete(b)`: free unless a record at the slot is for `b` or is a
///   wildcard booking.
/// - `AnyAvailable`: free while concrete bookings plus wildcard bookings at
///   the slot stay below the number of concrete barbers. With no concrete
///   barbers nothing is ever free.
#[must_use]
pub fn is_slot_available(
    date: NaiveDate,
    time: ClockTime,
    selection: &BarberSelection,
    records: &[BookingRecord],
    catalog: &Catalog,
) -> bool {
    let mut at_slot = records.iter().filter(|r| r.is_at(date, time));
    match selection {
        BarberSelection::Concrete(barber) => !at_slot.any(|r| match &r.barber {
            BarberSelection::Concrete(booked) => booked == barber,
            BarberSelection::AnyAvailable => true,
        }),
        BarberSelection::AnyAvailable => {
            let capacity = catalog.concrete_barber_count();
            if capacity == 0 {
                return false;
            }
            let occupied = at_slot
                .filter(|r| match &r.barber {
                    BarberSelection::Concrete(booked) => catalog.is_concrete_barber(booked),
                    BarberSelection::AnyAvailable => true,
                })
                .count();
            occupied < capacity
        },
    }
}

/// Full bookability check used at commit time
///
/// The time must be a catalog slot start, strictly in the future, and free
/// for the selection.
#[must_use]
pub fn is_bookable(
    date: NaiveDate,
    time: ClockTime,
    selection: &BarberSelection,
    records: &[BookingRecord],
    catalog: &Catalog,
    now: NaiveDateTime,
) -> bool {
    is_slot_start(catalog, time)
        && !is_past(date, time, now)
        && is_slot_available(date, time, selection, records, catalog)
}

/// Picks the concrete barber a wildcard booking at `(date, time)` goes to
///
/// Returns the first barber in catalog order without a booking of their own,
/// provided the free barbers outnumber the wildcard bookings already holding
/// capacity at the slot.
#[must_use]
pub fn resolve_any_available<'a>(
    date: NaiveDate,
    time: ClockTime,
    records: &[BookingRecord],
    catalog: &'a Catalog,
) -> Option<&'a Barber> {
    let at_slot: Vec<&BookingRecord> = records.iter().filter(|r| r.is_at(date, time)).collect();
    let held_by_wildcard = at_slot.iter().filter(|r| r.barber.is_any()).count();

    let mut free = catalog.barbers.iter().filter(|barber| {
        !at_slot
            .iter()
            .any(|r| r.barber.barber_id() == Some(&barber.id))
    });

    let first = free.next()?;
    let free_count = 1 + free.count();
    (free_count > held_by_wildcard).then_some(first)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn record(d: u32, time: &str, barber: BarberSelection) -> BookingRecord {
        BookingRecord::new(day(d), t(time), barber)
    }

    #[test]
    fn future_day_has_every_slot() {
        let slots = compute_slots(
            day(12),
            &BarberSelection::AnyAvailable,
            &[],
            &Catalog::studio(),
            at(10, 12, 0),
        );
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0].time, t("09:00"));
        assert_eq!(slots[19].time, t("18:30"));
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn today_omits_started_slots() {
        let slots = compute_slots(
            day(10),
            &BarberSelection::concrete("barber1"),
            &[],
            &Catalog::studio(),
            at(10, 12, 0),
        );
        // 12:00 is not strictly after now
        assert_eq!(slots.first().map(|s| s.time), Some(t("12:30")));
        assert_eq!(slots.len(), 13);
    }

    #[test]
    fn past_day_is_empty() {
        let slots = compute_slots(
            day(9),
            &BarberSelection::AnyAvailable,
            &[],
            &Catalog::studio(),
            at(10, 8, 0),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn concrete_booking_blocks_only_that_barber() {
        let catalog = Catalog::studio();
        let records = [record(12, "10:00", BarberSelection::concrete("barber1"))];
        assert!(!is_slot_available(day(12), t("10:00"), &BarberSelection::concrete("barber1"), &records, &catalog));
        assert!(is_slot_available(day(12), t("10:00"), &BarberSelection::concrete("barber2"), &records, &catalog));
        assert!(is_slot_available(day(12), t("10:00"), &BarberSelection::AnyAvailable, &records, &catalog));
        assert!(is_slot_available(day(12), t("10:30"), &BarberSelection::concrete("barber1"), &records, &catalog));
    }

    #[test]
    fn wildcard_booking_blocks_every_concrete_barber() {
        let catalog = Catalog::studio();
        let records = [record(12, "09:00", BarberSelection::AnyAvailable)];
        assert!(!is_slot_available(day(12), t("09:00"), &BarberSelection::concrete("barber1"), &records, &catalog));
        assert!(!is_slot_available(day(12), t("09:00"), &BarberSelection::concrete("barber2"), &records, &catalog));
        assert!(is_slot_available(day(12), t("09:00"), &BarberSelection::AnyAvailable, &records, &catalog));
    }

    #[test]
    fn wildcard_is_full_when_capacity_is_consumed() {
        let catalog = Catalog::studio();
        let one = [record(12, "09:00", BarberSelection::concrete("barber2"))];
        assert!(is_slot_available(day(12), t("09:00"), &BarberSelection::AnyAvailable, &one, &catalog));

        let two = [
            record(12, "09:00", BarberSelection::concrete("barber2")),
            record(12, "09:00", BarberSelection::AnyAvailable),
        ];
        assert!(!is_slot_available(day(12), t("09:00"), &BarberSelection::AnyAvailable, &two, &catalog));
    }

    #[test]
    fn unknown_barber_records_do_not_consume_capacity() {
        let catalog = Catalog::studio();
        let records = [
            record(12, "09:00", BarberSelection::concrete("retired")),
            record(12, "09:00", BarberSelection::concrete("barber1")),
        ];
        assert!(is_slot_available(day(12), t("09:00"), &BarberSelection::AnyAvailable, &records, &catalog));
    }

    #[test]
    fn no_concrete_barbers_means_never_available() {
        let mut catalog = Catalog::studio();
        catalog.barbers.clear();
        let slots = compute_slots(day(12), &BarberSelection::AnyAvailable, &[], &catalog, at(10, 8, 0));
        assert_eq!(slots.len(), 20);
        assert!(slots.iter().all(|s| !s.available));
    }

    #[test]
    fn odd_intervals_stop_before_closing() {
        let mut catalog = Catalog::studio();
        catalog.opening_hour = 9;
        catalog.closing_hour = 10;
        catalog.slot_interval_minutes = 25;
        let times: Vec<String> = candidate_times(&catalog).map(|t| t.to_string()).collect();
        assert_eq!(times, ["09:00", "09:25", "09:50"]);
    }

    #[test]
    fn bookable_requires_grid_future_and_free() {
        let catalog = Catalog::studio();
        let now = at(10, 12, 0);
        let any = BarberSelection::AnyAvailable;
        assert!(is_bookable(day(10), t("12:30"), &any, &[], &catalog, now));
        assert!(!is_bookable(day(10), t("12:00"), &any, &[], &catalog, now));
        assert!(!is_bookable(day(11), t("12:15"), &any, &[], &catalog, now));
        assert!(!is_bookable(day(11), t("19:00"), &any, &[], &catalog, now));
        assert!(!is_bookable(day(9), t("15:00"), &any, &[], &catalog, now));
    }

    #[test]
    fn resolution_picks_first_free_barber_in_catalog_order() {
        let catalog = Catalog::studio();
        let free = resolve_any_available(day(12), t("09:00"), &[], &catalog).unwrap();
        assert_eq!(free.name, "Rayff");

        let records = [record(12, "09:00", BarberSelection::concrete("barber1"))];
        let free = resolve_any_available(day(12), t("09:00"), &records, &catalog).unwrap();
        assert_eq!(free.name, "Nicolas");
    }

    #[test]
    fn resolution_respects_wildcard_holds() {
        let catalog = Catalog::studio();
        let records = [
            record(12, "09:00", BarberSelection::concrete("barber1")),
            record(12, "09:00", BarberSelection::AnyAvailable),
        ];
        assert!(resolve_any_available(day(12), t("09:00"), &records, &catalog).is_none());

        let records = [record(12, "09:00", BarberSelection::AnyAvailable)];
        assert!(resolve_any_available(day(12), t("09:00"), &records, &catalog).is_some());
    }
}
