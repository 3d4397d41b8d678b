//! Date formatting for client and shop messages.

use chrono::NaiveDate;

/// `Thursday, March 12, 2026`
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `12/03/2026`
#[must_use]
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
