//! Admin reports rendered from the registration list.

pub mod export;
pub mod html;

use chrono::{DateTime, Datelike, Utc};

use domain::EMPTY_NOTE;

/// `M/D/YYYY`, as shown on the admin dashboard.
pub fn short_date(date: &DateTime<Utc>) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Note text, or the placeholder when nothing was recorded.
pub fn note_or_none(note: &str) -> &str {
    if note.is_empty() {
        EMPTY_NOTE
    } else {
        note
    }
}
