//! Spreadsheet export.

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};

use common::{AppError, AppResult};
use domain::Registration;

use super::{note_or_none, short_date};

pub const CSV_HEADERS: [&str; 11] = [
    "Child Names",
    "Ages",
    "Parent Name",
    "Parent Email",
    "Parent Phone",
    "Emergency Contact",
    "Emergency Phone",
    "Allergies",
    "Special Needs",
    "Checked In",
    "Registration Date",
];

/// Download name for an export made on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("wild-senses-registrations-{}.csv", date.format("%Y-%m-%d"))
}

/// One header row plus one row per registration, every field quoted.
pub fn registrations_csv(registrations: &[Registration]) -> AppResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS).map_err(csv_error)?;

    for registration in registrations {
        let registration_date = short_date(&registration.registration_date);
        writer
            .write_record([
                registration.child_names.as_str(),
                registration.child_ages.as_str(),
                registration.parent_name.as_str(),
                registration.parent_email.as_str(),
                registration.parent_phone.as_str(),
                registration.emergency_contact_name.as_str(),
                registration.emergency_contact_phone.as_str(),
                note_or_none(&registration.allergies),
                note_or_none(&registration.neurodivergencies),
                if registration.checked_in { "Yes" } else { "No" },
                registration_date.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("failed to finish CSV export: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::internal(format!("CSV export is not UTF-8: {}", e)))
}

fn csv_error(err: csv::Error) -> AppError {
    AppError::internal(format!("failed to write CSV export: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain::NewRegistration;

    fn registration() -> Registration {
        let form = NewRegistration {
            parent_name: "Jo \"JJ\" Lee".to_string(),
            parent_email: "jo@x.com".to_string(),
            parent_phone: "555-1".to_string(),
            child_names: "Amy, Sam".to_string(),
            child_ages: "6, 8".to_string(),
            allergies: "peanuts".to_string(),
            emergency_contact_name: "Pat".to_string(),
            emergency_contact_phone: "555-2".to_string(),
            ..NewRegistration::default()
        };
        let date = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        Registration::new("1".to_string(), form, date)
    }

    #[test]
    fn header_row_comes_first_and_is_quoted() {
        let csv = registrations_csv(&[]).unwrap();
        assert_eq!(
            csv.trim_end(),
            "\"Child Names\",\"Ages\",\"Parent Name\",\"Parent Email\",\"Parent Phone\",\
             \"Emergency Contact\",\"Emergency Phone\",\"Allergies\",\"Special Needs\",\
             \"Checked In\",\"Registration Date\""
        );
    }

    #[test]
    fn rows_use_placeholders_and_short_dates() {
        let csv = registrations_csv(&[registration()]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert_eq!(
            row,
            "\"Amy, Sam\",\"6, 8\",\"Jo \"\"JJ\"\" Lee\",\"jo@x.com\",\"555-1\",\"Pat\",\
             \"555-2\",\"peanuts\",\"None\",\"No\",\"6/1/2024\""
        );
    }

    #[test]
    fn filename_carries_the_export_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(export_filename(date), "wild-senses-registrations-2024-06-01.csv");
    }
}
