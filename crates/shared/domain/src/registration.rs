//! Registration domain entity and related types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// One family's signup for the program.
///
/// Field names on the wire are camelCase; this is also the layout of every
/// object in the persisted JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Unique identifier, assigned at creation
    #[cfg_attr(feature = "openapi", schema(example = "1717234200000"))]
    pub id: String,
    #[cfg_attr(feature = "openapi", schema(example = "Jo Lee"))]
    pub parent_name: String,
    #[cfg_attr(feature = "openapi", schema(example = "jo@example.com"))]
    pub parent_email: String,
    #[cfg_attr(feature = "openapi", schema(example = "555-0101"))]
    pub parent_phone: String,
    /// Comma separated, free text
    #[cfg_attr(feature = "openapi", schema(example = "Amy, Sam"))]
    pub child_names: String,
    /// Comma separated, free text
    #[cfg_attr(feature = "openapi", schema(example = "6, 8"))]
    pub child_ages: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub allergies: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub neurodivergencies: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub checked_in: bool,
    /// Set once at creation
    #[serde(with = "iso_millis")]
    pub registration_date: DateTime<Utc>,
}

impl Registration {
    /// Build a fresh registration from validated form data.
    ///
    /// The timestamp is truncated to milliseconds so the record compares equal
    /// to itself after a trip through the store.
    pub fn new(id: String, form: NewRegistration, now: DateTime<Utc>) -> Self {
        Self {
            id,
            parent_name: form.parent_name,
            parent_email: form.parent_email,
            parent_phone: form.parent_phone,
            child_names: form.child_names,
            child_ages: form.child_ages,
            allergies: form.allergies,
            neurodivergencies: form.neurodivergencies,
            emergency_contact_name: form.emergency_contact_name,
            emergency_contact_phone: form.emergency_contact_phone,
            checked_in: false,
            registration_date: now.trunc_subsecs(3),
        }
    }

    /// Merge a partial update into this record.
    ///
    /// Only supplied fields change. `id` and `registrationDate` are never
    /// touched; the names of any such keys present in the patch are returned
    /// so the caller can report them.
    pub fn apply(&mut self, patch: RegistrationPatch) -> Vec<&'static str> {
        let ignored = patch.protected_fields_present();

        let RegistrationPatch {
            parent_name,
            parent_email,
            parent_phone,
            child_names,
            child_ages,
            allergies,
            neurodivergencies,
            emergency_contact_name,
            emergency_contact_phone,
            checked_in,
            id: _,
            registration_date: _,
        } = patch;

        merge(&mut self.parent_name, parent_name);
        merge(&mut self.parent_email, parent_email);
        merge(&mut self.parent_phone, parent_phone);
        merge(&mut self.child_names, child_names);
        merge(&mut self.child_ages, child_ages);
        merge(&mut self.allergies, allergies);
        merge(&mut self.neurodivergencies, neurodivergencies);
        merge(&mut self.emergency_contact_name, emergency_contact_name);
        merge(&mut self.emergency_contact_phone, emergency_contact_phone);
        merge(&mut self.checked_in, checked_in);

        ignored
    }

    /// Flip the check-in status, returning the new value
    pub fn toggle_check_in(&mut self) -> bool {
        self.checked_in = !self.checked_in;
        self.checked_in
    }

    /// Whether any allergy or special-needs note is recorded
    pub fn has_notes(&self) -> bool {
        !self.allergies.is_empty() || !self.neurodivergencies.is_empty()
    }

    /// Case-insensitive substring match on child names, parent name and email.
    ///
    /// `term` must already be lowercase.
    fn matches(&self, term: &str) -> bool {
        [&self.child_names, &self.parent_name, &self.parent_email]
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Registration form data submitted by a parent.
///
/// Absent keys and `null` values deserialize to empty strings so that
/// [`NewRegistration::validate`] can report them by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct NewRegistration {
    #[cfg_attr(feature = "openapi", schema(example = "Jo Lee"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub parent_name: String,
    #[cfg_attr(feature = "openapi", schema(example = "jo@example.com"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub parent_email: String,
    #[cfg_attr(feature = "openapi", schema(example = "555-0101"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub parent_phone: String,
    #[cfg_attr(feature = "openapi", schema(example = "Amy, Sam"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub child_names: String,
    #[cfg_attr(feature = "openapi", schema(example = "6, 8"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub child_ages: String,
    /// Optional
    #[serde(deserialize_with = "null_as_empty")]
    pub allergies: String,
    /// Optional
    #[serde(deserialize_with = "null_as_empty")]
    pub neurodivergencies: String,
    #[cfg_attr(feature = "openapi", schema(example = "Pat Lee"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub emergency_contact_name: String,
    #[cfg_attr(feature = "openapi", schema(example = "555-0102"))]
    #[serde(deserialize_with = "null_as_empty")]
    pub emergency_contact_phone: String,
}

impl NewRegistration {
    /// Wire names of required fields that are empty or whitespace only
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("parentName", &self.parent_name),
            ("parentEmail", &self.parent_email),
            ("parentPhone", &self.parent_phone),
            ("childNames", &self.child_names),
            ("childAges", &self.child_ages),
            ("emergencyContactName", &self.emergency_contact_name),
            ("emergencyContactPhone", &self.emergency_contact_phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check that all required fields are present
    pub fn validate(&self) -> DomainResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingFields(missing))
        }
    }
}

/// Partial update of a registration. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_names: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_ages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neurodivergencies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in: Option<bool>,
    /// Accepted so whole records can be sent back, never applied
    #[serde(skip_serializing)]
    pub id: Option<Value>,
    /// Accepted so whole records can be sent back, never applied
    #[serde(skip_serializing)]
    pub registration_date: Option<Value>,
}

impl RegistrationPatch {
    /// Patch that only sets the check-in flag
    pub fn check_in(checked_in: bool) -> Self {
        Self {
            checked_in: Some(checked_in),
            ..Self::default()
        }
    }

    /// Names of protected keys carried by this patch
    pub fn protected_fields_present(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.id.is_some() {
            present.push("id");
        }
        if self.registration_date.is_some() {
            present.push("registrationDate");
        }
        present
    }
}

/// Next id for a collection: creation time in epoch milliseconds, bumped past
/// the largest numeric id already present so ids stay unique and increasing.
pub fn next_id(existing: &[Registration], now: DateTime<Utc>) -> String {
    let candidate = now.timestamp_millis().max(0) as u64;
    let highest = existing
        .iter()
        .filter_map(|registration| registration.id.parse::<u64>().ok())
        .max();

    // At u64::MAX there is nothing larger to move to; fall back to the
    // clock and rely on the collision scan below for uniqueness.
    let mut id = match highest {
        Some(highest) if highest >= candidate => highest.checked_add(1).unwrap_or(candidate),
        _ => candidate,
    };

    // Non-numeric ids from older data cannot collide with a number, but a
    // numeric string with leading zeros could.
    while existing.iter().any(|registration| registration.id == id.to_string()) {
        id = id.wrapping_add(1);
    }

    id.to_string()
}

/// Keep registrations matching `term` (case-insensitive substring over child
/// names, parent name and parent email). An empty term keeps everything.
pub fn search(registrations: Vec<Registration>, term: &str) -> Vec<Registration> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return registrations;
    }

    registrations
        .into_iter()
        .filter(|registration| registration.matches(&term))
        .collect()
}

/// `null` reads as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}
