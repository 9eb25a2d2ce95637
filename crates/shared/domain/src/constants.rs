//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Registration fields
// =============================================================================

/// Prefix of the validation message listing missing fields
pub const MISSING_FIELDS_PREFIX: &str = "Missing required fields";

// =============================================================================
// Storage
// =============================================================================

/// Document name of the collection inside a gist
pub const DEFAULT_GIST_FILENAME: &str = "registrations.json";

/// Local file used when no path is configured
pub const DEFAULT_REGISTRATIONS_FILE: &str = "data/registrations.json";

// =============================================================================
// Presentation
// =============================================================================

/// Program name printed on reports and name tags
pub const PROGRAM_NAME: &str = "Wild Senses";

/// Notes longer than this are shortened on name tags
pub const NAME_TAG_NOTE_LIMIT: usize = 30;

/// Placeholder for empty notes in exports
pub const EMPTY_NOTE: &str = "None";
