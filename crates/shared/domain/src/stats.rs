//! Check-in counters shown on the admin dashboard.

use serde::{Deserialize, Serialize};

use crate::registration::Registration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    pub total: usize,
    pub checked_in: usize,
    pub remaining: usize,
}

impl RegistrationStats {
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let total = registrations.len();
        let checked_in = registrations.iter().filter(|r| r.checked_in).count();
        Self {
            total,
            checked_in,
            remaining: total - checked_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::NewRegistration;
    use chrono::Utc;

    #[test]
    fn counts_checked_in_and_remaining() {
        let mut registrations: Vec<Registration> = (0..3)
            .map(|i| Registration::new(i.to_string(), NewRegistration::default(), Utc::now()))
            .collect();
        registrations[1].checked_in = true;

        let stats = RegistrationStats::from_registrations(&registrations);

        assert_eq!(
            stats,
            RegistrationStats {
                total: 3,
                checked_in: 1,
                remaining: 2
            }
        );
    }
}
