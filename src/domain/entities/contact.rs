//! Contact entity representing an address-book entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An address-book entry owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: NaiveDate,
    pub additional_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new contact.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birthday: NaiveDate,
    pub additional_data: Option<String>,
}

/// Partial update for an existing contact.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub additional_data: Option<String>,
}

impl ContactPatch {
    /// Drops blank string fields so they don't overwrite stored values.
    pub fn without_blanks(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            first_name: keep(self.first_name),
            last_name: keep(self.last_name),
            email: keep(self.email),
            phone_number: keep(self.phone_number),
            birthday: self.birthday,
            additional_data: keep(self.additional_data),
        }
    }

    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_blanks_drops_empty_strings() {
        let patch = ContactPatch {
            first_name: Some("".to_string()),
            last_name: Some("Doe".to_string()),
            additional_data: Some("   ".to_string()),
            ..Default::default()
        }
        .without_blanks();

        assert!(patch.first_name.is_none());
        assert_eq!(patch.last_name.as_deref(), Some("Doe"));
        assert!(patch.additional_data.is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(ContactPatch::default().is_empty());
        assert!(
            !ContactPatch {
                birthday: NaiveDate::from_ymd_opt(1990, 1, 1),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
