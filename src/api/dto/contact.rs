//! DTOs for contact endpoints.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::{ContactPatch, NewContact};

/// Digits, spaces and `+ - ( )`, with at least one digit. Length is checked
/// separately (5 to 20 characters).
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9+\-() ]*[0-9][0-9+\-() ]*$").expect("phone pattern is a valid regex")
});

/// Request body for `POST /contacts`.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactCreateRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 5, max = 20, message = "Phone number must be 5-20 characters"),
        regex(path = *PHONE_RE, message = "Invalid phone number")
    )]
    pub phone_number: String,

    /// `YYYY-MM-DD`
    pub birthday: NaiveDate,

    #[validate(length(max = 1000, message = "Additional data must be at most 1000 characters"))]
    pub additional_data: Option<String>,
}

impl ContactCreateRequest {
    /// Trims string fields and drops blank `additional_data`. Call before
    /// validating so that whitespace-only names fail the length check.
    pub fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            birthday: self.birthday,
            additional_data: self
                .additional_data
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }

    /// Converts the request into a [`NewContact`] owned by `user_id`.
    pub fn into_new_contact(self, user_id: i64) -> NewContact {
        NewContact {
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            birthday: self.birthday,
            additional_data: self.additional_data,
        }
    }
}

/// Request body for `PUT /contacts/{id}`.
///
/// Every field is optional. Absent, `null` and blank fields leave the stored
/// value unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactUpdateRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(
        length(min = 5, max = 20, message = "Phone number must be 5-20 characters"),
        regex(path = *PHONE_RE, message = "Invalid phone number")
    )]
    pub phone_number: Option<String>,

    pub birthday: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "Additional data must be at most 1000 characters"))]
    pub additional_data: Option<String>,
}

impl ContactUpdateRequest {
    /// Trims string fields and drops the blank ones, so only values that will
    /// actually be applied are validated.
    pub fn without_blanks(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
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
}

impl From<ContactUpdateRequest> for ContactPatch {
    fn from(req: ContactUpdateRequest) -> Self {
        ContactPatch {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            birthday: req.birthday,
            additional_data: req.additional_data,
        }
    }
}

/// Query string of `GET /contacts/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}
