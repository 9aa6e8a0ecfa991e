//! Paging and window query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// `skip` / `limit` query parameters for contact listing.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub skip: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    /// Validates the parameters and returns `(offset, limit)`.
    ///
    /// # Defaults
    ///
    /// - `skip`: 0
    /// - `limit`: 100
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), String> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);

        if skip < 0 {
            return Err("Skip must not be negative".to_string());
        }

        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(format!("Limit must be between 1 and {}", Self::MAX_LIMIT));
        }

        Ok((skip, limit))
    }
}

/// `days` query parameter of the upcoming-birthdays endpoint.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct BirthdayParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub days: Option<u32>,
}

impl BirthdayParams {
    pub const DEFAULT_DAYS: u32 = 7;
    pub const MAX_DAYS: u32 = 366;

    /// Returns the window length in days (default 7, at most 366).
    pub fn validate_and_get_days(&self) -> Result<u32, String> {
        let days = self.days.unwrap_or(Self::DEFAULT_DAYS);
        if days > Self::MAX_DAYS {
            return Err(format!("Days must be between 0 and {}", Self::MAX_DAYS));
        }
        Ok(days)
    }
}
