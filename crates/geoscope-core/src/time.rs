//! Points in time used to sample time-varying properties.

use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A Julian date, stored as a (possibly fractional) count of days.
///
/// Only ordering and offsets are needed by the updaters, so no calendar
/// conversion lives here.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDate(f64);

impl JulianDate {
    /// `0000-01-01T00:00:00Z`, the earliest representable ISO 8601 instant.
    ///
    /// Constant properties return the same value at every time, so this is
    /// the canonical point at which they are sampled.
    pub const MINIMUM: Self = Self(1_721_059.5);

    /// `9999-12-31T24:00:00Z`, the latest representable ISO 8601 instant.
    pub const MAXIMUM: Self = Self(5_373_484.5);

    /// The J2000 epoch (`2000-01-01T12:00:00Z`).
    pub const J2000: Self = Self(2_451_545.0);

    /// Returns the total day count.
    pub const fn total_days(self) -> f64 {
        self.0
    }

    /// Returns a new date offset by `seconds`.
    #[must_use]
    pub fn add_seconds(self, seconds: f64) -> Self {
        Self(self.0 + seconds / SECONDS_PER_DAY)
    }

    /// Returns the number of seconds from `earlier` to `self`.
    pub fn seconds_since(self, earlier: Self) -> f64 {
        (self.0 - earlier.0) * SECONDS_PER_DAY
    }
}

impl Default for JulianDate {
    fn default() -> Self {
        Self::MINIMUM
    }
}
