//! Cloud availability status lattice

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which combination of clouds supports an operation
///
/// Values form a join-semilattice: `Unknown` is the bottom, `GlobalOnly`
/// sits just above it, the two single-national-cloud pairings are
/// incomparable, and `AllClouds` is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    /// Availability could not be determined
    #[default]
    Unknown,

    /// Available in the global cloud only
    GlobalOnly,

    /// Available in the global and US Government clouds
    GlobalAndUSGov,

    /// Available in the global and China clouds
    GlobalAndChina,

    /// Available in every national cloud
    AllClouds,
}

impl AvailabilityStatus {
    /// All status values, bottom first
    pub const ALL: [AvailabilityStatus; 5] = [
        AvailabilityStatus::Unknown,
        AvailabilityStatus::GlobalOnly,
        AvailabilityStatus::GlobalAndUSGov,
        AvailabilityStatus::GlobalAndChina,
        AvailabilityStatus::AllClouds,
    ];

    /// Combine two statuses into the most inclusive value
    ///
    /// # Examples
    /// ```
    /// use cloud_support_common::AvailabilityStatus;
    ///
    /// assert_eq!(
    ///     AvailabilityStatus::GlobalAndUSGov.combine(AvailabilityStatus::GlobalAndChina),
    ///     AvailabilityStatus::AllClouds
    /// );
    /// assert_eq!(
    ///     AvailabilityStatus::GlobalOnly.combine(AvailabilityStatus::GlobalAndChina),
    ///     AvailabilityStatus::GlobalAndChina
    /// );
    /// ```
    pub fn combine(self, other: AvailabilityStatus) -> AvailabilityStatus {
        use AvailabilityStatus::*;

        if self == other {
            return self;
        }

        match (self, other) {
            (Unknown, b) => b,
            (a, Unknown) => a,
            (GlobalOnly, b) => b,
            (a, GlobalOnly) => a,
            _ => AllClouds,
        }
    }

    /// Whether the status is a concrete value
    pub fn is_known(&self) -> bool {
        !matches!(self, AvailabilityStatus::Unknown)
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AvailabilityStatus::Unknown => "Unknown",
            AvailabilityStatus::GlobalOnly => "GlobalOnly",
            AvailabilityStatus::GlobalAndUSGov => "GlobalAndUSGov",
            AvailabilityStatus::GlobalAndChina => "GlobalAndChina",
            AvailabilityStatus::AllClouds => "AllClouds",
        };
        f.write_str(name)
    }
}
