//! Data service boundary
//!
//! The dashboard and recovery flows only see [`DataService`]. Calls are
//! asynchronous and may fail; [`MockDataService`] answers with fixed fixtures
//! after an artificial delay, a backend client would answer with the same
//! shapes.

mod mock;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;

pub use mock::{MockDataService, INVALID_RESET_EMAIL};

/// Data the portal reads from the blood bank
pub trait DataService {
    /// Headline numbers for the dashboard counters.
    fn metrics(&self) -> impl Future<Output = ServiceResult<DashboardMetrics>>;

    /// Most recent events, newest first.
    fn recent_activity(&self) -> impl Future<Output = ServiceResult<Vec<ActivityEntry>>>;

    /// Units on hand per blood type.
    fn blood_stock(&self) -> impl Future<Output = ServiceResult<BloodStock>>;

    /// Today's donation appointments.
    fn schedule(&self) -> impl Future<Output = ServiceResult<Vec<ScheduleEntry>>>;

    /// Start a password reset for `email`.
    fn reset_password(&self, email: &str) -> impl Future<Output = ServiceResult<ResetConfirmation>>;
}

// ========== Dashboard ==========

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_donors: u64,
    pub blood_units: u64,
    pub donations_today: u64,
    pub pending_requests: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Donation,
    Request,
    Registration,
    Alert,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Donation => "donation",
            ActivityKind::Request => "request",
            ActivityKind::Registration => "registration",
            ActivityKind::Alert => "alert",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub message: String,
    /// Relative time label, e.g. "5 minutes ago"
    pub time_ago: String,
}

/// ABO/Rh blood group
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How worrying a stock count is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StockLevel {
    Critical,
    Low,
    Adequate,
    Good,
}

impl StockLevel {
    pub fn classify(units: u32) -> Self {
        match units {
            0..=9 => StockLevel::Critical,
            10..=19 => StockLevel::Low,
            20..=49 => StockLevel::Adequate,
            _ => StockLevel::Good,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Low => "low",
            StockLevel::Adequate => "adequate",
            StockLevel::Good => "good",
        }
    }
}

/// Units on hand per blood type
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodStock {
    pub units: BTreeMap<BloodType, u32>,
}

impl BloodStock {
    pub fn units_of(&self, blood_type: BloodType) -> u32 {
        self.units.get(&blood_type).copied().unwrap_or(0)
    }

    pub fn level_of(&self, blood_type: BloodType) -> StockLevel {
        StockLevel::classify(self.units_of(blood_type))
    }

    pub fn total(&self) -> u64 {
        self.units.values().map(|&u| u64::from(u)).sum()
    }

    /// Types at `Low` or worse, most urgent first.
    pub fn shortages(&self) -> Vec<BloodType> {
        let mut short: Vec<BloodType> = self
            .units
            .keys()
            .copied()
            .filter(|&t| self.level_of(t) <= StockLevel::Low)
            .collect();
        short.sort_by_key(|&t| self.units_of(t));
        short
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Completed => "Completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Local time label, e.g. "09:00 AM"
    pub time: String,
    pub donor: String,
    pub blood_type: BloodType,
    pub status: AppointmentStatus,
}

// ========== Password Recovery ==========

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetConfirmation {
    pub email: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_classification() {
        assert_eq!(StockLevel::classify(0), StockLevel::Critical);
        assert_eq!(StockLevel::classify(9), StockLevel::Critical);
        assert_eq!(StockLevel::classify(10), StockLevel::Low);
        assert_eq!(StockLevel::classify(19), StockLevel::Low);
        assert_eq!(StockLevel::classify(20), StockLevel::Adequate);
        assert_eq!(StockLevel::classify(49), StockLevel::Adequate);
        assert_eq!(StockLevel::classify(50), StockLevel::Good);
    }

    #[test]
    fn test_shortages_sorted_by_urgency() {
        let stock = BloodStock {
            units: [
                (BloodType::APositive, 45),
                (BloodType::BNegative, 8),
                (BloodType::ONegative, 15),
                (BloodType::AbNegative, 5),
            ]
            .into_iter()
            .collect(),
        };
        assert_eq!(
            stock.shortages(),
            vec![BloodType::AbNegative, BloodType::BNegative, BloodType::ONegative]
        );
        assert_eq!(stock.units_of(BloodType::OPositive), 0);
        assert_eq!(stock.total(), 73);
    }

    #[test]
    fn test_blood_type_wire_names() {
        let json = serde_json::to_string(&BloodType::AbNegative).unwrap();
        assert_eq!(json, "\"AB-\"");
        let parsed: BloodType = serde_json::from_str("\"O+\"").unwrap();
        assert_eq!(parsed, BloodType::OPositive);
        assert_eq!(BloodType::ONegative.to_string(), "O-");
    }
}
