//! Fixture-backed data service

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use super::{
    ActivityEntry, ActivityKind, AppointmentStatus, BloodStock, BloodType, DashboardMetrics,
    DataService, ResetConfirmation, ScheduleEntry,
};
use crate::error::{ServiceError, ServiceResult};
use crate::host::Host;

/// Address the mock reset endpoint does not know
pub const INVALID_RESET_EMAIL: &str = "test@invalid.com";

const METRICS_LATENCY_MS: u32 = 1000;
const ACTIVITY_LATENCY_MS: u32 = 500;
const STOCK_LATENCY_MS: u32 = 800;
const SCHEDULE_LATENCY_MS: u32 = 600;
const RESET_LATENCY_MS: u32 = 1000;

/// Answers every call with a constant fixture after a fixed delay.
pub struct MockDataService<H: Host> {
    host: Rc<H>,
    /// Fail every call with [`ServiceError::Unavailable`]
    offline: Cell<bool>,
}

impl<H: Host> MockDataService<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self {
            host,
            offline: Cell::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    async fn respond<T>(&self, call: &'static str, latency_ms: u32, value: T) -> ServiceResult<T> {
        self.host.sleep(latency_ms).await;
        if self.offline.get() {
            debug!(call, "mock service offline");
            return Err(ServiceError::Unavailable);
        }
        debug!(call, latency_ms, "mock service answered");
        Ok(value)
    }
}

impl<H: Host> DataService for MockDataService<H> {
    async fn metrics(&self) -> ServiceResult<DashboardMetrics> {
        self.respond("metrics", METRICS_LATENCY_MS, metrics_fixture())
            .await
    }

    async fn recent_activity(&self) -> ServiceResult<Vec<ActivityEntry>> {
        self.respond("recent_activity", ACTIVITY_LATENCY_MS, activity_fixture())
            .await
    }

    async fn blood_stock(&self) -> ServiceResult<BloodStock> {
        self.respond("blood_stock", STOCK_LATENCY_MS, stock_fixture())
            .await
    }

    async fn schedule(&self) -> ServiceResult<Vec<ScheduleEntry>> {
        self.respond("schedule", SCHEDULE_LATENCY_MS, schedule_fixture())
            .await
    }

    async fn reset_password(&self, email: &str) -> ServiceResult<ResetConfirmation> {
        let confirmation = ResetConfirmation {
            email: email.to_string(),
            message: format!("Password reset instructions have been sent to {}", email),
        };
        let confirmation = self
            .respond("reset_password", RESET_LATENCY_MS, confirmation)
            .await?;
        if email.eq_ignore_ascii_case(INVALID_RESET_EMAIL) {
            return Err(ServiceError::Rejected(
                "Email address not found in our system.".to_string(),
            ));
        }
        Ok(confirmation)
    }
}

// ========== Fixtures ==========

fn metrics_fixture() -> DashboardMetrics {
    DashboardMetrics {
        total_donors: 2847,
        blood_units: 1234,
        donations_today: 47,
        pending_requests: 12,
    }
}

fn activity_fixture() -> Vec<ActivityEntry> {
    let entry = |kind, message: &str, time_ago: &str| ActivityEntry {
        kind,
        message: message.to_string(),
        time_ago: time_ago.to_string(),
    };
    vec![
        entry(ActivityKind::Donation, "John Smith donated O+ blood", "5 minutes ago"),
        entry(ActivityKind::Request, "City Hospital requested 4 units of A-", "18 minutes ago"),
        entry(ActivityKind::Registration, "New donor Maria Garcia registered", "1 hour ago"),
        entry(ActivityKind::Alert, "AB- stock below critical threshold", "2 hours ago"),
    ]
}

fn stock_fixture() -> BloodStock {
    BloodStock {
        units: [
            (BloodType::APositive, 45),
            (BloodType::ANegative, 12),
            (BloodType::BPositive, 38),
            (BloodType::BNegative, 8),
            (BloodType::AbPositive, 22),
            (BloodType::AbNegative, 5),
            (BloodType::OPositive, 67),
            (BloodType::ONegative, 15),
        ]
        .into_iter()
        .collect(),
    }
}

fn schedule_fixture() -> Vec<ScheduleEntry> {
    let entry = |time: &str, donor: &str, blood_type, status| ScheduleEntry {
        time: time.to_string(),
        donor: donor.to_string(),
        blood_type,
        status,
    };
    vec![
        entry("09:00 AM", "Sarah Johnson", BloodType::APositive, AppointmentStatus::Completed),
        entry("10:30 AM", "Michael Chen", BloodType::ONegative, AppointmentStatus::Confirmed),
        entry("01:15 PM", "Emily Davis", BloodType::BPositive, AppointmentStatus::Confirmed),
        entry("03:45 PM", "Robert Wilson", BloodType::AbPositive, AppointmentStatus::Pending),
    ]
}
