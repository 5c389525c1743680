use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::appointment::{Appointment, AppointmentStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCounts {
    pub pending: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub cancelled: u64,
}

impl AppointmentCounts {
    pub fn tally<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> Self {
        let mut counts = Self::default();
        for appointment in appointments {
            *counts.slot_mut(appointment.status) += 1;
        }
        counts
    }

    /// Builds counts from a `{status: count}` map; unknown keys are ignored.
    pub fn from_map(map: &HashMap<String, u64>) -> Self {
        let mut counts = Self::default();
        for (key, value) in map {
            if let Ok(status) = key.parse::<AppointmentStatus>() {
                *counts.slot_mut(status) += value;
            }
        }
        counts
    }

    pub fn get(&self, status: AppointmentStatus) -> u64 {
        match status {
            AppointmentStatus::Pending => self.pending,
            AppointmentStatus::Accepted => self.accepted,
            AppointmentStatus::Rejected => self.rejected,
            AppointmentStatus::Cancelled => self.cancelled,
        }
    }

    pub fn total(&self) -> u64 {
        self.pending + self.accepted + self.rejected + self.cancelled
    }

    fn slot_mut(&mut self, status: AppointmentStatus) -> &mut u64 {
        match status {
            AppointmentStatus::Pending => &mut self.pending,
            AppointmentStatus::Accepted => &mut self.accepted,
            AppointmentStatus::Rejected => &mut self.rejected,
            AppointmentStatus::Cancelled => &mut self.cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub doctors: u64,
    pub patients: u64,
    pub admins: u64,
    pub appointments: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}
