use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{MeetError, MeetResult},
    models::session::Role,
    time_slot::TimeSlot,
};

/// Page size the doctor dashboard requests; the backend forces it anyway.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Accepted,
        AppointmentStatus::Rejected,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Accepted => "accepted",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Pending)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "accepted" => Ok(AppointmentStatus::Accepted),
            "rejected" => Ok(AppointmentStatus::Rejected),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(MeetError::Validation(format!(
                "Unknown appointment status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRef {
    pub id: Option<i64>,
    pub name: String,
    pub specialisation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// An appointment as the server last reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor: Option<DoctorRef>,
    pub patient: Option<PatientRef>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub note: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn doctor_name(&self) -> Option<&str> {
        self.doctor.as_ref().map(|d| d.name.as_str())
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.patient.as_ref().map(|p| p.name.as_str())
    }
}

/// A complete booking selection, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub note: String,
}

impl BookingDraft {
    /// ISO "YYYY-MM-DD", the only date form the backend parses.
    pub fn date_param(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// 24-hour "HH:MM".
    pub fn time_param(&self) -> String {
        self.time.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentQuery {
    pub role: Role,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl AppointmentQuery {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Doctor => Self {
                role,
                page: Some(0),
                page_size: Some(DEFAULT_PAGE_SIZE),
            },
            Role::Patient | Role::Admin => Self {
                role,
                page: None,
                page_size: None,
            },
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPage {
    pub appointments: Vec<Appointment>,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub is_last_page: bool,
}

impl AppointmentPage {
    /// Wraps an unpaged listing as a single page.
    pub fn single(appointments: Vec<Appointment>) -> Self {
        let page_size = appointments.len() as u32;
        Self {
            appointments,
            total_pages: 1,
            current_page: 0,
            page_size,
            is_last_page: true,
        }
    }
}
