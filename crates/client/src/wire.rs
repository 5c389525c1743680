//! Backend payload shapes and their conversion into core models.
//!
//! The backend serializes dates either as `[year, month, day]` arrays or as
//! ISO strings, and times as `[hour, minute(, second)]` or "HH:MM(:SS)". Both
//! forms are normalized here so nothing downstream sees them.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use eyre::eyre;
use medimeet_core::{
    errors::{CONFLICT_ERROR_MESSAGE, MeetError, MeetResult},
    models::{
        appointment::{Appointment, AppointmentPage, AppointmentStatus, DoctorRef, PatientRef},
        doctor::Doctor,
        session::{Role, Session},
        stats::{AppointmentCounts, DailyCount},
    },
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireDate {
    Parts(Vec<i64>),
    Text(String),
}

impl WireDate {
    pub fn to_date(&self) -> MeetResult<NaiveDate> {
        match self {
            WireDate::Parts(parts) => match parts.as_slice() {
                [year, month, day, ..] => {
                    let invalid = || MeetError::Internal(eyre!("Invalid date parts: {:?}", parts));
                    let year = i32::try_from(*year).map_err(|_| invalid())?;
                    let month = u32::try_from(*month).map_err(|_| invalid())?;
                    let day = u32::try_from(*day).map_err(|_| invalid())?;
                    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
                }
                _ => Err(MeetError::Internal(eyre!("Incomplete date parts: {:?}", parts))),
            },
            WireDate::Text(text) => {
                // Timestamps like "2024-05-01T00:00:00" keep only their date.
                let date_part = text.split('T').next().unwrap_or(text);
                NaiveDate::parse_from_str(date_part.trim(), "%Y-%m-%d")
                    .map_err(|err| MeetError::Internal(eyre!("Invalid date {:?}: {}", text, err)))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireTime {
    Parts(Vec<u32>),
    Text(String),
}

impl WireTime {
    pub fn to_time(&self) -> MeetResult<NaiveTime> {
        match self {
            WireTime::Parts(parts) => {
                let (hour, minute, second) = match parts.as_slice() {
                    [hour, minute] => (*hour, *minute, 0),
                    [hour, minute, second, ..] => (*hour, *minute, *second),
                    _ => {
                        return Err(MeetError::Internal(eyre!(
                            "Incomplete time parts: {:?}",
                            parts
                        )));
                    }
                };
                NaiveTime::from_hms_opt(hour, minute, second)
                    .ok_or_else(|| MeetError::Internal(eyre!("Invalid time parts: {:?}", parts)))
            }
            WireTime::Text(text) => {
                let trimmed = text.trim();
                NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
                    .map_err(|err| MeetError::Internal(eyre!("Invalid time {:?}: {}", text, err)))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDoctorRef {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "specialization")]
    pub specialisation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePatientRef {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Either the full appointment entity (nested `doctor`/`patient`) or the
/// flattened doctor-dashboard row (`patientName`, `patientEmail`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAppointment {
    pub id: i64,
    pub date: WireDate,
    pub time: WireTime,
    #[serde(default, alias = "note")]
    pub comment: Option<String>,
    pub status: Option<String>,
    pub doctor: Option<WireDoctorRef>,
    pub patient: Option<WirePatientRef>,
    pub doctor_name: Option<String>,
    #[serde(alias = "doctorSpecialisation")]
    pub doctor_specialization: Option<String>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
}

impl TryFrom<WireAppointment> for Appointment {
    type Error = MeetError;

    fn try_from(wire: WireAppointment) -> MeetResult<Self> {
        let status = match wire.status.as_deref() {
            Some(text) if !text.trim().is_empty() => text.parse::<AppointmentStatus>()?,
            _ => AppointmentStatus::Pending,
        };

        let doctor = match (wire.doctor, wire.doctor_name) {
            (Some(doctor), _) => Some(DoctorRef {
                id: doctor.id,
                name: doctor.name,
                specialisation: doctor.specialisation,
            }),
            (None, Some(name)) => Some(DoctorRef {
                id: None,
                name,
                specialisation: wire.doctor_specialization,
            }),
            (None, None) => None,
        };

        let patient = match (wire.patient, wire.patient_name) {
            (Some(patient), _) => Some(PatientRef {
                id: patient.id,
                name: patient.name,
                email: patient.email,
                phone: patient.phone,
            }),
            (None, Some(name)) => Some(PatientRef {
                id: None,
                name,
                email: wire.patient_email,
                phone: wire.patient_phone,
            }),
            (None, None) => None,
        };

        Ok(Appointment {
            id: wire.id,
            doctor,
            patient,
            date: wire.date.to_date()?,
            time: wire.time.to_time()?,
            note: wire.comment.unwrap_or_default(),
            status,
        })
    }
}

pub fn appointments_from_wire(wire: Vec<WireAppointment>) -> MeetResult<Vec<Appointment>> {
    wire.into_iter().map(Appointment::try_from).collect()
}

/// Envelope of the paged doctor listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAppointmentPage {
    #[serde(default)]
    pub content: Vec<WireAppointment>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub is_last_page: bool,
}

impl TryFrom<WireAppointmentPage> for AppointmentPage {
    type Error = MeetError;

    fn try_from(wire: WireAppointmentPage) -> MeetResult<Self> {
        Ok(AppointmentPage {
            appointments: appointments_from_wire(wire.content)?,
            total_pages: wire.total_pages,
            current_page: wire.current_page,
            page_size: wire.page_size,
            is_last_page: wire.is_last_page,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDoctor {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    #[serde(default, alias = "specialization")]
    pub specialisation: String,
    pub phone: Option<String>,
    pub about: Option<String>,
    pub experience: Option<String>,
    pub image_url: Option<String>,
}

impl From<WireDoctor> for Doctor {
    fn from(wire: WireDoctor) -> Self {
        Doctor {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            specialisation: wire.specialisation,
            phone: wire.phone,
            about: wire.about,
            experience: wire.experience,
            image_url: wire.image_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireLoginResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub token: Option<String>,
    pub name: Option<String>,
}

impl TryFrom<WireLoginResponse> for Session {
    type Error = MeetError;

    fn try_from(wire: WireLoginResponse) -> MeetResult<Self> {
        let token = wire
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                MeetError::Authentication("Login response did not include a token".into())
            })?;
        let role: Role = wire.role.parse()?;
        Ok(Session {
            user_id: wire.id,
            email: wire.email,
            name: wire.name,
            role,
            token,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDailyCount {
    pub date: WireDate,
    pub count: u64,
}

impl TryFrom<WireDailyCount> for DailyCount {
    type Error = MeetError;

    fn try_from(wire: WireDailyCount) -> MeetResult<Self> {
        Ok(DailyCount {
            date: wire.date.to_date()?,
            count: wire.count,
        })
    }
}

pub fn counts_from_wire(map: HashMap<String, u64>) -> AppointmentCounts {
    AppointmentCounts::from_map(&map)
}

/// Maps a non-success status and its body onto the error taxonomy.
///
/// The body's `message` (or `error`) field wins when present; a plain-text
/// body is used as-is; otherwise a default per status is used.
pub fn error_from_status(status: u16, body: &str) -> MeetError {
    let message = extract_message(body);
    match status {
        400 => MeetError::Validation(message.unwrap_or_else(|| "Invalid request".into())),
        401 => MeetError::Authentication(
            message.unwrap_or_else(|| "Your session has expired. Please log in again".into()),
        ),
        403 => MeetError::Authorization(
            message.unwrap_or_else(|| "You are not allowed to perform this action".into()),
        ),
        404 => MeetError::NotFound(message.unwrap_or_else(|| "Not found".into())),
        409 => MeetError::Conflict(message.unwrap_or_else(|| CONFLICT_ERROR_MESSAGE.into())),
        _ => MeetError::Server {
            status,
            message: message.unwrap_or_else(|| "Something went wrong on the server".into()),
        },
    }
}

fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["message", "error"]
            .iter()
            .filter_map(|key| map.get(*key))
            .filter_map(|value| value.as_str())
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(text)) if !text.trim().is_empty() => {
            Some(text.trim().to_string())
        }
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn dates_accept_arrays_and_strings() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).expect("date");
        let parts: WireDate = serde_json::from_value(json!([2024, 5, 1])).expect("parts");
        let text: WireDate = serde_json::from_value(json!("2024-05-01")).expect("text");
        let stamp: WireDate = serde_json::from_value(json!("2024-05-01T09:15:00")).expect("stamp");

        assert_eq!(parts.to_date().expect("parts"), expected);
        assert_eq!(text.to_date().expect("text"), expected);
        assert_eq!(stamp.to_date().expect("stamp"), expected);
    }

    #[test]
    fn times_accept_arrays_and_strings() {
        let expected = NaiveTime::from_hms_opt(14, 30, 0).expect("time");
        for value in [json!([14, 30]), json!([14, 30, 0]), json!("14:30"), json!("14:30:00")] {
            let wire: WireTime = serde_json::from_value(value).expect("wire time");
            assert_eq!(wire.to_time().expect("normalized"), expected);
        }
    }

    #[test]
    fn out_of_range_parts_do_not_wrap() {
        // 2^32 + 2024 would truncate to 2024 with a plain cast.
        for value in [
            json!([4294969320i64, 5, 1]),
            json!([2024, 4294967301i64, 1]),
            json!([2024, -7, 1]),
        ] {
            let wire: WireDate = serde_json::from_value(value).expect("parts");
            assert!(wire.to_date().is_err(), "{:?} should be rejected", wire);
        }
    }

    #[test]
    fn short_parts_are_rejected() {
        let wire: WireDate = serde_json::from_value(json!([2024, 5])).expect("parts");
        assert!(wire.to_date().is_err());
        let wire: WireTime = serde_json::from_value(json!([14])).expect("parts");
        assert!(wire.to_time().is_err());
    }

    #[test]
    fn flattened_dashboard_row_becomes_appointment() {
        let wire: WireAppointment = serde_json::from_value(json!({
            "id": 12,
            "date": [2024, 5, 1],
            "time": [10, 30],
            "comment": "Follow-up",
            "status": "accepted",
            "patientName": "Ada Lovelace",
            "patientEmail": "ada@example.com",
            "patientPhone": "555-0100"
        }))
        .expect("wire appointment");

        let appointment = Appointment::try_from(wire).expect("converted");
        assert_eq!(appointment.patient_name(), Some("Ada Lovelace"));
        assert_eq!(appointment.status, AppointmentStatus::Accepted);
        assert_eq!(appointment.note, "Follow-up");
        assert!(appointment.doctor.is_none());
    }

    #[test]
    fn missing_status_defaults_to_pending() {
        let wire: WireAppointment = serde_json::from_value(json!({
            "id": 3,
            "date": "2024-05-01",
            "time": "10:00",
            "doctor": {"id": 9, "name": "Sarah Johnson", "specialisation": "Cardiology"}
        }))
        .expect("wire appointment");

        let appointment = Appointment::try_from(wire).expect("converted");
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.doctor_name(), Some("Sarah Johnson"));
        assert_eq!(appointment.note, "");
    }

    #[test]
    fn doctor_accepts_either_spelling() {
        let wire: WireDoctor = serde_json::from_value(json!({
            "id": 1,
            "name": "Sarah Johnson",
            "specialization": "Cardiology",
            "imageUrl": "https://img.example.com/sarah.png"
        }))
        .expect("wire doctor");
        let doctor = Doctor::from(wire);
        assert_eq!(doctor.specialisation, "Cardiology");
        assert_eq!(doctor.image_url.as_deref(), Some("https://img.example.com/sarah.png"));
    }

    #[test]
    fn login_without_token_is_rejected() {
        let wire: WireLoginResponse = serde_json::from_value(json!({
            "id": 1, "email": "a@example.com", "role": "PATIENT", "token": null
        }))
        .expect("wire login");
        assert!(matches!(Session::try_from(wire), Err(MeetError::Authentication(_))));
    }

    #[test]
    fn error_messages_prefer_server_text() {
        let err = error_from_status(409, r#"{"message": "Slot already taken"}"#);
        assert_eq!(err.message(), "Slot already taken");
        assert!(matches!(err, MeetError::Conflict(_)));

        let err = error_from_status(409, "");
        assert_eq!(err.message(), CONFLICT_ERROR_MESSAGE);

        let err = error_from_status(403, "Unauthorized: Only doctors can access this endpoint");
        assert_eq!(err.message(), "Unauthorized: Only doctors can access this endpoint");

        let err = error_from_status(500, r#"{"error": "boom"}"#);
        assert!(matches!(err, MeetError::Server { status: 500, .. }));
        assert_eq!(err.message(), "boom");
    }
}
