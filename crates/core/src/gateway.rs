//! # Remote API Gateway
//!
//! The single seam between the booking/workflow controllers and the backend.
//! Implementations attach credentials from the [`SessionContext`] themselves
//! and convert every failure into a [`MeetError`] carrying user-facing text.
//!
//! [`SessionContext`]: crate::session::SessionContext
//! [`MeetError`]: crate::errors::MeetError

use async_trait::async_trait;
use mockall::automock;

use crate::{
    errors::MeetResult,
    models::{
        appointment::{Appointment, AppointmentPage, AppointmentQuery, BookingDraft},
        doctor::Doctor,
        profile::{DoctorProfile, PatientProfile, PatientProfileUpdate},
        session::{LoginRequest, RegisterAdminRequest, RegisterPatientRequest, Session},
        stats::{AppointmentCounts, DailyCount, DashboardStats},
    },
    workflow::Decision,
};

#[automock]
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Authenticates and establishes the session.
    async fn login(&self, request: &LoginRequest) -> MeetResult<Session>;

    /// Ends the session. The local session is forgotten even if the call fails.
    async fn logout(&self) -> MeetResult<()>;

    async fn register_patient(&self, request: &RegisterPatientRequest) -> MeetResult<()>;

    /// Admin only.
    async fn register_admin(&self, request: &RegisterAdminRequest) -> MeetResult<()>;

    async fn list_doctors(&self) -> MeetResult<Vec<Doctor>>;

    async fn get_doctor(&self, doctor_id: i64) -> MeetResult<Doctor>;

    /// Admin only.
    async fn delete_doctor(&self, doctor_id: i64) -> MeetResult<()>;

    async fn list_specialisations(&self) -> MeetResult<Vec<String>>;

    async fn doctors_by_specialisation(&self, specialisation: &str) -> MeetResult<Vec<Doctor>>;

    /// The signed-in doctor's own profile.
    async fn get_doctor_profile(&self) -> MeetResult<DoctorProfile>;

    async fn update_doctor_profile(&self, profile: &DoctorProfile) -> MeetResult<DoctorProfile>;

    async fn update_patient_profile(
        &self,
        update: &PatientProfileUpdate,
    ) -> MeetResult<PatientProfile>;

    async fn book_appointment(&self, draft: &BookingDraft) -> MeetResult<Appointment>;

    async fn update_appointment_status(
        &self,
        appointment_id: i64,
        decision: Decision,
    ) -> MeetResult<Appointment>;

    /// Used both for a patient cancelling and a doctor removing an appointment.
    async fn cancel_appointment(&self, appointment_id: i64) -> MeetResult<()>;

    async fn list_appointments(&self, query: &AppointmentQuery) -> MeetResult<AppointmentPage>;

    async fn doctor_appointment_counts(&self) -> MeetResult<AppointmentCounts>;

    async fn admin_status_counts(&self) -> MeetResult<AppointmentCounts>;

    async fn appointments_over_time(&self) -> MeetResult<Vec<DailyCount>>;

    async fn dashboard_stats(&self) -> MeetResult<DashboardStats>;
}
