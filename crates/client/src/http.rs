//! [`ApiGateway`] over HTTP.
//!
//! Every authenticated call reads the bearer token from the shared
//! [`SessionContext`]; a call made without one fails before anything is sent.
//! A 401 from the backend invalidates the session.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use eyre::eyre;
use medimeet_core::{
    errors::{CONFLICT_ERROR_MESSAGE, MeetError, MeetResult, NETWORK_ERROR_MESSAGE},
    gateway::ApiGateway,
    models::{
        appointment::{
            Appointment, AppointmentPage, AppointmentQuery, BookingDraft, DEFAULT_PAGE_SIZE,
        },
        doctor::Doctor,
        profile::{DoctorProfile, PatientProfile, PatientProfileUpdate},
        session::{LoginRequest, RegisterAdminRequest, RegisterPatientRequest, Role, Session},
        stats::{AppointmentCounts, DailyCount, DashboardStats},
    },
    session::SessionContext,
    workflow::Decision,
};
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    wire::{
        WireAppointment, WireAppointmentPage, WireDailyCount, WireDoctor, WireLoginResponse,
        appointments_from_wire, counts_from_wire, error_from_status,
    },
};

pub struct HttpGateway {
    client: Client,
    config: ClientConfig,
    session: Arc<SessionContext>,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig, session: Arc<SessionContext>) -> MeetResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| MeetError::Internal(eyre!("Failed to build HTTP client: {}", err)))?;

        Ok(Self {
            client,
            config: config.clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    fn authorized(&self, builder: RequestBuilder) -> MeetResult<RequestBuilder> {
        let token = self
            .session
            .bearer_token()
            .ok_or_else(|| MeetError::Authentication("Please log in to continue".into()))?;
        Ok(builder.bearer_auth(token))
    }

    /// Attaches the token when there is one; public endpoints work either way.
    fn maybe_authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> MeetResult<Response> {
        let response = builder.send().await.map_err(|err| {
            warn!(error = %err, "Request failed before a response arrived");
            MeetError::Network(NETWORK_ERROR_MESSAGE.to_string())
        })?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.session.invalidate() {
                warn!(error = %err, "Failed to clear the stored session after a 401");
            }
        }
        Err(error_from_status(status.as_u16(), &body))
    }

    /// Registration endpoints answer a taken email with a bare 409.
    async fn register(&self, builder: RequestBuilder) -> MeetResult<()> {
        match self.send(builder).await {
            Ok(_) => Ok(()),
            Err(MeetError::Conflict(message)) if message == CONFLICT_ERROR_MESSAGE => Err(
                MeetError::Conflict("An account with this email already exists".into()),
            ),
            Err(err) => Err(err),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> MeetResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|err| MeetError::Internal(eyre!("Unexpected response from server: {}", err)))
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn login(&self, request: &LoginRequest) -> MeetResult<Session> {
        let builder = self.client.post(self.url("/users/login")).json(request);
        let wire: WireLoginResponse = Self::decode(self.send(builder).await?).await?;
        let session = Session::try_from(wire)?;
        self.session.establish(session.clone())?;
        Ok(session)
    }

    async fn logout(&self) -> MeetResult<()> {
        let result = match self.session.bearer_token() {
            Some(token) => {
                let builder = self.client.post(self.url("/users/logout")).bearer_auth(token);
                self.send(builder).await.map(|_| ())
            }
            None => Ok(()),
        };
        if let Err(err) = &result {
            warn!(error = %err, "Logout request failed; forgetting session anyway");
        }
        self.session.invalidate()?;
        result
    }

    async fn register_patient(&self, request: &RegisterPatientRequest) -> MeetResult<()> {
        let builder = self.client.post(self.url("/users/register/patient")).json(request);
        self.register(builder).await
    }

    async fn register_admin(&self, request: &RegisterAdminRequest) -> MeetResult<()> {
        let builder =
            self.authorized(self.client.post(self.url("/users/register/admin")).json(request))?;
        self.register(builder).await
    }

    async fn list_doctors(&self) -> MeetResult<Vec<Doctor>> {
        let builder = self.maybe_authorized(self.client.get(self.url("/users/getDoctors")));
        let wire: Vec<WireDoctor> = Self::decode(self.send(builder).await?).await?;
        Ok(wire.into_iter().map(Doctor::from).collect())
    }

    async fn get_doctor(&self, doctor_id: i64) -> MeetResult<Doctor> {
        let builder = self
            .maybe_authorized(self.client.get(self.url(&format!("/users/doctors/{}", doctor_id))));
        let wire: WireDoctor = Self::decode(self.send(builder).await?).await?;
        Ok(Doctor::from(wire))
    }

    async fn delete_doctor(&self, doctor_id: i64) -> MeetResult<()> {
        let builder = self.authorized(
            self.client.delete(self.url(&format!("/users/deleteDoctor/{}", doctor_id))),
        )?;
        self.send(builder).await?;
        Ok(())
    }

    async fn list_specialisations(&self) -> MeetResult<Vec<String>> {
        let builder =
            self.maybe_authorized(self.client.get(self.url("/users/getAllSpecializations")));
        Self::decode(self.send(builder).await?).await
    }

    async fn doctors_by_specialisation(&self, specialisation: &str) -> MeetResult<Vec<Doctor>> {
        let builder = self.maybe_authorized(
            self.client
                .get(self.url("/users/getDoctorsBySpecialization"))
                .query(&[("specialization", specialisation)]),
        );
        let wire: Vec<WireDoctor> = Self::decode(self.send(builder).await?).await?;
        Ok(wire.into_iter().map(Doctor::from).collect())
    }

    async fn get_doctor_profile(&self) -> MeetResult<DoctorProfile> {
        let builder = self.authorized(self.client.get(self.url("/users/doctorProfile")))?;
        Self::decode(self.send(builder).await?).await
    }

    /// Sent as multipart with the profile JSON in the `data` part.
    async fn update_doctor_profile(&self, profile: &DoctorProfile) -> MeetResult<DoctorProfile> {
        let json = serde_json::to_string(profile)
            .map_err(|err| MeetError::Internal(eyre!("Failed to encode profile: {}", err)))?;
        let data = Part::text(json)
            .mime_str("application/json")
            .map_err(|err| MeetError::Internal(eyre!("Failed to build profile upload: {}", err)))?;
        let builder = self.authorized(
            self.client
                .put(self.url("/users/updateDoctorProfile"))
                .multipart(Form::new().part("data", data)),
        )?;
        Self::decode(self.send(builder).await?).await
    }

    async fn update_patient_profile(
        &self,
        update: &PatientProfileUpdate,
    ) -> MeetResult<PatientProfile> {
        update.validate()?;
        let builder =
            self.authorized(self.client.put(self.url("/users/updatePatientProfile")).json(update))?;
        Self::decode(self.send(builder).await?).await
    }

    async fn book_appointment(&self, draft: &BookingDraft) -> MeetResult<Appointment> {
        let builder = self.authorized(
            self.client
                .post(self.url("/appointments/bookAppointment"))
                .query(&[
                    ("doctorId", draft.doctor_id.to_string()),
                    ("date", draft.date_param()),
                    ("time", draft.time_param()),
                    ("comment", draft.note.clone()),
                ]),
        )?;
        let wire: WireAppointment = Self::decode(self.send(builder).await?).await?;
        Appointment::try_from(wire)
    }

    async fn update_appointment_status(
        &self,
        appointment_id: i64,
        decision: Decision,
    ) -> MeetResult<Appointment> {
        let builder = self.authorized(
            self.client
                .put(self.url(&format!("/appointments/{}/status", appointment_id)))
                .json(&json!({ "status": decision.status().as_str() })),
        )?;
        let wire: WireAppointment = Self::decode(self.send(builder).await?).await?;
        Appointment::try_from(wire)
    }

    async fn cancel_appointment(&self, appointment_id: i64) -> MeetResult<()> {
        let url = self.url(&format!("/appointments/{}", appointment_id));
        let builder = self.authorized(self.client.delete(url))?;
        self.send(builder).await?;
        Ok(())
    }

    async fn list_appointments(&self, query: &AppointmentQuery) -> MeetResult<AppointmentPage> {
        match query.role {
            Role::Doctor => {
                let page = query.page.unwrap_or(0);
                let size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
                let builder = self.authorized(
                    self.client
                        .get(self.url("/appointments/doctor"))
                        .query(&[("page", page), ("size", size)]),
                )?;
                let wire: WireAppointmentPage = Self::decode(self.send(builder).await?).await?;
                AppointmentPage::try_from(wire)
            }
            Role::Patient => {
                let builder = self.authorized(self.client.get(self.url("/appointments/patient")))?;
                let wire: Vec<WireAppointment> = Self::decode(self.send(builder).await?).await?;
                Ok(AppointmentPage::single(appointments_from_wire(wire)?))
            }
            Role::Admin => {
                let builder = self.authorized(self.client.get(self.url("/appointments")))?;
                let wire: Vec<WireAppointment> = Self::decode(self.send(builder).await?).await?;
                Ok(AppointmentPage::single(appointments_from_wire(wire)?))
            }
        }
    }

    async fn doctor_appointment_counts(&self) -> MeetResult<AppointmentCounts> {
        let builder = self.authorized(self.client.get(self.url("/appointments/doctor/counts")))?;
        let wire: HashMap<String, u64> = Self::decode(self.send(builder).await?).await?;
        Ok(counts_from_wire(wire))
    }

    async fn admin_status_counts(&self) -> MeetResult<AppointmentCounts> {
        let builder =
            self.authorized(self.client.get(self.url("/appointments/admin/status-counts")))?;
        let wire: HashMap<String, u64> = Self::decode(self.send(builder).await?).await?;
        Ok(counts_from_wire(wire))
    }

    async fn appointments_over_time(&self) -> MeetResult<Vec<DailyCount>> {
        let builder = self
            .authorized(self.client.get(self.url("/appointments/admin/appointments-over-time")))?;
        let wire: Vec<WireDailyCount> = Self::decode(self.send(builder).await?).await?;
        wire.into_iter().map(DailyCount::try_from).collect()
    }

    async fn dashboard_stats(&self) -> MeetResult<DashboardStats> {
        let builder = self.authorized(self.client.get(self.url("/appointments/stats")))?;
        Self::decode(self.send(builder).await?).await
    }
}
