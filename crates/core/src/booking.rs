//! # Booking Form Controller
//!
//! Holds the in-progress selection for one doctor (date, time slot, note),
//! validates it and submits it through an [`ApiGateway`]. A form instance
//! submits one request at a time: `submit` borrows the form mutably for the
//! whole call. Failed submissions are never retried.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    calendar::{CalendarDay, CalendarMonth},
    errors::{MeetError, MeetResult},
    gateway::ApiGateway,
    models::appointment::{Appointment, BookingDraft},
    session::SessionContext,
    time_slot::TimeSlot,
};

#[derive(Debug, Clone)]
pub struct BookingForm {
    doctor_id: i64,
    doctor_name: String,
    month: CalendarMonth,
    selected_date: Option<NaiveDate>,
    selected_time: Option<TimeSlot>,
    note: String,
    error: Option<String>,
    success: Option<String>,
}

impl BookingForm {
    /// Opens an empty form showing the month that contains `today`.
    pub fn open(
        doctor_id: i64,
        doctor_name: impl Into<String>,
        today: NaiveDate,
    ) -> MeetResult<Self> {
        Ok(Self {
            doctor_id,
            doctor_name: doctor_name.into(),
            month: CalendarMonth::containing(today)?,
            selected_date: None,
            selected_time: None,
            note: String::new(),
            error: None,
            success: None,
        })
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    /// Stays on the current month when there is no next one.
    pub fn next_month(&mut self) -> MeetResult<()> {
        self.month = self.month.next()?;
        Ok(())
    }

    pub fn previous_month(&mut self) -> MeetResult<()> {
        self.month = self.month.previous()?;
        Ok(())
    }

    pub fn show_month(&mut self, month: CalendarMonth) {
        self.month = month;
    }

    pub fn calendar(&self, today: NaiveDate) -> Vec<CalendarDay> {
        self.month.grid(today)
    }

    /// Accepts only selectable days; a rejected pick leaves the form untouched.
    pub fn select_date(&mut self, day: &CalendarDay) -> MeetResult<()> {
        if !day.selectable {
            return Err(MeetError::Validation(format!(
                "{} cannot be booked",
                day.date.format("%Y-%m-%d")
            )));
        }
        self.selected_date = Some(day.date);
        self.error = None;
        Ok(())
    }

    pub fn select_time(&mut self, slot: TimeSlot) {
        self.selected_time = Some(slot);
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_time(&self) -> Option<TimeSlot> {
        self.selected_time
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// The complete draft, or the first missing selection.
    pub fn draft(&self) -> MeetResult<BookingDraft> {
        let date = self
            .selected_date
            .ok_or_else(|| MeetError::Validation("Please select a date".into()))?;
        let time = self
            .selected_time
            .ok_or_else(|| MeetError::Validation("Please select a time".into()))?;

        Ok(BookingDraft {
            doctor_id: self.doctor_id,
            date,
            time,
            note: self.note.clone(),
        })
    }

    /// Clears the selection and any messages.
    pub fn reset(&mut self) {
        self.selected_date = None;
        self.selected_time = None;
        self.note.clear();
        self.error = None;
        self.success = None;
    }

    pub async fn submit<G>(
        &mut self,
        gateway: &G,
        session: &SessionContext,
    ) -> MeetResult<Appointment>
    where
        G: ApiGateway + ?Sized,
    {
        if !session.is_authenticated() {
            let err = MeetError::Authentication("Please log in to book an appointment".into());
            self.error = Some(err.message());
            return Err(err);
        }

        self.error = None;
        self.success = None;

        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(err) => {
                debug!(error = %err, "Booking form incomplete");
                self.error = Some(err.message());
                return Err(err);
            }
        };

        info!(
            doctor_id = draft.doctor_id,
            date = %draft.date_param(),
            time = %draft.time_param(),
            "Submitting booking"
        );

        match gateway.book_appointment(&draft).await {
            Ok(appointment) => {
                info!(appointment_id = appointment.id, "Appointment booked");
                let success = format!(
                    "Appointment booked successfully with Dr. {}",
                    self.doctor_name
                );
                self.reset();
                self.success = Some(success);
                Ok(appointment)
            }
            Err(err) => {
                warn!(error = %err, "Booking failed");
                self.error = Some(err.message());
                Err(err)
            }
        }
    }
}
