//! # Appointment Status Workflow
//!
//! An appointment starts `pending`; the doctor may accept or reject it once.
//! Cancelling (patient) or removing (doctor) deletes it from every list the
//! viewer holds rather than persisting a `cancelled` state locally.
//!
//! Every transition goes through a confirmation step: [`AppointmentBoard::prompt`]
//! opens it, [`AppointmentBoard::confirm`] fires the single API call and
//! [`AppointmentBoard::dismiss`] drops it. A failed call leaves the displayed
//! status untouched. Another actor's concurrent change is only seen on the
//! next refresh from the server.

use std::{collections::HashMap, fmt, str::FromStr};

use tracing::{info, warn};

use crate::{
    errors::{MeetError, MeetResult},
    gateway::ApiGateway,
    models::{
        appointment::{Appointment, AppointmentPage, AppointmentQuery, AppointmentStatus},
        session::Role,
        stats::AppointmentCounts,
    },
};

/// A doctor's answer to a pending appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn status(&self) -> AppointmentStatus {
        match self {
            Decision::Accept => AppointmentStatus::Accepted,
            Decision::Reject => AppointmentStatus::Rejected,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

impl FromStr for Decision {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" | "accepted" => Ok(Decision::Accept),
            "reject" | "rejected" => Ok(Decision::Reject),
            other => Err(MeetError::Validation(format!(
                "Unknown decision: {} (expected accept or reject)",
                other
            ))),
        }
    }
}

impl AppointmentStatus {
    pub fn can_decide(&self) -> bool {
        matches!(self, AppointmentStatus::Pending)
    }

    pub fn can_cancel(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// The status after `decision`, if the transition exists.
    pub fn decide(self, decision: Decision) -> MeetResult<AppointmentStatus> {
        if self.can_decide() {
            Ok(decision.status())
        } else {
            Err(MeetError::Validation(format!(
                "Cannot {} an appointment that is already {}",
                decision.verb(),
                self
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Decide(Decision),
    Cancel,
}

impl AppointmentAction {
    pub fn confirmation_message(&self) -> String {
        match self {
            AppointmentAction::Decide(decision) => format!(
                "Are you sure you want to {} this appointment?",
                decision.verb()
            ),
            AppointmentAction::Cancel => "Are you sure you want to remove this appointment?".into(),
        }
    }
}

/// An action waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub appointment_id: i64,
    pub action: AppointmentAction,
    pub message: String,
}

/// What happened after a confirmed action succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Removed(i64),
    Updated(Appointment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardTab {
    /// pending and accepted
    Upcoming,
    /// rejected and cancelled
    Rejected,
    All,
}

impl BoardTab {
    pub fn includes(&self, status: AppointmentStatus) -> bool {
        match self {
            BoardTab::Upcoming => matches!(
                status,
                AppointmentStatus::Pending | AppointmentStatus::Accepted
            ),
            BoardTab::Rejected => matches!(
                status,
                AppointmentStatus::Rejected | AppointmentStatus::Cancelled
            ),
            BoardTab::All => true,
        }
    }
}

impl FromStr for BoardTab {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(BoardTab::Upcoming),
            "rejected" => Ok(BoardTab::Rejected),
            "all" => Ok(BoardTab::All),
            other => Err(MeetError::Validation(format!("Unknown tab: {}", other))),
        }
    }
}

/// Where one tab is in its own paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabPaging {
    pub page: u32,
    pub total_pages: u32,
}

/// The appointment lists a viewer holds, plus the confirmation dialog state.
///
/// Each tab keeps its own page and page count, so switching tabs returns to
/// wherever that tab was left.
#[derive(Debug, Clone)]
pub struct AppointmentBoard {
    base_query: AppointmentQuery,
    active_tab: BoardTab,
    upcoming: Vec<Appointment>,
    rejected: Vec<Appointment>,
    filtered: Vec<Appointment>,
    paging: HashMap<BoardTab, TabPaging>,
    confirmation: Option<PendingConfirmation>,
    error: Option<String>,
    notice: Option<String>,
}

impl AppointmentBoard {
    /// Doctors page through their appointments by tab; other roles see one list.
    pub fn for_role(role: Role) -> Self {
        let active_tab = match role {
            Role::Doctor => BoardTab::Upcoming,
            Role::Patient | Role::Admin => BoardTab::All,
        };
        Self {
            base_query: AppointmentQuery::for_role(role),
            active_tab,
            upcoming: Vec::new(),
            rejected: Vec::new(),
            filtered: Vec::new(),
            paging: HashMap::new(),
            confirmation: None,
            error: None,
            notice: None,
        }
    }

    /// The query that fetches the active tab's current page.
    pub fn query(&self) -> AppointmentQuery {
        match self.base_query.page {
            Some(_) => self.base_query.with_page(self.paging_for(self.active_tab).page),
            None => self.base_query,
        }
    }

    pub fn paging_for(&self, tab: BoardTab) -> TabPaging {
        self.paging.get(&tab).copied().unwrap_or_default()
    }

    pub fn active_tab(&self) -> BoardTab {
        self.active_tab
    }

    pub fn upcoming(&self) -> &[Appointment] {
        &self.upcoming
    }

    pub fn rejected(&self) -> &[Appointment] {
        &self.rejected
    }

    /// The list currently on screen.
    pub fn filtered(&self) -> &[Appointment] {
        &self.filtered
    }

    pub fn page(&self) -> u32 {
        self.paging_for(self.active_tab).page
    }

    pub fn total_pages(&self) -> u32 {
        self.paging_for(self.active_tab).total_pages
    }

    pub fn confirmation(&self) -> Option<&PendingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn counts(&self) -> AppointmentCounts {
        AppointmentCounts::tally(&self.filtered)
    }

    pub fn find(&self, appointment_id: i64) -> Option<&Appointment> {
        self.filtered
            .iter()
            .chain(&self.upcoming)
            .chain(&self.rejected)
            .find(|a| a.id == appointment_id)
    }

    pub fn set_active_tab(&mut self, tab: BoardTab) {
        self.active_tab = tab;
        self.filtered = self.list_for(tab);
    }

    /// Moves the active tab to `page`. Unpaged boards ignore it.
    pub fn set_page(&mut self, page: u32) {
        if self.base_query.page.is_some() {
            self.paging.entry(self.active_tab).or_default().page = page;
        }
    }

    /// Replaces `tab`'s list with the matching appointments of `page`.
    pub fn load_page(&mut self, tab: BoardTab, page: AppointmentPage) {
        let paging = self.paging.entry(tab).or_default();
        paging.page = page.current_page;
        paging.total_pages = page.total_pages;
        let appointments: Vec<Appointment> = page
            .appointments
            .into_iter()
            .filter(|a| tab.includes(a.status))
            .collect();

        match tab {
            BoardTab::Upcoming => self.upcoming = appointments,
            BoardTab::Rejected => self.rejected = appointments,
            BoardTab::All => {
                self.upcoming = appointments
                    .iter()
                    .filter(|a| BoardTab::Upcoming.includes(a.status))
                    .cloned()
                    .collect();
                self.rejected = appointments
                    .iter()
                    .filter(|a| BoardTab::Rejected.includes(a.status))
                    .cloned()
                    .collect();
                if self.active_tab == BoardTab::All {
                    self.filtered = appointments;
                    return;
                }
            }
        }

        if self.active_tab == tab || tab == BoardTab::All {
            self.filtered = self.list_for(self.active_tab);
        }
    }

    /// Drops `appointment_id` from every list. Returns whether anything was removed.
    pub fn remove(&mut self, appointment_id: i64) -> bool {
        let before = self.upcoming.len() + self.rejected.len() + self.filtered.len();
        self.upcoming.retain(|a| a.id != appointment_id);
        self.rejected.retain(|a| a.id != appointment_id);
        self.filtered.retain(|a| a.id != appointment_id);
        before != self.upcoming.len() + self.rejected.len() + self.filtered.len()
    }

    /// Opens the confirmation dialog for `action` on `appointment_id`.
    pub fn prompt(
        &mut self,
        appointment_id: i64,
        action: AppointmentAction,
    ) -> MeetResult<&PendingConfirmation> {
        let status = self
            .find(appointment_id)
            .map(|a| a.status)
            .ok_or_else(|| MeetError::NotFound("Appointment not found".into()))?;

        match action {
            AppointmentAction::Decide(decision) => {
                status.decide(decision)?;
            }
            AppointmentAction::Cancel if !status.can_cancel() => {
                return Err(MeetError::Validation(
                    "This appointment has already been cancelled".into(),
                ));
            }
            AppointmentAction::Cancel => {}
        }

        Ok(self.confirmation.insert(PendingConfirmation {
            appointment_id,
            action,
            message: action.confirmation_message(),
        }))
    }

    pub fn dismiss(&mut self) {
        self.confirmation = None;
    }

    /// Re-fetches the active tab from the server.
    pub async fn refresh<G>(&mut self, gateway: &G) -> MeetResult<()>
    where
        G: ApiGateway + ?Sized,
    {
        match gateway.list_appointments(&self.query()).await {
            Ok(page) => {
                self.error = None;
                self.load_page(self.active_tab, page);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Failed to load appointments");
                self.error = Some(err.message());
                Err(err)
            }
        }
    }

    /// Fires the confirmed action. Nothing is sent if no confirmation is open.
    pub async fn confirm<G>(&mut self, gateway: &G) -> MeetResult<TransitionOutcome>
    where
        G: ApiGateway + ?Sized,
    {
        let Some(pending) = self.confirmation.take() else {
            return Err(MeetError::Validation("Nothing to confirm".into()));
        };
        let appointment_id = pending.appointment_id;
        self.notice = None;

        match pending.action {
            AppointmentAction::Cancel => match gateway.cancel_appointment(appointment_id).await {
                Ok(()) => {
                    info!(appointment_id, "Appointment removed");
                    self.remove(appointment_id);
                    self.error = None;
                    self.notice = Some("Appointment cancelled and removed".into());
                    Ok(TransitionOutcome::Removed(appointment_id))
                }
                Err(err) => {
                    warn!(appointment_id, error = %err, "Failed to remove appointment");
                    self.error = Some(err.message());
                    Err(err)
                }
            },
            AppointmentAction::Decide(decision) => {
                match gateway
                    .update_appointment_status(appointment_id, decision)
                    .await
                {
                    Ok(updated) => {
                        info!(
                            appointment_id,
                            status = %updated.status,
                            "Appointment status updated"
                        );
                        self.refresh(gateway).await?;
                        self.notice = Some(format!("Appointment {}", updated.status));
                        Ok(TransitionOutcome::Updated(updated))
                    }
                    Err(err) => {
                        warn!(appointment_id, error = %err, "Failed to update appointment status");
                        self.error = Some(err.message());
                        Err(err)
                    }
                }
            }
        }
    }

    fn list_for(&self, tab: BoardTab) -> Vec<Appointment> {
        match tab {
            BoardTab::Upcoming => self.upcoming.clone(),
            BoardTab::Rejected => self.rejected.clone(),
            BoardTab::All => {
                let mut all: Vec<Appointment> =
                    self.upcoming.iter().chain(&self.rejected).cloned().collect();
                all.sort_by_key(|a| (a.date, a.time, a.id));
                all
            }
        }
    }
}
