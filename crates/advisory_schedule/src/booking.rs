// --- File: crates/advisory_schedule/src/booking.rs ---
//! The booking state machine behind one opened widget.
//!
//! ```text
//! Selecting --begin_submit--> Submitting --finish_submit(Ok)--> Confirmed
//!     ^                           |
//!     +------finish_submit(Err)---+
//! close() from any state returns to a fresh Selecting session.
//! ```
//!
//! Submission is split in two so the owner can release its lock while the booking is in
//! flight: [`BookingSession::begin_submit`] validates and hands out a [`SubmissionTicket`],
//! [`BookingSession::finish_submit`] applies the outcome. A ticket issued before a
//! `close()` or `cancel_submit()` is stale and its outcome is discarded.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::availability::{
    annotate, classify, read_registry, write_registry, SharedRegistry, SlotStatus, SlotView,
};
use crate::clock::Clock;
use crate::error::{BookingError, ContactField};
use crate::pagination::{PageNav, Paginator};
use crate::service::{BookingReceipt, BookingRecord, BookingSubmitter, SubmitError};
use crate::settings::{InputMode, ScheduleSettings};
use crate::slots::{generate_slots, TimeOfDay};

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    Selecting,
    Submitting,
    Confirmed,
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookingState::Selecting => "selecting",
            BookingState::Submitting => "submitting",
            BookingState::Confirmed => "confirmed",
        })
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl ContactDetails {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    pub fn missing_fields(&self) -> Vec<ContactField> {
        [
            (ContactField::Name, &self.name),
            (ContactField::Email, &self.email),
            (ContactField::Phone, &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(BookingError::MissingContactDetails(missing));
        }
        if !is_valid_email(&self.email) {
            return Err(BookingError::InvalidEmail);
        }
        Ok(())
    }
}

/// Basic email shape: `local@domain.tld`, no whitespace, a single `@`, no empty labels.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// The in-progress form of one session.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingDraft {
    #[serde(flatten)]
    pub contact: ContactDetails,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "14:30"))]
    pub time: Option<TimeOfDay>,
}

impl BookingDraft {
    fn fresh(date: NaiveDate) -> Self {
        Self {
            contact: ContactDetails::default(),
            date,
            time: None,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub reference: Uuid,
    #[serde(flatten)]
    pub record: BookingRecord,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub confirmed_at: NaiveDateTime,
}

/// What the "clear" action blanks.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearScope {
    /// Only the chosen time.
    #[default]
    Time,
    /// The chosen time and the contact fields.
    All,
}

/// Proof that a submission was started. Must be handed back to `finish_submit`.
#[derive(Debug)]
#[must_use]
pub struct SubmissionTicket {
    attempt: u64,
    record: BookingRecord,
}

impl SubmissionTicket {
    pub fn record(&self) -> &BookingRecord {
        &self.record
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_slots: usize,
}

/// Everything the widget needs to render a session.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: BookingState,
    pub input_mode: InputMode,
    pub draft: BookingDraft,
    pub page: PageInfo,
    pub slots: Vec<SlotView>,
    pub can_submit: bool,
    pub message: Option<String>,
    pub confirmation: Option<BookingConfirmation>,
}

pub struct BookingSession {
    settings: Arc<ScheduleSettings>,
    registry: SharedRegistry,
    clock: Arc<dyn Clock>,
    state: BookingState,
    draft: BookingDraft,
    slots: Vec<TimeOfDay>,
    paginator: Paginator,
    confirmation: Option<BookingConfirmation>,
    attempt: u64,
    message: Option<String>,
}

impl BookingSession {
    /// Opens the widget on today's date.
    pub fn open(
        settings: Arc<ScheduleSettings>,
        registry: SharedRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let today = clock.now().date();
        let mut session = Self {
            paginator: Paginator::new(settings.page_size),
            settings,
            registry,
            clock,
            state: BookingState::Selecting,
            draft: BookingDraft::fresh(today),
            slots: Vec::new(),
            confirmation: None,
            attempt: 0,
            message: None,
        };
        session.load_date(today);
        info!("Booking session opened on {}", today);
        session
    }

    pub fn state(&self) -> BookingState {
        self.state
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn slots(&self) -> &[TimeOfDay] {
        &self.slots
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    /// The last user-facing message (validation or submission failure).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Mirrors the confirm button: enabled only while selecting with a time chosen.
    pub fn can_submit(&self) -> bool {
        self.state == BookingState::Selecting && self.draft.time.is_some()
    }

    fn ensure_selecting(&self, action: &'static str) -> Result<(), BookingError> {
        match self.state {
            BookingState::Selecting => Ok(()),
            state => Err(BookingError::InvalidState { action, state }),
        }
    }

    fn load_date(&mut self, date: NaiveDate) {
        self.draft.date = date;
        self.draft.time = None;
        self.slots = generate_slots(date, &self.settings.office_hours);
        self.paginator.reset(self.slots.len());
        if self.settings.auto_select_first_available {
            self.draft.time = self.first_available();
            debug!("Auto-selected {:?} on {}", self.draft.time, date);
        }
    }

    fn first_available(&self) -> Option<TimeOfDay> {
        let registry = read_registry(&self.registry);
        let now = self.clock.now();
        self.slots
            .iter()
            .copied()
            .find(|&time| classify(self.draft.date, time, &registry, now).is_selectable())
    }

    /// Current status of `time` on the draft's date.
    pub fn status_of(&self, time: TimeOfDay) -> SlotStatus {
        let registry = read_registry(&self.registry);
        classify(self.draft.date, time, &registry, self.clock.now())
    }

    /// All generated slots for the draft's date, classified now.
    pub fn slot_views(&self) -> Vec<SlotView> {
        let registry = read_registry(&self.registry);
        annotate(self.draft.date, &self.slots, &registry, self.clock.now())
    }

    /// The current page of slots, classified now.
    pub fn visible_slots(&self) -> Vec<SlotView> {
        let registry = read_registry(&self.registry);
        annotate(
            self.draft.date,
            self.paginator.visible(&self.slots),
            &registry,
            self.clock.now(),
        )
    }

    /// Switches to another day: new slot sequence, page 0, chosen time cleared.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        self.ensure_selecting("change the date")?;
        self.load_date(date);
        self.message = None;
        debug!("Session moved to {} ({} slots)", date, self.slots.len());
        Ok(())
    }

    pub fn navigate(&mut self, nav: PageNav) {
        self.paginator.navigate(nav);
    }

    pub fn select_time(&mut self, time: TimeOfDay) -> Result<(), BookingError> {
        self.ensure_selecting("select a time")?;
        match self.settings.input_mode {
            InputMode::SlotGrid if self.slots.binary_search(&time).is_err() => {
                return Err(BookingError::SlotNotOffered(time));
            }
            InputMode::DateTimePicker if !self.settings.office_hours.contains(time) => {
                return Err(BookingError::OutsideOfficeHours(time));
            }
            _ => {}
        }
        let status = self.status_of(time);
        if !status.is_selectable() {
            return Err(BookingError::SlotUnavailable { time, status });
        }
        self.draft.time = Some(time);
        self.message = None;
        Ok(())
    }

    pub fn set_contact(&mut self, contact: ContactDetails) -> Result<(), BookingError> {
        self.ensure_selecting("edit contact details")?;
        self.draft.contact = contact;
        Ok(())
    }

    pub fn clear(&mut self, scope: ClearScope) -> Result<(), BookingError> {
        self.ensure_selecting("clear the form")?;
        self.draft.time = None;
        if scope == ClearScope::All {
            self.draft.contact = ContactDetails::default();
        }
        self.message = None;
        Ok(())
    }

    /// Checks the draft against the registry and the clock as of now.
    pub fn validate(&self) -> Result<BookingRecord, BookingError> {
        let time = self.draft.time.ok_or(BookingError::NoTimeSelected)?;
        self.draft.contact.validate()?;
        let status = self.status_of(time);
        if !status.is_selectable() {
            return Err(BookingError::SlotUnavailable { time, status });
        }
        let contact = &self.draft.contact;
        Ok(BookingRecord {
            name: contact.name.trim().to_string(),
            email: contact.email.trim().to_string(),
            phone: contact.phone.trim().to_string(),
            date: self.draft.date,
            time,
        })
    }

    /// Validates and moves to Submitting.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, BookingError> {
        match self.state {
            BookingState::Selecting => {}
            BookingState::Submitting => {
                warn!("Submit ignored, attempt {} still in flight", self.attempt);
                return Err(BookingError::SubmissionInProgress);
            }
            state => {
                return Err(BookingError::InvalidState {
                    action: "submit",
                    state,
                })
            }
        }

        let record = match self.validate() {
            Ok(record) => record,
            Err(err) => {
                warn!("Booking rejected: {}", err);
                self.message = Some(err.to_string());
                return Err(err);
            }
        };

        self.attempt += 1;
        self.state = BookingState::Submitting;
        self.message = None;
        info!(
            "Submitting booking attempt {} for {} {}",
            self.attempt, record.date, record.time
        );
        Ok(SubmissionTicket {
            attempt: self.attempt,
            record,
        })
    }

    /// Applies the outcome of a submission started with `begin_submit`.
    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<BookingReceipt, SubmitError>,
    ) -> Result<BookingConfirmation, BookingError> {
        if self.state != BookingState::Submitting || ticket.attempt != self.attempt {
            info!(
                "Discarding outcome of abandoned booking attempt {}",
                ticket.attempt
            );
            return Err(BookingError::Cancelled);
        }

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(err) => return Err(self.fail_submit(err)),
        };

        let record = ticket.record;
        let inserted = write_registry(&self.registry).insert(record.date, record.time);
        if !inserted {
            return Err(self.fail_submit(SubmitError::Conflict {
                date: record.date,
                time: record.time,
            }));
        }

        let confirmation = BookingConfirmation {
            reference: receipt.reference,
            record,
            confirmed_at: receipt.accepted_at,
        };
        info!(
            "Booking {} confirmed for {} {}",
            confirmation.reference, confirmation.record.date, confirmation.record.time
        );
        self.state = BookingState::Confirmed;
        self.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    fn fail_submit(&mut self, err: SubmitError) -> BookingError {
        warn!("Booking attempt {} failed: {}", self.attempt, err);
        self.state = BookingState::Selecting;
        let err = BookingError::Submit(err);
        self.message = Some(err.to_string());
        err
    }

    /// Runs a whole submission against `submitter` while holding the session.
    ///
    /// Dropping the returned future leaves the session in Submitting until
    /// `cancel_submit` or `close` is called.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<BookingConfirmation, BookingError>
    where
        S: BookingSubmitter + ?Sized,
    {
        let ticket = self.begin_submit()?;
        let outcome = submitter.submit(ticket.record.clone()).await;
        self.finish_submit(ticket, outcome)
    }

    /// Abandons an in-flight submission and makes the draft editable again.
    pub fn cancel_submit(&mut self) -> bool {
        if self.state != BookingState::Submitting {
            return false;
        }
        info!("Booking attempt {} cancelled", self.attempt);
        self.attempt += 1;
        self.state = BookingState::Selecting;
        true
    }

    /// Discards the draft and returns to the freshly opened state.
    pub fn close(&mut self) {
        if self.state == BookingState::Submitting {
            info!("Session closed during attempt {}", self.attempt);
        }
        self.attempt += 1;
        self.state = BookingState::Selecting;
        self.confirmation = None;
        self.message = None;
        let today = self.clock.now().date();
        self.draft = BookingDraft::fresh(today);
        self.load_date(today);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            input_mode: self.settings.input_mode,
            draft: self.draft.clone(),
            page: PageInfo {
                current_page: self.paginator.current(),
                page_count: self.paginator.page_count(),
                page_size: self.paginator.page_size(),
                total_slots: self.slots.len(),
            },
            slots: self.visible_slots(),
            can_submit: self.can_submit(),
            message: self.message.clone(),
            confirmation: self.confirmation.clone(),
        }
    }
}
