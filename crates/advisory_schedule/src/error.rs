// --- File: crates/advisory_schedule/src/error.rs ---
use advisory_common::{
    conflict, external_service_error, unprocessable, validation_error, AdvisoryError,
};
use std::fmt;
use thiserror::Error;

use crate::availability::SlotStatus;
use crate::booking::BookingState;
use crate::service::SubmitError;
use crate::slots::TimeOfDay;

/// Errors raised while building schedule inputs (configuration, dates, times).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid office hours: {0}")]
    InvalidOfficeHours(String),
    #[error("Page size must be at least 1")]
    InvalidPageSize,
    #[error("Failed to parse time '{0}', expected HH:mm")]
    InvalidTime(String),
    #[error("Failed to parse date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
        })
    }
}

/// Errors returned by the booking state machine. The messages are shown to the visitor.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Please fill name, email and phone (missing: {}).", join_fields(.0))]
    MissingContactDetails(Vec<ContactField>),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please select a time.")]
    NoTimeSelected,
    #[error("This slot is not available ({time} is {status}).")]
    SlotUnavailable { time: TimeOfDay, status: SlotStatus },
    #[error("{0} is not one of the offered slots.")]
    SlotNotOffered(TimeOfDay),
    #[error("{0} is outside office hours.")]
    OutsideOfficeHours(TimeOfDay),
    #[error("A booking is already being submitted.")]
    SubmissionInProgress,
    #[error("Cannot {action} while the booking is {state}.")]
    InvalidState {
        action: &'static str,
        state: BookingState,
    },
    #[error("The booking was closed before it completed.")]
    Cancelled,
    #[error("Booking failed: {0}")]
    Submit(#[from] SubmitError),
}

fn join_fields(fields: &[ContactField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl BookingError {
    /// True for errors the visitor fixes by editing the form.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::MissingContactDetails(_)
                | BookingError::InvalidEmail
                | BookingError::NoTimeSelected
                | BookingError::SlotUnavailable { .. }
                | BookingError::SlotNotOffered(_)
                | BookingError::OutsideOfficeHours(_)
        )
    }
}

impl From<ScheduleError> for AdvisoryError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidTime(_) | ScheduleError::InvalidDate(_) => {
                AdvisoryError::ParseError(err.to_string())
            }
            ScheduleError::InvalidOfficeHours(_) | ScheduleError::InvalidPageSize => {
                AdvisoryError::ConfigError(err.to_string())
            }
        }
    }
}

impl From<BookingError> for AdvisoryError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::SlotUnavailable { .. } | BookingError::SubmissionInProgress => {
                conflict(err)
            }
            BookingError::InvalidState { .. } | BookingError::Cancelled => unprocessable(err),
            BookingError::Submit(SubmitError::Conflict { .. }) => conflict(err),
            BookingError::Submit(ref inner) => {
                external_service_error("booking-submitter", inner)
            }
            _ => validation_error(err),
        }
    }
}
