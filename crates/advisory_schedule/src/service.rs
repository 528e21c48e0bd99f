//! Booking submission service.
//!
//! The state machine hands a finished [`BookingRecord`] to a [`BookingSubmitter`]. The
//! bundled [`SimulatedSubmitter`] only waits a fixed delay; a deployment with a real booking
//! backend or notification service plugs in its own implementation.

use advisory_common::{BoxFuture, BoxedError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::slots::TimeOfDay;

/// Errors that can occur while submitting a booking.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{time} on {date} was taken by another booking")]
    Conflict { date: NaiveDate, time: TimeOfDay },
    #[error("booking service unavailable: {0}")]
    Unavailable(String),
    #[error("booking service error: {0}")]
    Backend(#[from] BoxedError),
}

/// The booking as handed to the back end.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date", example = "2025-05-15"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "14:30"))]
    pub time: TimeOfDay,
}

/// What the back end returns for an accepted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingReceipt {
    pub reference: Uuid,
    pub accepted_at: NaiveDateTime,
}

pub type SubmitFuture = BoxFuture<'static, BookingReceipt, SubmitError>;

/// Sends a booking to wherever bookings are kept.
#[cfg_attr(test, mockall::automock)]
pub trait BookingSubmitter: Send + Sync {
    fn submit(&self, record: BookingRecord) -> SubmitFuture;
}

/// Accepts every booking after a fixed artificial latency.
pub struct SimulatedSubmitter {
    delay: Duration,
    clock: Arc<dyn Clock>,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { delay, clock }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl BookingSubmitter for SimulatedSubmitter {
    fn submit(&self, record: BookingRecord) -> SubmitFuture {
        let delay = self.delay;
        let clock = Arc::clone(&self.clock);
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            let receipt = BookingReceipt {
                reference: Uuid::new_v4(),
                accepted_at: clock.now(),
            };
            info!(
                "Simulated booking accepted: {} {} for {} ({})",
                record.date, record.time, record.name, receipt.reference
            );
            Ok(receipt)
        })
    }
}
