// --- File: crates/advisory_schedule/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
#[cfg(test)]
mod availability_test;
pub mod booking;
pub mod clock;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod routes;
pub mod service;
pub mod settings;
pub mod slots;
#[cfg(test)]
mod slots_proptest;

pub use availability::{annotate, classify, BookedRegistry, SharedRegistry, SlotStatus, SlotView};
pub use booking::{BookingSession, BookingState, ClearScope, ContactDetails};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{BookingError, ScheduleError};
pub use pagination::{paginate, PageNav, Paginator};
pub use service::{BookingRecord, BookingSubmitter, SimulatedSubmitter, SubmitError};
pub use settings::{InputMode, ScheduleSettings};
pub use slots::{generate_slots, OfficeHours, TimeOfDay};
