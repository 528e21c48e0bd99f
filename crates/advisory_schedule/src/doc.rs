// File: crates/advisory_schedule/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::availability::{SlotStatus, SlotView};
use crate::booking::{
    BookingConfirmation, BookingDraft, BookingState, ClearScope, ContactDetails, PageInfo,
    SessionSnapshot,
};
use crate::handlers::{
    BookedQuery, BookedTimesResponse, ClearRequest, SelectDateRequest, SelectTimeRequest,
    SessionView, SlotsQuery, SlotsResponse,
};
use crate::pagination::PageNav;
use crate::service::BookingRecord;
use crate::settings::InputMode;

#[utoipa::path(
    get,
    path = "/schedule/slots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "One page of classified slots", body = SlotsResponse),
        (status = 400, description = "Invalid date format (YYYY-MM-DD)")
    ),
    tag = "Schedule"
)]
fn doc_get_slots_handler() {}

#[utoipa::path(
    get,
    path = "/schedule/booked",
    params(BookedQuery),
    responses(
        (status = 200, description = "Booked times keyed by date", body = BookedTimesResponse),
        (status = 400, description = "Invalid date format (YYYY-MM-DD)")
    ),
    tag = "Schedule"
)]
fn doc_get_booked_handler() {}

#[utoipa::path(
    post,
    path = "/schedule/sessions",
    responses((status = 201, description = "Session opened on today's date", body = SessionView)),
    tag = "Schedule"
)]
fn doc_open_session_handler() {}

#[utoipa::path(
    get,
    path = "/schedule/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current session view", body = SessionView),
        (status = 404, description = "Unknown session")
    ),
    tag = "Schedule"
)]
fn doc_get_session_handler() {}

#[utoipa::path(
    put,
    path = "/schedule/sessions/{id}/date",
    params(("id" = String, Path, description = "Session id")),
    request_body = SelectDateRequest,
    responses(
        (status = 200, description = "Date changed, pager back on page 0", body = SessionView),
        (status = 422, description = "Session is not selecting")
    ),
    tag = "Schedule"
)]
fn doc_select_date_handler() {}

#[utoipa::path(
    post,
    path = "/schedule/sessions/{id}/page/{nav}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("nav" = PageNav, Path, description = "first, prev, next or last")
    ),
    responses((status = 200, description = "Page moved (clamped)", body = SessionView)),
    tag = "Schedule"
)]
fn doc_navigate_handler() {}

#[utoipa::path(
    put,
    path = "/schedule/sessions/{id}/time",
    params(("id" = String, Path, description = "Session id")),
    request_body = SelectTimeRequest,
    responses(
        (status = 200, description = "Time selected", body = SessionView),
        (status = 400, description = "Time not offered"),
        (status = 409, description = "Slot booked or past")
    ),
    tag = "Schedule"
)]
fn doc_select_time_handler() {}

#[utoipa::path(
    put,
    path = "/schedule/sessions/{id}/contact",
    params(("id" = String, Path, description = "Session id")),
    request_body = ContactDetails,
    responses((status = 200, description = "Contact details stored", body = SessionView)),
    tag = "Schedule"
)]
fn doc_update_contact_handler() {}

#[utoipa::path(
    post,
    path = "/schedule/sessions/{id}/clear",
    params(("id" = String, Path, description = "Session id")),
    request_body = ClearRequest,
    responses((status = 200, description = "Form cleared", body = SessionView)),
    tag = "Schedule"
)]
fn doc_clear_handler() {}

#[utoipa::path(
    post,
    path = "/schedule/sessions/{id}/submit",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Booking confirmed", body = SessionView),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slot no longer available or submit already in flight"),
        (status = 422, description = "Session closed or not selecting"),
        (status = 502, description = "Booking service failed")
    ),
    tag = "Schedule"
)]
fn doc_submit_handler() {}

#[utoipa::path(
    delete,
    path = "/schedule/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Unknown session")
    ),
    tag = "Schedule"
)]
fn doc_close_session_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_slots_handler,
        doc_get_booked_handler,
        doc_open_session_handler,
        doc_get_session_handler,
        doc_select_date_handler,
        doc_navigate_handler,
        doc_select_time_handler,
        doc_update_contact_handler,
        doc_clear_handler,
        doc_submit_handler,
        doc_close_session_handler,
    ),
    components(schemas(
        SlotsResponse,
        SlotView,
        SlotStatus,
        BookedTimesResponse,
        SessionView,
        SessionSnapshot,
        BookingState,
        BookingDraft,
        BookingConfirmation,
        BookingRecord,
        ContactDetails,
        PageInfo,
        PageNav,
        InputMode,
        ClearScope,
        ClearRequest,
        SelectDateRequest,
        SelectTimeRequest,
    )),
    tags((name = "Schedule", description = "Appointment slots and booking widget sessions"))
)]
pub struct ScheduleApiDoc;
