// File: crates/advisory_schedule/src/handlers.rs
use advisory_common::{internal_error, not_found, AdvisoryError};
use advisory_config::AppConfig;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::availability::{annotate, read_registry, SharedRegistry, SlotView};
use crate::booking::{BookingSession, BookingState, ClearScope, ContactDetails, SessionSnapshot};
use crate::clock::{Clock, SystemClock};
use crate::error::ScheduleError;
use crate::pagination::{paginate, PageNav};
use crate::service::{BookingSubmitter, SimulatedSubmitter};
use crate::settings::{seed_registry, ScheduleSettings};
use crate::slots::{format_date, generate_slots, parse_date, TimeOfDay};

type SessionHandle = Arc<Mutex<BookingSession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_seen: NaiveDateTime,
}

impl SessionEntry {
    /// Sessions in use or waiting on a submission are never idle.
    fn is_idle(&self, now: NaiveDateTime, ttl: std::time::Duration) -> bool {
        if ttl.is_zero() {
            return false;
        }
        let expired = now
            .signed_duration_since(self.last_seen)
            .to_std()
            .is_ok_and(|idle| idle > ttl);
        expired
            && self
                .handle
                .try_lock()
                .is_ok_and(|session| session.state() != BookingState::Submitting)
    }
}

/// Shared state for the schedule routes.
#[derive(Clone)]
pub struct ScheduleState {
    pub settings: Arc<ScheduleSettings>,
    pub registry: SharedRegistry,
    pub clock: Arc<dyn Clock>,
    pub submitter: Arc<dyn BookingSubmitter>,
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl ScheduleState {
    pub fn new(
        settings: Arc<ScheduleSettings>,
        registry: SharedRegistry,
        clock: Arc<dyn Clock>,
        submitter: Arc<dyn BookingSubmitter>,
    ) -> Self {
        Self {
            settings,
            registry,
            clock,
            submitter,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Production wiring: local clock, seeded in-memory registry, simulated submitter.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScheduleError> {
        let settings = Arc::new(ScheduleSettings::from_config(&config.schedule)?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let registry = seed_registry(&config.schedule, clock.now().date())?.into_shared();
        let submitter = Arc::new(SimulatedSubmitter::new(
            settings.submit_delay,
            Arc::clone(&clock),
        ));
        Ok(Self::new(settings, registry, clock, submitter))
    }

    /// Looks up a session and marks it as seen. An idle session is dropped instead.
    async fn session(&self, id: Uuid) -> Result<SessionHandle, AdvisoryError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| not_found(format!("booking session {}", id)))?;
        if entry.is_idle(now, self.settings.session_idle_ttl) {
            sessions.remove(&id);
            info!("Booking session {} expired", id);
            return Err(not_found(format!("booking session {}", id)));
        }
        entry.last_seen = now;
        Ok(Arc::clone(&entry.handle))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session left untouched for longer than the idle TTL.
    pub async fn evict_idle(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.settings.session_idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle booking sessions, {} open", evicted, sessions.len());
        }
        evicted
    }

    /// Starts the periodic idle sweep. Returns `None` when eviction is disabled.
    ///
    /// The task stops once the state itself has been dropped.
    pub fn spawn_idle_sweeper(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let period = self.settings.session_sweep_interval;
        if self.settings.session_idle_ttl.is_zero() || period.is_zero() {
            return None;
        }
        let state = Arc::downgrade(self);
        info!("Sweeping idle booking sessions every {:?}", period);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(state) = state.upgrade() else {
                    debug!("Schedule state dropped, stopping session sweeper");
                    break;
                };
                state.evict_idle().await;
            }
        }))
    }
}

fn resolve_date(state: &ScheduleState, date: Option<&str>) -> Result<chrono::NaiveDate, AdvisoryError> {
    match date {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(state.clock.now().date()),
    }
}

// --- Slot listing ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotsQuery {
    /// Day in YYYY-MM-DD format, defaults to today
    pub date: Option<String>,
    /// Zero-based page, clamped to the last page
    pub page: Option<usize>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsResponse {
    pub date: String,
    pub current_page: usize,
    pub page_count: usize,
    pub total_slots: usize,
    pub slots: Vec<SlotView>,
}

/// Handler listing one page of classified slots for a date.
pub async fn get_slots_handler(
    State(state): State<Arc<ScheduleState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AdvisoryError> {
    let date = resolve_date(&state, query.date.as_deref())?;
    let slots = generate_slots(date, &state.settings.office_hours);
    let page = paginate(&slots, state.settings.page_size, query.page.unwrap_or(0));

    let views = {
        let registry = read_registry(&state.registry);
        annotate(date, page.items, &registry, state.clock.now())
    };

    Ok(Json(SlotsResponse {
        date: format_date(date),
        current_page: page.current_page,
        page_count: page.page_count,
        total_slots: slots.len(),
        slots: views,
    }))
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct BookedQuery {
    /// Restrict to one day (YYYY-MM-DD); omit for the whole registry
    pub date: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookedTimesResponse {
    /// "YYYY-MM-DD" -> ["HH:mm", ...]
    pub booked: BTreeMap<String, Vec<String>>,
}

/// Handler exposing the booked-times table, keyed like the seed data.
pub async fn get_booked_handler(
    State(state): State<Arc<ScheduleState>>,
    Query(query): Query<BookedQuery>,
) -> Result<Json<BookedTimesResponse>, AdvisoryError> {
    let registry = read_registry(&state.registry);
    let booked = match query.date.as_deref() {
        Some(raw) => {
            let date = parse_date(raw)?;
            let times = registry
                .booked_on(date)
                .iter()
                .map(ToString::to_string)
                .collect();
            BTreeMap::from([(format_date(date), times)])
        }
        None => registry.to_iso_table(),
    };
    Ok(Json(BookedTimesResponse { booked }))
}

// --- Sessions ---

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SessionView {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: Uuid,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}

impl SessionView {
    fn new(id: Uuid, session: &BookingSession) -> Self {
        Self {
            id,
            session: session.snapshot(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SelectDateRequest {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15"))]
    pub date: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SelectTimeRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "14:30"))]
    pub time: TimeOfDay,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClearRequest {
    #[serde(default)]
    pub scope: ClearScope,
}

/// Opens a booking widget session on today's date.
pub async fn open_session_handler(
    State(state): State<Arc<ScheduleState>>,
) -> (StatusCode, Json<SessionView>) {
    state.evict_idle().await;
    let session = BookingSession::open(
        Arc::clone(&state.settings),
        Arc::clone(&state.registry),
        Arc::clone(&state.clock),
    );
    let id = Uuid::new_v4();
    let view = SessionView::new(id, &session);
    let entry = SessionEntry {
        handle: Arc::new(Mutex::new(session)),
        last_seen: state.clock.now(),
    };
    state.sessions.write().await.insert(id, entry);
    info!("Opened booking session {}", id);
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AdvisoryError> {
    let handle = state.session(id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::new(id, &session)))
}

pub async fn select_date_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectDateRequest>,
) -> Result<Json<SessionView>, AdvisoryError> {
    let date = parse_date(&payload.date)?;
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.select_date(date)?;
    Ok(Json(SessionView::new(id, &session)))
}

pub async fn navigate_handler(
    State(state): State<Arc<ScheduleState>>,
    Path((id, nav)): Path<(Uuid, PageNav)>,
) -> Result<Json<SessionView>, AdvisoryError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.navigate(nav);
    Ok(Json(SessionView::new(id, &session)))
}

pub async fn select_time_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectTimeRequest>,
) -> Result<Json<SessionView>, AdvisoryError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.select_time(payload.time)?;
    Ok(Json(SessionView::new(id, &session)))
}

pub async fn update_contact_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactDetails>,
) -> Result<Json<SessionView>, AdvisoryError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.set_contact(payload)?;
    Ok(Json(SessionView::new(id, &session)))
}

/// Clears the selection. Without a JSON body only the time is cleared.
pub async fn clear_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ClearRequest>>,
) -> Result<Json<SessionView>, AdvisoryError> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.clear(payload.scope)?;
    Ok(Json(SessionView::new(id, &session)))
}

/// Submits the session's draft.
///
/// The session lock is released while the submitter runs, so the Submitting state is
/// visible to other requests and a second submit is rejected instead of queued. The
/// submission runs on its own task and settles the session even if the client goes away.
pub async fn submit_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AdvisoryError> {
    let handle = state.session(id).await?;
    let ticket = handle.lock().await.begin_submit()?;

    let submitter = Arc::clone(&state.submitter);
    let task = tokio::spawn(async move {
        let outcome = submitter.submit(ticket.record().clone()).await;
        let mut session = handle.lock().await;
        session
            .finish_submit(ticket, outcome)
            .map(|_| session.snapshot())
    });

    let snapshot = task
        .await
        .map_err(|e| internal_error(format!("booking submission task failed: {}", e)))??;
    Ok(Json(SessionView {
        id,
        session: snapshot,
    }))
}

/// Closes the widget. An in-flight submission for this session is discarded.
pub async fn close_session_handler(
    State(state): State<Arc<ScheduleState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdvisoryError> {
    let entry = state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| not_found(format!("booking session {}", id)))?;
    // bumps the attempt so a submission still in flight cannot book its slot
    entry.handle.lock().await.close();
    info!("Closed booking session {}", id);
    Ok(StatusCode::NO_CONTENT)
}
