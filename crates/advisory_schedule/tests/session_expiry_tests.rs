//! Idle booking sessions are dropped after the configured TTL.

use advisory_schedule::{FixedClock, ScheduleSettings, SimulatedSubmitter};
use axum::http::{Method, StatusCode};
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;

use fixtures::{noon, send, wait_for_state, GatedSubmitter, TestApp};

fn app_with_ttl(minutes: u64) -> TestApp {
    let settings = ScheduleSettings::default()
        .with_session_idle_ttl(Duration::from_secs(minutes * 60))
        .with_session_sweep_interval(Duration::from_secs(60));
    let clock = Arc::new(FixedClock::new(noon()));
    TestApp::with_settings(
        settings,
        Arc::new(SimulatedSubmitter::new(Duration::ZERO, clock)),
    )
}

#[tokio::test]
async fn test_opening_a_session_evicts_idle_ones() {
    let app = app_with_ttl(30);
    for _ in 0..50 {
        app.open_session().await;
    }
    assert_eq!(app.state.session_count().await, 50);

    app.clock.advance(ChronoDuration::minutes(31));
    app.open_session().await;
    assert_eq!(app.state.session_count().await, 1);
}

#[tokio::test]
async fn test_touched_session_outlives_idle_one() {
    let app = app_with_ttl(30);
    let idle = app.open_session().await;
    let active = app.open_session().await;

    app.clock.advance(ChronoDuration::minutes(20));
    let (status, _) = app.select_time(active, "15:00").await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(ChronoDuration::minutes(20));
    let (status, _) = app
        .request(Method::GET, &format!("/schedule/sessions/{active}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, &format!("/schedule/sessions/{idle}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.session_count().await, 1);
}

#[tokio::test]
async fn test_zero_ttl_keeps_sessions_until_closed() {
    let app = app_with_ttl(0);
    let id = app.open_session().await;
    app.clock.advance(ChronoDuration::days(2));

    assert_eq!(app.state.evict_idle().await, 0);
    let (status, _) = app
        .request(Method::GET, &format!("/schedule/sessions/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.state.spawn_idle_sweeper().is_none());
}

#[tokio::test]
async fn test_session_waiting_on_submission_is_not_evicted() {
    let submitter = Arc::new(GatedSubmitter::new());
    let settings =
        ScheduleSettings::default().with_session_idle_ttl(Duration::from_secs(30 * 60));
    let app = TestApp::with_settings(settings, submitter.clone());
    let id = app.open_session().await;
    app.fill_contact(id).await;
    app.select_time(id, "15:00").await;

    let router = app.router.clone();
    let uri = format!("/schedule/sessions/{id}/submit");
    let pending = tokio::spawn(async move { send(router, Method::POST, &uri, None).await });
    wait_for_state(&app, id, "submitting").await;

    app.clock.advance(ChronoDuration::hours(1));
    assert_eq!(app.state.evict_idle().await, 0);

    submitter.release();
    let (status, body) = pending.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "confirmed");
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_evicts_in_the_background() {
    let app = app_with_ttl(30);
    app.open_session().await;
    app.open_session().await;
    let sweeper = app.state.spawn_idle_sweeper().expect("eviction is enabled");

    app.clock.advance(ChronoDuration::minutes(45));
    for _ in 0..5 {
        if app.state.session_count().await == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
    assert_eq!(app.state.session_count().await, 0);
    sweeper.abort();
}
