// --- File: crates/services/advisory_backend/src/app_state.rs ---
use advisory_common::{not_found, AdvisoryError};
use advisory_config::AppConfig;
use advisory_schedule::handlers::ScheduleState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Booking widget state: settings, booked registry, clock, submitter and open sessions.
    pub schedule: Arc<ScheduleState>,
}

impl AppState {
    /// Wires the production services from configuration.
    pub fn new(config: Arc<AppConfig>) -> Result<Self, AdvisoryError> {
        let schedule = ScheduleState::from_config(&config)?;
        Ok(Self::with_schedule(config, Arc::new(schedule)))
    }

    /// Uses an already built schedule state, e.g. one with a fixed clock.
    pub fn with_schedule(config: Arc<AppConfig>, schedule: Arc<ScheduleState>) -> Self {
        Self { config, schedule }
    }

    /// Builds the full application router.
    ///
    /// `/api` carries the JSON endpoints; everything else falls through to the static
    /// site when `site.static_dir` is configured.
    pub fn router(&self) -> Router {
        let api_router = Router::new()
            .route("/", get(|| async { "Welcome to the advisory API!" }))
            .merge(advisory_common::routes())
            .merge(advisory_schedule::routes::routes(Arc::clone(&self.schedule)))
            .fallback(|uri: http::Uri| async move {
                not_found(format!("no API route for {}", uri.path()))
            });

        let mut app = Router::new().nest("/api", api_router);

        #[cfg(feature = "openapi")]
        {
            app = app.merge(swagger_ui());
        }

        if let Some(site) = &self.config.site {
            info!("Serving static site from {}", site.static_dir);
            app = app.fallback_service(ServeDir::new(&site.static_dir));
        }

        app.layer(TraceLayer::new_for_http())
    }
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use advisory_schedule::doc::ScheduleApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Advisory API",
            version = "0.1.0",
            description = "Booking widget API of the advisory site",
            license(name = "MIT", url = "https://opensource.org/licenses/MIT")
        ),
        components(),
        tags((name = "Advisory", description = "Core service endpoints")),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(ScheduleApiDoc::openapi());
    info!("Adding Swagger UI at /api/docs");
    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}
