use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use unibo_ics_core::{
    Course, Error, UniboClient,
    courses::sort_courses,
    ics::{IcsGenerator, IcsOptions},
    opendata::Resource,
};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<UniboClient>,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Resource listing parameters
#[derive(Deserialize)]
struct ResourcesQuery {
    package: String,
}

/// Course listing parameters
#[derive(Deserialize)]
struct CoursesQuery {
    package: String,
    alias: String,
}

/// Calendar generation parameters
#[derive(Deserialize)]
struct CalendarQuery {
    package: String,
    alias: String,
    code: u32,
    year: Option<u32>,
    calendar_name: Option<String>,
}

pub fn create_app() -> Router {
    let state = AppState {
        client: Arc::new(UniboClient::new()),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/resources", get(resources_handler))
        .route("/courses", get(courses_handler))
        .route("/calendar", get(calendar_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Root handler
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Unibo ICS Calendar Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "University of Bologna course timetables as ICS calendars",
        "endpoints": {
            "health": "/health",
            "resources": "/resources?package=<id>",
            "courses": "/courses?package=<id>&alias=<alias>",
            "calendar": "/calendar?package=<id>&alias=<alias>&code=<code>&year=<year>"
        }
    }))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List the resources of a catalogue package
async fn resources_handler(
    Query(params): Query<ResourcesQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pack = state.client.package(&params.package).await?;
    if !pack.success {
        return Err(AppError::Upstream(format!(
            "catalogue query for package '{}' was unsuccessful",
            params.package
        )));
    }

    Ok(Json(pack.result.resources))
}

/// List the courses published in a package resource
async fn courses_handler(
    Query(params): Query<CoursesQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let resource = find_resource(&state, &params.package, &params.alias).await?;

    let mut courses = state.client.courses(&resource).await?;
    sort_courses(&mut courses);

    Ok(Json(courses))
}

/// Resolve one course's timetable and serve it as an ICS calendar
async fn calendar_handler(
    Query(params): Query<CalendarQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let resource = find_resource(&state, &params.package, &params.alias).await?;
    let courses = state.client.courses(&resource).await?;

    let course: &Course = courses
        .iter()
        .find(|course| course.codice == params.code)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "course {} not found in resource '{}'",
                params.code, params.alias
            ))
        })?;

    let year = params.year.unwrap_or(1);
    let timetable = state.client.course_timetable(course, year).await?;

    let generator = IcsGenerator::new(IcsOptions {
        calendar_name: params
            .calendar_name
            .or_else(|| Some(course.descrizione.clone())),
    });
    let calendar = generator.generate(&timetable).to_string();

    Ok((
        StatusCode::OK,
        [("Content-Type", "text/calendar; charset=utf-8")],
        calendar,
    ))
}

async fn find_resource(state: &AppState, package: &str, alias: &str) -> Result<Resource, AppError> {
    let pack = state.client.package(package).await?;
    if !pack.success {
        return Err(AppError::Upstream(format!(
            "catalogue query for package '{package}' was unsuccessful"
        )));
    }

    pack.result
        .resources
        .get_by_alias(alias)
        .cloned()
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no resource with alias '{alias}' in package '{package}'"
            ))
        })
}

/// Application error type
#[derive(Debug)]
enum AppError {
    Core(Error),
    NotFound(String),
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "not found", message.clone()),
            Self::Upstream(message) => (StatusCode::BAD_GATEWAY, "upstream error", message.clone()),
            Self::Core(err) => {
                let (status, error) = match err {
                    Error::Http(_) => (StatusCode::BAD_GATEWAY, "upstream request failed"),
                    Error::WebsiteNotFound => (StatusCode::NOT_FOUND, "course website not found"),
                    Error::UnsupportedResource { .. } => {
                        (StatusCode::BAD_GATEWAY, "unsupported resource type")
                    }
                    _ => (StatusCode::BAD_GATEWAY, "upstream data malformed"),
                };
                (status, error, err.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self::Core(err)
    }
}
