//! Admin report handlers: counters, CSV export and printable pages.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;

use common::AppResult;
use domain::{search, Registration, RegistrationStats};

use crate::handlers::registration_handler::{store_warning_headers, SearchQuery};
use crate::state::AppState;
use crate::views::{export, html};

/// Create report routes
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(registration_stats))
        .route("/registrations.csv", get(export_csv))
        .route("/print", get(print_list))
        .route("/name-tags", get(name_tags))
}

/// Registrations matching the query, plus the warning header of a degraded read.
async fn matching(state: &AppState, query: &SearchQuery) -> (HeaderMap, Vec<Registration>) {
    let snapshot = state.registrations.list().await;
    let headers = store_warning_headers(snapshot.warning);
    (headers, search(snapshot.registrations, query.term()))
}

/// Check-in counters over all registrations
#[utoipa::path(
    get,
    path = "/reports/stats",
    tag = "Reports",
    responses(
        (status = 200, description = "Total, checked in and remaining", body = RegistrationStats)
    )
)]
pub async fn registration_stats(
    State(state): State<AppState>,
) -> (HeaderMap, Json<RegistrationStats>) {
    let snapshot = state.registrations.list().await;
    let stats = RegistrationStats::from_registrations(&snapshot.registrations);
    (store_warning_headers(snapshot.warning), Json(stats))
}

/// Spreadsheet export
#[utoipa::path(
    get,
    path = "/reports/registrations.csv",
    tag = "Reports",
    params(SearchQuery),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String)
    )
)]
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let (headers, registrations) = matching(&state, &query).await;
    let body = export::registrations_csv(&registrations)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::export_filename(Utc::now().date_naive())
    );

    Ok((
        headers,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Printable registration list
#[utoipa::path(
    get,
    path = "/reports/print",
    tag = "Reports",
    params(SearchQuery),
    responses(
        (status = 200, description = "HTML page", content_type = "text/html", body = String)
    )
)]
pub async fn print_list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> (HeaderMap, Html<String>) {
    let (headers, registrations) = matching(&state, &query).await;
    (headers, Html(html::print_list(&registrations, Utc::now())))
}

/// Printable name tags for children not yet checked in
#[utoipa::path(
    get,
    path = "/reports/name-tags",
    tag = "Reports",
    params(SearchQuery),
    responses(
        (status = 200, description = "HTML page", content_type = "text/html", body = String)
    )
)]
pub async fn name_tags(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> (HeaderMap, Html<String>) {
    let (headers, registrations) = matching(&state, &query).await;
    (headers, Html(html::name_tags(&registrations, Utc::now())))
}
