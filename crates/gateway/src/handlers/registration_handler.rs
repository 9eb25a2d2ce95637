//! Registration handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult, STORE_WARNING_HEADER};
use domain::{search, NewRegistration, Registration, RegistrationPatch};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Optional search term shared by the list and report endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive match on child names, parent name or parent email
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn term(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }
}

/// Partial registration update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationRequest {
    #[validate(length(min = 1, message = "parentName cannot be empty"))]
    #[schema(example = "Jo Lee")]
    pub parent_name: Option<String>,
    #[validate(length(min = 1, message = "parentEmail cannot be empty"))]
    pub parent_email: Option<String>,
    #[validate(length(min = 1, message = "parentPhone cannot be empty"))]
    pub parent_phone: Option<String>,
    #[validate(length(min = 1, message = "childNames cannot be empty"))]
    pub child_names: Option<String>,
    #[validate(length(min = 1, message = "childAges cannot be empty"))]
    pub child_ages: Option<String>,
    #[schema(example = "peanuts")]
    pub allergies: Option<String>,
    pub neurodivergencies: Option<String>,
    #[validate(length(min = 1, message = "emergencyContactName cannot be empty"))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(min = 1, message = "emergencyContactPhone cannot be empty"))]
    pub emergency_contact_phone: Option<String>,
    #[schema(example = true)]
    pub checked_in: Option<bool>,
    /// Accepted and ignored
    #[schema(value_type = Option<String>)]
    pub id: Option<Value>,
    /// Accepted and ignored
    #[schema(value_type = Option<String>)]
    pub registration_date: Option<Value>,
}

impl UpdateRegistrationRequest {
    /// Whitespace-only values for required fields count as blank too.
    fn into_patch(self) -> AppResult<RegistrationPatch> {
        let blank: Vec<&str> = [
            ("parentName", &self.parent_name),
            ("parentEmail", &self.parent_email),
            ("parentPhone", &self.parent_phone),
            ("childNames", &self.child_names),
            ("childAges", &self.child_ages),
            ("emergencyContactName", &self.emergency_contact_name),
            ("emergencyContactPhone", &self.emergency_contact_phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

        if !blank.is_empty() {
            return Err(AppError::validation(format!(
                "Required fields cannot be blank: {}",
                blank.join(", ")
            )));
        }

        Ok(RegistrationPatch {
            parent_name: self.parent_name,
            parent_email: self.parent_email,
            parent_phone: self.parent_phone,
            child_names: self.child_names,
            child_ages: self.child_ages,
            allergies: self.allergies,
            neurodivergencies: self.neurodivergencies,
            emergency_contact_name: self.emergency_contact_name,
            emergency_contact_phone: self.emergency_contact_phone,
            checked_in: self.checked_in,
            id: self.id,
            registration_date: self.registration_date,
        })
    }
}

/// Confirmation body for deletes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Registration deleted successfully")]
    pub message: String,
}

/// Create registration routes
pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registrations).post(create_registration))
        .route(
            "/:id",
            get(get_registration)
                .patch(update_registration)
                .delete(delete_registration),
        )
        .route("/:id/check-in", post(toggle_check_in))
}

/// List registrations, optionally filtered
#[utoipa::path(
    get,
    path = "/registrations",
    tag = "Registrations",
    params(SearchQuery),
    responses(
        (status = 200, description = "Registrations in stored order. An unreadable store yields an empty list and an x-store-warning header", body = Vec<Registration>)
    )
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let snapshot = state.registrations.list().await;
    let headers = store_warning_headers(snapshot.warning);
    let registrations = search(snapshot.registrations, query.term());

    (headers, Json(registrations)).into_response()
}

/// `x-store-warning` carrying the read error of a degraded snapshot, if any.
pub fn store_warning_headers(warning: Option<String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(warning) = warning {
        let value = HeaderValue::from_str(&warning)
            .unwrap_or_else(|_| HeaderValue::from_static("registrations could not be loaded"));
        headers.insert(STORE_WARNING_HEADER, value);
    }
    headers
}

/// Register a family
#[utoipa::path(
    post,
    path = "/registrations",
    tag = "Registrations",
    request_body = NewRegistration,
    responses(
        (status = 201, description = "Registration created", body = Registration),
        (status = 400, description = "Missing required fields or malformed JSON"),
        (status = 500, description = "Registrations could not be saved")
    )
)]
pub async fn create_registration(
    State(state): State<AppState>,
    payload: Result<Json<NewRegistration>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Registration>)> {
    let Json(form) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let registration = state.registrations.create(form).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Get registration by ID
#[utoipa::path(
    get,
    path = "/registrations/{id}",
    tag = "Registrations",
    params(
        ("id" = String, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Registration", body = Registration),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Registration>> {
    Ok(Json(state.registrations.get(&id).await?))
}

/// Update registration fields
#[utoipa::path(
    patch,
    path = "/registrations/{id}",
    tag = "Registrations",
    params(
        ("id" = String, Path, description = "Registration ID")
    ),
    request_body = UpdateRegistrationRequest,
    responses(
        (status = 200, description = "Merged registration", body = Registration),
        (status = 400, description = "A required field was blanked"),
        (status = 404, description = "Registration not found"),
        (status = 500, description = "Registrations could not be saved")
    )
)]
pub async fn update_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateRegistrationRequest>,
) -> AppResult<Json<Registration>> {
    let patch = payload.into_patch()?;
    Ok(Json(state.registrations.update(&id, patch).await?))
}

/// Delete registration
#[utoipa::path(
    delete,
    path = "/registrations/{id}",
    tag = "Registrations",
    params(
        ("id" = String, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Registration deleted", body = MessageResponse),
        (status = 404, description = "Registration not found"),
        (status = 500, description = "Registrations could not be saved")
    )
)]
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.registrations.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Registration deleted successfully".to_string(),
    }))
}

/// Toggle check-in status
#[utoipa::path(
    post,
    path = "/registrations/{id}/check-in",
    tag = "Registrations",
    params(
        ("id" = String, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Registration with flipped check-in status", body = Registration),
        (status = 404, description = "Registration not found"),
        (status = 500, description = "Registrations could not be saved")
    )
)]
pub async fn toggle_check_in(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Registration>> {
    Ok(Json(state.registrations.toggle_check_in(&id).await?))
}
