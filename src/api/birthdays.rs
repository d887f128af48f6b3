//! Birth record CRUD endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};

use super::{success, ApiResult};
use crate::auth::CurrentUser;
use crate::clients::Lookup;
use crate::errors::AppError;
use crate::models::{BirthRecord, SaveBirthdayRequest};
use crate::AppState;

/// GET /api/birthdays - List all records, ordered by (month, day).
pub async fn list_birthdays(State(state): State<AppState>) -> ApiResult<Vec<BirthRecord>> {
    let birthdays = state.repo.list_birthdays().await?;
    success(birthdays)
}

/// GET /api/birthdays/{id} - Get a single record.
pub async fn get_birthday(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BirthRecord> {
    let birthday = state
        .repo
        .get_birthday(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Birthday {} not found", id)))?;

    success(birthday)
}

/// POST /api/birthdays - Create a new record.
pub async fn create_birthday(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<SaveBirthdayRequest>,
) -> ApiResult<BirthRecord> {
    let (request, dob) = validate_request(request)?;

    // One record per account, unless admin
    if !user.is_admin && state.repo.count_birthdays_for_owner(&user.id).await? > 0 {
        return Err(AppError::RecordLimit(
            "This account already has a birthday record".to_string(),
        ));
    }

    let (latitude, longitude) = resolve_place(&state, request.pob.as_deref()).await;

    let birthday = state
        .repo
        .create_birthday(&user.id, &request, dob, latitude, longitude)
        .await?;

    tracing::info!("Created birthday {} for {}", birthday.id, user.email);
    success(birthday)
}

/// PUT /api/birthdays/{id} - Fully replace a record. Owner or admin only.
pub async fn update_birthday(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<SaveBirthdayRequest>,
) -> ApiResult<BirthRecord> {
    let existing = state
        .repo
        .get_birthday(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Birthday {} not found", id)))?;

    if !user.can_modify(&existing.owner_id) {
        return Err(AppError::Forbidden(
            "Only the owner or the administrator may edit this record".to_string(),
        ));
    }

    let (request, dob) = validate_request(request)?;

    // Recompute coordinates only when the place actually changed
    let (latitude, longitude) = if request.pob == existing.pob {
        (existing.latitude, existing.longitude)
    } else {
        resolve_place(&state, request.pob.as_deref()).await
    };

    let birthday = state
        .repo
        .replace_birthday(&id, &request, dob, latitude, longitude)
        .await?;

    success(birthday)
}

/// DELETE /api/birthdays/{id} - Delete a record. Owner or admin only.
pub async fn delete_birthday(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = state
        .repo
        .get_birthday(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Birthday {} not found", id)))?;

    if !user.can_modify(&existing.owner_id) {
        return Err(AppError::Forbidden(
            "Only the owner or the administrator may delete this record".to_string(),
        ));
    }

    state.repo.delete_birthday(&id).await?;

    tracing::info!("Deleted birthday {} ({})", id, existing.name);
    success(())
}

/// Validate a save request: non-empty name, parseable date, blanks to None.
fn validate_request(
    mut request: SaveBirthdayRequest,
) -> Result<(SaveBirthdayRequest, NaiveDate), AppError> {
    request.name = request.name.trim().to_string();
    if request.name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let dob = NaiveDate::parse_from_str(request.dob.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::Validation("Invalid date format. Use YYYY-MM-DD.".to_string())
    })?;

    // A future date would put a negative age on the board
    if dob > Utc::now().date_naive() {
        return Err(AppError::Validation(
            "Birth date cannot be in the future".to_string(),
        ));
    }

    request.tob = normalize(request.tob);
    request.pob = normalize(request.pob);
    request.notes = normalize(request.notes);

    Ok((request, dob))
}

fn normalize(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Geocode a place name, degrading silently to no coordinates.
async fn resolve_place(state: &AppState, place: Option<&str>) -> (Option<f64>, Option<f64>) {
    let Some(place) = place else {
        return (None, None);
    };

    match state.geocode.lookup(place).await {
        Lookup::Hit((latitude, longitude)) => (Some(latitude), Some(longitude)),
        Lookup::Miss => (None, None),
        Lookup::Unavailable => {
            tracing::warn!("Geocoding unavailable; storing {:?} without coordinates", place);
            (None, None)
        }
    }
}
