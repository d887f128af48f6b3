//! Fun-facts endpoint backed by the external text-generation service.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::clients::Lookup;
use crate::errors::AppError;
use crate::models::FactsResponse;
use crate::AppState;

/// Shown when the birth time is missing or the generation service degraded.
pub const FACTS_PLACEHOLDER: &str =
    "No fun facts available for this birth moment. Add a time of birth and try again.";

/// GET /api/birthdays/{id}/facts - 2-3 generated facts about a birth moment,
/// or a single placeholder when the time of birth is absent or the call fails.
pub async fn get_facts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<FactsResponse> {
    let record = state
        .repo
        .get_birthday(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Birthday {} not found", id)))?;

    let Some(tob) = record.tob.as_deref() else {
        return success(placeholder());
    };

    match state
        .facts
        .generate(&record.name, record.dob, tob, record.pob.as_deref())
        .await
    {
        Lookup::Hit(facts) => success(FactsResponse { facts }),
        Lookup::Miss => success(placeholder()),
        Lookup::Unavailable => {
            tracing::warn!("Fact generation unavailable for birthday {}", id);
            success(placeholder())
        }
    }
}

fn placeholder() -> FactsResponse {
    FactsResponse {
        facts: vec![FACTS_PLACEHOLDER.to_string()],
    }
}
