//! Shared board endpoint: everyone's birthdays ranked by countdown.

use axum::extract::State;
use chrono::Utc;

use super::{success, ApiResult};
use crate::calendar;
use crate::models::{BoardEntry, BoardResponse};
use crate::AppState;

/// GET /api/board - All records with countdowns, sorted soonest-first, plus
/// the subset celebrating soonest (every tie, not just the first).
pub async fn get_board(State(state): State<AppState>) -> ApiResult<BoardResponse> {
    let today = Utc::now().date_naive();

    let records = state.repo.list_birthdays().await?;

    let entries: Vec<BoardEntry> = records
        .into_iter()
        .map(|record| {
            let math = calendar::birthday_math(record.dob, today);
            BoardEntry {
                record,
                days_left: math.days_left,
                age_turning: math.age_turning,
            }
        })
        .collect();

    let (entries, upcoming) = calendar::rank_by_days_left(entries, |e| e.days_left);

    success(BoardResponse { entries, upcoming })
}
