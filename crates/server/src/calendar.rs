//! Month-view calendar endpoint: projects a group's shifts onto day cells.

use api_types::calendar::{CalendarQuery, CalendarResponse, DayCellView};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::calendar;

use crate::{ServerError, server::ServerState};

pub async fn month(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ServerError> {
    let days = calendar::month_days(query.year, query.month)
        .ok_or_else(|| ServerError::Generic("invalid year or month".to_string()))?;

    let shifts: Vec<engine::Shift> = state
        .engine
        .list_shifts(&group_id)
        .await?
        .into_iter()
        .map(|(shift, _)| shift)
        .collect();

    let cells = calendar::project(&days, &shifts)
        .into_iter()
        .map(|cell| DayCellView {
            date: cell.date,
            weekday: cell.weekday,
            shifts: cell.shifts,
        })
        .collect();

    Ok(Json(CalendarResponse {
        year: query.year,
        month: query.month,
        cells,
    }))
}
