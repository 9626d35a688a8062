//! Meal log handlers
//!
//! Every route is scoped to the caller; meals of other users answer 404.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use super::dto::{ListMealsParams, LogMealRequest, MealDto, UpdateMealRequest};
use crate::application::{LogMeal, MealService};
use crate::domain::GetMealDto;
use crate::interfaces::http::common::{
    api_error, domain_error, ApiError, ApiResponse, PaginatedResponse, ValidatedJson,
    ValidatedQuery,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

#[derive(Clone)]
pub struct MealHandlerState {
    pub meal_service: Arc<MealService>,
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant of `date`, so the range filter stays inclusive.
fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.checked_add_days(Days::new(1))
        .map(|next| day_start(next) - chrono::Duration::nanoseconds(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Parse a range bound given as an RFC 3339 timestamp or a bare date.
/// A bare date resolves through `on_date`.
fn parse_bound(
    field: &str,
    raw: Option<&str>,
    on_date: fn(NaiveDate) -> DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| Some(on_date(d)))
        .map_err(|_| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid {} '{}', expected RFC 3339 or YYYY-MM-DD", field, raw),
            )
        })
}

#[utoipa::path(
    post,
    path = "/api/v1/meals",
    tag = "Meals",
    security(("bearer_auth" = [])),
    request_body = LogMealRequest,
    params(("Idempotency-Key" = Option<String>, Header, description = "Replays the original meal when repeated")),
    responses(
        (status = 201, description = "Meal logged", body = ApiResponse<MealDto>),
        (status = 200, description = "Replay of an earlier request with the same key", body = ApiResponse<MealDto>),
        (status = 404, description = "Food not found"),
        (status = 422, description = "Validation error"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn log_meal(
    State(state): State<MealHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<LogMealRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MealDto>>), ApiError> {
    let idempotency_key = match headers.get(IDEMPOTENCY_KEY_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| {
                    api_error(StatusCode::BAD_REQUEST, "Idempotency-Key must be ASCII")
                })?
                .to_string(),
        ),
        None => None,
    };

    let logged = state
        .meal_service
        .log_meal(LogMeal {
            user_id: user.user_id,
            food_id: request.food_id,
            servings: request.servings,
            consumed_at: request.consumed_at,
            notes: request.notes,
            idempotency_key,
        })
        .await
        .map_err(domain_error)?;

    let status = if logged.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::success(logged.entry.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/meals",
    tag = "Meals",
    security(("bearer_auth" = [])),
    params(ListMealsParams),
    responses(
        (status = 200, description = "Caller's meals, newest first", body = ApiResponse<PaginatedResponse<MealDto>>),
        (status = 400, description = "Invalid or inverted date range")
    )
)]
pub async fn list_meals(
    State(state): State<MealHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedQuery(params): ValidatedQuery<ListMealsParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<MealDto>>>, ApiError> {
    let start = parse_bound("start_date", params.start_date.as_deref(), day_start)?;
    let end = parse_bound("end_date", params.end_date.as_deref(), day_end)?;

    let result = state
        .meal_service
        .list(GetMealDto {
            user_id: user.user_id,
            start,
            end,
            page: params.page,
            limit: params.limit,
        })
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        MealDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/meals/{id}",
    tag = "Meals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Meal ID")),
    responses(
        (status = 200, description = "Meal details", body = ApiResponse<MealDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_meal(
    State(state): State<MealHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MealDto>>, ApiError> {
    let entry = state
        .meal_service
        .get(user.user_id, id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(entry.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/meals/{id}",
    tag = "Meals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Meal ID")),
    request_body = UpdateMealRequest,
    responses(
        (status = 200, description = "Meal updated", body = ApiResponse<MealDto>),
        (status = 400, description = "Invalid servings or notes"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_meal(
    State(state): State<MealHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateMealRequest>,
) -> Result<Json<ApiResponse<MealDto>>, ApiError> {
    let entry = state
        .meal_service
        .update(user.user_id, id, request.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(entry.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meals/{id}",
    tag = "Meals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Meal ID")),
    responses(
        (status = 200, description = "Meal deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_meal(
    State(state): State<MealHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .meal_service
        .delete(user.user_id, id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(day_start(date).to_rfc3339(), "2024-05-01T00:00:00+00:00");
        let end = day_end(date);
        assert_eq!(end.date_naive(), date);
        assert!(end < day_start(date.succ_opt().unwrap()));
    }

    #[test]
    fn bounds_accept_timestamps_and_dates() {
        let ts = parse_bound("start_date", Some("2024-05-01T10:30:00+02:00"), day_start)
            .unwrap()
            .unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T08:30:00+00:00");

        let end = parse_bound("end_date", Some("2024-05-01"), day_end)
            .unwrap()
            .unwrap();
        assert_eq!(end, day_end(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));

        assert!(parse_bound("end_date", None, day_end).unwrap().is_none());
        assert_eq!(
            parse_bound("start_date", Some("last week"), day_start)
                .unwrap_err()
                .0,
            StatusCode::BAD_REQUEST
        );
    }
}
