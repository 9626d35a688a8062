//! Analytics handlers
//!
//! Results are served from the analytics cache; see [`AnalyticsService`].

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};

use super::dto::{
    DailyAnalyticsDto, DateQuery, RecommendationDto, TotalsDto, TotalsQuery, WeeklyAnalyticsDto,
};
use crate::application::AnalyticsService;
use crate::domain::AnalyticsWindow;
use crate::interfaces::http::common::{api_error, domain_error, ApiError, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct AnalyticsHandlerState {
    pub analytics_service: Arc<AnalyticsService>,
}

/// Parse a `YYYY-MM-DD` reference date, defaulting to today (UTC).
pub(crate) fn parse_reference_date(raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Utc::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid date '{}', expected YYYY-MM-DD", s),
            )
        }),
    }
}

fn parse_window(raw: Option<&str>) -> Result<AnalyticsWindow, ApiError> {
    match raw.map(str::trim) {
        None | Some("") | Some("day") => Ok(AnalyticsWindow::Day),
        Some("week") => Ok(AnalyticsWindow::Week),
        Some(other) => Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid window '{}', expected day or week", other),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/daily",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(DateQuery),
    responses(
        (status = 200, description = "Totals for the day against the calorie goal", body = ApiResponse<DailyAnalyticsDto>),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn daily_analytics(
    State(state): State<AnalyticsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ApiResponse<DailyAnalyticsDto>>, ApiError> {
    let date = parse_reference_date(query.date.as_deref())?;
    let report = state
        .analytics_service
        .daily(user.user_id, date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/weekly",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(DateQuery),
    responses(
        (status = 200, description = "Seven-day totals ending on the date", body = ApiResponse<WeeklyAnalyticsDto>),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn weekly_analytics(
    State(state): State<AnalyticsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ApiResponse<WeeklyAnalyticsDto>>, ApiError> {
    let date = parse_reference_date(query.date.as_deref())?;
    let report = state
        .analytics_service
        .weekly(user.user_id, date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/reco",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(DateQuery),
    responses(
        (status = 200, description = "Nutrition advice with suggested foods", body = ApiResponse<RecommendationDto>),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn recommendations(
    State(state): State<AnalyticsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ApiResponse<RecommendationDto>>, ApiError> {
    let date = parse_reference_date(query.date.as_deref())?;
    let report = state
        .analytics_service
        .recommendation(user.user_id, date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/totals",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(TotalsQuery),
    responses(
        (status = 200, description = "Nutrient name to total for the window", body = ApiResponse<TotalsDto>),
        (status = 400, description = "Invalid window or date"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn window_totals(
    State(state): State<AnalyticsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<TotalsQuery>,
) -> Result<Json<ApiResponse<TotalsDto>>, ApiError> {
    let window = parse_window(query.window.as_deref())?;
    let date = parse_reference_date(query.date.as_deref())?;
    let totals = state
        .analytics_service
        .totals(user.user_id, window, date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(TotalsDto::new(
        window, date, totals,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_date_defaults_to_today() {
        assert_eq!(parse_reference_date(None).unwrap(), Utc::now().date_naive());
        assert_eq!(
            parse_reference_date(Some("2024-05-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
    }

    #[test]
    fn malformed_date_is_bad_request() {
        for raw in ["05/01/2024", "2024-13-01", "yesterday"] {
            assert_eq!(
                parse_reference_date(Some(raw)).unwrap_err().0,
                StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn window_accepts_day_and_week_only() {
        assert_eq!(parse_window(None).unwrap(), AnalyticsWindow::Day);
        assert_eq!(parse_window(Some("week")).unwrap(), AnalyticsWindow::Week);
        assert!(parse_window(Some("month")).is_err());
    }
}
