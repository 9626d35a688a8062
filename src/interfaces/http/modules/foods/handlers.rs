//! Food catalog handlers
//!
//! Any authenticated user may browse; mutations require the admin role.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateFoodRequest, DeletedFoodResponse, FoodDto, ListFoodsParams, UpdateFoodRequest,
};
use crate::application::FoodService;
use crate::domain::GetFoodDto;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, PaginatedResponse, ValidatedJson, ValidatedQuery,
};
use crate::interfaces::http::middleware::{ensure_admin, AuthenticatedUser};

#[derive(Clone)]
pub struct FoodHandlerState {
    pub food_service: Arc<FoodService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/foods",
    tag = "Foods",
    security(("bearer_auth" = [])),
    params(ListFoodsParams),
    responses(
        (status = 200, description = "Foods ordered by name", body = ApiResponse<PaginatedResponse<FoodDto>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_foods(
    State(state): State<FoodHandlerState>,
    ValidatedQuery(params): ValidatedQuery<ListFoodsParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<FoodDto>>>, ApiError> {
    let result = state
        .food_service
        .list(GetFoodDto {
            search: params.search,
            page: params.page,
            limit: params.limit,
        })
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        FoodDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/foods/{id}",
    tag = "Foods",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Food ID")),
    responses(
        (status = 200, description = "Food details", body = ApiResponse<FoodDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_food(
    State(state): State<FoodHandlerState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FoodDto>>, ApiError> {
    let food = state.food_service.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(food.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/foods",
    tag = "Foods",
    security(("bearer_auth" = [])),
    request_body = CreateFoodRequest,
    responses(
        (status = 201, description = "Food created", body = ApiResponse<FoodDto>),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_food(
    State(state): State<FoodHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateFoodRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FoodDto>>), ApiError> {
    ensure_admin(&user)?;

    let food = state
        .food_service
        .create(request.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(food.into()))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/foods/{id}",
    tag = "Foods",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Food ID")),
    request_body = UpdateFoodRequest,
    responses(
        (status = 200, description = "Food updated", body = ApiResponse<FoodDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_food(
    State(state): State<FoodHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateFoodRequest>,
) -> Result<Json<ApiResponse<FoodDto>>, ApiError> {
    ensure_admin(&user)?;

    let food = state
        .food_service
        .update(id, request.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(food.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/foods/{id}",
    tag = "Foods",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Food ID")),
    responses(
        (status = 200, description = "Food and its meals deleted", body = ApiResponse<DeletedFoodResponse>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_food(
    State(state): State<FoodHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedFoodResponse>>, ApiError> {
    ensure_admin(&user)?;

    let removed_meals = state.food_service.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(DeletedFoodResponse {
        id,
        removed_meals,
    })))
}
