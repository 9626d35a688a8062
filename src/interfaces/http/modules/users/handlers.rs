//! User profile and administration handlers
//!
//! Profile routes act on the caller; listing users and changing roles are
//! admin-only. Delegates to `UserService`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ChangeRoleRequest, ListUsersParams, UpdateProfileRequest, UserDto};
use crate::application::UserService;
use crate::domain::{DomainError, GetUserDto, UpdateUserDto, UserRole};
use crate::interfaces::http::common::{
    api_error, domain_error, ApiError, ApiResponse, PaginatedResponse, ValidatedJson,
    ValidatedQuery,
};
use crate::interfaces::http::middleware::{ensure_admin, AuthenticatedUser};

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

fn parse_role(raw: &str) -> Result<UserRole, ApiError> {
    UserRole::parse(raw).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Unknown role '{}', expected 'user' or 'admin'", raw),
        )
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = ApiResponse<UserDto>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let profile = state
        .user_service
        .profile(user.user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(profile.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserDto>),
        (status = 422, description = "Validation error"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn update_profile(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let updated = state
        .user_service
        .update_profile(
            user.user_id,
            UpdateUserDto {
                name: request.name,
                profile: request.profile.into(),
            },
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedQuery(params): ValidatedQuery<ListUsersParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<UserDto>>>, ApiError> {
    ensure_admin(&user)?;

    let role = params.role.as_deref().map(parse_role).transpose()?;
    let result = state
        .user_service
        .list_users(GetUserDto {
            search: params.search,
            role,
            page: params.page,
            limit: params.limit,
        })
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        UserDto::from,
    ))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_role(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    ensure_admin(&user)?;

    let role = parse_role(&request.role)?;
    if id == user.user_id && role != UserRole::Admin {
        return Err(domain_error(DomainError::Validation(
            "Admins cannot demote themselves".into(),
        )));
    }

    let updated = state
        .user_service
        .change_role(id, role)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(updated.into())))
}
