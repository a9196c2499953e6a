use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};

use crate::{
    dto::users::{UserList, UserStatusUpdate, UserUpdate},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::ApiResponse,
    routes::params::Pagination,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .route("/{id}/status", put(update_user_status))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses((status = 200, description = "Current user", body = ApiResponse<User>)),
    tag = "Users"
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::me(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UserUpdate,
    responses((status = 200, description = "Profile updated", body = ApiResponse<User>)),
    tag = "Users"
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::update_me(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(Pagination),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>),
        (status = 403, description = "Admin only")
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    ensure_admin(&user)?;
    let resp = user_service::list_users(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User detail", body = ApiResponse<User>),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<User>>> {
    ensure_admin(&user)?;
    let resp = user_service::get_user(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/status",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserStatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<User>),
        (status = 400, description = "Invalid status")
    ),
    tag = "Users"
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UserStatusUpdate>,
) -> AppResult<Json<ApiResponse<User>>> {
    ensure_admin(&user)?;
    let resp = user_service::update_user_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
