use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList, ReviewStats},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    routes::params::Pagination,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create_review", post(create_review))
        .route("/getApprovedReviews", get(approved_reviews))
        .route("/getAllReviews", get(all_reviews))
        .route("/stats", get(review_stats))
        .route("/{id}/approve", put(approve_review))
        .route("/{id}/delete", delete(delete_review))
}

#[utoipa::path(
    post,
    path = "/api/review/create_review",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review submitted for moderation", body = ApiResponse<Review>),
        (status = 400, description = "Invalid review or duplicate email")
    ),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::create_review(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/review/getApprovedReviews",
    params(Pagination),
    responses((status = 200, description = "Approved reviews", body = ApiResponse<ReviewList>)),
    tag = "Reviews"
)]
pub async fn approved_reviews(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::approved_reviews(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/review/getAllReviews",
    params(Pagination),
    responses(
        (status = 200, description = "All reviews", body = ApiResponse<ReviewList>),
        (status = 403, description = "Admin only")
    ),
    tag = "Reviews"
)]
pub async fn all_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::all_reviews(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/review/{id}/approve",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review approved", body = ApiResponse<Review>),
        (status = 404, description = "Review not found")
    ),
    tag = "Reviews"
)]
pub async fn approve_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::approve_review(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/review/{id}/delete",
    params(("id" = i32, Path, description = "Review id")),
    responses((status = 200, description = "Review deleted")),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_review(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/review/stats",
    responses((status = 200, description = "Review counts and average rating", body = ApiResponse<ReviewStats>)),
    tag = "Reviews"
)]
pub async fn review_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ReviewStats>>> {
    let resp = review_service::review_stats(&state).await?;
    Ok(Json(resp))
}
