use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};

use crate::{
    dto::inquiries::{CreateInquiryRequest, InquiryList, InquiryStats, InquiryStatusUpdate},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Inquiry,
    response::ApiResponse,
    routes::params::{InquiryQuery, Pagination},
    services::inquiry_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create_inquiry", post(create_inquiry))
        .route("/allinquiries", get(list_inquiries))
        .route("/stats/dashboard", get(inquiry_stats))
        .route("/{id}", get(get_inquiry).delete(delete_inquiry))
        .route("/{id}/status", put(update_inquiry_status))
}

#[utoipa::path(
    post,
    path = "/api/inquiry/create_inquiry",
    request_body = CreateInquiryRequest,
    responses(
        (status = 200, description = "Inquiry received", body = ApiResponse<Inquiry>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Inquiries"
)]
pub async fn create_inquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateInquiryRequest>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    let resp = inquiry_service::create_inquiry(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/inquiry/allinquiries",
    params(InquiryQuery, Pagination),
    responses(
        (status = 200, description = "Inquiries", body = ApiResponse<InquiryList>),
        (status = 403, description = "Admin only")
    ),
    tag = "Inquiries"
)]
pub async fn list_inquiries(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<InquiryQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<InquiryList>>> {
    let resp = inquiry_service::list_inquiries(&state, &user, query, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/inquiry/{id}",
    params(("id" = i32, Path, description = "Inquiry id")),
    responses(
        (status = 200, description = "Inquiry detail", body = ApiResponse<Inquiry>),
        (status = 404, description = "Inquiry not found")
    ),
    tag = "Inquiries"
)]
pub async fn get_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    let resp = inquiry_service::get_inquiry(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/inquiry/{id}/status",
    params(("id" = i32, Path, description = "Inquiry id")),
    request_body = InquiryStatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Inquiry>),
        (status = 400, description = "Unknown status")
    ),
    tag = "Inquiries"
)]
pub async fn update_inquiry_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<InquiryStatusUpdate>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    let resp = inquiry_service::update_inquiry_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/inquiry/{id}",
    params(("id" = i32, Path, description = "Inquiry id")),
    responses((status = 200, description = "Inquiry deleted")),
    tag = "Inquiries"
)]
pub async fn delete_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = inquiry_service::delete_inquiry(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/inquiry/stats/dashboard",
    responses(
        (status = 200, description = "Inquiry dashboard figures", body = ApiResponse<InquiryStats>),
        (status = 403, description = "Admin only")
    ),
    tag = "Inquiries"
)]
pub async fn inquiry_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<InquiryStats>>> {
    let resp = inquiry_service::inquiry_stats(&state, &user).await?;
    Ok(Json(resp))
}
