use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::orders::{
        CreateOrderRequest, MenuDateQuery, OrderBatchEntry, OrderBatchResults, OrderList,
        OrderUpdate, OrderUpdateResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::{OrderListQuery, Pagination},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create_orders", post(create_order))
        .route("/getallorders", get(list_orders))
        .route("/getallorders/bymenudate", get(list_orders_by_menu_date))
        .route("/get/{id}", get(get_order))
        .route("/update/{id}", put(update_order))
        .route("/update-batch", put(update_orders_batch))
        .route("/delete/{id}", delete(cancel_order))
}

#[utoipa::path(
    post,
    path = "/api/orders/create_orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<Order>),
        (status = 400, description = "Invalid order or inactive menu"),
        (status = 404, description = "Scheduled menu not found")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/getallorders",
    params(OrderListQuery, Pagination),
    responses((status = 200, description = "Orders visible to the caller", body = ApiResponse<OrderList>)),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/getallorders/bymenudate",
    params(("menu_date" = String, Query, description = "YYYY-MM-DD"), Pagination),
    responses((status = 200, description = "Orders for one menu date", body = ApiResponse<OrderList>)),
    tag = "Orders"
)]
pub async fn list_orders_by_menu_date(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MenuDateQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp =
        order_service::list_by_menu_date(&state, &user, query.menu_date, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/get/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<Order>),
        (status = 403, description = "Not allowed to view this order"),
        (status = 404, description = "Order not found")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/update/{id}",
    params(("id" = i32, Path, description = "Order id")),
    request_body = OrderUpdate,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderUpdateResponse>),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Not the owning caterer")
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<ApiResponse<OrderUpdateResponse>>> {
    let resp = order_service::update_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/update-batch",
    request_body = Vec<OrderBatchEntry>,
    responses(
        (status = 200, description = "Per-order results; failed entries carry their error", body = ApiResponse<OrderBatchResults>),
        (status = 400, description = "Empty batch"),
        (status = 403, description = "Staff only")
    ),
    tag = "Orders"
)]
pub async fn update_orders_batch(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<Vec<OrderBatchEntry>>,
) -> AppResult<Json<ApiResponse<OrderBatchResults>>> {
    let resp = order_service::update_orders_batch(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/delete/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderUpdateResponse>),
        (status = 400, description = "Order can no longer be cancelled")
    ),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderUpdateResponse>>> {
    let resp = order_service::cancel_order(&state, &user, id).await?;
    Ok(Json(resp))
}
