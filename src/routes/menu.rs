use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};

use crate::{
    dto::menu::{
        CatalogEntryList, CatalogItemList, CatalogItemUpdate, CategoryList, ComboList,
        ComboUpdate, CreateCatalogItemRequest, CreateComboRequest, CreateScheduledMenuRequest,
        ScheduledMenuList, ScheduledMenuStatusRequest, ScheduledMenuUpdate,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{CatalogItem, Combo, ScheduledMenu},
    response::ApiResponse,
    routes::params::{CatalogQuery, Pagination, ScheduledMenuQuery},
    services::{catalog_service, combo_service, menu_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scheduled", get(list_scheduled).post(create_scheduled))
        .route("/scheduled/inactive", get(list_inactive_scheduled))
        .route("/scheduled/my", get(list_my_scheduled))
        .route(
            "/scheduled/{id}",
            get(get_scheduled)
                .put(update_scheduled)
                .delete(delete_scheduled),
        )
        .route("/scheduled/{id}/status", put(set_scheduled_status))
        .route("/catalog/menu_items", get(list_catalog_items))
        .route("/catalog/create_menu_item", post(create_catalog_item))
        .route(
            "/catalog/menu/{id}",
            put(update_catalog_item).delete(delete_catalog_item),
        )
        .route("/catalog/menu/categories", get(catalog_categories))
        .route("/catalog/all", get(list_catalog_all))
        .route("/catalog/createcombo", post(create_combo))
        .route("/catalog/allcombo", get(list_combos))
        .route("/catalog/combo/catlist", get(combo_categories))
        .route(
            "/catalog/combo/{id}",
            get(get_combo).put(update_combo).delete(delete_combo),
        )
}

#[utoipa::path(
    get,
    path = "/api/menu/scheduled",
    params(ScheduledMenuQuery, Pagination),
    responses((status = 200, description = "Active scheduled menus", body = ApiResponse<ScheduledMenuList>)),
    tag = "Menu"
)]
pub async fn list_scheduled(
    State(state): State<AppState>,
    Query(query): Query<ScheduledMenuQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ScheduledMenuList>>> {
    let resp = menu_service::list_scheduled(&state, true, query, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/scheduled/inactive",
    params(ScheduledMenuQuery, Pagination),
    responses((status = 200, description = "Inactive scheduled menus", body = ApiResponse<ScheduledMenuList>)),
    tag = "Menu"
)]
pub async fn list_inactive_scheduled(
    State(state): State<AppState>,
    Query(query): Query<ScheduledMenuQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ScheduledMenuList>>> {
    let resp = menu_service::list_scheduled(&state, false, query, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/scheduled/my",
    responses(
        (status = 200, description = "Menus of the calling caterer", body = ApiResponse<ScheduledMenuList>),
        (status = 403, description = "Caterers only")
    ),
    tag = "Menu"
)]
pub async fn list_my_scheduled(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ScheduledMenuList>>> {
    let resp = menu_service::list_my_menus(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menu/scheduled",
    request_body = CreateScheduledMenuRequest,
    responses(
        (status = 200, description = "Scheduled menu created", body = ApiResponse<ScheduledMenu>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Menu"
)]
pub async fn create_scheduled(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateScheduledMenuRequest>,
) -> AppResult<Json<ApiResponse<ScheduledMenu>>> {
    let resp = menu_service::create_scheduled(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/scheduled/{id}",
    params(("id" = String, Path, description = "Menu id, e.g. M20250615")),
    responses(
        (status = 200, description = "Scheduled menu", body = ApiResponse<ScheduledMenu>),
        (status = 404, description = "Scheduled menu not found")
    ),
    tag = "Menu"
)]
pub async fn get_scheduled(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ScheduledMenu>>> {
    let resp = menu_service::get_scheduled(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menu/scheduled/{id}",
    params(("id" = String, Path, description = "Menu id")),
    request_body = ScheduledMenuUpdate,
    responses((status = 200, description = "Scheduled menu updated", body = ApiResponse<ScheduledMenu>)),
    tag = "Menu"
)]
pub async fn update_scheduled(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ScheduledMenuUpdate>,
) -> AppResult<Json<ApiResponse<ScheduledMenu>>> {
    let resp = menu_service::update_scheduled(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menu/scheduled/{id}/status",
    params(("id" = String, Path, description = "Menu id")),
    request_body = ScheduledMenuStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ScheduledMenu>),
        (status = 400, description = "Already in that state")
    ),
    tag = "Menu"
)]
pub async fn set_scheduled_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ScheduledMenuStatusRequest>,
) -> AppResult<Json<ApiResponse<ScheduledMenu>>> {
    let resp = menu_service::set_scheduled_status(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/menu/scheduled/{id}",
    params(("id" = String, Path, description = "Menu id")),
    responses((status = 200, description = "Scheduled menu deactivated")),
    tag = "Menu"
)]
pub async fn delete_scheduled(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_scheduled(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/catalog/menu_items",
    params(CatalogQuery, Pagination),
    responses((status = 200, description = "Catalog items", body = ApiResponse<CatalogItemList>)),
    tag = "Catalog"
)]
pub async fn list_catalog_items(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CatalogItemList>>> {
    let resp = catalog_service::list_items(&state, query, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menu/catalog/create_menu_item",
    request_body = CreateCatalogItemRequest,
    responses(
        (status = 200, description = "Catalog item created", body = ApiResponse<CatalogItem>),
        (status = 400, description = "Duplicate or invalid item")
    ),
    tag = "Catalog"
)]
pub async fn create_catalog_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCatalogItemRequest>,
) -> AppResult<Json<ApiResponse<CatalogItem>>> {
    let resp = catalog_service::create_item(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menu/catalog/menu/{id}",
    params(("id" = i32, Path, description = "Catalog item id")),
    request_body = CatalogItemUpdate,
    responses((status = 200, description = "Catalog item updated", body = ApiResponse<CatalogItem>)),
    tag = "Catalog"
)]
pub async fn update_catalog_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<CatalogItemUpdate>,
) -> AppResult<Json<ApiResponse<CatalogItem>>> {
    let resp = catalog_service::update_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/menu/catalog/menu/{id}",
    params(("id" = i32, Path, description = "Catalog item id")),
    responses((status = 200, description = "Catalog item deleted")),
    tag = "Catalog"
)]
pub async fn delete_catalog_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_item(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/catalog/menu/categories",
    responses((status = 200, description = "Catalog categories", body = ApiResponse<CategoryList>)),
    tag = "Catalog"
)]
pub async fn catalog_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::item_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/catalog/all",
    params(CatalogQuery, Pagination),
    responses((status = 200, description = "Items and combos, newest first", body = ApiResponse<CatalogEntryList>)),
    tag = "Catalog"
)]
pub async fn list_catalog_all(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CatalogEntryList>>> {
    let resp = catalog_service::list_all(&state, query, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menu/catalog/createcombo",
    request_body = CreateComboRequest,
    responses(
        (status = 200, description = "Combo created", body = ApiResponse<Combo>),
        (status = 400, description = "Invalid or missing items")
    ),
    tag = "Combos"
)]
pub async fn create_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateComboRequest>,
) -> AppResult<Json<ApiResponse<Combo>>> {
    let resp = combo_service::create_combo(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/catalog/allcombo",
    params(CatalogQuery, Pagination),
    responses((status = 200, description = "Combos", body = ApiResponse<ComboList>)),
    tag = "Combos"
)]
pub async fn list_combos(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ComboList>>> {
    let resp = combo_service::list_combos(&state, query, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/catalog/combo/catlist",
    responses((status = 200, description = "Combo categories", body = ApiResponse<CategoryList>)),
    tag = "Combos"
)]
pub async fn combo_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = combo_service::combo_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menu/catalog/combo/{id}",
    params(("id" = i32, Path, description = "Combo id")),
    responses(
        (status = 200, description = "Combo", body = ApiResponse<Combo>),
        (status = 404, description = "Combo not found")
    ),
    tag = "Combos"
)]
pub async fn get_combo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Combo>>> {
    let resp = combo_service::get_combo(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menu/catalog/combo/{id}",
    params(("id" = i32, Path, description = "Combo id")),
    request_body = ComboUpdate,
    responses((status = 200, description = "Combo updated", body = ApiResponse<Combo>)),
    tag = "Combos"
)]
pub async fn update_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ComboUpdate>,
) -> AppResult<Json<ApiResponse<Combo>>> {
    let resp = combo_service::update_combo(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/menu/catalog/combo/{id}",
    params(("id" = i32, Path, description = "Combo id")),
    responses((status = 200, description = "Combo deleted")),
    tag = "Combos"
)]
pub async fn delete_combo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = combo_service::delete_combo(&state, &user, id).await?;
    Ok(Json(resp))
}
