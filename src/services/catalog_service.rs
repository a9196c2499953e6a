use chrono::Utc;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    domain::validation,
    dto::menu::{
        CatalogEntryList, CatalogItemList, CatalogItemUpdate, CategoryList,
        CreateCatalogItemRequest,
    },
    entity::{
        menu_catalog::{ActiveModel as CatalogActive, Column as CatalogCol, Entity as MenuCatalog, Model as CatalogModel},
        menu_combos::{Column as ComboCol, Entity as MenuCombos},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{CatalogEntry, CatalogItem},
    response::{ApiResponse, Meta},
    routes::params::{CatalogQuery, Pagination},
    services::combo_service,
    state::AppState,
};

fn item_condition(query: &CatalogQuery, include_description: bool) -> Condition {
    let mut condition = Condition::all();
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(CatalogCol::Category.eq(category.clone()));
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        let mut any = Condition::any().add(Expr::col(CatalogCol::ItemName).ilike(pattern.clone()));
        if include_description {
            any = any.add(Expr::col(CatalogCol::Description).ilike(pattern));
        }
        condition = condition.add(any);
    }
    condition
}

pub async fn list_items(
    state: &AppState,
    query: CatalogQuery,
    pagination: Pagination,
) -> AppResult<ApiResponse<CatalogItemList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = MenuCatalog::find()
        .filter(item_condition(&query, true))
        .order_by_asc(CatalogCol::Category)
        .order_by_asc(CatalogCol::ItemName);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(catalog_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        CatalogItemList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCatalogItemRequest,
) -> AppResult<ApiResponse<CatalogItem>> {
    ensure_staff(user)?;
    let name = validation::non_empty(&payload.item_name, "Item name")?;
    let price = validation::positive_price(payload.default_price)?;

    let mut duplicate = MenuCatalog::find().filter(CatalogCol::ItemName.eq(name.as_str()));
    duplicate = match payload.category.as_deref() {
        Some(category) => duplicate.filter(CatalogCol::Category.eq(category)),
        None => duplicate.filter(CatalogCol::Category.is_null()),
    };
    if duplicate.one(&state.orm).await?.is_some() {
        return Err(AppError::BadRequest(
            "Item with this name already exists in this category".into(),
        ));
    }

    let model = CatalogActive {
        id: NotSet,
        item_name: Set(name),
        description: Set(payload.description),
        default_price: Set(price),
        category: Set(payload.category),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "catalog_item_create",
        "menu_catalog",
        serde_json::json!({ "menu_item_id": model.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item created",
        catalog_item_from_entity(model),
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: CatalogItemUpdate,
) -> AppResult<ApiResponse<CatalogItem>> {
    ensure_staff(user)?;
    let existing = MenuCatalog::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Menu catalog item"))?;

    let mut active: CatalogActive = existing.into();
    if let Some(name) = payload.item_name {
        active.item_name = Set(validation::non_empty(&name, "Item name")?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.default_price {
        active.default_price = Set(validation::positive_price(price)?);
    }
    if let Some(category) = payload.category {
        active.category = Set(Some(category));
    }
    active.updated_at = Set(Utc::now().into());

    let model = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "catalog_item_update",
        "menu_catalog",
        serde_json::json!({ "menu_item_id": model.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item updated",
        catalog_item_from_entity(model),
        Some(Meta::empty()),
    ))
}

pub async fn delete_item(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let existing = MenuCatalog::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Menu catalog item"))?;

    existing.delete(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "catalog_item_delete",
        "menu_catalog",
        serde_json::json!({ "menu_item_id": id }),
    )
    .await;

    Ok(ApiResponse::message_only(
        "Menu catalog item deleted successfully",
    ))
}

pub async fn item_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = MenuCatalog::find()
        .select_only()
        .column(CatalogCol::Category)
        .distinct()
        .filter(CatalogCol::Category.is_not_null())
        .order_by_asc(CatalogCol::Category)
        .into_tuple::<Option<String>>()
        .all(&state.orm)
        .await?
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", CategoryList { items }, Some(meta)))
}

/// Plain items and combos in one listing, newest first.
pub async fn list_all(
    state: &AppState,
    query: CatalogQuery,
    pagination: Pagination,
) -> AppResult<ApiResponse<CatalogEntryList>> {
    let (page, limit, offset) = pagination.normalize();

    let items = MenuCatalog::find()
        .filter(item_condition(&query, false))
        .order_by_desc(CatalogCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let combos = MenuCombos::find()
        .filter(combo_service::combo_condition(&query))
        .order_by_desc(ComboCol::CreatedAt)
        .all(&state.orm)
        .await?;
    let combos = combo_service::resolve_combos(state, combos).await?;

    let mut entries: Vec<CatalogEntry> = items
        .into_iter()
        .map(|m| CatalogEntry::Item(catalog_item_from_entity(m)))
        .chain(combos.into_iter().map(CatalogEntry::Combo))
        .collect();
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.created_at()));

    let total = entries.len() as i64;
    let items = entries
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        CatalogEntryList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub fn catalog_item_from_entity(model: CatalogModel) -> CatalogItem {
    CatalogItem {
        menu_item_id: model.id,
        item_name: model.item_name,
        description: model.description,
        default_price: model.default_price,
        category: model.category,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
