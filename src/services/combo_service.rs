use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    domain::{combo, validation},
    dto::menu::{CategoryList, ComboList, ComboUpdate, CreateComboRequest},
    entity::{
        menu_catalog::{Column as CatalogCol, Entity as MenuCatalog, Model as CatalogModel},
        menu_combos::{ActiveModel as ComboActive, Column as ComboCol, Entity as MenuCombos, Model as ComboModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Combo, ComboItem, ComboItemDetail},
    response::{ApiResponse, Meta},
    routes::params::{CatalogQuery, Pagination},
    state::AppState,
};

/// Full validation of a combo item list: shape first, then catalog existence.
async fn validate_items(state: &AppState, items: &[ComboItem]) -> AppResult<()> {
    combo::check_combo_items(items)?;

    let requested: Vec<i32> = items.iter().map(|item| item.menu_item_id).collect();
    let existing: HashSet<i32> = MenuCatalog::find()
        .select_only()
        .column(CatalogCol::Id)
        .filter(CatalogCol::Id.is_in(requested.clone()))
        .into_tuple::<i32>()
        .all(&state.orm)
        .await?
        .into_iter()
        .collect();

    combo::ensure_items_exist(&requested, &existing)
}

pub async fn create_combo(
    state: &AppState,
    user: &AuthUser,
    payload: CreateComboRequest,
) -> AppResult<ApiResponse<Combo>> {
    ensure_staff(user)?;
    let name = combo::check_combo_name(&payload.combo_name)?;
    let price = payload
        .combo_default_price
        .ok_or_else(|| AppError::BadRequest("Combo price is required".into()))?;
    let price = validation::positive_price(price)?;
    validate_items(state, &payload.combo_items).await?;

    let model = ComboActive {
        id: NotSet,
        combo_name: Set(name),
        combo_items: Set(serde_json::to_value(&payload.combo_items)?),
        combo_description: Set(payload.combo_description),
        combo_default_price: Set(price),
        combo_category: Set(payload.combo_category),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "combo_create",
        "menu_combos",
        serde_json::json!({ "combo_id": model.id, "items": payload.combo_items.len() }),
    )
    .await;
    tracing::info!(combo_id = model.id, "combo created");

    let combo = resolve_one(state, model).await?;
    Ok(ApiResponse::success("Combo created", combo, Some(Meta::empty())))
}

pub async fn get_combo(state: &AppState, id: i32) -> AppResult<ApiResponse<Combo>> {
    let model = MenuCombos::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Combo"))?;

    let combo = resolve_one(state, model).await?;
    Ok(ApiResponse::success("Ok", combo, Some(Meta::empty())))
}

pub async fn list_combos(
    state: &AppState,
    query: CatalogQuery,
    pagination: Pagination,
) -> AppResult<ApiResponse<ComboList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = MenuCombos::find()
        .filter(combo_condition(&query))
        .order_by_desc(ComboCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = resolve_combos(state, models).await?;
    Ok(ApiResponse::success(
        "Ok",
        ComboList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update_combo(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: ComboUpdate,
) -> AppResult<ApiResponse<Combo>> {
    ensure_staff(user)?;
    let existing = MenuCombos::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Combo"))?;

    let mut active: ComboActive = existing.into();
    if let Some(name) = payload.combo_name {
        active.combo_name = Set(combo::check_combo_name(&name)?);
    }
    if let Some(items) = payload.combo_items {
        validate_items(state, &items).await?;
        active.combo_items = Set(serde_json::to_value(&items)?);
    }
    if let Some(description) = payload.combo_description {
        active.combo_description = Set(Some(description));
    }
    if let Some(price) = payload.combo_default_price {
        active.combo_default_price = Set(validation::positive_price(price)?);
    }
    if let Some(category) = payload.combo_category {
        active.combo_category = Set(Some(category));
    }
    active.updated_at = Set(Utc::now().into());

    let model = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "combo_update",
        "menu_combos",
        serde_json::json!({ "combo_id": model.id }),
    )
    .await;

    let combo = resolve_one(state, model).await?;
    Ok(ApiResponse::success("Combo updated", combo, Some(Meta::empty())))
}

pub async fn delete_combo(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let existing = MenuCombos::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Combo"))?;

    existing.delete(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "combo_delete",
        "menu_combos",
        serde_json::json!({ "combo_id": id }),
    )
    .await;

    Ok(ApiResponse::message_only("Combo deleted successfully"))
}

pub async fn combo_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = MenuCombos::find()
        .select_only()
        .column(ComboCol::ComboCategory)
        .distinct()
        .filter(ComboCol::ComboCategory.is_not_null())
        .order_by_asc(ComboCol::ComboCategory)
        .into_tuple::<Option<String>>()
        .all(&state.orm)
        .await?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", CategoryList { items }, Some(meta)))
}

pub(crate) fn combo_condition(query: &CatalogQuery) -> Condition {
    let mut condition = Condition::all();
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(ComboCol::ComboCategory.eq(category.clone()));
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(ComboCol::ComboName).ilike(format!("%{search}%")));
    }
    condition
}

async fn resolve_one(state: &AppState, model: ComboModel) -> AppResult<Combo> {
    resolve_combos(state, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("combo resolution returned nothing")))
}

/// Attach current catalog names and prices to each combo, one catalog query for the batch.
pub(crate) async fn resolve_combos(
    state: &AppState,
    models: Vec<ComboModel>,
) -> AppResult<Vec<Combo>> {
    let stored: Vec<Vec<ComboItem>> = models
        .iter()
        .map(|m| serde_json::from_value(m.combo_items.clone()))
        .collect::<Result<_, _>>()?;

    let ids: Vec<i32> = stored
        .iter()
        .flatten()
        .map(|item| item.menu_item_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let catalog: HashMap<i32, CatalogModel> = if ids.is_empty() {
        HashMap::new()
    } else {
        MenuCatalog::find()
            .filter(CatalogCol::Id.is_in(ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect()
    };

    Ok(models
        .into_iter()
        .zip(stored)
        .map(|(model, items)| combo_from_entity(model, &items, &catalog))
        .collect())
}

/// Build the API view; components missing from `catalog` are skipped.
pub fn combo_from_entity(
    model: ComboModel,
    items: &[ComboItem],
    catalog: &HashMap<i32, CatalogModel>,
) -> Combo {
    let mut combo_items: Vec<ComboItemDetail> = items
        .iter()
        .filter_map(|item| {
            catalog.get(&item.menu_item_id).map(|entry| ComboItemDetail {
                menu_item_id: item.menu_item_id,
                item_name: entry.item_name.clone(),
                default_price: entry.default_price,
                quantity: item.quantity,
            })
        })
        .collect();
    combo_items.sort_by_key(|item| item.menu_item_id);

    Combo {
        combo_id: model.id,
        combo_name: model.combo_name,
        combo_items,
        combo_description: model.combo_description,
        combo_default_price: model.combo_default_price,
        combo_category: model.combo_category,
        item_count: items.len(),
        is_combo: true,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
