use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    domain::{menu_id, validation},
    dto::menu::{
        CreateScheduledMenuRequest, ScheduledMenuList, ScheduledMenuStatusRequest,
        ScheduledMenuUpdate,
    },
    entity::scheduled_menus::{
        ActiveModel as MenuActive, Column as MenuCol, Entity as ScheduledMenus, Model as MenuModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_caterer},
    models::{MenuItemSnapshot, ScheduledMenu},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, ScheduledMenuQuery},
    state::AppState,
};

pub async fn list_scheduled(
    state: &AppState,
    active: bool,
    query: ScheduledMenuQuery,
    pagination: Pagination,
) -> AppResult<ApiResponse<ScheduledMenuList>> {
    let (page, limit, offset) = pagination.normalize();

    let mut condition = Condition::all().add(MenuCol::Active.eq(active));
    if let Some(date) = query.date_filter {
        condition = condition.add(MenuCol::MenuDate.eq(date));
    }
    if let Some(caterer_id) = query.caterer_id {
        condition = condition.add(MenuCol::CatererId.eq(caterer_id));
    }

    let finder = ScheduledMenus::find()
        .filter(condition)
        .order_by_desc(MenuCol::MenuDate)
        .order_by_desc(MenuCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(scheduled_menu_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Ok",
        ScheduledMenuList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn list_my_menus(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ScheduledMenuList>> {
    ensure_caterer(user)?;

    let items = ScheduledMenus::find()
        .filter(MenuCol::CatererId.eq(user.user_id))
        .order_by_desc(MenuCol::MenuDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(scheduled_menu_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", ScheduledMenuList { items }, Some(meta)))
}

pub async fn get_scheduled(state: &AppState, id: &str) -> AppResult<ApiResponse<ScheduledMenu>> {
    let menu = ScheduledMenus::find_by_id(id.to_string())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Scheduled menu"))?;

    Ok(ApiResponse::success(
        "Ok",
        scheduled_menu_from_entity(menu)?,
        Some(Meta::empty()),
    ))
}

/// Pick the next free menu id for `caterer_id` on `menu_date`.
async fn next_menu_id(
    state: &AppState,
    caterer_id: i32,
    menu_date: chrono::NaiveDate,
) -> AppResult<String> {
    let base = menu_id::base_menu_id(menu_date);
    let mut existing = ScheduledMenus::find()
        .filter(MenuCol::CatererId.eq(caterer_id))
        .filter(MenuCol::Id.like(format!("{base}%")))
        .count(&state.orm)
        .await?;

    // another caterer may already hold the candidate
    loop {
        let candidate = menu_id::menu_id_for(menu_date, existing);
        let taken = ScheduledMenus::find_by_id(candidate.clone())
            .one(&state.orm)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        existing += 1;
    }
}

pub async fn create_scheduled(
    state: &AppState,
    user: &AuthUser,
    payload: CreateScheduledMenuRequest,
) -> AppResult<ApiResponse<ScheduledMenu>> {
    ensure_caterer(user)?;
    let name = validation::non_empty(&payload.name, "Menu name")?;
    validation::menu_date_not_past(payload.menu_date, Utc::now().date_naive())?;

    let id = next_menu_id(state, user.user_id, payload.menu_date).await?;
    let items = serde_json::to_value(&payload.items)?;

    let menu = MenuActive {
        id: Set(id.clone()),
        caterer_id: Set(user.user_id),
        name: Set(name),
        order_link: Set(Some(menu_id::order_link(&id))),
        items: Set(items),
        menu_date: Set(payload.menu_date),
        active: Set(payload.active),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "scheduled_menu_create",
        "scheduled_menus",
        serde_json::json!({ "menu_id": menu.id, "menu_date": menu.menu_date }),
    )
    .await;
    tracing::info!(menu_id = %menu.id, caterer_id = user.user_id, "scheduled menu created");

    Ok(ApiResponse::success(
        "Scheduled menu created",
        scheduled_menu_from_entity(menu)?,
        Some(Meta::empty()),
    ))
}

/// Menus owned by someone else are reported as missing.
async fn find_owned(state: &AppState, user: &AuthUser, id: &str) -> AppResult<MenuModel> {
    ensure_caterer(user)?;
    ScheduledMenus::find_by_id(id.to_string())
        .filter(MenuCol::CatererId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Scheduled menu"))
}

pub async fn update_scheduled(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: ScheduledMenuUpdate,
) -> AppResult<ApiResponse<ScheduledMenu>> {
    let existing = find_owned(state, user, id).await?;
    let mut active: MenuActive = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(validation::non_empty(&name, "Menu name")?);
    }
    if let Some(items) = payload.items {
        active.items = Set(serde_json::to_value(&items)?);
    }
    if let Some(menu_date) = payload.menu_date {
        validation::menu_date_not_past(menu_date, Utc::now().date_naive())?;
        active.menu_date = Set(menu_date);
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }

    let menu = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "scheduled_menu_update",
        "scheduled_menus",
        serde_json::json!({ "menu_id": menu.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Scheduled menu updated",
        scheduled_menu_from_entity(menu)?,
        Some(Meta::empty()),
    ))
}

pub async fn set_scheduled_status(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: ScheduledMenuStatusRequest,
) -> AppResult<ApiResponse<ScheduledMenu>> {
    let existing = find_owned(state, user, id).await?;
    if existing.active == payload.active {
        return Err(AppError::BadRequest(
            "Menu status is already set to this value".into(),
        ));
    }

    let mut active: MenuActive = existing.into();
    active.active = Set(payload.active);
    let menu = active.update(&state.orm).await?;

    tracing::info!(menu_id = %menu.id, active = menu.active, "scheduled menu status changed");

    Ok(ApiResponse::success(
        "Scheduled menu status updated",
        scheduled_menu_from_entity(menu)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_scheduled(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_owned(state, user, id).await?;

    let mut active: MenuActive = existing.into();
    active.active = Set(false);
    let menu = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "scheduled_menu_delete",
        "scheduled_menus",
        serde_json::json!({ "menu_id": menu.id }),
    )
    .await;

    Ok(ApiResponse::message_only(
        "Scheduled menu deleted successfully",
    ))
}

pub fn scheduled_menu_from_entity(model: MenuModel) -> AppResult<ScheduledMenu> {
    let items: Vec<MenuItemSnapshot> = serde_json::from_value(model.items)?;
    Ok(ScheduledMenu {
        menu_id: model.id,
        caterer_id: model.caterer_id,
        name: model.name,
        order_link: model.order_link,
        items,
        menu_date: model.menu_date,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
