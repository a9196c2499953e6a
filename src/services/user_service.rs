use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};

use crate::{
    audit,
    domain::validation,
    dto::users::{UserList, UserStatusUpdate, UserUpdate},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let found = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(ApiResponse::success(
        "Ok",
        user_from_entity(found),
        Some(Meta::empty()),
    ))
}

pub async fn update_me(
    state: &AppState,
    user: &AuthUser,
    payload: UserUpdate,
) -> AppResult<ApiResponse<User>> {
    let existing = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let mut active: UserActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validation::non_empty(&name, "Name")?);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(specialties) = payload.specialties {
        active.specialties = Set(Some(specialties));
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(Some(bio));
    }

    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "user_update_profile",
        "users",
        serde_json::json!({ "user_id": user.user_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile updated",
        user_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn list_users(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find().order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_user(state: &AppState, id: i32) -> AppResult<ApiResponse<User>> {
    let found = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(ApiResponse::success(
        "Ok",
        user_from_entity(found),
        Some(Meta::empty()),
    ))
}

pub async fn update_user_status(
    state: &AppState,
    admin: &AuthUser,
    id: i32,
    payload: UserStatusUpdate,
) -> AppResult<ApiResponse<User>> {
    let status = validation::user_status(&payload.status)?;
    let existing = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let mut active: UserActive = existing.into();
    active.status = Set(status.clone());
    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(admin.user_id),
        "user_status_update",
        "users",
        serde_json::json!({ "user_id": id, "status": status, "at": Utc::now() }),
    )
    .await;
    tracing::info!(user_id = id, %status, "user status changed");

    Ok(ApiResponse::success(
        "User status updated",
        user_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        role: model.role,
        status: model.status,
        phone: model.phone,
        address: model.address,
        specialties: model.specialties,
        bio: model.bio,
        email_confirmed: model.email_confirmed,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
