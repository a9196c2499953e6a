use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    domain::validation,
    dto::inquiries::{
        CreateInquiryRequest, EventTypeCount, InquiryList, InquiryStats, InquiryStatusUpdate,
    },
    entity::catering_inquiries::{
        ActiveModel as InquiryActive, Column as InquiryCol, Entity as CateringInquiries,
        Model as InquiryModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Inquiry,
    notify::{EmailMessage, dispatch_email},
    response::{ApiResponse, Meta},
    routes::params::{InquiryQuery, Pagination},
    state::AppState,
};

/// Percentage of inquiries that were confirmed, two decimal places.
pub fn conversion_rate(confirmed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = confirmed as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

pub async fn create_inquiry(
    state: &AppState,
    payload: CreateInquiryRequest,
) -> AppResult<ApiResponse<Inquiry>> {
    let name = validation::non_empty(&payload.name, "Name")?;
    let email = validation::normalize_email(&payload.email)?;
    let phone = validation::phone_number(&payload.phone)?;
    let event_date = validation::event_date(&payload.event_date, Utc::now().date_naive())?;
    let event_type = validation::event_type(&payload.event_type)?;
    let guest_count = validation::guest_count(payload.guest_count)?;

    let inquiry = InquiryActive {
        id: NotSet,
        name: Set(name),
        email: Set(email),
        phone: Set(phone),
        event_date: Set(event_date.into()),
        event_type: Set(event_type),
        guest_count: Set(guest_count),
        message: Set(payload.message),
        status: Set("pending".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let inquiry = inquiry_from_entity(inquiry);
    dispatch_email(
        state.notifier.clone(),
        EmailMessage::new(
            inquiry.email.clone(),
            "We received your catering inquiry",
            format!(
                "<p>Hi {},</p><p>Thanks for asking about your {} event on {} for {} guests. \
                 We will be in touch shortly.</p>",
                inquiry.name,
                inquiry.event_type,
                inquiry.event_date.format("%Y-%m-%d"),
                inquiry.guest_count
            ),
        ),
    );
    tracing::info!(inquiry_id = inquiry.inquiry_id, event_type = %inquiry.event_type, "inquiry received");

    Ok(ApiResponse::success(
        "Inquiry submitted",
        inquiry,
        Some(Meta::empty()),
    ))
}

pub async fn list_inquiries(
    state: &AppState,
    user: &AuthUser,
    query: InquiryQuery,
    pagination: Pagination,
) -> AppResult<ApiResponse<InquiryList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let mut finder = CateringInquiries::find().order_by_desc(InquiryCol::CreatedAt);
    if let Some(status) = query.status_filter.as_ref().filter(|s| !s.is_empty()) {
        finder = finder.filter(InquiryCol::Status.eq(status.clone()));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(inquiry_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        InquiryList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

async fn find(state: &AppState, id: i32) -> AppResult<InquiryModel> {
    CateringInquiries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Inquiry"))
}

pub async fn get_inquiry(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Inquiry>> {
    ensure_admin(user)?;
    let inquiry = find(state, id).await?;
    Ok(ApiResponse::success(
        "Ok",
        inquiry_from_entity(inquiry),
        Some(Meta::empty()),
    ))
}

pub async fn update_inquiry_status(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: InquiryStatusUpdate,
) -> AppResult<ApiResponse<Inquiry>> {
    ensure_admin(user)?;
    let status = validation::inquiry_status(&payload.status)?;
    let existing = find(state, id).await?;

    let mut active: InquiryActive = existing.into();
    active.status = Set(status.clone());
    active.updated_at = Set(Utc::now().into());
    let inquiry = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "inquiry_status_update",
        "catering_inquiries",
        serde_json::json!({ "inquiry_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Inquiry status updated",
        inquiry_from_entity(inquiry),
        Some(Meta::empty()),
    ))
}

pub async fn delete_inquiry(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let existing = find(state, id).await?;
    existing.delete(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "inquiry_delete",
        "catering_inquiries",
        serde_json::json!({ "inquiry_id": id }),
    )
    .await;

    Ok(ApiResponse::message_only("Inquiry deleted successfully"))
}

pub async fn inquiry_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<InquiryStats>> {
    ensure_admin(user)?;

    let total_inquiries = CateringInquiries::find().count(&state.orm).await?;
    let pending_inquiries = CateringInquiries::find()
        .filter(InquiryCol::Status.eq("pending"))
        .count(&state.orm)
        .await?;
    let confirmed_inquiries = CateringInquiries::find()
        .filter(InquiryCol::Status.eq("confirmed"))
        .count(&state.orm)
        .await?;

    let event_types = CateringInquiries::find()
        .select_only()
        .column(InquiryCol::EventType)
        .column_as(Expr::col(InquiryCol::Id).count(), "count")
        .group_by(InquiryCol::EventType)
        .order_by_asc(InquiryCol::EventType)
        .into_tuple::<(String, i64)>()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(event_type, count)| EventTypeCount { event_type, count })
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        InquiryStats {
            total_inquiries,
            pending_inquiries,
            confirmed_inquiries,
            conversion_rate: conversion_rate(confirmed_inquiries, total_inquiries),
            event_types,
        },
        Some(Meta::empty()),
    ))
}

pub fn inquiry_from_entity(model: InquiryModel) -> Inquiry {
    Inquiry {
        inquiry_id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        event_date: model.event_date.with_timezone(&Utc),
        event_type: model.event_type,
        guest_count: model.guest_count,
        message: model.message,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
