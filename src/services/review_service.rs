use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    domain::validation,
    dto::reviews::{CreateReviewRequest, ReviewList, ReviewStats},
    entity::customer_reviews::{ActiveModel as ReviewActive, Column as ReviewCol, Entity as CustomerReviews, Model as ReviewModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Review,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Mean of `ratings` rounded to one decimal place, 0 when empty.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let avg = sum as f64 / ratings.len() as f64;
    (avg * 10.0).round() / 10.0
}

pub async fn create_review(
    state: &AppState,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let name = validation::review_name(&payload.name)?;
    let email = validation::normalize_email(&payload.email)?;
    let rating = validation::review_rating(payload.rating)?;
    let text = validation::review_text(&payload.review_text)?;

    let existing = CustomerReviews::find()
        .filter(ReviewCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest(
            "A review from this email already exists".into(),
        ));
    }

    let review = ReviewActive {
        id: NotSet,
        name: Set(name),
        email: Set(email),
        rating: Set(rating),
        review_text: Set(text),
        is_verified: Set(false),
        is_approved: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(review_id = review.id, rating, "review submitted");

    Ok(ApiResponse::success(
        "Review submitted",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

async fn list(
    state: &AppState,
    approved_only: bool,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, limit, offset) = pagination.normalize();
    let mut finder = CustomerReviews::find().order_by_desc(ReviewCol::CreatedAt);
    if approved_only {
        finder = finder.filter(ReviewCol::IsApproved.eq(true));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        ReviewList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn approved_reviews(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    list(state, true, pagination).await
}

pub async fn all_reviews(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    ensure_admin(user)?;
    list(state, false, pagination).await
}

pub async fn approve_review(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Review>> {
    ensure_admin(user)?;
    let existing = CustomerReviews::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Review"))?;

    let mut active: ReviewActive = existing.into();
    active.is_approved = Set(true);
    active.updated_at = Set(Utc::now().into());
    let review = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "review_approve",
        "customer_reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Review approved",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let existing = CustomerReviews::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Review"))?;

    existing.delete(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "review_delete",
        "customer_reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;

    Ok(ApiResponse::message_only("Review deleted successfully"))
}

pub async fn review_stats(state: &AppState) -> AppResult<ApiResponse<ReviewStats>> {
    let total_reviews = CustomerReviews::find().count(&state.orm).await?;
    let approved: Vec<i32> = CustomerReviews::find()
        .select_only()
        .column(ReviewCol::Rating)
        .filter(ReviewCol::IsApproved.eq(true))
        .into_tuple::<i32>()
        .all(&state.orm)
        .await?;
    let approved_reviews = approved.len() as u64;

    Ok(ApiResponse::success(
        "Ok",
        ReviewStats {
            total_reviews,
            approved_reviews,
            pending_reviews: total_reviews.saturating_sub(approved_reviews),
            average_rating: average_rating(&approved),
        },
        Some(Meta::empty()),
    ))
}

pub fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        review_id: model.id,
        name: model.name,
        rating: model.rating,
        review_text: model.review_text,
        is_verified: model.is_verified,
        is_approved: model.is_approved,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
