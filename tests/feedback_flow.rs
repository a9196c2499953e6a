mod common;

use catering_api::{
    dto::{
        inquiries::{CreateInquiryRequest, InquiryStatusUpdate},
        reviews::CreateReviewRequest,
    },
    error::AppError,
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_CUSTOMER},
    routes::params::Pagination,
    services::{inquiry_service, review_service},
};
use chrono::{Days, Utc};

fn admin() -> AuthUser {
    AuthUser {
        user_id: 1,
        email: "admin@example.com".into(),
        role: ROLE_ADMIN.into(),
    }
}

fn review(email: &str, rating: i32) -> CreateReviewRequest {
    CreateReviewRequest {
        name: "Happy Guest".into(),
        email: email.into(),
        rating,
        review_text: "The jollof was the best we have had.".into(),
    }
}

#[tokio::test]
async fn reviews_are_moderated_and_averaged() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let state = &ctx.state;

    let first = review_service::create_review(&state, review("one@example.com", 5))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("review");
    let second = review_service::create_review(&state, review("two@example.com", 4))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("review");
    review_service::create_review(&state, review("three@example.com", 1))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let duplicate = review_service::create_review(&state, review("ONE@example.com", 3)).await;
    assert!(matches!(
        duplicate,
        Err(AppError::BadRequest(msg)) if msg == "A review from this email already exists"
    ));

    let visible = review_service::approved_reviews(&state, Pagination::default())
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("reviews");
    assert!(visible.items.is_empty());

    let customer = AuthUser {
        user_id: 2,
        email: "one@example.com".into(),
        role: ROLE_CUSTOMER.into(),
    };
    let denied = review_service::approve_review(&state, &customer, first.review_id).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    for id in [first.review_id, second.review_id] {
        review_service::approve_review(&state, &admin(), id)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    }

    let stats = review_service::review_stats(&state)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("stats");
    assert_eq!(stats.total_reviews, 3);
    assert_eq!(stats.approved_reviews, 2);
    assert_eq!(stats.pending_reviews, 1);
    assert_eq!(stats.average_rating, 4.5);

    Ok(())
}

#[tokio::test]
async fn inquiries_feed_the_dashboard() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let state = &ctx.state;
    let event_date = (Utc::now().date_naive() + Days::new(30)).to_string();

    let mut ids = Vec::new();
    for (event_type, guests) in [("Wedding", 120), ("wedding", 80), ("corporate", 40)] {
        let inquiry = inquiry_service::create_inquiry(
            &state,
            CreateInquiryRequest {
                name: "Planner".into(),
                email: "planner@example.com".into(),
                phone: "+44 20 7946 0958".into(),
                event_date: event_date.clone(),
                event_type: event_type.into(),
                guest_count: guests,
                message: None,
            },
        )
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("inquiry");
        assert_eq!(inquiry.status, "pending");
        ids.push(inquiry.inquiry_id);
    }

    let tomorrow_only = inquiry_service::create_inquiry(
        &state,
        CreateInquiryRequest {
            name: "Late".into(),
            email: "late@example.com".into(),
            phone: "+44 20 7946 0958".into(),
            event_date: Utc::now().date_naive().to_string(),
            event_type: "birthday".into(),
            guest_count: 10,
            message: None,
        },
    )
    .await;
    assert!(matches!(tomorrow_only, Err(AppError::BadRequest(_))));

    inquiry_service::update_inquiry_status(
        &state,
        &admin(),
        ids[0],
        InquiryStatusUpdate {
            status: "confirmed".into(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let unknown = inquiry_service::update_inquiry_status(
        &state,
        &admin(),
        ids[1],
        InquiryStatusUpdate {
            status: "booked".into(),
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));

    let stats = inquiry_service::inquiry_stats(&state, &admin())
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("stats");
    assert_eq!(stats.total_inquiries, 3);
    assert_eq!(stats.pending_inquiries, 2);
    assert_eq!(stats.confirmed_inquiries, 1);
    assert_eq!(stats.conversion_rate, 33.33);
    let weddings = stats
        .event_types
        .iter()
        .find(|e| e.event_type == "wedding")
        .map(|e| e.count);
    assert_eq!(weddings, Some(2));

    Ok(())
}
