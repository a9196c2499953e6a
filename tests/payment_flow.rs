mod common;

use catering_api::{
    domain::{OrderStatus, PaymentStatus},
    dto::{
        menu::CreateScheduledMenuRequest,
        orders::CreateOrderRequest,
        payments::CreateIntentRequest,
    },
    entity::payments::{Column as PaymentCol, Entity as Payments, Model as PaymentModel},
    error::AppError,
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_CATERER},
    models::{MenuItemSnapshot, OrderLine},
    services::{auth_service, menu_service, order_service, payment_service},
    state::AppState,
};
use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

async fn staff(state: &AppState, email: &str, role: &str) -> anyhow::Result<AuthUser> {
    let user = auth_service::ensure_account(state, email, "password123", "Staff", role)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

async fn stored_payment(state: &AppState, intent_id: &str) -> anyhow::Result<PaymentModel> {
    Payments::find()
        .filter(PaymentCol::PaymentIntentId.eq(intent_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no payment for {intent_id}"))
}

async fn lunch_menu(state: &AppState, caterer: &AuthUser) -> anyhow::Result<String> {
    let menu = menu_service::create_scheduled(
        state,
        caterer,
        CreateScheduledMenuRequest {
            name: "Sunday Lunch".into(),
            menu_date: Utc::now().date_naive() + Days::new(7),
            items: vec![MenuItemSnapshot {
                catalog_item_id: None,
                item_name: "Jollof Rice".into(),
                description: None,
                price: Decimal::new(4599, 2),
                category: Some("Mains".into()),
                is_combo: false,
                combo_items: None,
            }],
            active: true,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("menu");
    Ok(menu.menu_id)
}

async fn place_order(state: &AppState, menu_id: &str, total: Decimal) -> anyhow::Result<i32> {
    let order = order_service::create_order(
        state,
        CreateOrderRequest {
            menu_id: menu_id.to_string(),
            customer_name: "Ada Lovelace".into(),
            customer_phone: Some("+44 20 7946 0958".into()),
            customer_address: serde_json::json!({ "line1": "1 High St", "city": "London" }),
            customer_email: Some("ada@example.com".into()),
            delivery_date: None,
            items: vec![OrderLine {
                catalog_item_id: None,
                item_name: "Jollof Rice".into(),
                price: total,
                quantity: 1,
                is_combo: false,
            }],
            total,
            payment_method: Some("card".into()),
            special_instructions: None,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(order.data.expect("order").order_id)
}

// Intent creation charges the order total in minor units; confirmation
// settles the payment and moves a pending order to confirmed.
#[tokio::test]
async fn stripe_intent_and_confirmation_flow() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let (state, processor) = (&ctx.state, &ctx.processor);

    let caterer = staff(&state, "kitchen@example.com", ROLE_CATERER).await?;
    let admin = staff(&state, "admin@example.com", ROLE_ADMIN).await?;
    let menu_date = Utc::now().date_naive() + Days::new(7);

    let menu = menu_service::create_scheduled(
        &state,
        &caterer,
        CreateScheduledMenuRequest {
            name: "Sunday Lunch".into(),
            menu_date,
            items: vec![MenuItemSnapshot {
                catalog_item_id: None,
                item_name: "Jollof Rice".into(),
                description: None,
                price: Decimal::new(4599, 2),
                category: Some("Mains".into()),
                is_combo: false,
                combo_items: None,
            }],
            active: true,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("menu");

    // successful card payment
    let paid_order = place_order(&state, &menu.menu_id, Decimal::new(4599, 2)).await?;
    let intent = payment_service::create_intent(
        &state,
        CreateIntentRequest {
            order_id: paid_order,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .expect("intent");
    assert!(intent.client_secret.ends_with("_secret"));

    let created = processor.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].amount, 4599);
    assert_eq!(created[0].currency, "gbp");

    processor.respond_with("succeeded", None);
    let confirmed = payment_service::confirm_payment(&state, "pi_fake_1")
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("confirmation");
    assert_eq!(confirmed.status, "succeeded");
    assert_eq!(confirmed.payment_status, PaymentStatus::Completed);

    let order = order_service::get_order(&state, &admin, paid_order)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("order");
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Completed);
    assert_eq!(order.payment_id, Some(intent.payment_id));

    // a settled order cannot be charged twice
    let again = payment_service::create_intent(
        &state,
        CreateIntentRequest {
            order_id: paid_order,
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::BadRequest(msg)) if msg == "Order is already paid"));

    // declined card: payment fails, order is untouched
    let declined_order = place_order(&state, &menu.menu_id, Decimal::new(1250, 2)).await?;
    payment_service::create_intent(
        &state,
        CreateIntentRequest {
            order_id: declined_order,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    processor.respond_with("requires_payment_method", Some("Your card was declined."));
    let failed = payment_service::confirm_payment(&state, "pi_fake_2")
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("confirmation");
    assert_eq!(failed.payment_status, PaymentStatus::Failed);

    let stored = stored_payment(&state, "pi_fake_2").await?;
    assert_eq!(stored.payment_status, "failed");
    assert_eq!(stored.failure_reason.as_deref(), Some("Your card was declined."));

    let order = order_service::get_order(&state, &admin, declined_order)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("order");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    // the per-date report lists both orders
    let report = payment_service::payments_by_menu_date(&state, &admin, menu_date)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("report");
    assert_eq!(report.items.len(), 2);

    // unknown intents are reported as missing
    let missing = payment_service::confirm_payment(&state, "pi_unknown").await;
    assert!(matches!(missing, Err(AppError::NotFound("Payment"))));

    Ok(())
}

// A processor refusal surfaces as a gateway error and writes nothing locally;
// a cancelled intent without an error message still records a failure reason.
#[tokio::test]
async fn processor_refusals_and_cancelled_intents() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let (state, processor) = (&ctx.state, &ctx.processor);

    let caterer = staff(&state, "kitchen@example.com", ROLE_CATERER).await?;
    let admin = staff(&state, "admin@example.com", ROLE_ADMIN).await?;
    let menu_id = lunch_menu(&state, &caterer).await?;

    let refused_order = place_order(&state, &menu_id, Decimal::new(3000, 2)).await?;
    processor.reject_with(Some("Your account cannot currently make live charges."));
    let refused = payment_service::create_intent(
        &state,
        CreateIntentRequest {
            order_id: refused_order,
        },
    )
    .await;
    assert!(matches!(
        refused,
        Err(AppError::Gateway(msg)) if msg == "Your account cannot currently make live charges."
    ));
    assert_eq!(Payments::find().count(&state.orm).await?, 0);

    let order = order_service::get_order(&state, &admin, refused_order)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("order");
    assert_eq!(order.payment_id, None);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    // once the processor accepts again the same order can be charged
    processor.reject_with(None);
    payment_service::create_intent(
        &state,
        CreateIntentRequest {
            order_id: refused_order,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    processor.respond_with("canceled", None);
    let cancelled = payment_service::confirm_payment(&state, "pi_fake_1")
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("confirmation");
    assert_eq!(cancelled.status, "canceled");
    assert_eq!(cancelled.payment_status, PaymentStatus::Failed);

    let stored = stored_payment(&state, "pi_fake_1").await?;
    assert_eq!(stored.payment_status, "failed");
    assert_eq!(stored.failure_reason.as_deref(), Some("Payment failed"));

    let order = order_service::get_order(&state, &admin, refused_order)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .expect("order");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    Ok(())
}
