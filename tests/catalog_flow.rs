mod common;

use catering_api::{
    domain::{OrderStatus, PaymentStatus},
    dto::{
        menu::{CreateCatalogItemRequest, CreateComboRequest, CreateScheduledMenuRequest, ScheduledMenuStatusRequest, ScheduledMenuUpdate},
        orders::{CreateOrderRequest, OrderBatchEntry, OrderUpdate},
    },
    error::AppError,
    middleware::auth::{AuthUser, ROLE_CATERER, ROLE_CUSTOMER},
    models::{ComboItem, OrderLine},
    routes::params::{CatalogQuery, Pagination},
    services::{auth_service, catalog_service, combo_service, menu_service, order_service},
    state::AppState,
};
use chrono::{Days, Utc};
use rust_decimal::Decimal;

fn to_anyhow(err: AppError) -> anyhow::Error {
    anyhow::anyhow!(err.to_string())
}

async fn caterer(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let user = auth_service::ensure_account(state, email, "password123", "Kitchen", ROLE_CATERER)
        .await
        .map_err(to_anyhow)?;
    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

fn menu_request(name: &str, days_ahead: u64) -> CreateScheduledMenuRequest {
    CreateScheduledMenuRequest {
        name: name.into(),
        menu_date: Utc::now().date_naive() + Days::new(days_ahead),
        items: Vec::new(),
        active: true,
    }
}

#[tokio::test]
async fn catalog_items_and_combos() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let state = &ctx.state;
    let chef = caterer(&state, "chef@example.com").await?;

    let rice = catalog_service::create_item(
        &state,
        &chef,
        CreateCatalogItemRequest {
            item_name: "Jollof Rice".into(),
            description: None,
            default_price: Decimal::new(850, 2),
            category: Some("Mains".into()),
        },
    )
    .await
    .map_err(to_anyhow)?
    .data
    .expect("item");

    let duplicate = catalog_service::create_item(
        &state,
        &chef,
        CreateCatalogItemRequest {
            item_name: "Jollof Rice".into(),
            description: Some("again".into()),
            default_price: Decimal::new(900, 2),
            category: Some("Mains".into()),
        },
    )
    .await;
    assert!(matches!(
        duplicate,
        Err(AppError::BadRequest(msg)) if msg == "Item with this name already exists in this category"
    ));

    let missing = combo_service::create_combo(
        &state,
        &chef,
        CreateComboRequest {
            combo_name: "Broken Pack".into(),
            combo_items: vec![
                ComboItem { menu_item_id: rice.menu_item_id, quantity: 1 },
                ComboItem { menu_item_id: 7, quantity: 1 },
            ],
            combo_description: None,
            combo_default_price: Some(Decimal::new(1500, 2)),
            combo_category: None,
        },
    )
    .await;
    assert!(matches!(
        missing,
        Err(AppError::BadRequest(msg)) if msg == "Menu items not found: [7]"
    ));

    let combo = combo_service::create_combo(
        &state,
        &chef,
        CreateComboRequest {
            combo_name: "Party Pack".into(),
            combo_items: vec![ComboItem { menu_item_id: rice.menu_item_id, quantity: 3 }],
            combo_description: Some("Feeds three".into()),
            combo_default_price: Some(Decimal::new(2400, 2)),
            combo_category: Some("Platters".into()),
        },
    )
    .await
    .map_err(to_anyhow)?
    .data
    .expect("combo");
    assert_eq!(combo.combo_items.len(), 1);
    assert_eq!(combo.combo_items[0].item_name, "Jollof Rice");
    assert_eq!(combo.combo_items[0].quantity, 3);

    let everything = catalog_service::list_all(&state, CatalogQuery::default(), Pagination::default())
        .await
        .map_err(to_anyhow)?
        .data
        .expect("catalog");
    assert_eq!(everything.items.len(), 2);

    let customer = AuthUser {
        user_id: 0,
        email: "someone@example.com".into(),
        role: ROLE_CUSTOMER.into(),
    };
    let forbidden = catalog_service::delete_item(&state, &customer, rice.menu_item_id).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    Ok(())
}

#[tokio::test]
async fn scheduled_menus_are_named_per_caterer_and_day() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let state = &ctx.state;
    let first = caterer(&state, "first@example.com").await?;
    let second = caterer(&state, "second@example.com").await?;

    let lunch = menu_service::create_scheduled(&state, &first, menu_request("Lunch", 3))
        .await
        .map_err(to_anyhow)?
        .data
        .expect("menu");
    let base = lunch.menu_id.clone();
    assert!(base.starts_with('M'));
    assert_eq!(base.len(), 9);
    assert_eq!(lunch.order_link.as_deref(), Some(format!("/order/{base}").as_str()));

    let dinner = menu_service::create_scheduled(&state, &first, menu_request("Dinner", 3))
        .await
        .map_err(to_anyhow)?
        .data
        .expect("menu");
    assert_eq!(dinner.menu_id, format!("{base}_2"));

    // another caterer on the same day does not collide
    let other = menu_service::create_scheduled(&state, &second, menu_request("Brunch", 3))
        .await
        .map_err(to_anyhow)?
        .data
        .expect("menu");
    assert_ne!(other.menu_id, lunch.menu_id);
    assert_ne!(other.menu_id, dinner.menu_id);

    let past = menu_service::create_scheduled(
        &state,
        &first,
        CreateScheduledMenuRequest {
            menu_date: Utc::now().date_naive() - Days::new(1),
            ..menu_request("Yesterday", 0)
        },
    )
    .await;
    assert!(past.is_err());

    // foreign menus look missing
    let foreign = menu_service::update_scheduled(
        &state,
        &second,
        &lunch.menu_id,
        ScheduledMenuUpdate {
            name: Some("Hijacked".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::NotFound("Scheduled menu"))));

    let deactivated = menu_service::set_scheduled_status(
        &state,
        &first,
        &dinner.menu_id,
        ScheduledMenuStatusRequest { active: false },
    )
    .await
    .map_err(to_anyhow)?
    .data
    .expect("menu");
    assert!(!deactivated.active);

    let repeat = menu_service::set_scheduled_status(
        &state,
        &first,
        &dinner.menu_id,
        ScheduledMenuStatusRequest { active: false },
    )
    .await;
    assert!(matches!(
        repeat,
        Err(AppError::BadRequest(msg)) if msg == "Menu status is already set to this value"
    ));

    // inactive menus refuse orders
    let refused = order_service::create_order(
        &state,
        CreateOrderRequest {
            menu_id: dinner.menu_id.clone(),
            customer_name: "Grace".into(),
            customer_phone: None,
            customer_address: serde_json::json!({}),
            customer_email: None,
            delivery_date: None,
            items: vec![OrderLine {
                catalog_item_id: None,
                item_name: "Suya".into(),
                price: Decimal::new(650, 2),
                quantity: 1,
                is_combo: false,
            }],
            total: Decimal::new(650, 2),
            payment_method: None,
            special_instructions: None,
        },
    )
    .await;
    assert!(matches!(
        refused,
        Err(AppError::BadRequest(msg)) if msg == "Scheduled menu is not accepting orders"
    ));

    Ok(())
}

#[tokio::test]
async fn only_the_owning_caterer_moves_an_order_forward() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let (state, notifier) = (&ctx.state, &ctx.notifier);
    let owner = caterer(&state, "owner@example.com").await?;
    let stranger = caterer(&state, "stranger@example.com").await?;

    let menu = menu_service::create_scheduled(&state, &owner, menu_request("Feast", 5))
        .await
        .map_err(to_anyhow)?
        .data
        .expect("menu");

    let order = order_service::create_order(
        &state,
        CreateOrderRequest {
            menu_id: menu.menu_id.clone(),
            customer_name: "Grace Hopper".into(),
            customer_phone: Some("+1 202 555 0143".into()),
            customer_address: serde_json::json!({ "line1": "2 Navy Yard" }),
            customer_email: Some("grace@example.com".into()),
            delivery_date: None,
            items: vec![OrderLine {
                catalog_item_id: None,
                item_name: "Party Pack".into(),
                price: Decimal::new(2400, 2),
                quantity: 1,
                is_combo: true,
            }],
            total: Decimal::new(2400, 2),
            payment_method: None,
            special_instructions: Some("Ring twice".into()),
        },
    )
    .await
    .map_err(to_anyhow)?
    .data
    .expect("order");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.menu_date, menu.menu_date);

    let denied = order_service::update_order(
        &state,
        &stranger,
        order.order_id,
        OrderUpdate {
            status: Some(OrderStatus::Confirmed),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let skipped = order_service::update_order(
        &state,
        &owner,
        order.order_id,
        OrderUpdate {
            status: Some(OrderStatus::Delivered),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(skipped, Err(AppError::BadRequest(_))));

    let moved = order_service::update_order(
        &state,
        &owner,
        order.order_id,
        OrderUpdate {
            status: Some(OrderStatus::Confirmed),
            ..Default::default()
        },
    )
    .await
    .map_err(to_anyhow)?
    .data
    .expect("update");
    assert_eq!(moved.status, OrderStatus::Confirmed);

    let cancelled = order_service::cancel_order(&state, &owner, order.order_id)
        .await
        .map_err(to_anyhow)?
        .data
        .expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let twice = order_service::cancel_order(&state, &owner, order.order_id).await;
    assert!(matches!(twice, Err(AppError::BadRequest(_))));

    // the customer sees their own order; a different customer does not
    let customer = AuthUser {
        user_id: 0,
        email: "Grace@Example.com".into(),
        role: ROLE_CUSTOMER.into(),
    };
    assert!(order_service::get_order(&state, &customer, order.order_id).await.is_ok());
    let nosy = AuthUser {
        user_id: 0,
        email: "nosy@example.com".into(),
        role: ROLE_CUSTOMER.into(),
    };
    assert!(order_service::get_order(&state, &nosy, order.order_id).await.is_err());

    // background notifications run on spawned tasks
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let emails = notifier.emails.lock().expect("notifier lock");
    assert!(emails.iter().any(|m| m.to == "grace@example.com"));

    Ok(())
}

fn simple_order(menu_id: &str, customer: &str) -> CreateOrderRequest {
    CreateOrderRequest {
        menu_id: menu_id.to_string(),
        customer_name: customer.into(),
        customer_phone: None,
        customer_address: serde_json::json!({ "line1": "3 Mill Lane" }),
        customer_email: None,
        delivery_date: None,
        items: vec![OrderLine {
            catalog_item_id: None,
            item_name: "Suya Platter".into(),
            price: Decimal::new(1800, 2),
            quantity: 1,
            is_combo: false,
        }],
        total: Decimal::new(1800, 2),
        payment_method: None,
        special_instructions: None,
    }
}

#[tokio::test]
async fn batch_update_reports_each_order_separately() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let ctx = common::setup_state(&database_url).await?;
    let state = &ctx.state;
    let owner = caterer(&state, "batch@example.com").await?;

    let menu = menu_service::create_scheduled(&state, &owner, menu_request("Batch Day", 4))
        .await
        .map_err(to_anyhow)?
        .data
        .expect("menu");

    let mut ids = Vec::new();
    for name in ["Alan Turing", "Joan Clarke"] {
        let order = order_service::create_order(&state, simple_order(&menu.menu_id, name))
            .await
            .map_err(to_anyhow)?
            .data
            .expect("order");
        ids.push(order.order_id);
    }

    let results = order_service::update_orders_batch(
        &state,
        &owner,
        vec![
            OrderBatchEntry {
                order_id: ids[0],
                changes: OrderUpdate {
                    status: Some(OrderStatus::Confirmed),
                    payment_status: Some(PaymentStatus::PaidOffline),
                    ..Default::default()
                },
            },
            OrderBatchEntry {
                order_id: ids[1],
                changes: OrderUpdate {
                    status: Some(OrderStatus::Delivered),
                    ..Default::default()
                },
            },
        ],
    )
    .await
    .map_err(to_anyhow)?
    .data
    .expect("results")
    .items;

    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert_eq!(results[0].order_id, ids[0]);
    assert_eq!(results[0].status, Some(OrderStatus::Confirmed));
    assert_eq!(results[0].payment_status, Some(PaymentStatus::PaidOffline));

    assert!(!results[1].success);
    assert_eq!(results[1].order_id, ids[1]);
    assert_eq!(results[1].status, None);
    assert_eq!(
        results[1].message,
        format!(
            "Failed to update order {}: Invalid status transition from pending to delivered",
            ids[1]
        )
    );

    // the failed entry left its order untouched
    let untouched = order_service::get_order(&state, &owner, ids[1])
        .await
        .map_err(to_anyhow)?
        .data
        .expect("order");
    assert_eq!(untouched.status, OrderStatus::Pending);
    assert_eq!(untouched.payment_status, PaymentStatus::Pending);

    let customer = AuthUser {
        user_id: 0,
        email: "alan@example.com".into(),
        role: ROLE_CUSTOMER.into(),
    };
    let denied = order_service::update_orders_batch(&state, &customer, Vec::new()).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let empty = order_service::update_orders_batch(&state, &owner, Vec::new()).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    Ok(())
}
