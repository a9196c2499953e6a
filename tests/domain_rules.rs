use std::collections::{HashMap, HashSet};

use catering_api::{
    domain::{
        OrderStatus, PaymentStatus,
        combo::{check_combo_items, check_combo_name, ensure_items_exist},
        menu_id::{base_menu_id, menu_id_for, order_link},
        money::to_minor_units,
        reconcile::{DEFAULT_FAILURE_REASON, Reconciliation, reconcile},
        validation,
    },
    dto::orders::{OrderBatchEntry, OrderUpdate},
    entity::{menu_catalog, menu_combos},
    error::AppError,
    models::{ComboItem, PaymentOrderRow, PaymentWithOrder},
    notify::{EmailAttachment, EmailMessage},
    processor::PaymentIntent,
    services::{combo_service::combo_from_entity, inquiry_service::conversion_rate, review_service::average_rating},
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn bad_request_message(err: AppError) -> String {
    match err {
        AppError::BadRequest(msg) => msg,
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

fn intent(status: &str, last_error: Option<&str>) -> PaymentIntent {
    PaymentIntent {
        id: "pi_test".into(),
        client_secret: Some("pi_test_secret".into()),
        status: status.into(),
        amount: 4599,
        currency: "gbp".into(),
        last_error: last_error.map(str::to_string),
        raw: serde_json::json!({ "id": "pi_test", "status": status }),
    }
}

#[test]
fn order_status_moves_one_step_forward() {
    assert_eq!(
        OrderStatus::Pending.transition(OrderStatus::Confirmed).ok(),
        Some(OrderStatus::Confirmed)
    );
    assert_eq!(
        OrderStatus::ReadyForDelivery
            .transition(OrderStatus::Delivered)
            .ok(),
        Some(OrderStatus::Delivered)
    );
}

#[test]
fn order_status_rejects_skips_and_backward_moves() {
    let err = OrderStatus::Pending
        .transition(OrderStatus::Delivered)
        .expect_err("skip should fail");
    assert_eq!(
        bad_request_message(err),
        "Invalid status transition from pending to delivered"
    );
    assert!(OrderStatus::Preparing.transition(OrderStatus::Confirmed).is_err());
    assert!(OrderStatus::Confirmed.transition(OrderStatus::Confirmed).is_err());
    assert!(OrderStatus::Delivered.successor().is_none());
}

#[test]
fn cancelled_is_only_reachable_through_cancel() {
    assert!(OrderStatus::Pending.transition(OrderStatus::Cancelled).is_err());
    assert_eq!(OrderStatus::Preparing.cancel().ok(), Some(OrderStatus::Cancelled));

    let err = OrderStatus::Delivered.cancel().expect_err("delivered is final");
    assert_eq!(bad_request_message(err), "Cannot cancel this order");
    assert!(OrderStatus::Cancelled.cancel().is_err());
}

#[test]
fn order_status_parses_legacy_spellings() {
    assert_eq!(
        "Ready for delivery".parse::<OrderStatus>().ok(),
        Some(OrderStatus::ReadyForDelivery)
    );
    assert!("shipped".parse::<OrderStatus>().is_err());
}

#[test]
fn order_update_bodies_accept_the_same_spellings_as_stored_rows() {
    let update: OrderUpdate =
        serde_json::from_str(r#"{"status": "ready for delivery", "payment_status": "Paid Offline"}"#)
            .expect("legacy spellings");
    assert_eq!(update.status, Some(OrderStatus::ReadyForDelivery));
    assert_eq!(update.payment_status, Some(PaymentStatus::PaidOffline));

    let update: OrderUpdate = serde_json::from_str(r#"{"status": "ready_for_delivery"}"#)
        .expect("canonical spelling");
    assert_eq!(update.status, Some(OrderStatus::ReadyForDelivery));

    let err = serde_json::from_str::<OrderUpdate>(r#"{"status": "shipped"}"#)
        .expect_err("unknown status");
    assert!(err.to_string().contains("Invalid order status: shipped"));

    // statuses still serialize in snake_case
    assert_eq!(
        serde_json::to_value(OrderStatus::ReadyForDelivery).expect("serialize"),
        serde_json::json!("ready_for_delivery")
    );
}

#[test]
fn batch_entries_carry_order_update_fields() {
    let entries: Vec<OrderBatchEntry> = serde_json::from_str(
        r#"[{"order_id": 4, "status": "confirmed"}, {"order_id": 9, "payment_status": "completed"}]"#,
    )
    .expect("batch body");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].order_id, 4);
    assert_eq!(entries[0].changes.status, Some(OrderStatus::Confirmed));
    assert_eq!(entries[1].changes.status, None);
    assert_eq!(entries[1].changes.payment_status, Some(PaymentStatus::Completed));
}

#[test]
fn undecodable_attachments_are_client_errors() {
    let mut message = EmailMessage::new("ops@example.com", "Invoice", "<p>Attached</p>");
    message.attachments.push(EmailAttachment {
        filename: "invoice.pdf".into(),
        content: "aGVsbG8=".into(),
        content_type: "application/pdf".into(),
    });
    let decoded = message.decoded_attachments().expect("valid base64");
    assert_eq!(decoded, vec![("invoice.pdf".to_string(), b"hello".to_vec())]);

    message.attachments.push(EmailAttachment {
        filename: "menu.pdf".into(),
        content: "not base64!".into(),
        content_type: "application/pdf".into(),
    });
    let err: AppError = message.decoded_attachments().expect_err("bad attachment").into();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "attachment menu.pdf is not valid base64"));
}

#[test]
fn settled_payment_statuses() {
    assert!(PaymentStatus::Completed.is_settled());
    assert!(PaymentStatus::PaidOffline.is_settled());
    assert!(!PaymentStatus::Pending.is_settled());
    assert!(!PaymentStatus::Failed.is_settled());
}

#[test]
fn combo_items_must_be_unique_and_positive() {
    let dup = vec![
        ComboItem { menu_item_id: 1, quantity: 1 },
        ComboItem { menu_item_id: 1, quantity: 2 },
    ];
    assert_eq!(
        bad_request_message(check_combo_items(&dup).expect_err("duplicate")),
        "Combo cannot contain duplicate items"
    );

    let zero = vec![ComboItem { menu_item_id: 4, quantity: 0 }];
    assert_eq!(
        bad_request_message(check_combo_items(&zero).expect_err("zero quantity")),
        "Quantity for menu item 4 must be greater than 0"
    );

    assert!(check_combo_items(&[]).is_err());
    assert!(check_combo_name("   ").is_err());
    assert!(check_combo_name(&"x".repeat(101)).is_err());
}

#[test]
fn missing_combo_items_are_listed() {
    let existing: HashSet<i32> = [1001, 1002].into_iter().collect();
    assert!(ensure_items_exist(&[1001, 1002], &existing).is_ok());

    let err = ensure_items_exist(&[1001, 7], &existing).expect_err("7 is missing");
    assert_eq!(bad_request_message(err), "Menu items not found: [7]");
}

#[test]
fn combo_view_skips_items_no_longer_in_catalog() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("time");
    let model = menu_combos::Model {
        id: 2001,
        combo_name: "Party Pack".into(),
        combo_items: serde_json::json!([]),
        combo_description: None,
        combo_default_price: Decimal::new(2500, 2),
        combo_category: Some("Platters".into()),
        created_at: now.into(),
        updated_at: now.into(),
    };
    let catalog: HashMap<i32, menu_catalog::Model> = [(
        1002,
        menu_catalog::Model {
            id: 1002,
            item_name: "Fried Plantain".into(),
            description: None,
            default_price: Decimal::new(350, 2),
            category: Some("Sides".into()),
            created_at: now.into(),
            updated_at: now.into(),
        },
    )]
    .into_iter()
    .collect();
    let items = [
        ComboItem { menu_item_id: 1002, quantity: 2 },
        ComboItem { menu_item_id: 1099, quantity: 1 },
    ];

    let combo = combo_from_entity(model, &items, &catalog);
    assert_eq!(combo.combo_items.len(), 1);
    assert_eq!(combo.combo_items[0].item_name, "Fried Plantain");
    assert_eq!(combo.item_count, 2);
    assert!(combo.is_combo);
}

#[test]
fn menu_ids_follow_date_and_position() {
    let day = date(2025, 6, 15);
    assert_eq!(base_menu_id(day), "M20250615");
    assert_eq!(menu_id_for(day, 0), "M20250615");
    assert_eq!(menu_id_for(day, 1), "M20250615_2");
    assert_eq!(menu_id_for(day, 2), "M20250615_3");
    assert_eq!(order_link("M20250615_2"), "/order/M20250615_2");
}

#[test]
fn amounts_convert_to_minor_units() {
    assert_eq!(to_minor_units(Decimal::new(4599, 2)).ok(), Some(4599));
    assert_eq!(to_minor_units(Decimal::new(10, 0)).ok(), Some(1000));
    assert_eq!(to_minor_units(Decimal::new(10005, 3)).ok(), Some(1001));
    assert!(to_minor_units(Decimal::new(-1, 0)).is_err());
}

#[test]
fn processor_outcomes_map_to_payment_changes() {
    assert_eq!(reconcile(&intent("succeeded", None)), Reconciliation::Completed);
    assert_eq!(
        reconcile(&intent("payment_failed", Some("Your card was declined."))),
        Reconciliation::Failed {
            reason: "Your card was declined.".into()
        }
    );
    assert_eq!(
        reconcile(&intent("canceled", None)),
        Reconciliation::Failed {
            reason: DEFAULT_FAILURE_REASON.into()
        }
    );
    assert_eq!(
        reconcile(&intent("requires_payment_method", Some("Insufficient funds"))),
        Reconciliation::Failed {
            reason: "Insufficient funds".into()
        }
    );
    assert_eq!(
        reconcile(&intent("requires_payment_method", None)),
        Reconciliation::Unchanged
    );
    assert_eq!(reconcile(&intent("processing", None)), Reconciliation::Unchanged);
}

#[test]
fn unpaid_orders_report_their_total_as_amount() {
    let row = PaymentOrderRow {
        payment_id: None,
        amount: None,
        currency: None,
        processed_at: None,
        created_at: None,
        payment_method: None,
        payment_status: "pending".into(),
        order_id: 12,
        customer_name: "Ada".into(),
        customer_phone: None,
        customer_address: serde_json::json!({ "line1": "1 High St" }),
        menu_date: date(2025, 6, 15),
        total: Decimal::new(4599, 2),
    };

    let view = PaymentWithOrder::from(row);
    assert_eq!(view.amount, Decimal::new(4599, 2));
    assert_eq!(view.currency, "GBP");
    assert!(view.payment_id.is_none());
    assert!(view.processed_at.is_none());
}

#[test]
fn review_average_is_rounded_to_one_place() {
    assert_eq!(average_rating(&[]), 0.0);
    assert_eq!(average_rating(&[5, 4, 4]), 4.3);
    assert_eq!(average_rating(&[3]), 3.0);
}

#[test]
fn conversion_rate_is_a_percentage() {
    assert_eq!(conversion_rate(0, 0), 0.0);
    assert_eq!(conversion_rate(1, 3), 33.33);
    assert_eq!(conversion_rate(2, 2), 100.0);
}

#[test]
fn input_validation_rules() {
    assert_eq!(
        validation::normalize_email("  Ada@Example.COM ").ok().as_deref(),
        Some("ada@example.com")
    );
    assert!(validation::normalize_email("ada@example").is_err());
    assert!(validation::normalize_email("@example.com").is_err());

    assert!(validation::registration_password("short").is_err());
    assert!(validation::registration_role("admin").is_err());
    assert_eq!(
        validation::registration_role("Caterer").ok().as_deref(),
        Some("caterer")
    );

    assert!(validation::review_rating(0).is_err());
    assert!(validation::review_rating(6).is_err());
    assert!(validation::review_text("too short").is_err());

    assert!(validation::phone_number("555-1234").is_err());
    assert!(validation::phone_number("+44 20 7946 0958").is_ok());

    let today = date(2025, 6, 1);
    assert!(validation::event_date("2025-06-01", today).is_err());
    assert!(validation::event_date("2025-06-02", today).is_ok());
    assert!(validation::event_date("2025-07-01T18:00:00Z", today).is_ok());
    assert!(validation::event_date("next week", today).is_err());
    assert!(validation::menu_date_not_past(date(2025, 5, 31), today).is_err());

    assert_eq!(validation::event_type("Wedding").ok().as_deref(), Some("wedding"));
    assert!(validation::event_type("rave").is_err());
    assert!(validation::positive_price(Decimal::ZERO).is_err());
    assert_eq!(
        validation::positive_price(Decimal::new(12345, 3)).ok(),
        Some(Decimal::new(1235, 2))
    );
}
