use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    domain::{
        OrderStatus, PaymentStatus, money,
        reconcile::{Reconciliation, reconcile},
    },
    dto::payments::{
        ConfirmPaymentResponse, CreateIntentRequest, CreateIntentResponse, CreatePaymentRequest,
        PaymentList, PaymentReport,
    },
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments, Model as PaymentModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{DEFAULT_CURRENCY, Payment, PaymentOrderRow, PaymentWithOrder},
    processor::{CreateIntent, STRIPE_GATEWAY},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const CARD_METHODS: [&str; 4] = ["credit_card", "debit_card", "card", "stripe"];

pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    ensure_staff(user)?;
    let method = payload.payment_method.trim().to_lowercase();
    if method.is_empty() {
        return Err(AppError::BadRequest("Payment method is required".into()));
    }
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Amount must be greater than 0".into()));
    }
    let currency = payload
        .currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| c.len() == 3)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let gateway = CARD_METHODS
        .contains(&method.as_str())
        .then(|| STRIPE_GATEWAY.to_string());

    let txn = state.orm.begin().await?;

    let payment = PaymentActive {
        id: NotSet,
        payment_method: Set(method),
        payment_status: Set(PaymentStatus::Pending.as_str().into()),
        amount: Set(money::round_price(payload.amount)),
        currency: Set(currency),
        payment_intent_id: Set(None),
        transaction_id: Set(None),
        payment_gateway: Set(gateway),
        gateway_response: Set(None),
        failure_reason: Set(None),
        processed_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    if let Some(order_id) = payload.order_id {
        let linked = Orders::update_many()
            .col_expr(OrderCol::PaymentId, Expr::value(payment.id))
            .col_expr(OrderCol::UpdatedAt, Expr::value(Utc::now()))
            .filter(OrderCol::Id.eq(order_id))
            .exec(&txn)
            .await?;
        if linked.rows_affected == 0 {
            return Err(AppError::NotFound("Order"));
        }
    }

    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "payment_create",
        "payments",
        serde_json::json!({ "payment_id": payment.id, "order_id": payload.order_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment created",
        payment_from_entity(payment)?,
        Some(Meta::empty()),
    ))
}

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<PaymentList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = pagination.normalize();
    let finder = Payments::find().order_by_desc(PaymentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Ok",
        PaymentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_intent(
    state: &AppState,
    payload: CreateIntentRequest,
) -> AppResult<ApiResponse<CreateIntentResponse>> {
    let order = Orders::find_by_id(payload.order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let payment_status: PaymentStatus = order.payment_status.parse()?;
    if payment_status.is_settled() {
        return Err(AppError::BadRequest("Order is already paid".into()));
    }
    if order.status.parse::<OrderStatus>()? == OrderStatus::Cancelled {
        return Err(AppError::BadRequest(
            "Cannot take payment for a cancelled order".into(),
        ));
    }

    let amount = money::to_minor_units(order.total)?;
    let intent = state
        .processor
        .create_intent(CreateIntent {
            amount,
            currency: state.config.payment_currency.clone(),
            order_id: order.id,
        })
        .await?;

    let client_secret = intent
        .client_secret
        .clone()
        .ok_or_else(|| AppError::Gateway("intent has no client secret".into()))?;

    tracing::info!(
        order_id = order.id,
        amount,
        intent_id = %intent.id,
        "payment intent created"
    );

    let txn = state.orm.begin().await?;

    let payment = PaymentActive {
        id: NotSet,
        payment_method: Set(STRIPE_GATEWAY.into()),
        payment_status: Set(PaymentStatus::Pending.as_str().into()),
        amount: Set(order.total),
        currency: Set(state.config.payment_currency.to_uppercase()),
        payment_intent_id: Set(Some(intent.id.clone())),
        transaction_id: Set(None),
        payment_gateway: Set(Some(STRIPE_GATEWAY.into())),
        gateway_response: Set(None),
        failure_reason: Set(None),
        processed_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    Orders::update_many()
        .col_expr(OrderCol::PaymentId, Expr::value(payment.id))
        .col_expr(OrderCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(OrderCol::Id.eq(order.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    audit::record(
        state,
        None,
        "payment_intent_create",
        "payments",
        serde_json::json!({ "payment_id": payment.id, "order_id": order.id, "intent_id": intent.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment intent created",
        CreateIntentResponse {
            client_secret,
            payment_id: payment.id,
        },
        Some(Meta::empty()),
    ))
}

/// Pull the intent from the processor and apply its outcome to the payment
/// and, on success, to the linked order. Both writes share one transaction.
pub async fn confirm_payment(
    state: &AppState,
    intent_id: &str,
) -> AppResult<ApiResponse<ConfirmPaymentResponse>> {
    let payment = Payments::find()
        .filter(PaymentCol::PaymentIntentId.eq(intent_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;

    let intent = state.processor.retrieve_intent(intent_id).await?;
    let outcome = reconcile(&intent);

    let payment_status = match outcome {
        Reconciliation::Unchanged => payment.payment_status.parse::<PaymentStatus>()?,
        outcome => {
            let status = apply_outcome(state, payment.id, &intent.id, &intent.raw, outcome).await?;
            tracing::info!(
                payment_id = payment.id,
                intent_id,
                processor_status = %intent.status,
                payment_status = %status,
                "payment reconciled"
            );
            audit::record(
                state,
                None,
                "payment_confirm",
                "payments",
                serde_json::json!({ "payment_id": payment.id, "payment_status": status }),
            )
            .await;
            status
        }
    };

    Ok(ApiResponse::success(
        "Ok",
        ConfirmPaymentResponse {
            status: intent.status,
            payment_status,
        },
        Some(Meta::empty()),
    ))
}

async fn apply_outcome(
    state: &AppState,
    payment_id: i32,
    intent_id: &str,
    raw: &serde_json::Value,
    outcome: Reconciliation,
) -> AppResult<PaymentStatus> {
    let txn = state.orm.begin().await?;

    let locked = Payments::find_by_id(payment_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;
    let current: PaymentStatus = locked.payment_status.parse()?;
    let now = Utc::now();

    let mut active: PaymentActive = locked.into();
    active.gateway_response = Set(Some(raw.clone()));
    active.updated_at = Set(now.into());

    let status = match outcome {
        Reconciliation::Completed => {
            active.payment_status = Set(PaymentStatus::Completed.as_str().into());
            active.transaction_id = Set(Some(intent_id.to_string()));
            active.processed_at = Set(Some(now.into()));
            active.failure_reason = Set(None);

            Orders::update_many()
                .col_expr(
                    OrderCol::PaymentStatus,
                    Expr::value(PaymentStatus::Completed.as_str()),
                )
                .col_expr(OrderCol::UpdatedAt, Expr::value(now))
                .filter(OrderCol::PaymentId.eq(payment_id))
                .exec(&txn)
                .await?;
            // only a pending order moves; later states are never rolled back
            Orders::update_many()
                .col_expr(OrderCol::Status, Expr::value(OrderStatus::Confirmed.as_str()))
                .filter(OrderCol::PaymentId.eq(payment_id))
                .filter(OrderCol::Status.eq(OrderStatus::Pending.as_str()))
                .exec(&txn)
                .await?;
            PaymentStatus::Completed
        }
        Reconciliation::Failed { reason } => {
            active.payment_status = Set(PaymentStatus::Failed.as_str().into());
            active.failure_reason = Set(Some(reason));
            PaymentStatus::Failed
        }
        Reconciliation::Unchanged => return Ok(current),
    };

    active.update(&txn).await?;
    txn.commit().await?;
    Ok(status)
}

pub async fn payments_by_menu_date(
    state: &AppState,
    user: &AuthUser,
    menu_date: NaiveDate,
) -> AppResult<ApiResponse<PaymentReport>> {
    ensure_staff(user)?;

    let rows = sqlx::query_as::<_, PaymentOrderRow>(
        r#"
        SELECT
            p.id AS payment_id,
            p.amount,
            p.currency,
            p.processed_at,
            p.created_at,
            o.payment_method,
            o.payment_status,
            o.id AS order_id,
            o.customer_name,
            o.customer_phone,
            o.customer_address,
            o.menu_date,
            o.total
        FROM payments p
        RIGHT JOIN orders o ON p.id = o.payment_id
        WHERE o.menu_date = $1
        ORDER BY o.order_date DESC
        "#,
    )
    .bind(menu_date)
    .fetch_all(&state.pool)
    .await?;

    let items: Vec<PaymentWithOrder> = rows.into_iter().map(Into::into).collect();
    let meta = Meta::total(items.len());

    Ok(ApiResponse::success("Ok", PaymentReport { items }, Some(meta)))
}

pub fn payment_from_entity(model: PaymentModel) -> AppResult<Payment> {
    Ok(Payment {
        payment_id: model.id,
        payment_method: model.payment_method,
        payment_status: model.payment_status.parse()?,
        amount: model.amount,
        currency: model.currency,
        payment_intent_id: model.payment_intent_id,
        transaction_id: model.transaction_id,
        payment_gateway: model.payment_gateway,
        failure_reason: model.failure_reason,
        processed_at: model.processed_at.map(|d| d.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
