use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::{ActiveValue::NotSet, JoinType};

use crate::{
    audit,
    domain::{OrderStatus, PaymentStatus},
    dto::orders::{
        CreateOrderRequest, OrderBatchEntry, OrderBatchResult, OrderBatchResults, OrderList,
        OrderUpdate, OrderUpdateResponse,
    },
    entity::{
        orders::{self, ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        scheduled_menus::{Column as MenuCol, Entity as ScheduledMenus},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Order, OrderLine},
    notify::{EmailMessage, SmsMessage, dispatch_email, dispatch_sms},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, Pagination, SortOrder},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "Order must contain at least one item".into(),
        ));
    }
    if payload.total < Decimal::ZERO {
        return Err(AppError::BadRequest("Order total cannot be negative".into()));
    }
    if payload.customer_name.trim().is_empty() {
        return Err(AppError::BadRequest("Customer name cannot be empty".into()));
    }

    let menu = ScheduledMenus::find_by_id(payload.menu_id.clone())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Scheduled menu"))?;
    if !menu.active {
        return Err(AppError::BadRequest(
            "Scheduled menu is not accepting orders".into(),
        ));
    }

    // snapshot is stored as sent; no re-pricing against the catalog
    let items = serde_json::to_value(&payload.items)?;
    let now = Utc::now();

    let order = OrderActive {
        id: NotSet,
        menu_id: Set(menu.id.clone()),
        customer_name: Set(payload.customer_name.trim().to_string()),
        customer_phone: Set(payload.customer_phone),
        customer_address: Set(payload.customer_address),
        customer_email: Set(payload.customer_email),
        menu_date: Set(menu.menu_date),
        order_date: Set(now.into()),
        delivery_date: Set(payload.delivery_date.map(Into::into)),
        items: Set(items),
        total: Set(payload.total),
        payment_method: Set(payload.payment_method),
        payment_status: Set(PaymentStatus::Pending.as_str().into()),
        status: Set(OrderStatus::Pending.as_str().into()),
        special_instructions: Set(payload.special_instructions),
        payment_id: Set(None),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    let order = order_from_entity(order)?;

    if let Some(email) = order.customer_email.as_deref().filter(|e| !e.is_empty()) {
        dispatch_email(state.notifier.clone(), order_received_email(email, &order));
    }

    audit::record(
        state,
        None,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.order_id, "menu_id": order.menu_id, "total": order.total }),
    )
    .await;
    tracing::info!(order_id = order.order_id, menu_id = %order.menu_id, "order placed");

    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

/// Visibility by role: admins see everything, caterers their own menus, customers their own email.
fn scope_condition(user: &AuthUser) -> Condition {
    if user.is_admin() {
        Condition::all()
    } else if user.is_caterer() {
        Condition::all().add(MenuCol::CatererId.eq(user.user_id))
    } else {
        Condition::all().add(
            Expr::expr(Func::lower(Expr::col((Orders, OrderCol::CustomerEmail))))
                .eq(user.email.to_lowercase()),
        )
    }
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = pagination.normalize();

    let mut condition = scope_condition(user);
    if let Some(date) = query.menu_date {
        condition = condition.add(OrderCol::MenuDate.eq(date));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status: OrderStatus = status.parse()?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find()
        .join(JoinType::InnerJoin, orders::Relation::ScheduledMenus.def())
        .filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::OrderDate),
        SortOrder::Desc => finder.order_by_desc(OrderCol::OrderDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn list_by_menu_date(
    state: &AppState,
    user: &AuthUser,
    menu_date: NaiveDate,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let query = OrderListQuery {
        menu_date: Some(menu_date),
        status: None,
        sort_order: None,
    };
    list_orders(state, user, query, pagination).await
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    ensure_can_view(&state.orm, user, &order).await?;

    Ok(ApiResponse::success(
        "Ok",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: OrderUpdate,
) -> AppResult<ApiResponse<OrderUpdateResponse>> {
    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    ensure_can_manage(&txn, user, &existing).await?;

    let current: OrderStatus = existing.status.parse()?;
    let next = match payload.status {
        Some(requested) => Some(current.transition(requested)?),
        None => None,
    };

    let mut active: OrderActive = existing.into();
    if let Some(next) = next {
        active.status = Set(next.as_str().into());
    }
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status.as_str().into());
    }
    if let Some(delivery_date) = payload.delivery_date {
        active.delivery_date = Set(Some(delivery_date.into()));
    }
    if let Some(instructions) = payload.special_instructions {
        active.special_instructions = Set(Some(instructions));
    }
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    let order = order_from_entity(updated)?;

    if let Some(next) = next {
        notify_status_change(state, &order, next);
        tracing::info!(order_id = id, from = %current, to = %next, "order status changed");
    }

    audit::record(
        state,
        Some(user.user_id),
        "order_update",
        "orders",
        serde_json::json!({ "order_id": id, "status": order.status, "payment_status": order.payment_status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated successfully",
        OrderUpdateResponse {
            order_id: order.order_id,
            status: order.status,
            payment_status: order.payment_status,
        },
        Some(Meta::empty()),
    ))
}

/// Apply [`update_order`] to each entry in turn. Each entry commits on its own, so one
/// rejected order is reported in its result and the rest of the batch still runs.
pub async fn update_orders_batch(
    state: &AppState,
    user: &AuthUser,
    entries: Vec<OrderBatchEntry>,
) -> AppResult<ApiResponse<OrderBatchResults>> {
    ensure_staff(user)?;
    if entries.is_empty() {
        return Err(AppError::BadRequest("Batch must contain at least one order".into()));
    }

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let order_id = entry.order_id;
        let result = match update_order(state, user, order_id, entry.changes).await {
            Ok(resp) => OrderBatchResult {
                order_id,
                success: true,
                status: resp.data.as_ref().map(|u| u.status),
                payment_status: resp.data.as_ref().map(|u| u.payment_status),
                message: resp.message,
            },
            Err(err) => {
                tracing::warn!(order_id, error = %err, "batch order update failed");
                OrderBatchResult {
                    order_id,
                    success: false,
                    message: format!("Failed to update order {order_id}: {err}"),
                    status: None,
                    payment_status: None,
                }
            }
        };
        items.push(result);
    }

    let failed = items.iter().filter(|r| !r.success).count();
    tracing::info!(total = items.len(), failed, "batch order update finished");
    let meta = Meta::total(items.len());

    Ok(ApiResponse::success(
        "Batch processed",
        OrderBatchResults { items },
        Some(meta),
    ))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<OrderUpdateResponse>> {
    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    ensure_can_manage(&txn, user, &existing).await?;

    let current: OrderStatus = existing.status.parse()?;
    let cancelled = current.cancel()?;

    let mut active: OrderActive = existing.into();
    active.status = Set(cancelled.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    let order = order_from_entity(updated)?;
    notify_status_change(state, &order, cancelled);

    audit::record(
        state,
        Some(user.user_id),
        "order_cancel",
        "orders",
        serde_json::json!({ "order_id": id, "previous_status": current }),
    )
    .await;
    tracing::info!(order_id = id, from = %current, "order cancelled");

    Ok(ApiResponse::success(
        "Order cancelled successfully",
        OrderUpdateResponse {
            order_id: order.order_id,
            status: order.status,
            payment_status: order.payment_status,
        },
        Some(Meta::empty()),
    ))
}

/// Admins, or the caterer who published the order's menu.
async fn ensure_can_manage<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    order: &OrderModel,
) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    if user.is_caterer() {
        let owner = ScheduledMenus::find_by_id(order.menu_id.clone())
            .one(conn)
            .await?
            .map(|menu| menu.caterer_id);
        if owner == Some(user.user_id) {
            return Ok(());
        }
    }
    Err(AppError::Forbidden)
}

async fn ensure_can_view<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    order: &OrderModel,
) -> AppResult<()> {
    let own_email = order
        .customer_email
        .as_deref()
        .is_some_and(|email| email.eq_ignore_ascii_case(&user.email));
    if !user.is_admin() && !user.is_caterer() {
        return if own_email {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        };
    }
    ensure_can_manage(conn, user, order).await
}

fn order_received_email(to: &str, order: &Order) -> EmailMessage {
    let lines: String = order
        .items
        .iter()
        .map(|line| {
            format!(
                "<li>{} x {} ({})</li>",
                line.quantity, line.item_name, line.price
            )
        })
        .collect();
    EmailMessage::new(
        to,
        format!("Order #{} received", order.order_id),
        format!(
            "<p>Hi {},</p><p>We have received your order for {}.</p><ul>{lines}</ul><p>Total: {}</p>",
            order.customer_name, order.menu_date, order.total
        ),
    )
}

fn notify_status_change(state: &AppState, order: &Order, status: OrderStatus) {
    let Some(phone) = order.customer_phone.as_deref().filter(|p| !p.is_empty()) else {
        return;
    };
    let text = match status {
        OrderStatus::Cancelled => format!("Your order #{} has been cancelled.", order.order_id),
        other => format!(
            "Your order #{} is now {}.",
            order.order_id,
            other.as_str().replace('_', " ")
        ),
    };
    dispatch_sms(
        state.notifier.clone(),
        SmsMessage {
            to: phone.to_string(),
            message: text,
        },
    );
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items: Vec<OrderLine> = serde_json::from_value(model.items)?;
    Ok(Order {
        order_id: model.id,
        menu_id: model.menu_id,
        customer_name: model.customer_name,
        customer_phone: model.customer_phone,
        customer_address: model.customer_address,
        customer_email: model.customer_email,
        menu_date: model.menu_date,
        order_date: model.order_date.with_timezone(&Utc),
        delivery_date: model.delivery_date.map(|d| d.with_timezone(&Utc)),
        items,
        total: model.total,
        payment_method: model.payment_method,
        payment_status: model.payment_status.parse()?,
        status: model.status.parse()?,
        special_instructions: model.special_instructions,
        payment_id: model.payment_id,
    })
}
