use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{OrderStatus, apply_status_transition, partition_for_staff},
    dto::orders::{OrderList, OrderSummary, OrderWithLines, UpdateOrderStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{SessionUser, ensure_staff},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::order_service::{load_lines, order_from_entity},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &SessionUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        // Reject typo'd filters instead of returning an empty list.
        status.parse::<OrderStatus>()?;
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::OrderTime),
        SortOrder::Desc => finder.order_by_desc(OrderCol::OrderTime),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Badge counts for the staff header, re-derived on every call. Clients
/// poll this instead of subscribing to pushes.
pub async fn order_summary(
    state: &AppState,
    user: &SessionUser,
) -> AppResult<ApiResponse<OrderSummary>> {
    ensure_staff(user)?;

    let orders: Vec<Order> = Orders::find()
        .order_by_desc(OrderCol::OrderTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let buckets = partition_for_staff(&orders);
    let summary = OrderSummary {
        pending_or_preparing: buckets.pending_or_preparing.len(),
        ready: buckets.ready.len(),
    };

    Ok(ApiResponse::success("OK", summary, Some(Meta::empty())))
}

/// Move an order through its lifecycle. The transition is validated by the
/// domain table and the patch it yields is what gets written: the status,
/// a new estimate when given, and ready_time exactly on the move to ready.
pub async fn update_order_status(
    state: &AppState,
    user: &SessionUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithLines>> {
    ensure_staff(user)?;

    let next: OrderStatus = payload.status.parse()?;
    if let Some(estimate) = payload.estimated_time {
        if estimate <= 0 {
            return Err(AppError::Validation(
                "estimated_time must be positive".into(),
            ));
        }
    }

    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current: OrderStatus = order.status.parse()?;
    let patch = apply_status_transition(current, next, payload.estimated_time, Utc::now())?;

    let mut active: OrderActive = order.into();
    active.status = Set(patch.status.as_str().into());
    if let Some(estimate) = patch.estimated_time {
        active.estimated_time = Set(estimate);
    }
    if let Some(ready_time) = patch.ready_time {
        active.ready_time = Set(Some(ready_time.into()));
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.id),
        "order_status",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": patch.status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let lines = load_lines(state, order.id).await?;

    Ok(ApiResponse::success(
        "Status updated",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        Some(Meta::empty()),
    ))
}
