use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::find_active_order,
    dto::orders::{OrderList, OrderWithLines},
    entity::{
        order_lines::{
            ActiveModel as OrderLineActive, Column as OrderLineCol, Entity as OrderLines,
            Model as OrderLineModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{SessionUser, ensure_role},
    models::{Order, OrderLine},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Turn the session's cart into a persisted order: build the payload
/// snapshot, insert order and lines in one transaction, then clear the
/// cart. The cart is cleared only after the commit so a failed insert
/// leaves it intact.
pub async fn place_order(
    state: &AppState,
    user: &SessionUser,
) -> AppResult<ApiResponse<OrderWithLines>> {
    ensure_role(user, "student")?;

    let payload = {
        let carts = state.carts.read().await;
        let cart = carts
            .get(&user.id)
            .ok_or_else(|| AppError::BadRequest("Cart is empty".into()))?;
        cart.build_order_payload(user, Utc::now())?
    };

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        student_id: Set(payload.student_id.clone()),
        student_name: Set(payload.student_name.clone()),
        student_email: Set(payload.student_email.clone()),
        token_number: Set(payload.token_number.clone()),
        total_amount: Set(payload.total_amount),
        status: Set(payload.status.as_str().into()),
        estimated_time: Set(payload.estimated_time),
        order_time: Set(payload.order_time.into()),
        ready_time: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut lines: Vec<OrderLine> = Vec::new();
    for item in &payload.items {
        let line = OrderLineActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            item_id: Set(item.item_id),
            name: Set(item.name.clone()),
            price: Set(item.price),
            quantity: Set(item.quantity as i32),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        lines.push(order_line_from_entity(line));
    }

    txn.commit().await?;

    {
        let mut carts = state.carts.write().await;
        if let Some(cart) = carts.get_mut(&user.id) {
            cart.clear();
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.id),
        "order_placed",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "token_number": order.token_number,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_my_orders(
    state: &AppState,
    user: &SessionUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::StudentId.eq(user.id.clone()));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
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

/// The student's current order, if any: their orders sorted newest first,
/// classified for the first non-terminal status.
pub async fn active_order(
    state: &AppState,
    user: &SessionUser,
) -> AppResult<ApiResponse<Option<OrderWithLines>>> {
    let orders: Vec<Order> = Orders::find()
        .filter(OrderCol::StudentId.eq(user.id.clone()))
        .order_by_desc(OrderCol::OrderTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let active = match find_active_order(&orders) {
        Some(order) => order.clone(),
        None => {
            return Ok(ApiResponse::success("OK", None, Some(Meta::empty())));
        }
    };

    let lines = load_lines(state, active.id).await?;

    Ok(ApiResponse::success(
        "OK",
        Some(OrderWithLines {
            order: active,
            lines,
        }),
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &SessionUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::StudentId.eq(user.id.clone()))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => order_from_entity(o),
        None => return Err(AppError::NotFound),
    };

    let lines = load_lines(state, order.id).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithLines { order, lines },
        Some(Meta::empty()),
    ))
}

pub(crate) async fn load_lines(state: &AppState, order_id: Uuid) -> AppResult<Vec<OrderLine>> {
    let lines = OrderLines::find()
        .filter(OrderLineCol::OrderId.eq(order_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_line_from_entity)
        .collect();
    Ok(lines)
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        student_id: model.student_id,
        student_name: model.student_name,
        student_email: model.student_email,
        token_number: model.token_number,
        total_amount: model.total_amount,
        status: model.status,
        estimated_time: model.estimated_time,
        order_time: model.order_time.with_timezone(&Utc),
        ready_time: model.ready_time.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn order_line_from_entity(model: OrderLineModel) -> OrderLine {
    OrderLine {
        id: model.id,
        order_id: model.order_id,
        item_id: model.item_id,
        name: model.name,
        price: model.price,
        quantity: model.quantity,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
