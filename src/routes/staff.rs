use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderSummary, OrderWithLines, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::SessionUser,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::staff_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/summary", get(order_summary))
        .route("/orders/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/staff/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders (staff only)", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = staff_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/staff/orders/summary",
    responses(
        (status = 200, description = "Pending/preparing and ready counts (staff only)", body = ApiResponse<OrderSummary>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn order_summary(
    State(state): State<AppState>,
    user: SessionUser,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let resp = staff_service::order_summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/staff/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Advance an order's status (staff only)", body = ApiResponse<OrderWithLines>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Transition not allowed"),
        (status = 422, description = "Unknown status"),
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let resp = staff_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
