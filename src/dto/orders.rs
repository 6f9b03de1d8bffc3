use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderLine};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    /// New estimate in minutes, typically set when moving to preparing.
    pub estimated_time: Option<i32>,
}

/// Dashboard badge counts derived from the staff partition.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub pending_or_preparing: usize,
    pub ready: usize,
}
