use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A dish on the canteen menu. Owned by the menu store; the cart only
/// snapshots its fields and never writes back.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Price in the smallest currency unit.
    pub price: i64,
    /// Minutes to prepare one serving.
    pub preparation_time: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    /// Short pickup token shown on both dashboards, e.g. "T483920".
    pub token_number: String,
    pub total_amount: i64,
    pub status: String,
    /// Minutes until the order is expected to be ready.
    pub estimated_time: i32,
    pub order_time: DateTime<Utc>,
    pub ready_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One menu item within a placed order, priced as it was at submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}
