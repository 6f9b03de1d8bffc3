use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::status::OrderStatus,
    error::{AppError, AppResult},
    middleware::auth::SessionUser,
    models::MenuItem,
};

/// One distinct menu item in an in-progress order. Name, price and prep
/// time are snapshots taken when the item was added; later menu edits do
/// not reach lines already in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub item_id: Uuid,
    pub name: String,
    pub price: i64,
    pub preparation_time: i32,
    pub quantity: u32,
}

/// A session-scoped cart: an ordered list of lines, at most one per item id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    lines: Vec<CartLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartTotals {
    pub total_amount: i64,
    /// Minutes, rounded up.
    pub estimated_time: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayloadLine {
    pub item_id: Uuid,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

/// Immutable submission snapshot handed to the order store. Never mutated
/// after construction.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderPayload {
    pub token_number: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub items: Vec<PayloadLine>,
    pub total_amount: i64,
    pub estimated_time: i32,
    pub status: OrderStatus,
    pub order_time: DateTime<Utc>,
}

/// Pickup token: "T" plus the last six digits of the millisecond timestamp.
/// Only probabilistically unique; collisions inside the same truncation
/// window are accepted, not retried.
pub fn token_number(now_millis: i64) -> String {
    format!("T{:06}", now_millis.rem_euclid(1_000_000))
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one serving of `item`. An existing line for the same item id is
    /// incremented; otherwise a new line is appended with quantity 1.
    pub fn add(&mut self, item: &MenuItem) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartLine {
            item_id: item.id,
            name: item.name.clone(),
            price: item.price,
            preparation_time: item.preparation_time,
            quantity: 1,
        });
    }

    /// Set the quantity of the line for `item_id`. Zero removes the line;
    /// an unknown id is a no-op.
    pub fn update_quantity(&mut self, item_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.lines.retain(|l| l.item_id != item_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = quantity;
        }
    }

    /// Total amount and estimated preparation time. `None` on an empty cart.
    ///
    /// The estimate is the quantity-weighted prep-time sum divided by the
    /// number of distinct lines (not total servings), rounded up. The
    /// divisor choice is inherited source behavior: the estimate scales
    /// with dish variety rather than raw item count.
    pub fn totals(&self) -> Option<CartTotals> {
        if self.lines.is_empty() {
            return None;
        }
        let total_amount = self
            .lines
            .iter()
            .map(|l| l.price * i64::from(l.quantity))
            .sum();
        let prep_sum: i64 = self
            .lines
            .iter()
            .map(|l| i64::from(l.preparation_time) * i64::from(l.quantity))
            .sum();
        let n = self.lines.len() as i64;
        let estimated_time = ((prep_sum + n - 1) / n) as i32;
        Some(CartTotals {
            total_amount,
            estimated_time,
        })
    }

    /// Build the submission snapshot. The caller supplies `now` so the same
    /// instant feeds both the token and the order time.
    pub fn build_order_payload(
        &self,
        user: &SessionUser,
        now: DateTime<Utc>,
    ) -> AppResult<OrderPayload> {
        let totals = self
            .totals()
            .ok_or_else(|| AppError::BadRequest("Cart is empty".into()))?;

        for (field, value) in [
            ("id", &user.id),
            ("name", &user.name),
            ("email", &user.email),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("user {field} is required")));
            }
        }

        Ok(OrderPayload {
            token_number: token_number(now.timestamp_millis()),
            student_id: user.id.clone(),
            student_name: user.name.clone(),
            student_email: user.email.clone(),
            items: self
                .lines
                .iter()
                .map(|l| PayloadLine {
                    item_id: l.item_id,
                    name: l.name.clone(),
                    price: l.price,
                    quantity: l.quantity,
                })
                .collect(),
            total_amount: totals.total_amount,
            estimated_time: totals.estimated_time,
            status: OrderStatus::Pending,
            order_time: now,
        })
    }

    /// Empty the cart. Called only after the order insert commits.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn menu_item(name: &str, price: i64, prep: i32) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            category: None,
            price,
            preparation_time: prep,
            is_available: true,
            created_at: Utc::now(),
        }
    }

    fn student() -> SessionUser {
        SessionUser {
            id: "S1042".into(),
            name: "Asha".into(),
            email: "asha@example.edu".into(),
            role: "student".into(),
        }
    }

    #[test]
    fn adding_same_item_twice_merges_into_one_line() {
        let item = menu_item("Samosa", 300, 5);
        let mut cart = Cart::new();
        cart.add(&item);
        cart.add(&item);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let keep = menu_item("Tea", 150, 2);
        let drop = menu_item("Dosa", 600, 12);
        let mut cart = Cart::new();
        cart.add(&keep);
        cart.add(&drop);
        cart.update_quantity(drop.id, 0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].item_id, keep.id);
    }

    #[test]
    fn update_quantity_for_unknown_item_is_a_noop() {
        let item = menu_item("Idli", 250, 8);
        let mut cart = Cart::new();
        cart.add(&item);
        cart.update_quantity(Uuid::new_v4(), 5);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn totals_match_the_weighted_formula() {
        // [{price:5, prep:10, qty:2}, {price:3, prep:20, qty:1}]
        // total = 5*2 + 3*1 = 13; estimate = ceil((10*2 + 20*1) / 2) = 20
        let a = menu_item("A", 5, 10);
        let b = menu_item("B", 3, 20);
        let mut cart = Cart::new();
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);
        let totals = cart.totals().unwrap();
        assert_eq!(totals.total_amount, 13);
        assert_eq!(totals.estimated_time, 20);
    }

    #[test]
    fn estimate_rounds_up() {
        let a = menu_item("A", 100, 7);
        let b = menu_item("B", 100, 10);
        let mut cart = Cart::new();
        cart.add(&a);
        cart.add(&b);
        // ceil(17 / 2) = 9
        assert_eq!(cart.totals().unwrap().estimated_time, 9);
    }

    #[test]
    fn totals_on_empty_cart_is_none_and_idempotent_otherwise() {
        let mut cart = Cart::new();
        assert!(cart.totals().is_none());
        cart.add(&menu_item("Tea", 150, 2));
        assert_eq!(cart.totals(), cart.totals());
    }

    #[test]
    fn token_keeps_the_last_six_digits() {
        assert_eq!(token_number(1699999999999), "T999999");
        assert_eq!(token_number(1700000000042), "T000042");
    }

    #[test]
    fn payload_then_clear_round_trip() {
        let a = menu_item("Thali", 1200, 15);
        let b = menu_item("Lassi", 400, 3);
        let mut cart = Cart::new();
        cart.add(&a);
        cart.add(&b);
        cart.add(&b);

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let payload = cart.build_order_payload(&student(), now).unwrap();
        assert_eq!(payload.items.len(), cart.len());
        assert_eq!(payload.total_amount, 1200 + 2 * 400);
        assert_eq!(payload.status, OrderStatus::Pending);
        assert_eq!(payload.order_time, now);
        assert!(payload.token_number.starts_with('T'));

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn payload_on_empty_cart_is_rejected() {
        let cart = Cart::new();
        let err = cart.build_order_payload(&student(), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn payload_with_blank_user_fields_fails_validation() {
        let mut cart = Cart::new();
        cart.add(&menu_item("Tea", 150, 2));
        let mut user = student();
        user.email = "  ".into();
        let err = cart.build_order_payload(&user, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
