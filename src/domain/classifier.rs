use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    domain::status::OrderStatus,
    error::{AppError, AppResult},
    models::Order,
};

/// Staff dashboard buckets. Disjoint; used for counts and badges only.
#[derive(Debug, Default)]
pub struct StaffBuckets<'a> {
    pub pending_or_preparing: Vec<&'a Order>,
    pub ready: Vec<&'a Order>,
}

/// Update to send to the order store for a status change. `ready_time` is
/// stamped exactly when the order moves to ready.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusPatch {
    pub status: OrderStatus,
    pub estimated_time: Option<i32>,
    pub ready_time: Option<DateTime<Utc>>,
}

fn parsed_status(order: &Order) -> Option<OrderStatus> {
    order.status.parse().ok()
}

/// The student's current order: the first non-terminal one. Callers pass
/// the collection already sorted by recency descending; if the backend
/// ever holds several active orders, the first wins.
pub fn find_active_order(orders: &[Order]) -> Option<&Order> {
    orders
        .iter()
        .find(|o| parsed_status(o).is_some_and(|s| s.is_active()))
}

/// Split orders into the two staff-facing buckets. Orders in a terminal or
/// unrecognized status land in neither.
pub fn partition_for_staff(orders: &[Order]) -> StaffBuckets<'_> {
    let mut buckets = StaffBuckets::default();
    for order in orders {
        match parsed_status(order) {
            Some(OrderStatus::Pending) | Some(OrderStatus::Preparing) => {
                buckets.pending_or_preparing.push(order)
            }
            Some(OrderStatus::Ready) => buckets.ready.push(order),
            _ => {}
        }
    }
    buckets
}

/// Compute the patch for a status change, enforcing the transition table.
pub fn apply_status_transition(
    current: OrderStatus,
    next: OrderStatus,
    estimated_time: Option<i32>,
    now: DateTime<Utc>,
) -> AppResult<StatusPatch> {
    if !current.can_transition_to(next) {
        return Err(AppError::InvalidState(format!(
            "cannot move order from {current} to {next}"
        )));
    }
    Ok(StatusPatch {
        status: next,
        estimated_time,
        ready_time: (next == OrderStatus::Ready).then_some(now),
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn order(status: &str) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            student_id: "S1042".into(),
            student_name: "Asha".into(),
            student_email: "asha@example.edu".into(),
            token_number: "T000001".into(),
            total_amount: 500,
            status: status.into(),
            estimated_time: 10,
            order_time: now,
            ready_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_active_order_among_terminal_statuses() {
        let orders = vec![order("completed"), order("cancelled")];
        assert!(find_active_order(&orders).is_none());
    }

    #[test]
    fn first_active_order_wins() {
        let orders = vec![order("completed"), order("preparing"), order("ready")];
        let active = find_active_order(&orders).unwrap();
        assert_eq!(active.id, orders[1].id);
    }

    #[test]
    fn partition_is_disjoint_and_skips_terminal() {
        let orders = vec![
            order("pending"),
            order("preparing"),
            order("ready"),
            order("completed"),
        ];
        let buckets = partition_for_staff(&orders);
        assert_eq!(buckets.pending_or_preparing.len(), 2);
        assert_eq!(buckets.ready.len(), 1);
    }

    #[test]
    fn moving_to_ready_stamps_ready_time() {
        let now = Utc::now();
        let patch =
            apply_status_transition(OrderStatus::Preparing, OrderStatus::Ready, None, now)
                .unwrap();
        assert_eq!(patch.ready_time, Some(now));
    }

    #[test]
    fn other_transitions_never_stamp_ready_time() {
        let patch = apply_status_transition(
            OrderStatus::Pending,
            OrderStatus::Preparing,
            Some(15),
            Utc::now(),
        )
        .unwrap();
        assert!(patch.ready_time.is_none());
        assert_eq!(patch.estimated_time, Some(15));
    }

    #[test]
    fn disallowed_transition_is_an_invalid_state() {
        let err = apply_status_transition(
            OrderStatus::Ready,
            OrderStatus::Pending,
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }
}
