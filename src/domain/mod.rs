pub mod cart;
pub mod classifier;
pub mod status;

pub use cart::{Cart, CartLine, CartTotals, OrderPayload, PayloadLine, token_number};
pub use classifier::{StaffBuckets, StatusPatch, apply_status_transition, find_active_order, partition_for_staff};
pub use status::OrderStatus;
