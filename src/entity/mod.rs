pub mod audit_logs;
pub mod menu_items;
pub mod order_lines;
pub mod orders;

pub use audit_logs::Entity as AuditLogs;
pub use menu_items::Entity as MenuItems;
pub use order_lines::Entity as OrderLines;
pub use orders::Entity as Orders;
