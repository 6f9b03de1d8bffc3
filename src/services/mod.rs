pub mod cart_service;
pub mod menu_service;
pub mod order_service;
pub mod session_service;
pub mod staff_service;
