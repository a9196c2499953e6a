pub mod auth_service;
pub mod catalog_service;
pub mod combo_service;
pub mod inquiry_service;
pub mod menu_service;
pub mod notification_service;
pub mod order_service;
pub mod payment_service;
pub mod review_service;
pub mod user_service;
