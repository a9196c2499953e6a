//! Business rules that do not touch the database.

pub mod combo;
pub mod menu_id;
pub mod money;
pub mod order_status;
pub mod reconcile;
pub mod validation;

pub use order_status::{OrderStatus, PaymentStatus};
