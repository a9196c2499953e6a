pub mod auth;
pub mod inquiries;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod users;
