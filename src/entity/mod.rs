pub mod audit_logs;
pub mod catering_inquiries;
pub mod customer_reviews;
pub mod menu_catalog;
pub mod menu_combos;
pub mod orders;
pub mod payments;
pub mod scheduled_menus;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use catering_inquiries::Entity as CateringInquiries;
pub use customer_reviews::Entity as CustomerReviews;
pub use menu_catalog::Entity as MenuCatalog;
pub use menu_combos::Entity as MenuCombos;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use scheduled_menus::Entity as ScheduledMenus;
pub use users::Entity as Users;
