use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{OrderStatus, PaymentStatus},
    dto::{auth, inquiries, menu as menu_dto, orders as order_dto, payments as payment_dto, reviews as review_dto, users as user_dto},
    models::{
        CatalogEntry, CatalogItem, Combo, ComboItem, ComboItemDetail, Inquiry, MenuItemComponent,
        MenuItemSnapshot, Order, OrderLine, Payment, PaymentWithOrder, Review, ScheduledMenu, User,
    },
    notify::{EmailAttachment, EmailMessage, SmsMessage},
    response::{ApiResponse, Meta},
    routes::{
        auth as auth_routes, health, inquiries as inquiry_routes, menu, notifications, orders,
        params, payments, reviews, users,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth_routes::register,
        auth_routes::login,
        auth_routes::confirm_email,
        auth_routes::resend_confirmation,
        users::get_me,
        users::update_me,
        users::list_users,
        users::get_user,
        users::update_user_status,
        menu::list_scheduled,
        menu::list_inactive_scheduled,
        menu::list_my_scheduled,
        menu::create_scheduled,
        menu::get_scheduled,
        menu::update_scheduled,
        menu::set_scheduled_status,
        menu::delete_scheduled,
        menu::list_catalog_items,
        menu::create_catalog_item,
        menu::update_catalog_item,
        menu::delete_catalog_item,
        menu::catalog_categories,
        menu::list_catalog_all,
        menu::create_combo,
        menu::list_combos,
        menu::combo_categories,
        menu::get_combo,
        menu::update_combo,
        menu::delete_combo,
        orders::create_order,
        orders::list_orders,
        orders::list_orders_by_menu_date,
        orders::get_order,
        orders::update_order,
        orders::update_orders_batch,
        orders::cancel_order,
        payments::create_payment,
        payments::list_payments,
        payments::create_intent,
        payments::confirm_payment,
        payments::payments_by_menu_date,
        reviews::create_review,
        reviews::approved_reviews,
        reviews::all_reviews,
        reviews::approve_review,
        reviews::delete_review,
        reviews::review_stats,
        inquiry_routes::create_inquiry,
        inquiry_routes::list_inquiries,
        inquiry_routes::get_inquiry,
        inquiry_routes::update_inquiry_status,
        inquiry_routes::delete_inquiry,
        inquiry_routes::inquiry_stats,
        notifications::send_email,
        notifications::send_sms
    ),
    components(
        schemas(
            User,
            MenuItemComponent,
            MenuItemSnapshot,
            ScheduledMenu,
            CatalogItem,
            ComboItem,
            ComboItemDetail,
            Combo,
            CatalogEntry,
            OrderLine,
            Order,
            OrderStatus,
            PaymentStatus,
            Payment,
            PaymentWithOrder,
            Review,
            Inquiry,
            EmailAttachment,
            EmailMessage,
            SmsMessage,
            auth::RegisterRequest,
            auth::RegisterResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ResendConfirmationRequest,
            user_dto::UserUpdate,
            user_dto::UserStatusUpdate,
            user_dto::UserList,
            menu_dto::CreateScheduledMenuRequest,
            menu_dto::ScheduledMenuUpdate,
            menu_dto::ScheduledMenuStatusRequest,
            menu_dto::ScheduledMenuList,
            menu_dto::CreateCatalogItemRequest,
            menu_dto::CatalogItemUpdate,
            menu_dto::CatalogItemList,
            menu_dto::CatalogEntryList,
            menu_dto::CategoryList,
            menu_dto::CreateComboRequest,
            menu_dto::ComboUpdate,
            menu_dto::ComboList,
            order_dto::CreateOrderRequest,
            order_dto::OrderUpdate,
            order_dto::OrderUpdateResponse,
            order_dto::OrderBatchEntry,
            order_dto::OrderBatchResult,
            order_dto::OrderBatchResults,
            order_dto::OrderList,
            payment_dto::CreatePaymentRequest,
            payment_dto::CreateIntentRequest,
            payment_dto::CreateIntentResponse,
            payment_dto::ConfirmPaymentResponse,
            payment_dto::PaymentList,
            payment_dto::PaymentReport,
            review_dto::CreateReviewRequest,
            review_dto::ReviewList,
            review_dto::ReviewStats,
            inquiries::CreateInquiryRequest,
            inquiries::InquiryStatusUpdate,
            inquiries::InquiryList,
            inquiries::EventTypeCount,
            inquiries::InquiryStats,
            params::Pagination,
            params::ScheduledMenuQuery,
            params::CatalogQuery,
            params::OrderListQuery,
            params::InquiryQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<order_dto::OrderList>,
            ApiResponse<order_dto::OrderBatchResults>,
            ApiResponse<ScheduledMenu>,
            ApiResponse<Combo>,
            ApiResponse<Payment>,
            ApiResponse<payment_dto::CreateIntentResponse>,
            ApiResponse<payment_dto::ConfirmPaymentResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and email confirmation"),
        (name = "Users", description = "Profiles and account administration"),
        (name = "Menu", description = "Scheduled menus"),
        (name = "Catalog", description = "Catalog items"),
        (name = "Combos", description = "Combo bundles of catalog items"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payments and card processor reconciliation"),
        (name = "Reviews", description = "Customer reviews"),
        (name = "Inquiries", description = "Catering inquiries"),
        (name = "Notifications", description = "Outbound email and SMS"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
