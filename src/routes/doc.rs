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
    domain::{CartLine, CartTotals, OrderStatus},
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::{AddToCartRequest, CartView, UpdateQuantityRequest},
        menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
        orders::{OrderList, OrderSummary, OrderWithLines, UpdateOrderStatusRequest},
    },
    models::{MenuItem, Order, OrderLine},
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, menu, orders, params, staff},
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
        auth::login,
        menu::list_menu,
        menu::create_menu_item,
        menu::update_menu_item,
        cart::view_cart,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        orders::place_order,
        orders::list_my_orders,
        orders::active_order,
        orders::get_order,
        staff::list_all_orders,
        staff::order_summary,
        staff::update_order_status
    ),
    components(
        schemas(
            MenuItem,
            Order,
            OrderLine,
            OrderStatus,
            CartLine,
            CartTotals,
            CartView,
            AddToCartRequest,
            UpdateQuantityRequest,
            MenuList,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            OrderList,
            OrderWithLines,
            OrderSummary,
            UpdateOrderStatusRequest,
            LoginRequest,
            LoginResponse,
            params::Pagination,
            params::MenuQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<MenuList>,
            ApiResponse<CartView>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithLines>,
            ApiResponse<OrderSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Session endpoints"),
        (name = "Menu", description = "Menu endpoints"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Orders", description = "Student order endpoints"),
        (name = "Staff", description = "Staff dashboard endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
