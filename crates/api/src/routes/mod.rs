//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register             - Create account (+ empty cart), issue token
//! POST /api/auth/login                - Issue token
//! POST /api/auth/forgot-password      - Start password reset
//! POST /api/auth/reset-password       - Complete password reset
//!
//! # Users (requires auth)
//! GET  /api/users/profile             - Current user
//! PUT  /api/users/profile             - Update name/phone
//! GET  /api/users/addresses           - List addresses
//! POST /api/users/addresses           - Create address
//! PUT  /api/users/addresses/{id}      - Update address
//! DELETE /api/users/addresses/{id}    - Delete address
//!
//! # Catalog (public)
//! GET  /api/categories                - All categories with children + counts
//! GET  /api/categories/{slug}         - Category with children + products
//! GET  /api/products                  - Filtered, paginated listing
//! GET  /api/products/{id}             - Product with category + recent reviews
//! GET  /api/products/slug/{slug}      - Same, by slug
//! POST /api/products                  - Create product (admin)
//! PUT  /api/products/{id}             - Update product (admin)
//! DELETE /api/products/{id}           - Delete product (admin)
//!
//! # Cart (requires auth)
//! GET  /api/cart                      - Cart with lines expanded
//! POST /api/cart/items                - Add line (merges identical lines)
//! PUT  /api/cart/items/{id}           - Change quantity
//! DELETE /api/cart/items/{id}         - Remove line
//! DELETE /api/cart                    - Clear cart
//!
//! # Orders (requires auth)
//! POST /api/orders                    - Place order from cart
//! GET  /api/orders                    - Caller's orders, paginated
//! GET  /api/orders/{id}               - One order
//!
//! # Reviews
//! POST /api/reviews                   - Submit review (requires auth)
//! GET  /api/reviews/product/{id}      - Product reviews, paginated
//!
//! # Admin (requires admin role)
//! GET  /api/admin/dashboard           - Counts, revenue, recent orders
//! GET  /api/admin/orders              - All orders, optional status filter
//! PUT  /api/admin/orders/{id}         - Update status/tracking/delivery
//! GET  /api/admin/users               - Users with order counts
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
}

/// Create the user profile and address routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route(
            "/addresses",
            get(users::list_addresses).post(users::create_address),
        )
        .route(
            "/addresses/{id}",
            put(users::update_address).delete(users::delete_address),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{slug}", get(categories::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/slug/{slug}", get(products::show_by_slug))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::create))
        .route("/product/{id}", get(reviews::list_for_product))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}", put(admin::update_order))
        .route("/users", get(admin::list_users))
}

/// Assemble the full `/api` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/users", user_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/reviews", review_routes())
        .nest("/api/admin", admin_routes())
}
