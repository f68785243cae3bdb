//! Domain types returned by the API.
//!
//! Database row shapes live in the `db` repositories; the types here are the
//! JSON-facing domain objects (camelCase on the wire, matching the storefront
//! frontend's expectations).

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod review;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartItem, CartLine};
pub use catalog::{Category, CategorySummary, CategoryTree, Product, ProductSummary};
pub use order::{AdminOrderView, Order, OrderCustomer, OrderDetail, OrderItem, OrderLineView};
pub use review::{Review, ReviewAuthor, ReviewView};
pub use user::{PublicUser, User};
