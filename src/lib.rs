//! Encebollado
//!
//! Menu catalog, shopping cart and order hand-off engine for a seafood restaurant. The
//! catalog answers product, category and promotion queries, the cart keeps a persisted
//! selection of products, and checkout renders the cart as a text message carried by a
//! messaging link.

pub mod cart;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod fixtures;
pub mod notifications;
pub mod order;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
