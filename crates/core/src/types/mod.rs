//! Core types for Shopkeep.

pub mod id;
pub mod product;

pub use id::ProductId;
pub use product::{NewProduct, Product};
