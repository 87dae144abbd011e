//! Catalog domain logic
//!
//! Pure functions over catalog snapshots:
//!
//! - [`filter`]: free-text + category filtering of the product grid
//! - [`stock`]: variant/size availability, sold-out and low-stock state
//! - [`banner`]: time-boxed banner visibility
//! - [`context`]: assistant context snapshots

pub mod banner;
pub mod context;
pub mod filter;
pub mod stock;

pub use filter::{CategoryFilter, filter_products};
