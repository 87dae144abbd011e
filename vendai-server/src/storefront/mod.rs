//! Storefront session lifecycle
//!
//! The shopper-facing half of the platform:
//!
//! - [`cart`]: the in-memory Cart Ledger and add-to-cart resolution
//! - [`session`]: per-visit state (cart + transcript + engagement timer)
//! - [`manager`]: session registry and idle sweeper
//! - [`checkout`]: ledger → persisted order + WhatsApp handoff
//! - [`inactivity`]: the engagement timer

pub mod cart;
pub mod checkout;
pub mod inactivity;
pub mod manager;
pub mod session;

pub use cart::{CartLedger, CartLine, resolve_cart_line};
pub use inactivity::EngagementMonitor;
pub use manager::SessionManager;
pub use session::StorefrontSession;
