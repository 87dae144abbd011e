//! Wire-level models shared between the server and its clients

pub mod analysis;
pub mod chat;
pub mod order;
pub mod store;

pub use analysis::{AnalyzedVariant, ProductAnalysis};
pub use chat::{ChatMessage, ChatRole, ProductContext, StoreContext};
pub use order::{OrderItemSnapshot, OrderStatus};
pub use store::{BannerMessage, StorePlan, StoreSettings};
