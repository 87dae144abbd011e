//! Store context builder for the assistant
//!
//! Snapshots the catalog into the compact per-product summary Vi receives.
//! Out-of-stock products stay in the context (flagged) so Vi can answer
//! questions about them without recommending them.

use shared::models::{ProductContext, StoreContext};

use crate::catalog::stock;
use crate::db::models::{Product, Store};

/// Build the assistant context from a store and its active products
pub fn build_store_context(store: &Store, products: &[Product]) -> StoreContext {
    StoreContext {
        name: store.name.clone(),
        frete_info: store.settings.frete_info.clone(),
        pagamento_info: store.settings.pagamento_info.clone(),
        products: products.iter().map(product_context).collect(),
    }
}

fn product_context(product: &Product) -> ProductContext {
    ProductContext {
        name: product.name.clone(),
        category: product.category.clone(),
        price: product.display_price(),
        sizes: stock::all_sizes_in_stock(product),
        colors: product.variants.iter().map(|v| v.color.clone()).collect(),
        in_stock: !stock::is_sold_out(product),
    }
}
