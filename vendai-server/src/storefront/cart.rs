//! Cart Ledger
//!
//! The in-session, unpersisted shopping cart: an ordered list of lines
//! keyed by (product, variant, size). Nothing here touches the database —
//! persistence happens only at checkout.

use shared::client::CartLineView;
use shared::models::OrderItemSnapshot;

use crate::money::{self, line_total, to_decimal, to_f64};
use crate::utils::{AppError, AppResult, ErrorCode};
use rust_decimal::Decimal;

/// One line of the ledger, price snapshotted at add time
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: String,
    pub variant_id: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub qty: i32,
    /// Unit price captured when the line was added; later catalog edits
    /// do not touch it
    pub price: f64,
    pub photo: Option<String>,
}

impl CartLine {
    fn key(&self) -> (&str, &str, &str) {
        (&self.product_id, &self.variant_id, &self.size)
    }
}

/// Ordered list of cart lines with merge-by-key adds
#[derive(Debug, Default)]
pub struct CartLedger {
    lines: Vec<CartLine>,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a resolved line. An existing entry with the same
    /// (product, variant, size) key gains quantity instead of duplicating.
    pub fn add(&mut self, line: CartLine) -> AppResult<()> {
        money::validate_price(line.price)?;

        if let Some(existing) = self.lines.iter_mut().find(|l| l.key() == line.key()) {
            existing.qty += 1;
        } else {
            self.lines.push(CartLine { qty: 1, ..line });
        }
        Ok(())
    }

    /// Add `delta` to the quantity at `index`; a resulting quantity ≤ 0
    /// removes the entry, shifting later indices down by one.
    pub fn change_qty(&mut self, index: usize, delta: i32) -> AppResult<()> {
        let line = self.lines.get_mut(index).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CartIndexOutOfRange,
                format!("no cart line at index {}", index),
            )
        })?;

        let new_qty = line.qty + delta;
        if new_qty <= 0 {
            self.lines.remove(index);
        } else {
            money::validate_quantity(new_qty)?;
            line.qty = new_qty;
        }
        Ok(())
    }

    /// Unconditionally delete the entry at `index`
    pub fn remove(&mut self, index: usize) -> AppResult<()> {
        if index >= self.lines.len() {
            return Err(AppError::with_message(
                ErrorCode::CartIndexOutOfRange,
                format!("no cart line at index {}", index),
            ));
        }
        self.lines.remove(index);
        Ok(())
    }

    /// Σ price × qty over all lines — derived fresh on every call, never
    /// stored
    pub fn total(&self) -> f64 {
        let total: Decimal = self
            .lines
            .iter()
            .map(|l| line_total(l.price, l.qty))
            .fold(to_decimal(0.0), |acc, t| acc + t);
        to_f64(total)
    }

    /// Total unit count (cart badge)
    pub fn total_qty(&self) -> i32 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Freeze the ledger into order item snapshots (checkout)
    pub fn snapshot(&self) -> Vec<OrderItemSnapshot> {
        self.lines
            .iter()
            .map(|l| OrderItemSnapshot {
                product_id: l.product_id.clone(),
                name: l.name.clone(),
                size: l.size.clone(),
                color: l.color.clone(),
                qty: l.qty,
                price: l.price,
            })
            .collect()
    }

    /// Shopper-facing view with line totals
    pub fn views(&self) -> Vec<CartLineView> {
        self.lines
            .iter()
            .map(|l| CartLineView {
                product_id: l.product_id.clone(),
                variant_id: l.variant_id.clone(),
                name: l.name.clone(),
                size: l.size.clone(),
                color: l.color.clone(),
                qty: l.qty,
                price: l.price,
                photo: l.photo.clone(),
                line_total: to_f64(line_total(l.price, l.qty)),
            })
            .collect()
    }
}

/// Resolve an add-to-cart request against the live catalog.
///
/// Applies the stock rules: a fully sold-out product is refused, a size is
/// required to have stock for the chosen color, and an omitted size
/// defaults to the first in-stock size of that variant. The returned line
/// carries the price snapshot (promo price wins) and the cover photo.
pub fn resolve_cart_line(
    product: &crate::db::models::Product,
    variant_id: &str,
    size: Option<&str>,
) -> AppResult<CartLine> {
    use crate::catalog::stock;

    let product_id = product
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("product without id in catalog"))?;

    if stock::is_sold_out(product) {
        return Err(AppError::new(ErrorCode::ProductOutOfStock));
    }

    let variant = product
        .variant_by_id(variant_id)
        .ok_or_else(|| AppError::new(ErrorCode::VariantNotFound))?;

    let size = match size {
        Some(requested) => {
            if variant.stock.get(requested).copied().unwrap_or(0) <= 0 {
                return Err(AppError::new(ErrorCode::SizeUnavailable));
            }
            requested.to_string()
        }
        // No size picked: first in-stock size for this color, refuse when
        // the color has none
        None => stock::default_size(variant)
            .ok_or_else(|| AppError::new(ErrorCode::SizeUnavailable))?,
    };

    Ok(CartLine {
        product_id,
        variant_id: variant.id.clone(),
        name: product.name.clone(),
        size,
        color: variant.color.clone(),
        qty: 1,
        price: product.display_price(),
        photo: variant.cover_photo().map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: &str, variant: &str, size: &str, price: f64) -> CartLine {
        CartLine {
            product_id: product.to_string(),
            variant_id: variant.to_string(),
            name: format!("Produto {product}"),
            size: size.to_string(),
            color: "Azul".to_string(),
            qty: 1,
            price,
            photo: None,
        }
    }

    #[test]
    fn test_add_merges_by_key() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].qty, 3);
    }

    #[test]
    fn test_distinct_keys_stay_distinct() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        cart.add(line("a", "v1", "G", 50.0)).unwrap();
        cart.add(line("a", "v2", "M", 50.0)).unwrap();
        cart.add(line("b", "v1", "M", 30.0)).unwrap();

        assert_eq!(cart.len(), 4);
        assert!(cart.lines().iter().all(|l| l.qty == 1));
    }

    #[test]
    fn test_repeated_adds_count_per_key() {
        let mut cart = CartLedger::new();
        for _ in 0..3 {
            cart.add(line("a", "v1", "M", 50.0)).unwrap();
        }
        for _ in 0..2 {
            cart.add(line("b", "v1", "P", 30.0)).unwrap();
        }

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].qty, 3);
        assert_eq!(cart.lines()[1].qty, 2);
    }

    #[test]
    fn test_total_recomputed_fresh() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        cart.add(line("b", "v1", "P", 30.0)).unwrap();
        cart.add(line("b", "v1", "P", 30.0)).unwrap();
        assert_eq!(cart.total(), 110.0);

        cart.change_qty(1, -1).unwrap();
        assert_eq!(cart.total(), 80.0);

        cart.remove(1).unwrap();
        assert_eq!(cart.total(), 50.0);

        cart.clear();
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_change_qty_to_zero_removes_and_shifts() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        cart.add(line("b", "v1", "P", 30.0)).unwrap();
        cart.add(line("c", "v1", "G", 20.0)).unwrap();

        cart.change_qty(1, -1).unwrap();
        assert_eq!(cart.len(), 2);
        // Index 1 now addresses what used to be index 2
        assert_eq!(cart.lines()[1].product_id, "c");
    }

    #[test]
    fn test_change_qty_below_zero_also_removes() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        cart.change_qty(0, -5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_qty_respects_sanity_bound() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();

        let err = cart.change_qty(0, 100_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        // Failed change leaves the quantity as it was
        assert_eq!(cart.lines()[0].qty, 1);
    }

    #[test]
    fn test_out_of_range_index_is_error() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();

        let err = cart.change_qty(3, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartIndexOutOfRange);
        let err = cart.remove(3).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartIndexOutOfRange);
        // Ledger untouched
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_price_snapshot_survives_merge() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        // Same key added again with a different live price: quantity merges,
        // the snapshot price from the first add wins
        cart.add(line("a", "v1", "M", 45.0)).unwrap();

        assert_eq!(cart.lines()[0].price, 50.0);
        assert_eq!(cart.total(), 100.0);
    }

    #[test]
    fn test_decimal_totals_do_not_drift() {
        let mut cart = CartLedger::new();
        for _ in 0..10 {
            cart.add(line("a", "v1", "M", 0.1)).unwrap();
        }
        assert_eq!(cart.total(), 1.0);
    }

    #[test]
    fn test_snapshot_freezes_lines() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();
        cart.add(line("a", "v1", "M", 50.0)).unwrap();

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].qty, 2);
        assert_eq!(snapshot[0].price, 50.0);

        cart.clear();
        // Snapshot is an independent copy
        assert_eq!(snapshot[0].qty, 2);
    }

    #[test]
    fn test_views_carry_line_totals() {
        let mut cart = CartLedger::new();
        cart.add(line("a", "v1", "M", 49.9)).unwrap();
        cart.add(line("a", "v1", "M", 49.9)).unwrap();

        let views = cart.views();
        assert_eq!(views[0].line_total, 99.8);
        assert_eq!(cart.total_qty(), 2);
    }

    mod resolve {
        use super::*;
        use crate::db::models::{Product, Variant};

        fn product(variants: Vec<Variant>, promo: Option<f64>) -> Product {
            Product {
                id: Some("product:p1".parse().unwrap()),
                store: "store:s1".parse().unwrap(),
                name: "Vestido Midi".to_string(),
                description: String::new(),
                category: "vestido".to_string(),
                price: 120.0,
                promo_price: promo,
                variants,
                is_active: true,
                created_at: 0,
            }
        }

        fn variant(id: &str, stock: &[(&str, i32)]) -> Variant {
            Variant {
                id: id.to_string(),
                color: "Azul".to_string(),
                color_hex: "#0000FF".to_string(),
                photos: vec!["foto.jpg".to_string()],
                stock: stock.iter().map(|(s, q)| (s.to_string(), *q)).collect(),
            }
        }

        #[test]
        fn test_resolves_default_size_and_promo_price() {
            let p = product(vec![variant("v1", &[("G", 1), ("M", 2)])], Some(89.9));
            let line = resolve_cart_line(&p, "v1", None).unwrap();
            assert_eq!(line.size, "M");
            assert_eq!(line.price, 89.9);
            assert_eq!(line.qty, 1);
            assert_eq!(line.photo.as_deref(), Some("foto.jpg"));
        }

        #[test]
        fn test_requested_size_must_have_stock() {
            let p = product(vec![variant("v1", &[("M", 2), ("G", 0)])], None);
            assert!(resolve_cart_line(&p, "v1", Some("M")).is_ok());

            let err = resolve_cart_line(&p, "v1", Some("G")).unwrap_err();
            assert_eq!(err.code, ErrorCode::SizeUnavailable);
            let err = resolve_cart_line(&p, "v1", Some("XG")).unwrap_err();
            assert_eq!(err.code, ErrorCode::SizeUnavailable);
        }

        #[test]
        fn test_sold_out_product_refused() {
            let p = product(vec![variant("v1", &[("M", 0)])], None);
            let err = resolve_cart_line(&p, "v1", None).unwrap_err();
            assert_eq!(err.code, ErrorCode::ProductOutOfStock);
        }

        #[test]
        fn test_empty_color_refused_even_when_product_available() {
            let p = product(
                vec![variant("v1", &[("M", 0)]), variant("v2", &[("M", 1)])],
                None,
            );
            let err = resolve_cart_line(&p, "v1", None).unwrap_err();
            assert_eq!(err.code, ErrorCode::SizeUnavailable);
        }

        #[test]
        fn test_unknown_variant() {
            let p = product(vec![variant("v1", &[("M", 1)])], None);
            let err = resolve_cart_line(&p, "v9", None).unwrap_err();
            assert_eq!(err.code, ErrorCode::VariantNotFound);
        }
    }
}
