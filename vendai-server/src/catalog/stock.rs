//! Variant/Stock Resolver
//!
//! Stock here is advisory — it gates what the storefront offers, but is
//! never reserved or decremented at checkout.

use crate::db::models::{Product, Variant};

/// Threshold at or below which a product counts as low stock
const LOW_STOCK_THRESHOLD: i32 = 3;

/// Canonical size ordering for display (unknown labels sort last, by name)
const SIZE_ORDER: &[&str] = &["PP", "P", "M", "G", "GG", "Único"];

fn size_rank(label: &str) -> usize {
    SIZE_ORDER
        .iter()
        .position(|s| *s == label)
        .unwrap_or(SIZE_ORDER.len())
}

/// Size labels with positive stock for one variant, canonically ordered
pub fn sizes_in_stock(variant: &Variant) -> Vec<String> {
    let mut sizes: Vec<String> = variant
        .stock
        .iter()
        .filter(|(_, q)| **q > 0)
        .map(|(s, _)| s.clone())
        .collect();
    sizes.sort_by(|a, b| size_rank(a).cmp(&size_rank(b)).then_with(|| a.cmp(b)));
    sizes
}

/// First in-stock size for a variant — the default when the shopper adds
/// to cart without picking one
pub fn default_size(variant: &Variant) -> Option<String> {
    sizes_in_stock(variant).into_iter().next()
}

/// Total stock across every variant and size of a product
pub fn total_stock(product: &Product) -> i32 {
    product.variants.iter().map(Variant::total_stock).sum()
}

/// Every variant, every size at zero
pub fn is_sold_out(product: &Product) -> bool {
    product.variants.iter().all(Variant::is_out_of_stock)
}

/// Total stock in (0, 3]. Sold-out takes precedence: a product with zero
/// stock is never low-stock.
pub fn is_low_stock(product: &Product) -> bool {
    let total = total_stock(product);
    total > 0 && total <= LOW_STOCK_THRESHOLD
}

/// Size labels with positive stock across all variants (assistant context)
pub fn all_sizes_in_stock(product: &Product) -> Vec<String> {
    let mut sizes: Vec<String> = Vec::new();
    for variant in &product.variants {
        for size in sizes_in_stock(variant) {
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }
    }
    sizes.sort_by(|a, b| size_rank(a).cmp(&size_rank(b)).then_with(|| a.cmp(b)));
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, stock: &[(&str, i32)]) -> Variant {
        Variant {
            id: id.to_string(),
            color: "Azul".to_string(),
            color_hex: "#0000FF".to_string(),
            photos: vec![],
            stock: stock.iter().map(|(s, q)| (s.to_string(), *q)).collect(),
        }
    }

    fn product(variants: Vec<Variant>) -> Product {
        Product {
            id: None,
            store: "store:s1".parse().unwrap(),
            name: "Vestido".to_string(),
            description: String::new(),
            category: "vestido".to_string(),
            price: 100.0,
            promo_price: None,
            variants,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_sizes_in_stock_ordering() {
        let v = variant("v1", &[("G", 1), ("P", 2), ("M", 0), ("PP", 4)]);
        assert_eq!(sizes_in_stock(&v), vec!["PP", "P", "G"]);
    }

    #[test]
    fn test_unknown_sizes_sort_last() {
        let v = variant("v1", &[("44", 1), ("M", 1), ("38", 1)]);
        assert_eq!(sizes_in_stock(&v), vec!["M", "38", "44"]);
    }

    #[test]
    fn test_default_size_is_first_in_stock() {
        let v = variant("v1", &[("G", 1), ("M", 2)]);
        assert_eq!(default_size(&v).as_deref(), Some("M"));

        let empty = variant("v1", &[("M", 0)]);
        assert_eq!(default_size(&empty), None);
    }

    #[test]
    fn test_sold_out_requires_every_variant_empty() {
        let p = product(vec![
            variant("v1", &[("M", 0)]),
            variant("v2", &[("P", 0), ("G", 0)]),
        ]);
        assert!(is_sold_out(&p));

        let p = product(vec![variant("v1", &[("M", 0)]), variant("v2", &[("G", 1)])]);
        assert!(!is_sold_out(&p));
    }

    #[test]
    fn test_low_stock_band() {
        for total in 1..=3 {
            let p = product(vec![variant("v1", &[("M", total)])]);
            assert!(is_low_stock(&p), "total {total} should be low stock");
            assert!(!is_sold_out(&p));
        }

        let p = product(vec![variant("v1", &[("M", 4)])]);
        assert!(!is_low_stock(&p));
    }

    #[test]
    fn test_sold_out_takes_precedence_over_low_stock() {
        let p = product(vec![variant("v1", &[("M", 0)])]);
        assert!(is_sold_out(&p));
        assert!(!is_low_stock(&p));
    }

    #[test]
    fn test_low_stock_sums_across_variants_and_sizes() {
        let p = product(vec![
            variant("v1", &[("M", 1), ("G", 1)]),
            variant("v2", &[("P", 1)]),
        ]);
        assert_eq!(total_stock(&p), 3);
        assert!(is_low_stock(&p));

        let p = product(vec![
            variant("v1", &[("M", 2), ("G", 1)]),
            variant("v2", &[("P", 1)]),
        ]);
        assert!(!is_low_stock(&p));
    }

    #[test]
    fn test_all_sizes_deduplicated() {
        let p = product(vec![
            variant("v1", &[("M", 1), ("P", 1)]),
            variant("v2", &[("M", 2), ("G", 1)]),
        ]);
        assert_eq!(all_sizes_in_stock(&p), vec!["P", "M", "G"]);
    }

    #[test]
    fn test_product_with_no_variants_is_sold_out() {
        let p = product(vec![]);
        assert!(is_sold_out(&p));
        assert!(!is_low_stock(&p));
        assert!(all_sizes_in_stock(&p).is_empty());
    }
}
