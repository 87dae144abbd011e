//! Catalog Filter Engine
//!
//! Derives the visible product list from a free-text query and a category
//! selector. Pure function of (products, query, category) — recomputed on
//! every keystroke, no index, no ranking.

use crate::db::models::Product;

/// Category selector of the storefront filter bar
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// "Tudo"
    #[default]
    All,
    /// Synthetic "🔥 Promoções" selector — products with a promo price
    Promo,
    /// A named category ("vestido", "blusa", …)
    Category(String),
}

impl CategoryFilter {
    /// Parse the wire form: empty = all, "sale" = promo, anything else is a
    /// category name.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" => Self::All,
            "sale" => Self::Promo,
            other => Self::Category(other.to_string()),
        }
    }
}

/// Filter the product list by category and free-text query.
///
/// The query matches as a case-insensitive substring over name, category and
/// description. Order of the input list is preserved.
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    category: &CategoryFilter,
) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();

    products
        .iter()
        .filter(|p| match category {
            CategoryFilter::All => true,
            CategoryFilter::Promo => p.promo_price.is_some(),
            CategoryFilter::Category(c) => &p.category == c,
        })
        .filter(|p| {
            if query.is_empty() {
                return true;
            }
            p.name.to_lowercase().contains(&query)
                || p.category.contains(&query)
                || p.description.to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: &str, description: &str, promo: Option<f64>) -> Product {
        Product {
            id: None,
            store: "store:s1".parse().unwrap(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            price: 100.0,
            promo_price: promo,
            variants: vec![],
            is_active: true,
            created_at: 0,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Vestido Midi Floral", "vestido", "Leve, ideal para festas", None),
            product("Blusa Canelada", "blusa", "Básica para o dia a dia", Some(39.9)),
            product("Calça Wide Leg", "calca", "Cintura alta", None),
        ]
    }

    #[test]
    fn test_no_filters_returns_all() {
        let products = catalog();
        let result = filter_products(&products, "", &CategoryFilter::All);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        let result = filter_products(
            &products,
            "",
            &CategoryFilter::Category("vestido".to_string()),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Vestido Midi Floral");
    }

    #[test]
    fn test_promo_filter() {
        let products = catalog();
        let result = filter_products(&products, "", &CategoryFilter::Promo);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Blusa Canelada");
    }

    #[test]
    fn test_query_is_case_insensitive_across_fields() {
        let products = catalog();

        // name
        let result = filter_products(&products, "FLORAL", &CategoryFilter::All);
        assert_eq!(result.len(), 1);

        // description
        let result = filter_products(&products, "cintura", &CategoryFilter::All);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Calça Wide Leg");

        // category
        let result = filter_products(&products, "blusa", &CategoryFilter::All);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_query_and_category_combine() {
        let products = catalog();
        let result = filter_products(
            &products,
            "festa",
            &CategoryFilter::Category("blusa".to_string()),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let products = catalog();
        let first: Vec<Product> = filter_products(&products, "a", &CategoryFilter::All)
            .into_iter()
            .cloned()
            .collect();
        let second = filter_products(&first, "a", &CategoryFilter::All);
        assert_eq!(second.len(), first.len());
        for (a, b) in first.iter().zip(second) {
            assert_eq!(a.name, b.name);
        }
    }

    #[test]
    fn test_parse_wire_form() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("sale"), CategoryFilter::Promo);
        assert_eq!(
            CategoryFilter::parse("saia"),
            CategoryFilter::Category("saia".to_string())
        );
    }
}
