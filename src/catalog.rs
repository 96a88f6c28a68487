//! Catalog
//!
//! The in-memory menu: products, category descriptions and promotion bundles. The
//! catalog is immutable once built; every query borrows from it and recomputes its
//! result on each call.

use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    categories::{Category, CategoryInfo, CategoryMap},
    products::{Product, ProductId},
    promotions::{Promotion, PromotionId},
};

pub mod categories;
pub mod filters;
pub mod promotions;
pub mod statistics;

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("Duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// Two promotions share an id.
    #[error("Duplicate promotion id {0}")]
    DuplicatePromotion(PromotionId),

    /// A price is in a different currency from the catalog.
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Catalog currency code
        expected: &'static str,
        /// Offending currency code
        found: &'static str,
    },
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    product_index: FxHashMap<ProductId, usize>,
    categories: CategoryMap<CategoryInfo>,
    promotions: Vec<Promotion>,
    currency: &'static Currency,
}

impl Catalog {
    /// Assemble a catalog, checking id uniqueness and currency consistency.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids or mixed currencies.
    pub fn new(
        products: Vec<Product>,
        categories: CategoryMap<CategoryInfo>,
        promotions: Vec<Promotion>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut product_index = FxHashMap::default();

        for (idx, product) in products.iter().enumerate() {
            check_currency(&product.price, currency)?;

            if product_index.insert(product.id, idx).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
        }

        let mut promotion_ids = FxHashSet::default();

        for promotion in &promotions {
            check_currency(&promotion.price, currency)?;
            check_currency(&promotion.original_price, currency)?;

            if !promotion_ids.insert(promotion.id) {
                return Err(CatalogError::DuplicatePromotion(promotion.id));
            }
        }

        Ok(Self {
            products,
            product_index,
            categories,
            promotions,
            currency,
        })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All promotion bundles in catalog order.
    #[must_use]
    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Currency every price in the catalog is expressed in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn by_id(&self, id: ProductId) -> Option<&Product> {
        self.product_index
            .get(&id)
            .and_then(|&idx| self.products.get(idx))
    }

    /// Products listed under `category`, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.category == category)
            .collect()
    }

    /// Case-insensitive substring search over product names and descriptions.
    ///
    /// An empty term matches every product.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let term = term.to_lowercase();

        self.products
            .iter()
            .filter(|product| product.matches_term(&term))
            .collect()
    }

    /// Products priced within `min..=max`. Returns nothing when `min > max`.
    #[must_use]
    pub fn by_price_range(
        &self,
        min: Money<'_, Currency>,
        max: Money<'_, Currency>,
    ) -> Vec<&Product> {
        let (min, max) = (*min.amount(), *max.amount());

        self.products
            .iter()
            .filter(|product| product.priced_within(min, max))
            .collect()
    }

    /// Products flagged as popular.
    #[must_use]
    pub fn popular(&self) -> Vec<&Product> {
        self.products.iter().filter(|product| product.popular).collect()
    }

    /// Promotional products.
    #[must_use]
    pub fn promotional(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.promotional)
            .collect()
    }

    /// Products that can currently be ordered.
    #[must_use]
    pub fn available(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.available)
            .collect()
    }
}

fn check_currency(
    price: &Money<'_, Currency>,
    currency: &'static Currency,
) -> Result<(), CatalogError> {
    let found = price.currency();

    if found == currency {
        Ok(())
    } else {
        Err(CatalogError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            found: found.iso_alpha_code,
        })
    }
}
