//! Product filters
//!
//! Combines the individual catalog queries into the single filtered list shown on the
//! menu page. Predicates are applied in a fixed order: category, search term, price
//! range, popularity, promotion flag, availability.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{catalog::Catalog, categories::Category, products::Product};

/// Default upper bound of the price filter, in major units ($100.00).
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::ONE_HUNDRED;

/// Product filter state
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    /// Only products in this category
    pub category: Option<Category>,

    /// Case-insensitive term matched against name and description; empty means any
    pub search: String,

    /// Inclusive lower price bound, in major units
    pub min_price: Decimal,

    /// Inclusive upper price bound, in major units
    pub max_price: Decimal,

    /// Only popular products
    pub only_popular: bool,

    /// Only promotional products
    pub only_promotions: bool,

    /// Only products that can be ordered
    pub only_available: bool,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: String::new(),
            min_price: Decimal::ZERO,
            max_price: DEFAULT_MAX_PRICE,
            only_popular: false,
            only_promotions: false,
            only_available: true,
        }
    }
}

impl ProductFilter {
    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Restrict to products matching a search term.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Restrict to an inclusive price range.
    #[must_use]
    pub fn with_price_range(mut self, min: Money<'_, Currency>, max: Money<'_, Currency>) -> Self {
        self.min_price = *min.amount();
        self.max_price = *max.amount();
        self
    }

    /// Flip the popular-only flag.
    pub fn toggle_popular(&mut self) {
        self.only_popular = !self.only_popular;
    }

    /// Flip the promotions-only flag.
    pub fn toggle_promotions(&mut self) {
        self.only_promotions = !self.only_promotions;
    }

    /// Flip the available-only flag.
    pub fn toggle_available(&mut self) {
        self.only_available = !self.only_available;
    }

    /// Reset every filter to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether a product passes every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_lowered(product, &self.search.to_lowercase())
    }

    /// [`ProductFilter::matches`] with the search term already lowercased.
    fn matches_lowered(&self, product: &Product, term: &str) -> bool {
        self.category.is_none_or(|category| product.category == category)
            && product.matches_term(term)
            && product.priced_within(self.min_price, self.max_price)
            && (!self.only_popular || product.popular)
            && (!self.only_promotions || product.promotional)
            && (!self.only_available || product.available)
    }
}

impl Catalog {
    /// Products passing `filter`, in catalog order.
    #[must_use]
    pub fn filter(&self, filter: &ProductFilter) -> Vec<&Product> {
        let term = filter.search.to_lowercase();

        self.products
            .iter()
            .filter(|product| filter.matches_lowered(product, &term))
            .collect()
    }
}
