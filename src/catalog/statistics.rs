//! Catalog statistics
//!
//! Read-only aggregates recomputed on every call. Aggregates that are undefined over an
//! empty set (minimum, maximum, averages) are reported as
//! [`StatisticsError::EmptyAggregate`] instead of a numeric sentinel.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{Catalog, promotions::DEFAULT_EXPIRY_WINDOW_DAYS},
    categories::{Category, CategoryMap},
    products::Product,
};

/// Errors raised while computing aggregates.
#[derive(Debug, Error, PartialEq)]
pub enum StatisticsError {
    /// The aggregate is undefined because there is nothing to aggregate.
    #[error("aggregate over an empty set is undefined")]
    EmptyAggregate,

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price bounds and mean of a set of prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStatistics {
    /// Lowest price
    pub min: Money<'static, Currency>,

    /// Highest price
    pub max: Money<'static, Currency>,

    /// Mean price in major units, unrounded
    pub average: Decimal,
}

impl PriceStatistics {
    /// Compute statistics over `prices`.
    ///
    /// # Errors
    ///
    /// - [`StatisticsError::EmptyAggregate`]: `prices` is empty.
    pub fn from_prices(
        prices: impl IntoIterator<Item = Money<'static, Currency>>,
    ) -> Result<Self, StatisticsError> {
        let mut prices = prices.into_iter();

        let first = prices.next().ok_or(StatisticsError::EmptyAggregate)?;

        let (min, max, sum, count) = prices.fold(
            (first, first, *first.amount(), 1_u32),
            |(min, max, sum, count), price| {
                let min = if price.to_minor_units() < min.to_minor_units() {
                    price
                } else {
                    min
                };

                let max = if price.to_minor_units() > max.to_minor_units() {
                    price
                } else {
                    max
                };

                (min, max, sum + *price.amount(), count.saturating_add(1))
            },
        );

        Ok(Self {
            min,
            max,
            average: sum / Decimal::from(count),
        })
    }
}

/// Whole-catalog product statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStatistics {
    /// Number of products
    pub total: usize,

    /// Number of popular products
    pub popular: usize,

    /// Number of promotional products
    pub promotional: usize,

    /// Number of available products
    pub available: usize,

    /// Product count per category
    pub by_category: CategoryMap<usize>,

    /// Price statistics over every product
    pub prices: PriceStatistics,
}

/// Statistics for a single category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStatistics {
    /// Category
    pub category: Category,

    /// Number of products in the category
    pub total: usize,

    /// Number of available products
    pub available: usize,

    /// Number of popular products
    pub popular: usize,

    /// Number of promotional products
    pub promotional: usize,

    /// Price statistics, absent for an empty category
    pub prices: Option<PriceStatistics>,
}

/// Category overview
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOverview {
    /// Number of categories
    pub total: usize,

    /// Number of categories listing at least one product
    pub with_products: usize,

    /// Number of categories with a popular product
    pub featured: usize,

    /// Number of categories with a promotional product
    pub promotional: usize,

    /// Per-category statistics
    pub statistics: CategoryMap<CategoryStatistics>,
}

/// Promotion statistics
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionStatistics {
    /// Number of promotions
    pub total: usize,

    /// Number of active promotions
    pub active: usize,

    /// Number of promotions valid at the reference instant
    pub valid: usize,

    /// Number of popular promotions
    pub popular: usize,

    /// Number of promotions ending within the default window
    pub expiring_soon: usize,

    /// Sum of every promotion's savings
    pub total_savings: Money<'static, Currency>,

    /// Mean advertised discount
    pub average_discount: Percentage,

    /// Mean bundle price in major units, unrounded
    pub average_price: Decimal,
}

impl Catalog {
    /// Product count for every category, including empty ones.
    #[must_use]
    pub fn counts_by_category(&self) -> CategoryMap<usize> {
        let mut counts = CategoryMap::<usize>::default();

        for product in &self.products {
            *counts.get_mut(product.category) += 1;
        }

        counts
    }

    /// Price statistics over every product.
    ///
    /// # Errors
    ///
    /// - [`StatisticsError::EmptyAggregate`]: the catalog has no products.
    pub fn price_statistics(&self) -> Result<PriceStatistics, StatisticsError> {
        PriceStatistics::from_prices(self.products.iter().map(|product| product.price))
    }

    /// Whole-catalog product statistics.
    ///
    /// # Errors
    ///
    /// - [`StatisticsError::EmptyAggregate`]: the catalog has no products.
    pub fn product_statistics(&self) -> Result<ProductStatistics, StatisticsError> {
        Ok(ProductStatistics {
            total: self.products.len(),
            popular: self.popular().len(),
            promotional: self.promotional().len(),
            available: self.available().len(),
            by_category: self.counts_by_category(),
            prices: self.price_statistics()?,
        })
    }

    /// Statistics for one category. Price statistics are absent when it is empty.
    #[must_use]
    pub fn category_statistics(&self, category: Category) -> CategoryStatistics {
        let products = self.by_category(category);

        CategoryStatistics {
            category,
            total: products.len(),
            available: count(&products, |product| product.available),
            popular: count(&products, |product| product.popular),
            promotional: count(&products, |product| product.promotional),
            prices: PriceStatistics::from_prices(products.iter().map(|product| product.price))
                .ok(),
        }
    }

    /// Statistics for every category.
    #[must_use]
    pub fn all_category_statistics(&self) -> CategoryMap<CategoryStatistics> {
        CategoryMap::from_fn(|category| self.category_statistics(category))
    }

    /// Overview of how the menu is spread across categories.
    #[must_use]
    pub fn category_overview(&self) -> CategoryOverview {
        CategoryOverview {
            total: Category::ALL.len(),
            with_products: self.categories_with_products().len(),
            featured: self.featured_categories().len(),
            promotional: self.promotional_categories().len(),
            statistics: self.all_category_statistics(),
        }
    }

    /// Promotion statistics relative to `now`.
    ///
    /// # Errors
    ///
    /// - [`StatisticsError::EmptyAggregate`]: the catalog has no promotions.
    /// - [`StatisticsError::Money`]: savings could not be summed.
    pub fn promotion_statistics(
        &self,
        now: Timestamp,
    ) -> Result<PromotionStatistics, StatisticsError> {
        if self.promotions.is_empty() {
            return Err(StatisticsError::EmptyAggregate);
        }

        let count = Decimal::from(self.promotions.len());

        let total_savings = self
            .promotions
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, promotion| {
                acc.add(promotion.savings()?)
            })?;

        let discount_sum: Decimal = self
            .promotions
            .iter()
            .map(|promotion| promotion.discount * Decimal::ONE)
            .sum();

        let price_sum: Decimal = self
            .promotions
            .iter()
            .map(|promotion| *promotion.price.amount())
            .sum();

        Ok(PromotionStatistics {
            total: self.promotions.len(),
            active: self.active_promotions().len(),
            valid: self.valid_promotions(now).len(),
            popular: self.popular_promotions().len(),
            expiring_soon: self
                .promotions_expiring_soon(now, DEFAULT_EXPIRY_WINDOW_DAYS)
                .len(),
            total_savings,
            average_discount: Percentage::from(discount_sum / count),
            average_price: price_sum / count,
        })
    }
}

fn count(products: &[&Product], predicate: impl Fn(&Product) -> bool) -> usize {
    products.iter().filter(|product| predicate(product)).count()
}
