//! Promotions
//!
//! Promotion bundles are advertised separately from the product list. A bundle names its
//! contents by free text only; nothing ties a [`PromotionItem`] back to a catalog
//! [`Product`](crate::products::Product).

use std::fmt;

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::categories::Category;

/// Promotion identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromotionId(u32);

impl PromotionId {
    /// Create a new promotion id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line of a promotion bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionItem {
    /// Item name
    pub name: String,

    /// Number of units included
    pub quantity: u32,
}

/// Promotion bundle
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    /// Promotion id
    pub id: PromotionId,

    /// Promotion name
    pub name: String,

    /// Promotion description
    pub description: String,

    /// Bundle price
    pub price: Money<'static, Currency>,

    /// Price of the bundle contents bought separately
    pub original_price: Money<'static, Currency>,

    /// Advertised discount
    pub discount: Percentage,

    /// Image reference
    pub image: String,

    /// Category the promotion is listed under
    pub category: Category,

    /// Whether the promotion is switched on
    pub active: bool,

    /// End of the promotion
    pub valid_until: Timestamp,

    /// Bundle contents
    pub items: Vec<PromotionItem>,

    /// Terms and conditions
    pub terms: String,

    /// Whether the promotion is flagged as popular
    pub popular: bool,
}

impl Promotion {
    /// A promotion is valid when it is active and has not expired yet.
    #[must_use]
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.active && self.valid_until > now
    }

    /// Amount saved compared to buying the contents separately.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the prices are in different currencies.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.original_price.sub(self.price)
    }

    /// Savings as a fraction of the original price.
    ///
    /// A zero original price yields a zero percentage.
    #[must_use]
    pub fn savings_percent(&self) -> Percentage {
        let original = self.original_price.to_minor_units();

        if original == 0 {
            return Percentage::from(Decimal::ZERO);
        }

        let saved = original - self.price.to_minor_units();

        Percentage::from(Decimal::from(saved) / Decimal::from(original))
    }

    /// Summary of the promotion with preformatted prices.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the prices are in different currencies.
    pub fn summary(&self, now: Timestamp) -> Result<PromotionSummary, MoneyError> {
        Ok(PromotionSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.to_string(),
            original_price: self.original_price.to_string(),
            savings: self.savings()?.to_string(),
            savings_percent: percent_points(self.savings_percent())
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            valid: self.is_valid_at(now),
            popular: self.popular,
            items_count: self.items.len(),
        })
    }

    /// Case-insensitive match of an already lowercased term against name or description.
    pub(crate) fn matches_term(&self, lowered_term: &str) -> bool {
        self.name.to_lowercase().contains(lowered_term)
            || self.description.to_lowercase().contains(lowered_term)
    }
}

/// Display-ready promotion summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionSummary {
    /// Promotion id
    pub id: PromotionId,

    /// Promotion name
    pub name: String,

    /// Promotion description
    pub description: String,

    /// Formatted bundle price
    pub price: String,

    /// Formatted original price
    pub original_price: String,

    /// Formatted savings
    pub savings: String,

    /// Savings in whole percent points
    pub savings_percent: Decimal,

    /// Whether the promotion is currently valid
    pub valid: bool,

    /// Whether the promotion is flagged as popular
    pub popular: bool,

    /// Number of distinct lines in the bundle
    pub items_count: usize,
}

/// Converts a fractional percentage to percent points for display.
pub fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to get percent points.
    (percentage * Decimal::ONE) * Decimal::ONE_HUNDRED
}

#[cfg(test)]
pub(crate) mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    pub(crate) fn promotion(id: u32, price_minor: i64, original_minor: i64) -> Promotion {
        Promotion {
            id: PromotionId::new(id),
            name: format!("Promo {id}"),
            description: "2 Encebollados + 2 Chifles + 2 Jugos".to_string(),
            price: Money::from_minor(price_minor, USD),
            original_price: Money::from_minor(original_minor, USD),
            discount: Percentage::from(0.2),
            image: format!("promo-{id}.jpg"),
            category: Category::Promotions,
            active: true,
            valid_until: Timestamp::from_second(1_735_603_200).unwrap_or(Timestamp::MAX),
            items: vec![
                PromotionItem {
                    name: "Encebollado".to_string(),
                    quantity: 2,
                },
                PromotionItem {
                    name: "Chifle".to_string(),
                    quantity: 2,
                },
            ],
            terms: "Válido solo para pedidos por WhatsApp.".to_string(),
            popular: false,
        }
    }

    #[test]
    fn savings_is_original_minus_price() -> TestResult {
        let promo = promotion(1, 1299, 1680);

        assert_eq!(promo.savings()?, Money::from_minor(381, USD));

        Ok(())
    }

    #[test]
    fn savings_percent_is_relative_to_original_price() {
        let promo = promotion(1, 750, 1000);

        assert_eq!(percent_points(promo.savings_percent()), Decimal::from(25));
    }

    #[test]
    fn savings_percent_of_free_original_is_zero() {
        let promo = promotion(1, 0, 0);

        assert_eq!(percent_points(promo.savings_percent()), Decimal::ZERO);
    }

    #[test]
    fn validity_requires_active_and_future_expiry() -> TestResult {
        let mut promo = promotion(1, 1299, 1680);
        let before: Timestamp = "2024-06-01T00:00:00Z".parse()?;
        let after: Timestamp = "2025-06-01T00:00:00Z".parse()?;

        assert!(promo.is_valid_at(before));
        assert!(!promo.is_valid_at(after));

        promo.active = false;

        assert!(!promo.is_valid_at(before));

        Ok(())
    }

    #[test]
    fn summary_formats_prices() -> TestResult {
        let promo = promotion(2, 1999, 2640);
        let now: Timestamp = "2024-06-01T00:00:00Z".parse()?;

        let summary = promo.summary(now)?;

        assert_eq!(summary.price, "$19.99");
        assert_eq!(summary.original_price, "$26.40");
        assert_eq!(summary.savings, "$6.41");
        assert_eq!(summary.savings_percent, Decimal::from(24));
        assert!(summary.valid);
        assert_eq!(summary.items_count, 2);

        Ok(())
    }

    #[test]
    fn summary_rounds_half_percent_up() -> TestResult {
        let promo = promotion(3, 875, 1000);
        let now: Timestamp = "2024-06-01T00:00:00Z".parse()?;

        assert_eq!(percent_points(promo.savings_percent()), Decimal::new(125, 1));
        assert_eq!(promo.summary(now)?.savings_percent, Decimal::from(13));

        Ok(())
    }
}
