//! Products

use std::fmt;

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::categories::Category;

/// Product identifier, stable across catalog reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a new product id.
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

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Promotional pricing attached to a product.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionDetails {
    /// Price before the promotion
    pub original_price: Money<'static, Currency>,

    /// Advertised discount
    pub discount: Percentage,

    /// End of the promotion
    pub valid_until: Timestamp,
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price. For promotional products this is already the promotional price.
    pub price: Money<'static, Currency>,

    /// Product description
    pub description: String,

    /// Image reference
    pub image: String,

    /// Category the product is listed under
    pub category: Category,

    /// Whether the product can currently be ordered
    pub available: bool,

    /// Whether the product is flagged as popular
    pub popular: bool,

    /// Whether the product is a promotion
    pub promotional: bool,

    /// Promotion pricing, when the product carries one
    pub promotion_details: Option<PromotionDetails>,
}

impl Product {
    /// Case-insensitive match of an already lowercased term against name or description.
    ///
    /// An empty term matches every product.
    pub(crate) fn matches_term(&self, lowered_term: &str) -> bool {
        self.name.to_lowercase().contains(lowered_term)
            || self.description.to_lowercase().contains(lowered_term)
    }

    /// Whether the price lies within `min..=max` (major units).
    pub(crate) fn priced_within(&self, min: Decimal, max: Decimal) -> bool {
        let price = *self.price.amount();

        price >= min && price <= max
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rusty_money::iso::USD;

    use super::*;

    /// Build a plain product for tests.
    pub(crate) fn product(id: u32, name: &str, price_minor: i64, category: Category) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Money::from_minor(price_minor, USD),
            description: format!("{name} de la casa"),
            image: format!("{id}.jpg"),
            category,
            available: true,
            popular: false,
            promotional: false,
            promotion_details: None,
        }
    }

    #[test]
    fn matches_term_checks_name_and_description() {
        let mut encebollado = product(4, "Encebollado Normal", 440, Category::Encebollados);
        encebollado.description = "Caldo de pescado con yuca".to_string();

        assert!(encebollado.matches_term("normal"));
        assert!(encebollado.matches_term("yuca"));
        assert!(encebollado.matches_term(""));
        assert!(!encebollado.matches_term("camarón"));
    }

    #[test]
    fn matches_term_is_unicode_case_insensitive() {
        let ceviche = product(13, "Ceviche Camarón", 875, Category::Ceviches);

        assert!(ceviche.matches_term(&"CAMARÓN".to_lowercase()));
    }

    #[test]
    fn priced_within_is_inclusive() {
        let chifle = product(31, "Chifle", 90, Category::Sides);

        assert!(chifle.priced_within(Decimal::new(90, 2), Decimal::new(90, 2)));
        assert!(chifle.priced_within(Decimal::ZERO, Decimal::ONE));
        assert!(!chifle.priced_within(Decimal::new(91, 2), Decimal::TWO));
    }

    #[test]
    fn priced_within_keeps_fractional_cents() {
        let chifle = product(31, "Chifle", 90, Category::Sides);

        assert!(!chifle.priced_within(Decimal::new(905, 3), Decimal::ONE));
        assert!(chifle.priced_within(Decimal::new(895, 3), Decimal::new(905, 3)));
    }

    #[test]
    fn product_id_displays_raw_value() {
        assert_eq!(ProductId::from(35).to_string(), "35");
        assert_eq!(ProductId::new(35).get(), 35);
    }
}
