//! Product Fixtures

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    categories::Category,
    fixtures::FixtureError,
    products::{Product, ProductId, PromotionDetails},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in menu order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u32,

    /// Product name
    pub name: String,

    /// Product price (e.g., "4.40 USD")
    pub price: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Category id
    pub category: Category,

    /// Whether the product can be ordered
    #[serde(default = "available_by_default")]
    pub available: bool,

    /// Popular flag
    #[serde(default)]
    pub popular: bool,

    /// Promotional flag
    #[serde(default)]
    pub promotional: bool,

    /// Promotion pricing
    #[serde(default)]
    pub promotion: Option<PromotionDetailsFixture>,
}

/// Promotion pricing attached to a product fixture
#[derive(Debug, Deserialize)]
pub struct PromotionDetailsFixture {
    /// Price before the promotion (e.g., "15.99 USD")
    pub original_price: String,

    /// Advertised discount (e.g., "18.75%")
    pub discount: String,

    /// End of the promotion
    pub valid_until: Timestamp,
}

const fn available_by_default() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_money(&fixture.price)?;

        let promotion_details = fixture
            .promotion
            .map(|details| -> Result<PromotionDetails, FixtureError> {
                Ok(PromotionDetails {
                    original_price: parse_money(&details.original_price)?,
                    discount: parse_percentage(&details.discount)?,
                    valid_until: details.valid_until,
                })
            })
            .transpose()?;

        Ok(Product {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            price,
            description: fixture.description,
            image: fixture.image,
            category: fixture.category,
            available: fixture.available,
            popular: fixture.popular,
            promotional: fixture.promotional,
            promotion_details,
        })
    }
}

/// Parse a price string straight into [`Money`].
///
/// # Errors
///
/// See [`parse_price`].
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "4.40 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "USD" => USD,
        "GBP" => GBP,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "18.75%" or "0.1875") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal number.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
    } else {
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("4.40USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("4.40 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        let result = parse_price("-1.00 USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_reads_minor_units() -> TestResult {
        let (minor, currency) = parse_price("0.34 USD")?;

        assert_eq!(minor, 34);
        assert_eq!(currency, USD);

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("18.75%")?, Percentage::from(Decimal::new(1875, 4)));
        assert_eq!(parse_percentage("0.25")?, Percentage::from(Decimal::new(25, 2)));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage() {
        let result = parse_percentage("mucho%");

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(_))));
    }

    #[test]
    fn product_fixture_defaults_to_available() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str(
            "id: 31\nname: Chifle\nprice: \"0.90 USD\"\ncategory: acompañamientos\n",
        )?;

        let product = Product::try_from(fixture)?;

        assert!(product.available);
        assert!(!product.popular);
        assert_eq!(product.category, Category::Sides);
        assert_eq!(product.price, Money::from_minor(90, USD));
        assert!(product.promotion_details.is_none());

        Ok(())
    }

    #[test]
    fn product_fixture_reads_promotion_details() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str(concat!(
            "id: 1\n",
            "name: \"Promo 1\"\n",
            "price: \"12.99 USD\"\n",
            "category: promociones\n",
            "promotional: true\n",
            "promotion:\n",
            "  original_price: \"15.99 USD\"\n",
            "  discount: \"18.75%\"\n",
            "  valid_until: \"2024-12-31T00:00:00Z\"\n",
        ))?;

        let product = Product::try_from(fixture)?;
        let details = product.promotion_details.ok_or("missing promotion details")?;

        assert_eq!(details.original_price, Money::from_minor(1599, USD));
        assert_eq!(details.valid_until, "2024-12-31T00:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }
}
