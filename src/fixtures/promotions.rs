//! Promotion Fixtures

use jiff::Timestamp;
use serde::Deserialize;

use crate::{
    categories::Category,
    fixtures::{
        FixtureError,
        products::{parse_money, parse_percentage},
    },
    promotions::{Promotion, PromotionId, PromotionItem},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Promotion bundles in catalog order
    pub promotions: Vec<PromotionFixture>,
}

/// Promotion Fixture
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion id
    pub id: u32,

    /// Promotion name
    pub name: String,

    /// Promotion description
    #[serde(default)]
    pub description: String,

    /// Bundle price (e.g., "12.99 USD")
    pub price: String,

    /// Price of the contents bought separately
    pub original_price: String,

    /// Advertised discount (e.g., "23%")
    pub discount: String,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Category the promotion is listed under
    pub category: Category,

    /// Whether the promotion is switched on
    #[serde(default)]
    pub active: bool,

    /// End of the promotion
    pub valid_until: Timestamp,

    /// Bundle contents
    #[serde(default)]
    pub items: Vec<PromotionItem>,

    /// Terms and conditions
    #[serde(default)]
    pub terms: String,

    /// Popular flag
    #[serde(default)]
    pub popular: bool,
}

impl TryFrom<PromotionFixture> for Promotion {
    type Error = FixtureError;

    fn try_from(fixture: PromotionFixture) -> Result<Self, Self::Error> {
        Ok(Promotion {
            id: PromotionId::new(fixture.id),
            name: fixture.name,
            description: fixture.description,
            price: parse_money(&fixture.price)?,
            original_price: parse_money(&fixture.original_price)?,
            discount: parse_percentage(&fixture.discount)?,
            image: fixture.image,
            category: fixture.category,
            active: fixture.active,
            valid_until: fixture.valid_until,
            items: fixture.items,
            terms: fixture.terms,
            popular: fixture.popular,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn promotion_fixture_converts() -> TestResult {
        let fixture: PromotionFixture = serde_norway::from_str(concat!(
            "id: 3\n",
            "name: \"Combo Cazuela\"\n",
            "price: \"15.99 USD\"\n",
            "original_price: \"19.20 USD\"\n",
            "discount: \"17%\"\n",
            "category: promociones\n",
            "active: true\n",
            "valid_until: \"2024-12-31T00:00:00Z\"\n",
            "items:\n",
            "  - { name: \"Cazuela Grande\", quantity: 2 }\n",
        ))?;

        let promotion = Promotion::try_from(fixture)?;

        assert_eq!(promotion.savings()?, Money::from_minor(321, USD));
        assert_eq!(promotion.items.len(), 1);
        assert!(promotion.active);
        assert!(!promotion.popular);

        Ok(())
    }

    #[test]
    fn promotion_fixture_rejects_bad_discount() -> TestResult {
        let fixture: PromotionFixture = serde_norway::from_str(concat!(
            "id: 3\n",
            "name: \"Combo\"\n",
            "price: \"15.99 USD\"\n",
            "original_price: \"19.20 USD\"\n",
            "discount: \"muchísimo\"\n",
            "category: promociones\n",
            "valid_until: \"2024-12-31T00:00:00Z\"\n",
        ))?;

        assert!(matches!(
            Promotion::try_from(fixture),
            Err(FixtureError::InvalidPercentage(_))
        ));

        Ok(())
    }
}
