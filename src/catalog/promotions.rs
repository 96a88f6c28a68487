//! Promotion queries

use decimal_percentage::Percentage;
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    catalog::Catalog,
    promotions::{Promotion, PromotionId},
};

/// Number of promotions returned by [`Catalog::best_value_promotions`] by default.
pub const DEFAULT_BEST_VALUE: usize = 3;

/// Window used by [`Catalog::promotions_expiring_soon`] by default, in days.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;

const SECONDS_PER_DAY: i64 = 86_400;

impl Catalog {
    /// Look up a promotion by id.
    #[must_use]
    pub fn promotion_by_id(&self, id: PromotionId) -> Option<&Promotion> {
        self.promotions.iter().find(|promotion| promotion.id == id)
    }

    /// Promotions that are switched on, regardless of expiry.
    #[must_use]
    pub fn active_promotions(&self) -> Vec<&Promotion> {
        self.promotions_where(|promotion| promotion.active)
    }

    /// Promotions flagged as popular.
    #[must_use]
    pub fn popular_promotions(&self) -> Vec<&Promotion> {
        self.promotions_where(|promotion| promotion.popular)
    }

    /// Promotions that are active and not yet expired at `now`.
    #[must_use]
    pub fn valid_promotions(&self, now: Timestamp) -> Vec<&Promotion> {
        self.promotions_where(|promotion| promotion.is_valid_at(now))
    }

    /// Promotions advertising at least `min` discount.
    #[must_use]
    pub fn promotions_by_min_discount(&self, min: Percentage) -> Vec<&Promotion> {
        let min = min * Decimal::ONE;

        self.promotions_where(|promotion| promotion.discount * Decimal::ONE >= min)
    }

    /// Promotions priced within `min..=max`. Returns nothing when `min > max`.
    #[must_use]
    pub fn promotions_by_price_range(
        &self,
        min: Money<'_, Currency>,
        max: Money<'_, Currency>,
    ) -> Vec<&Promotion> {
        let (min, max) = (*min.amount(), *max.amount());

        self.promotions_where(|promotion| (min..=max).contains(promotion.price.amount()))
    }

    /// Case-insensitive search over promotion names and descriptions.
    #[must_use]
    pub fn search_promotions(&self, term: &str) -> Vec<&Promotion> {
        let term = term.to_lowercase();

        self.promotions_where(|promotion| promotion.matches_term(&term))
    }

    /// The `limit` promotions saving the most, largest saving first.
    ///
    /// Ties keep catalog order.
    #[must_use]
    pub fn best_value_promotions(&self, limit: usize) -> Vec<&Promotion> {
        let mut promotions: Vec<&Promotion> = self.promotions.iter().collect();

        promotions.sort_by_key(|promotion| std::cmp::Reverse(saved_minor(promotion)));
        promotions.truncate(limit);

        promotions
    }

    /// Active promotions ending after `now` but within the next `days` days.
    #[must_use]
    pub fn promotions_expiring_soon(&self, now: Timestamp, days: i64) -> Vec<&Promotion> {
        let horizon = days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|secs| now.checked_add(SignedDuration::from_secs(secs)).ok())
            .unwrap_or(Timestamp::MAX);

        self.promotions_where(|promotion| {
            promotion.active && promotion.valid_until > now && promotion.valid_until <= horizon
        })
    }

    fn promotions_where(&self, predicate: impl Fn(&Promotion) -> bool) -> Vec<&Promotion> {
        self.promotions
            .iter()
            .filter(|promotion| predicate(promotion))
            .collect()
    }
}

/// Savings in minor units; catalog construction guarantees a single currency.
pub(crate) fn saved_minor(promotion: &Promotion) -> i64 {
    promotion.original_price.to_minor_units() - promotion.price.to_minor_units()
}
