//! Cart Items

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{TotalPriceError, line_total},
    products::{Product, ProductId},
};

/// A product in the cart with its quantity.
///
/// The item borrows its product from the catalog; the quantity is always at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    product: &'a Product,
    quantity: u32,
    added_at: Timestamp,
}

impl<'a> CartItem<'a> {
    /// Create a cart item. Callers guarantee `quantity >= 1`.
    pub(crate) fn new(product: &'a Product, quantity: u32, added_at: Timestamp) -> Self {
        debug_assert!(quantity >= 1, "cart items hold at least one unit");

        Self {
            product,
            quantity,
            added_at,
        }
    }

    /// The product
    #[must_use]
    pub fn product(&self) -> &'a Product {
        self.product
    }

    /// Id of the product
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Number of units
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// When the product was first added
    #[must_use]
    pub fn added_at(&self) -> Timestamp {
        self.added_at
    }

    /// Price charged per unit.
    ///
    /// Promotional products already carry their promotional price, so this is the catalog
    /// price whether or not the product has promotion details.
    #[must_use]
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.product.price
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// - [`TotalPriceError::Overflow`]: the line total does not fit in minor units.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        line_total(self.unit_price(), self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        debug_assert!(quantity >= 1, "cart items hold at least one unit");

        self.quantity = quantity;
    }
}
