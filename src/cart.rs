//! Cart
//!
//! Line items keyed by product id, in insertion order. Totals and category groups are
//! derived on every read.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    categories::Category,
    pricing::{TotalPriceError, total_price},
    products::{Product, ProductId},
};

pub mod engine;
pub mod items;
pub mod storage;

pub use items::CartItem;

/// Errors raised by cart mutations. A failed mutation leaves the cart untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product cannot be ordered right now.
    #[error("Producto no disponible: {name}")]
    Unavailable {
        /// Product id
        id: ProductId,
        /// Product name
        name: String,
    },

    /// No product with this id exists in the catalog.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// Items are added at least one unit at a time.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// The accumulated quantity does not fit in a `u32`.
    #[error("Quantity overflow for product {0}")]
    QuantityOverflow(ProductId),

    /// The product is priced in a different currency from the cart.
    #[error("Product {id} has currency {found}, but cart has currency {expected}")]
    CurrencyMismatch {
        /// Product id
        id: ProductId,
        /// Product currency code
        found: &'static str,
        /// Cart currency code
        expected: &'static str,
    },
}

/// Result of a successful [`Cart::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created.
    Added {
        /// Quantity of the new line
        quantity: u32,
    },

    /// An existing line was topped up.
    Increased {
        /// Quantity after the increase
        quantity: u32,
    },
}

impl AddOutcome {
    /// Quantity of the line after the addition.
    #[must_use]
    pub fn quantity(self) -> u32 {
        match self {
            AddOutcome::Added { quantity } | AddOutcome::Increased { quantity } => quantity,
        }
    }
}

/// Result of a quantity adjustment on an existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// The line now holds this quantity.
    Updated(u32),

    /// The line was removed.
    Removed,

    /// There was no line for the product; nothing changed.
    Missing,
}

/// Cart lines sharing a category, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'c> {
    /// Category of every line in the group
    pub category: Category,

    /// Lines in insertion order
    pub items: SmallVec<[&'c CartItem<'c>; 4]>,
}

impl CategoryGroup<'_> {
    /// Sum of the group's line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] on overflow or currency mismatch.
    pub fn subtotal(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, TotalPriceError> {
        total_price(
            self.items
                .iter()
                .map(|item| (item.unit_price(), item.quantity())),
            currency,
        )
    }
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'static Currency,
    open: bool,
}

impl<'a> Cart<'a> {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
            open: false,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line accumulates the quantity; otherwise a new line is appended with
    /// `added_at = now`.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::Unavailable`]: the product cannot be ordered.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`CartError::QuantityOverflow`]: the accumulated quantity overflows.
    pub fn add_item(
        &mut self,
        product: &'a Product,
        quantity: u32,
        now: Timestamp,
    ) -> Result<AddOutcome, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if !product.available {
            return Err(CartError::Unavailable {
                id: product.id,
                name: product.name.clone(),
            });
        }

        let found = product.price.currency();

        if found != self.currency {
            return Err(CartError::CurrencyMismatch {
                id: product.id,
                found: found.iso_alpha_code,
                expected: self.currency.iso_alpha_code,
            });
        }

        if let Some(item) = self.get_mut(product.id) {
            let total = item
                .quantity()
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow(product.id))?;

            item.set_quantity(total);

            return Ok(AddOutcome::Increased { quantity: total });
        }

        self.items.push(CartItem::new(product, quantity, now));

        Ok(AddOutcome::Added { quantity })
    }

    /// Remove the line for `id`, returning it. Absent lines are not an error.
    pub fn remove_item(&mut self, id: ProductId) -> Option<CartItem<'a>> {
        let idx = self.position(id)?;

        Some(self.items.remove(idx))
    }

    /// Overwrite the quantity of an existing line. Zero removes the line; a missing line
    /// is never created.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> Adjustment {
        if quantity == 0 {
            return match self.remove_item(id) {
                Some(_) => Adjustment::Removed,
                None => Adjustment::Missing,
            };
        }

        match self.get_mut(id) {
            Some(item) => {
                item.set_quantity(quantity);
                Adjustment::Updated(quantity)
            }
            None => Adjustment::Missing,
        }
    }

    /// Add one unit to an existing line.
    pub fn increment(&mut self, id: ProductId) -> Adjustment {
        match self.get_mut(id) {
            Some(item) => {
                let quantity = item.quantity().saturating_add(1);
                item.set_quantity(quantity);
                Adjustment::Updated(quantity)
            }
            None => Adjustment::Missing,
        }
    }

    /// Take one unit from an existing line, removing it instead of reaching zero.
    pub fn decrement(&mut self, id: ProductId) -> Adjustment {
        match self.get(id).map(CartItem::quantity) {
            Some(quantity) if quantity > 1 => self.set_quantity(id, quantity - 1),
            Some(_) => self.set_quantity(id, 0),
            None => Adjustment::Missing,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The line for `id`
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem<'a>> {
        self.items.iter().find(|item| item.product_id() == id)
    }

    /// Quantity held for `id`, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, CartItem::quantity)
    }

    /// Whether there is a line for `id`.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Sum of quantities over every line.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Sum of unit price times quantity over every line. An empty cart totals zero.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] on overflow.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        total_price(
            self.items
                .iter()
                .map(|item| (item.unit_price(), item.quantity())),
            self.currency,
        )
    }

    /// Lines grouped by category. Groups appear in the order their category was first
    /// encountered; lines keep insertion order within a group.
    #[must_use]
    pub fn grouped_by_category(&self) -> Vec<CategoryGroup<'_>> {
        let mut groups: Vec<CategoryGroup<'_>> = Vec::new();

        for item in &self.items {
            let category = item.product().category;

            match groups.iter_mut().find(|group| group.category == category) {
                Some(group) => group.items.push(item),
                None => groups.push(CategoryGroup {
                    category,
                    items: smallvec![item],
                }),
            }
        }

        groups
    }

    /// Whether the cart panel is shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the cart panel.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the cart panel.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flip the cart panel visibility.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub(crate) fn push_restored(&mut self, item: CartItem<'a>) {
        self.items.push(item);
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut CartItem<'a>> {
        self.items.iter_mut().find(|item| item.product_id() == id)
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.product_id() == id)
    }
}
