//! Cart Engine
//!
//! Owns the session's cart and wires every mutation to its side effects: the cart is
//! persisted after each change and a notification is raised for the user. Persistence
//! failures are logged and otherwise ignored; the session keeps working in memory.

use jiff::Timestamp;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    cart::{
        AddOutcome, Adjustment, Cart, CartError,
        storage::{CART_STORAGE_KEY, CartStorage, StorageError, StoredCartItem, decode, encode},
    },
    catalog::Catalog,
    config::RestaurantSettings,
    notifications::{NotificationKind, NotificationQueue, NotificationSettings},
    order::{
        OrderError,
        channel::{OrderChannel, order_link},
        message::{OrderTemplate, format_order},
    },
    products::{Product, ProductId},
};

/// Cart engine
#[derive(Debug)]
pub struct CartEngine<'a, S> {
    catalog: &'a Catalog,
    cart: Cart<'a>,
    storage: S,
    storage_key: String,
    notifications: NotificationQueue,
}

impl<'a, S: CartStorage> CartEngine<'a, S> {
    /// Start a session, restoring the cart stored under `storage_key`.
    ///
    /// A missing or unreadable stored cart yields an empty cart.
    pub fn load(
        catalog: &'a Catalog,
        storage: S,
        storage_key: impl Into<String>,
        notifications: NotificationSettings,
    ) -> Self {
        let storage_key = storage_key.into();

        let cart = match read_stored(&storage, &storage_key) {
            Ok(Some(lines)) => {
                let cart = Cart::restore(catalog, lines);

                info!(lines = cart.len(), key = %storage_key, "restored cart");

                cart
            }
            Ok(None) => Cart::new(catalog.currency()),
            Err(err) => {
                warn!(error = %err, key = %storage_key, "could not restore cart, starting empty");

                Cart::new(catalog.currency())
            }
        };

        Self {
            catalog,
            cart,
            storage,
            storage_key,
            notifications: NotificationQueue::new(notifications),
        }
    }

    /// Start a session with the default storage key and notification settings.
    pub fn with_defaults(catalog: &'a Catalog, storage: S) -> Self {
        Self::load(
            catalog,
            storage,
            CART_STORAGE_KEY,
            NotificationSettings::default(),
        )
    }

    /// The catalog products are resolved against.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Notifications raised so far.
    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Mutable access to the notification queue, for expiry and dismissal.
    pub fn notifications_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    /// The storage backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add `quantity` units of `product` to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart rejects the product; the cart is left unchanged
    /// and an error notification is raised.
    #[tracing::instrument(
        name = "cart.engine.add_item",
        skip(self, product, now),
        fields(product_id = %product.id),
        err
    )]
    pub fn add_item(
        &mut self,
        product: &'a Product,
        quantity: u32,
        now: Timestamp,
    ) -> Result<AddOutcome, CartError> {
        match self.cart.add_item(product, quantity, now) {
            Ok(outcome) => {
                let message = match outcome {
                    AddOutcome::Added { .. } => format!("{} agregado al carrito", product.name),
                    AddOutcome::Increased { quantity } => {
                        format!("{}: ahora tienes {quantity} unidades", product.name)
                    }
                };

                self.notifications.push(
                    NotificationKind::Success,
                    message,
                    Some(product.id),
                    now,
                );
                self.persist();

                Ok(outcome)
            }
            Err(err) => {
                self.notifications.push(
                    NotificationKind::Error,
                    err.to_string(),
                    Some(product.id),
                    now,
                );

                Err(err)
            }
        }
    }

    /// Add `quantity` units of the catalog product `id`.
    ///
    /// # Errors
    ///
    /// - [`CartError::ProductNotFound`]: the catalog has no product `id`.
    /// - Any error from [`CartEngine::add_item`].
    pub fn add_by_id(
        &mut self,
        id: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<AddOutcome, CartError> {
        let Some(product) = self.catalog.by_id(id) else {
            let err = CartError::ProductNotFound(id);

            self.notifications
                .push(NotificationKind::Error, err.to_string(), Some(id), now);

            return Err(err);
        };

        self.add_item(product, quantity, now)
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    #[tracing::instrument(name = "cart.engine.remove_item", skip(self, now), fields(product_id = %id))]
    pub fn remove_item(&mut self, id: ProductId, now: Timestamp) -> bool {
        let Some(item) = self.cart.remove_item(id) else {
            return false;
        };

        self.notify_removed(item.product(), now);
        self.persist();

        true
    }

    /// Overwrite the quantity of an existing line; zero removes it.
    #[tracing::instrument(name = "cart.engine.set_quantity", skip(self, now), fields(product_id = %id))]
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32, now: Timestamp) -> Adjustment {
        let product = self.cart.get(id).map(|item| item.product());
        let adjustment = self.cart.set_quantity(id, quantity);

        self.after_adjustment(adjustment, product, now)
    }

    /// Add one unit to an existing line.
    pub fn increment(&mut self, id: ProductId, now: Timestamp) -> Adjustment {
        let product = self.cart.get(id).map(|item| item.product());
        let adjustment = self.cart.increment(id);

        self.after_adjustment(adjustment, product, now)
    }

    /// Take one unit from an existing line, removing it at zero.
    pub fn decrement(&mut self, id: ProductId, now: Timestamp) -> Adjustment {
        let product = self.cart.get(id).map(|item| item.product());
        let adjustment = self.cart.decrement(id);

        self.after_adjustment(adjustment, product, now)
    }

    /// Empty the cart and persist the empty state.
    #[tracing::instrument(name = "cart.engine.clear", skip(self, now))]
    pub fn clear(&mut self, now: Timestamp) {
        if !self.cart.is_empty() {
            self.cart.clear();
            self.notifications
                .push(NotificationKind::Info, "Carrito vaciado", None, now);
        }

        self.persist();
    }

    /// Show the cart panel.
    pub fn open(&mut self) {
        self.cart.open();
    }

    /// Hide the cart panel.
    pub fn close(&mut self) {
        self.cart.close();
    }

    /// Flip the cart panel visibility.
    pub fn toggle(&mut self) {
        self.cart.toggle();
    }

    /// Render the order message for the current cart without sending it.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the message cannot be rendered.
    pub fn preview(
        &self,
        template: &OrderTemplate,
        generated_at: Timestamp,
    ) -> Result<String, OrderError> {
        format_order(&self.cart, template, generated_at)
    }

    /// Send the cart as an order through `channel`, then clear and close the cart.
    ///
    /// The cart is only cleared once the channel has accepted the link.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyCart`]: there is nothing to order.
    /// - Any error rendering the message, building the link or dispatching it; the cart is
    ///   left untouched.
    #[tracing::instrument(
        name = "cart.engine.checkout",
        skip(self, channel, restaurant, now),
        fields(lines = self.cart.len()),
        err
    )]
    pub fn checkout(
        &mut self,
        channel: &mut impl OrderChannel,
        restaurant: &RestaurantSettings,
        now: Timestamp,
    ) -> Result<Url, OrderError> {
        if self.cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let message = format_order(&self.cart, &restaurant.template(), now)?;
        let link = order_link(
            &restaurant.channel_base_url,
            &restaurant.destination,
            &message,
        )?;

        channel.dispatch(&link)?;

        info!(
            items = self.cart.total_item_count(),
            destination = %restaurant.destination,
            "order handed off"
        );

        self.cart.clear();
        self.cart.close();
        self.notifications.push(
            NotificationKind::Success,
            "Pedido enviado por WhatsApp",
            None,
            now,
        );
        self.persist();

        Ok(link)
    }

    fn after_adjustment(
        &mut self,
        adjustment: Adjustment,
        product: Option<&Product>,
        now: Timestamp,
    ) -> Adjustment {
        match (adjustment, product) {
            (Adjustment::Removed, Some(product)) => {
                self.notify_removed(product, now);
                self.persist();
            }
            (Adjustment::Removed | Adjustment::Updated(_), _) => self.persist(),
            (Adjustment::Missing, _) => {}
        }

        adjustment
    }

    fn notify_removed(&mut self, product: &Product, now: Timestamp) {
        self.notifications.push(
            NotificationKind::Info,
            format!("{} eliminado del carrito", product.name),
            Some(product.id),
            now,
        );
    }

    fn persist(&mut self) {
        let written = encode(&self.cart).and_then(|blob| self.storage.write(&self.storage_key, &blob));

        match written {
            Ok(()) => debug!(lines = self.cart.len(), key = %self.storage_key, "persisted cart"),
            Err(err) => warn!(error = %err, key = %self.storage_key, "could not persist cart"),
        }
    }
}

fn read_stored(
    storage: &impl CartStorage,
    key: &str,
) -> Result<Option<Vec<StoredCartItem>>, StorageError> {
    storage
        .read(key)?
        .map(|blob| decode(&blob))
        .transpose()
}
