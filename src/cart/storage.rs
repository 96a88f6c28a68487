//! Cart Storage
//!
//! The cart is persisted as a single JSON blob under a fixed key. Each stored line keeps
//! the product id, the quantity and the RFC 3339 timestamp it was first added at.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    cart::{Cart, CartItem},
    catalog::Catalog,
    products::ProductId,
};

/// Key the cart is stored under.
pub const CART_STORAGE_KEY: &str = "casa-encebollado-cart";

/// Errors raised by a storage backend or while encoding a cart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error
    #[error("Storage IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialisation error
    #[error("Invalid stored cart: {0}")]
    Json(#[from] serde_json::Error),
}

/// A keyed blob store.
#[cfg_attr(test, mockall::automock)]
pub trait CartStorage {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage, lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Storage keeping one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the files live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;

        Ok(())
    }
}

/// A persisted cart line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCartItem {
    /// Product id
    pub product_id: ProductId,

    /// Quantity
    pub quantity: u32,

    /// When the product was first added
    pub added_at: Timestamp,
}

impl From<&CartItem<'_>> for StoredCartItem {
    fn from(item: &CartItem<'_>) -> Self {
        StoredCartItem {
            product_id: item.product_id(),
            quantity: item.quantity(),
            added_at: item.added_at(),
        }
    }
}

/// Encode a cart for storage.
///
/// # Errors
///
/// Returns a [`StorageError::Json`] if serialisation fails.
pub fn encode(cart: &Cart<'_>) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&cart.snapshot())?)
}

/// Decode stored cart lines.
///
/// # Errors
///
/// Returns a [`StorageError::Json`] if the blob is not a valid list of lines.
pub fn decode(blob: &str) -> Result<Vec<StoredCartItem>, StorageError> {
    Ok(serde_json::from_str(blob)?)
}

impl<'a> Cart<'a> {
    /// The cart's lines in storable form.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StoredCartItem> {
        self.iter().map(StoredCartItem::from).collect()
    }

    /// Rebuild a cart from stored lines, resolving products through `catalog`.
    ///
    /// Lines naming an unknown product or holding zero units are dropped; repeated
    /// product ids are merged into the first line.
    pub fn restore(catalog: &'a Catalog, stored: impl IntoIterator<Item = StoredCartItem>) -> Self {
        let mut cart = Cart::new(catalog.currency());

        for line in stored {
            let Some(product) = catalog.by_id(line.product_id) else {
                warn!(product_id = %line.product_id, "dropping stored line for unknown product");
                continue;
            };

            if line.quantity == 0 {
                warn!(product_id = %line.product_id, "dropping stored line with zero quantity");
                continue;
            }

            if cart.contains(line.product_id) {
                let merged = cart
                    .quantity_of(line.product_id)
                    .saturating_add(line.quantity);
                cart.set_quantity(line.product_id, merged);
                continue;
            }

            cart.push_restored(CartItem::new(product, line.quantity, line.added_at));
        }

        cart
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use tempfile::tempdir;
    use testresult::TestResult;

    use crate::catalog::tests::small_catalog;

    use super::*;

    fn line(id: u32, quantity: u32, second: i64) -> Result<StoredCartItem, jiff::Error> {
        Ok(StoredCartItem {
            product_id: ProductId::new(id),
            quantity,
            added_at: Timestamp::from_second(second)?,
        })
    }

    #[test]
    fn encode_decode_round_trip() -> TestResult {
        let catalog = small_catalog()?;
        let stored = vec![line(4, 2, 10)?, line(35, 1, 20)?, line(31, 5, 30)?];

        let cart = Cart::restore(&catalog, stored.clone());
        let decoded = decode(&encode(&cart)?)?;

        assert_eq!(decoded, stored);
        assert_eq!(Cart::restore(&catalog, decoded), cart);

        Ok(())
    }

    #[test]
    fn stored_timestamps_are_rfc3339() -> TestResult {
        let catalog = small_catalog()?;
        let cart = Cart::restore(&catalog, vec![line(4, 1, 0)?]);

        assert_eq!(
            encode(&cart)?,
            r#"[{"product_id":4,"quantity":1,"added_at":"1970-01-01T00:00:00Z"}]"#
        );

        Ok(())
    }

    #[test]
    fn restore_drops_unknown_and_empty_lines() -> TestResult {
        let catalog = small_catalog()?;
        let stored = vec![line(999, 1, 0)?, line(5, 0, 0)?, line(4, 2, 0)?];

        let cart = Cart::restore(&catalog, stored);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(4)), 2);

        Ok(())
    }

    #[test]
    fn restore_merges_repeated_products() -> TestResult {
        let catalog = small_catalog()?;
        let stored = vec![line(4, 2, 10)?, line(35, 1, 20)?, line(4, 3, 30)?];

        let cart = Cart::restore(&catalog, stored);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity_of(ProductId::new(4)), 5);
        assert_eq!(
            cart.get(ProductId::new(4)).map(CartItem::added_at),
            Some(Timestamp::from_second(10)?)
        );
        assert_eq!(cart.total_price()?, Money::from_minor(2380, USD));

        Ok(())
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(StorageError::Json(_))));
    }

    #[test]
    fn memory_storage_reads_back_writes() -> TestResult {
        let mut storage = MemoryStorage::new();

        assert_eq!(storage.read(CART_STORAGE_KEY)?, None);

        storage.write(CART_STORAGE_KEY, "[]")?;

        assert_eq!(storage.read(CART_STORAGE_KEY)?, Some("[]".to_string()));

        Ok(())
    }

    #[test]
    fn file_storage_creates_its_directory() -> TestResult {
        let dir = tempdir()?;
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read(CART_STORAGE_KEY)?, None);

        storage.write(CART_STORAGE_KEY, "[]")?;

        assert_eq!(storage.read(CART_STORAGE_KEY)?, Some("[]".to_string()));
        assert!(
            storage
                .dir()
                .join(format!("{CART_STORAGE_KEY}.json"))
                .exists()
        );

        Ok(())
    }
}
