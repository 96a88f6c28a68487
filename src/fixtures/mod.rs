//! Fixtures
//!
//! Catalog data is kept as YAML under `fixtures/{products,categories,promotions}/<set>.yml`.
//! The `menu` set is also embedded in the binary so the application never needs the files
//! at runtime.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    categories::{Category, CategoryInfo, CategoryMap},
    fixtures::{
        categories::CategoriesFixture, products::ProductsFixture, promotions::PromotionsFixture,
    },
    products::Product,
    promotions::Promotion,
};

pub mod categories;
pub mod products;
pub mod promotions;

/// Name of the fixture set shipped with the application.
pub const MENU_SET: &str = "menu";

const EMBEDDED_PRODUCTS: &str = include_str!("../../fixtures/products/menu.yml");
const EMBEDDED_CATEGORIES: &str = include_str!("../../fixtures/categories/menu.yml");
const EMBEDDED_PROMOTIONS: &str = include_str!("../../fixtures/promotions/menu.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A category is listed more than once
    #[error("Duplicate category: {0}")]
    DuplicateCategory(Category),

    /// A category has no entry
    #[error("Missing category: {0}")]
    MissingCategory(Category),

    /// Categories were never loaded
    #[error("No categories loaded")]
    NoCategories,

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Catalog assembly error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    products: Vec<Product>,
    categories: Option<CategoryMap<CategoryInfo>>,
    promotions: Vec<Promotion>,

    /// Currency for the fixture set, decided by the first price seen
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            categories: None,
            promotions: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("products", name)?;

        self.add_products(&contents)
    }

    /// Load categories from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or does not list every category
    /// exactly once.
    pub fn load_categories(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("categories", name)?;

        self.add_categories(&contents)
    }

    /// Load promotions from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("promotions", name)?;

        self.add_promotions(&contents)
    }

    /// Load a complete fixture set (products, categories, and promotions with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_at("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_at(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_categories(name)?
            .load_promotions(name)?;

        Ok(fixture)
    }

    /// The menu set compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data is malformed.
    pub fn embedded() -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .add_products(EMBEDDED_PRODUCTS)?
            .add_categories(EMBEDDED_CATEGORIES)?
            .add_promotions(EMBEDDED_PROMOTIONS)?;

        Ok(fixture)
    }

    /// Products loaded so far
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Promotions loaded so far
    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Get the fixture currency
    ///
    /// # Errors
    ///
    /// Returns an error if no prices have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Assemble the loaded records into a [`Catalog`]
    ///
    /// # Errors
    ///
    /// Returns an error if categories or prices are missing, or if ids are duplicated.
    pub fn into_catalog(self) -> Result<Catalog, FixtureError> {
        let currency = self.currency()?;
        let categories = self.categories.ok_or(FixtureError::NoCategories)?;

        debug!(
            products = self.products.len(),
            promotions = self.promotions.len(),
            currency = currency.iso_alpha_code,
            "assembling catalog"
        );

        Ok(Catalog::new(
            self.products,
            categories,
            self.promotions,
            currency,
        )?)
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));

        Ok(fs::read_to_string(&file_path)?)
    }

    fn add_products(&mut self, contents: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(contents)?;

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;

            self.track_currency(product.price.currency())?;
            self.products.push(product);
        }

        Ok(self)
    }

    fn add_categories(&mut self, contents: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CategoriesFixture = serde_norway::from_str(contents)?;

        self.categories = Some(fixture.into_map()?);

        Ok(self)
    }

    fn add_promotions(&mut self, contents: &str) -> Result<&mut Self, FixtureError> {
        let fixture: PromotionsFixture = serde_norway::from_str(contents)?;

        for promotion_fixture in fixture.promotions {
            let promotion = Promotion::try_from(promotion_fixture)?;

            self.track_currency(promotion.price.currency())?;
            self.track_currency(promotion.original_price.currency())?;
            self.promotions.push(promotion);
        }

        Ok(self)
    }

    fn track_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the catalog shipped with the application
///
/// # Errors
///
/// Returns an error if the embedded data is malformed.
pub fn embedded_catalog() -> Result<Catalog, FixtureError> {
    Fixture::embedded()?.into_catalog()
}

/// Build a catalog from a fixture set on disk
///
/// # Errors
///
/// Returns an error if any of the fixture files cannot be loaded.
pub fn load_catalog(base_path: impl Into<PathBuf>, name: &str) -> Result<Catalog, FixtureError> {
    Fixture::from_set_at(base_path, name)?.into_catalog()
}
