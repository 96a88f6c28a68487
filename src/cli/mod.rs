use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use encebollado::{
    cart::{CartError, storage::FileStorage},
    catalog::{Catalog, statistics::StatisticsError},
    config::{ConfigError, Settings},
    fixtures::{FixtureError, MENU_SET, embedded_catalog, load_catalog},
    order::OrderError,
    pricing::TotalPriceError,
};
use rusty_money::MoneyError;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Style, object::Columns, object::Rows},
};
use thiserror::Error;
use tracing::debug;

mod cart;
mod menu;

/// CLI errors
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Pricing(#[from] TotalPriceError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Product {0} is not in the cart")]
    NotInCart(u32),
}

#[derive(Debug, Parser)]
#[command(
    name = "encebollado",
    about = "La Casa del Encebollado menu and ordering CLI",
    long_about = None
)]
pub(crate) struct Cli {
    /// Settings file (YAML)
    #[arg(short, long, env = "ENCEBOLLADO_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub(crate) log_level: String,

    /// Directory the cart is persisted in; overrides the settings file
    #[arg(long, env = "ENCEBOLLADO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Fixture directory to load the menu from instead of the built-in menu
    #[arg(long, env = "ENCEBOLLADO_FIXTURES")]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List menu categories
    Categories(menu::CategoriesArgs),

    /// List products
    Products(menu::ProductsArgs),

    /// List promotion bundles
    Promotions(menu::PromotionsArgs),

    /// Show catalog statistics
    Stats,

    /// Inspect or change the cart
    Cart(cart::CartCommand),

    /// Send the cart to the restaurant
    Checkout(cart::CheckoutArgs),
}

impl Cli {
    /// Parse arguments, reading a `.env` file first if one is present.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn run(self) -> Result<(), CliError> {
        let settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let catalog = self.catalog()?;
        let storage_dir = self
            .data_dir
            .clone()
            .unwrap_or_else(|| settings.storage.dir.clone());

        debug!(
            products = catalog.len(),
            storage_dir = %storage_dir.display(),
            "catalog loaded"
        );

        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            Commands::Categories(args) => menu::categories(&catalog, &args, &mut out),
            Commands::Products(args) => menu::products(&catalog, &args, &mut out),
            Commands::Promotions(args) => menu::promotions(&catalog, &args, &mut out),
            Commands::Stats => menu::stats(&catalog, &mut out),
            Commands::Cart(command) => cart::run(
                command,
                &catalog,
                &settings,
                FileStorage::new(storage_dir),
                &mut out,
            ),
            Commands::Checkout(args) => cart::checkout(
                &args,
                &catalog,
                &settings,
                FileStorage::new(storage_dir),
                &mut out,
            ),
        }
    }

    fn catalog(&self) -> Result<Catalog, FixtureError> {
        match &self.fixtures {
            Some(dir) => load_catalog(dir, MENU_SET),
            None => embedded_catalog(),
        }
    }
}

/// Build a table with `header` as its first row and every row of `rows` below it.
fn table<const N: usize>(header: [&str; N], rows: impl IntoIterator<Item = [String; N]>) -> Table {
    let mut builder = Builder::default();

    builder.push_record(header);

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    table
}

/// Right-align the price columns `from..to` of a table.
fn align_prices(table: &mut Table, from: usize, to: usize) {
    table.modify(Columns::new(from..to), Alignment::right());
}

fn write_table(out: &mut impl Write, table: &Table) -> io::Result<()> {
    writeln!(out, "{table}")
}

fn flag(value: bool) -> String {
    if value { "sí" } else { "" }.to_string()
}
